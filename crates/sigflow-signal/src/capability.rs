//! Collaborator capabilities driven by the engine.
//!
//! A [`Transformer`] maps input windows to output windows; a [`Consumer`]
//! only observes them.  Both receive zero-copy [`StreamView`]s that live for
//! one call.

use sigflow_types::{SampleType, StreamView, StreamViewMut};

// ────────────────────────────────────────────────────────────────────────────
// Transformer
// ────────────────────────────────────────────────────────────────────────────

/// Per-call context for [`Transformer::transform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformInfo {
    /// Samples the window advances per step (the whole input when unwindowed).
    pub frame_num: usize,
    /// Extra look-ahead samples appended to the frame.
    pub delta_num: usize,
    /// Start time of the window in seconds.
    pub time: f64,
}

/// A stream transformation.
///
/// The `sample_*_out` methods must be pure: the driver calls them once to size
/// the output before any window is processed.  `enter` and `flush` bracket the
/// `transform` calls and are skipped when the caller disables them.
pub trait Transformer {
    fn sample_number_out(&self, sample_number_in: usize) -> usize;

    fn sample_dimension_out(&self, sample_dimension_in: usize) -> usize;

    fn sample_bytes_out(&self, sample_bytes_in: usize) -> usize;

    fn sample_type_out(&self, sample_type_in: SampleType) -> SampleType;

    fn transform_enter(
        &mut self,
        _input: &StreamView<'_>,
        _output: &mut StreamViewMut<'_>,
        _xtra: &[StreamView<'_>],
    ) {
    }

    fn transform(
        &mut self,
        info: &TransformInfo,
        input: &StreamView<'_>,
        output: &mut StreamViewMut<'_>,
        xtra: &[StreamView<'_>],
    );

    fn transform_flush(
        &mut self,
        _input: &StreamView<'_>,
        _output: &mut StreamViewMut<'_>,
        _xtra: &[StreamView<'_>],
    ) {
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Consumer
// ────────────────────────────────────────────────────────────────────────────

/// Trigger state attached to a consume call.
///
/// The engine only ever produces [`ConsumeStatus::NoTrigger`]; the other
/// states are set by event-driven schedulers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsumeStatus {
    #[default]
    NoTrigger,
    Completed,
    Continued,
}

/// Event that caused a triggered consume call.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerEvent {
    pub sender: String,
    pub name: String,
    pub time: f64,
    pub dur: f64,
}

/// Per-call context for [`Consumer::consume`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumeInfo {
    pub time: f64,
    pub dur: f64,
    pub status: ConsumeStatus,
    pub event: Option<TriggerEvent>,
}

/// A stream sink.
pub trait Consumer {
    fn consume_enter(&mut self, _streams: &[StreamView<'_>]) {}

    fn consume(&mut self, info: &ConsumeInfo, streams: &[StreamView<'_>]);

    fn consume_flush(&mut self, _streams: &[StreamView<'_>]) {}
}

// ────────────────────────────────────────────────────────────────────────────
// Options
// ────────────────────────────────────────────────────────────────────────────

/// Lifecycle switches shared by every driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverOptions {
    /// Call `*_enter` before the first step.
    pub call_enter: bool,
    /// Call `*_flush` after the last step.
    pub call_flush: bool,
    /// Hand the transformer a private copy of each input window.
    pub copy_input: bool,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            call_enter: true,
            call_flush: true,
            copy_input: false,
        }
    }
}
