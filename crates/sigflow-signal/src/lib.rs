//! `sigflow-signal` – frame-windowed transform and consume engine.
//!
//! Drives external collaborators over [`StreamBuffer`][sigflow_types::StreamBuffer]s
//! one window at a time, using zero-copy views that never mutate the
//! caller's buffers.
//!
//! # Modules
//!
//! - [`capability`] – the [`Transformer`] and [`Consumer`] traits the engine
//!   drives, plus [`DriverOptions`].
//! - [`cursor`] – [`WindowCursor`]: window count, offsets and timestamps.
//! - [`transform`] – plain, windowed and multi-stream transform drivers.
//! - [`context`] – boundary-replicating padding for left/right context.
//! - [`align`] – maps primary windows onto auxiliary streams at other rates.
//! - [`consume`] – the consume driver.
//! - [`samples`] – `"512"` / `"0.5s"` / `"20ms"` sample-size strings.
//! - [`diagnostics`] – injected [`DiagnosticSink`] for recoverable warnings.
//! - [`generate`] – series, sine, cosine, random and sum test signals.
//! - [`error`] – [`SignalError`].

pub mod align;
pub mod capability;
pub mod consume;
pub mod context;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod generate;
pub mod samples;
pub mod transform;

pub use align::{Span, align_span};
pub use capability::{
    ConsumeInfo, ConsumeStatus, Consumer, DriverOptions, TransformInfo, Transformer, TriggerEvent,
};
pub use consume::{consume, consume_str};
pub use context::{pad_front, transform_context, transform_context_str};
pub use cursor::{Window, WindowCursor};
pub use diagnostics::{DiagnosticSink, MemorySink, NullSink, TracingSink};
pub use error::SignalError;
pub use samples::{SampleSpec, SpecError, resolve_samples};
pub use transform::{transform, transform_multi, transform_multi_str, transform_str};
