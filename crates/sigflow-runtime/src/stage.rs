//! Configured pipeline stages.
//!
//! A stage binds a [`WindowConfig`] to one collaborator and runs the matching
//! driver inside a `tracing` span, with warnings routed through
//! [`TracingSink`].  Recoverable failures (unparsable sizes) are logged and
//! returned so the caller can skip the tick; everything else is logged at
//! `error` level before being returned.

use sigflow_signal::{
    Consumer, SignalError, TracingSink, Transformer, consume_str, transform_context_str,
    transform_multi_str,
};
use sigflow_types::{Stream, StreamBuffer};
use tracing::{debug, error, info_span, warn};

use crate::config::WindowConfig;

fn report(stage: &str, err: &SignalError) {
    if err.is_recoverable() {
        warn!(stage = %stage, error = %err, "stage skipped");
    } else {
        error!(stage = %stage, error = %err, "stage aborted");
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TransformStage
// ────────────────────────────────────────────────────────────────────────────

/// A transformer with its window settings.
pub struct TransformStage<T> {
    name: String,
    window: WindowConfig,
    transformer: T,
}

impl<T: Transformer> TransformStage<T> {
    pub fn new(name: impl Into<String>, window: WindowConfig, transformer: T) -> Self {
        Self {
            name: name.into(),
            window,
            transformer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn window(&self) -> &WindowConfig {
        &self.window
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    pub fn into_inner(self) -> T {
        self.transformer
    }

    /// Transform `from`, presenting `xtra` as aligned auxiliary streams.
    ///
    /// With context lengths configured the context-padded transform runs
    /// instead and `xtra` is ignored.
    ///
    /// # Errors
    ///
    /// Whatever the driver reports; see [`SignalError`].
    pub fn run(
        &mut self,
        from: &StreamBuffer,
        xtra: &[StreamBuffer],
    ) -> Result<StreamBuffer, SignalError> {
        let span = info_span!("transform_stage", stage = %self.name, frame = %self.window.frame);
        let _enter = span.enter();

        let window = &self.window;
        let result = if window.uses_context() {
            if !xtra.is_empty() {
                warn!(xtra = xtra.len(), "context-padded transform ignores auxiliary streams");
            }
            transform_context_str(
                from,
                &mut self.transformer,
                &window.frame,
                window.context_left.as_deref().unwrap_or("0"),
                window.context_right.as_deref().unwrap_or("0"),
                window.options(),
                &TracingSink,
            )
        } else {
            transform_multi_str(
                from,
                xtra,
                &mut self.transformer,
                &window.frame,
                &window.delta,
                window.options(),
                &TracingSink,
            )
        };
        match &result {
            Ok(out) => debug!(num_in = from.num(), num_out = out.num(), "stage complete"),
            Err(err) => report(&self.name, err),
        }
        result
    }
}

// ────────────────────────────────────────────────────────────────────────────
// ConsumeStage
// ────────────────────────────────────────────────────────────────────────────

/// A consumer with its window settings.
pub struct ConsumeStage<C> {
    name: String,
    window: WindowConfig,
    consumer: C,
}

impl<C: Consumer> ConsumeStage<C> {
    pub fn new(name: impl Into<String>, window: WindowConfig, consumer: C) -> Self {
        Self {
            name: name.into(),
            window,
            consumer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }

    pub fn into_inner(self) -> C {
        self.consumer
    }

    /// Consume `from`; returns the number of `consume` calls.
    ///
    /// # Errors
    ///
    /// Whatever the driver reports; see [`SignalError`].
    pub fn run(&mut self, from: &StreamBuffer) -> Result<usize, SignalError> {
        let span = info_span!("consume_stage", stage = %self.name, frame = %self.window.frame);
        let _enter = span.enter();

        let result = consume_str(
            from,
            &mut self.consumer,
            &self.window.frame,
            &self.window.delta,
            self.window.options(),
            &TracingSink,
        );
        match &result {
            Ok(calls) => debug!(num_in = from.num(), calls, "stage complete"),
            Err(err) => report(&self.name, err),
        }
        result
    }
}
