//! Injected diagnostic sink.
//!
//! The drivers never log warnings through a global; they are handed a
//! [`DiagnosticSink`] by the caller.  [`TracingSink`] forwards to `tracing`,
//! [`NullSink`] drops everything and [`MemorySink`] keeps messages for tests.

use std::sync::Mutex;

use tracing::warn;

/// Receiver for recoverable problems found while preparing an invocation.
pub trait DiagnosticSink: Send + Sync {
    /// Report a warning raised by `source` (usually the setting being parsed).
    fn warn(&self, source: &str, message: &str);
}

/// Forwards warnings as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn warn(&self, source: &str, message: &str) {
        warn!(source = %source, "{message}");
    }
}

/// Discards every warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn warn(&self, _source: &str, _message: &str) {}
}

/// Records warnings in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Snapshot of the recorded messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticSink for MemorySink {
    fn warn(&self, source: &str, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(format!("{source}: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_prefixes_source() {
        let sink = MemorySink::default();
        sink.warn("frame", "bad");
        sink.warn("delta", "worse");
        assert_eq!(sink.messages(), vec!["frame: bad", "delta: worse"]);
    }

    #[test]
    fn sinks_are_object_safe() {
        let sinks: Vec<Box<dyn DiagnosticSink>> =
            vec![Box::new(TracingSink), Box::new(NullSink), Box::new(MemorySink::default())];
        for sink in &sinks {
            sink.warn("test", "message");
        }
    }
}
