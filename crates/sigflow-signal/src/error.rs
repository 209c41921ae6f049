//! Error kinds raised by the transform and consume drivers.

use sigflow_types::StreamError;
use thiserror::Error;

use crate::samples::SpecError;

/// Everything that can stop a driver invocation.
///
/// Only [`SignalError::Parse`] is recoverable at the call boundary: the
/// collaborator was never invoked and the caller may simply skip the tick.
/// Every other variant is a precondition violation that aborted the
/// invocation before any collaborator call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("could not parse {field} '{text}': {source}")]
    Parse {
        field: &'static str,
        text: String,
        #[source]
        source: SpecError,
    },

    #[error("Insufficient Data: {required} samples required, {actual} available")]
    InsufficientData { required: usize, actual: usize },

    #[error(
        "Dimension Mismatch: auxiliary stream {stream} window of {count} samples \
         at offset {offset} exceeds {available} real samples"
    )]
    DimensionMismatch {
        stream: usize,
        offset: usize,
        count: usize,
        available: usize,
    },

    #[error("Zero Frame: context-padded transform needs a frame of at least one sample")]
    ZeroFrame,

    #[error("Missing Sample Rate: {context} requires a stream with sr > 0")]
    MissingSampleRate { context: &'static str },

    #[error(transparent)]
    Stream(#[from] StreamError),
}

impl SignalError {
    /// `true` when the invocation was rejected before doing anything and the
    /// caller may carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SignalError::Parse { .. })
    }
}
