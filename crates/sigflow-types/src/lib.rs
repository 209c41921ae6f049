//! `sigflow-types` – the stream data model shared by every sigflow crate.
//!
//! # Modules
//!
//! - [`sample`] – [`SampleType`] tags and the [`Sample`] trait for typed
//!   access to raw sample bytes.
//! - [`format`] – [`StreamFormat`] plus the [`Stream`]/[`StreamMut`] access
//!   traits implemented by buffers and views alike.
//! - [`buffer`] – [`StreamBuffer`]: the owning, growable buffer with separate
//!   logical and real extents.
//! - [`view`] – [`StreamView`]/[`StreamViewMut`]: zero-copy windows borrowed
//!   from a buffer.
//! - [`header`] – [`StreamHeader`]: the serialisable wire layout.

use thiserror::Error;

pub mod buffer;
pub mod format;
pub mod header;
pub mod sample;
pub mod view;

pub use buffer::{Adjustment, StreamBuffer};
pub use format::{Stream, StreamFormat, StreamMut};
pub use header::StreamHeader;
pub use sample::{Sample, SampleType};
pub use view::{StreamView, StreamViewMut};

/// Errors raised by stream construction, windowing and typed access.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    #[error("window of {num} samples at offset {offset} exceeds {available} available samples")]
    OutOfBounds {
        offset: usize,
        num: usize,
        available: usize,
    },

    #[error("sample ({sample}, {dimension}) outside stream of {num} samples x {dim} dimensions")]
    IndexOutOfRange {
        sample: usize,
        dimension: usize,
        num: usize,
        dim: usize,
    },

    #[error("Type Mismatch: stream holds {actual}, requested {expected}")]
    TypeMismatch {
        expected: SampleType,
        actual: SampleType,
    },

    #[error("{len} values do not form whole samples of dimension {dim}")]
    ShapeMismatch { len: usize, dim: usize },

    #[error("Incompatible streams: {left} vs {right}")]
    Incompatible { left: String, right: String },

    #[error("Inconsistent stream header: {0}")]
    InconsistentHeader(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_error_display() {
        let err = StreamError::OutOfBounds {
            offset: 8,
            num: 4,
            available: 10,
        };
        assert_eq!(
            err.to_string(),
            "window of 4 samples at offset 8 exceeds 10 available samples"
        );

        let err = StreamError::TypeMismatch {
            expected: SampleType::Float,
            actual: SampleType::Int,
        };
        assert!(err.to_string().contains("INT"));
        assert!(err.to_string().contains("FLOAT"));
    }

    #[test]
    fn stream_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StreamError>();
    }
}
