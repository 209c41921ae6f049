//! Context-padded transform.
//!
//! Transformers that look behind and ahead of each frame declare separate
//! left and right context lengths.  The input is prefixed with
//! `frame / 2 + context_left` copies of its first sample and then windowed
//! with `delta = context_left + context_right`, so the first output still
//! lines up with the first input frame.

use sigflow_types::{Stream, StreamBuffer, StreamMut};
use tracing::debug;

use crate::capability::{DriverOptions, Transformer};
use crate::diagnostics::DiagnosticSink;
use crate::error::SignalError;
use crate::samples::resolve_samples;
use crate::transform::transform;

/// Copy of `from` with `ex` replicas of sample 0 in front.
///
/// An empty input yields a buffer of `ex` zeroed samples.
pub fn pad_front(from: &StreamBuffer, ex: usize) -> StreamBuffer {
    let width = from.format().sample_bytes();
    let mut padded = StreamBuffer::with_len(from.num() + ex, from.format());
    padded.set_time(from.time());
    let bytes = padded.as_bytes_mut();
    if let Some(first) = from.sample_bytes(0)
        && width > 0
    {
        for chunk in bytes[..ex * width].chunks_exact_mut(width) {
            chunk.copy_from_slice(first);
        }
    }
    bytes[ex * width..].copy_from_slice(from.as_bytes());
    padded
}

/// Windowed transform with asymmetric context.
///
/// # Errors
///
/// - [`SignalError::ZeroFrame`] when `frame == 0`, before anything is
///   allocated.
/// - [`SignalError::InsufficientData`] when the input is empty or the padded
///   stream is shorter than one window.
pub fn transform_context<T: Transformer + ?Sized>(
    from: &StreamBuffer,
    transformer: &mut T,
    frame: usize,
    context_left: usize,
    context_right: usize,
    options: DriverOptions,
) -> Result<StreamBuffer, SignalError> {
    if frame == 0 {
        return Err(SignalError::ZeroFrame);
    }
    let ex = frame / 2 + context_left;
    let delta = context_left + context_right;
    if from.is_empty() {
        return Err(SignalError::InsufficientData {
            required: frame + delta,
            actual: from.num(),
        });
    }
    debug!(frame, context_left, context_right, ex, "padding stream for context");
    let padded = pad_front(from, ex);
    transform(&padded, transformer, frame, delta, options)
}

/// [`transform_context`] with sizes given as sample-size strings.
///
/// # Errors
///
/// [`SignalError::Parse`] (after a warning on `sink`) when any string is
/// malformed, otherwise as [`transform_context`].
pub fn transform_context_str<T: Transformer + ?Sized>(
    from: &StreamBuffer,
    transformer: &mut T,
    frame: &str,
    context_left: &str,
    context_right: &str,
    options: DriverOptions,
    sink: &dyn DiagnosticSink,
) -> Result<StreamBuffer, SignalError> {
    let sr = from.sr();
    let frame = resolve_samples("frame", frame, sr, sink)?;
    let context_left = resolve_samples("context_left", context_left, sr, sink)?;
    let context_right = resolve_samples("context_right", context_right, sr, sink)?;
    transform_context(from, transformer, frame, context_left, context_right, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigflow_types::{SampleType, StreamFormat, StreamView, StreamViewMut};

    use crate::capability::TransformInfo;

    /// Copies the first frame sample of each window into the output.
    #[derive(Default)]
    struct FirstSample {
        windows: Vec<Vec<i16>>,
    }

    impl Transformer for FirstSample {
        fn sample_number_out(&self, _n: usize) -> usize {
            1
        }
        fn sample_dimension_out(&self, d: usize) -> usize {
            d
        }
        fn sample_bytes_out(&self, b: usize) -> usize {
            b
        }
        fn sample_type_out(&self, t: SampleType) -> SampleType {
            t
        }
        fn transform(
            &mut self,
            _info: &TransformInfo,
            input: &StreamView<'_>,
            output: &mut StreamViewMut<'_>,
            _xtra: &[StreamView<'_>],
        ) {
            let values = input.values::<i16>().unwrap();
            output.set_value(0, 0, values[0]).unwrap();
            self.windows.push(values);
        }
    }

    #[test]
    fn padding_replicates_first_sample() {
        let input = StreamBuffer::from_values(&[5i16, 6, 7, 8], 1, 1.0).unwrap();
        let padded = pad_front(&input, 3);
        assert_eq!(padded.values::<i16>().unwrap(), vec![5, 5, 5, 5, 6, 7, 8]);
        assert_eq!(input.num(), 4);
    }

    #[test]
    fn padding_copies_whole_multi_dimensional_samples() {
        let input = StreamBuffer::from_values(&[1u16, 2, 3, 4], 2, 0.0).unwrap();
        let padded = pad_front(&input, 2);
        assert_eq!(padded.values::<u16>().unwrap(), vec![1, 2, 1, 2, 1, 2, 3, 4]);
    }

    #[test]
    fn context_windows_start_in_the_padding() {
        let input = StreamBuffer::from_values(&[5i16, 6, 7, 8], 1, 1.0).unwrap();
        let mut t = FirstSample::default();
        // frame 1: ex = 0 + 2, delta = 2 + 1; padded = [5,5,5,6,7,8]
        let out = transform_context(&input, &mut t, 1, 2, 1, DriverOptions::default()).unwrap();
        assert_eq!(t.windows[0], vec![5, 5, 5, 6]);
        assert_eq!(t.windows.last().unwrap(), &vec![5, 6, 7, 8]);
        assert_eq!(out.values::<i16>().unwrap(), vec![5, 5, 5]);
    }

    #[test]
    fn zero_frame_is_rejected() {
        let input = StreamBuffer::from_values(&[1i16, 2, 3], 1, 1.0).unwrap();
        let mut t = FirstSample::default();
        let err = transform_context(&input, &mut t, 0, 1, 1, DriverOptions::default()).unwrap_err();
        assert_eq!(err, SignalError::ZeroFrame);
        assert!(t.windows.is_empty());
    }

    #[test]
    fn empty_input_is_insufficient() {
        let input = StreamBuffer::new(StreamFormat::of::<i16>(1, 1.0));
        let mut t = FirstSample::default();
        let err = transform_context(&input, &mut t, 4, 1, 1, DriverOptions::default()).unwrap_err();
        assert_eq!(
            err,
            SignalError::InsufficientData {
                required: 6,
                actual: 0
            }
        );
        assert!(err.to_string().contains("0 available"));
    }
}
