//! Transform Driver.
//!
//! Runs a [`Transformer`] over a whole stream (`frame == 0`) or over a
//! sliding window (`frame > 0`), optionally with auxiliary streams aligned to
//! the primary time axis.
//!
//! Every precondition is checked before the first collaborator call, so an
//! invocation either runs `enter → transform* → flush` to completion or
//! fails without touching the collaborator.  The caller's buffers are only
//! ever borrowed; each step works on a fresh [`StreamView`].
//!
//! # Example
//!
//! ```rust
//! use sigflow_signal::{DriverOptions, TransformInfo, Transformer, transform};
//! use sigflow_types::{SampleType, Stream, StreamBuffer, StreamMut, StreamView, StreamViewMut};
//!
//! /// Mean of each window.
//! struct Mean;
//!
//! impl Transformer for Mean {
//!     fn sample_number_out(&self, _n: usize) -> usize { 1 }
//!     fn sample_dimension_out(&self, d: usize) -> usize { d }
//!     fn sample_bytes_out(&self, b: usize) -> usize { b }
//!     fn sample_type_out(&self, t: SampleType) -> SampleType { t }
//!
//!     fn transform(&mut self, _info: &TransformInfo, input: &StreamView<'_>,
//!                  output: &mut StreamViewMut<'_>, _xtra: &[StreamView<'_>]) {
//!         let values = input.values::<f32>().unwrap_or_default();
//!         let mean = values.iter().sum::<f32>() / values.len().max(1) as f32;
//!         let _ = output.set_value(0, 0, mean);
//!     }
//! }
//!
//! let input = StreamBuffer::from_values(&[1.0f32, 3.0, 5.0, 7.0], 1, 4.0).unwrap();
//! let output = transform(&input, &mut Mean, 2, 0, DriverOptions::default()).unwrap();
//! assert_eq!(output.values::<f32>().unwrap(), vec![2.0, 6.0]);
//! assert_eq!(output.sr(), 2.0);
//! ```

use sigflow_types::{Stream, StreamBuffer, StreamFormat, StreamMut, StreamView};
use tracing::debug;

use crate::align::AlignmentPlan;
use crate::capability::{DriverOptions, TransformInfo, Transformer};
use crate::cursor::WindowCursor;
use crate::diagnostics::DiagnosticSink;
use crate::error::SignalError;
use crate::samples::resolve_samples;

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Transform `from` into a new buffer.
///
/// `frame == 0` hands the whole stream to the transformer in one call.
/// Otherwise the stream is cut into `(num - delta) / frame` windows of
/// `frame + delta` samples, each producing `sample_number_out(frame)` output
/// samples.
///
/// # Errors
///
/// [`SignalError::InsufficientData`] when `frame > 0` and
/// `from.num() < frame + delta`.
pub fn transform<T: Transformer + ?Sized>(
    from: &StreamBuffer,
    transformer: &mut T,
    frame: usize,
    delta: usize,
    options: DriverOptions,
) -> Result<StreamBuffer, SignalError> {
    transform_multi(from, &[], transformer, frame, delta, options)
}

/// Transform `from` while presenting time-aligned windows of `xtra`.
///
/// With `frame > 0` and at least one auxiliary stream, the window count is
/// bounded by the shortest stream and each auxiliary window covers the same
/// seconds as the primary one.  `enter` and `flush` receive empty auxiliary
/// views.  With `frame == 0` the auxiliary streams are passed whole.
///
/// # Errors
///
/// - [`SignalError::MissingSampleRate`] when windowing with auxiliary streams
///   over a primary stream without a time axis.
/// - [`SignalError::InsufficientData`] when the shortest stream does not
///   exceed one window.
/// - [`SignalError::DimensionMismatch`] when an auxiliary window would read
///   past that stream's allocation.
pub fn transform_multi<T: Transformer + ?Sized>(
    from: &StreamBuffer,
    xtra: &[StreamBuffer],
    transformer: &mut T,
    frame: usize,
    delta: usize,
    options: DriverOptions,
) -> Result<StreamBuffer, SignalError> {
    if frame == 0 {
        Ok(transform_whole(from, xtra, transformer, options))
    } else {
        transform_windows(from, xtra, transformer, frame, delta, options)
    }
}

/// [`transform`] with frame and delta given as sample-size strings
/// (`"512"`, `"0.5s"`, `"20ms"`).
///
/// # Errors
///
/// [`SignalError::Parse`] (after a warning on `sink`) when either string is
/// malformed; the transformer is not invoked.
pub fn transform_str<T: Transformer + ?Sized>(
    from: &StreamBuffer,
    transformer: &mut T,
    frame: &str,
    delta: &str,
    options: DriverOptions,
    sink: &dyn DiagnosticSink,
) -> Result<StreamBuffer, SignalError> {
    transform_multi_str(from, &[], transformer, frame, delta, options, sink)
}

/// [`transform_multi`] with frame and delta given as sample-size strings.
///
/// # Errors
///
/// As [`transform_str`] and [`transform_multi`].
pub fn transform_multi_str<T: Transformer + ?Sized>(
    from: &StreamBuffer,
    xtra: &[StreamBuffer],
    transformer: &mut T,
    frame: &str,
    delta: &str,
    options: DriverOptions,
    sink: &dyn DiagnosticSink,
) -> Result<StreamBuffer, SignalError> {
    let frame = resolve_samples("frame", frame, from.sr(), sink)?;
    let delta = resolve_samples("delta", delta, from.sr(), sink)?;
    transform_multi(from, xtra, transformer, frame, delta, options)
}

// ────────────────────────────────────────────────────────────────────────────
// Drivers
// ────────────────────────────────────────────────────────────────────────────

fn output_format<T: Transformer + ?Sized>(
    transformer: &T,
    input: StreamFormat,
    sr: f64,
) -> StreamFormat {
    StreamFormat::new(
        transformer.sample_dimension_out(input.dim),
        transformer.sample_bytes_out(input.byte),
        transformer.sample_type_out(input.sample_type),
        sr,
    )
}

fn transform_whole<T: Transformer + ?Sized>(
    from: &StreamBuffer,
    xtra: &[StreamBuffer],
    transformer: &mut T,
    options: DriverOptions,
) -> StreamBuffer {
    let num_in = from.num();
    let num_out = if num_in == 0 {
        0
    } else {
        transformer.sample_number_out(num_in)
    };
    let sr_out = if num_in == 0 {
        0.0
    } else {
        num_out as f64 / num_in as f64 * from.sr()
    };
    let mut to = StreamBuffer::with_len(num_out, output_format(transformer, from.format(), sr_out));
    debug!(num_in, num_out, xtra = xtra.len(), "transforming whole stream");
    if num_out == 0 {
        return to;
    }

    let input = from.as_view();
    let aux: Vec<StreamView<'_>> = xtra.iter().map(StreamBuffer::as_view).collect();
    let mut output = to.as_view_mut();
    if options.call_enter {
        transformer.transform_enter(&input, &mut output, &aux);
    }
    let info = TransformInfo {
        frame_num: num_in,
        delta_num: 0,
        time: 0.0,
    };
    if options.copy_input {
        let copy = from.clone();
        transformer.transform(&info, &copy.as_view(), &mut output, &aux);
    } else {
        transformer.transform(&info, &input, &mut output, &aux);
    }
    if options.call_flush {
        transformer.transform_flush(&input, &mut output, &aux);
    }
    to
}

fn transform_windows<T: Transformer + ?Sized>(
    from: &StreamBuffer,
    xtra: &[StreamBuffer],
    transformer: &mut T,
    frame: usize,
    delta: usize,
    options: DriverOptions,
) -> Result<StreamBuffer, SignalError> {
    let sr = from.sr();
    let cursor = if xtra.is_empty() {
        WindowCursor::new(from.num(), frame, delta, sr)?
    } else {
        if !from.format().has_time_axis() {
            return Err(SignalError::MissingSampleRate {
                context: "multi-stream alignment",
            });
        }
        let shortest = xtra.iter().map(Stream::num).fold(from.num(), usize::min);
        WindowCursor::bounded(shortest, frame, delta, sr)?
    };
    let plan = AlignmentPlan::new(&cursor, xtra)?;

    let num_out = transformer.sample_number_out(frame);
    let sr_out = num_out as f64 / frame as f64 * sr;
    let format_out = output_format(transformer, from.format(), sr_out);
    let mut to = StreamBuffer::with_len(cursor.max_shift() * num_out, format_out);
    debug!(
        frame,
        delta,
        max_shift = cursor.max_shift(),
        num_out,
        xtra = xtra.len(),
        "transforming windows"
    );

    let window = cursor.sample_window();
    let last = cursor.max_shift() - 1;
    let neutral: Vec<StreamView<'_>> = xtra.iter().map(|s| StreamView::empty(s.format())).collect();
    let mut scratch = options
        .copy_input
        .then(|| StreamBuffer::with_len(window, from.format()));

    if options.call_enter {
        let input = from.view(0, window)?;
        let mut output = to.view_mut(0, num_out)?;
        transformer.transform_enter(&input, &mut output, &neutral);
    }

    for step in cursor.windows() {
        let input = from.view(step.offset, window)?;
        let mut output = to.view_mut(step.index * num_out, num_out)?;
        let aux = plan.views(step.index, xtra)?;
        let info = TransformInfo {
            frame_num: frame,
            delta_num: delta,
            time: step.time,
        };
        match scratch.as_mut() {
            Some(copy) => {
                copy.as_bytes_mut().copy_from_slice(input.as_bytes());
                copy.set_time(input.time());
                transformer.transform(&info, &copy.as_view(), &mut output, &aux);
            }
            None => transformer.transform(&info, &input, &mut output, &aux),
        }
    }

    if options.call_flush {
        let input = from.view(cursor.offset(last), window)?;
        let mut output = to.view_mut(last * num_out, num_out)?;
        transformer.transform_flush(&input, &mut output, &neutral);
    }
    Ok(to)
}
