//! Consume Driver.
//!
//! Same windowing as the transform driver, without an output buffer.  The
//! engine only produces untriggered calls (`ConsumeStatus::NoTrigger`,
//! no event).

use sigflow_types::{Stream, StreamBuffer};
use tracing::debug;

use crate::capability::{ConsumeInfo, ConsumeStatus, Consumer, DriverOptions};
use crate::cursor::WindowCursor;
use crate::diagnostics::DiagnosticSink;
use crate::error::SignalError;
use crate::samples::resolve_samples;

/// Feed `from` to `consumer` and return the number of `consume` calls made.
///
/// With `frame == 0` the consumer sees the whole stream once, with
/// `dur = num / sr`.  Otherwise each window of `frame + delta` samples is
/// consumed in turn with `dur = (frame + delta) / sr`; `enter` and `flush`
/// receive views shaped like the first and last window.
///
/// # Errors
///
/// [`SignalError::InsufficientData`] when `frame > 0` and
/// `from.num() < frame + delta`.
pub fn consume<C: Consumer + ?Sized>(
    from: &StreamBuffer,
    consumer: &mut C,
    frame: usize,
    delta: usize,
    options: DriverOptions,
) -> Result<usize, SignalError> {
    if frame == 0 {
        let streams = [from.as_view()];
        debug!(num = from.num(), "consuming whole stream");
        if options.call_enter {
            consumer.consume_enter(&streams);
        }
        consumer.consume(&untriggered(0.0, from.duration()), &streams);
        if options.call_flush {
            consumer.consume_flush(&streams);
        }
        return Ok(1);
    }

    let cursor = WindowCursor::new(from.num(), frame, delta, from.sr())?;
    let window = cursor.sample_window();
    let last = cursor.max_shift() - 1;
    debug!(frame, delta, max_shift = cursor.max_shift(), "consuming windows");

    if options.call_enter {
        consumer.consume_enter(&[from.view(0, window)?]);
    }
    for step in cursor.windows() {
        let streams = [from.view(step.offset, window)?];
        consumer.consume(&untriggered(step.time, cursor.duration()), &streams);
    }
    if options.call_flush {
        consumer.consume_flush(&[from.view(cursor.offset(last), window)?]);
    }
    Ok(cursor.max_shift())
}

/// [`consume`] with frame and delta given as sample-size strings.
///
/// # Errors
///
/// [`SignalError::Parse`] (after a warning on `sink`) when either string is
/// malformed; the consumer is not invoked.
pub fn consume_str<C: Consumer + ?Sized>(
    from: &StreamBuffer,
    consumer: &mut C,
    frame: &str,
    delta: &str,
    options: DriverOptions,
    sink: &dyn DiagnosticSink,
) -> Result<usize, SignalError> {
    let frame = resolve_samples("frame", frame, from.sr(), sink)?;
    let delta = resolve_samples("delta", delta, from.sr(), sink)?;
    consume(from, consumer, frame, delta, options)
}

fn untriggered(time: f64, dur: f64) -> ConsumeInfo {
    ConsumeInfo {
        time,
        dur,
        status: ConsumeStatus::NoTrigger,
        event: None,
    }
}
