//! Multi-Stream Aligner.
//!
//! Auxiliary streams run at their own rates.  For every primary window
//! `[t0, t1)` the aligner picks the matching sample range of each auxiliary
//! stream:
//!
//! ```text
//! offset_k = round(t0 * sr_k)
//! count_k  = round((t1 - t0) * sr_k)
//! ```
//!
//! The whole plan is computed and checked against each stream's real capacity
//! before the first collaborator call, so a misaligned stream aborts the
//! invocation without side effects.

use sigflow_types::{Stream, StreamBuffer, StreamView};

use crate::cursor::WindowCursor;
use crate::error::SignalError;
use crate::samples::round_half_up;

/// Sample range of one auxiliary window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub count: usize,
}

/// Samples of a stream at rate `sr` covering `[t0, t1)`.
pub fn align_span(t0: f64, t1: f64, sr: f64) -> Span {
    Span {
        offset: round_half_up(t0 * sr),
        count: round_half_up((t1 - t0) * sr),
    }
}

/// Checked spans of every auxiliary stream for every window.
#[derive(Debug, Clone, Default)]
pub(crate) struct AlignmentPlan {
    /// Window-major: `spans[index * streams + k]`.
    spans: Vec<Span>,
    streams: usize,
}

impl AlignmentPlan {
    pub(crate) fn new(cursor: &WindowCursor, xtra: &[StreamBuffer]) -> Result<Self, SignalError> {
        let streams = xtra.len();
        let mut spans = Vec::with_capacity(cursor.max_shift() * streams);
        for window in cursor.windows() {
            let t0 = window.time;
            let t1 = t0 + cursor.duration();
            for (k, stream) in xtra.iter().enumerate() {
                let span = align_span(t0, t1, stream.sr());
                if span.offset + span.count > stream.num_real() {
                    return Err(SignalError::DimensionMismatch {
                        stream: k,
                        offset: span.offset,
                        count: span.count,
                        available: stream.num_real(),
                    });
                }
                spans.push(span);
            }
        }
        Ok(Self { spans, streams })
    }

    pub(crate) fn span(&self, index: usize, stream: usize) -> Span {
        self.spans[index * self.streams + stream]
    }

    /// Views of every auxiliary stream for window `index`.
    pub(crate) fn views<'a>(
        &self,
        index: usize,
        xtra: &'a [StreamBuffer],
    ) -> Result<Vec<StreamView<'a>>, SignalError> {
        xtra.iter()
            .enumerate()
            .map(|(k, stream)| {
                let span = self.span(index, k);
                stream.view(span.offset, span.count).map_err(SignalError::from)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigflow_types::StreamFormat;

    #[test]
    fn span_rounds_offset_and_count() {
        assert_eq!(align_span(1.0, 2.0, 25.0), Span { offset: 25, count: 25 });
        assert_eq!(align_span(0.5, 1.0, 5.0), Span { offset: 3, count: 3 });
    }

    #[test]
    fn plan_follows_each_stream_rate() {
        let cursor = WindowCursor::bounded(40, 10, 0, 10.0).unwrap();
        let slow = StreamBuffer::with_len(20, StreamFormat::of::<f32>(1, 5.0));
        let fast = StreamBuffer::with_len(80, StreamFormat::of::<f32>(1, 20.0));
        let xtra = [slow, fast];
        let plan = AlignmentPlan::new(&cursor, &xtra).unwrap();

        assert_eq!(plan.span(0, 0), Span { offset: 0, count: 5 });
        assert_eq!(plan.span(2, 0), Span { offset: 10, count: 5 });
        assert_eq!(plan.span(3, 1), Span { offset: 60, count: 20 });

        let views = plan.views(1, &xtra).unwrap();
        assert_eq!(views[0].num(), 5);
        assert_eq!(views[1].num(), 20);
    }

    #[test]
    fn span_past_capacity_is_a_dimension_mismatch() {
        let cursor = WindowCursor::bounded(30, 10, 0, 10.0).unwrap();
        // At 40 Hz the third window needs samples 80..120 of a 100-sample stream.
        let xtra = [StreamBuffer::with_len(100, StreamFormat::of::<u8>(1, 40.0))];
        let err = AlignmentPlan::new(&cursor, &xtra).unwrap_err();
        assert_eq!(
            err,
            SignalError::DimensionMismatch {
                stream: 0,
                offset: 80,
                count: 40,
                available: 100
            }
        );
    }

    #[test]
    fn empty_stream_set_plans_nothing() {
        let cursor = WindowCursor::new(30, 10, 0, 10.0).unwrap();
        let plan = AlignmentPlan::new(&cursor, &[]).unwrap();
        assert!(plan.views(0, &[]).unwrap().is_empty());
    }
}
