//! Demo collaborators driven by `sigflow run`.

use sigflow_signal::{ConsumeInfo, Consumer, TransformInfo, Transformer};
use sigflow_types::{SampleType, Stream, StreamMut, StreamView, StreamViewMut};
use tracing::warn;

// ─────────────────────────────────────────────────────────────────────────────
// Rms
// ─────────────────────────────────────────────────────────────────────────────

/// Root mean square of every dimension, one output sample per frame.
#[derive(Debug, Default)]
pub struct Rms {
    windows: usize,
}

impl Rms {
    pub fn windows(&self) -> usize {
        self.windows
    }
}

impl Transformer for Rms {
    fn sample_number_out(&self, _sample_number_in: usize) -> usize {
        1
    }

    fn sample_dimension_out(&self, sample_dimension_in: usize) -> usize {
        sample_dimension_in
    }

    fn sample_bytes_out(&self, _sample_bytes_in: usize) -> usize {
        4
    }

    fn sample_type_out(&self, _sample_type_in: SampleType) -> SampleType {
        SampleType::Float
    }

    fn transform(
        &mut self,
        info: &TransformInfo,
        input: &StreamView<'_>,
        output: &mut StreamViewMut<'_>,
        _xtra: &[StreamView<'_>],
    ) {
        self.windows += 1;
        let values = match input.values::<f32>() {
            Ok(values) => values,
            Err(e) => {
                warn!(time = info.time, error = %e, "rms needs a float stream");
                return;
            }
        };
        let dim = input.dim().max(1);
        let mut squares = vec![0.0f64; dim];
        for sample in values.chunks_exact(dim) {
            for (acc, &v) in squares.iter_mut().zip(sample) {
                *acc += f64::from(v) * f64::from(v);
            }
        }
        let n = input.num().max(1) as f64;
        let rms: Vec<f32> = squares.iter().map(|s| (s / n).sqrt() as f32).collect();
        if let Err(e) = output.write_values(&rms) {
            warn!(time = info.time, error = %e, "rms output rejected");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PeakTracker
// ─────────────────────────────────────────────────────────────────────────────

/// Loudest value seen, and when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub time: f64,
    pub value: f32,
}

/// Consumer that remembers the window holding the largest magnitude.
#[derive(Debug, Default)]
pub struct PeakTracker {
    windows: usize,
    peak: Option<Peak>,
}

impl PeakTracker {
    pub fn windows(&self) -> usize {
        self.windows
    }

    pub fn peak(&self) -> Option<Peak> {
        self.peak
    }
}

impl Consumer for PeakTracker {
    fn consume_enter(&mut self, _streams: &[StreamView<'_>]) {
        self.windows = 0;
        self.peak = None;
    }

    fn consume(&mut self, info: &ConsumeInfo, streams: &[StreamView<'_>]) {
        self.windows += 1;
        let Some(stream) = streams.first() else {
            return;
        };
        let Ok(values) = stream.values::<f32>() else {
            return;
        };
        let loudest = values.iter().copied().fold(0.0f32, |m, v| m.max(v.abs()));
        if self.peak.is_none_or(|p| loudest > p.value) {
            self.peak = Some(Peak {
                time: info.time,
                value: loudest,
            });
        }
    }
}
