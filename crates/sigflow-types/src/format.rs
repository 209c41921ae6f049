//! Stream format and the read/write access shared by buffers and views.
//!
//! [`StreamFormat`] bundles the per-stream constants (`dim`, `byte`, `type`,
//! `sr`).  The [`Stream`] and [`StreamMut`] traits give owning buffers and
//! borrowed views one vocabulary for sizes and typed access, so collaborators
//! never need to know which of the two they were handed.

use crate::StreamError;
use crate::header::StreamHeader;
use crate::sample::{Sample, SampleType};

// ────────────────────────────────────────────────────────────────────────────
// StreamFormat
// ────────────────────────────────────────────────────────────────────────────

/// Shape and rate of a stream, independent of how many samples it holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamFormat {
    /// Values per sample (channels).
    pub dim: usize,
    /// Size in bytes of one scalar value.
    pub byte: usize,
    /// Scalar kind tag.
    pub sample_type: SampleType,
    /// Sample rate in Hz; `0.0` marks a stream without a time axis.
    pub sr: f64,
}

impl StreamFormat {
    pub fn new(dim: usize, byte: usize, sample_type: SampleType, sr: f64) -> Self {
        Self {
            dim,
            byte,
            sample_type,
            sr,
        }
    }

    /// Format for values of the Rust scalar `T`.
    pub fn of<T: Sample>(dim: usize, sr: f64) -> Self {
        Self::new(dim, T::BYTES, T::TYPE, sr)
    }

    /// Bytes occupied by one sample (`dim * byte`).
    pub fn sample_bytes(&self) -> usize {
        self.dim * self.byte
    }

    /// Bytes occupied by `num` samples.
    pub fn bytes_for(&self, num: usize) -> usize {
        num * self.sample_bytes()
    }

    /// True when both formats lay out samples identically (`dim`, `byte`
    /// and `type` agree; the rate may differ).
    pub fn is_compatible(&self, other: &StreamFormat) -> bool {
        self.dim == other.dim && self.byte == other.byte && self.sample_type == other.sample_type
    }

    /// Returns `true` when the stream has a usable time axis.
    pub fn has_time_axis(&self) -> bool {
        self.sr > 0.0
    }

    fn check_type<T: Sample>(&self) -> Result<(), StreamError> {
        if self.sample_type == T::TYPE && self.byte == T::BYTES {
            Ok(())
        } else {
            Err(StreamError::TypeMismatch {
                expected: T::TYPE,
                actual: self.sample_type,
            })
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Read access
// ────────────────────────────────────────────────────────────────────────────

/// Read access to a run of samples with a known format.
///
/// `num`/`tot` describe the logical extent; `num_real`/`tot_real` the real
/// storage reachable from the first sample.  `tot == num * dim * byte` holds
/// for every implementor.
pub trait Stream {
    fn format(&self) -> StreamFormat;

    /// Logical sample count.
    fn num(&self) -> usize;

    /// Samples of real storage reachable from the first sample.
    fn num_real(&self) -> usize;

    /// Start time of the first sample in seconds.
    fn time(&self) -> f64;

    /// The `tot` bytes of the logical extent.
    fn as_bytes(&self) -> &[u8];

    fn dim(&self) -> usize {
        self.format().dim
    }

    fn byte(&self) -> usize {
        self.format().byte
    }

    fn sample_type(&self) -> SampleType {
        self.format().sample_type
    }

    fn sr(&self) -> f64 {
        self.format().sr
    }

    fn tot(&self) -> usize {
        self.format().bytes_for(self.num())
    }

    fn tot_real(&self) -> usize {
        self.format().bytes_for(self.num_real())
    }

    fn is_empty(&self) -> bool {
        self.num() == 0
    }

    /// Same sample layout as `other` (see [`StreamFormat::is_compatible`]).
    fn is_compatible<S: Stream>(&self, other: &S) -> bool {
        self.format().is_compatible(&other.format())
    }

    /// Length in seconds, or `0.0` when the stream has no time axis.
    fn duration(&self) -> f64 {
        let format = self.format();
        if format.has_time_axis() {
            self.num() as f64 / format.sr
        } else {
            0.0
        }
    }

    /// Raw bytes of sample `index`, or `None` past the logical end.
    fn sample_bytes(&self, index: usize) -> Option<&[u8]> {
        let width = self.format().sample_bytes();
        if index >= self.num() {
            return None;
        }
        self.as_bytes().get(index * width..(index + 1) * width)
    }

    /// Decode the value at (`sample`, `dimension`).
    fn value<T: Sample>(&self, sample: usize, dimension: usize) -> Result<T, StreamError> {
        let format = self.format();
        format.check_type::<T>()?;
        if sample >= self.num() || dimension >= format.dim {
            return Err(StreamError::IndexOutOfRange {
                sample,
                dimension,
                num: self.num(),
                dim: format.dim,
            });
        }
        let offset = (sample * format.dim + dimension) * format.byte;
        Ok(T::read_ne(&self.as_bytes()[offset..]))
    }

    /// Decode every value of the logical extent in sample-major order.
    fn values<T: Sample>(&self) -> Result<Vec<T>, StreamError> {
        self.format().check_type::<T>()?;
        Ok(self
            .as_bytes()
            .chunks_exact(T::BYTES)
            .map(T::read_ne)
            .collect())
    }

    /// Wire-layout header describing this stream.
    fn header(&self) -> StreamHeader {
        let format = self.format();
        StreamHeader {
            num: self.num(),
            num_real: self.num_real(),
            dim: format.dim,
            byte: format.byte,
            sample_type: format.sample_type,
            sr: format.sr,
            tot: self.tot(),
            tot_real: self.tot_real(),
            time: self.time(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Write access
// ────────────────────────────────────────────────────────────────────────────

/// Write access to the logical extent of a stream.
pub trait StreamMut: Stream {
    /// The `tot` bytes of the logical extent, mutably.
    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Encode `value` at (`sample`, `dimension`).
    fn set_value<T: Sample>(
        &mut self,
        sample: usize,
        dimension: usize,
        value: T,
    ) -> Result<(), StreamError> {
        let format = self.format();
        format.check_type::<T>()?;
        if sample >= self.num() || dimension >= format.dim {
            return Err(StreamError::IndexOutOfRange {
                sample,
                dimension,
                num: self.num(),
                dim: format.dim,
            });
        }
        let offset = (sample * format.dim + dimension) * format.byte;
        value.write_ne(&mut self.as_bytes_mut()[offset..]);
        Ok(())
    }

    /// Encode `values` from the first value onwards.
    ///
    /// `values` may be shorter than the logical extent; the remainder is left
    /// untouched.
    fn write_values<T: Sample>(&mut self, values: &[T]) -> Result<(), StreamError> {
        self.format().check_type::<T>()?;
        let capacity = self.num() * self.dim();
        if values.len() > capacity {
            return Err(StreamError::OutOfBounds {
                offset: 0,
                num: values.len(),
                available: capacity,
            });
        }
        for (chunk, value) in self.as_bytes_mut().chunks_exact_mut(T::BYTES).zip(values) {
            value.write_ne(chunk);
        }
        Ok(())
    }

    /// Set every value of the logical extent to `value`.
    fn fill<T: Sample>(&mut self, value: T) -> Result<(), StreamError> {
        self.format().check_type::<T>()?;
        for chunk in self.as_bytes_mut().chunks_exact_mut(T::BYTES) {
            value.write_ne(chunk);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_bytes_is_dim_times_byte() {
        let format = StreamFormat::of::<f32>(3, 100.0);
        assert_eq!(format.sample_bytes(), 12);
        assert_eq!(format.bytes_for(10), 120);
    }

    #[test]
    fn compatibility_ignores_rate() {
        let a = StreamFormat::of::<i16>(2, 16000.0);
        let b = StreamFormat::of::<i16>(2, 8000.0);
        let c = StreamFormat::of::<i32>(2, 16000.0);
        assert!(a.is_compatible(&b));
        assert!(!a.is_compatible(&c));
    }

    #[test]
    fn buffers_and_views_compare_layouts() {
        use crate::buffer::StreamBuffer;

        let a = StreamBuffer::with_len(4, StreamFormat::of::<f32>(2, 10.0));
        let b = StreamBuffer::with_len(1, StreamFormat::of::<f32>(2, 44.1));
        let c = StreamBuffer::with_len(4, StreamFormat::of::<f32>(3, 10.0));
        assert!(a.is_compatible(&b.as_view()));
        assert!(!a.is_compatible(&c));
    }

    #[test]
    fn zero_rate_has_no_time_axis() {
        assert!(!StreamFormat::of::<f32>(1, 0.0).has_time_axis());
        assert!(StreamFormat::of::<f32>(1, 25.0).has_time_axis());
    }
}
