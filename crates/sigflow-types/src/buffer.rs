//! [`StreamBuffer`] – the owning, growable sample buffer.
//!
//! A buffer keeps two extents: the logical one (`num`/`tot`) and the real
//! allocation (`num_real`/`tot_real`).  Shrinking only moves the logical
//! extent; the allocation is replaced only when a request grows past
//! `num_real`.
//!
//! Windows over a buffer are handed out as [`StreamView`]/[`StreamViewMut`]
//! borrows, so the buffer's own fields are never touched while a window is
//! alive.
//!
//! # Example
//!
//! ```rust
//! use sigflow_types::{Stream, StreamBuffer};
//!
//! let mut stream = StreamBuffer::from_values(&[1i32, 2, 3, 4, 5, 6], 2, 10.0).unwrap();
//! assert_eq!(stream.num(), 3);
//!
//! let window = stream.view(1, 2).unwrap();
//! assert_eq!(window.values::<i32>().unwrap(), vec![3, 4, 5, 6]);
//!
//! stream.adjust(1);
//! assert_eq!(stream.num(), 1);
//! assert_eq!(stream.num_real(), 3);
//! ```

use std::fmt;

use crate::StreamError;
use crate::format::{Stream, StreamFormat, StreamMut};
use crate::header::StreamHeader;
use crate::sample::{Sample, SampleType};
use crate::view::{StreamView, StreamViewMut};

/// Outcome of [`StreamBuffer::adjust`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// The requested count equals the current one.
    Unchanged,
    /// Only the logical extent moved; the allocation was kept.
    Resized,
    /// A new allocation of exactly the requested size replaced the old one.
    Reallocated,
}

/// An owning buffer of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamBuffer {
    format: StreamFormat,
    num: usize,
    num_real: usize,
    time: f64,
    /// Real storage; its length is always `tot_real`.
    data: Vec<u8>,
}

impl StreamBuffer {
    /// Create an empty buffer (`num == num_real == 0`).
    pub fn new(format: StreamFormat) -> Self {
        Self {
            format,
            num: 0,
            num_real: 0,
            time: 0.0,
            data: Vec::new(),
        }
    }

    /// Create a buffer holding `num` zeroed samples.
    pub fn with_len(num: usize, format: StreamFormat) -> Self {
        Self {
            format,
            num,
            num_real: num,
            time: 0.0,
            data: vec![0u8; format.bytes_for(num)],
        }
    }

    /// Build a buffer from sample-major `values` with `dim` values per sample.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::ShapeMismatch`] when `dim` is zero or
    /// `values.len()` is not a multiple of `dim`.
    pub fn from_values<T: Sample>(values: &[T], dim: usize, sr: f64) -> Result<Self, StreamError> {
        if dim == 0 || values.len() % dim != 0 {
            return Err(StreamError::ShapeMismatch {
                len: values.len(),
                dim,
            });
        }
        let mut buffer = Self::with_len(values.len() / dim, StreamFormat::of::<T>(dim, sr));
        buffer.write_values(values)?;
        Ok(buffer)
    }

    /// Rebuild a buffer from a persisted header.  The contents are zeroed.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InconsistentHeader`] if the header's size
    /// fields disagree with each other.
    pub fn from_header(header: &StreamHeader) -> Result<Self, StreamError> {
        header.validate()?;
        let format = StreamFormat::new(header.dim, header.byte, header.sample_type, header.sr);
        let mut data = Vec::new();
        data.try_reserve_exact(header.tot_real).map_err(|_| {
            StreamError::InconsistentHeader(format!(
                "tot_real {} cannot be allocated",
                header.tot_real
            ))
        })?;
        data.resize(header.tot_real, 0u8);
        Ok(Self {
            format,
            num: header.num,
            num_real: header.num_real,
            time: header.time,
            data,
        })
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Change the logical sample count.
    ///
    /// Requests up to `num_real` only move the logical extent.  Larger
    /// requests replace the allocation with one of exactly `new_num` samples;
    /// contents beyond the old logical extent are zeroed and callers that
    /// must keep data across growth should not rely on anything past `num`.
    pub fn adjust(&mut self, new_num: usize) -> Adjustment {
        if new_num == self.num {
            return Adjustment::Unchanged;
        }
        if new_num <= self.num_real {
            self.num = new_num;
            return Adjustment::Resized;
        }
        let mut data = vec![0u8; self.format.bytes_for(new_num)];
        let keep = self.tot();
        data[..keep].copy_from_slice(&self.data[..keep]);
        self.data = data;
        self.num = new_num;
        self.num_real = new_num;
        Adjustment::Reallocated
    }

    /// Release the allocation; the format is kept.
    pub fn reset(&mut self) {
        self.num = 0;
        self.num_real = 0;
        self.data = Vec::new();
    }

    /// Zero every byte of the real allocation.
    pub fn zero(&mut self) {
        self.data.fill(0);
    }

    /// Borrow `num` samples starting at sample `offset`.
    ///
    /// The view's `num_real` is the real capacity remaining from `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::OutOfBounds`] when the window reaches past the
    /// real allocation.
    pub fn view(&self, offset: usize, num: usize) -> Result<StreamView<'_>, StreamError> {
        self.check_window(offset, num)?;
        let start = self.format.bytes_for(offset);
        Ok(StreamView::new(
            self.format,
            num,
            self.num_real - offset,
            self.time_at(offset),
            &self.data[start..],
        ))
    }

    /// Mutable counterpart of [`StreamBuffer::view`].
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::OutOfBounds`] when the window reaches past the
    /// real allocation.
    pub fn view_mut(
        &mut self,
        offset: usize,
        num: usize,
    ) -> Result<StreamViewMut<'_>, StreamError> {
        self.check_window(offset, num)?;
        let start = self.format.bytes_for(offset);
        let time = self.time_at(offset);
        Ok(StreamViewMut::new(
            self.format,
            num,
            self.num_real - offset,
            time,
            &mut self.data[start..],
        ))
    }

    /// View of the full logical extent.
    pub fn as_view(&self) -> StreamView<'_> {
        StreamView::new(self.format, self.num, self.num_real, self.time, &self.data)
    }

    /// Mutable view of the full logical extent.
    pub fn as_view_mut(&mut self) -> StreamViewMut<'_> {
        StreamViewMut::new(self.format, self.num, self.num_real, self.time, &mut self.data)
    }

    /// Deep copy of samples `from..to` into a new buffer sized exactly to the
    /// range.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::OutOfBounds`] if the range is reversed or ends
    /// past the logical extent.
    pub fn copy_range(&self, from: usize, to: usize) -> Result<StreamBuffer, StreamError> {
        if from > to || to > self.num {
            return Err(StreamError::OutOfBounds {
                offset: from,
                num: to.saturating_sub(from),
                available: self.num,
            });
        }
        let start = self.format.bytes_for(from);
        let end = self.format.bytes_for(to);
        let mut copy = Self::with_len(to - from, self.format);
        copy.data.copy_from_slice(&self.data[start..end]);
        copy.time = self.time_at(from);
        Ok(copy)
    }

    /// Append the logical extent of `other`.
    ///
    /// Spare capacity is reused when it fits; otherwise the allocation is
    /// replaced by one sized exactly to the concatenation.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Incompatible`] when the sample layouts differ.
    pub fn append<S: Stream>(&mut self, other: &S) -> Result<(), StreamError> {
        if !self.format.is_compatible(&other.format()) {
            return Err(StreamError::Incompatible {
                left: describe(&self.format),
                right: describe(&other.format()),
            });
        }
        let old_tot = self.tot();
        let new_num = self.num + other.num();
        if new_num > self.num_real {
            let mut data = vec![0u8; self.format.bytes_for(new_num)];
            data[..old_tot].copy_from_slice(&self.data[..old_tot]);
            self.data = data;
            self.num_real = new_num;
        }
        self.data[old_tot..old_tot + other.tot()].copy_from_slice(other.as_bytes());
        self.num = new_num;
        Ok(())
    }

    /// Copy out the dimensions listed in `dims`, in that order.
    ///
    /// An empty list returns a full copy.  Indices past the last dimension are
    /// clamped to it.
    pub fn select(&self, dims: &[usize]) -> StreamBuffer {
        if dims.is_empty() {
            return self.clone();
        }
        let last = self.format.dim.saturating_sub(1);
        let byte = self.format.byte;
        let format = StreamFormat {
            dim: dims.len(),
            ..self.format
        };
        let mut out = Self::with_len(self.num, format);
        out.time = self.time;
        if self.format.sample_bytes() == 0 {
            return out;
        }
        let in_width = self.format.sample_bytes();
        let out_width = format.sample_bytes();
        for (src, dst) in self
            .as_bytes()
            .chunks_exact(in_width)
            .zip(out.data.chunks_exact_mut(out_width))
        {
            for (slot, &d) in dims.iter().enumerate() {
                let d = d.min(last);
                dst[slot * byte..(slot + 1) * byte].copy_from_slice(&src[d * byte..(d + 1) * byte]);
            }
        }
        out
    }

    fn check_window(&self, offset: usize, num: usize) -> Result<(), StreamError> {
        match offset.checked_add(num) {
            Some(end) if end <= self.num_real => Ok(()),
            _ => Err(StreamError::OutOfBounds {
                offset,
                num,
                available: self.num_real,
            }),
        }
    }

    fn time_at(&self, offset: usize) -> f64 {
        if self.format.has_time_axis() {
            self.time + offset as f64 / self.format.sr
        } else {
            self.time
        }
    }
}

fn describe(format: &StreamFormat) -> String {
    format!("{}x{} {}", format.dim, format.byte, format.sample_type)
}

impl Stream for StreamBuffer {
    fn format(&self) -> StreamFormat {
        self.format
    }

    fn num(&self) -> usize {
        self.num
    }

    fn num_real(&self) -> usize {
        self.num_real
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data[..self.format.bytes_for(self.num)]
    }
}

impl StreamMut for StreamBuffer {
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        let tot = self.format.bytes_for(self.num);
        &mut self.data[..tot]
    }
}

impl Default for StreamBuffer {
    fn default() -> Self {
        Self::new(StreamFormat::new(0, 0, SampleType::Undef, 0.0))
    }
}

impl fmt::Display for StreamBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rate\t= {} hz", self.format.sr)?;
        writeln!(f, "dim\t= {}", self.format.dim)?;
        writeln!(f, "bytes\t= {}", self.format.byte)?;
        writeln!(f, "num\t= {} ({})", self.num, self.num_real)?;
        writeln!(f, "dur\t= {} s", self.duration())?;
        writeln!(f, "time\t= {} s", self.time)?;
        write!(f, "type\t= {}", self.format.sample_type)
    }
}
