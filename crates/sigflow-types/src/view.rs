//! Borrowed windows onto a stream's storage.
//!
//! A view never owns or reallocates memory.  It carries its own logical
//! extent (`num`) and the real capacity remaining from its first sample
//! (`num_real`), so nested windows stay bounds-checked against the
//! underlying allocation.

use crate::StreamError;
use crate::buffer::StreamBuffer;
use crate::format::{Stream, StreamFormat, StreamMut};

// ────────────────────────────────────────────────────────────────────────────
// StreamView
// ────────────────────────────────────────────────────────────────────────────

/// Read-only window onto samples owned elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct StreamView<'a> {
    format: StreamFormat,
    num: usize,
    num_real: usize,
    time: f64,
    /// Real storage from the first sample to the end of the allocation.
    data: &'a [u8],
}

impl<'a> StreamView<'a> {
    /// Build a view over `data`, which must hold at least `num_real` samples.
    pub(crate) fn new(
        format: StreamFormat,
        num: usize,
        num_real: usize,
        time: f64,
        data: &'a [u8],
    ) -> Self {
        debug_assert!(num <= num_real);
        debug_assert!(data.len() >= format.bytes_for(num_real));
        Self {
            format,
            num,
            num_real,
            time,
            data: &data[..format.bytes_for(num_real)],
        }
    }

    /// A view with no samples and no storage, used to signal "no data yet".
    pub fn empty(format: StreamFormat) -> Self {
        Self {
            format,
            num: 0,
            num_real: 0,
            time: 0.0,
            data: &[],
        }
    }

    /// Narrow this view to `num` samples starting `offset` samples in.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::OutOfBounds`] when the window reaches past the
    /// real capacity of this view.
    pub fn window(&self, offset: usize, num: usize) -> Result<StreamView<'a>, StreamError> {
        match offset.checked_add(num) {
            Some(end) if end <= self.num_real => {}
            _ => {
                return Err(StreamError::OutOfBounds {
                    offset,
                    num,
                    available: self.num_real,
                });
            }
        }
        let time = if self.format.has_time_axis() {
            self.time + offset as f64 / self.format.sr
        } else {
            self.time
        };
        Ok(StreamView::new(
            self.format,
            num,
            self.num_real - offset,
            time,
            &self.data[self.format.bytes_for(offset)..],
        ))
    }

    /// Deep-copy the logical extent into a new owning buffer.
    pub fn to_owned_buffer(&self) -> StreamBuffer {
        let mut buffer = StreamBuffer::with_len(self.num, self.format);
        buffer.as_bytes_mut().copy_from_slice(self.as_bytes());
        buffer.set_time(self.time);
        buffer
    }
}

impl Stream for StreamView<'_> {
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

// ────────────────────────────────────────────────────────────────────────────
// StreamViewMut
// ────────────────────────────────────────────────────────────────────────────

/// Writable window onto samples owned elsewhere.
#[derive(Debug)]
pub struct StreamViewMut<'a> {
    format: StreamFormat,
    num: usize,
    num_real: usize,
    time: f64,
    data: &'a mut [u8],
}

impl<'a> StreamViewMut<'a> {
    pub(crate) fn new(
        format: StreamFormat,
        num: usize,
        num_real: usize,
        time: f64,
        data: &'a mut [u8],
    ) -> Self {
        debug_assert!(num <= num_real);
        let real = format.bytes_for(num_real);
        Self {
            format,
            num,
            num_real,
            time,
            data: &mut data[..real],
        }
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> StreamView<'_> {
        StreamView::new(self.format, self.num, self.num_real, self.time, &self.data[..])
    }
}

impl Stream for StreamViewMut<'_> {
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

impl StreamMut for StreamViewMut<'_> {
    fn as_bytes_mut(&mut self) -> &mut [u8] {
        let tot = self.format.bytes_for(self.num);
        &mut self.data[..tot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_view_has_no_extent() {
        let v = StreamView::empty(StreamFormat::of::<f64>(3, 25.0));
        assert_eq!(v.num(), 0);
        assert_eq!(v.num_real(), 0);
        assert_eq!(v.tot(), 0);
        assert_eq!(v.dim(), 3);
        assert!(v.values::<f64>().unwrap().is_empty());
    }

    #[test]
    fn nested_window_is_checked_against_remaining_capacity() {
        let b = StreamBuffer::from_values(&[0u8, 1, 2, 3, 4, 5, 6, 7], 1, 0.0).unwrap();
        let outer = b.view(4, 2).unwrap();
        assert_eq!(outer.num_real(), 4);

        let inner = outer.window(1, 3).unwrap();
        assert_eq!(inner.values::<u8>().unwrap(), vec![5, 6, 7]);
        assert!(outer.window(2, 3).is_err());
    }

    #[test]
    fn to_owned_buffer_is_independent() {
        let b = StreamBuffer::from_values(&[1.0f32, 2.0, 3.0], 1, 1.0).unwrap();
        let owned = b.view(1, 2).unwrap().to_owned_buffer();
        assert_eq!(owned.num(), 2);
        assert_eq!(owned.num_real(), 2);
        assert_eq!(owned.values::<f32>().unwrap(), vec![2.0, 3.0]);
        assert!((owned.time() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mut_view_reborrows_as_read_view() {
        let mut b = StreamBuffer::from_values(&[1i64, 2, 3], 1, 0.0).unwrap();
        let mut v = b.view_mut(0, 3).unwrap();
        v.set_value(2, 0, 30i64).unwrap();
        assert_eq!(v.as_view().values::<i64>().unwrap(), vec![1, 2, 30]);
    }
}
