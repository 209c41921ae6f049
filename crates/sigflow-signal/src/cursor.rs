//! Windowing Cursor.
//!
//! A cursor is computed once per invocation from the input length, the frame
//! step and the extra `delta` look-ahead.  It owns the stride arithmetic: the
//! drivers only ask for the sample offset and start time of window `i`.
//!
//! ```text
//! input:  |<- frame ->|<- frame ->|<- frame ->|  ...
//! window 0 [ frame + delta ]
//! window 1             [ frame + delta ]
//! ```

use crate::error::SignalError;

/// Precomputed window geometry over one stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowCursor {
    frame: usize,
    delta: usize,
    max_shift: usize,
    sr: f64,
}

/// One step of the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub index: usize,
    /// First sample of the window in the input stream.
    pub offset: usize,
    /// Start time in seconds (`index * frame / sr`).
    pub time: f64,
}

impl WindowCursor {
    /// Cursor over `num` samples: `max_shift = (num - delta) / frame`.
    ///
    /// # Errors
    ///
    /// - [`SignalError::ZeroFrame`] when `frame == 0`.
    /// - [`SignalError::InsufficientData`] when `num < frame + delta`.
    pub fn new(num: usize, frame: usize, delta: usize, sr: f64) -> Result<Self, SignalError> {
        if frame == 0 {
            return Err(SignalError::ZeroFrame);
        }
        let window = frame + delta;
        if num < window {
            return Err(SignalError::InsufficientData {
                required: window,
                actual: num,
            });
        }
        Ok(Self {
            frame,
            delta,
            max_shift: (num - delta) / frame,
            sr,
        })
    }

    /// Cursor bounded by the shortest of several co-running streams.
    ///
    /// Stricter than [`WindowCursor::new`]: the limit must exceed the window
    /// length.
    pub fn bounded(limit: usize, frame: usize, delta: usize, sr: f64) -> Result<Self, SignalError> {
        let window = frame + delta;
        if frame > 0 && limit <= window {
            return Err(SignalError::InsufficientData {
                required: window + 1,
                actual: limit,
            });
        }
        Self::new(limit, frame, delta, sr)
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn delta(&self) -> usize {
        self.delta
    }

    /// Samples seen by one window (`frame + delta`).
    pub fn sample_window(&self) -> usize {
        self.frame + self.delta
    }

    /// Number of windows.
    pub fn max_shift(&self) -> usize {
        self.max_shift
    }

    /// First input sample of window `index`.
    pub fn offset(&self, index: usize) -> usize {
        index * self.frame
    }

    /// Start time of window `index`, or `0.0` without a time axis.
    pub fn time(&self, index: usize) -> f64 {
        self.seconds(index * self.frame)
    }

    /// Length of one window in seconds, or `0.0` without a time axis.
    pub fn duration(&self) -> f64 {
        self.seconds(self.sample_window())
    }

    /// Windows in ascending time order.
    pub fn windows(&self) -> impl Iterator<Item = Window> + '_ {
        (0..self.max_shift).map(move |index| Window {
            index,
            offset: self.offset(index),
            time: self.time(index),
        })
    }

    fn seconds(&self, samples: usize) -> f64 {
        if self.sr > 0.0 {
            samples as f64 / self.sr
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_count_floors_remaining_samples() {
        let c = WindowCursor::new(100, 10, 0, 10.0).unwrap();
        assert_eq!(c.max_shift(), 10);

        let c = WindowCursor::new(25, 10, 3, 10.0).unwrap();
        assert_eq!(c.max_shift(), 2);
        assert_eq!(c.sample_window(), 13);
    }

    #[test]
    fn exact_fit_yields_one_window() {
        let c = WindowCursor::new(13, 10, 3, 1.0).unwrap();
        assert_eq!(c.max_shift(), 1);
    }

    #[test]
    fn short_input_is_insufficient() {
        let err = WindowCursor::new(5, 10, 0, 1.0).unwrap_err();
        assert_eq!(
            err,
            SignalError::InsufficientData {
                required: 10,
                actual: 5
            }
        );
    }

    #[test]
    fn bounded_requires_strictly_more_than_one_window() {
        assert!(WindowCursor::bounded(13, 10, 3, 1.0).is_err());
        assert_eq!(WindowCursor::bounded(14, 10, 3, 1.0).unwrap().max_shift(), 1);
    }

    #[test]
    fn zero_frame_is_rejected() {
        assert_eq!(WindowCursor::new(10, 0, 0, 1.0), Err(SignalError::ZeroFrame));
    }

    #[test]
    fn windows_carry_offset_and_time() {
        let c = WindowCursor::new(40, 10, 5, 20.0).unwrap();
        let windows: Vec<_> = c.windows().collect();
        assert_eq!(windows.len(), 3);
        assert_eq!(windows[2].offset, 20);
        assert!((windows[2].time - 1.0).abs() < 1e-12);
        assert!((c.duration() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn no_time_axis_gives_zero_times() {
        let c = WindowCursor::new(30, 10, 0, 0.0).unwrap();
        assert!(c.windows().all(|w| w.time == 0.0));
        assert_eq!(c.duration(), 0.0);
    }
}
