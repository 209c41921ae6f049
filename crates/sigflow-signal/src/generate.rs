//! Synthetic test signals over `Float` streams.
//!
//! [`series`] lays down a time ramp in every dimension; [`sine`] and
//! [`cosine`] map that ramp through a per-dimension oscillator; [`random`]
//! overwrites it with uniform noise.  [`sum`] collapses the dimensions into
//! one.  Chained, they build mixtures:
//!
//! ```rust
//! use sigflow_signal::generate::{series, sine, sum};
//! use sigflow_types::{Stream, StreamBuffer, StreamFormat};
//!
//! let mut s = StreamBuffer::new(StreamFormat::of::<f32>(2, 100.0));
//! series(&mut s, 1.0, 0.0).unwrap();
//! sine(&mut s, &[5.0, 12.0], &[1.0, 0.5]).unwrap();
//! sum(&mut s).unwrap();
//! assert_eq!(s.num(), 100);
//! assert_eq!(s.dim(), 1);
//! ```

use std::f64::consts::PI;

use rand::Rng;
use sigflow_types::{SampleType, Stream, StreamBuffer, StreamError, StreamFormat, StreamMut};

use crate::error::SignalError;

/// Resize `stream` to `duration` seconds and fill each dimension with the
/// sample times `offset, offset + 1/sr, ...`.
///
/// # Errors
///
/// - [`SignalError::MissingSampleRate`] when the stream has no time axis.
/// - [`SignalError::InsufficientData`] when `duration` covers no sample.
/// - [`SignalError::Stream`] when the stream is not `Float`.
pub fn series(stream: &mut StreamBuffer, duration: f64, offset: f32) -> Result<(), SignalError> {
    if stream.sample_type() != SampleType::Float {
        return Err(StreamError::TypeMismatch {
            expected: SampleType::Float,
            actual: stream.sample_type(),
        }
        .into());
    }
    let sr = stream.sr();
    if sr <= 0.0 {
        return Err(SignalError::MissingSampleRate { context: "series" });
    }
    let number = if duration > 0.0 {
        (duration * sr + 1e-9) as usize
    } else {
        0
    };
    if number == 0 {
        return Err(SignalError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    let dim = stream.dim();
    let step = 1.0 / sr;
    let values: Vec<f32> = (0..number)
        .flat_map(|i| std::iter::repeat_n(offset + (i as f64 * step) as f32, dim))
        .collect();
    stream.adjust(number);
    stream.write_values(&values)?;
    Ok(())
}

/// Replace every value `t` of dimension `j` by `amplitudes[j] * sin(2π f_j t)`.
///
/// # Errors
///
/// [`SignalError::Stream`] when the stream is not `Float` or the parameter
/// lists do not have one entry per dimension.
pub fn sine(
    stream: &mut StreamBuffer,
    frequencies: &[f64],
    amplitudes: &[f32],
) -> Result<(), SignalError> {
    oscillate(stream, frequencies, amplitudes, f64::sin)
}

/// Replace every value `t` of dimension `j` by `amplitudes[j] * cos(2π f_j t)`.
///
/// # Errors
///
/// As [`sine`].
pub fn cosine(
    stream: &mut StreamBuffer,
    frequencies: &[f64],
    amplitudes: &[f32],
) -> Result<(), SignalError> {
    oscillate(stream, frequencies, amplitudes, f64::cos)
}

/// Overwrite every value with uniform noise in `[0, 1)`.
///
/// The sample count is left as is, so size the stream first (usually with
/// [`series`]).
///
/// # Errors
///
/// [`SignalError::Stream`] when the stream is not `Float`.
pub fn random(stream: &mut StreamBuffer) -> Result<(), SignalError> {
    random_with(stream, &mut rand::rng())
}

/// [`random`] drawing from a caller-supplied generator.
pub fn random_with<R: Rng + ?Sized>(
    stream: &mut StreamBuffer,
    rng: &mut R,
) -> Result<(), SignalError> {
    let count = stream.values::<f32>()?.len();
    let noise: Vec<f32> = (0..count).map(|_| rng.random::<f32>()).collect();
    stream.write_values(&noise)?;
    Ok(())
}

/// Collapse all dimensions into one holding their per-sample sum.
///
/// # Errors
///
/// [`SignalError::Stream`] when the stream is not `Float`.
pub fn sum(stream: &mut StreamBuffer) -> Result<(), SignalError> {
    let dim = stream.dim();
    let values = stream.values::<f32>()?;
    let sums: Vec<f32> = if dim == 0 {
        vec![0.0; stream.num()]
    } else {
        values.chunks_exact(dim).map(|sample| sample.iter().sum()).collect()
    };
    let mut summed = StreamBuffer::with_len(stream.num(), StreamFormat::of::<f32>(1, stream.sr()));
    summed.write_values(&sums)?;
    summed.set_time(stream.time());
    *stream = summed;
    Ok(())
}

fn oscillate(
    stream: &mut StreamBuffer,
    frequencies: &[f64],
    amplitudes: &[f32],
    wave: fn(f64) -> f64,
) -> Result<(), SignalError> {
    let dim = stream.dim();
    for len in [frequencies.len(), amplitudes.len()] {
        if len != dim {
            return Err(StreamError::ShapeMismatch { len, dim }.into());
        }
    }
    let values = stream.values::<f32>()?;
    let waves: Vec<f32> = values
        .iter()
        .enumerate()
        .map(|(i, &t)| {
            let j = i % dim;
            amplitudes[j] * wave(2.0 * PI * frequencies[j] * t as f64) as f32
        })
        .collect();
    stream.write_values(&waves)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_stream(dim: usize, sr: f64) -> StreamBuffer {
        StreamBuffer::new(StreamFormat::of::<f32>(dim, sr))
    }

    #[test]
    fn series_is_a_time_ramp_in_every_dimension() {
        let mut s = float_stream(2, 4.0);
        series(&mut s, 1.0, 10.0).unwrap();
        assert_eq!(s.num(), 4);
        assert_eq!(
            s.values::<f32>().unwrap(),
            vec![10.0, 10.0, 10.25, 10.25, 10.5, 10.5, 10.75, 10.75]
        );
    }

    #[test]
    fn series_needs_at_least_one_sample() {
        let mut s = float_stream(1, 10.0);
        assert!(matches!(
            series(&mut s, 0.05, 0.0),
            Err(SignalError::InsufficientData { .. })
        ));
        assert!(series(&mut float_stream(1, 0.0), 1.0, 0.0).is_err());
    }

    #[test]
    fn series_rejects_non_float_streams() {
        let mut s = StreamBuffer::new(StreamFormat::of::<i16>(1, 10.0));
        assert!(matches!(series(&mut s, 1.0, 0.0), Err(SignalError::Stream(_))));
    }

    #[test]
    fn sine_and_cosine_apply_per_dimension_parameters() {
        let mut s = float_stream(2, 4.0);
        series(&mut s, 1.0, 0.0).unwrap();
        sine(&mut s, &[1.0, 1.0], &[1.0, 2.0]).unwrap();
        // t = 0.25 s at 1 Hz is a quarter period.
        assert!((s.value::<f32>(1, 0).unwrap() - 1.0).abs() < 1e-6);
        assert!((s.value::<f32>(1, 1).unwrap() - 2.0).abs() < 1e-6);

        let mut c = float_stream(1, 4.0);
        series(&mut c, 1.0, 0.0).unwrap();
        cosine(&mut c, &[1.0], &[3.0]).unwrap();
        assert!((c.value::<f32>(0, 0).unwrap() - 3.0).abs() < 1e-6);
        assert!((c.value::<f32>(2, 0).unwrap() + 3.0).abs() < 1e-6);
    }

    #[test]
    fn oscillator_parameters_must_match_dimensions() {
        let mut s = float_stream(2, 4.0);
        series(&mut s, 1.0, 0.0).unwrap();
        assert!(sine(&mut s, &[1.0], &[1.0, 1.0]).is_err());
        assert!(cosine(&mut s, &[1.0, 2.0], &[1.0]).is_err());
    }

    #[test]
    fn random_fills_every_value_in_the_unit_interval() {
        let mut s = float_stream(3, 50.0);
        series(&mut s, 2.0, 100.0).unwrap();
        random(&mut s).unwrap();
        assert_eq!(s.num(), 100);
        assert_eq!(s.dim(), 3);
        let values = s.values::<f32>().unwrap();
        assert_eq!(values.len(), 300);
        assert!(values.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut a = float_stream(2, 10.0);
        series(&mut a, 1.0, 0.0).unwrap();
        let mut b = a.clone();
        random_with(&mut a, &mut StdRng::seed_from_u64(7)).unwrap();
        random_with(&mut b, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn random_rejects_non_float_streams() {
        let mut s = StreamBuffer::from_values(&[1i32, 2], 1, 10.0).unwrap();
        assert!(matches!(random(&mut s), Err(SignalError::Stream(_))));
        assert_eq!(s.values::<i32>().unwrap(), vec![1, 2]);
    }

    #[test]
    fn sum_collapses_dimensions() {
        let mut s = StreamBuffer::from_values(&[1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 8.0).unwrap();
        sum(&mut s).unwrap();
        assert_eq!(s.dim(), 1);
        assert_eq!(s.sr(), 8.0);
        assert_eq!(s.values::<f32>().unwrap(), vec![6.0, 15.0]);
    }
}
