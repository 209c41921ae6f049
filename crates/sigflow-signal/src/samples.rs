//! Sample-size strings.
//!
//! Frame, delta and context lengths are configured as text and resolved
//! against the rate of the stream they window:
//!
//! | Text     | Meaning                                   |
//! |----------|-------------------------------------------|
//! | `"512"`  | 512 samples                               |
//! | `"0.5s"` | half a second                             |
//! | `"20ms"` | twenty milliseconds                       |
//! | `"0.5"`  | half a second, with a warning on the sink |
//!
//! Time-based lengths round half up: `samples = trunc(seconds * sr + 0.5)`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::diagnostics::DiagnosticSink;
use crate::error::SignalError;

/// Why a sample-size string was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecError {
    #[error("empty sample size")]
    Empty,

    #[error("'{0}' is not a sample count or a duration")]
    Invalid(String),

    #[error("a duration needs a stream with a sample rate")]
    NoTimeAxis,
}

/// A parsed sample-size string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleSpec {
    Samples(usize),
    Seconds(f64),
    Milliseconds(f64),
}

impl SampleSpec {
    /// Resolve to a sample count at rate `sr`.
    ///
    /// # Errors
    ///
    /// [`SpecError::NoTimeAxis`] when a duration meets `sr <= 0`.
    pub fn to_samples(self, sr: f64) -> Result<usize, SpecError> {
        let seconds = match self {
            SampleSpec::Samples(n) => return Ok(n),
            SampleSpec::Seconds(s) => s,
            SampleSpec::Milliseconds(ms) => ms / 1000.0,
        };
        if sr <= 0.0 {
            return Err(SpecError::NoTimeAxis);
        }
        Ok(round_half_up(seconds * sr))
    }

    /// True when `text` is a decimal number without a unit, which is read as
    /// seconds but deserves a warning.
    pub fn is_unitless_duration(text: &str) -> bool {
        let text = text.trim();
        !text.ends_with('s') && text.contains('.')
    }
}

impl FromStr for SampleSpec {
    type Err = SpecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SpecError::Empty);
        }
        let invalid = || SpecError::Invalid(text.to_string());

        if let Some(ms) = text.strip_suffix("ms") {
            return parse_duration(ms).map(SampleSpec::Milliseconds).ok_or_else(invalid);
        }
        if let Some(s) = text.strip_suffix('s') {
            return parse_duration(s).map(SampleSpec::Seconds).ok_or_else(invalid);
        }
        if text.contains('.') {
            return parse_duration(text).map(SampleSpec::Seconds).ok_or_else(invalid);
        }
        text.parse::<usize>()
            .map(SampleSpec::Samples)
            .map_err(|_| invalid())
    }
}

impl fmt::Display for SampleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleSpec::Samples(n) => write!(f, "{n}"),
            SampleSpec::Seconds(s) => write!(f, "{s}s"),
            SampleSpec::Milliseconds(ms) => write!(f, "{ms}ms"),
        }
    }
}

fn parse_duration(text: &str) -> Option<f64> {
    let value: f64 = text.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// `trunc(x + 0.5)` for non-negative `x`.
pub(crate) fn round_half_up(x: f64) -> usize {
    if x <= 0.0 { 0 } else { (x + 0.5) as usize }
}

/// Parse `text` and resolve it against `sr`, reporting problems on `sink`.
///
/// `field` names the setting in messages (`"frame"`, `"delta"`, ...).
///
/// # Errors
///
/// [`SignalError::Parse`] when the text is malformed or names a duration on a
/// stream without a time axis.  A warning is emitted on `sink` first.
pub fn resolve_samples(
    field: &'static str,
    text: &str,
    sr: f64,
    sink: &dyn DiagnosticSink,
) -> Result<usize, SignalError> {
    let resolved = text.parse::<SampleSpec>().and_then(|spec| spec.to_samples(sr));
    match resolved {
        Ok(samples) => {
            if SampleSpec::is_unitless_duration(text) {
                let message = format!(
                    "string '{text}' will be interpreted as seconds (add a 's' to omit warning)"
                );
                sink.warn(field, &message);
            }
            Ok(samples)
        }
        Err(source) => {
            sink.warn(field, &format!("could not parse {field} '{text}': {source}"));
            Err(SignalError::Parse {
                field,
                text: text.to_string(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemorySink;

    #[test]
    fn bare_integer_is_a_sample_count() {
        assert_eq!("512".parse::<SampleSpec>().unwrap(), SampleSpec::Samples(512));
        assert_eq!(SampleSpec::Samples(512).to_samples(0.0).unwrap(), 512);
    }

    #[test]
    fn suffixes_select_the_unit() {
        assert_eq!("1.5s".parse::<SampleSpec>().unwrap(), SampleSpec::Seconds(1.5));
        assert_eq!("20ms".parse::<SampleSpec>().unwrap(), SampleSpec::Milliseconds(20.0));
        assert_eq!("2s".parse::<SampleSpec>().unwrap(), SampleSpec::Seconds(2.0));
    }

    #[test]
    fn durations_round_half_up() {
        assert_eq!(SampleSpec::Seconds(1.0).to_samples(10.0).unwrap(), 10);
        assert_eq!(SampleSpec::Seconds(0.25).to_samples(10.0).unwrap(), 3);
        assert_eq!(SampleSpec::Milliseconds(30.0).to_samples(100.0).unwrap(), 3);
        assert_eq!(SampleSpec::Milliseconds(24.0).to_samples(100.0).unwrap(), 2);
    }

    #[test]
    fn duration_without_rate_is_rejected() {
        assert_eq!(SampleSpec::Seconds(1.0).to_samples(0.0), Err(SpecError::NoTimeAxis));
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert_eq!("".parse::<SampleSpec>(), Err(SpecError::Empty));
        assert!("abc".parse::<SampleSpec>().is_err());
        assert!("ms".parse::<SampleSpec>().is_err());
        assert!("-1s".parse::<SampleSpec>().is_err());
        assert!("-4".parse::<SampleSpec>().is_err());
    }

    #[test]
    fn display_round_trips_the_unit() {
        assert_eq!(SampleSpec::Milliseconds(20.0).to_string(), "20ms");
        assert_eq!(SampleSpec::Samples(7).to_string(), "7");
    }

    #[test]
    fn unitless_decimal_warns_but_resolves() {
        let sink = MemorySink::default();
        assert_eq!(resolve_samples("frame", "0.5", 20.0, &sink).unwrap(), 10);
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("add a 's' to omit warning"));
    }

    #[test]
    fn parse_failure_warns_and_is_recoverable() {
        let sink = MemorySink::default();
        let err = resolve_samples("delta", "lots", 20.0, &sink).unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(sink.messages().len(), 1);
        assert!(sink.messages()[0].contains("delta"));
    }

    #[test]
    fn plain_count_does_not_warn() {
        let sink = MemorySink::default();
        assert_eq!(resolve_samples("frame", "10", 0.0, &sink).unwrap(), 10);
        assert!(sink.messages().is_empty());
    }
}
