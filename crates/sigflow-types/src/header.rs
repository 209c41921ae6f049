//! Serialisable stream header.
//!
//! The header is the wire layout shared with components that persist or
//! transmit streams: `num, num_real, dim, byte, type, sr, tot, tot_real`
//! followed by the start `time`.  The data pointer is never serialised.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::StreamError;
use crate::sample::SampleType;

/// Size bookkeeping of a stream, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StreamHeader {
    /// Logical sample count.
    pub num: usize,
    /// Allocated sample count.
    pub num_real: usize,
    /// Values per sample.
    pub dim: usize,
    /// Bytes per value.
    pub byte: usize,
    /// Scalar kind.
    #[serde(rename = "type")]
    pub sample_type: SampleType,
    /// Sample rate in Hz.
    pub sr: f64,
    /// `num * dim * byte`.
    pub tot: usize,
    /// `num_real * dim * byte`.
    pub tot_real: usize,
    /// Start time of the first sample in seconds.
    #[serde(default)]
    pub time: f64,
}

impl StreamHeader {
    /// Check the size invariants a header must satisfy before a buffer can be
    /// built from it.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InconsistentHeader`] naming the first violated
    /// relation.
    pub fn validate(&self) -> Result<(), StreamError> {
        let overflow = |what: &str| {
            StreamError::InconsistentHeader(format!(
                "{what} overflows (num_real {}, dim {}, byte {})",
                self.num_real, self.dim, self.byte
            ))
        };
        let sample_bytes = self
            .dim
            .checked_mul(self.byte)
            .ok_or_else(|| overflow("dim * byte"))?;
        let tot = self
            .num
            .checked_mul(sample_bytes)
            .ok_or_else(|| overflow("num * dim * byte"))?;
        let tot_real = self
            .num_real
            .checked_mul(sample_bytes)
            .ok_or_else(|| overflow("num_real * dim * byte"))?;
        if self.tot != tot {
            return Err(StreamError::InconsistentHeader(format!(
                "tot {} != num {} * dim {} * byte {}",
                self.tot, self.num, self.dim, self.byte
            )));
        }
        if self.tot_real != tot_real {
            return Err(StreamError::InconsistentHeader(format!(
                "tot_real {} != num_real {} * dim {} * byte {}",
                self.tot_real, self.num_real, self.dim, self.byte
            )));
        }
        if self.num > self.num_real {
            return Err(StreamError::InconsistentHeader(format!(
                "num {} exceeds num_real {}",
                self.num, self.num_real
            )));
        }
        if self.sr < 0.0 || !self.sr.is_finite() {
            return Err(StreamError::InconsistentHeader(format!(
                "invalid sample rate {}",
                self.sr
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> StreamHeader {
        StreamHeader {
            num: 4,
            num_real: 8,
            dim: 2,
            byte: 4,
            sample_type: SampleType::Float,
            sr: 50.0,
            tot: 32,
            tot_real: 64,
            time: 1.5,
        }
    }

    #[test]
    fn consistent_header_validates() {
        assert!(header().validate().is_ok());
    }

    #[test]
    fn tot_mismatch_is_rejected() {
        let h = StreamHeader { tot: 31, ..header() };
        let err = h.validate().unwrap_err();
        assert!(err.to_string().contains("tot 31"));
    }

    #[test]
    fn num_above_capacity_is_rejected() {
        let h = StreamHeader {
            num: 9,
            tot: 72,
            ..header()
        };
        assert!(h.validate().is_err());
    }

    #[test]
    fn oversized_real_extent_is_rejected_without_panicking() {
        let json = format!(
            concat!(
                r#"{{"num":1,"num_real":{},"dim":4,"byte":4,"#,
                r#""type":"float","sr":10.0,"tot":16,"tot_real":0}}"#,
            ),
            usize::MAX / 2
        );
        let h: StreamHeader = serde_json::from_str(&json).unwrap();
        let err = h.validate().unwrap_err();
        assert!(err.to_string().contains("overflows"), "{err}");
    }

    #[test]
    fn oversized_sample_width_is_rejected() {
        let h = StreamHeader {
            dim: usize::MAX,
            byte: 2,
            ..header()
        };
        assert!(matches!(h.validate(), Err(StreamError::InconsistentHeader(_))));
    }

    #[test]
    fn json_keeps_wire_field_order() {
        let json = serde_json::to_string(&header()).unwrap();
        let keys = [
            "\"num\"",
            "\"num_real\"",
            "\"dim\"",
            "\"byte\"",
            "\"type\"",
            "\"sr\"",
            "\"tot\"",
            "\"tot_real\"",
        ];
        let order: Vec<usize> = keys
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]), "{json}");
        assert!(json.contains("\"type\":\"float\""));
    }

    #[test]
    fn time_defaults_when_absent() {
        let json = concat!(
            r#"{"num":0,"num_real":0,"dim":1,"byte":2,"#,
            r#""type":"short","sr":0.0,"tot":0,"tot_real":0}"#,
        );
        let h: StreamHeader = serde_json::from_str(json).unwrap();
        assert_eq!(h.time, 0.0);
        assert_eq!(h.sample_type, SampleType::Short);
    }
}
