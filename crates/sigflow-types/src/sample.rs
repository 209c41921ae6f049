//! Scalar sample kinds and typed access to raw sample bytes.
//!
//! A stream stores its values as plain bytes; [`SampleType`] is the tag that
//! says how those bytes are meant to be read.  The [`Sample`] trait connects
//! the tag to a concrete Rust scalar so that typed reads and writes can be
//! checked against the stream's declared format.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// SampleType
// ────────────────────────────────────────────────────────────────────────────

/// Scalar numeric kind of the values held by a stream.
///
/// The discriminants are the numeric tags used by persisted stream headers
/// and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SampleType {
    #[default]
    Undef = 0,
    Char = 1,
    UChar = 2,
    Short = 3,
    UShort = 4,
    Int = 5,
    UInt = 6,
    Long = 7,
    ULong = 8,
    Float = 9,
    Double = 10,
    LDouble = 11,
    Struct = 12,
    Image = 13,
    Bool = 14,
}

impl SampleType {
    /// Every kind, indexed by its numeric tag.
    pub const ALL: [SampleType; 15] = [
        SampleType::Undef,
        SampleType::Char,
        SampleType::UChar,
        SampleType::Short,
        SampleType::UShort,
        SampleType::Int,
        SampleType::UInt,
        SampleType::Long,
        SampleType::ULong,
        SampleType::Float,
        SampleType::Double,
        SampleType::LDouble,
        SampleType::Struct,
        SampleType::Image,
        SampleType::Bool,
    ];

    /// Numeric tag of this kind.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Look up a kind by its numeric tag.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    /// Natural width of one value in bytes.
    ///
    /// Returns `None` for kinds whose width is not fixed by the tag
    /// (`Undef`, `Struct`, `Image`) or has no portable Rust counterpart
    /// (`LDouble`).
    pub fn byte_size(self) -> Option<usize> {
        match self {
            SampleType::Char | SampleType::UChar | SampleType::Bool => Some(1),
            SampleType::Short | SampleType::UShort => Some(2),
            SampleType::Int | SampleType::UInt | SampleType::Float => Some(4),
            SampleType::Long | SampleType::ULong | SampleType::Double => Some(8),
            SampleType::Undef | SampleType::LDouble | SampleType::Struct | SampleType::Image => {
                None
            }
        }
    }

    /// Upper-case name as printed in stream summaries.
    pub fn name(self) -> &'static str {
        match self {
            SampleType::Undef => "UNDEF",
            SampleType::Char => "CHAR",
            SampleType::UChar => "UCHAR",
            SampleType::Short => "SHORT",
            SampleType::UShort => "USHORT",
            SampleType::Int => "INT",
            SampleType::UInt => "UINT",
            SampleType::Long => "LONG",
            SampleType::ULong => "ULONG",
            SampleType::Float => "FLOAT",
            SampleType::Double => "DOUBLE",
            SampleType::LDouble => "LDOUBLE",
            SampleType::Struct => "STRUCT",
            SampleType::Image => "IMAGE",
            SampleType::Bool => "BOOL",
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sample
// ────────────────────────────────────────────────────────────────────────────

/// A Rust scalar that can be decoded from, and encoded into, stream bytes.
///
/// Values are stored in native byte order.  Implementations exist for the
/// fixed-width integer types and `f32`/`f64`.
pub trait Sample: Copy + PartialEq + fmt::Debug + 'static {
    /// Tag a stream must carry to hold values of this type.
    const TYPE: SampleType;
    /// Width of one value in bytes.
    const BYTES: usize;

    /// Decode one value from the first [`Self::BYTES`] bytes of `bytes`.
    fn read_ne(bytes: &[u8]) -> Self;

    /// Encode this value into the first [`Self::BYTES`] bytes of `out`.
    fn write_ne(self, out: &mut [u8]);
}

macro_rules! impl_sample {
    ($($ty:ty => $tag:expr),* $(,)?) => {
        $(
            impl Sample for $ty {
                const TYPE: SampleType = $tag;
                const BYTES: usize = std::mem::size_of::<$ty>();

                fn read_ne(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::BYTES]);
                    <$ty>::from_ne_bytes(raw)
                }

                fn write_ne(self, out: &mut [u8]) {
                    out[..Self::BYTES].copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_sample! {
    i8 => SampleType::Char,
    u8 => SampleType::UChar,
    i16 => SampleType::Short,
    u16 => SampleType::UShort,
    i32 => SampleType::Int,
    u32 => SampleType::UInt,
    i64 => SampleType::Long,
    u64 => SampleType::ULong,
    f32 => SampleType::Float,
    f64 => SampleType::Double,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_lookup() {
        for ty in SampleType::ALL {
            assert_eq!(SampleType::from_tag(ty.tag()), Some(ty));
        }
        assert_eq!(SampleType::from_tag(15), None);
    }

    #[test]
    fn tags_match_persisted_numbering() {
        assert_eq!(SampleType::Undef.tag(), 0);
        assert_eq!(SampleType::Int.tag(), 5);
        assert_eq!(SampleType::Float.tag(), 9);
        assert_eq!(SampleType::Double.tag(), 10);
    }

    #[test]
    fn byte_size_matches_sample_impls() {
        assert_eq!(SampleType::Short.byte_size(), Some(<i16 as Sample>::BYTES));
        assert_eq!(SampleType::Float.byte_size(), Some(<f32 as Sample>::BYTES));
        assert_eq!(SampleType::ULong.byte_size(), Some(<u64 as Sample>::BYTES));
        assert_eq!(SampleType::Struct.byte_size(), None);
    }

    #[test]
    fn sample_encodes_and_decodes_native_order() {
        let mut buf = [0u8; 8];
        (-1234.5f64).write_ne(&mut buf);
        assert_eq!(f64::read_ne(&buf), -1234.5);

        let mut buf = [0u8; 2];
        (-7i16).write_ne(&mut buf);
        assert_eq!(i16::read_ne(&buf), -7);
    }

    #[test]
    fn display_uses_upper_case_name() {
        assert_eq!(SampleType::UShort.to_string(), "USHORT");
    }
}
