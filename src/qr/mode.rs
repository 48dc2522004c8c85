use super::Version;
use crate::error::DecodeError;

/// Segment modes of QR Code bit streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Terminator,
    Numeric,
    Alphanumeric,
    StructuredAppend,
    Byte,
    /// FNC1 in first position, i.e., GS1 data.
    Fnc1First,
    Eci,
    Kanji,
    /// FNC1 in second position (AIM application indicator).
    Fnc1Second,
    /// GB 2312 characters, defined in the Chinese national standard.
    Hanzi,
}

pub(crate) const ALPHANUMERIC: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Value of a character in the alphanumeric mode.
pub(crate) fn alphanumeric_value(ch: u8) -> Option<u32> {
    ALPHANUMERIC.iter().position(|c| *c == ch).map(|v| v as u32)
}

impl Mode {
    pub(crate) fn from_bits(bits: u32) -> Result<Self, DecodeError> {
        Ok(match bits {
            0x0 => Self::Terminator,
            0x1 => Self::Numeric,
            0x2 => Self::Alphanumeric,
            0x3 => Self::StructuredAppend,
            0x4 => Self::Byte,
            0x5 => Self::Fnc1First,
            0x7 => Self::Eci,
            0x8 => Self::Kanji,
            0x9 => Self::Fnc1Second,
            0xD => Self::Hanzi,
            _ => return Err(DecodeError::Format("unknown QR mode")),
        })
    }

    /// The 4 bit mode indicator.
    pub(crate) const fn bits(self) -> u32 {
        match self {
            Self::Terminator => 0x0,
            Self::Numeric => 0x1,
            Self::Alphanumeric => 0x2,
            Self::StructuredAppend => 0x3,
            Self::Byte => 0x4,
            Self::Fnc1First => 0x5,
            Self::Eci => 0x7,
            Self::Kanji => 0x8,
            Self::Fnc1Second => 0x9,
            Self::Hanzi => 0xD,
        }
    }

    /// Length of the character count field.
    ///
    /// Modes without a count field have length 0.
    pub(crate) fn character_count_bits(self, version: &Version) -> u32 {
        let class = match version.number() {
            1..=9 => 0,
            10..=26 => 1,
            _ => 2,
        };
        let bits = match self {
            Self::Numeric => [10, 12, 14],
            Self::Alphanumeric => [9, 11, 13],
            Self::Byte => [8, 16, 16],
            Self::Kanji | Self::Hanzi => [8, 10, 12],
            _ => [0, 0, 0],
        };
        bits[class]
    }
}

#[cfg(test)]
mod tests {
    use super::{alphanumeric_value, Mode, Version};
    use pretty_assertions::assert_eq;

    #[test]
    fn count_bits_by_version_class() {
        let v = |n| Version::for_number(n).unwrap();
        assert_eq!(Mode::Numeric.character_count_bits(v(9)), 10);
        assert_eq!(Mode::Numeric.character_count_bits(v(10)), 12);
        assert_eq!(Mode::Alphanumeric.character_count_bits(v(27)), 13);
        assert_eq!(Mode::Byte.character_count_bits(v(26)), 16);
        assert_eq!(Mode::Kanji.character_count_bits(v(1)), 8);
        assert_eq!(Mode::Eci.character_count_bits(v(40)), 0);
    }

    #[test]
    fn unknown_mode_bits() {
        assert!(Mode::from_bits(0x6).is_err());
        assert_eq!(Mode::from_bits(0xD), Ok(Mode::Hanzi));
    }

    #[test]
    fn alphanumeric_table() {
        assert_eq!(alphanumeric_value(b'0'), Some(0));
        assert_eq!(alphanumeric_value(b'Z'), Some(35));
        assert_eq!(alphanumeric_value(b':'), Some(44));
        assert_eq!(alphanumeric_value(b'a'), None);
    }
}
