use std::fmt;

/// Error correction level of a QR Code.
///
/// The approximate share of codewords which can be restored is
/// 7 % (L), 15 % (M), 25 % (Q) and 30 % (H).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(test, derive(enum_iterator::Sequence))]
pub enum EcLevel {
    #[default]
    L,
    M,
    Q,
    H,
}

impl EcLevel {
    /// The two bits stored in the format information.
    pub(crate) const fn bits(self) -> u32 {
        match self {
            Self::L => 0b01,
            Self::M => 0b00,
            Self::Q => 0b11,
            Self::H => 0b10,
        }
    }

    pub(crate) const fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0b01 => Self::L,
            0b00 => Self::M,
            0b11 => Self::Q,
            _ => Self::H,
        }
    }

    /// Position in the per-level tables.
    pub(crate) const fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::L => "L",
            Self::M => "M",
            Self::Q => "Q",
            Self::H => "H",
        };
        f.write_str(name)
    }
}

#[test]
fn test_bits_round_trip() {
    for level in enum_iterator::all::<EcLevel>() {
        assert_eq!(EcLevel::from_bits(level.bits()), level);
    }
    assert_eq!(EcLevel::M.bits(), 0);
}
