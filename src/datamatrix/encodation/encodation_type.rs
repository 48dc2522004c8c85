use flagset::{flags, FlagSet};

use super::{ascii, base256, c40, edifact, text, x12, EncodingContext};
use crate::error::EncodeError;

flags! {
    /// List of data encodation types
    ///
    /// Data Matrix can switch between different "codecs" in a symbol. Each one
    /// has its strengths and weaknesses.
    pub enum EncodationType: u8 {
        Ascii   = 0b000001,
        C40     = 0b000010,
        Text    = 0b000100,
        X12     = 0b001000,
        Edifact = 0b010000,
        Base256 = 0b100000,
    }
}

impl EncodationType {
    /// Get flag set with all encodation types activated.
    pub fn all() -> FlagSet<Self> {
        FlagSet::full()
    }

    pub(super) fn encode<T: EncodingContext>(&self, ctx: &mut T) -> Result<(), EncodeError> {
        match self {
            Self::Ascii => ascii::encode(ctx),
            Self::C40 => c40::encode(ctx),
            Self::Text => text::encode(ctx),
            Self::X12 => x12::encode(ctx),
            Self::Edifact => edifact::encode(ctx),
            Self::Base256 => base256::encode(ctx),
        }
    }

    pub(super) fn is_ascii(&self) -> bool {
        matches!(self, EncodationType::Ascii)
    }

    /// Get the LATCH codeword to switch to this mode from ASCII.
    pub(super) fn latch_from_ascii(&self) -> Option<u8> {
        match self {
            Self::Ascii => None,
            Self::C40 => Some(ascii::LATCH_C40),
            Self::Text => Some(ascii::LATCH_TEXT),
            Self::X12 => Some(ascii::LATCH_X12),
            Self::Edifact => Some(ascii::LATCH_EDIFACT),
            Self::Base256 => Some(ascii::LATCH_BASE256),
        }
    }
}
