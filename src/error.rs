use thiserror::Error;

use crate::reed_solomon::TooManyErrors;

/// Errors returned when building a symbol.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// None of the allowed symbol sizes or versions can hold the data.
    #[error("data does not fit into any of the allowed symbols")]
    CapacityExceeded,

    /// The input contains a byte the requested mode can not represent.
    #[error("byte {0:#04x} can not be encoded in the requested mode")]
    IllegalCharacter(u8),

    /// Writing to the in-memory bit buffer failed.
    #[error("bit I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned when reading a symbol from a module grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The grid or its bit stream violates the symbology's structure.
    #[error("malformed symbol: {0}")]
    Format(&'static str),

    /// A data block had more errors than Reed-Solomon can correct.
    #[error("too many errors to correct")]
    Checksum,

    /// No symbol was located. Only produced by callers which detect symbols.
    #[error("no symbol found")]
    NotFound,
}

impl From<TooManyErrors> for DecodeError {
    fn from(_: TooManyErrors) -> Self {
        DecodeError::Checksum
    }
}
