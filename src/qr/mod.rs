//! QR Code (model 2) symbols.
//!
//! Encoding puts the whole input into one segment, appends the
//! Reed-Solomon codewords and picks the mask with the lowest penalty.
//! Decoding reads a clean module grid without quiet zone. Grids which fail
//! are tried once more transposed, for symbols seen from the back.
//!
//! ```rust
//! # use matrixcode::{EcLevel, EncodeHints, QrCode};
//! let hints = EncodeHints::new().with_ec_level(EcLevel::M);
//! let code = QrCode::encode(b"HELLO WORLD", &hints).unwrap();
//! assert_eq!(code.version().number(), 1);
//! let result = QrCode::decode(code.bitmap()).unwrap();
//! assert_eq!(result.text(), "HELLO WORLD");
//! ```
mod data_block;
mod decodation;
mod ec_level;
mod encoder;
mod format;
mod mask;
mod matrix;
mod mode;
mod parser;
mod version;

pub use ec_level::EcLevel;
pub use mode::Mode;
pub use version::{EcBlocks, Version};

use crate::bitmap::Bitmap;
use crate::error::{DecodeError, EncodeError};
use crate::hints::EncodeHints;
use crate::result::DecoderResult;
use data_block::DataBlock;
use format::FormatInfo;

/// An encoded QR Code symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    bitmap: Bitmap<bool>,
    version: &'static Version,
    ec_level: EcLevel,
    mask: u8,
    mode: Mode,
}

impl QrCode {
    /// Encode `data` into the smallest version for the hinted error
    /// correction level, or into the hinted version.
    pub fn encode(data: &[u8], hints: &EncodeHints) -> Result<Self, EncodeError> {
        let ec_level = hints.ec_level;
        let (data_codewords, version, mode) = encoder::encode(data, hints)?;
        let codewords = data_block::interleave_with_ec(&data_codewords, version, ec_level);
        let positions = matrix::data_positions(&matrix::function_pattern(version));

        let build = |pattern: u8| {
            let dim = version.dimension();
            let mut grid = Bitmap::new(dim, dim);
            matrix::draw_function_patterns(&mut grid, version);
            matrix::draw_format(
                &mut grid,
                FormatInfo {
                    ec_level,
                    mask: pattern,
                },
            );
            matrix::draw_codewords(&mut grid, &positions, &codewords, pattern);
            grid
        };

        let (pattern, bitmap) = match hints.qr_mask() {
            Some(pattern) => (pattern, build(pattern)),
            None => {
                let first = build(0);
                let initial = (mask::penalty(&first), 0, first);
                // the lowest pattern wins ties
                let (score, pattern, grid) = (1..8).fold(initial, |best, pattern| {
                    let grid = build(pattern);
                    let score = mask::penalty(&grid);
                    if score < best.0 {
                        (score, pattern, grid)
                    } else {
                        best
                    }
                });
                log::debug!("mask {} with penalty {}", pattern, score);
                (pattern, grid)
            }
        };

        Ok(Self {
            bitmap,
            version,
            ec_level,
            mask: pattern,
            mode,
        })
    }

    /// Decode a module grid, `true` is a dark module.
    ///
    /// The grid must contain exactly the symbol without quiet zone.
    pub fn decode(grid: &Bitmap<bool>) -> Result<DecoderResult, DecodeError> {
        match Self::decode_grid(grid) {
            Err(err @ (DecodeError::Format(_) | DecodeError::Checksum)) => {
                log::debug!("{}, trying the mirrored grid", err);
                Self::decode_grid(&grid.transposed())
                    .map(|result| result.with_mirrored(true))
                    .map_err(|_| err)
            }
            other => other,
        }
    }

    fn decode_grid(grid: &Bitmap<bool>) -> Result<DecoderResult, DecodeError> {
        let version = parser::read_version(grid)?;
        let info = parser::read_format(grid)?;
        log::debug!(
            "reading version {}-{} with mask {}",
            version.number(),
            info.ec_level,
            info.mask
        );
        let raw = parser::read_codewords(grid, version, info)?;

        let mut data = Vec::with_capacity(version.data_codewords(info.ec_level));
        let mut corrected = 0;
        for mut block in DataBlock::split(&raw, version, info.ec_level)? {
            corrected += block.correct()?;
            data.extend_from_slice(block.data());
        }
        if corrected > 0 {
            log::debug!("corrected {} codewords", corrected);
        }
        Ok(decodation::decode_data(&data, version, info.ec_level)?.with_errors_corrected(corrected))
    }

    /// The module grid, `true` is a dark module.
    pub fn bitmap(&self) -> &Bitmap<bool> {
        &self.bitmap
    }

    pub fn version(&self) -> &'static Version {
        self.version
    }

    pub fn ec_level(&self) -> EcLevel {
        self.ec_level
    }

    /// The applied mask pattern, 0 to 7.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Mode of the single data segment.
    pub fn mode(&self) -> Mode {
        self.mode
    }
}

#[cfg(test)]
mod tests;
