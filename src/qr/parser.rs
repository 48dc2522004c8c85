//! Reading version, format information and codewords from a module grid.
use super::format::{self, FormatInfo};
use super::matrix::{data_positions, format_positions, function_pattern, version_positions};
use super::{mask, Version};
use crate::bitmap::Bitmap;
use crate::error::DecodeError;

fn read_bits(grid: &Bitmap<bool>, positions: &[(usize, usize)]) -> u32 {
    positions
        .iter()
        .enumerate()
        .fold(0, |bits, (i, (x, y))| bits | ((grid.get(*x, *y) as u32) << i))
}

/// Determine the version from the grid size and, for versions 7 and up,
/// from the version information.
pub(crate) fn read_version(grid: &Bitmap<bool>) -> Result<&'static Version, DecodeError> {
    let dim = grid.width();
    if dim != grid.height() {
        return Err(DecodeError::Format("QR Code symbols are square"));
    }
    let provisional =
        Version::for_dimension(dim).ok_or(DecodeError::Format("invalid QR Code dimension"))?;
    if provisional.number() <= 6 {
        return Ok(provisional);
    }

    // the top right copy first
    for copy in version_positions(dim).iter().rev() {
        let version = format::decode_version(read_bits(grid, copy)).and_then(Version::for_number);
        if let Some(version) = version.filter(|v| v.dimension() == dim) {
            return Ok(version);
        }
    }
    Err(DecodeError::Format("unreadable version information"))
}

pub(crate) fn read_format(grid: &Bitmap<bool>) -> Result<FormatInfo, DecodeError> {
    let [first, second] = format_positions(grid.width());
    let info = FormatInfo::decode(read_bits(grid, &first), read_bits(grid, &second))
        .ok_or(DecodeError::Format("unreadable format information"))?;
    log::trace!("format information: {:?}", info);
    Ok(info)
}

/// Remove the mask and read all codewords, data and error correction interleaved.
pub(crate) fn read_codewords(
    grid: &Bitmap<bool>,
    version: &Version,
    info: FormatInfo,
) -> Result<Vec<u8>, DecodeError> {
    let positions = data_positions(&function_pattern(version));
    let codewords: Vec<u8> = positions
        .chunks_exact(8)
        .map(|chunk| {
            chunk.iter().fold(0u8, |cw, (x, y)| {
                let bit = grid.get(*x, *y) ^ mask::is_masked(info.mask, *x, *y);
                (cw << 1) | bit as u8
            })
        })
        .collect();
    if codewords.len() != version.total_codewords() {
        return Err(DecodeError::Format("codeword count does not match version"));
    }
    Ok(codewords)
}
