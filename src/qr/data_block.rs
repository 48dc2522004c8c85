//! Error correction blocks of QR Code symbols.
//!
//! The data codewords are split into blocks, shorter blocks first. Each
//! block gets its own error correction codewords. In the symbol the data
//! codewords of all blocks are interleaved column by column, followed by
//! the interleaved error correction codewords.
use super::{EcLevel, Version};
use crate::error::DecodeError;
use crate::reed_solomon::{self, QrField};

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Append error correction codewords and interleave all blocks.
pub(crate) fn interleave_with_ec(data: &[u8], version: &Version, level: EcLevel) -> Vec<u8> {
    let ec_blocks = version.ec_blocks(level);
    debug_assert_eq!(data.len(), ec_blocks.num_data_codewords());
    let ec_len = ec_blocks.ec_codewords_per_block();

    let mut blocks = Vec::with_capacity(ec_blocks.num_blocks());
    let mut offset = 0;
    for len in ec_blocks.block_data_lengths() {
        let mut block = data[offset..offset + len].to_vec();
        block.resize(len + ec_len, 0);
        reed_solomon::encode::<QrField>(&mut block, ec_len);
        blocks.push(block);
        offset += len;
    }

    let max_data = blocks.iter().map(|b| b.len() - ec_len).max().unwrap_or(0);
    let mut result = Vec::with_capacity(version.total_codewords());
    for i in 0..max_data {
        for block in &blocks {
            if i < block.len() - ec_len {
                result.push(block[i]);
            }
        }
    }
    for i in 0..ec_len {
        for block in &blocks {
            result.push(block[block.len() - ec_len + i]);
        }
    }
    result
}

/// Data and error correction codewords of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DataBlock {
    num_data: usize,
    codewords: Vec<u8>,
}

impl DataBlock {
    /// Undo the interleaving of the raw codewords read from a symbol.
    pub fn split(raw: &[u8], version: &Version, level: EcLevel) -> Result<Vec<Self>, DecodeError> {
        if raw.len() != version.total_codewords() {
            return Err(DecodeError::Format("codeword count does not match version"));
        }
        let ec_blocks = version.ec_blocks(level);
        let ec_len = ec_blocks.ec_codewords_per_block();
        let mut blocks: Vec<Self> = ec_blocks
            .block_data_lengths()
            .map(|num_data| Self {
                num_data,
                codewords: Vec::with_capacity(num_data + ec_len),
            })
            .collect();
        let max_data = blocks.iter().map(|b| b.num_data).max().unwrap_or(0);

        let mut raw = raw.iter().cloned();
        let mut next = || raw.next().ok_or(DecodeError::Format("missing codewords"));
        for i in 0..max_data {
            for block in blocks.iter_mut().filter(|b| i < b.num_data) {
                block.codewords.push(next()?);
            }
        }
        for _ in 0..ec_len {
            for block in blocks.iter_mut() {
                block.codewords.push(next()?);
            }
        }
        Ok(blocks)
    }

    /// Correct the block in place, returns the number of corrected codewords.
    pub fn correct(&mut self) -> Result<usize, DecodeError> {
        let ec_len = self.codewords.len() - self.num_data;
        Ok(reed_solomon::decode::<QrField>(&mut self.codewords, ec_len)?)
    }

    pub fn data(&self) -> &[u8] {
        &self.codewords[..self.num_data]
    }
}

#[test]
fn test_version_1_m() {
    // ISO 18004 annex I, "01234567" in version 1-M
    let data = [
        0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC,
        0x11,
    ];
    let version = Version::for_number(1).unwrap();
    let codewords = interleave_with_ec(&data, version, EcLevel::M);
    assert_eq!(
        &codewords[16..],
        &[0xA5, 0x24, 0xD4, 0xC1, 0xED, 0x36, 0xC7, 0x87, 0x2C, 0x55]
    );
}

#[test]
fn test_split_inverts_interleave() {
    // version 5-Q has two blocks of 15 and two of 16 data codewords
    let version = Version::for_number(5).unwrap();
    let data: Vec<u8> = (0..62).collect();
    let raw = interleave_with_ec(&data, version, EcLevel::Q);
    assert_eq!(&raw[..6], &[0, 15, 30, 46, 1, 16]);
    // the extra codewords of the longer blocks come last
    assert_eq!(&raw[60..62], &[45, 61]);

    let mut blocks = DataBlock::split(&raw, version, EcLevel::Q).unwrap();
    let mut joined = Vec::new();
    for block in blocks.iter_mut() {
        assert_eq!(block.correct(), Ok(0));
        joined.extend_from_slice(block.data());
    }
    assert_eq!(joined, data);
}

#[test]
fn test_correct_block() {
    let version = Version::for_number(2).unwrap();
    let data: Vec<u8> = (100..134).collect();
    let mut raw = interleave_with_ec(&data, version, EcLevel::L);
    // five errors, ten error correction codewords
    for i in [0, 3, 11, 20, 40] {
        raw[i] ^= 0x5A;
    }
    let mut blocks = DataBlock::split(&raw, version, EcLevel::L).unwrap();
    assert_eq!(blocks[0].correct(), Ok(5));
    assert_eq!(blocks[0].data(), &data[..]);

    raw[1] ^= 1;
    let mut blocks = DataBlock::split(&raw, version, EcLevel::L).unwrap();
    assert_eq!(blocks[0].correct(), Err(DecodeError::Checksum));
}
