//! Error correction blocks of Data Matrix symbols.
//!
//! Bigger symbols split their data into several blocks. Block `b` holds the
//! codewords `b, b + n, b + 2n, ...` where `n` is the number of blocks, and
//! the error codes are interleaved the same way after the data.
use crate::error::DecodeError;
use crate::reed_solomon::{self, DataMatrixField};

use super::SymbolSize;

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Compute the interleaved error correction codewords for `data`.
pub(crate) fn encode_error(data: &[u8], size: SymbolSize) -> Vec<u8> {
    let setup = size.block_setup();
    debug_assert_eq!(data.len(), size.num_data_codewords());
    let stride = setup.num_ecc_blocks;
    let ecc_len = setup.num_ecc_per_block;
    let mut full_ecc = vec![0; ecc_len * stride];
    let mut block_buf = Vec::new();
    for block in 0..stride {
        block_buf.clear();
        block_buf.extend((block..data.len()).step_by(stride).map(|i| data[i]));
        block_buf.resize(block_buf.len() + ecc_len, 0);
        reed_solomon::encode::<DataMatrixField>(&mut block_buf, ecc_len);

        // copy block interleaved to result vector
        let ecc = &block_buf[block_buf.len() - ecc_len..];
        for (result, ecc_i) in full_ecc.iter_mut().skip(block).step_by(stride).zip(ecc) {
            *result = *ecc_i;
        }
    }
    full_ecc
}

/// Correct the data and error codewords of a symbol in place.
///
/// Returns the number of corrected codewords.
pub(crate) fn decode_error(codewords: &mut [u8], size: SymbolSize) -> Result<usize, DecodeError> {
    let setup = size.block_setup();
    let num_data = size.num_data_codewords();
    if codewords.len() != size.num_codewords() {
        return Err(DecodeError::Format("wrong number of codewords"));
    }
    let stride = setup.num_ecc_blocks;
    let ecc_len = setup.num_ecc_per_block;
    let mut corrected = 0;
    let mut block_buf = Vec::new();
    for block in 0..stride {
        let data_positions = (block..num_data).step_by(stride);
        let ecc_positions = (num_data + block..codewords.len()).step_by(stride);
        let positions: Vec<usize> = data_positions.chain(ecc_positions).collect();

        block_buf.clear();
        block_buf.extend(positions.iter().map(|i| codewords[*i]));
        corrected += reed_solomon::decode::<DataMatrixField>(&mut block_buf, ecc_len)?;
        for (pos, value) in positions.iter().zip(&block_buf) {
            codewords[*pos] = *value;
        }
    }
    Ok(corrected)
}

#[test]
fn ecc_square_10() {
    let ecc = encode_error(&[23, 40, 11], SymbolSize::Square10);
    assert_eq!(ecc, vec![255, 207, 37, 244, 81]);
}

#[test]
fn square_144_blocks() {
    // 1558 data codewords in 10 blocks, the first 8 blocks have one more
    let data: Vec<u8> = (0..1558).map(|i| (i % 251) as u8).collect();
    let mut codewords = data.clone();
    codewords.extend(encode_error(&data, SymbolSize::Square144));
    assert_eq!(codewords.len(), 2178);

    let block_len = |b: usize| (b..1558).step_by(10).count();
    assert_eq!(
        (0..10).map(block_len).collect::<Vec<_>>(),
        vec![156, 156, 156, 156, 156, 156, 156, 156, 155, 155]
    );

    let clean = codewords.clone();
    for i in (0..2178).step_by(75) {
        codewords[i] ^= 0x5A;
    }
    let corrected = decode_error(&mut codewords, SymbolSize::Square144).unwrap();
    assert_eq!(corrected, (0..2178).step_by(75).count());
    assert_eq!(codewords, clean);
}

#[test]
fn too_many_errors_is_checksum() {
    let data: Vec<u8> = (0..174).map(|i| i as u8).collect();
    let mut codewords = data.clone();
    codewords.extend(encode_error(&data, SymbolSize::Square48));
    // 68 error codewords, 35 errors cannot be corrected
    for c in codewords.iter_mut().take(35) {
        *c ^= 0xFF;
    }
    assert_eq!(
        decode_error(&mut codewords, SymbolSize::Square48),
        Err(DecodeError::Checksum)
    );
}
