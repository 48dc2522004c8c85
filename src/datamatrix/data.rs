//! Data part de- and encoding
//!
//! The bytes encoded into a Data Matrix symbol consist of two parts,
//! the first part is the actual information one wants to encode,
//! the second part the error correction codewords.
//!
//! The functions in this module de- and encode the first part, which is
//! useful when working on a lower level than [DataMatrix](super::DataMatrix).
use super::{decodation, encodation, SymbolList, SymbolSize};
use crate::error::{DecodeError, EncodeError};
use crate::hints::EncodeHints;
use crate::result::DecoderResult;

/// Encode input to the data codewords of the smallest fitting symbol.
///
/// The codewords are padded to the capacity of the returned symbol size.
pub fn encode_data(
    data: &[u8],
    symbols: &SymbolList,
    hints: &EncodeHints,
) -> Result<(Vec<u8>, SymbolSize), EncodeError> {
    encodation::encode_data(data, symbols, hints)
}

/// Decode error corrected data codewords.
pub fn decode_data(codewords: &[u8]) -> Result<DecoderResult, DecodeError> {
    decodation::decode_data(codewords)
}

#[test]
fn test_codeword_helpers() {
    let (cw, size) =
        encode_data(b"123456", &SymbolList::default(), &EncodeHints::default()).unwrap();
    assert_eq!(size, SymbolSize::Square10);
    assert_eq!(cw, vec![142, 164, 186]);
    assert_eq!(decode_data(&cw).unwrap().text(), "123456");
}
