//! Data Matrix (ECC 200) symbols.
//!
//! Encoding runs the data encodation, appends the Reed-Solomon codewords and
//! places everything into the module grid. Decoding reads a clean grid, as
//! produced by a detector, and runs the same steps backwards.
//!
//! ```rust
//! # use matrixcode::{DataMatrix, EncodeHints};
//! let code = DataMatrix::encode(b"Hello, World!", &EncodeHints::default()).unwrap();
//! let result = DataMatrix::decode(code.bitmap()).unwrap();
//! assert_eq!(result.text(), "Hello, World!");
//! ```
mod decodation;
mod encodation;
mod errorcode;
mod placement;
mod symbol_size;

pub mod data;

pub use symbol_size::{SymbolList, SymbolSize};

use crate::bitmap::Bitmap;
use crate::error::{DecodeError, EncodeError};
use crate::hints::EncodeHints;
use crate::result::DecoderResult;
use placement::{MatrixMap, Visitor};

#[cfg(test)]
use pretty_assertions::assert_eq;

struct CodewordPlacer<'a>(&'a [u8]);

impl Visitor<bool> for CodewordPlacer<'_> {
    fn visit(&mut self, idx: usize, bits: [&mut bool; 8]) {
        let codeword = self.0[idx];
        for (i, bit) in bits.into_iter().enumerate() {
            // 0 = MSB, 7 = LSB
            *bit = ((codeword >> (7 - i)) & 1) == 1;
        }
    }
}

struct CodewordReader(Vec<u8>);

impl Visitor<bool> for CodewordReader {
    fn visit(&mut self, idx: usize, bits: [&mut bool; 8]) {
        debug_assert_eq!(idx, self.0.len());
        let codeword = bits
            .into_iter()
            .fold(0u8, |acc, bit| (acc << 1) | (*bit as u8));
        self.0.push(codeword);
    }
}

/// An encoded Data Matrix symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataMatrix {
    bitmap: Bitmap<bool>,
    symbol_size: SymbolSize,
    codewords: Vec<u8>,
}

impl DataMatrix {
    /// Encode `data` into the smallest symbol allowed by the hints.
    ///
    /// The shape, size bounds, DMRE switch, character set and GS1 flag of
    /// the hints are used, the rest is ignored.
    pub fn encode(data: &[u8], hints: &EncodeHints) -> Result<Self, EncodeError> {
        Self::encode_with_symbols(data, hints.symbol_list(), hints)
    }

    /// Encode `data` into the smallest symbol out of an explicit list.
    ///
    /// The size related settings of `hints` are ignored.
    pub fn encode_with_symbols<S: Into<SymbolList>>(
        data: &[u8],
        symbols: S,
        hints: &EncodeHints,
    ) -> Result<Self, EncodeError> {
        let symbols = symbols.into();
        let (mut codewords, symbol_size) = encodation::encode_data(data, &symbols, hints)?;
        log::debug!(
            "encoded {} bytes into {} data codewords of {:?}",
            data.len(),
            codewords.len(),
            symbol_size
        );
        let ecc = errorcode::encode_error(&codewords, symbol_size);
        codewords.extend_from_slice(&ecc);

        let mut map = MatrixMap::new(symbol_size);
        let placed = map.traverse(&mut CodewordPlacer(&codewords));
        debug_assert_eq!(placed, codewords.len());
        Ok(Self {
            bitmap: map.bitmap(),
            symbol_size,
            codewords,
        })
    }

    /// Decode a module grid, `true` is a dark module.
    ///
    /// The grid must contain exactly the symbol including its finder
    /// pattern and no quiet zone.
    pub fn decode(grid: &Bitmap<bool>) -> Result<DecoderResult, DecodeError> {
        let size = SymbolSize::from_dimensions(grid.width(), grid.height())
            .ok_or(DecodeError::Format("no Data Matrix symbol has these dimensions"))?;
        log::debug!("reading {:?}", size);

        let mut map = MatrixMap::from_bitmap(size, grid);
        let mut reader = CodewordReader(Vec::with_capacity(size.num_codewords()));
        let count = map.traverse(&mut reader);
        let mut codewords = reader.0;
        if count != size.num_codewords() {
            return Err(DecodeError::Format("codeword count does not match symbol size"));
        }

        let corrected = errorcode::decode_error(&mut codewords, size)?;
        if corrected > 0 {
            log::debug!("corrected {} codewords", corrected);
        }
        codewords.truncate(size.num_data_codewords());
        Ok(decodation::decode_data(&codewords)?.with_errors_corrected(corrected))
    }

    /// The module grid, `true` is a dark module.
    pub fn bitmap(&self) -> &Bitmap<bool> {
        &self.bitmap
    }

    pub fn symbol_size(&self) -> SymbolSize {
        self.symbol_size
    }

    /// Data and error correction codewords in placement order.
    pub fn codewords(&self) -> &[u8] {
        &self.codewords
    }
}

#[test]
fn test_hello_world_square16() {
    let code = DataMatrix::encode(b"Hello World", &EncodeHints::default()).unwrap();
    assert_eq!(code.symbol_size(), SymbolSize::Square16);
    assert_eq!(
        &code.codewords()[..12],
        &[73, 239, 116, 130, 175, 123, 148, 64, 254, 109, 101, 129]
    );
    assert_eq!(code.bitmap().width(), 16);

    let result = DataMatrix::decode(code.bitmap()).unwrap();
    assert_eq!(result.text(), "Hello World");
    assert!(result.byte_segments().is_empty());
    assert_eq!(result.symbology_identifier(), "]d1");
    assert_eq!(result.errors_corrected(), 0);
}

#[test]
fn test_finder_pattern() {
    let code = DataMatrix::encode(b"A", &EncodeHints::default()).unwrap();
    let bitmap = code.bitmap();
    assert_eq!(code.symbol_size(), SymbolSize::Square10);
    for i in 0..10 {
        // solid L
        assert!(bitmap.get(0, i));
        assert!(bitmap.get(i, 9));
        // dotted timing
        assert_eq!(bitmap.get(i, 0), i % 2 == 0);
        assert_eq!(bitmap.get(9, i), i % 2 == 1);
    }
}

#[test]
fn test_decode_corrects_errors() {
    let code = DataMatrix::encode(b"0123456789ABCDEF", &EncodeHints::default()).unwrap();
    let mut grid = code.bitmap().clone();
    // flip a few modules of the mapping matrix
    for (x, y) in [(3, 3), (5, 7), (8, 2)] {
        let v = grid.get(x, y);
        grid.set(x, y, !v);
    }
    let result = DataMatrix::decode(&grid).unwrap();
    assert_eq!(result.text(), "0123456789ABCDEF");
    assert!(result.errors_corrected() > 0);
}

#[test]
fn test_decode_unknown_dimensions() {
    let grid = Bitmap::new(11, 11);
    assert!(matches!(
        DataMatrix::decode(&grid),
        Err(DecodeError::Format(_))
    ));
}

#[test]
fn test_decode_all_dark_square10() {
    // every codeword reads as 0xff, which is no valid RS codeword
    let grid = Bitmap::from_vec(10, vec![true; 100]);
    assert_eq!(DataMatrix::decode(&grid), Err(DecodeError::Checksum));
}

#[test]
fn test_decode_all_light_square10() {
    // all zero codewords pass the error correction, but 0 is no ASCII value
    let grid = Bitmap::new(10, 10);
    assert!(matches!(
        DataMatrix::decode(&grid),
        Err(DecodeError::Format(_))
    ));
}

#[test]
fn test_encode_with_symbols_too_small() {
    let res = DataMatrix::encode_with_symbols(
        b"this is too long for the smallest symbol",
        SymbolSize::Square10,
        &EncodeHints::default(),
    );
    assert!(matches!(res, Err(EncodeError::CapacityExceeded)));
}

#[test]
fn test_all_sizes_round_trip() {
    for size in enum_iterator::all::<SymbolSize>() {
        let data: Vec<u8> = (0..size.num_data_codewords() - 1)
            .map(|i| b'0' + (i % 10) as u8)
            .collect();
        let code = DataMatrix::encode_with_symbols(&data, size, &EncodeHints::default()).unwrap();
        assert_eq!(code.symbol_size(), size);
        assert_eq!((code.bitmap().width(), code.bitmap().height()), (size.width(), size.height()));
        let result = DataMatrix::decode(code.bitmap()).unwrap();
        assert_eq!(result.text().as_bytes(), &data[..]);
    }
}

#[test]
fn test_dmre_with_24_mapping_rows() {
    // the utah shapes at the left edge wrap below the last mapping row
    for size in [SymbolSize::Rect26x40, SymbolSize::Rect26x48] {
        let code = DataMatrix::encode_with_symbols(b"A", size, &EncodeHints::default()).unwrap();
        assert_eq!(code.symbol_size(), size);
        let result = DataMatrix::decode(code.bitmap()).unwrap();
        assert_eq!(result.text(), "A");
    }
}
