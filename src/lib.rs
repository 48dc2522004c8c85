//! Encoding and decoding of Data Matrix (ECC 200) and QR Code symbols.
//!
//! Both symbologies share the same pipeline: the input bytes are compacted
//! into data codewords, Reed-Solomon error correction codewords are appended
//! and everything is placed into a grid of modules. Decoding takes a clean
//! module grid, as delivered by a detector, and reverses the steps.
//!
//! ```rust
//! use matrixcode::{DataMatrix, EncodeHints, QrCode};
//!
//! let hints = EncodeHints::default();
//! let dm = DataMatrix::encode(b"Hello World", &hints).unwrap();
//! assert_eq!(DataMatrix::decode(dm.bitmap()).unwrap().text(), "Hello World");
//!
//! let qr = QrCode::encode(b"Hello World", &hints).unwrap();
//! assert_eq!(QrCode::decode(qr.bitmap()).unwrap().text(), "Hello World");
//! ```
//!
//! Locating symbols in images is out of scope, so is rendering.
//! [Bitmap::unicode] gives a quick look at a grid in the terminal.
mod bitmap;
mod bits;
mod eci;
mod error;
mod hints;
mod result;

pub mod datamatrix;
pub mod qr;
pub mod reed_solomon;

pub use bitmap::{Bit, Bitmap};
pub use datamatrix::{DataMatrix, SymbolList, SymbolSize};
pub use eci::CharacterSet;
pub use error::{DecodeError, EncodeError};
pub use hints::{EncodeHints, SymbolShape};
pub use qr::{EcLevel, Mode, QrCode, Version};
pub use result::{DecoderResult, StructuredAppend};
