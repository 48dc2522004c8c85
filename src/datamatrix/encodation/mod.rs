//! Implementation of the data encodation using all specified modes.
//!
//! The encoder walks the input once. Each mode consumes as much input as it
//! considers worthwhile and then signals the next mode, which is chosen by a
//! look-ahead heuristic (ISO 16022, Annex P).
use super::symbol_size::{SymbolList, SymbolSize};
use crate::error::EncodeError;
use crate::hints::EncodeHints;

mod ascii;
mod base256;
mod c40;
mod edifact;
mod encodation_type;
mod look_ahead;
mod text;
mod x12;

#[cfg(test)]
mod tests;

pub(crate) use encodation_type::EncodationType;

pub(crate) use ascii::{
    ECI, FNC1, LATCH_BASE256, LATCH_C40, LATCH_EDIFACT, LATCH_TEXT, LATCH_X12, MACRO05, MACRO06,
    PAD, UPPER_SHIFT,
};

pub(crate) use edifact::UNLATCH as EDIFACT_UNLATCH;

pub(crate) const UNLATCH: u8 = 254;

const MACRO05_HEADER: &[u8] = b"[)>\x1E05\x1D";
const MACRO06_HEADER: &[u8] = b"[)>\x1E06\x1D";
const MACRO_TRAILER: &[u8] = b"\x1E\x04";

trait EncodingContext {
    /// Choose the best mode for the remaining input, given the current one.
    fn look_ahead(&self, mode: EncodationType) -> EncodationType;

    /// Make sure a symbol with space for `size_needed` codewords is selected
    /// and return its data capacity.
    ///
    /// A previously selected symbol is kept as long as it is big enough.
    fn update_symbol(&mut self, size_needed: usize) -> Result<usize, EncodeError>;

    /// Forget the selected symbol.
    fn reset_symbol(&mut self);

    fn eat(&mut self) -> Option<u8>;

    fn backup(&mut self, steps: usize);

    fn rest(&self) -> &[u8];

    fn push(&mut self, ch: u8);

    /// Get the codewords written so far.
    fn codewords(&self) -> &[u8];

    /// Request a mode switch after the current mode returns.
    fn set_mode(&mut self, mode: EncodationType);

    fn peek(&self, n: usize) -> Option<u8> {
        self.rest().get(n).cloned()
    }

    /// Are there more characters to process?
    fn has_more_characters(&self) -> bool {
        !self.rest().is_empty()
    }
}

pub(crate) struct GenericEncoder<'a> {
    input: &'a [u8],
    pos: usize,
    end: usize,
    symbols: &'a SymbolList,
    symbol: Option<SymbolSize>,
    new_mode: Option<EncodationType>,
    codewords: Vec<u8>,
}

impl<'a> EncodingContext for GenericEncoder<'a> {
    fn look_ahead(&self, mode: EncodationType) -> EncodationType {
        look_ahead::look_ahead(mode, self.rest())
    }

    fn update_symbol(&mut self, size_needed: usize) -> Result<usize, EncodeError> {
        let symbol = match self.symbol {
            Some(symbol) if symbol.num_data_codewords() >= size_needed => symbol,
            _ => self
                .symbols
                .first_symbol_big_enough_for(size_needed)
                .ok_or(EncodeError::CapacityExceeded)?,
        };
        self.symbol = Some(symbol);
        Ok(symbol.num_data_codewords())
    }

    fn reset_symbol(&mut self) {
        self.symbol = None;
    }

    fn eat(&mut self) -> Option<u8> {
        if self.pos < self.end {
            self.pos += 1;
            Some(self.input[self.pos - 1])
        } else {
            None
        }
    }

    fn backup(&mut self, steps: usize) {
        self.pos -= steps;
    }

    fn rest(&self) -> &[u8] {
        &self.input[self.pos..self.end]
    }

    fn push(&mut self, ch: u8) {
        self.codewords.push(ch);
    }

    fn codewords(&self) -> &[u8] {
        &self.codewords
    }

    fn set_mode(&mut self, mode: EncodationType) {
        self.new_mode = Some(mode);
    }
}

impl<'a> GenericEncoder<'a> {
    pub(crate) fn new(input: &'a [u8], symbols: &'a SymbolList) -> Self {
        Self {
            input,
            pos: 0,
            end: input.len(),
            symbols,
            symbol: None,
            new_mode: None,
            codewords: Vec::new(),
        }
    }

    /// Write the macro, FNC1 and ECI header codewords.
    fn write_header(&mut self, hints: &EncodeHints) {
        let input = self.input;
        let macro_codeword = if input.len() >= MACRO05_HEADER.len() + MACRO_TRAILER.len()
            && input.ends_with(MACRO_TRAILER)
        {
            if input.starts_with(MACRO05_HEADER) {
                Some(MACRO05)
            } else if input.starts_with(MACRO06_HEADER) {
                Some(MACRO06)
            } else {
                None
            }
        } else {
            None
        };
        if let Some(cw) = macro_codeword {
            self.push(cw);
            self.pos = MACRO05_HEADER.len();
            self.end = input.len() - MACRO_TRAILER.len();
        }
        if hints.gs1 {
            self.push(FNC1);
        }
        if let Some(charset) = hints.declared_charset() {
            self.push(ECI);
            write_eci_designator(&mut self.codewords, charset.value());
        }
    }

    /// Encode the data and pad it to the capacity of the selected symbol.
    pub(crate) fn codewords(
        mut self,
        hints: &EncodeHints,
    ) -> Result<(Vec<u8>, SymbolSize), EncodeError> {
        if self.symbols.is_empty() {
            return Err(EncodeError::CapacityExceeded);
        }
        self.write_header(hints);

        let mut mode = EncodationType::Ascii;
        while self.has_more_characters() {
            mode.encode(&mut self)?;
            if let Some(new_mode) = self.new_mode.take() {
                if new_mode != mode {
                    log::trace!("switch from {:?} to {:?} at {}", mode, new_mode, self.pos);
                }
                mode = new_mode;
            }
        }

        let capacity = self.update_symbol(self.codewords.len())?;
        let symbol = self.symbol.ok_or(EncodeError::CapacityExceeded)?;
        self.add_padding(capacity);
        Ok((self.codewords, symbol))
    }

    /// Pad the codewords up to `capacity` with ASCII pad codewords.
    fn add_padding(&mut self, capacity: usize) {
        if self.codewords.len() < capacity {
            self.push(PAD);
        }
        while self.codewords.len() < capacity {
            // "randomize 253 state"
            let pos = self.codewords.len() + 1;
            let pseudo_random = (((149 * pos) % 253) + 1) as u16;
            let tmp = PAD as u16 + pseudo_random;
            if tmp <= 254 {
                self.push(tmp as u8);
            } else {
                self.push((tmp - 254) as u8);
            }
        }
    }
}

/// Append the codewords for an ECI designator.
pub(crate) fn write_eci_designator(out: &mut Vec<u8>, value: u32) {
    if value <= 126 {
        out.push(value as u8 + 1);
    } else if value <= 16382 {
        out.push(((value - 127) / 254 + 128) as u8);
        out.push(((value - 127) % 254 + 1) as u8);
    } else {
        out.push(((value - 16383) / 64516 + 192) as u8);
        out.push((((value - 16383) / 254) % 254 + 1) as u8);
        out.push(((value - 16383) % 254 + 1) as u8);
    }
}

/// Encode `data` into the padded data codewords of the smallest symbol in `symbols`.
pub(crate) fn encode_data(
    data: &[u8],
    symbols: &SymbolList,
    hints: &EncodeHints,
) -> Result<(Vec<u8>, SymbolSize), EncodeError> {
    GenericEncoder::new(data, symbols).codewords(hints)
}
