//! Data decodation. This comes after error correction and visual detection.
//!
//! It performs the inverse of the `encodation` module.
use super::encodation::{
    EncodationType, ECI, EDIFACT_UNLATCH, FNC1, LATCH_BASE256, LATCH_C40, LATCH_EDIFACT,
    LATCH_TEXT, LATCH_X12, MACRO05, MACRO06, PAD, UNLATCH, UPPER_SHIFT,
};
use crate::bits::BitSource;
use crate::eci::{CharacterSet, TextBuilder};
use crate::error::DecodeError;
use crate::result::DecoderResult;

#[cfg(test)]
mod tests;

const STRUCTURED_APPEND: u8 = 233;
const READER_PROGRAMMING: u8 = 234;

const GS: u8 = 29;
const MACRO_TRAILER: &str = "\u{1E}\u{04}";

const BASE_C40: &[u8; 37] = b" 0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SHIFT3_C40: &[u8; 32] = b"`abcdefghijklmnopqrstuvwxyz{|}~\x7f";

const BASE_TEXT: &[u8; 37] = b" 0123456789abcdefghijklmnopqrstuvwxyz";
const SHIFT3_TEXT: &[u8; 32] = b"`ABCDEFGHIJKLMNOPQRSTUVWXYZ{|}~\x7f";

const SHIFT2: &[u8; 27] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_";

/// Everything collected while walking the segments.
struct Output {
    text: TextBuilder,
    trailer: Option<&'static str>,
    byte_segments: Vec<Vec<u8>>,
    fnc1_positions: Vec<usize>,
}

impl Output {
    fn push(&mut self, ch: u8, upper_shift: &mut bool) {
        if *upper_shift {
            self.text.push_byte(ch.wrapping_add(128));
            *upper_shift = false;
        } else {
            self.text.push_byte(ch);
        }
    }

    fn push_fnc1(&mut self) {
        self.fnc1_positions.push(self.text.len());
        self.text.push_byte(GS);
    }

    fn symbology_modifier(&self) -> u8 {
        let fnc1_at = |i| self.fnc1_positions.contains(&i);
        let modifier = if fnc1_at(0) || fnc1_at(4) {
            2
        } else if fnc1_at(1) || fnc1_at(5) {
            3
        } else {
            1
        };
        if self.text.has_eci() {
            modifier + 3
        } else {
            modifier
        }
    }
}

/// Decode the corrected data codewords of a Data Matrix.
pub(crate) fn decode_data(codewords: &[u8]) -> Result<DecoderResult, DecodeError> {
    let mut bits = BitSource::new(codewords);
    let mut out = Output {
        text: TextBuilder::new(CharacterSet::Iso8859_1),
        trailer: None,
        byte_segments: Vec::new(),
        fnc1_positions: Vec::new(),
    };

    let mut mode = EncodationType::Ascii;
    while bits.available() > 0 {
        mode = match mode {
            EncodationType::Ascii => match decode_ascii(&mut bits, &mut out)? {
                Some(mode) => mode,
                // padding reached
                None => break,
            },
            EncodationType::C40 => decode_c40_like(&mut bits, &mut out, BASE_C40, SHIFT3_C40)?,
            EncodationType::Text => decode_c40_like(&mut bits, &mut out, BASE_TEXT, SHIFT3_TEXT)?,
            EncodationType::X12 => decode_x12(&mut bits, &mut out)?,
            EncodationType::Edifact => decode_edifact(&mut bits, &mut out)?,
            EncodationType::Base256 => decode_base256(&mut bits, &mut out)?,
        };
    }

    if let Some(trailer) = out.trailer {
        out.text.push_str(trailer);
    }
    let modifier = out.symbology_modifier();
    Ok(
        DecoderResult::new(out.text.finish(), codewords.to_vec(), 'd')
            .with_byte_segments(out.byte_segments)
            .with_symbology_modifier(modifier),
    )
}

fn read_eci(bits: &mut BitSource) -> Result<u32, DecodeError> {
    let ch1 = bits.read_byte()?;
    let eci = match ch1 {
        1..=127 => ch1 as u32 - 1,
        128..=191 => {
            let ch2 = bits.read_byte()?;
            if !matches!(ch2, 1..=254) {
                return Err(DecodeError::Format("2nd codeword after ECI"));
            }
            (ch1 as u32 - 128) * 254 + (ch2 as u32 - 1) + 127
        }
        192..=207 => {
            let ch2 = bits.read_byte()?;
            if !matches!(ch2, 1..=254) {
                return Err(DecodeError::Format("2nd codeword after ECI"));
            }
            let ch3 = bits.read_byte()?;
            if !matches!(ch3, 1..=254) {
                return Err(DecodeError::Format("3rd codeword after ECI"));
            }
            (ch1 as u32 - 192) * 64516 + (ch2 as u32 - 1) * 254 + (ch3 as u32 - 1) + 16383
        }
        _ => return Err(DecodeError::Format("1st codeword after ECI")),
    };
    Ok(eci)
}

/// Decode ASCII codewords until a latch. Returns `None` at the start of the padding.
fn decode_ascii(
    bits: &mut BitSource,
    out: &mut Output,
) -> Result<Option<EncodationType>, DecodeError> {
    let mut upper_shift = false;
    while bits.available() > 0 {
        match bits.read_byte()? {
            0 => return Err(DecodeError::Format("illegal codeword 0 in ASCII")),
            ch @ 1..=128 => out.push(ch - 1, &mut upper_shift),
            PAD => return Ok(None),
            ch @ 130..=229 => {
                let digit = ch - 130;
                out.text.push_byte(b'0' + (digit / 10));
                out.text.push_byte(b'0' + (digit % 10));
            }
            LATCH_C40 => return Ok(Some(EncodationType::C40)),
            LATCH_BASE256 => return Ok(Some(EncodationType::Base256)),
            FNC1 => out.push_fnc1(),
            STRUCTURED_APPEND | READER_PROGRAMMING => (),
            UPPER_SHIFT => upper_shift = true,
            ch @ (MACRO05 | MACRO06) => {
                let header: &[u8] = if ch == MACRO05 {
                    b"[)>\x1E05\x1D"
                } else {
                    b"[)>\x1E06\x1D"
                };
                out.text.push_bytes(header);
                out.trailer = Some(MACRO_TRAILER);
            }
            LATCH_X12 => return Ok(Some(EncodationType::X12)),
            LATCH_TEXT => return Ok(Some(EncodationType::Text)),
            LATCH_EDIFACT => return Ok(Some(EncodationType::Edifact)),
            ECI => {
                let eci = read_eci(bits)?;
                out.text.set_eci(eci)?;
            }
            UNLATCH if bits.available() == 0 => (),
            _ => return Err(DecodeError::Format("illegal codeword in ASCII")),
        }
    }
    Ok(Some(EncodationType::Ascii))
}

fn derandomize_255_state(ch: u8, pos: usize) -> u8 {
    let pseudo_random = ((149 * pos) % 255) + 1;
    let tmp = ch as i16 - pseudo_random as i16;
    if tmp >= 0 {
        tmp as u8
    } else {
        (tmp + 256) as u8
    }
}

fn decode_base256(bits: &mut BitSource, out: &mut Output) -> Result<EncodationType, DecodeError> {
    // codeword positions are 1-based
    let next = |bits: &mut BitSource| -> Result<u8, DecodeError> {
        let pos = bits.byte_offset() + 1;
        Ok(derandomize_255_state(bits.read_byte()?, pos))
    };
    let d1 = next(bits)? as usize;
    let length = if d1 == 0 {
        bits.available() / 8
    } else if d1 < 250 {
        d1
    } else {
        250 * (d1 - 249) + next(bits)? as usize
    };
    let mut segment = Vec::with_capacity(length);
    for _ in 0..length {
        if bits.available() < 8 {
            return Err(DecodeError::Format("Base256 segment ends early"));
        }
        segment.push(next(bits)?);
    }
    out.text.push_bytes(&segment);
    out.byte_segments.push(segment);
    Ok(EncodationType::Ascii)
}

fn decode_edifact(bits: &mut BitSource, out: &mut Output) -> Result<EncodationType, DecodeError> {
    // the last one or two codewords are always ASCII
    while bits.available() > 16 {
        for _ in 0..4 {
            let val = bits.read_bits(6)? as u8;
            if val == EDIFACT_UNLATCH {
                bits.skip_to_byte_boundary();
                return Ok(EncodationType::Ascii);
            }
            if (val & 0b10_0000) != 0 {
                out.text.push_byte(val);
            } else {
                out.text.push_byte(val | 0b0100_0000);
            }
        }
    }
    Ok(EncodationType::Ascii)
}

fn decode_c40_tuple(a: u8, b: u8) -> [u8; 3] {
    let full = ((a as u16) << 8) + b as u16 - 1;
    let c1 = full / 1600;
    let full = full - c1 * 1600;
    let c2 = full / 40;
    [c1 as u8, c2 as u8, (full - c2 * 40) as u8]
}

/// Read the next pair of codewords of a triple based mode.
///
/// Returns `None` if the mode ends, either with an UNLATCH or with a single
/// codeword left for ASCII.
fn read_triple(bits: &mut BitSource) -> Result<Option<[u8; 3]>, DecodeError> {
    if bits.available() <= 8 {
        return Ok(None);
    }
    let first = bits.read_byte()?;
    if first == UNLATCH {
        return Ok(None);
    }
    let second = bits.read_byte()?;
    Ok(Some(decode_c40_tuple(first, second)))
}

fn dec_x12_val(ch: u8) -> Result<u8, DecodeError> {
    match ch {
        0 => Ok(13),
        1 => Ok(42),
        2 => Ok(62),
        3 => Ok(b' '),
        ch @ 4..=13 => Ok(ch + 44),
        ch @ 14..=39 => Ok(ch + 51),
        _ => Err(DecodeError::Format("value not in X12")),
    }
}

fn decode_x12(bits: &mut BitSource, out: &mut Output) -> Result<EncodationType, DecodeError> {
    while let Some(values) = read_triple(bits)? {
        for ch in values {
            out.text.push_byte(dec_x12_val(ch)?);
        }
    }
    Ok(EncodationType::Ascii)
}

fn decode_c40_like(
    bits: &mut BitSource,
    out: &mut Output,
    map_base: &[u8; 37],
    map_shift3: &[u8; 32],
) -> Result<EncodationType, DecodeError> {
    let mut shift = 0;
    let mut upper_shift = false;
    while let Some(values) = read_triple(bits)? {
        for ch in values {
            match shift {
                0 => match ch {
                    0..=2 => shift = ch + 1,
                    3..=39 => out.push(map_base[ch as usize - 3], &mut upper_shift),
                    _ => return Err(DecodeError::Format("value not in C40/Text basic set")),
                },
                1 => {
                    out.push(ch, &mut upper_shift);
                    shift = 0;
                }
                2 => {
                    match ch {
                        0..=26 => out.push(SHIFT2[ch as usize], &mut upper_shift),
                        27 => out.push_fnc1(),
                        30 => upper_shift = true,
                        _ => return Err(DecodeError::Format("value not in C40/Text shift 2 set")),
                    }
                    shift = 0;
                }
                _ => {
                    let text = map_shift3
                        .get(ch as usize)
                        .ok_or(DecodeError::Format("value not in C40/Text shift 3 set"))?;
                    out.push(*text, &mut upper_shift);
                    shift = 0;
                }
            }
        }
    }
    Ok(EncodationType::Ascii)
}
