use arrayvec::ArrayVec;

use super::{EncodationType, EncodingContext, UNLATCH};
use crate::error::EncodeError;

#[cfg(test)]
use pretty_assertions::assert_eq;

const SHIFT1: u8 = 0;
const SHIFT2: u8 = 1;
const SHIFT3: u8 = 2;
const UPPER_SHIFT: u8 = 30;

/// Values of one input character, at most four with an upper shift.
pub(super) type Values = ArrayVec<u8, 4>;

pub(super) fn in_base_set(ch: u8) -> bool {
    matches!(ch, b' ' | b'0'..=b'9' | b'A'..=b'Z')
}

#[inline]
pub(super) fn low_ascii_to_c40_symbols(buf: &mut Values, ch: u8) {
    match ch {
        // Basic set
        b' ' => buf.push(3),
        ch @ b'0'..=b'9' => buf.push(ch - b'0' + 4),
        ch @ b'A'..=b'Z' => buf.push(ch - b'A' + 14),
        // Shift 1 set
        ch @ 0..=31 => {
            buf.push(SHIFT1);
            buf.push(ch);
        }
        // Shift 2 set
        ch @ 33..=47 => {
            buf.push(SHIFT2);
            buf.push(ch - 33);
        }
        ch @ 58..=64 => {
            buf.push(SHIFT2);
            buf.push(ch - 58 + 15);
        }
        ch @ 91..=95 => {
            buf.push(SHIFT2);
            buf.push(ch - 91 + 22);
        }
        // Shift 3
        ch @ 96..=127 => {
            buf.push(SHIFT3);
            buf.push(ch - 96);
        }
        _ => unreachable!(),
    }
}

/// Compute the values of one character, with an upper shift for extended ASCII.
pub(super) fn to_vals<F>(ch: u8, low_ascii_write: F) -> Values
where
    F: Fn(&mut Values, u8),
{
    let mut buf = Values::new();
    match ch {
        ch @ 0..=127 => low_ascii_write(&mut buf, ch),
        ch @ 128..=255 => {
            buf.push(SHIFT2);
            buf.push(UPPER_SHIFT);
            low_ascii_write(&mut buf, ch - 128);
        }
    };
    buf
}

/// Encode three C40 values into two codewords.
pub(super) fn write_three_values<T: EncodingContext>(ctx: &mut T, c1: u8, c2: u8, c3: u8) {
    let enc = 1600 * c1 as u16 + 40 * c2 as u16 + c3 as u16 + 1;
    ctx.push((enc >> 8) as u8);
    ctx.push((enc & 0xFF) as u8);
}

fn write_values<T: EncodingContext>(ctx: &mut T, buf: &[u8]) {
    for triple in buf.chunks_exact(3) {
        write_three_values(ctx, triple[0], triple[1], triple[2]);
    }
}

/// Values buffered by the C40 or Text encoder, with the number of values
/// contributed by each character.
struct Buffer {
    values: Vec<u8>,
    sizes: Vec<u8>,
}

impl Buffer {
    fn push(&mut self, vals: &[u8]) {
        self.values.extend_from_slice(vals);
        self.sizes.push(vals.len() as u8);
    }

    /// Remove the values of the last character.
    fn pop(&mut self) {
        if let Some(size) = self.sizes.pop() {
            self.values.truncate(self.values.len() - size as usize);
        }
    }

    fn last_size(&self) -> usize {
        self.sizes.last().cloned().unwrap_or(0) as usize
    }

    fn rest(&self) -> usize {
        self.values.len() % 3
    }

    /// Free space in the symbol after all complete triples are written.
    fn available<T: EncodingContext>(&self, ctx: &mut T) -> Result<usize, EncodeError> {
        let needed = ctx.codewords().len() + (self.values.len() / 3) * 2;
        Ok(ctx.update_symbol(needed)? - needed)
    }

    /// Give the last character back to the input.
    fn backtrack<T: EncodingContext>(&mut self, ctx: &mut T) {
        self.pop();
        ctx.backup(1);
        ctx.reset_symbol();
    }
}

fn handle_end<T: EncodingContext>(ctx: &mut T, mut buf: Buffer) -> Result<(), EncodeError> {
    let available = buf.available(ctx)?;
    match buf.rest() {
        2 => {
            // pad the last triple with a shift
            buf.values.push(SHIFT1);
            write_values(ctx, &buf.values);
            if ctx.has_more_characters() {
                ctx.push(UNLATCH);
            }
        }
        1 => {
            // the last character is encoded in ASCII, with an implicit unlatch
            debug_assert_eq!(available, 1);
            write_values(ctx, &buf.values);
            if ctx.has_more_characters() {
                ctx.push(UNLATCH);
            }
            ctx.backup(1);
        }
        _ => {
            write_values(ctx, &buf.values);
            if available > 0 || ctx.has_more_characters() {
                ctx.push(UNLATCH);
            }
        }
    }
    ctx.set_mode(EncodationType::Ascii);
    Ok(())
}

pub(super) fn encode_generic<T, F>(
    ctx: &mut T,
    mode: EncodationType,
    low_ascii_write: F,
) -> Result<(), EncodeError>
where
    T: EncodingContext,
    F: Fn(&mut Values, u8),
{
    let mut buf = Buffer {
        values: Vec::new(),
        sizes: Vec::new(),
    };
    while let Some(ch) = ctx.eat() {
        buf.push(&to_vals(ch, &low_ascii_write));
        let mut available = buf.available(ctx)?;

        if !ctx.has_more_characters() {
            // An incomplete last triple is only allowed in a few end situations,
            // otherwise characters are given back to ASCII.
            if buf.rest() == 2 && available != 2 {
                buf.backtrack(ctx);
                available = buf.available(ctx)?;
            }
            while buf.rest() == 1 && (buf.last_size() > 1 || available != 1) {
                buf.backtrack(ctx);
                available = buf.available(ctx)?;
            }
            break;
        }

        if buf.rest() == 0 && ctx.look_ahead(mode) != mode {
            break;
        }
    }
    handle_end(ctx, buf)
}

pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), EncodeError> {
    encode_generic(ctx, EncodationType::C40, low_ascii_to_c40_symbols)
}

#[cfg(test)]
fn vals(data: &[u8]) -> Vec<u8> {
    let mut vals = Vec::new();
    for ch in data.iter().cloned() {
        vals.extend(to_vals(ch, low_ascii_to_c40_symbols));
    }
    vals
}

#[test]
fn test_enc_basic_set() {
    let vals = vals(b" 0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    let out: Vec<u8> = (3..=39).collect();
    assert_eq!(vals, out);
}

#[test]
fn test_enc_shift1_set() {
    let input: Vec<u8> = (0..=31).collect();
    let vals = vals(&input);
    let expected: Vec<u8> = (0..=31).flat_map(|ch| [SHIFT1, ch]).collect();
    assert_eq!(vals, expected);
}

#[test]
fn test_enc_shift2_set() {
    let vals = vals(b"!\"#$%&'()*+,-./:;<=>?@[\\]^_");
    let expected: Vec<u8> = (0..=26).flat_map(|v| [SHIFT2, v]).collect();
    assert_eq!(vals, expected);
}

#[test]
fn test_enc_shift3_set() {
    let vals = vals(b"`abcdefghijklmnopqrstuvwxyz{|}~\x7f");
    let expected: Vec<u8> = (0..=31).flat_map(|v| [SHIFT3, v]).collect();
    assert_eq!(vals, expected);
}

#[test]
fn test_shift_upper() {
    let vals = vals(b"\x80\xFF\xa0");
    // first is 1, 30, 0, 0
    // second is 1, 30, 2, 31
    // third is 1, 30, 3
    assert_eq!(vals, vec![1, 30, 0, 0, 1, 30, 2, 31, 1, 30, 3]);
}
