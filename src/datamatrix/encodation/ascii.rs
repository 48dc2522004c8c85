use super::{edifact, x12, EncodationType, EncodingContext};
use crate::error::EncodeError;

#[cfg(test)]
use pretty_assertions::assert_eq;

pub(crate) const LATCH_C40: u8 = 230;
pub(crate) const LATCH_BASE256: u8 = 231;
pub(crate) const FNC1: u8 = 232;
pub(crate) const UPPER_SHIFT: u8 = 235;
pub(crate) const MACRO05: u8 = 236;
pub(crate) const MACRO06: u8 = 237;
pub(crate) const LATCH_X12: u8 = 238;
pub(crate) const LATCH_TEXT: u8 = 239;
pub(crate) const LATCH_EDIFACT: u8 = 240;
pub(crate) const ECI: u8 = 241;
pub(crate) const PAD: u8 = 129;

fn two_digits_coming(rest: &[u8]) -> bool {
    match rest {
        [a, b, ..] => a.is_ascii_digit() && b.is_ascii_digit(),
        _ => false,
    }
}

/// Can the mode start right at the beginning of `rest`?
///
/// X12 needs a full triple and EDIFACT at least one character.
fn can_start(mode: EncodationType, rest: &[u8]) -> bool {
    match mode {
        EncodationType::X12 => rest.len() >= 3 && rest[..3].iter().all(|ch| x12::is_native(*ch)),
        EncodationType::Edifact => rest.first().map_or(false, |ch| edifact::is_encodable(*ch)),
        _ => true,
    }
}

/// Number of codewords needed to encode `rest` in ASCII.
pub(super) fn encoding_size(mut rest: &[u8]) -> usize {
    let mut count = 0;
    while let Some((ch, tail)) = rest.split_first() {
        if two_digits_coming(rest) {
            count += 1;
            rest = &rest[2..];
            continue;
        }
        count += if *ch < 128 { 1 } else { 2 };
        rest = tail;
    }
    count
}

/// Encode one step in ASCII: a digit pair, a latch or a single character.
pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), EncodeError> {
    let digits = match ctx.rest() {
        [a @ b'0'..=b'9', b @ b'0'..=b'9', ..] => Some((*a, *b)),
        _ => None,
    };
    if let Some((a, b)) = digits {
        ctx.eat();
        ctx.eat();
        ctx.push((a - b'0') * 10 + (b - b'0') + 130);
        return Ok(());
    }

    let new_mode = ctx.look_ahead(EncodationType::Ascii);
    if let Some(latch) = new_mode.latch_from_ascii() {
        if can_start(new_mode, ctx.rest()) {
            ctx.push(latch);
            ctx.set_mode(new_mode);
            return Ok(());
        }
    }

    match ctx.eat() {
        None => (),
        Some(ch @ 0..=127) => ctx.push(ch + 1),
        Some(ch @ 128..=255) => {
            ctx.push(UPPER_SHIFT);
            ctx.push(ch - 128 + 1);
        }
    }
    Ok(())
}

#[test]
fn test_encoding_size() {
    assert_eq!(encoding_size(b""), 0);
    assert_eq!(encoding_size(b"1234"), 2);
    assert_eq!(encoding_size(b"12a3"), 3);
    assert_eq!(encoding_size(b"\xff\xfe"), 4);
    assert_eq!(encoding_size(b"A\x80"), 3);
}
