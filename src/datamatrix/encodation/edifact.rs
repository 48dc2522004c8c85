use arrayvec::ArrayVec;

use super::{ascii, EncodationType, EncodingContext};
use crate::error::EncodeError;

#[cfg(test)]
use pretty_assertions::assert_eq;

pub(crate) const UNLATCH: u8 = 0b011111;

#[inline]
pub(crate) fn is_encodable(ch: u8) -> bool {
    matches!(ch, 32..=94)
}

/// Encode 1 to 4 characters using EDIFACT and write it to the context.
fn write4<T: EncodingContext>(ctx: &mut T, s: &ArrayVec<u8, 4>) {
    let s1 = s.get(1).cloned().unwrap_or(0) & 0b11_1111;
    ctx.push((s[0] << 2) | (s1 >> 4));

    if s.len() >= 2 {
        let s2 = s.get(2).cloned().unwrap_or(0) & 0b11_1111;
        ctx.push((s1 << 4) | (s2 >> 2));

        if s.len() >= 3 {
            let s3 = s.get(3).cloned().unwrap_or(0) & 0b11_1111;
            ctx.push((s2 << 6) | s3);
        }
    }
}

fn handle_end<T: EncodingContext>(
    ctx: &mut T,
    mut symbols: ArrayVec<u8, 4>,
) -> Result<(), EncodeError> {
    ctx.set_mode(EncodationType::Ascii);
    let written = ctx.codewords().len();

    if symbols.is_empty() {
        // The standard allows ASCII encoding without UNLATCH if there
        // are <= 2 words of space left in the symbol and
        // we can encode the rest with ASCII in this space.
        let mut available = ctx.update_symbol(written)? - written;
        let remaining = ascii::encoding_size(ctx.rest());
        if remaining > available && remaining <= 2 {
            available = ctx.update_symbol(written + remaining)? - written;
        }
        if remaining <= available && available <= 2 {
            return Ok(());
        }
    }

    let rest_chars = symbols.len();
    let mut rest_ascii = !ctx.has_more_characters() && rest_chars <= 2;
    if rest_chars <= 2 {
        let available = ctx.update_symbol(written + rest_chars)? - written;
        if available >= 3 {
            rest_ascii = false;
            ctx.update_symbol(written + (rest_chars + 1).min(3))?;
        }
    }

    if rest_ascii {
        // at most two characters in ASCII, no UNLATCH needed
        ctx.reset_symbol();
        ctx.backup(rest_chars);
    } else {
        // complete groups are written in the loop, there is room for UNLATCH
        symbols.push(UNLATCH);
        write4(ctx, &symbols);
    }
    Ok(())
}

pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), EncodeError> {
    let mut symbols = ArrayVec::<u8, 4>::new();
    while let Some(ch) = ctx.peek(0) {
        if !is_encodable(ch) {
            break;
        }
        ctx.eat();
        symbols.push(ch & 0b11_1111);

        if symbols.is_full() {
            write4(ctx, &symbols);
            symbols.clear();
            if ctx.look_ahead(EncodationType::Edifact) != EncodationType::Edifact {
                break;
            }
        }
    }
    handle_end(ctx, symbols)
}

#[test]
fn test_write4_four() {
    use super::tests::DummyLogic;
    let mut enc = DummyLogic::new(vec![], 3);
    write4(&mut enc, &[0b10_01_00, 0b11_01_10, 0b011010, 1].into());
    assert_eq!(
        enc.codewords,
        vec![0b10_01_00_11, 0b01_10_01_10, 0b10_00_00_01]
    );
}

#[test]
fn test_write4_three() {
    use super::tests::DummyLogic;
    let mut enc = DummyLogic::new(vec![], 3);
    let mut s = ArrayVec::<u8, 4>::new();
    s.try_extend_from_slice(&[0b10_01_00, 0b11_01_10, 0b011010])
        .unwrap();
    write4(&mut enc, &s);
    assert_eq!(
        enc.codewords,
        vec![0b10_01_00_11, 0b01_10_01_10, 0b10_00_00_00]
    );
}

#[test]
fn test_write4_two() {
    use super::tests::DummyLogic;
    let mut enc = DummyLogic::new(vec![], 2);
    let mut s = ArrayVec::<u8, 4>::new();
    s.try_extend_from_slice(&[0b10_01_00, 0b11_01_10]).unwrap();
    write4(&mut enc, &s);
    assert_eq!(enc.codewords, vec![0b10_01_00_11, 0b01_10_00_00]);
}

#[test]
fn test_write4_one() {
    use super::tests::DummyLogic;
    let mut enc = DummyLogic::new(vec![], 1);
    let mut s = ArrayVec::<u8, 4>::new();
    s.try_extend_from_slice(&[0b10_01_00]).unwrap();
    write4(&mut enc, &s);
    assert_eq!(enc.codewords, vec![0b10_01_00_00]);
}

#[test]
fn test_extended_ascii_after_full_group() {
    use super::tests::DummyLogic;
    // the upper shift pair needs two free codewords
    let mut enc = DummyLogic::new(b"ABCD\xFF".to_vec(), 4);
    assert!(matches!(encode(&mut enc), Err(EncodeError::CapacityExceeded)));

    let mut enc = DummyLogic::new(b"ABCD\xFF".to_vec(), 5);
    assert!(encode(&mut enc).is_ok());
    assert_eq!(enc.codewords, vec![4, 32, 196]);
    assert_eq!(enc.rest(), b"\xFF");
    assert_eq!(enc.mode, Some(EncodationType::Ascii));
}
