use super::{EncodationType, EncodingContext};
use crate::error::EncodeError;

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Perform the 255 state randomization as defined in the standard.
///
/// `pos` must be the number of the byte to be written w.r.t. to the full
/// codeword vector, the number is 1-based.
pub(crate) fn randomize_255_state(ch: u8, pos: usize) -> u8 {
    let pseudo_random = ((149 * pos) % 255) + 1;
    let tmp = ch as u16 + pseudo_random as u16;
    if tmp <= 255 {
        tmp as u8
    } else {
        (tmp - 256) as u8
    }
}

/// Write the length "header" into the first byte of `buf`.
///
/// The field is omitted (zero) if the data extends to the end of the symbol.
fn write_length<T: EncodingContext>(ctx: &mut T, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    let data_count = buf.len() - 1;
    let size_needed = ctx.codewords().len() + data_count + 1;
    let must_pad = ctx.update_symbol(size_needed)? > size_needed;
    if ctx.has_more_characters() || must_pad {
        if data_count <= 249 {
            buf[0] = data_count as u8;
        } else if data_count <= 1555 {
            buf[0] = ((data_count / 250) + 249) as u8;
            buf.insert(1, (data_count % 250) as u8);
        } else {
            return Err(EncodeError::CapacityExceeded);
        }
    }
    Ok(())
}

pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), EncodeError> {
    let mut buf = vec![0];
    while let Some(ch) = ctx.eat() {
        buf.push(ch);
        if ctx.look_ahead(EncodationType::Base256) != EncodationType::Base256 {
            ctx.set_mode(EncodationType::Ascii);
            break;
        }
    }
    write_length(ctx, &mut buf)?;
    for ch in buf {
        let pos = ctx.codewords().len() + 1;
        ctx.push(randomize_255_state(ch, pos));
    }
    Ok(())
}

#[test]
fn test_randomize() {
    assert_eq!(randomize_255_state(0, 1), 150);
    assert_eq!(randomize_255_state(255, 2), 43);
}
