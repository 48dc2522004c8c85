use arrayvec::ArrayVec;

use super::{ascii, c40, EncodationType, EncodingContext, UNLATCH};
use crate::error::EncodeError;

pub(crate) fn is_native(ch: u8) -> bool {
    matches!(ch, 13 | 42 | 62 | 32 | b'0'..=b'9' | b'A'..=b'Z')
}

fn enc(ch: u8) -> u8 {
    match ch {
        13 => 0,
        42 => 1,
        62 => 2,
        b' ' => 3,
        ch @ b'0'..=b'9' => ch - b'0' + 4,
        ch @ b'A'..=b'Z' => ch - b'A' + 14,
        _ => unreachable!(),
    }
}

pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), EncodeError> {
    let mut buf = ArrayVec::<u8, 3>::new();
    while let Some(ch) = ctx.peek(0) {
        if !is_native(ch) {
            break;
        }
        ctx.eat();
        buf.push(enc(ch));
        if buf.is_full() {
            c40::write_three_values(ctx, buf[0], buf[1], buf[2]);
            buf.clear();
            if ctx.look_ahead(EncodationType::X12) != EncodationType::X12 {
                break;
            }
        }
    }

    // incomplete triples are encoded in ASCII
    let written = ctx.codewords().len();
    let available = ctx.update_symbol(written)? - written;
    ctx.backup(buf.len());
    let remaining = ascii::encoding_size(ctx.rest());
    // 5.2.7.2, a single ASCII codeword in a single free codeword needs no UNLATCH
    if remaining > 1 || available > 1 || remaining != available {
        ctx.push(UNLATCH);
    }
    ctx.set_mode(EncodationType::Ascii);
    Ok(())
}
