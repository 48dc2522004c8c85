use super::c40::{self, Values};
use super::{EncodationType, EncodingContext};
use crate::error::EncodeError;

/// Text is C40 with upper and lower case letters swapped.
fn swap_case(ch: u8) -> u8 {
    match ch {
        ch @ b'A'..=b'Z' => ch - b'A' + b'a',
        ch @ b'a'..=b'z' => ch - b'a' + b'A',
        ch => ch,
    }
}

fn low_ascii_to_text_symbols(buf: &mut Values, ch: u8) {
    c40::low_ascii_to_c40_symbols(buf, swap_case(ch));
}

pub(super) fn in_base_set(ch: u8) -> bool {
    c40::in_base_set(swap_case(ch))
}

pub(super) fn encode<T: EncodingContext>(ctx: &mut T) -> Result<(), EncodeError> {
    c40::encode_generic(ctx, EncodationType::Text, low_ascii_to_text_symbols)
}

#[test]
fn test_text_values() {
    let vals = c40::to_vals(b'a', low_ascii_to_text_symbols);
    assert_eq!(vals.as_slice(), &[14]);
    let vals = c40::to_vals(b'A', low_ascii_to_text_symbols);
    assert_eq!(vals.as_slice(), &[2, 1]);
    let vals = c40::to_vals(b'{', low_ascii_to_text_symbols);
    assert_eq!(vals.as_slice(), &[2, 27]);
}
