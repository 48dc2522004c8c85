use pretty_assertions::assert_eq;

use super::{encode_data, EncodationType, EncodingContext};
use crate::datamatrix::{SymbolList, SymbolSize};
use crate::eci::CharacterSet;
use crate::error::EncodeError;
use crate::hints::EncodeHints;

/// Context with a single symbol of fixed capacity which never switches modes.
pub(super) struct DummyLogic {
    data: Vec<u8>,
    pos: usize,
    capacity: usize,
    pub(super) codewords: Vec<u8>,
    pub(super) mode: Option<EncodationType>,
}

impl DummyLogic {
    pub fn new(data: Vec<u8>, capacity: usize) -> Self {
        Self {
            data,
            pos: 0,
            capacity,
            codewords: Vec::new(),
            mode: None,
        }
    }
}

impl EncodingContext for DummyLogic {
    fn look_ahead(&self, mode: EncodationType) -> EncodationType {
        mode
    }

    fn update_symbol(&mut self, size_needed: usize) -> Result<usize, EncodeError> {
        if size_needed > self.capacity {
            Err(EncodeError::CapacityExceeded)
        } else {
            Ok(self.capacity)
        }
    }

    fn reset_symbol(&mut self) {}

    fn eat(&mut self) -> Option<u8> {
        let ch = self.data.get(self.pos).cloned()?;
        self.pos += 1;
        Some(ch)
    }

    fn backup(&mut self, steps: usize) {
        self.pos -= steps;
    }

    fn rest(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    fn push(&mut self, ch: u8) {
        self.codewords.push(ch);
    }

    fn codewords(&self) -> &[u8] {
        &self.codewords
    }

    fn set_mode(&mut self, mode: EncodationType) {
        self.mode = Some(mode);
    }
}

fn enc(data: &[u8]) -> Vec<u8> {
    enc_with(data, &SymbolList::default(), &EncodeHints::default()).0
}

fn enc_with(data: &[u8], symbols: &SymbolList, hints: &EncodeHints) -> (Vec<u8>, SymbolSize) {
    encode_data(data, symbols, hints).unwrap()
}

fn create_binary_test_message(len: usize) -> Vec<u8> {
    let mut vec = vec![171, 228, 246, 252, 233, 224, 225, 45];
    for _ in 0..len - 9 {
        vec.push(b'\xB7');
    }
    vec.push(b'\xBB');
    vec
}

#[test]
fn test_empty_input() {
    assert_eq!(
        enc_with(b"", &SymbolList::default(), &EncodeHints::default()),
        (vec![129, 175, 70], SymbolSize::Square10)
    );
}

#[test]
fn test_ascii_encodation_two_digits() {
    assert_eq!(enc(b"123456"), vec![142, 164, 186]);
}

#[test]
fn test_ascii_encodation_two_digits_with_upper() {
    assert_eq!(enc(b"123456\xa3"), vec![142, 164, 186, 235, 36]);
}

#[test]
fn test_ascii_encodation_example1() {
    assert_eq!(
        enc(b"30Q324343430794<OQQ"),
        vec![160, 82, 162, 173, 173, 173, 137, 224, 61, 80, 82, 82]
    );
}

#[test]
fn test_c40_basic1() {
    assert_eq!(enc(b"AIMAIMAIM"), vec![230, 91, 11, 91, 11, 91, 11, 254]);
}

#[test]
fn test_c40_basic2_1() {
    // "B" is normally encoded as "15" (one C40 value)
    // "else" case: "B" is encoded as ASCII
    assert_eq!(enc(b"AIMAIAB"), vec![230, 91, 11, 90, 255, 254, 67, 129]);
}

#[test]
fn test_c40_basic2_2() {
    // "b" is normally encoded as "Shift 3, 2" (two C40 values)
    // "else" case: "b" is encoded as ASCII
    assert_eq!(enc(b"AIMAIAb"), vec![66, 74, 78, 66, 74, 66, 99, 129]);
}

#[test]
fn test_c40_upper_shift_at_end() {
    assert_eq!(
        enc(b"AIMAIMAIM\xcb"),
        vec![230, 91, 11, 91, 11, 91, 11, 254, 235, 76]
    );
    // "\xeb" in C40 encodes to: 1, 30, 2, 11 which doesn't fit into a triplet
    assert_eq!(
        enc(b"AIMAIMAIM\xeb"),
        vec![230, 91, 11, 91, 11, 91, 11, 254, 235, 108]
    );
}

#[test]
fn test_c40_spec_example() {
    assert_eq!(
        enc_with(
            b"A1B2C3D4E5F6G7H8I9J0K1L2",
            &SymbolList::default(),
            &EncodeHints::default()
        ),
        (
            vec![230, 88, 88, 40, 8, 107, 147, 59, 67, 126, 206, 78, 126, 144, 121, 35, 47, 254],
            SymbolSize::Square18
        )
    );
}

#[test]
fn test_c40_partial_triple() {
    // Only 'A' and 'I' are left, UNLATCH and encode them as ASCII.
    assert_eq!(
        enc(b"AIMAIMAIMAIMAIMAI"),
        vec![230, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 254, 66, 74, 129, 237]
    );
    assert_eq!(
        enc(b"AIMAIMAIMAIMAIMAIMAI"),
        vec![230, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 91, 11, 254, 66, 74]
    );
}

#[test]
fn test_c40_single_value_left() {
    // one free codeword for the last 'A', no UNLATCH
    assert_eq!(
        enc_with(b"AIMAIMAIMA", &SymbolList::default(), &EncodeHints::default()),
        (
            vec![230, 91, 11, 91, 11, 91, 11, 66],
            SymbolSize::Square14
        )
    );
}

#[test]
fn test_c40_single_value_backtracks() {
    // the square symbol has two free codewords, so the last 'A' is
    // given back to ASCII after an UNLATCH
    let square = EncodeHints::new().with_shape(crate::SymbolShape::Square);
    assert_eq!(
        enc_with(b"AIMAIMAIMAIMA", &square.symbol_list(), &square),
        (
            vec![230, 91, 11, 91, 11, 91, 11, 91, 11, 254, 66, 129],
            SymbolSize::Square16
        )
    );
    let rect = EncodeHints::new().with_shape(crate::SymbolShape::Rectangle);
    assert_eq!(
        enc_with(b"AIMAIMAIMAIMA", &rect.symbol_list(), &rect),
        (
            vec![230, 91, 11, 91, 11, 91, 11, 91, 11, 66],
            SymbolSize::Rect8x32
        )
    );
}

#[test]
fn test_text_encoding_1() {
    // 239 shifts to Text encodation, 254 unlatches
    assert_eq!(enc(b"aimaimaim"), vec![239, 91, 11, 91, 11, 91, 11, 254]);
}

#[test]
fn test_text_encoding_2() {
    assert_eq!(
        enc(b"aimaimaim'"),
        vec![239, 91, 11, 91, 11, 91, 11, 254, 40, 129]
    );
}

#[test]
fn test_text_encoding_3() {
    assert_eq!(enc(b"aimaimaIm"), vec![239, 91, 11, 91, 11, 87, 218, 110]);
}

#[test]
fn test_text_encoding_4() {
    assert_eq!(
        enc(b"aimaimaimB"),
        vec![239, 91, 11, 91, 11, 91, 11, 254, 67, 129]
    );
}

#[test]
fn test_text_encoding_5() {
    assert_eq!(
        enc(b"aimaimaim{txt}\x04"),
        vec![239, 91, 11, 91, 11, 91, 11, 16, 218, 236, 107, 181, 69, 254, 129, 237]
    );
}

#[test]
fn test_x12_1() {
    // 238 shifts to X12 encodation, 254 unlatches
    assert_eq!(
        enc(b"ABC>ABC123>AB"),
        vec![238, 89, 233, 14, 192, 100, 207, 44, 31, 67]
    );
}

#[test]
fn test_x12_2() {
    assert_eq!(
        enc(b"ABC>ABC123>ABC"),
        vec![238, 89, 233, 14, 192, 100, 207, 44, 31, 254, 67, 68]
    );
}

#[test]
fn test_x12_3() {
    assert_eq!(
        enc(b"ABC>ABC123>ABCD"),
        vec![238, 89, 233, 14, 192, 100, 207, 44, 31, 96, 82, 254]
    );
}

#[test]
fn test_x12_4() {
    assert_eq!(
        enc(b"ABC>ABC123>ABCDE"),
        vec![238, 89, 233, 14, 192, 100, 207, 44, 31, 96, 82, 70]
    );
}

#[test]
fn test_x12_5() {
    assert_eq!(
        enc(b"ABC>ABC123>ABCDEF"),
        vec![238, 89, 233, 14, 192, 100, 207, 44, 31, 96, 82, 254, 70, 71, 129, 237]
    );
}

#[test]
fn test_x12_unlatch() {
    assert_eq!(enc(b"*DTCP0"), vec![238, 9, 10, 104, 141]);
    // with a trailing digit ASCII is cheaper from the start
    assert_eq!(enc(b"*DTCP01"), vec![43, 69, 85, 68, 81, 131, 129, 56]);
}

#[test]
fn test_edifact_1() {
    // 240 shifts to EDIFACT encodation
    assert_eq!(
        enc_with(
            b".A.C1.3.DATA.123DATA.123DATA",
            &SymbolList::default(),
            &EncodeHints::default()
        ),
        (
            vec![
                240, 184, 27, 131, 198, 236, 238, 16, 21, 1, 187, 28, 179, 16, 21, 1, 187, 28, 179,
                16, 21, 1
            ],
            SymbolSize::Square20
        )
    );
}

#[test]
fn test_edifact_2() {
    assert_eq!(
        enc(b".A.C1.3.X.X2.."),
        vec![240, 184, 27, 131, 198, 236, 238, 98, 230, 50, 47, 47]
    );
}

#[test]
fn test_edifact_3() {
    assert_eq!(
        enc(b".A.C1.3.X.X2."),
        vec![240, 184, 27, 131, 198, 236, 238, 98, 230, 50, 47, 129]
    );
}

#[test]
fn test_edifact_4() {
    assert_eq!(
        enc(b".A.C1.3.X.X2"),
        vec![240, 184, 27, 131, 198, 236, 238, 98, 230, 50]
    );
}

#[test]
fn test_edifact_5() {
    assert_eq!(
        enc(b".A.C1.3.X.X"),
        vec![240, 184, 27, 131, 198, 236, 238, 98, 230, 31]
    );
}

#[test]
fn test_edifact_6() {
    assert_eq!(
        enc(b".A.C1.3.X."),
        vec![240, 184, 27, 131, 198, 236, 238, 98, 231, 192]
    );
}

#[test]
fn test_edifact_7() {
    assert_eq!(
        enc(b".A.C1.3.X"),
        vec![240, 184, 27, 131, 198, 236, 238, 89]
    );
}

#[test]
fn test_edifact_8() {
    // temporary unlatch from EDIFACT
    assert_eq!(
        enc(b".XXX.XXX.XXX.XXX.XXX.XXX.\xFCXX.XXX.XXX.XXX.XXX.XXX.XXX"),
        vec![
            240, 185, 134, 24, 185, 134, 24, 185, 134, 24, 185, 134, 24, 185, 134, 24, 185, 134,
            24,
            // 124 == UNLATCH << 2 (so edifact encoding of single value UNLATCH)
            124, 47, 235, 125, 240, 97, 139, 152, 97, 139, 152, 97, 139, 152, 97, 139, 152, 97, 139,
            152, 97, 139, 152, 89, 89
        ]
    );
}

#[test]
fn test_edifact_not_chosen_for_short_lowercase_tail() {
    assert_eq!(
        enc(b"CREX-TAN:h"),
        vec![68, 83, 70, 89, 46, 85, 66, 79, 59, 105]
    );
}

#[test]
fn test_base256_1() {
    // 231 shifts to Base256 encodation
    assert_eq!(
        enc(b"\xab\xe4\xf6\xfc\xe9\xbb"),
        vec![231, 44, 108, 59, 226, 126, 1, 104]
    );
}

#[test]
fn test_base256_2() {
    assert_eq!(
        enc(b"\xab\xe4\xf6\xfc\xe9\xe0\xbb"),
        vec![231, 51, 108, 59, 226, 126, 1, 141, 254, 129]
    );
}

#[test]
fn test_base256_3() {
    assert_eq!(
        enc(b"\xab\xe4\xf6\xfc\xe9\xe0\xe1\xbb"),
        vec![231, 44, 108, 59, 226, 126, 1, 141, 36, 147]
    );
}

#[test]
fn test_base256_4() {
    // ASCII only (for reference)
    assert_eq!(enc(b" 23\xa3"), vec![33, 153, 235, 36, 129]);
}

#[test]
fn test_base256_5() {
    // Mixed Base256 + ASCII
    assert_eq!(
        enc(b"\xab\xe4\xf6\xfc\xe9\xbb 234"),
        vec![231, 50, 108, 59, 226, 126, 1, 104, 33, 153, 53, 129]
    );
}

#[test]
fn test_base256_7() {
    // padding necessary at the end
    assert_eq!(
        enc(&create_binary_test_message(20)),
        vec![
            231, 44, 108, 59, 226, 126, 1, 141, 36, 5, 37, 187, 80, 230, 123, 17, 166, 60, 210,
            103, 253, 150
        ]
    );
}

#[test]
fn test_base256_8() {
    assert_eq!(
        enc(&create_binary_test_message(19)),
        vec![
            231, 63, 108, 59, 226, 126, 1, 141, 36, 5, 37, 187, 80, 230, 123, 17, 166, 60, 210,
            103, 1, 129
        ],
    );
}

#[test]
fn test_base256_two_byte_length() {
    let words = enc(&create_binary_test_message(276));
    let start = vec![231, 38, 219, 2, 208, 120, 20, 150, 35];
    assert_eq!(&words[..start.len()], &start);
    let end = vec![146, 40, 194, 129];
    assert_eq!(&words[words.len() - end.len()..], &end);

    let words = enc(&create_binary_test_message(277));
    let start = vec![231, 38, 220, 2, 208, 120, 20, 150, 35];
    assert_eq!(&words[..start.len()], &start);
    let end = vec![146, 40, 190, 87];
    assert_eq!(&words[words.len() - end.len()..], &end);
}

#[test]
fn test_unlatching_from_c40() {
    assert_eq!(
        enc(b"AIMAIMAIMAIMaimaimaim"),
        vec![230, 91, 11, 91, 11, 91, 11, 254, 66, 74, 78, 239, 91, 11, 91, 11, 91, 11]
    );
}

#[test]
fn test_unlatching_from_text() {
    assert_eq!(
        enc(b"aimaimaimaim12345678"),
        vec![239, 91, 11, 91, 11, 91, 11, 91, 11, 254, 142, 164, 186, 208, 129, 237]
    );
}

#[test]
fn test_hello_world() {
    assert_eq!(
        enc(b"Hello World!"),
        vec![73, 239, 116, 130, 175, 123, 148, 64, 158, 233, 254, 34]
    );
}

#[test]
fn test_bug_3048549() {
    assert_eq!(
        enc(b"fiykmj*Rh2`,e6"),
        vec![239, 122, 87, 154, 40, 7, 171, 115, 207, 12, 130, 71, 155, 254, 129, 237]
    );
}

#[test]
fn test_macro_05_header() {
    assert_eq!(
        enc(b"[)>\x1E05\x1DABC123\x1E\x04"),
        vec![236, 66, 67, 68, 142, 52, 129, 56]
    );
    assert_eq!(enc(b"[)>\x1E06\x1D\x1E\x04"), vec![237, 129, 70]);
}

#[test]
fn test_gs1_header() {
    let hints = EncodeHints::new().with_gs1(true);
    assert_eq!(
        enc_with(b"0101234567", &SymbolList::default(), &hints).0,
        vec![232, 131, 131, 153, 175, 197, 129, 56]
    );
}

#[test]
fn test_eci_header() {
    let hints = EncodeHints::new().with_character_set(CharacterSet::Utf8);
    assert_eq!(
        enc_with(b"\xc3\xa9t\xc3\xa9", &SymbolList::default(), &hints),
        (
            vec![241, 27, 231, 92, 175, 43, 140, 112, 236, 129],
            SymbolSize::Rect8x32
        )
    );
}

#[test]
fn test_eci_designator_sizes() {
    let mut out = Vec::new();
    super::write_eci_designator(&mut out, 26);
    assert_eq!(out, vec![27]);
    out.clear();
    super::write_eci_designator(&mut out, 899);
    assert_eq!(out, vec![131, 11]);
    out.clear();
    super::write_eci_designator(&mut out, 16383);
    assert_eq!(out, vec![192, 1, 1]);
}

#[test]
fn test_too_much_data() {
    let data = vec![b'\xB7'; 1600];
    assert!(matches!(
        encode_data(&data, &SymbolList::default(), &EncodeHints::default()),
        Err(EncodeError::CapacityExceeded)
    ));
    assert!(matches!(
        encode_data(b"ABC", &SymbolList::from_iter([]), &EncodeHints::default()),
        Err(EncodeError::CapacityExceeded)
    ));
}

#[test]
fn test_fixed_size_too_small() {
    let list = SymbolList::from(SymbolSize::Square10);
    assert!(matches!(
        encode_data(b"ABCD", &list, &EncodeHints::default()),
        Err(EncodeError::CapacityExceeded)
    ));
    assert_eq!(
        enc_with(b"ABC", &list, &EncodeHints::default()),
        (vec![66, 67, 68], SymbolSize::Square10)
    );
}

#[test]
fn test_mode_switching_terminates() {
    // characters outside X12 and EDIFACT right after a latch candidate
    let mut data = b"a".to_vec();
    data.extend(std::iter::repeat(b'*').take(20));
    assert!(encode_data(&data, &SymbolList::default(), &EncodeHints::default()).is_ok());
    let mut data = b"a".to_vec();
    data.extend(std::iter::repeat(b'.').take(30));
    assert!(encode_data(&data, &SymbolList::default(), &EncodeHints::default()).is_ok());
}

#[test]
fn test_edifact_unlatch_before_extended_ascii() {
    let data = b"9 V;.E&!%&  \xFF\xFE";
    let cw = enc(data);
    assert!(cw.contains(&240));
    let result = crate::datamatrix::data::decode_data(&cw).unwrap();
    assert_eq!(result.text(), "9 V;.E&!%&  \u{FF}\u{FE}");
}
