use pretty_assertions::assert_eq;

use super::decode_data;
use crate::datamatrix::encodation::encode_data;
use crate::datamatrix::SymbolList;
use crate::eci::CharacterSet;
use crate::error::DecodeError;
use crate::hints::EncodeHints;

fn text(codewords: &[u8]) -> String {
    decode_data(codewords).unwrap().text().to_string()
}

#[test]
fn test_ascii() {
    assert_eq!(text(b"BCD\x82\xeb\x26"), "ABC00\u{a5}");
}

#[test]
fn test_c40() {
    assert_eq!(text(&[230, 91, 11]), "AIM");
    assert_eq!(text(&[230, 91, 11, 91, 11, 91, 11, 254]), "AIMAIMAIM");
}

#[test]
fn test_text() {
    assert_eq!(text(&[239, 91, 11, 91, 11, 91, 11, 254]), "aimaimaim");
}

#[test]
fn test_x12() {
    assert_eq!(
        text(&[238, 89, 233, 14, 192, 100, 207, 44, 31, 67]),
        "ABC>ABC123>AB"
    );
}

#[test]
fn test_edifact() {
    assert_eq!(text(&[240, 16, 21, 1]), "DATA");
    assert_eq!(
        text(&[240, 184, 27, 131, 198, 236, 238, 98, 231, 192]),
        ".A.C1.3.X."
    );
}

#[test]
fn test_base256() {
    let result = decode_data(&[231, 44, 108, 59, 226, 126, 1, 104]).unwrap();
    assert_eq!(
        result.byte_segments(),
        &[vec![0xab, 0xe4, 0xf6, 0xfc, 0xe9, 0xbb]]
    );
    assert_eq!(result.text(), "«äöüé»");
}

#[test]
fn test_base256_empty_at_end() {
    // length field 0 means "until the end", which is nothing here
    let result = decode_data(&[231, 44]).unwrap();
    assert_eq!(result.byte_segments(), &[Vec::<u8>::new()]);
    assert_eq!(result.text(), "");
}

#[test]
fn test_base256_truncated() {
    // declares 5 bytes, only 1 follows
    // the length codeword sits at position 2
    let length = 5 + 44;
    assert_eq!(
        decode_data(&[231, length, 0]),
        Err(DecodeError::Format("Base256 segment ends early"))
    );
}

#[test]
fn test_padding_stops_decoding() {
    assert_eq!(text(&[66, 129, 70]), "A");
}

#[test]
fn test_illegal_codewords() {
    assert!(matches!(decode_data(&[0]), Err(DecodeError::Format(_))));
    assert!(matches!(decode_data(&[254, 66]), Err(DecodeError::Format(_))));
    assert!(matches!(decode_data(&[242]), Err(DecodeError::Format(_))));
    // X12 value 40 does not exist
    assert!(matches!(
        decode_data(&[238, 250, 0]),
        Err(DecodeError::Format(_))
    ));
}

#[test]
fn test_macro_05() {
    assert_eq!(
        text(&[236, 66, 67, 68, 142, 52, 129, 56]),
        "[)>\u{1E}05\u{1D}ABC123\u{1E}\u{04}"
    );
}

#[test]
fn test_fnc1_modifier() {
    let result = decode_data(&[232, 131, 131, 153, 175, 197, 129, 56]).unwrap();
    assert_eq!(result.text(), "\u{1D}0101234567");
    assert_eq!(result.symbology_identifier(), "]d2");

    let result = decode_data(&[66, 232, 67]).unwrap();
    assert_eq!(result.symbology_identifier(), "]d3");

    let result = decode_data(&[66, 67, 232]).unwrap();
    assert_eq!(result.symbology_identifier(), "]d1");
}

#[test]
fn test_eci_switches_charset() {
    let result = decode_data(&[241, 27, 231, 92, 175, 43, 140, 112, 236, 129]).unwrap();
    assert_eq!(result.text(), "été");
    assert_eq!(result.symbology_identifier(), "]d4");
}

#[test]
fn test_read_eci() {
    fn enc_dec(eci: u32) -> u32 {
        let mut cw = Vec::new();
        crate::datamatrix::encodation::write_eci_designator(&mut cw, eci);
        let mut bits = crate::bits::BitSource::new(&cw);
        super::read_eci(&mut bits).unwrap()
    }

    for eci in (0..=999999).step_by(31) {
        assert_eq!(enc_dec(eci), eci);
    }
    assert_eq!(enc_dec(0), 0);
    assert_eq!(enc_dec(126), 126);
    assert_eq!(enc_dec(127), 127);
    assert_eq!(enc_dec(16382), 16382);
    assert_eq!(enc_dec(16383), 16383);
    assert_eq!(enc_dec(999999), 999999);
}

#[test]
fn test_round_trip_mixed() {
    let inputs: &[&[u8]] = &[
        b"Hello World!",
        b"AIMAIMAIMAIMaimaimaim",
        b".XXX.XXX.XXX.XXX.XXX.XXX.\xFCXX.XXX.XXX.XXX.XXX.XXX.XXX",
        b"\xab\xe4\xf6\xfc\xe9\xbb 23\xa3 1234567890123456789",
        b"fiykmj*Rh2`,e6",
        b"*DTCP01",
        b"",
    ];
    for input in inputs {
        let (codewords, _) =
            encode_data(input, &SymbolList::default(), &EncodeHints::default()).unwrap();
        let expected: String = input.iter().map(|b| *b as char).collect();
        assert_eq!(text(&codewords), expected);
    }
}

#[test]
fn test_round_trip_utf8() {
    let hints = EncodeHints::new().with_character_set(CharacterSet::Utf8);
    let input = "Grüße, 日本";
    let (codewords, _) =
        encode_data(input.as_bytes(), &SymbolList::default(), &hints).unwrap();
    assert_eq!(text(&codewords), input);
}
