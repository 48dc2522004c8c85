use super::matrix::{data_positions, format_positions, function_pattern};
use super::*;
use crate::eci::CharacterSet;
use pretty_assertions::assert_eq;

fn round_trip(data: &[u8], hints: &EncodeHints) -> DecoderResult {
    let code = QrCode::encode(data, hints).unwrap();
    QrCode::decode(code.bitmap()).unwrap()
}

#[test]
fn hello_world() {
    let code = QrCode::encode(b"Hello World", &EncodeHints::new()).unwrap();
    assert_eq!(code.version().number(), 1);
    assert_eq!(code.mode(), Mode::Byte);
    assert_eq!(code.ec_level(), EcLevel::L);
    assert_eq!(code.bitmap().width(), 21);

    let result = QrCode::decode(code.bitmap()).unwrap();
    assert_eq!(result.text(), "Hello World");
    assert_eq!(result.byte_segments(), &[b"Hello World".to_vec()]);
    assert_eq!(result.symbology_identifier(), "]Q1");
    assert_eq!(result.errors_corrected(), 0);
    assert!(!result.is_mirrored());
}

#[test]
fn modes_at_all_levels() {
    let inputs: [(&[u8], Mode); 3] = [
        (b"3141592653589793238462643383279", Mode::Numeric),
        (b"HTTPS://EXAMPLE.COM/$%*+-./:", Mode::Alphanumeric),
        (b"lower case, punctuation; and digits 0123", Mode::Byte),
    ];
    for level in enum_iterator::all::<EcLevel>() {
        let hints = EncodeHints::new().with_ec_level(level);
        for (data, mode) in inputs {
            let code = QrCode::encode(data, &hints).unwrap();
            assert_eq!(code.mode(), mode);
            let result = QrCode::decode(code.bitmap()).unwrap();
            assert_eq!(result.text().as_bytes(), data, "{:?} at {}", mode, level);
            assert_eq!(result.ec_level(), Some(level));
        }
    }
}

#[test]
fn every_version_and_mask() {
    for number in 1..=40u8 {
        let hints = EncodeHints::new()
            .with_version(number)
            .with_mask(number % 8)
            .with_ec_level(EcLevel::Q);
        let code = QrCode::encode(b"VERSION TEST", &hints).unwrap();
        assert_eq!(code.version().number(), number);
        assert_eq!(code.mask(), number % 8);
        assert_eq!(code.bitmap().width(), 17 + 4 * number as usize);
        let result = QrCode::decode(code.bitmap()).unwrap();
        assert_eq!(result.text(), "VERSION TEST", "version {}", number);
    }
}

#[test]
fn large_symbol() {
    let data: Vec<u8> = (0..2000).map(|i| (i % 251) as u8).collect();
    let code = QrCode::encode(&data, &EncodeHints::new()).unwrap();
    assert_eq!(code.version().number(), 33);
    let result = QrCode::decode(code.bitmap()).unwrap();
    assert_eq!(result.byte_segments(), &[data]);
}

#[test]
fn kanji() {
    let hints = EncodeHints::new().with_character_set(CharacterSet::ShiftJis);
    // "点茗" in Shift_JIS
    let code = QrCode::encode(&[0x93, 0x5F, 0xE4, 0xAA], &hints).unwrap();
    assert_eq!(code.mode(), Mode::Kanji);
    let result = QrCode::decode(code.bitmap()).unwrap();
    assert_eq!(result.text(), "点茗");
    assert!(result.byte_segments().is_empty());
}

#[test]
fn character_sets() {
    let text = "Grüße";
    let hints = EncodeHints::new().with_character_set(CharacterSet::Utf8);
    let result = round_trip(text.as_bytes(), &hints);
    assert_eq!(result.text(), text);
    assert_eq!(result.symbology_identifier(), "]Q2");

    // without ECI the UTF-8 bytes are recognized
    let result = round_trip(text.as_bytes(), &EncodeHints::new());
    assert_eq!(result.text(), text);
    assert_eq!(result.symbology_identifier(), "]Q1");

    // ISO-8859-1 is the default and never declared
    let hints = EncodeHints::new().with_character_set(CharacterSet::Iso8859_1);
    let result = round_trip(b"Gr\xFC\xDFe", &hints);
    assert_eq!(result.text(), text);
    assert_eq!(result.symbology_identifier(), "]Q1");
}

#[test]
fn gs1() {
    let hints = EncodeHints::new().with_gs1(true);
    let result = round_trip(b"01095011010209171719050810ABCD1234", &hints);
    assert_eq!(result.text(), "01095011010209171719050810ABCD1234");
    assert_eq!(result.symbology_identifier(), "]Q3");
}

#[test]
fn format_information_recovery() {
    let hints = EncodeHints::new().with_mask(2);
    let code = QrCode::encode(b"FORMAT", &hints).unwrap();
    let positions = format_positions(code.bitmap().width());
    let flipped = |bits: usize| {
        let mut grid = code.bitmap().clone();
        for copy in positions.iter() {
            for (x, y) in copy.iter().take(bits) {
                grid.set(*x, *y, !grid.get(*x, *y));
            }
        }
        grid
    };

    let result = QrCode::decode(&flipped(3)).unwrap();
    assert_eq!(result.text(), "FORMAT");
    assert_eq!(result.ec_level(), Some(EcLevel::L));
    assert_eq!(result.errors_corrected(), 0);

    assert!(matches!(
        QrCode::decode(&flipped(4)),
        Err(DecodeError::Format(_))
    ));
}

#[test]
fn corrects_codewords() {
    let code = QrCode::encode(b"CORRECT ME", &EncodeHints::new()).unwrap();
    let positions = data_positions(&function_pattern(code.version()));
    let mut grid = code.bitmap().clone();
    // one module in each of three codewords, version 1-L corrects three
    for i in [0, 8, 100] {
        let (x, y) = positions[i];
        grid.set(x, y, !grid.get(x, y));
    }
    let result = QrCode::decode(&grid).unwrap();
    assert_eq!(result.text(), "CORRECT ME");
    assert_eq!(result.errors_corrected(), 3);
}

#[test]
fn mirrored() {
    let code = QrCode::encode(b"seen from the back", &EncodeHints::new()).unwrap();
    let result = QrCode::decode(&code.bitmap().transposed()).unwrap();
    assert_eq!(result.text(), "seen from the back");
    assert!(result.is_mirrored());
}

#[test]
fn lowest_penalty_mask() {
    let data = b"mask selection is deterministic";
    let chosen = QrCode::encode(data, &EncodeHints::new()).unwrap();
    let scores: Vec<u32> = (0..8)
        .map(|pattern| {
            let hints = EncodeHints::new().with_mask(pattern);
            mask::penalty(QrCode::encode(data, &hints).unwrap().bitmap())
        })
        .collect();
    let best = scores.iter().min().unwrap();
    let first_best = scores.iter().position(|s| s == best).unwrap() as u8;
    assert_eq!(chosen.mask(), first_best);
    assert_eq!(QrCode::encode(data, &EncodeHints::new()).unwrap(), chosen);
}

#[test]
fn invalid_grids() {
    assert!(matches!(
        QrCode::decode(&Bitmap::new(22, 22)),
        Err(DecodeError::Format(_))
    ));
    // blank symbol without format information
    assert!(QrCode::decode(&Bitmap::new(21, 21)).is_err());
}

#[test]
fn capacity() {
    let hints = EncodeHints::new().with_ec_level(EcLevel::H);
    assert!(matches!(
        QrCode::encode(&[b'x'; 1300], &hints),
        Err(EncodeError::CapacityExceeded)
    ));
}
