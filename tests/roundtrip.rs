use matrixcode::datamatrix::data::{decode_data, encode_data};
use matrixcode::reed_solomon::{self, DataMatrixField, QrField};
use matrixcode::{
    Bitmap, DataMatrix, DecodeError, EcLevel, EncodeHints, Mode, QrCode, SymbolList, SymbolShape,
};
use proptest::prelude::*;

/// Text of a symbol without ECI maps each byte to the char with the same value.
fn latin1(data: &[u8]) -> String {
    data.iter().map(|b| char::from(*b)).collect()
}

/// Text of a QR byte segment without ECI, UTF-8 when the bytes are valid UTF-8.
fn guessed_text(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_owned(),
        Err(_) => latin1(data),
    }
}

fn dm_round_trip(data: &[u8]) -> Result<(), TestCaseError> {
    dm_round_trip_with(data, &EncodeHints::default())?;
    Ok(())
}

fn dm_round_trip_with(data: &[u8], hints: &EncodeHints) -> Result<DataMatrix, TestCaseError> {
    let code = DataMatrix::encode(data, hints).expect("encode");
    let result = DataMatrix::decode(code.bitmap()).expect("decode");
    prop_assert_eq!(result.text(), latin1(data));
    Ok(code)
}

/// Runs of EDIFACT characters interrupted by bytes above 127.
fn edifact_with_extended_bytes() -> impl Strategy<Value = Vec<u8>> {
    let run = prop_oneof![
        "[ -^]{1,14}".prop_map(String::into_bytes),
        prop::collection::vec(128u8..=255, 1..4),
    ];
    prop::collection::vec(run, 1..6).prop_map(|runs| runs.concat())
}

fn qr_round_trip(data: &[u8], hints: &EncodeHints) -> Result<(), TestCaseError> {
    let code = QrCode::encode(data, hints).expect("encode");
    let result = QrCode::decode(code.bitmap()).expect("decode");
    if code.mode() == Mode::Byte {
        prop_assert_eq!(result.byte_segments(), &[data.to_vec()]);
        prop_assert_eq!(result.text(), guessed_text(data));
    } else {
        prop_assert_eq!(result.text().as_bytes(), data);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn dm_arbitrary_bytes(data in prop::collection::vec(any::<u8>(), 0..200)) {
        dm_round_trip(&data)?;
    }

    #[test]
    fn dm_c40_alphabet(text in "[A-Z0-9 ]{0,80}") {
        dm_round_trip(text.as_bytes())?;
    }

    #[test]
    fn dm_text_alphabet(text in "[a-z0-9 ]{0,80}") {
        dm_round_trip(text.as_bytes())?;
    }

    #[test]
    fn dm_x12_alphabet(text in "[A-Z0-9*> \r]{0,80}") {
        dm_round_trip(text.as_bytes())?;
    }

    #[test]
    fn dm_edifact_alphabet(text in "[ -^]{0,80}") {
        dm_round_trip(text.as_bytes())?;
    }

    #[test]
    fn dm_edifact_runs_with_extended_bytes(data in edifact_with_extended_bytes()) {
        dm_round_trip(&data)?;
    }

    #[test]
    fn dm_shape_hints(
        text in "[A-Za-z0-9 .]{0,30}",
        rectangle in any::<bool>(),
        extended in any::<bool>(),
    ) {
        let shape = if rectangle { SymbolShape::Rectangle } else { SymbolShape::Square };
        let hints = EncodeHints::new().with_shape(shape).with_extended_rectangles(extended);
        let code = dm_round_trip_with(text.as_bytes(), &hints)?;
        let (width, height) = (code.bitmap().width(), code.bitmap().height());
        if rectangle {
            prop_assert!(width > height, "{}x{}", width, height);
        } else {
            prop_assert_eq!(width, height);
        }
    }

    #[test]
    fn dm_digits(text in "[0-9]{0,120}") {
        dm_round_trip(text.as_bytes())?;
    }

    #[test]
    fn dm_encoding_is_deterministic(data in prop::collection::vec(any::<u8>(), 0..100)) {
        let symbols = SymbolList::default();
        let hints = EncodeHints::default();
        let first = encode_data(&data, &symbols, &hints).expect("encode");
        let second = encode_data(&data, &symbols, &hints).expect("encode");
        prop_assert_eq!(&first, &second);
        let decoded = decode_data(&first.0).expect("decode");
        prop_assert_eq!(decoded.text(), latin1(&data));
    }

    #[test]
    fn qr_arbitrary_bytes(data in prop::collection::vec(any::<u8>(), 0..300)) {
        qr_round_trip(&data, &EncodeHints::new())?;
    }

    #[test]
    fn qr_numeric(text in "[0-9]{1,200}", level in 0..4usize) {
        let level = [EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H][level];
        qr_round_trip(text.as_bytes(), &EncodeHints::new().with_ec_level(level))?;
    }

    #[test]
    fn qr_alphanumeric(text in "[0-9A-Z $%*+./:-]{1,150}") {
        qr_round_trip(text.as_bytes(), &EncodeHints::new().with_ec_level(EcLevel::M))?;
    }

    #[test]
    fn qr_survives_mirroring(text in "[a-z]{1,40}") {
        let code = QrCode::encode(text.as_bytes(), &EncodeHints::new()).expect("encode");
        let result = QrCode::decode(&code.bitmap().transposed()).expect("decode");
        prop_assert_eq!(result.text(), text.as_str());
        prop_assert!(result.is_mirrored());
    }

    #[test]
    fn rs_corrects_up_to_half_the_ec_codewords(
        data in prop::collection::vec(any::<u8>(), 1..60),
        ec_len in 2..24usize,
        seed in any::<u64>(),
        qr in any::<bool>(),
    ) {
        let mut block = data.clone();
        block.resize(data.len() + ec_len, 0);
        if qr {
            reed_solomon::encode::<QrField>(&mut block, ec_len);
        } else {
            reed_solomon::encode::<DataMatrixField>(&mut block, ec_len);
        }
        let original = block.clone();

        // distinct positions, derived from the seed
        let errors = ec_len / 2;
        let mut positions: Vec<usize> = (0..block.len()).collect();
        let mut state = seed;
        for i in 0..errors {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = i + (state >> 33) as usize % (positions.len() - i);
            positions.swap(i, j);
            block[positions[i]] ^= ((state >> 17) as u8).max(1);
        }

        let corrected = if qr {
            reed_solomon::decode::<QrField>(&mut block, ec_len)
        } else {
            reed_solomon::decode::<DataMatrixField>(&mut block, ec_len)
        };
        prop_assert_eq!(corrected, Ok(errors));
        prop_assert_eq!(block, original);
    }
}

#[test]
fn hello_world_in_both_symbologies() {
    let hints = EncodeHints::default();
    let dm = DataMatrix::encode(b"Hello World", &hints).unwrap();
    let result = DataMatrix::decode(dm.bitmap()).unwrap();
    assert_eq!(result.text(), "Hello World");
    assert!(result.byte_segments().is_empty());

    let qr = QrCode::encode(b"Hello World", &hints).unwrap();
    let result = QrCode::decode(qr.bitmap()).unwrap();
    assert_eq!(result.text(), "Hello World");
}

#[test]
fn edifact_followed_by_extended_bytes() {
    let data = b"9 V;.E&!%&  \xFF\xFE";
    let code = DataMatrix::encode(data, &EncodeHints::default()).unwrap();
    let result = DataMatrix::decode(code.bitmap()).unwrap();
    assert_eq!(result.text(), latin1(data));
}

#[test]
fn every_dmre_size() {
    let standard = SymbolList::default();
    let extended = SymbolList::with_extended_rectangles();
    let dmre: Vec<_> = extended.iter().filter(|s| !standard.contains(s)).collect();
    assert_eq!(dmre.len(), 18);
    for size in dmre {
        for data in [&b"A"[..], b"DMRE 0123456789"] {
            let code = DataMatrix::encode_with_symbols(data, size, &EncodeHints::default())
                .unwrap_or_else(|e| panic!("{:?}: {}", size, e));
            assert_eq!(code.symbol_size(), size);
            let result = DataMatrix::decode(code.bitmap()).unwrap();
            assert_eq!(result.text().as_bytes(), data, "{:?}", size);
        }
    }
}

#[test]
fn blank_grids() {
    // all light: the zero codewords are a valid code word, codeword 0 is not valid data
    assert!(matches!(
        DataMatrix::decode(&Bitmap::new(10, 10)),
        Err(DecodeError::Format(_))
    ));
    let dark = Bitmap::from_vec(10, vec![true; 100]);
    assert_eq!(DataMatrix::decode(&dark), Err(DecodeError::Checksum));
}

#[test]
fn empty_base256_segment() {
    // latch to Base256, length 0 randomized at position 2, nothing follows
    let result = decode_data(&[231, 44]).unwrap();
    assert_eq!(result.text(), "");
    assert_eq!(result.byte_segments(), &[Vec::<u8>::new()]);
}
