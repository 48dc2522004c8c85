//! High-level QR Code encoder.
//!
//! The whole input goes into a single segment. Its mode is the most compact
//! one able to represent every byte, there is no segmentation.
use super::mode::{alphanumeric_value, Mode};
use super::Version;
use crate::bits::BitBuffer;
use crate::eci::CharacterSet;
use crate::error::EncodeError;
use crate::hints::EncodeHints;

#[cfg(test)]
use super::EcLevel;
#[cfg(test)]
use pretty_assertions::assert_eq;

const PAD_BYTES: [u8; 2] = [0xEC, 0x11];

/// Subtract the start of the Shift_JIS Kanji range of a double byte character.
fn kanji_offset(hi: u8, lo: u8) -> Option<u16> {
    let code = u16::from(hi) << 8 | u16::from(lo);
    match code {
        0x8140..=0x9FFC => Some(code - 0x8140),
        0xE040..=0xEBBF => Some(code - 0xC140),
        _ => None,
    }
}

fn is_only_kanji(data: &[u8]) -> bool {
    !data.is_empty()
        && data.len() % 2 == 0
        && data
            .chunks_exact(2)
            .all(|pair| kanji_offset(pair[0], pair[1]).is_some())
}

/// Pick the segment mode for the input.
pub(crate) fn choose_mode(data: &[u8], charset: Option<CharacterSet>) -> Mode {
    if charset == Some(CharacterSet::ShiftJis) && is_only_kanji(data) {
        return Mode::Kanji;
    }
    if data.is_empty() || data.iter().any(|ch| alphanumeric_value(*ch).is_none()) {
        Mode::Byte
    } else if data.iter().any(|ch| !ch.is_ascii_digit()) {
        Mode::Alphanumeric
    } else {
        Mode::Numeric
    }
}

/// Length of the ECI designator in bits.
fn eci_designator_bits(value: u32) -> u32 {
    match value {
        0..=127 => 8,
        128..=16383 => 16,
        _ => 24,
    }
}

fn append_eci_designator(bits: &mut BitBuffer, value: u32) -> std::io::Result<()> {
    match eci_designator_bits(value) {
        8 => bits.append_bits(value, 8),
        16 => bits.append_bits(0b10 << 14 | value, 16),
        _ => bits.append_bits(0b110 << 21 | value, 24),
    }
}

fn character_count(data: &[u8], mode: Mode) -> usize {
    match mode {
        Mode::Kanji => data.len() / 2,
        _ => data.len(),
    }
}

/// Length of the segment data without header and character count.
fn data_bits(count: usize, mode: Mode) -> usize {
    match mode {
        Mode::Numeric => 10 * (count / 3) + [0, 4, 7][count % 3],
        Mode::Alphanumeric => 11 * (count / 2) + 6 * (count % 2),
        Mode::Kanji => 13 * count,
        _ => 8 * count,
    }
}

fn append_data(bits: &mut BitBuffer, data: &[u8], mode: Mode) -> Result<(), EncodeError> {
    match mode {
        Mode::Numeric => {
            for chunk in data.chunks(3) {
                let value = chunk.iter().try_fold(0, |acc, ch| {
                    if ch.is_ascii_digit() {
                        Ok(acc * 10 + u32::from(ch - b'0'))
                    } else {
                        Err(EncodeError::IllegalCharacter(*ch))
                    }
                })?;
                bits.append_bits(value, [0, 4, 7, 10][chunk.len()])?;
            }
        }
        Mode::Alphanumeric => {
            for chunk in data.chunks(2) {
                let value = chunk.iter().try_fold(0, |acc, ch| {
                    alphanumeric_value(*ch)
                        .map(|v| acc * 45 + v)
                        .ok_or(EncodeError::IllegalCharacter(*ch))
                })?;
                bits.append_bits(value, if chunk.len() == 2 { 11 } else { 6 })?;
            }
        }
        Mode::Kanji => {
            for pair in data.chunks_exact(2) {
                let offset =
                    kanji_offset(pair[0], pair[1]).ok_or(EncodeError::IllegalCharacter(pair[0]))?;
                let value = u32::from(offset >> 8) * 0xC0 + u32::from(offset & 0xFF);
                bits.append_bits(value, 13)?;
            }
        }
        _ => {
            for ch in data {
                bits.append_bits(u32::from(*ch), 8)?;
            }
        }
    }
    Ok(())
}

/// Encode the input to data codewords (without error correction).
///
/// Returns the codewords together with the chosen version and mode.
pub(crate) fn encode(
    data: &[u8],
    hints: &EncodeHints,
) -> Result<(Vec<u8>, &'static Version, Mode), EncodeError> {
    let level = hints.ec_level;
    let mode = choose_mode(data, hints.character_set);
    let eci = hints.declared_charset().filter(|_| mode == Mode::Byte);
    let count = character_count(data, mode);

    let header_bits = eci.map_or(0, |cs| 4 + eci_designator_bits(cs.value()) as usize)
        + if hints.gs1 { 4 } else { 0 }
        + 4;
    let fits = |version: &Version| {
        let count_bits = mode.character_count_bits(version);
        let total = header_bits + count_bits as usize + data_bits(count, mode);
        count < 1 << count_bits && total <= version.data_codewords(level) * 8
    };
    let version = match hints.version {
        Some(number) => Version::for_number(number).filter(|v| fits(*v)),
        None => (1..=40).filter_map(Version::for_number).find(|v| fits(*v)),
    }
    .ok_or(EncodeError::CapacityExceeded)?;
    log::debug!("QR version {}-{} in {:?} mode", version.number(), level, mode);

    let mut bits = BitBuffer::new();
    if let Some(charset) = eci {
        bits.append_bits(Mode::Eci.bits(), 4)?;
        append_eci_designator(&mut bits, charset.value())?;
    }
    if hints.gs1 {
        bits.append_bits(Mode::Fnc1First.bits(), 4)?;
    }
    bits.append_bits(mode.bits(), 4)?;
    bits.append_bits(count as u32, mode.character_count_bits(version))?;
    append_data(&mut bits, data, mode)?;

    let capacity = version.data_codewords(level);
    let terminator = (capacity * 8 - bits.len()).min(4);
    bits.append_bits(0, terminator as u32)?;
    let mut codewords = bits.into_bytes()?;
    debug_assert!(codewords.len() <= capacity);
    for pad in PAD_BYTES.iter().cycle().take(capacity - codewords.len()) {
        codewords.push(*pad);
    }
    Ok((codewords, version, mode))
}

/// Data codewords of an encoding with the given hints.
#[cfg(test)]
fn codewords(data: &[u8], hints: &EncodeHints) -> Vec<u8> {
    encode(data, hints).unwrap().0
}

#[test]
fn test_numeric() {
    let hints = EncodeHints::new().with_ec_level(EcLevel::M);
    assert_eq!(
        codewords(b"01234567", &hints),
        vec![
            0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11
        ]
    );
}

#[test]
fn test_alphanumeric() {
    let cw = codewords(b"AC-42", &EncodeHints::new());
    assert_eq!(cw.len(), 19);
    assert_eq!(&cw[..8], &[0x20, 0x29, 0xCE, 0xE7, 0x21, 0x00, 0xEC, 0x11]);
}

#[test]
fn test_kanji() {
    let hints = EncodeHints::new().with_character_set(CharacterSet::ShiftJis);
    let (cw, _, mode) = encode(&[0x93, 0x5F, 0xE4, 0xAA], &hints).unwrap();
    assert_eq!(mode, Mode::Kanji);
    assert_eq!(&cw[..6], &[0x80, 0x26, 0xCF, 0xEA, 0xA8, 0x00]);
}

#[test]
fn test_eci_header() {
    let hints = EncodeHints::new().with_character_set(CharacterSet::Utf8);
    let cw = codewords("é".as_bytes(), &hints);
    assert_eq!(&cw[..6], &[0x71, 0xA4, 0x02, 0xC3, 0xA9, 0x00]);

    // no designator outside byte mode
    let cw = codewords(b"123", &hints);
    assert_eq!(cw[0] >> 4, Mode::Numeric.bits() as u8);
}

#[test]
fn test_eci_designator_lengths() {
    let mut bits = BitBuffer::new();
    append_eci_designator(&mut bits, 26).unwrap();
    append_eci_designator(&mut bits, 1000).unwrap();
    append_eci_designator(&mut bits, 100_000).unwrap();
    assert_eq!(bits.len(), 48);
    assert_eq!(
        bits.into_bytes().unwrap(),
        vec![26, 0x83, 0xE8, 0xC1, 0x86, 0xA0]
    );
}

#[test]
fn test_choose_mode() {
    let sjis = Some(CharacterSet::ShiftJis);
    assert_eq!(choose_mode(b"", None), Mode::Byte);
    assert_eq!(choose_mode(b"0123", None), Mode::Numeric);
    assert_eq!(choose_mode(b"0123A", None), Mode::Alphanumeric);
    assert_eq!(choose_mode(b"abc", None), Mode::Byte);
    assert_eq!(choose_mode(&[0x93, 0x5F], None), Mode::Byte);
    assert_eq!(choose_mode(&[0x93, 0x5F], sjis), Mode::Kanji);
    // odd length or a single byte character
    assert_eq!(choose_mode(&[0x93, 0x5F, 0x41], sjis), Mode::Byte);
    assert_eq!(choose_mode(&[0xA0, 0x41], sjis), Mode::Byte);
}

#[test]
fn test_version_choice() {
    let hints = EncodeHints::new();
    assert_eq!(encode(&[b'a'; 17], &hints).unwrap().1.number(), 1);
    assert_eq!(encode(&[b'a'; 18], &hints).unwrap().1.number(), 2);
    assert_eq!(encode(&[b'1'; 41], &hints).unwrap().1.number(), 1);
    assert_eq!(encode(&[b'1'; 42], &hints).unwrap().1.number(), 2);

    let hints = EncodeHints::new().with_ec_level(EcLevel::H).with_version(10);
    let (cw, version, _) = encode(b"HELLO", &hints).unwrap();
    assert_eq!(version.number(), 10);
    assert_eq!(cw.len(), version.data_codewords(EcLevel::H));
}

#[test]
fn test_capacity_exceeded() {
    let hints = EncodeHints::new().with_version(1);
    assert!(matches!(
        encode(&[b'a'; 18], &hints),
        Err(EncodeError::CapacityExceeded)
    ));
    assert!(matches!(
        encode(&[0u8; 2954], &EncodeHints::new()),
        Err(EncodeError::CapacityExceeded)
    ));
    assert!(encode(&[0u8; 2953], &EncodeHints::new()).is_ok());
    assert!(matches!(
        encode(b"1", &EncodeHints::new().with_version(41)),
        Err(EncodeError::CapacityExceeded)
    ));
}

#[test]
fn test_gs1_header() {
    let hints = EncodeHints::new().with_gs1(true);
    let cw = codewords(b"01", &hints);
    // FNC1 first, numeric, count 2
    assert_eq!(&cw[..2], &[0x51, 0x00]);
}
