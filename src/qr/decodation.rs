//! Parser for the bit stream in the data codewords of a QR Code symbol.
use super::mode::{Mode, ALPHANUMERIC};
use super::{EcLevel, Version};
use crate::bits::BitSource;
use crate::eci::{guess_charset, CharacterSet, TextBuilder};
use crate::error::DecodeError;
use crate::result::{DecoderResult, StructuredAppend};

const GS: u8 = 0x1D;
const GB2312_SUBSET: u32 = 1;

#[derive(Default)]
struct Flags {
    fnc1_first: bool,
    fnc1_second: bool,
}

impl Flags {
    fn in_effect(&self) -> bool {
        self.fnc1_first || self.fnc1_second
    }
}

/// Decode the data codewords of a symbol, after error correction.
pub(crate) fn decode_data(
    bytes: &[u8],
    version: &Version,
    ec_level: EcLevel,
) -> Result<DecoderResult, DecodeError> {
    let mut bits = BitSource::new(bytes);
    let mut text = TextBuilder::new(CharacterSet::Iso8859_1);
    let mut byte_segments = Vec::new();
    let mut structured_append = None;
    let mut flags = Flags::default();

    loop {
        // fewer than four bits left are an implicit terminator
        let mode = if bits.available() < 4 {
            Mode::Terminator
        } else {
            Mode::from_bits(bits.read_bits(4)?)?
        };
        log::trace!("QR segment {:?} at bit {}", mode, bytes.len() * 8 - bits.available());
        match mode {
            Mode::Terminator => break,
            Mode::Fnc1First => flags.fnc1_first = true,
            Mode::Fnc1Second => {
                // application indicator
                bits.read_bits(8)?;
                flags.fnc1_second = true;
            }
            Mode::StructuredAppend => {
                if bits.available() < 16 {
                    return Err(DecodeError::Format("structured append header ends early"));
                }
                structured_append = Some(StructuredAppend {
                    sequence: bits.read_byte()?,
                    parity: bits.read_byte()?,
                });
            }
            Mode::Eci => text.set_eci(read_eci(&mut bits)?)?,
            Mode::Hanzi => {
                let subset = bits.read_bits(4)?;
                if subset != GB2312_SUBSET {
                    return Err(DecodeError::Format("unsupported Hanzi subset"));
                }
                let count = bits.read_bits(mode.character_count_bits(version))?;
                text.push_str(&decode_hanzi(&mut bits, count)?);
            }
            Mode::Numeric => {
                let count = bits.read_bits(mode.character_count_bits(version))?;
                text.push_str(&decode_numeric(&mut bits, count)?);
            }
            Mode::Alphanumeric => {
                let count = bits.read_bits(mode.character_count_bits(version))?;
                text.push_str(&decode_alphanumeric(&mut bits, count, flags.in_effect())?);
            }
            Mode::Byte => {
                let count = bits.read_bits(mode.character_count_bits(version))?;
                let segment = read_bytes(&mut bits, count)?;
                if text.has_eci() {
                    text.push_bytes(&segment);
                } else {
                    let mut decoded = String::new();
                    guess_charset(&segment).decode(&segment, &mut decoded);
                    text.push_str(&decoded);
                }
                byte_segments.push(segment);
            }
            Mode::Kanji => {
                let count = bits.read_bits(mode.character_count_bits(version))?;
                text.push_str(&decode_kanji(&mut bits, count)?);
            }
        }
    }

    let modifier = match (flags.fnc1_first, flags.fnc1_second) {
        (true, _) => 3,
        (false, true) => 5,
        _ => 1,
    } + u8::from(text.has_eci());
    Ok(DecoderResult::new(text.finish(), bytes.to_vec(), 'Q')
        .with_byte_segments(byte_segments)
        .with_ec_level(ec_level)
        .with_symbology_modifier(modifier)
        .with_structured_append(structured_append))
}

fn read_eci(bits: &mut BitSource) -> Result<u32, DecodeError> {
    let first = bits.read_bits(8)?;
    if first & 0x80 == 0 {
        Ok(first & 0x7F)
    } else if first & 0xC0 == 0x80 {
        Ok((first & 0x3F) << 8 | bits.read_bits(8)?)
    } else if first & 0xE0 == 0xC0 {
        Ok((first & 0x1F) << 16 | bits.read_bits(16)?)
    } else {
        Err(DecodeError::Format("invalid ECI designator"))
    }
}

fn read_bytes(bits: &mut BitSource, count: u32) -> Result<Vec<u8>, DecodeError> {
    if 8 * count as usize > bits.available() {
        return Err(DecodeError::Format("byte segment ends early"));
    }
    (0..count).map(|_| bits.read_byte()).collect()
}

fn decode_numeric(bits: &mut BitSource, mut count: u32) -> Result<String, DecodeError> {
    let mut out = String::with_capacity(count as usize);
    while count > 0 {
        let (digits, width, limit) = match count {
            1 => (1, 4, 10),
            2 => (2, 7, 100),
            _ => (3, 10, 1000),
        };
        let value = bits.read_bits(width)?;
        if value >= limit {
            return Err(DecodeError::Format("numeric group out of range"));
        }
        out.push_str(&format!("{:0width$}", value, width = digits as usize));
        count -= digits;
    }
    Ok(out)
}

fn to_alphanumeric(value: u32) -> Result<u8, DecodeError> {
    ALPHANUMERIC
        .get(value as usize)
        .cloned()
        .ok_or(DecodeError::Format("alphanumeric value out of range"))
}

fn decode_alphanumeric(
    bits: &mut BitSource,
    mut count: u32,
    fnc1_in_effect: bool,
) -> Result<String, DecodeError> {
    let mut chars = Vec::with_capacity(count as usize);
    while count > 1 {
        let pair = bits.read_bits(11)?;
        chars.push(to_alphanumeric(pair / 45)?);
        chars.push(to_alphanumeric(pair % 45)?);
        count -= 2;
    }
    if count == 1 {
        chars.push(to_alphanumeric(bits.read_bits(6)?)?);
    }

    if fnc1_in_effect {
        // "%%" stands for "%", a single "%" for FNC1
        let mut unescaped = Vec::with_capacity(chars.len());
        let mut iter = chars.into_iter().peekable();
        while let Some(ch) = iter.next() {
            if ch == b'%' {
                if iter.peek() == Some(&b'%') {
                    iter.next();
                    unescaped.push(b'%');
                } else {
                    unescaped.push(GS);
                }
            } else {
                unescaped.push(ch);
            }
        }
        chars = unescaped;
    }
    Ok(chars.into_iter().map(char::from).collect())
}

/// Read `count` 13 bit values and unfold them into double byte characters.
fn read_double_bytes(
    bits: &mut BitSource,
    count: u32,
    unfold: impl Fn(u32) -> u32,
) -> Result<Vec<u8>, DecodeError> {
    if 13 * count as usize > bits.available() {
        return Err(DecodeError::Format("double byte segment ends early"));
    }
    let mut out = Vec::with_capacity(2 * count as usize);
    for _ in 0..count {
        let code = unfold(bits.read_bits(13)?);
        out.push((code >> 8) as u8);
        out.push(code as u8);
    }
    Ok(out)
}

fn decode_kanji(bits: &mut BitSource, count: u32) -> Result<String, DecodeError> {
    let bytes = read_double_bytes(bits, count, |value| {
        let code = (value / 0xC0) << 8 | (value % 0xC0);
        if code < 0x1F00 {
            code + 0x8140
        } else {
            code + 0xC140
        }
    })?;
    let mut out = String::new();
    CharacterSet::ShiftJis.decode(&bytes, &mut out);
    Ok(out)
}

fn decode_hanzi(bits: &mut BitSource, count: u32) -> Result<String, DecodeError> {
    let bytes = read_double_bytes(bits, count, |value| {
        let code = (value / 0x60) << 8 | (value % 0x60);
        if code < 0xA00 {
            code + 0xA1A1
        } else {
            code + 0xA6A1
        }
    })?;
    let mut out = String::new();
    // GB 2312 in its EUC form is a subset of GB 18030
    CharacterSet::Gb18030.decode(&bytes, &mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitBuffer;
    use pretty_assertions::assert_eq;

    fn version(number: u8) -> &'static Version {
        Version::for_number(number).unwrap()
    }

    /// Pack `(value, width)` groups into codewords.
    fn stream(groups: &[(u32, u32)]) -> Vec<u8> {
        let mut buf = BitBuffer::new();
        for (value, width) in groups {
            buf.append_bits(*value, *width).unwrap();
        }
        buf.into_bytes().unwrap()
    }

    fn decode(groups: &[(u32, u32)]) -> Result<DecoderResult, DecodeError> {
        decode_data(&stream(groups), version(1), EcLevel::M)
    }

    #[test]
    fn numeric() {
        let bytes = [0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11];
        let result = decode_data(&bytes, version(1), EcLevel::M).unwrap();
        assert_eq!(result.text(), "01234567");
        assert_eq!(result.ec_level(), Some(EcLevel::M));
        assert_eq!(result.symbology_identifier(), "]Q1");
        assert!(result.byte_segments().is_empty());
    }

    #[test]
    fn numeric_out_of_range() {
        assert_eq!(
            decode(&[(1, 4), (3, 10), (1000, 10)]),
            Err(DecodeError::Format("numeric group out of range"))
        );
        assert!(decode(&[(1, 4), (1, 10), (10, 4)]).is_err());
        assert_eq!(decode(&[(1, 4), (2, 10), (99, 7)]).unwrap().text(), "99");
    }

    #[test]
    fn alphanumeric() {
        let result = decode(&[(2, 4), (5, 9), (462, 11), (1849, 11), (2, 6)]).unwrap();
        assert_eq!(result.text(), "AC-42");
        // 45 * 45 is past the table
        assert!(decode(&[(2, 4), (2, 9), (2025, 11)]).is_err());
    }

    #[test]
    fn alphanumeric_with_fnc1() {
        let pair = |a: u8, b: u8| {
            let value = |c| ALPHANUMERIC.iter().position(|x| *x == c).unwrap() as u32;
            (value(a) * 45 + value(b), 11)
        };
        let result = decode(&[
            (5, 4),
            (2, 4),
            (6, 9),
            pair(b'A', b'%'),
            pair(b'B', b'%'),
            pair(b'%', b'C'),
        ])
        .unwrap();
        assert_eq!(result.text(), "A\x1DB%C");
        assert_eq!(result.symbology_identifier(), "]Q3");
    }

    #[test]
    fn byte_segments() {
        let result = decode(&[(4, 4), (2, 8), (0xC3, 8), (0xA9, 8)]).unwrap();
        assert_eq!(result.text(), "é");
        assert_eq!(result.byte_segments(), &[vec![0xC3, 0xA9]]);

        // not UTF-8, so ISO-8859-1
        let result = decode(&[(4, 4), (1, 8), (0xE9, 8), (4, 4), (1, 8), (b'!' as u32, 8)]).unwrap();
        assert_eq!(result.text(), "é!");
        assert_eq!(result.byte_segments().len(), 2);

        assert_eq!(
            decode(&[(4, 4), (3, 8), (0x41, 8)]),
            Err(DecodeError::Format("byte segment ends early"))
        );
    }

    #[test]
    fn eci_switches_charset() {
        // ECI 7 is ISO-8859-5
        let result = decode(&[(7, 4), (7, 8), (4, 4), (1, 8), (0xD4, 8)]).unwrap();
        assert_eq!(result.text(), "д");
        assert_eq!(result.symbology_identifier(), "]Q2");

        assert!(decode(&[(7, 4), (99, 8), (4, 4)]).is_err());
        assert!(decode(&[(7, 4), (0xE0, 8), (0, 16)]).is_err());
    }

    #[test]
    fn eci_designator_forms() {
        let read = |groups: &[(u32, u32)]| read_eci(&mut BitSource::new(&stream(groups)));
        assert_eq!(read(&[(26, 8)]), Ok(26));
        assert_eq!(read(&[(0x83E8, 16)]), Ok(1000));
        assert_eq!(read(&[(0xC186A0, 24)]), Ok(100_000));
    }

    #[test]
    fn kanji() {
        let result = decode(&[(8, 4), (2, 8), (0xD9F, 13), (0x1AAA, 13)]).unwrap();
        assert_eq!(result.text(), "点茗");
        assert!(result.byte_segments().is_empty());
        assert!(decode(&[(8, 4), (2, 8), (0xD9F, 13)]).is_err());
    }

    #[test]
    fn hanzi() {
        let result = decode(&[(0xD, 4), (1, 4), (1, 8), (960, 13)]).unwrap();
        assert_eq!(result.text(), "啊");
        assert!(decode(&[(0xD, 4), (2, 4), (1, 8), (960, 13)]).is_err());
    }

    #[test]
    fn structured_append() {
        let result = decode(&[(3, 4), (0x21, 8), (0x5A, 8), (4, 4), (1, 8), (b'a' as u32, 8)])
            .unwrap();
        let sa = result.structured_append().unwrap();
        assert_eq!((sa.index(), sa.total(), sa.parity), (2, 2, 0x5A));
        assert_eq!(result.text(), "a");
    }

    #[test]
    fn fnc1_second_position() {
        let result = decode(&[(9, 4), (37, 8), (1, 4), (1, 10), (5, 4)]).unwrap();
        assert_eq!(result.text(), "5");
        assert_eq!(result.symbology_identifier(), "]Q5");
    }

    #[test]
    fn unknown_mode() {
        assert_eq!(decode(&[(6, 4)]), Err(DecodeError::Format("unknown QR mode")));
    }

    #[test]
    fn short_tail_terminates() {
        // a numeric segment followed by three unused bits
        let bytes = stream(&[(1, 4), (2, 10), (42, 7), (0b101, 3)]);
        assert_eq!(bytes.len(), 3);
        let result = decode_data(&bytes, version(1), EcLevel::L).unwrap();
        assert_eq!(result.text(), "42");
    }

    #[test]
    fn large_version_count_bits() {
        // 16 bit byte count from version 10 on
        let bytes = stream(&[(4, 4), (2, 16), (b'o' as u32, 8), (b'k' as u32, 8)]);
        let result = decode_data(&bytes, version(10), EcLevel::L).unwrap();
        assert_eq!(result.text(), "ok");
    }
}
