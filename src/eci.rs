//! Extended Channel Interpretation: character sets of byte data.
//!
//! Both symbologies can switch the interpretation of following bytes with an
//! ECI designator. Without one, Data Matrix data is ISO-8859-1 and QR Code
//! byte segments are guessed.
use encoding_rs::Encoding;

use crate::error::DecodeError;

/// Character sets with an assigned ECI designator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(enum_iterator::Sequence))]
pub enum CharacterSet {
    Cp437,
    Iso8859_1,
    Iso8859_2,
    Iso8859_3,
    Iso8859_4,
    Iso8859_5,
    Iso8859_6,
    Iso8859_7,
    Iso8859_8,
    Iso8859_9,
    Iso8859_10,
    Iso8859_11,
    Iso8859_13,
    Iso8859_14,
    Iso8859_15,
    Iso8859_16,
    ShiftJis,
    Cp1250,
    Cp1251,
    Cp1252,
    Cp1256,
    Utf16Be,
    Utf8,
    Ascii,
    Big5,
    Gb18030,
    EucKr,
}

impl CharacterSet {
    /// The ECI designator written by the encoders.
    pub fn value(self) -> u32 {
        match self {
            Self::Cp437 => 2,
            Self::Iso8859_1 => 3,
            Self::Iso8859_2 => 4,
            Self::Iso8859_3 => 5,
            Self::Iso8859_4 => 6,
            Self::Iso8859_5 => 7,
            Self::Iso8859_6 => 8,
            Self::Iso8859_7 => 9,
            Self::Iso8859_8 => 10,
            Self::Iso8859_9 => 11,
            Self::Iso8859_10 => 12,
            Self::Iso8859_11 => 13,
            Self::Iso8859_13 => 15,
            Self::Iso8859_14 => 16,
            Self::Iso8859_15 => 17,
            Self::Iso8859_16 => 18,
            Self::ShiftJis => 20,
            Self::Cp1250 => 21,
            Self::Cp1251 => 22,
            Self::Cp1252 => 23,
            Self::Cp1256 => 24,
            Self::Utf16Be => 25,
            Self::Utf8 => 26,
            Self::Ascii => 27,
            Self::Big5 => 28,
            Self::Gb18030 => 29,
            Self::EucKr => 30,
        }
    }

    /// Look up the character set of an ECI designator.
    pub fn from_value(value: u32) -> Option<Self> {
        Some(match value {
            0 | 2 => Self::Cp437,
            1 | 3 => Self::Iso8859_1,
            4 => Self::Iso8859_2,
            5 => Self::Iso8859_3,
            6 => Self::Iso8859_4,
            7 => Self::Iso8859_5,
            8 => Self::Iso8859_6,
            9 => Self::Iso8859_7,
            10 => Self::Iso8859_8,
            11 => Self::Iso8859_9,
            12 => Self::Iso8859_10,
            13 => Self::Iso8859_11,
            15 => Self::Iso8859_13,
            16 => Self::Iso8859_14,
            17 => Self::Iso8859_15,
            18 => Self::Iso8859_16,
            20 => Self::ShiftJis,
            21 => Self::Cp1250,
            22 => Self::Cp1251,
            23 => Self::Cp1252,
            24 => Self::Cp1256,
            25 => Self::Utf16Be,
            26 => Self::Utf8,
            27 | 170 => Self::Ascii,
            28 => Self::Big5,
            29 => Self::Gb18030,
            30 => Self::EucKr,
            _ => return None,
        })
    }

    fn encoding(self) -> Option<&'static Encoding> {
        use encoding_rs::*;

        Some(match self {
            Self::Iso8859_2 => ISO_8859_2,
            Self::Iso8859_3 => ISO_8859_3,
            Self::Iso8859_4 => ISO_8859_4,
            Self::Iso8859_5 => ISO_8859_5,
            Self::Iso8859_6 => ISO_8859_6,
            Self::Iso8859_7 => ISO_8859_7,
            Self::Iso8859_8 => ISO_8859_8,
            Self::Iso8859_10 => ISO_8859_10,
            Self::Iso8859_13 => ISO_8859_13,
            Self::Iso8859_14 => ISO_8859_14,
            Self::Iso8859_15 => ISO_8859_15,
            Self::Iso8859_16 => ISO_8859_16,
            Self::ShiftJis => SHIFT_JIS,
            Self::Cp1250 => WINDOWS_1250,
            Self::Cp1251 => WINDOWS_1251,
            Self::Cp1252 => WINDOWS_1252,
            Self::Cp1256 => WINDOWS_1256,
            Self::Utf16Be => UTF_16BE,
            Self::Big5 => BIG5,
            Self::Gb18030 => GB18030,
            Self::EucKr => EUC_KR,
            // not in encoding_rs, they are not allowed in HTML5
            Self::Cp437 | Self::Iso8859_1 | Self::Iso8859_9 | Self::Iso8859_11 => return None,
            Self::Utf8 | Self::Ascii => return None,
        })
    }

    /// Decode bytes to text, replacing malformed sequences.
    pub(crate) fn decode(self, bytes: &[u8], out: &mut String) {
        match self {
            Self::Utf8 => out.push_str(&String::from_utf8_lossy(bytes)),
            Self::Iso8859_9 => decode_iso_8859_9(bytes, out),
            Self::Iso8859_11 => decode_iso_8859_11(bytes, out),
            // Cp437 has no decoder here, its printable ASCII range matches Latin-1
            Self::Cp437 | Self::Iso8859_1 | Self::Ascii => {
                out.extend(bytes.iter().map(|b| *b as char))
            }
            _ => {
                if let Some(encoding) = self.encoding() {
                    let (text, _) = encoding.decode_without_bom_handling(bytes);
                    out.push_str(&text);
                }
            }
        }
    }
}

/// Accumulates decoded bytes, converting them with the active ECI.
pub(crate) struct TextBuilder {
    text: String,
    pending: Vec<u8>,
    charset: CharacterSet,
    eci_seen: bool,
}

impl TextBuilder {
    pub fn new(default: CharacterSet) -> Self {
        Self {
            text: String::new(),
            pending: Vec::new(),
            charset: default,
            eci_seen: false,
        }
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.pending.push(byte);
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    pub fn push_str(&mut self, s: &str) {
        self.flush();
        self.text.push_str(s);
    }

    /// Switch the character set for all following bytes.
    pub fn set_eci(&mut self, value: u32) -> Result<(), DecodeError> {
        let charset =
            CharacterSet::from_value(value).ok_or(DecodeError::Format("unsupported ECI"))?;
        self.flush();
        self.charset = charset;
        self.eci_seen = true;
        Ok(())
    }

    pub fn has_eci(&self) -> bool {
        self.eci_seen
    }

    /// Number of characters produced so far.
    pub fn len(&self) -> usize {
        self.text.chars().count() + self.pending.len()
    }

    pub fn finish(mut self) -> String {
        self.flush();
        self.text
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            self.charset.decode(&self.pending, &mut self.text);
            self.pending.clear();
        }
    }
}

/// Guess the character set of QR byte segments without an ECI.
pub(crate) fn guess_charset(bytes: &[u8]) -> CharacterSet {
    if !bytes.is_ascii() && std::str::from_utf8(bytes).is_ok() {
        CharacterSet::Utf8
    } else {
        CharacterSet::Iso8859_1
    }
}

// Source: ftp://ftp.unicode.org/Public/MAPPINGS/ISO8859/8859-11.TXT
const ISO_8859_11: [char; 88] = [
    '\u{00A0}', '\u{0E01}', '\u{0E02}', '\u{0E03}', '\u{0E04}', '\u{0E05}', '\u{0E06}', '\u{0E07}',
    '\u{0E08}', '\u{0E09}', '\u{0E0A}', '\u{0E0B}', '\u{0E0C}', '\u{0E0D}', '\u{0E0E}', '\u{0E0F}',
    '\u{0E10}', '\u{0E11}', '\u{0E12}', '\u{0E13}', '\u{0E14}', '\u{0E15}', '\u{0E16}', '\u{0E17}',
    '\u{0E18}', '\u{0E19}', '\u{0E1A}', '\u{0E1B}', '\u{0E1C}', '\u{0E1D}', '\u{0E1E}', '\u{0E1F}',
    '\u{0E20}', '\u{0E21}', '\u{0E22}', '\u{0E23}', '\u{0E24}', '\u{0E25}', '\u{0E26}', '\u{0E27}',
    '\u{0E28}', '\u{0E29}', '\u{0E2A}', '\u{0E2B}', '\u{0E2C}', '\u{0E2D}', '\u{0E2E}', '\u{0E2F}',
    '\u{0E30}', '\u{0E31}', '\u{0E32}', '\u{0E33}', '\u{0E34}', '\u{0E35}', '\u{0E36}', '\u{0E37}',
    '\u{0E38}', '\u{0E39}', '\u{0E3A}', '\u{0E3F}', '\u{0E40}', '\u{0E41}', '\u{0E42}', '\u{0E43}',
    '\u{0E44}', '\u{0E45}', '\u{0E46}', '\u{0E47}', '\u{0E48}', '\u{0E49}', '\u{0E4A}', '\u{0E4B}',
    '\u{0E4C}', '\u{0E4D}', '\u{0E4E}', '\u{0E4F}', '\u{0E50}', '\u{0E51}', '\u{0E52}', '\u{0E53}',
    '\u{0E54}', '\u{0E55}', '\u{0E56}', '\u{0E57}', '\u{0E58}', '\u{0E59}', '\u{0E5A}', '\u{0E5B}',
];

fn decode_iso_8859_11(bytes: &[u8], out: &mut String) {
    for ch in bytes.iter().cloned() {
        match ch {
            0x00..=0x9F => out.push(ch as char),
            0xA0..=0xDA => out.push(ISO_8859_11[(ch - 0xA0) as usize]),
            0xDF..=0xFB => out.push(ISO_8859_11[(ch - 0xA0 - 4) as usize]),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
}

// Source: ftp://ftp.unicode.org/Public/MAPPINGS/ISO8859/8859-9.TXT
const ISO_8859_9: [char; 96] = [
    '\u{00A0}', '\u{00A1}', '\u{00A2}', '\u{00A3}', '\u{00A4}', '\u{00A5}', '\u{00A6}', '\u{00A7}',
    '\u{00A8}', '\u{00A9}', '\u{00AA}', '\u{00AB}', '\u{00AC}', '\u{00AD}', '\u{00AE}', '\u{00AF}',
    '\u{00B0}', '\u{00B1}', '\u{00B2}', '\u{00B3}', '\u{00B4}', '\u{00B5}', '\u{00B6}', '\u{00B7}',
    '\u{00B8}', '\u{00B9}', '\u{00BA}', '\u{00BB}', '\u{00BC}', '\u{00BD}', '\u{00BE}', '\u{00BF}',
    '\u{00C0}', '\u{00C1}', '\u{00C2}', '\u{00C3}', '\u{00C4}', '\u{00C5}', '\u{00C6}', '\u{00C7}',
    '\u{00C8}', '\u{00C9}', '\u{00CA}', '\u{00CB}', '\u{00CC}', '\u{00CD}', '\u{00CE}', '\u{00CF}',
    '\u{011E}', '\u{00D1}', '\u{00D2}', '\u{00D3}', '\u{00D4}', '\u{00D5}', '\u{00D6}', '\u{00D7}',
    '\u{00D8}', '\u{00D9}', '\u{00DA}', '\u{00DB}', '\u{00DC}', '\u{0130}', '\u{015E}', '\u{00DF}',
    '\u{00E0}', '\u{00E1}', '\u{00E2}', '\u{00E3}', '\u{00E4}', '\u{00E5}', '\u{00E6}', '\u{00E7}',
    '\u{00E8}', '\u{00E9}', '\u{00EA}', '\u{00EB}', '\u{00EC}', '\u{00ED}', '\u{00EE}', '\u{00EF}',
    '\u{011F}', '\u{00F1}', '\u{00F2}', '\u{00F3}', '\u{00F4}', '\u{00F5}', '\u{00F6}', '\u{00F7}',
    '\u{00F8}', '\u{00F9}', '\u{00FA}', '\u{00FB}', '\u{00FC}', '\u{0131}', '\u{015F}', '\u{00FF}',
];

fn decode_iso_8859_9(bytes: &[u8], out: &mut String) {
    for ch in bytes.iter().cloned() {
        match ch {
            0x00..=0x9F => out.push(ch as char),
            0xA0..=0xFF => out.push(ISO_8859_9[(ch - 0xA0) as usize]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CharacterSet, TextBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn designators_round_trip() {
        for cs in enum_iterator::all::<CharacterSet>() {
            assert_eq!(CharacterSet::from_value(cs.value()), Some(cs));
        }
        assert_eq!(CharacterSet::from_value(14), None);
        assert_eq!(CharacterSet::from_value(170), Some(CharacterSet::Ascii));
    }

    #[test]
    fn turkish_and_thai_tables() {
        let mut out = String::new();
        CharacterSet::Iso8859_9.decode(b"\xd0\xfd", &mut out);
        CharacterSet::Iso8859_11.decode(b"\xa1\xdf\xfb", &mut out);
        assert_eq!(out, "\u{011E}\u{0131}\u{0E01}\u{0E3F}\u{0E5B}");
    }

    #[test]
    fn builder_switches_charset() {
        let mut b = TextBuilder::new(CharacterSet::Iso8859_1);
        b.push_byte(0xE9);
        b.set_eci(26).unwrap();
        b.push_bytes("é".as_bytes());
        assert!(b.has_eci());
        assert_eq!(b.len(), 3);
        assert_eq!(b.finish(), "éé");
    }

    #[test]
    fn unknown_eci_is_format_error() {
        let mut b = TextBuilder::new(CharacterSet::Iso8859_1);
        assert!(b.set_eci(899).is_err());
    }

    #[test]
    fn shift_jis_decodes() {
        let mut out = String::new();
        CharacterSet::ShiftJis.decode(&[0x93, 0xfa, 0x96, 0x7b], &mut out);
        assert_eq!(out, "日本");
    }
}
