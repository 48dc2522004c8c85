//! Format and version information.
//!
//! Both are short BCH codes. The format information holds the error
//! correction level and the mask in 5 data bits, protected by 10 check bits
//! and XORed with a fixed pattern. Versions 7 and up store their number in
//! 6 data bits with 12 check bits. Reading compares the stored bits with all
//! valid code words and accepts the nearest one if it differs in at most
//! three bits.
use super::EcLevel;

#[cfg(test)]
use pretty_assertions::assert_eq;

const FORMAT_GENERATOR: u32 = 0x537;
const FORMAT_MASK: u32 = 0x5412;
const VERSION_GENERATOR: u32 = 0x1F25;

const MAX_BIT_ERRORS: u32 = 3;

/// Append the remainder of the polynomial division by `generator`.
const fn bch_code(data: u32, generator: u32, check_bits: u32) -> u32 {
    let mut rem = data;
    let mut i = 0;
    while i < check_bits {
        rem = (rem << 1) ^ ((rem >> (check_bits - 1)) * generator);
        i += 1;
    }
    (data << check_bits) | rem
}

const fn format_table() -> [u32; 32] {
    let mut table = [0; 32];
    let mut data = 0;
    while data < 32 {
        table[data] = bch_code(data as u32, FORMAT_GENERATOR, 10) ^ FORMAT_MASK;
        data += 1;
    }
    table
}

const fn version_table() -> [u32; 34] {
    let mut table = [0; 34];
    let mut i = 0;
    while i < 34 {
        table[i] = bch_code(i as u32 + 7, VERSION_GENERATOR, 12);
        i += 1;
    }
    table
}

/// Masked format bits, indexed by the 5 data bits.
static FORMAT_INFO: [u32; 32] = format_table();

/// Version information of the versions 7 to 40.
static VERSION_INFO: [u32; 34] = version_table();

/// Error correction level and mask of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FormatInfo {
    pub ec_level: EcLevel,
    pub mask: u8,
}

impl FormatInfo {
    /// The 15 masked format bits, MSB first.
    pub fn bits(&self) -> u32 {
        FORMAT_INFO[((self.ec_level.bits() << 3) | self.mask as u32) as usize]
    }

    /// Decode the two copies of the format information.
    pub fn decode(bits1: u32, bits2: u32) -> Option<Self> {
        let mut best_distance = u32::MAX;
        let mut best = 0;
        for (data, code) in FORMAT_INFO.iter().enumerate() {
            for bits in [bits1, bits2] {
                let distance = (bits ^ code).count_ones();
                if distance < best_distance {
                    best_distance = distance;
                    best = data as u32;
                }
            }
            if best_distance == 0 {
                break;
            }
        }
        (best_distance <= MAX_BIT_ERRORS).then(|| Self {
            ec_level: EcLevel::from_bits(best >> 3),
            mask: (best & 0b111) as u8,
        })
    }
}

/// The 18 version information bits, MSB first.
pub(crate) fn version_bits(number: u8) -> u32 {
    debug_assert!((7..=40).contains(&number));
    VERSION_INFO[number as usize - 7]
}

/// Decode version information bits to a version number.
pub(crate) fn decode_version(bits: u32) -> Option<u8> {
    let (number, distance) = VERSION_INFO
        .iter()
        .enumerate()
        .map(|(i, code)| (i as u8 + 7, (bits ^ code).count_ones()))
        .min_by_key(|(_, distance)| *distance)?;
    (distance <= MAX_BIT_ERRORS).then_some(number)
}

#[test]
fn test_format_table() {
    assert_eq!(
        &FORMAT_INFO[..8],
        &[0x5412, 0x5125, 0x5E7C, 0x5B4B, 0x45F9, 0x40CE, 0x4F97, 0x4AA0]
    );
    assert_eq!(FORMAT_INFO[31], 0x2BED);
    let info = FormatInfo {
        ec_level: EcLevel::M,
        mask: 5,
    };
    assert_eq!(info.bits(), 0x40CE);
}

#[test]
fn test_version_table() {
    assert_eq!(version_bits(7), 0x07C94);
    assert_eq!(version_bits(8), 0x085BC);
    assert_eq!(version_bits(22), 0x168C9);
    assert_eq!(version_bits(40), 0x28C69);
}

#[test]
fn test_format_exact_and_single_copy() {
    let info = FormatInfo {
        ec_level: EcLevel::Q,
        mask: 3,
    };
    assert_eq!(FormatInfo::decode(info.bits(), info.bits()), Some(info));
    // a damaged second copy does not matter
    assert_eq!(FormatInfo::decode(info.bits(), 0b11_1111 ^ info.bits()), Some(info));
}

#[test]
fn test_format_three_bit_errors() {
    for data in 0..32u32 {
        let info = FormatInfo {
            ec_level: EcLevel::from_bits(data >> 3),
            mask: (data & 7) as u8,
        };
        let corrupted = info.bits() ^ 0b100_0000_1000_0001;
        assert_eq!(FormatInfo::decode(corrupted, corrupted), Some(info));
    }
}

#[test]
fn test_format_four_bit_errors() {
    // L with mask 2, four flipped bits leave no code word within distance 3
    let bits = 0x7DAA ^ 0b1111;
    assert_eq!(FormatInfo::decode(bits, bits), None);
}

#[test]
fn test_version_decode() {
    assert_eq!(decode_version(0x07C94), Some(7));
    assert_eq!(decode_version(0x28C69 ^ 0b10_0000_0100_0000_0001), Some(40));
    assert_eq!(decode_version(0), None);
}
