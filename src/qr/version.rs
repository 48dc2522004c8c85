//! QR Code versions 1 to 40 and their error correction block layouts.
use super::EcLevel;

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Error correction block layout of a version at one [EcLevel].
///
/// All blocks carry the same number of error correction codewords. The
/// blocks of the second group hold one data codeword more than those of
/// the first group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EcBlocks {
    ec_per_block: usize,
    /// `(count, data codewords per block)`, shorter blocks first
    groups: [(usize, usize); 2],
}

impl EcBlocks {
    pub const fn ec_codewords_per_block(&self) -> usize {
        self.ec_per_block
    }

    pub const fn num_blocks(&self) -> usize {
        self.groups[0].0 + self.groups[1].0
    }

    pub const fn num_data_codewords(&self) -> usize {
        self.groups[0].0 * self.groups[0].1 + self.groups[1].0 * self.groups[1].1
    }

    pub const fn num_ec_codewords(&self) -> usize {
        self.num_blocks() * self.ec_per_block
    }

    /// Data codewords of each block in order, shorter blocks first.
    pub(crate) fn block_data_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups
            .iter()
            .flat_map(|(count, data)| std::iter::repeat(*data).take(*count))
    }
}

/// A QR Code version, i.e., a symbol size.
#[derive(Debug, PartialEq, Eq)]
pub struct Version {
    number: u8,
    alignment_centers: &'static [usize],
    ec_blocks: [EcBlocks; 4],
}

const fn ecb(ec_per_block: usize, count1: usize, data1: usize, count2: usize, data2: usize) -> EcBlocks {
    EcBlocks {
        ec_per_block,
        groups: [(count1, data1), (count2, data2)],
    }
}

impl Version {
    const fn new(number: u8, alignment_centers: &'static [usize], ec_blocks: [EcBlocks; 4]) -> Self {
        Self {
            number,
            alignment_centers,
            ec_blocks,
        }
    }

    /// Look up a version by its number (1 to 40).
    pub fn for_number(number: u8) -> Option<&'static Version> {
        match number {
            1..=40 => Some(&VERSIONS[number as usize - 1]),
            _ => None,
        }
    }

    /// Look up a version by the width of its module grid.
    pub fn for_dimension(dimension: usize) -> Option<&'static Version> {
        if dimension < 21 || dimension % 4 != 1 {
            return None;
        }
        Self::for_number(((dimension - 17) / 4).try_into().ok()?)
    }

    pub const fn number(&self) -> u8 {
        self.number
    }

    /// Width and height of the module grid.
    pub const fn dimension(&self) -> usize {
        17 + 4 * self.number as usize
    }

    /// Row and column coordinates of the alignment pattern centers.
    pub const fn alignment_centers(&self) -> &'static [usize] {
        self.alignment_centers
    }

    /// Number of data and error correction codewords.
    pub const fn total_codewords(&self) -> usize {
        raw_data_modules(self.number) / 8
    }

    pub const fn ec_blocks(&self, level: EcLevel) -> &EcBlocks {
        &self.ec_blocks[level.ordinal()]
    }

    pub const fn data_codewords(&self, level: EcLevel) -> usize {
        self.ec_blocks(level).num_data_codewords()
    }
}

/// Modules left for codewords after all function patterns are placed,
/// including the remainder bits.
const fn raw_data_modules(number: u8) -> usize {
    let v = number as usize;
    let mut modules = (16 * v + 128) * v + 64;
    if v >= 2 {
        let num_align = v / 7 + 2;
        modules -= (25 * num_align - 10) * num_align - 55;
        if v >= 7 {
            modules -= 36;
        }
    }
    modules
}

const TABLE: [Version; 40] = [
    Version::new(1, &[], [
        ecb(7, 1, 19, 0, 20),
        ecb(10, 1, 16, 0, 17),
        ecb(13, 1, 13, 0, 14),
        ecb(17, 1, 9, 0, 10),
    ]),
    Version::new(2, &[6, 18], [
        ecb(10, 1, 34, 0, 35),
        ecb(16, 1, 28, 0, 29),
        ecb(22, 1, 22, 0, 23),
        ecb(28, 1, 16, 0, 17),
    ]),
    Version::new(3, &[6, 22], [
        ecb(15, 1, 55, 0, 56),
        ecb(26, 1, 44, 0, 45),
        ecb(18, 2, 17, 0, 18),
        ecb(22, 2, 13, 0, 14),
    ]),
    Version::new(4, &[6, 26], [
        ecb(20, 1, 80, 0, 81),
        ecb(18, 2, 32, 0, 33),
        ecb(26, 2, 24, 0, 25),
        ecb(16, 4, 9, 0, 10),
    ]),
    Version::new(5, &[6, 30], [
        ecb(26, 1, 108, 0, 109),
        ecb(24, 2, 43, 0, 44),
        ecb(18, 2, 15, 2, 16),
        ecb(22, 2, 11, 2, 12),
    ]),
    Version::new(6, &[6, 34], [
        ecb(18, 2, 68, 0, 69),
        ecb(16, 4, 27, 0, 28),
        ecb(24, 4, 19, 0, 20),
        ecb(28, 4, 15, 0, 16),
    ]),
    Version::new(7, &[6, 22, 38], [
        ecb(20, 2, 78, 0, 79),
        ecb(18, 4, 31, 0, 32),
        ecb(18, 2, 14, 4, 15),
        ecb(26, 4, 13, 1, 14),
    ]),
    Version::new(8, &[6, 24, 42], [
        ecb(24, 2, 97, 0, 98),
        ecb(22, 2, 38, 2, 39),
        ecb(22, 4, 18, 2, 19),
        ecb(26, 4, 14, 2, 15),
    ]),
    Version::new(9, &[6, 26, 46], [
        ecb(30, 2, 116, 0, 117),
        ecb(22, 3, 36, 2, 37),
        ecb(20, 4, 16, 4, 17),
        ecb(24, 4, 12, 4, 13),
    ]),
    Version::new(10, &[6, 28, 50], [
        ecb(18, 2, 68, 2, 69),
        ecb(26, 4, 43, 1, 44),
        ecb(24, 6, 19, 2, 20),
        ecb(28, 6, 15, 2, 16),
    ]),
    Version::new(11, &[6, 30, 54], [
        ecb(20, 4, 81, 0, 82),
        ecb(30, 1, 50, 4, 51),
        ecb(28, 4, 22, 4, 23),
        ecb(24, 3, 12, 8, 13),
    ]),
    Version::new(12, &[6, 32, 58], [
        ecb(24, 2, 92, 2, 93),
        ecb(22, 6, 36, 2, 37),
        ecb(26, 4, 20, 6, 21),
        ecb(28, 7, 14, 4, 15),
    ]),
    Version::new(13, &[6, 34, 62], [
        ecb(26, 4, 107, 0, 108),
        ecb(22, 8, 37, 1, 38),
        ecb(24, 8, 20, 4, 21),
        ecb(22, 12, 11, 4, 12),
    ]),
    Version::new(14, &[6, 26, 46, 66], [
        ecb(30, 3, 115, 1, 116),
        ecb(24, 4, 40, 5, 41),
        ecb(20, 11, 16, 5, 17),
        ecb(24, 11, 12, 5, 13),
    ]),
    Version::new(15, &[6, 26, 48, 70], [
        ecb(22, 5, 87, 1, 88),
        ecb(24, 5, 41, 5, 42),
        ecb(30, 5, 24, 7, 25),
        ecb(24, 11, 12, 7, 13),
    ]),
    Version::new(16, &[6, 26, 50, 74], [
        ecb(24, 5, 98, 1, 99),
        ecb(28, 7, 45, 3, 46),
        ecb(24, 15, 19, 2, 20),
        ecb(30, 3, 15, 13, 16),
    ]),
    Version::new(17, &[6, 30, 54, 78], [
        ecb(28, 1, 107, 5, 108),
        ecb(28, 10, 46, 1, 47),
        ecb(28, 1, 22, 15, 23),
        ecb(28, 2, 14, 17, 15),
    ]),
    Version::new(18, &[6, 30, 56, 82], [
        ecb(30, 5, 120, 1, 121),
        ecb(26, 9, 43, 4, 44),
        ecb(28, 17, 22, 1, 23),
        ecb(28, 2, 14, 19, 15),
    ]),
    Version::new(19, &[6, 30, 58, 86], [
        ecb(28, 3, 113, 4, 114),
        ecb(26, 3, 44, 11, 45),
        ecb(26, 17, 21, 4, 22),
        ecb(26, 9, 13, 16, 14),
    ]),
    Version::new(20, &[6, 34, 62, 90], [
        ecb(28, 3, 107, 5, 108),
        ecb(26, 3, 41, 13, 42),
        ecb(30, 15, 24, 5, 25),
        ecb(28, 15, 15, 10, 16),
    ]),
    Version::new(21, &[6, 28, 50, 72, 94], [
        ecb(28, 4, 116, 4, 117),
        ecb(26, 17, 42, 0, 43),
        ecb(28, 17, 22, 6, 23),
        ecb(30, 19, 16, 6, 17),
    ]),
    Version::new(22, &[6, 26, 50, 74, 98], [
        ecb(28, 2, 111, 7, 112),
        ecb(28, 17, 46, 0, 47),
        ecb(30, 7, 24, 16, 25),
        ecb(24, 34, 13, 0, 14),
    ]),
    Version::new(23, &[6, 30, 54, 78, 102], [
        ecb(30, 4, 121, 5, 122),
        ecb(28, 4, 47, 14, 48),
        ecb(30, 11, 24, 14, 25),
        ecb(30, 16, 15, 14, 16),
    ]),
    Version::new(24, &[6, 28, 54, 80, 106], [
        ecb(30, 6, 117, 4, 118),
        ecb(28, 6, 45, 14, 46),
        ecb(30, 11, 24, 16, 25),
        ecb(30, 30, 16, 2, 17),
    ]),
    Version::new(25, &[6, 32, 58, 84, 110], [
        ecb(26, 8, 106, 4, 107),
        ecb(28, 8, 47, 13, 48),
        ecb(30, 7, 24, 22, 25),
        ecb(30, 22, 15, 13, 16),
    ]),
    Version::new(26, &[6, 30, 58, 86, 114], [
        ecb(28, 10, 114, 2, 115),
        ecb(28, 19, 46, 4, 47),
        ecb(28, 28, 22, 6, 23),
        ecb(30, 33, 16, 4, 17),
    ]),
    Version::new(27, &[6, 34, 62, 90, 118], [
        ecb(30, 8, 122, 4, 123),
        ecb(28, 22, 45, 3, 46),
        ecb(30, 8, 23, 26, 24),
        ecb(30, 12, 15, 28, 16),
    ]),
    Version::new(28, &[6, 26, 50, 74, 98, 122], [
        ecb(30, 3, 117, 10, 118),
        ecb(28, 3, 45, 23, 46),
        ecb(30, 4, 24, 31, 25),
        ecb(30, 11, 15, 31, 16),
    ]),
    Version::new(29, &[6, 30, 54, 78, 102, 126], [
        ecb(30, 7, 116, 7, 117),
        ecb(28, 21, 45, 7, 46),
        ecb(30, 1, 23, 37, 24),
        ecb(30, 19, 15, 26, 16),
    ]),
    Version::new(30, &[6, 26, 52, 78, 104, 130], [
        ecb(30, 5, 115, 10, 116),
        ecb(28, 19, 47, 10, 48),
        ecb(30, 15, 24, 25, 25),
        ecb(30, 23, 15, 25, 16),
    ]),
    Version::new(31, &[6, 30, 56, 82, 108, 134], [
        ecb(30, 13, 115, 3, 116),
        ecb(28, 2, 46, 29, 47),
        ecb(30, 42, 24, 1, 25),
        ecb(30, 23, 15, 28, 16),
    ]),
    Version::new(32, &[6, 34, 60, 86, 112, 138], [
        ecb(30, 17, 115, 0, 116),
        ecb(28, 10, 46, 23, 47),
        ecb(30, 10, 24, 35, 25),
        ecb(30, 19, 15, 35, 16),
    ]),
    Version::new(33, &[6, 30, 58, 86, 114, 142], [
        ecb(30, 17, 115, 1, 116),
        ecb(28, 14, 46, 21, 47),
        ecb(30, 29, 24, 19, 25),
        ecb(30, 11, 15, 46, 16),
    ]),
    Version::new(34, &[6, 34, 62, 90, 118, 146], [
        ecb(30, 13, 115, 6, 116),
        ecb(28, 14, 46, 23, 47),
        ecb(30, 44, 24, 7, 25),
        ecb(30, 59, 16, 1, 17),
    ]),
    Version::new(35, &[6, 30, 54, 78, 102, 126, 150], [
        ecb(30, 12, 121, 7, 122),
        ecb(28, 12, 47, 26, 48),
        ecb(30, 39, 24, 14, 25),
        ecb(30, 22, 15, 41, 16),
    ]),
    Version::new(36, &[6, 24, 50, 76, 102, 128, 154], [
        ecb(30, 6, 121, 14, 122),
        ecb(28, 6, 47, 34, 48),
        ecb(30, 46, 24, 10, 25),
        ecb(30, 2, 15, 64, 16),
    ]),
    Version::new(37, &[6, 28, 54, 80, 106, 132, 158], [
        ecb(30, 17, 122, 4, 123),
        ecb(28, 29, 46, 14, 47),
        ecb(30, 49, 24, 10, 25),
        ecb(30, 24, 15, 46, 16),
    ]),
    Version::new(38, &[6, 32, 58, 84, 110, 136, 162], [
        ecb(30, 4, 122, 18, 123),
        ecb(28, 13, 46, 32, 47),
        ecb(30, 48, 24, 14, 25),
        ecb(30, 42, 15, 32, 16),
    ]),
    Version::new(39, &[6, 26, 54, 82, 110, 138, 166], [
        ecb(30, 20, 117, 4, 118),
        ecb(28, 40, 47, 7, 48),
        ecb(30, 43, 24, 22, 25),
        ecb(30, 10, 15, 67, 16),
    ]),
    Version::new(40, &[6, 30, 58, 86, 114, 142, 170], [
        ecb(30, 19, 118, 6, 119),
        ecb(28, 18, 47, 31, 48),
        ecb(30, 34, 24, 34, 25),
        ecb(30, 20, 15, 61, 16),
    ]),
];

static VERSIONS: [Version; 40] = TABLE;

// Every block layout must fill the symbol exactly.
const _: () = {
    let mut i = 0;
    while i < TABLE.len() {
        let version = &TABLE[i];
        assert!(version.number as usize == i + 1);
        let mut level = 0;
        while level < 4 {
            let blocks = &version.ec_blocks[level];
            assert!(blocks.groups[1].0 == 0 || blocks.groups[1].1 == blocks.groups[0].1 + 1);
            assert!(
                blocks.num_data_codewords() + blocks.num_ec_codewords()
                    == version.total_codewords()
            );
            level += 1;
        }
        i += 1;
    }
};

#[test]
fn test_lookup() {
    assert_eq!(Version::for_number(0), None);
    assert_eq!(Version::for_number(41), None);
    let v7 = Version::for_number(7).unwrap();
    assert_eq!(v7.dimension(), 45);
    assert_eq!(Version::for_dimension(45), Some(v7));
    assert_eq!(Version::for_dimension(46), None);
    assert_eq!(Version::for_dimension(17), None);
    assert_eq!(Version::for_dimension(181), None);
    assert_eq!(v7.alignment_centers(), &[6, 22, 38]);
}

#[test]
fn test_capacities() {
    let v1 = Version::for_number(1).unwrap();
    assert_eq!(v1.total_codewords(), 26);
    assert_eq!(v1.data_codewords(EcLevel::L), 19);
    assert_eq!(v1.data_codewords(EcLevel::M), 16);
    assert_eq!(v1.data_codewords(EcLevel::Q), 13);
    assert_eq!(v1.data_codewords(EcLevel::H), 9);

    let v40 = Version::for_number(40).unwrap();
    assert_eq!(v40.total_codewords(), 3706);
    assert_eq!(v40.data_codewords(EcLevel::L), 2956);
    assert_eq!(v40.data_codewords(EcLevel::H), 1276);
    assert_eq!(v40.ec_blocks(EcLevel::H).num_blocks(), 81);
    assert_eq!(v40.ec_blocks(EcLevel::H).ec_codewords_per_block(), 30);
}

#[test]
fn test_block_lengths_version_5_q() {
    let blocks = Version::for_number(5).unwrap().ec_blocks(EcLevel::Q);
    let lengths: Vec<usize> = blocks.block_data_lengths().collect();
    assert_eq!(lengths, vec![15, 15, 16, 16]);
}
