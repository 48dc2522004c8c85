//! Layout of a QR Code symbol.
//!
//! Function patterns (finders with their separators, timing lines, alignment
//! patterns, the reserved format and version areas) occupy fixed modules.
//! The codewords fill the remaining modules in two module wide columns,
//! starting at the bottom right and alternating between moving up and down.
//! Writing and reading use the same module order, see [data_positions].
use super::format::{self, FormatInfo};
use super::{mask, Version};
use crate::bitmap::Bitmap;

#[cfg(test)]
use pretty_assertions::assert_eq;

/// Positions `(x, y)` of the format bits around the top left finder,
/// least significant bit first.
const FORMAT_POSITIONS: [(usize, usize); 15] = [
    (8, 0),
    (8, 1),
    (8, 2),
    (8, 3),
    (8, 4),
    (8, 5),
    (8, 7),
    (8, 8),
    (7, 8),
    (5, 8),
    (4, 8),
    (3, 8),
    (2, 8),
    (1, 8),
    (0, 8),
];

/// Positions of both copies of the format bits, least significant bit first.
///
/// The second copy is split between the top right and bottom left finders.
pub(crate) fn format_positions(dimension: usize) -> [[(usize, usize); 15]; 2] {
    let mut second = [(0, 0); 15];
    for (i, pos) in second.iter_mut().enumerate() {
        *pos = if i < 8 {
            (dimension - 1 - i, 8)
        } else {
            (8, dimension - 7 + (i - 8))
        };
    }
    [FORMAT_POSITIONS, second]
}

/// Positions of both copies of the version bits, least significant bit
/// first. The first copy is the block above the bottom left finder.
pub(crate) fn version_positions(dimension: usize) -> [[(usize, usize); 18]; 2] {
    let mut positions = [[(0, 0); 18]; 2];
    for k in 0..18 {
        let (i, j) = (k / 3, k % 3);
        positions[0][k] = (i, dimension - 11 + j);
        positions[1][k] = (dimension - 11 + j, i);
    }
    positions
}

/// Mark a `width` x `height` region starting at `(left, top)`.
fn set_region(grid: &mut Bitmap<bool>, left: usize, top: usize, width: usize, height: usize) {
    for y in top..top + height {
        for x in left..left + width {
            grid.set(x, y, true);
        }
    }
}

/// Indices of the alignment patterns which do not overlap a finder.
fn alignment_patterns(version: &Version) -> impl Iterator<Item = (usize, usize)> + '_ {
    let centers = version.alignment_centers();
    let last = centers.len().saturating_sub(1);
    (0..centers.len())
        .flat_map(move |i| (0..centers.len()).map(move |j| (i, j)))
        .filter(move |&(i, j)| match (i, j) {
            (0, 0) => false,
            (0, j) | (j, 0) => j != last,
            _ => true,
        })
        .map(move |(i, j)| (centers[i], centers[j]))
}

/// Modules which belong to function patterns.
pub(crate) fn function_pattern(version: &Version) -> Bitmap<bool> {
    let dim = version.dimension();
    let mut grid = Bitmap::new(dim, dim);

    // finders, separators and format information
    set_region(&mut grid, 0, 0, 9, 9);
    set_region(&mut grid, dim - 8, 0, 8, 9);
    set_region(&mut grid, 0, dim - 8, 9, 8);

    for (x, y) in alignment_patterns(version) {
        set_region(&mut grid, x - 2, y - 2, 5, 5);
    }

    // timing patterns
    set_region(&mut grid, 6, 9, 1, dim - 17);
    set_region(&mut grid, 9, 6, dim - 17, 1);

    if version.number() > 6 {
        set_region(&mut grid, dim - 11, 0, 3, 6);
        set_region(&mut grid, 0, dim - 11, 6, 3);
    }
    grid
}

/// Data module positions in placement order.
pub(crate) fn data_positions(function: &Bitmap<bool>) -> Vec<(usize, usize)> {
    let dim = function.width();
    let mut positions = Vec::with_capacity(dim * dim);
    let mut upward = true;
    let mut right = dim as isize - 1;
    while right > 0 {
        // skip the vertical timing line
        if right == 6 {
            right -= 1;
        }
        for i in 0..dim {
            let y = if upward { dim - 1 - i } else { i };
            for x in [right as usize, right as usize - 1] {
                if !function.get(x, y) {
                    positions.push((x, y));
                }
            }
        }
        upward = !upward;
        right -= 2;
    }
    positions
}

fn draw_finder(grid: &mut Bitmap<bool>, left: usize, top: usize) {
    for dy in 0..7 {
        for dx in 0..7 {
            let ring = dx.max(dy).max(6 - dx).max(6 - dy);
            // dark outer ring and 3x3 center
            grid.set(left + dx, top + dy, ring != 5);
        }
    }
}

/// Draw all function patterns except the format information.
pub(crate) fn draw_function_patterns(grid: &mut Bitmap<bool>, version: &Version) {
    let dim = version.dimension();
    draw_finder(grid, 0, 0);
    draw_finder(grid, dim - 7, 0);
    draw_finder(grid, 0, dim - 7);

    for (cx, cy) in alignment_patterns(version) {
        for dy in 0..5 {
            for dx in 0..5 {
                let ring = (dx as isize - 2).abs().max((dy as isize - 2).abs());
                grid.set(cx - 2 + dx, cy - 2 + dy, ring != 1);
            }
        }
    }

    for i in 8..dim - 8 {
        grid.set(i, 6, i % 2 == 0);
        grid.set(6, i, i % 2 == 0);
    }

    // the single dark module next to the bottom left finder
    grid.set(8, dim - 8, true);

    if version.number() > 6 {
        let bits = format::version_bits(version.number());
        for copy in version_positions(dim) {
            for (k, (x, y)) in copy.iter().enumerate() {
                grid.set(*x, *y, (bits >> k) & 1 == 1);
            }
        }
    }
}

pub(crate) fn draw_format(grid: &mut Bitmap<bool>, info: FormatInfo) {
    let bits = info.bits();
    for copy in format_positions(grid.width()) {
        for (i, (x, y)) in copy.iter().enumerate() {
            grid.set(*x, *y, (bits >> i) & 1 == 1);
        }
    }
}

/// Write the codewords MSB first into the data modules and apply the mask.
///
/// Modules left over after the last codeword (remainder bits) are light
/// before masking.
pub(crate) fn draw_codewords(
    grid: &mut Bitmap<bool>,
    positions: &[(usize, usize)],
    codewords: &[u8],
    mask_pattern: u8,
) {
    debug_assert!(codewords.len() * 8 <= positions.len());
    for (i, (x, y)) in positions.iter().enumerate() {
        let bit = codewords
            .get(i / 8)
            .map_or(false, |cw| (cw >> (7 - i % 8)) & 1 == 1);
        grid.set(*x, *y, bit ^ mask::is_masked(mask_pattern, *x, *y));
    }
}

#[test]
fn test_data_modules_match_codewords() {
    for number in 1..=40 {
        let version = Version::for_number(number).unwrap();
        let positions = data_positions(&function_pattern(version));
        assert_eq!(
            positions.len() / 8,
            version.total_codewords(),
            "version {}",
            number
        );
        // remainder bits are 0, 3, 4 or 7
        assert!([0, 3, 4, 7].contains(&(positions.len() % 8)));
    }
}

#[test]
fn test_first_positions() {
    let version = Version::for_number(1).unwrap();
    let positions = data_positions(&function_pattern(version));
    assert_eq!(&positions[..4], &[(20, 20), (19, 20), (20, 19), (19, 19)]);
    // the first column pair ends below the format area, then turns down
    assert_eq!(positions[23], (19, 9));
    assert_eq!(positions[24], (18, 9));
}

#[test]
fn test_alignment_skips_finders() {
    let version = Version::for_number(7).unwrap();
    let mut centers: Vec<(usize, usize)> = alignment_patterns(version).collect();
    centers.sort_unstable();
    assert_eq!(
        centers,
        vec![(6, 22), (22, 6), (22, 22), (22, 38), (38, 22), (38, 38)]
    );
}

#[test]
fn test_version_1_layout() {
    let version = Version::for_number(1).unwrap();
    let mut grid = Bitmap::new(21, 21);
    draw_function_patterns(&mut grid, version);
    let row = |y: usize| -> String {
        (0..21)
            .map(|x| if grid.get(x, y) { 'X' } else { '.' })
            .collect()
    };
    assert_eq!(row(0), "XXXXXXX.......XXXXXXX");
    assert_eq!(row(2), "X.XXX.X.......X.XXX.X");
    assert_eq!(row(6), "XXXXXXX.X.X.X.XXXXXXX");
    assert_eq!(row(13), "........X............");
}
