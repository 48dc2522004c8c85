//! Data masks and the penalty score used to choose between them.
use crate::bitmap::Bitmap;

#[cfg(test)]
use pretty_assertions::assert_eq;

const N1: u32 = 3;
const N2: u32 = 3;
const N3: u32 = 40;
const N4: u32 = 10;

/// Check if mask `mask` inverts the module in column `x` and row `y`.
///
/// Only the three bits of the mask reference in the format information count.
pub(crate) fn is_masked(mask: u8, x: usize, y: usize) -> bool {
    let intermediate = match mask & 0b111 {
        0 => (y + x) & 1,
        1 => y & 1,
        2 => x % 3,
        3 => (y + x) % 3,
        4 => ((y / 2) + (x / 3)) & 1,
        5 => {
            let temp = y * x;
            (temp & 1) + (temp % 3)
        }
        6 => {
            let temp = y * x;
            ((temp & 1) + (temp % 3)) & 1
        }
        _ => (((y * x) % 3) + ((y + x) & 1)) & 1,
    };
    intermediate == 0
}

/// Total penalty of a finished symbol, lower is better.
pub(crate) fn penalty(grid: &Bitmap<bool>) -> u32 {
    let rows = lines_of(grid);
    let columns = lines_of(&grid.transposed());
    rule1(&rows) + rule1(&columns) + rule2(&rows) + rule3(&rows) + rule3(&columns) + rule4(&rows)
}

/// The rows of the grid.
fn lines_of(grid: &Bitmap<bool>) -> Vec<Vec<bool>> {
    (0..grid.height())
        .map(|y| (0..grid.width()).map(|x| grid.get(x, y)).collect())
        .collect()
}

/// Runs of five or more modules of the same color.
fn rule1(lines: &[Vec<bool>]) -> u32 {
    let mut penalty = 0;
    for line in lines {
        let mut run = 0;
        let mut prev = None;
        for module in line {
            if prev == Some(*module) {
                run += 1;
            } else {
                if run >= 5 {
                    penalty += N1 + (run - 5);
                }
                run = 1;
                prev = Some(*module);
            }
        }
        if run >= 5 {
            penalty += N1 + (run - 5);
        }
    }
    penalty
}

/// Blocks of 2x2 modules with the same color.
fn rule2(rows: &[Vec<bool>]) -> u32 {
    let mut penalty = 0;
    for pair in rows.windows(2) {
        let (top, bottom) = (&pair[0], &pair[1]);
        for x in 0..top.len().saturating_sub(1) {
            let value = top[x];
            if value == top[x + 1] && value == bottom[x] && value == bottom[x + 1] {
                penalty += N2;
            }
        }
    }
    penalty
}

/// Finder like patterns 1:1:3:1:1 with four light modules on one side.
///
/// Modules outside the symbol count as light.
fn rule3(lines: &[Vec<bool>]) -> u32 {
    const PATTERN: [bool; 7] = [true, false, true, true, true, false, true];
    let is_light = |line: &[bool], from: isize, to: isize| {
        let from = from.max(0) as usize;
        let to = (to.max(0) as usize).min(line.len());
        line.get(from..to).map_or(true, |s| s.iter().all(|m| !m))
    };
    let mut penalty = 0;
    for line in lines {
        for (x, window) in line.windows(7).enumerate() {
            if window != &PATTERN[..] {
                continue;
            }
            let x = x as isize;
            if is_light(line, x - 4, x) || is_light(line, x + 7, x + 11) {
                penalty += N3;
            }
        }
    }
    penalty
}

/// Deviation of the dark module ratio from 50 %, in steps of 5 %.
fn rule4(rows: &[Vec<bool>]) -> u32 {
    let total: usize = rows.iter().map(|r| r.len()).sum();
    if total == 0 {
        return 0;
    }
    let dark: usize = rows.iter().map(|r| r.iter().filter(|m| **m).count()).sum();
    let five_percent_variances = (dark * 2).abs_diff(total) * 10 / total;
    five_percent_variances as u32 * N4
}

#[test]
fn test_mask_patterns() {
    // first row of each mask on a 6 module wide strip
    let row0: Vec<Vec<bool>> = (0..8)
        .map(|m| (0..6).map(|x| is_masked(m, x, 0)).collect())
        .collect();
    assert_eq!(row0[0], vec![true, false, true, false, true, false]);
    assert_eq!(row0[1], vec![true; 6]);
    assert_eq!(row0[2], vec![true, false, false, true, false, false]);
    assert_eq!(row0[5], vec![true; 6]);
    assert!(!is_masked(1, 0, 1));
    assert!(is_masked(4, 3, 2));
    assert!(!is_masked(4, 3, 0));
    assert!(!is_masked(7, 1, 1));
    // bits above the mask reference are ignored
    assert_eq!(is_masked(0b1111, 1, 1), is_masked(7, 1, 1));
    assert_eq!(is_masked(8, 1, 0), is_masked(0, 1, 0));
}

#[test]
fn test_rule1() {
    let line = vec![vec![true, true, true, true, true, true, false, false, false, false, false]];
    // run of 6 and run of 5
    assert_eq!(rule1(&line), 4 + 3);
}

#[test]
fn test_rule2() {
    let rows = vec![vec![true, true, true], vec![true, true, false]];
    assert_eq!(rule2(&rows), 3);
}

#[test]
fn test_rule3() {
    let line = |s: &str| s.bytes().map(|b| b == b'1').collect::<Vec<bool>>();
    assert_eq!(rule3(&[line("00001011101")]), 40);
    assert_eq!(rule3(&[line("10111010000")]), 40);
    // the light side is at the symbol border
    assert_eq!(rule3(&[line("1011101")]), 40);
    assert_eq!(rule3(&[line("1000101110110001")]), 0);
}

#[test]
fn test_rule4() {
    let half = vec![vec![true, false]; 5];
    assert_eq!(rule4(&half), 0);
    let dark = vec![vec![true; 4]; 5];
    assert_eq!(rule4(&dark), 100);
    // 11 of 20 dark is 55 %
    let mut rows = vec![vec![false; 4]; 5];
    for m in rows.iter_mut().flatten().take(11) {
        *m = true;
    }
    assert_eq!(rule4(&rows), 10);
}
