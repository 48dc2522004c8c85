//! Module grids shared by both symbologies.
//!
//! A [Bitmap] is the output of encoding and the input of decoding. The
//! coordinate system has its origin in the top left corner, `x` grows to the
//! right and `y` grows downwards. No quiet zone is included.
use std::fmt::Debug;

/// Abstract "bit" type stored in a [Bitmap].
pub trait Bit: Clone + PartialEq + Debug {
    const LOW: Self;
    const HIGH: Self;
}

impl Bit for bool {
    const LOW: bool = false;
    const HIGH: bool = true;
}

/// A rectangular grid of modules.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap<M> {
    width: usize,
    bits: Vec<M>,
}

impl<B: Bit> Bitmap<B> {
    /// Create a grid with all modules set to [Bit::LOW].
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            bits: vec![B::LOW; width * height],
        }
    }

    /// Create a grid from row-major module values.
    ///
    /// # Panics
    ///
    /// Panics if `bits.len()` is not a multiple of `width`.
    pub fn from_vec(width: usize, bits: Vec<B>) -> Self {
        assert!(
            width > 0 && bits.len() % width == 0,
            "module count is not a multiple of the width"
        );
        Self { width, bits }
    }

    /// Return the width of the bitmap (no quiet zone included).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Return the height of the bitmap (no quiet zone included).
    pub fn height(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.bits.len() / self.width
        }
    }

    /// Get the module in column `x` and row `y`.
    pub fn get(&self, x: usize, y: usize) -> B {
        self.bits[y * self.width + x].clone()
    }

    /// Check if the module in column `x` and row `y` is dark.
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x] == B::HIGH
    }

    pub fn set(&mut self, x: usize, y: usize, value: B) {
        self.bits[y * self.width + x] = value;
    }

    /// Mirror the grid along its main diagonal.
    pub fn transposed(&self) -> Self {
        let (w, h) = (self.width(), self.height());
        let mut bits = Vec::with_capacity(self.bits.len());
        for x in 0..w {
            for y in 0..h {
                bits.push(self.get(x, y));
            }
        }
        Self { width: h, bits }
    }

    /// Compute a unicode representation ("ASCII art").
    ///
    /// This is intended as a demo functionality. It might look weird
    /// if the line height is wrong or if you are not using a monospaced font.
    pub fn unicode(&self) -> String {
        const BORDER: usize = 1;
        const CHAR: [char; 4] = [' ', '▄', '▀', '█'];
        let height = self.height();
        let get = |i: usize, j: usize| -> usize {
            let inside = i >= BORDER && i < BORDER + height && j >= BORDER && j < BORDER + self.width;
            if inside && self.bits[(i - BORDER) * self.width + (j - BORDER)] == B::HIGH {
                1
            } else {
                0
            }
        };
        let mut out =
            String::with_capacity((height + 2 * BORDER) * (self.width + 1 + 2 * BORDER) * 3 / 2);
        for i in (0..height + 2 * BORDER).step_by(2) {
            for j in 0..(self.width + 2 * BORDER) {
                out.push(CHAR[(get(i, j) << 1) | get(i + 1, j)]);
            }
            out.push('\n');
        }
        out
    }

    /// Get an iterator over the dark modules' coordinates `(x, y)`.
    ///
    /// The pixels are returned in order, incrementing x before y.
    /// A quiet zone is not included in the coordinates but one must
    /// be added when rendering.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let w = self.width();
        self.bits
            .iter()
            .enumerate()
            .filter(|(_i, b)| **b == B::HIGH)
            .map(move |(i, _b)| (i % w, i / w))
    }
}

impl<B: Bit> Debug for Bitmap<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Bitmap {}x{}", self.width(), self.height())?;
        for row in self.bits.chunks(self.width.max(1)) {
            for b in row {
                f.write_str(if *b == B::HIGH { "X" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Bitmap;
    use pretty_assertions::assert_eq;

    #[test]
    fn transpose_swaps_axes() {
        let mut bm = Bitmap::<bool>::new(3, 2);
        bm.set(2, 0, true);
        bm.set(0, 1, true);
        let t = bm.transposed();
        assert_eq!((t.width(), t.height()), (2, 3));
        assert!(t.is_set(0, 2));
        assert!(t.is_set(1, 0));
        assert_eq!(t.pixels().count(), 2);
        assert_eq!(t.transposed(), bm);
    }

    #[test]
    fn pixels_in_row_order() {
        let bm = Bitmap::from_vec(2, vec![true, false, false, true]);
        assert_eq!(bm.pixels().collect::<Vec<_>>(), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn unicode_has_border_rows() {
        let bm = Bitmap::from_vec(2, vec![true, true, true, true]);
        assert_eq!(bm.unicode(), " ▄▄ \n ▀▀ \n");
    }
}
