//! Arrangement of bits in a Data Matrix symbol.
//!
//! [MatrixMap] iterates over the module positions of each codeword in the
//! mapping matrix, i.e., the symbol without its finder and alignment patterns.
//! The same traversal writes codewords into a symbol and reads them back.
use crate::bitmap::{Bit, Bitmap};

use super::SymbolSize;

/// Visitor to the codewords' modules.
///
/// During traversal the visitor is called with references to the eight
/// modules of each codeword, most significant bit first. It can either read
/// or write them.
pub(crate) trait Visitor<B: Bit> {
    fn visit(&mut self, codeword_index: usize, bits: [&mut B; 8]);
}

/// Representation of the bits in a Data Matrix symbol without alignment patterns.
pub(crate) struct MatrixMap<B: Bit> {
    entries: Vec<B>,
    visited: Vec<bool>,
    width: usize,
    height: usize,
    extra_vertical_alignments: usize,
    extra_horizontal_alignments: usize,
    has_padding: bool,
}

impl<M: Bit> MatrixMap<M> {
    /// Create a new, empty matrix for the given symbol size.
    pub fn new(size: SymbolSize) -> Self {
        let setup = size.block_setup();
        let width = setup.content_width();
        let height = setup.content_height();
        Self {
            entries: vec![M::LOW; width * height],
            visited: vec![],
            width,
            height,
            extra_vertical_alignments: setup.extra_vertical_alignments,
            extra_horizontal_alignments: setup.extra_horizontal_alignments,
            has_padding: size.has_padding_modules(),
        }
    }

    /// Strip finder and alignment patterns from a symbol.
    ///
    /// The bitmap must have the dimensions of `size`.
    pub fn from_bitmap(size: SymbolSize, bitmap: &Bitmap<M>) -> Self {
        debug_assert_eq!((bitmap.width(), bitmap.height()), (size.width(), size.height()));
        let mut map = Self::new(size);
        for idx in 0..map.entries.len() {
            let (x, y) = map.module_position(idx);
            map.entries[idx] = bitmap.get(x, y);
        }
        map
    }

    // Write a 4x4 padding pattern in the lower right corner if needed.
    fn write_padding(&mut self) {
        if !self.has_padding {
            return;
        }
        *self.bit_mut(self.height - 2, self.width - 2) = M::HIGH;
        *self.bit_mut(self.height - 1, self.width - 1) = M::HIGH;
    }

    fn region_height(&self) -> usize {
        self.height / (self.extra_horizontal_alignments + 1)
    }

    fn region_width(&self) -> usize {
        self.width / (self.extra_vertical_alignments + 1)
    }

    /// Position `(x, y)` in the full symbol of an entry of the mapping matrix.
    fn module_position(&self, idx: usize) -> (usize, usize) {
        let i = idx / self.width;
        let j = idx % self.width;
        (
            j + 1 + (j / self.region_width()) * 2,
            i + 1 + (i / self.region_height()) * 2,
        )
    }

    /// Get the content of the matrix as a bitmap with alignment patterns added.
    pub fn bitmap(&self) -> Bitmap<M> {
        let h = self.height + 2 + 2 * self.extra_horizontal_alignments;
        let w = self.width + 2 + 2 * self.extra_vertical_alignments;
        let mut bitmap = Bitmap::new(w, h);

        // horizontal alignment lines, solid row above a dotted row
        let blk_h = self.region_height();
        for n in 0..self.extra_horizontal_alignments {
            let row = 1 + (blk_h + 2) * n + blk_h;
            for x in 0..w {
                bitmap.set(x, row, M::HIGH);
            }
            for x in (0..w).step_by(2) {
                bitmap.set(x, row + 1, M::HIGH);
            }
        }

        // vertical alignment lines, dotted column left of a solid column
        let blk_w = self.region_width();
        for n in 0..self.extra_vertical_alignments {
            let col = 1 + (blk_w + 2) * n + blk_w;
            for y in 1..h {
                bitmap.set(col + 1, y, M::HIGH);
            }
            for y in (1..h).step_by(2) {
                bitmap.set(col, y, M::HIGH);
            }
        }

        for x in 0..w {
            bitmap.set(x, h - 1, M::HIGH);
        }
        for x in (0..w).step_by(2) {
            bitmap.set(x, 0, M::HIGH);
        }
        for y in 0..h {
            bitmap.set(0, y, M::HIGH);
        }
        for y in (1..h).step_by(2) {
            bitmap.set(w - 1, y, M::HIGH);
        }

        for (idx, b) in self.entries.iter().enumerate() {
            let (x, y) = self.module_position(idx);
            bitmap.set(x, y, b.clone());
        }
        bitmap
    }

    /// Traverse the symbol in codeword order and call the visitor.
    ///
    /// Returns the number of visited codewords.
    pub fn traverse<V: Visitor<M>>(&mut self, visitor: &mut V) -> usize {
        let nrow = self.height as i16;
        let ncol = self.width as i16;
        self.visited = vec![false; (nrow * ncol) as usize];

        // starting in the correct location for first character, bit 8
        let mut i = 4;
        let mut j = 0;
        let mut codeword_idx = 0;

        loop {
            // the corner cases, tested in this order
            if i == nrow && j == 0 {
                visitor.visit(codeword_idx, self.corner1());
                codeword_idx += 1;
            }
            if i == nrow - 2 && j == 0 && ncol % 4 != 0 {
                visitor.visit(codeword_idx, self.corner2());
                codeword_idx += 1;
            }
            if i == nrow - 2 && j == 0 && ncol % 8 == 4 {
                visitor.visit(codeword_idx, self.corner3());
                codeword_idx += 1;
            }
            if i == nrow + 4 && j == 2 && ncol % 8 == 0 {
                visitor.visit(codeword_idx, self.corner4());
                codeword_idx += 1;
            }
            // sweep upward diagonally
            loop {
                if i < nrow && j >= 0 && !self.visited[(i * ncol + j) as usize] {
                    visitor.visit(codeword_idx, self.utah(i, j));
                    codeword_idx += 1;
                }
                i -= 2;
                j += 2;
                if !(i >= 0 && j < ncol) {
                    break;
                }
            }
            i += 1;
            j += 3;

            // sweep downward diagonally
            loop {
                if i >= 0 && j < ncol && !self.visited[(i * ncol + j) as usize] {
                    visitor.visit(codeword_idx, self.utah(i, j));
                    codeword_idx += 1;
                }
                i += 2;
                j -= 2;
                if !(i < nrow && j >= 0) {
                    break;
                }
            }
            i += 3;
            j += 1;

            if !(i < nrow || j < ncol) {
                break;
            }
        }

        self.write_padding();
        codeword_idx
    }

    // index with wrapping of negative coordinates
    fn idx(&self, mut i: i16, mut j: i16) -> usize {
        let h = self.height as i16;
        let w = self.width as i16;
        if i < 0 {
            i += h;
            j += 4 - ((h + 4) % 8);
        }
        if j < 0 {
            j += w;
            i += 4 - ((w + 4) % 8);
        }
        // only reached by the DMRE sizes with 24 rows, 26x40 and 26x48
        if i >= h {
            i -= h;
        }
        (i * w + j) as usize
    }

    // the standard, utah-shaped, codeword
    fn utah(&mut self, i: i16, j: i16) -> [&mut M; 8] {
        self.bits_mut([
            self.idx(i - 2, j - 2),
            self.idx(i - 2, j - 1),
            self.idx(i - 1, j - 2),
            self.idx(i - 1, j - 1),
            self.idx(i - 1, j),
            self.idx(i, j - 2),
            self.idx(i, j - 1),
            self.idx(i, j),
        ])
    }

    fn corner1(&mut self) -> [&mut M; 8] {
        let h = self.height as i16;
        let w = self.width as i16;
        self.bits_mut([
            self.idx(h - 1, 0),
            self.idx(h - 1, 1),
            self.idx(h - 1, 2),
            self.idx(0, w - 2),
            self.idx(0, w - 1),
            self.idx(1, w - 1),
            self.idx(2, w - 1),
            self.idx(3, w - 1),
        ])
    }

    fn corner2(&mut self) -> [&mut M; 8] {
        let h = self.height as i16;
        let w = self.width as i16;
        self.bits_mut([
            self.idx(h - 3, 0),
            self.idx(h - 2, 0),
            self.idx(h - 1, 0),
            self.idx(0, w - 4),
            self.idx(0, w - 3),
            self.idx(0, w - 2),
            self.idx(0, w - 1),
            self.idx(1, w - 1),
        ])
    }

    fn corner3(&mut self) -> [&mut M; 8] {
        let h = self.height as i16;
        let w = self.width as i16;
        self.bits_mut([
            self.idx(h - 3, 0),
            self.idx(h - 2, 0),
            self.idx(h - 1, 0),
            self.idx(0, w - 2),
            self.idx(0, w - 1),
            self.idx(1, w - 1),
            self.idx(2, w - 1),
            self.idx(3, w - 1),
        ])
    }

    fn corner4(&mut self) -> [&mut M; 8] {
        let h = self.height as i16;
        let w = self.width as i16;
        self.bits_mut([
            self.idx(h - 1, 0),
            self.idx(h - 1, w - 1),
            self.idx(0, w - 3),
            self.idx(0, w - 2),
            self.idx(0, w - 1),
            self.idx(1, w - 3),
            self.idx(1, w - 2),
            self.idx(1, w - 1),
        ])
    }

    fn bit_mut(&mut self, i: usize, j: usize) -> &mut M {
        &mut self.entries[self.width * i + j]
    }

    /// Get mutable references to the eight distinct entries in `indices`.
    fn bits_mut(&mut self, indices: [usize; 8]) -> [&mut M; 8] {
        for idx in indices {
            debug_assert!(!self.visited[idx], "module {} visited twice", idx);
            self.visited[idx] = true;
        }

        let mut perm: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 7];
        perm.sort_unstable_by_key(|k| indices[*k]);

        // hand out the references in ascending index order
        let mut refs: [Option<&mut M>; 8] = Default::default();
        let mut rest: &mut [M] = &mut self.entries;
        let mut prev = 0;
        for k in perm {
            let idx = indices[k];
            let (e, new_rest) = rest[(idx - prev)..]
                .split_first_mut()
                .expect("module index out of range");
            refs[k] = Some(e);
            rest = new_rest;
            prev = idx + 1;
        }
        refs.map(|r| r.expect("module indices not distinct"))
    }
}
