use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::RangeBounds;

#[cfg(test)]
use pretty_assertions::assert_eq;

type SymbolCollection = BTreeSet<SymbolSize>;

/// Set of [symbol sizes](SymbolSize) the encoder is allowed to use.
///
/// The smallest symbol which can hold the data is chosen.
///
/// By [default](SymbolList::default) all standard sizes defined in
/// ISO 16022 are used. The selection can be restricted to square or rectangular
/// symbols, symbols within a size range, or by giving an explicit list.
///
/// ```rust
/// # use matrixcode::{DataMatrix, EncodeHints, SymbolList, SymbolSize};
/// let code = DataMatrix::encode_with_symbols(
///     b"Hello, World!",
///     SymbolList::with_extended_rectangles()
///         .enforce_rectangular()
///         .enforce_height_in(..=20),
///     &EncodeHints::default(),
/// ).unwrap();
/// assert!(code.symbol_size().height() <= 20);
///
/// // a single size converts into a list
/// let code = DataMatrix::encode_with_symbols(
///     b"content",
///     SymbolSize::Square22,
///     &EncodeHints::default(),
/// ).unwrap();
/// assert_eq!(code.symbol_size(), SymbolSize::Square22);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolList {
    symbols: SymbolCollection,
}

impl SymbolList {
    /// Get standard symbol sizes extended by all DMRE rectangles.
    ///
    /// ISO 21471 defines additional rectangular sizes. Be aware that
    /// your decoder might not recognize these.
    pub fn with_extended_rectangles() -> Self {
        Self::with_whitelist(SYMBOL_SIZES.iter().cloned())
    }

    /// Remove all non-square symbols from the current selection.
    pub fn enforce_square(mut self) -> Self {
        self.symbols.retain(|s| s.is_square());
        self
    }

    /// Remove all square symbols from the current selection.
    pub fn enforce_rectangular(mut self) -> Self {
        self.symbols.retain(|s| !s.is_square());
        self
    }

    /// Only keep symbols with width in the given range.
    pub fn enforce_width_in<R: RangeBounds<usize>>(mut self, bounds: R) -> Self {
        self.symbols.retain(|s| bounds.contains(&s.width()));
        self
    }

    /// Only keep symbols with height in the given range.
    pub fn enforce_height_in<R: RangeBounds<usize>>(mut self, bounds: R) -> Self {
        self.symbols.retain(|s| bounds.contains(&s.height()));
        self
    }

    /// Create a symbol list containing only the given symbols.
    ///
    /// The list does not need to be sorted.
    pub fn with_whitelist<I>(whitelist: I) -> Self
    where
        I: IntoIterator<Item = SymbolSize>,
    {
        Self::from_iter(whitelist)
    }

    /// Iterate the sizes, smallest capacity first.
    pub fn iter(&self) -> impl Iterator<Item = SymbolSize> + '_ {
        self.symbols.iter().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Get a list with all supported symbol sizes.
    pub fn all() -> Self {
        Self::with_extended_rectangles()
    }

    /// Check if a symbol size is in this symbol list.
    pub fn contains(&self, symbol_size: &SymbolSize) -> bool {
        self.symbols.contains(symbol_size)
    }

    pub(crate) fn first_symbol_big_enough_for(&self, size_needed: usize) -> Option<SymbolSize> {
        self.symbols
            .iter()
            .find(|s| s.num_data_codewords() >= size_needed)
            .cloned()
    }
}

impl IntoIterator for SymbolList {
    type Item = SymbolSize;
    type IntoIter = <SymbolCollection as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.into_iter()
    }
}

impl FromIterator<SymbolSize> for SymbolList {
    fn from_iter<T: IntoIterator<Item = SymbolSize>>(iter: T) -> Self {
        Self {
            symbols: SymbolCollection::from_iter(iter),
        }
    }
}

impl Extend<SymbolSize> for SymbolList {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = SymbolSize>,
    {
        self.symbols.extend(iter);
    }
}

impl Default for SymbolList {
    fn default() -> Self {
        let symbols = SYMBOL_SIZES.iter().cloned().filter(|s| !s.is_dmre());
        Self::with_whitelist(symbols)
    }
}

impl From<SymbolSize> for SymbolList {
    fn from(size: SymbolSize) -> SymbolList {
        SymbolList::with_whitelist([size])
    }
}

impl<const N: usize> From<[SymbolSize; N]> for SymbolList {
    fn from(other: [SymbolSize; N]) -> SymbolList {
        SymbolList::with_whitelist(other)
    }
}

impl From<&SymbolList> for SymbolList {
    fn from(other: &SymbolList) -> SymbolList {
        other.clone()
    }
}

pub(crate) struct BlockSetup {
    /// Number of interleaved error correction blocks
    pub(crate) num_ecc_blocks: usize,
    /// Number of error correction codewords per block
    pub(crate) num_ecc_per_block: usize,
    /// Total width of the symbol including alignment pattern but not quiet zone
    pub(crate) width: usize,
    /// Total height of the symbol including alignment pattern but not quiet zone
    pub(crate) height: usize,
    /// Number extra vertical separators (alignment lines)
    pub(crate) extra_vertical_alignments: usize,
    /// Number extra horizontal separators (alignment lines)
    pub(crate) extra_horizontal_alignments: usize,
}

impl BlockSetup {
    const fn new(
        num_ecc_blocks: usize,
        num_ecc_per_block: usize,
        width: usize,
        height: usize,
        extra_vertical_alignments: usize,
        extra_horizontal_alignments: usize,
    ) -> Self {
        Self {
            num_ecc_blocks,
            num_ecc_per_block,
            width,
            height,
            extra_vertical_alignments,
            extra_horizontal_alignments,
        }
    }

    pub(crate) const fn content_width(&self) -> usize {
        self.width - 2 - self.extra_vertical_alignments * 2
    }

    pub(crate) const fn content_height(&self) -> usize {
        self.height - 2 - self.extra_horizontal_alignments * 2
    }
}

/// The symbol sizes supported by Data Matrix.
///
/// The number behind a variant, e.g., [Square10](SymbolSize::Square10),
/// describes the number of modules (the tiny black squares) the symbol is
/// tall/wide.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(test, derive(enum_iterator::Sequence))]
pub enum SymbolSize {
    Square10,
    Square12,
    Square14,
    Square16,
    Square18,
    Square20,
    Square22,
    Square24,
    Square26,
    Square32,
    Square36,
    Square40,
    Square44,
    Square48,
    Square52,
    Square64,
    Square72,
    Square80,
    Square88,
    Square96,
    Square104,
    Square120,
    Square132,
    Square144,
    Rect8x18,
    Rect8x32,
    Rect12x26,
    Rect12x36,
    Rect16x36,
    Rect16x48,

    /// DMRE 8x48 variant
    Rect8x48,
    /// DMRE 8x64 variant
    Rect8x64,
    /// DMRE 8x80 variant
    Rect8x80,
    /// DMRE 8x96 variant
    Rect8x96,
    /// DMRE 8x120 variant
    Rect8x120,
    /// DMRE 8x144 variant
    Rect8x144,
    /// DMRE 12x64 variant
    Rect12x64,
    /// DMRE 12x88 variant
    Rect12x88,
    /// DMRE 16x64 variant
    Rect16x64,
    /// DMRE 20x36 variant
    Rect20x36,
    /// DMRE 20x44 variant
    Rect20x44,
    /// DMRE 20x64 variant
    Rect20x64,
    /// DMRE 22x48 variant
    Rect22x48,
    /// DMRE 24x48 variant
    Rect24x48,
    /// DMRE 24x64 variant
    Rect24x64,
    /// DMRE 26x40 variant
    Rect26x40,
    /// DMRE 26x48 variant
    Rect26x48,
    /// DMRE 26x64 variant
    Rect26x64,
}

#[rustfmt::skip]
const SYMBOL_SIZES: &[SymbolSize] = &[
    SymbolSize::Square10, SymbolSize::Square12, SymbolSize::Rect8x18, SymbolSize::Square14,
    SymbolSize::Rect8x32, SymbolSize::Square16, SymbolSize::Rect12x26, SymbolSize::Square18,
    SymbolSize::Rect8x48, SymbolSize::Square20, SymbolSize::Rect12x36, SymbolSize::Rect8x64,
    SymbolSize::Square22, SymbolSize::Rect16x36, SymbolSize::Rect8x80, SymbolSize::Square24,
    SymbolSize::Rect8x96, SymbolSize::Rect12x64, SymbolSize::Square26, SymbolSize::Rect20x36,
    SymbolSize::Rect16x48, SymbolSize::Rect8x120, SymbolSize::Rect20x44, SymbolSize::Square32,
    SymbolSize::Rect16x64, SymbolSize::Rect8x144, SymbolSize::Rect12x88, SymbolSize::Rect26x40,
    SymbolSize::Rect22x48, SymbolSize::Rect24x48, SymbolSize::Rect20x64, SymbolSize::Square36,
    SymbolSize::Rect26x48, SymbolSize::Rect24x64, SymbolSize::Square40, SymbolSize::Rect26x64,
    SymbolSize::Square44, SymbolSize::Square48, SymbolSize::Square52, SymbolSize::Square64,
    SymbolSize::Square72, SymbolSize::Square80, SymbolSize::Square88, SymbolSize::Square96,
    SymbolSize::Square104, SymbolSize::Square120, SymbolSize::Square132, SymbolSize::Square144,
];

impl SymbolSize {
    pub(crate) const fn num_data_codewords(&self) -> usize {
        match self {
            Self::Square10 => 3,
            Self::Square12 => 5,
            Self::Square14 => 8,
            Self::Square16 => 12,
            Self::Square18 => 18,
            Self::Square20 => 22,
            Self::Square22 => 30,
            Self::Square24 => 36,
            Self::Square26 => 44,
            Self::Square32 => 62,
            Self::Square36 => 86,
            Self::Square40 => 114,
            Self::Square44 => 144,
            Self::Square48 => 174,
            Self::Square52 => 204,
            Self::Square64 => 280,
            Self::Square72 => 368,
            Self::Square80 => 456,
            Self::Square88 => 576,
            Self::Square96 => 696,
            Self::Square104 => 816,
            Self::Square120 => 1050,
            Self::Square132 => 1304,
            Self::Square144 => 1558,
            Self::Rect8x18 => 5,
            Self::Rect8x32 => 10,
            Self::Rect12x26 => 16,
            Self::Rect12x36 => 22,
            Self::Rect16x36 => 32,
            Self::Rect16x48 => 49,
            // DMRE
            Self::Rect8x48 => 18,
            Self::Rect8x64 => 24,
            Self::Rect8x80 => 32,
            Self::Rect8x96 => 38,
            Self::Rect8x120 => 49,
            Self::Rect8x144 => 63,
            Self::Rect12x64 => 43,
            Self::Rect12x88 => 64,
            Self::Rect16x64 => 62,
            Self::Rect20x36 => 44,
            Self::Rect20x44 => 56,
            Self::Rect20x64 => 84,
            Self::Rect22x48 => 72,
            Self::Rect24x48 => 80,
            Self::Rect24x64 => 108,
            Self::Rect26x40 => 70,
            Self::Rect26x48 => 90,
            Self::Rect26x64 => 118,
        }
    }

    pub const fn is_square(&self) -> bool {
        matches!(
            self,
            Self::Square10
                | Self::Square12
                | Self::Square14
                | Self::Square16
                | Self::Square18
                | Self::Square20
                | Self::Square22
                | Self::Square24
                | Self::Square26
                | Self::Square32
                | Self::Square36
                | Self::Square40
                | Self::Square44
                | Self::Square48
                | Self::Square52
                | Self::Square64
                | Self::Square72
                | Self::Square80
                | Self::Square88
                | Self::Square96
                | Self::Square104
                | Self::Square120
                | Self::Square132
                | Self::Square144
        )
    }

    /// Symbol is one of the rectangular extensions of ISO 21471 (DMRE).
    pub const fn is_dmre(&self) -> bool {
        matches!(
            self,
            Self::Rect8x48
                | Self::Rect8x64
                | Self::Rect8x80
                | Self::Rect8x96
                | Self::Rect8x120
                | Self::Rect8x144
                | Self::Rect12x64
                | Self::Rect12x88
                | Self::Rect16x64
                | Self::Rect20x36
                | Self::Rect20x44
                | Self::Rect20x64
                | Self::Rect22x48
                | Self::Rect24x48
                | Self::Rect24x64
                | Self::Rect26x40
                | Self::Rect26x48
                | Self::Rect26x64
        )
    }

    pub(crate) const fn block_setup(&self) -> BlockSetup {
        match self {
            Self::Square10 => BlockSetup::new(1, 5, 10, 10, 0, 0),
            Self::Square12 => BlockSetup::new(1, 7, 12, 12, 0, 0),
            Self::Square14 => BlockSetup::new(1, 10, 14, 14, 0, 0),
            Self::Square16 => BlockSetup::new(1, 12, 16, 16, 0, 0),
            Self::Square18 => BlockSetup::new(1, 14, 18, 18, 0, 0),
            Self::Square20 => BlockSetup::new(1, 18, 20, 20, 0, 0),
            Self::Square22 => BlockSetup::new(1, 20, 22, 22, 0, 0),
            Self::Square24 => BlockSetup::new(1, 24, 24, 24, 0, 0),
            Self::Square26 => BlockSetup::new(1, 28, 26, 26, 0, 0),
            Self::Square32 => BlockSetup::new(1, 36, 32, 32, 1, 1),
            Self::Square36 => BlockSetup::new(1, 42, 36, 36, 1, 1),
            Self::Square40 => BlockSetup::new(1, 48, 40, 40, 1, 1),
            Self::Square44 => BlockSetup::new(1, 56, 44, 44, 1, 1),
            Self::Square48 => BlockSetup::new(1, 68, 48, 48, 1, 1),
            Self::Square52 => BlockSetup::new(2, 42, 52, 52, 1, 1),
            Self::Square64 => BlockSetup::new(2, 56, 64, 64, 3, 3),
            Self::Square72 => BlockSetup::new(4, 36, 72, 72, 3, 3),
            Self::Square80 => BlockSetup::new(4, 48, 80, 80, 3, 3),
            Self::Square88 => BlockSetup::new(4, 56, 88, 88, 3, 3),
            Self::Square96 => BlockSetup::new(4, 68, 96, 96, 3, 3),
            Self::Square104 => BlockSetup::new(6, 56, 104, 104, 3, 3),
            Self::Square120 => BlockSetup::new(6, 68, 120, 120, 5, 5),
            Self::Square132 => BlockSetup::new(8, 62, 132, 132, 5, 5),
            Self::Square144 => BlockSetup::new(10, 62, 144, 144, 5, 5),
            Self::Rect8x18 => BlockSetup::new(1, 7, 18, 8, 0, 0),
            Self::Rect8x32 => BlockSetup::new(1, 11, 32, 8, 1, 0),
            Self::Rect12x26 => BlockSetup::new(1, 14, 26, 12, 0, 0),
            Self::Rect12x36 => BlockSetup::new(1, 18, 36, 12, 1, 0),
            Self::Rect16x36 => BlockSetup::new(1, 24, 36, 16, 1, 0),
            Self::Rect16x48 => BlockSetup::new(1, 28, 48, 16, 1, 0),
            // DMRE
            Self::Rect8x48 => BlockSetup::new(1, 15, 48, 8, 1, 0),
            Self::Rect8x64 => BlockSetup::new(1, 18, 64, 8, 3, 0),
            Self::Rect8x80 => BlockSetup::new(1, 22, 80, 8, 3, 0),
            Self::Rect8x96 => BlockSetup::new(1, 28, 96, 8, 3, 0),
            Self::Rect8x120 => BlockSetup::new(1, 32, 120, 8, 5, 0),
            Self::Rect8x144 => BlockSetup::new(1, 36, 144, 8, 5, 0),
            Self::Rect12x64 => BlockSetup::new(1, 27, 64, 12, 3, 0),
            Self::Rect12x88 => BlockSetup::new(1, 36, 88, 12, 3, 0),
            Self::Rect16x64 => BlockSetup::new(1, 36, 64, 16, 3, 0),
            Self::Rect20x36 => BlockSetup::new(1, 28, 36, 20, 1, 0),
            Self::Rect20x44 => BlockSetup::new(1, 34, 44, 20, 1, 0),
            Self::Rect20x64 => BlockSetup::new(1, 42, 64, 20, 3, 0),
            Self::Rect22x48 => BlockSetup::new(1, 38, 48, 22, 1, 0),
            Self::Rect24x48 => BlockSetup::new(1, 41, 48, 24, 1, 0),
            Self::Rect24x64 => BlockSetup::new(1, 46, 64, 24, 3, 0),
            Self::Rect26x40 => BlockSetup::new(1, 38, 40, 26, 1, 0),
            Self::Rect26x48 => BlockSetup::new(1, 42, 48, 26, 1, 0),
            Self::Rect26x64 => BlockSetup::new(1, 50, 64, 26, 3, 0),
        }
    }

    /// Width in modules, without quiet zone.
    pub const fn width(&self) -> usize {
        self.block_setup().width
    }

    /// Height in modules, without quiet zone.
    pub const fn height(&self) -> usize {
        self.block_setup().height
    }

    /// Number of data and error codewords.
    pub(crate) const fn num_codewords(&self) -> usize {
        let setup = self.block_setup();
        self.num_data_codewords() + setup.num_ecc_blocks * setup.num_ecc_per_block
    }

    /// Squares whose mapping matrix has four fixed modules in the lower right corner.
    pub(crate) const fn has_padding_modules(&self) -> bool {
        matches!(
            self,
            Self::Square12 | Self::Square16 | Self::Square20 | Self::Square24
        )
    }

    /// Find the symbol size for a module grid of the given dimensions.
    pub fn from_dimensions(width: usize, height: usize) -> Option<Self> {
        SYMBOL_SIZES
            .iter()
            .find(|s| s.width() == width && s.height() == height)
            .cloned()
    }
}

// The mapping matrix must hold exactly all codewords, plus the four fixed
// modules of some squares.
const _: () = {
    let mut i = 0;
    while i < SYMBOL_SIZES.len() {
        let size = SYMBOL_SIZES[i];
        let setup = size.block_setup();
        let padding = if size.has_padding_modules() { 4 } else { 0 };
        assert!(
            setup.content_width() * setup.content_height() == size.num_codewords() * 8 + padding
        );
        i += 1;
    }
};

impl PartialOrd for SymbolSize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SymbolSize {
    fn cmp(&self, other: &Self) -> Ordering {
        fn key(obj: &SymbolSize) -> (usize, usize) {
            (
                obj.num_data_codewords(),
                obj.width().pow(2) + obj.height().pow(2),
            )
        }
        key(self).cmp(&key(other))
    }
}

#[test]
fn test_partial_ord_symbol_size() {
    for a in SYMBOL_SIZES {
        for b in SYMBOL_SIZES {
            assert_eq!(
                a.partial_cmp(b) == Some(Ordering::Equal),
                a == b,
                "a = {:?}, b = {:?}",
                a,
                b,
            );
        }
    }
}

#[test]
fn test_symbol_size_order() {
    let mut all: Vec<SymbolSize> = SYMBOL_SIZES.into();
    all.sort_unstable();
    let all2: Vec<SymbolSize> = SymbolList::all().iter().collect();
    assert_eq!(&all, &all2);
}

#[test]
fn test_iter_all_symbols() {
    let mut all: Vec<SymbolSize> = enum_iterator::all::<SymbolSize>().collect();
    all.sort_unstable();
    assert_eq!(&all, SYMBOL_SIZES);
}

#[test]
fn test_size_candidates_for_single_size() {
    let list: SymbolList = SymbolSize::Square10.into();
    let symbols: Vec<SymbolSize> = list.iter().collect();
    assert_eq!(symbols, vec![SymbolSize::Square10]);
}

#[test]
fn test_size_candidates_auto() {
    let all: Vec<SymbolSize> = SymbolList::default().iter().collect();
    let mut expected: Vec<SymbolSize> = SYMBOL_SIZES
        .iter()
        .filter(|s| !s.is_dmre())
        .cloned()
        .collect();
    expected.sort_unstable_by_key(|s| s.num_data_codewords());
    assert_eq!(all, expected);
}

#[test]
fn test_size_candidates_auto_rect() {
    let all: Vec<SymbolSize> = SymbolList::default().enforce_rectangular().iter().collect();
    let expected = vec![
        SymbolSize::Rect8x18,
        SymbolSize::Rect8x32,
        SymbolSize::Rect12x26,
        SymbolSize::Rect12x36,
        SymbolSize::Rect16x36,
        SymbolSize::Rect16x48,
    ];
    assert_eq!(all, expected);
}

#[test]
fn test_size_candidates_auto_square() {
    let all: Vec<usize> = SymbolList::default()
        .enforce_square()
        .iter()
        .map(|s| s.width())
        .collect();
    let expected = vec![
        10, 12, 14, 16, 18, 20, 22, 24, 26, 32, 36, 40, 44, 48, 52, 64, 72, 80, 88, 96, 104, 120,
        132, 144,
    ];
    assert_eq!(all, expected);
}

#[test]
fn test_height_range() {
    let symbols = SymbolList::with_extended_rectangles().enforce_height_in(0..21);
    assert!(!symbols.is_empty());
    for sym in symbols {
        assert!(sym.height() <= 20);
    }
}

#[test]
fn test_width_range() {
    let symbols = SymbolList::with_extended_rectangles().enforce_width_in(9..=10);
    assert_eq!(symbols.iter().collect::<Vec<_>>(), vec![SymbolSize::Square10]);
}

#[test]
fn test_first_symbol_big_enough() {
    let list = SymbolList::default();
    assert_eq!(list.first_symbol_big_enough_for(0), Some(SymbolSize::Square10));
    assert_eq!(list.first_symbol_big_enough_for(4), Some(SymbolSize::Square12));
    assert_eq!(list.first_symbol_big_enough_for(9), Some(SymbolSize::Rect8x32));
    assert_eq!(list.first_symbol_big_enough_for(1558), Some(SymbolSize::Square144));
    assert_eq!(list.first_symbol_big_enough_for(1559), None);
}

#[test]
fn test_distinguishable_by_size() {
    for size in SYMBOL_SIZES {
        assert_eq!(
            SymbolSize::from_dimensions(size.width(), size.height()),
            Some(*size)
        );
    }
    assert_eq!(SymbolSize::from_dimensions(11, 11), None);
    assert_eq!(SymbolSize::from_dimensions(8, 18), None);
}

#[test]
fn test_list_all() {
    assert_eq!(SymbolList::all().iter().count(), SYMBOL_SIZES.len());

    for size in SymbolList::all() {
        assert!(SYMBOL_SIZES.iter().any(|s| *s == size));
    }
}
