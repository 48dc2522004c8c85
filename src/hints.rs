use crate::datamatrix::SymbolList;
use crate::eci::CharacterSet;
use crate::qr::EcLevel;

/// Shape restriction for Data Matrix symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymbolShape {
    #[default]
    None,
    Square,
    Rectangle,
}

/// Options for encoding a symbol.
///
/// Settings which do not apply to a symbology are ignored by its encoder.
///
/// ```rust
/// # use matrixcode::{EncodeHints, EcLevel, SymbolShape};
/// let hints = EncodeHints::new()
///     .with_shape(SymbolShape::Square)
///     .with_ec_level(EcLevel::Q);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EncodeHints {
    pub(crate) shape: SymbolShape,
    pub(crate) min_size: Option<(usize, usize)>,
    pub(crate) max_size: Option<(usize, usize)>,
    pub(crate) extended_rectangles: bool,
    pub(crate) mask: Option<u8>,
    pub(crate) character_set: Option<CharacterSet>,
    pub(crate) ec_level: EcLevel,
    pub(crate) version: Option<u8>,
    pub(crate) gs1: bool,
}

impl EncodeHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict Data Matrix symbols to squares or rectangles.
    pub fn with_shape(mut self, shape: SymbolShape) -> Self {
        self.shape = shape;
        self
    }

    /// Minimum Data Matrix symbol width and height in modules.
    pub fn with_min_size(mut self, width: usize, height: usize) -> Self {
        self.min_size = Some((width, height));
        self
    }

    /// Maximum Data Matrix symbol width and height in modules.
    pub fn with_max_size(mut self, width: usize, height: usize) -> Self {
        self.max_size = Some((width, height));
        self
    }

    /// Allow the rectangular extensions of ISO 21471 (DMRE).
    pub fn with_extended_rectangles(mut self, allow: bool) -> Self {
        self.extended_rectangles = allow;
        self
    }

    /// Use a fixed QR mask pattern. Values outside `0..=7` select automatically.
    pub fn with_mask(mut self, mask: u8) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Declare the character set of the input with an ECI designator.
    ///
    /// ISO-8859-1 is the default of both symbologies and is never declared.
    pub fn with_character_set(mut self, charset: CharacterSet) -> Self {
        self.character_set = Some(charset);
        self
    }

    pub fn with_ec_level(mut self, level: EcLevel) -> Self {
        self.ec_level = level;
        self
    }

    /// Use a fixed QR version (1 to 40).
    pub fn with_version(mut self, version: u8) -> Self {
        self.version = Some(version);
        self
    }

    /// Mark the data as GS1 formatted (leading FNC1).
    pub fn with_gs1(mut self, gs1: bool) -> Self {
        self.gs1 = gs1;
        self
    }

    pub(crate) fn symbol_list(&self) -> SymbolList {
        let mut list = if self.extended_rectangles {
            SymbolList::with_extended_rectangles()
        } else {
            SymbolList::default()
        };
        list = match self.shape {
            SymbolShape::None => list,
            SymbolShape::Square => list.enforce_square(),
            SymbolShape::Rectangle => list.enforce_rectangular(),
        };
        if let Some((w, h)) = self.min_size {
            list = list.enforce_width_in(w..).enforce_height_in(h..);
        }
        if let Some((w, h)) = self.max_size {
            list = list.enforce_width_in(..=w).enforce_height_in(..=h);
        }
        list
    }

    pub(crate) fn qr_mask(&self) -> Option<u8> {
        self.mask.filter(|m| *m < 8)
    }

    /// The character set to declare, if it differs from the default.
    pub(crate) fn declared_charset(&self) -> Option<CharacterSet> {
        self.character_set
            .filter(|cs| *cs != CharacterSet::Iso8859_1)
    }
}

#[cfg(test)]
mod tests {
    use super::{EncodeHints, SymbolShape};
    use crate::datamatrix::SymbolSize;
    use pretty_assertions::assert_eq;

    #[test]
    fn size_bounds_filter_symbols() {
        let list = EncodeHints::new()
            .with_shape(SymbolShape::Rectangle)
            .with_min_size(30, 10)
            .with_max_size(40, 16)
            .symbol_list();
        let sizes: Vec<SymbolSize> = list.iter().collect();
        assert_eq!(sizes, vec![SymbolSize::Rect12x36, SymbolSize::Rect16x36]);
    }

    #[test]
    fn out_of_range_mask_is_automatic() {
        assert_eq!(EncodeHints::new().with_mask(9).qr_mask(), None);
        assert_eq!(EncodeHints::new().with_mask(7).qr_mask(), Some(7));
    }
}
