use crate::qr::EcLevel;

/// Position of a QR symbol in a structured append sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredAppend {
    /// Upper nibble: index of this symbol, lower nibble: total count minus one.
    pub sequence: u8,
    /// Parity byte over the complete message.
    pub parity: u8,
}

impl StructuredAppend {
    pub fn index(&self) -> u8 {
        self.sequence >> 4
    }

    pub fn total(&self) -> u8 {
        (self.sequence & 0x0F) + 1
    }
}

/// Everything recovered from a symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderResult {
    text: String,
    raw_bytes: Vec<u8>,
    byte_segments: Vec<Vec<u8>>,
    ec_level: Option<EcLevel>,
    symbology: char,
    symbology_modifier: u8,
    structured_append: Option<StructuredAppend>,
    errors_corrected: usize,
    mirrored: bool,
}

impl DecoderResult {
    pub(crate) fn new(text: String, raw_bytes: Vec<u8>, symbology: char) -> Self {
        Self {
            text,
            raw_bytes,
            byte_segments: Vec::new(),
            ec_level: None,
            symbology,
            symbology_modifier: 1,
            structured_append: None,
            errors_corrected: 0,
            mirrored: false,
        }
    }

    pub(crate) fn with_byte_segments(mut self, segments: Vec<Vec<u8>>) -> Self {
        self.byte_segments = segments;
        self
    }

    pub(crate) fn with_ec_level(mut self, level: EcLevel) -> Self {
        self.ec_level = Some(level);
        self
    }

    pub(crate) fn with_symbology_modifier(mut self, modifier: u8) -> Self {
        self.symbology_modifier = modifier;
        self
    }

    pub(crate) fn with_structured_append(mut self, sa: Option<StructuredAppend>) -> Self {
        self.structured_append = sa;
        self
    }

    pub(crate) fn with_errors_corrected(mut self, n: usize) -> Self {
        self.errors_corrected = n;
        self
    }

    pub(crate) fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// The decoded text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Data codewords after error correction.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    /// Payloads of byte-oriented segments (Base256, QR byte mode).
    pub fn byte_segments(&self) -> &[Vec<u8>] {
        &self.byte_segments
    }

    /// Error correction level, QR Code only.
    pub fn ec_level(&self) -> Option<EcLevel> {
        self.ec_level
    }

    pub fn symbology_modifier(&self) -> u8 {
        self.symbology_modifier
    }

    /// AIM symbology identifier, e.g. `]d1` or `]Q3`.
    pub fn symbology_identifier(&self) -> String {
        format!("]{}{}", self.symbology, self.symbology_modifier)
    }

    pub fn structured_append(&self) -> Option<StructuredAppend> {
        self.structured_append
    }

    /// Number of codewords fixed by error correction.
    pub fn errors_corrected(&self) -> usize {
        self.errors_corrected
    }

    /// The symbol was read from a transposed grid.
    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }
}
