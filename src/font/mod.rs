//! # Font Management
//!
//! Font registry and glyph metrics used by text measurement.
//!
//! Registered fonts (TrueType/OpenType, usually shipped with a design) are
//! parsed with ttf-parser and shaped with rustybuzz. Everything else falls back
//! to built-in proportional metrics modelled on Helvetica, which is close
//! enough for layout when the real font lives in the host renderer.

pub mod metrics;

pub use metrics::FallbackMetrics;
use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::PodiumError;
use crate::model::FontStyle;

/// A font registry that maps font family + weight + style to font data.
#[derive(Debug)]
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

impl FontKey {
    pub fn new(family: &str, style: FontStyle) -> Self {
        Self {
            family: family.to_string(),
            weight: style.weight(),
            italic: style.is_italic(),
        }
    }
}

/// Upper bound on memoized advances per font before the memo is reset.
const ADVANCE_CACHE_LIMIT: usize = 4096;

/// A registered TrueType/OpenType font.
#[derive(Debug, Clone)]
pub struct FontData {
    pub data: Vec<u8>,
    pub metrics: CustomFontMetrics,
    /// Shaped advance per string, in font units. Font size doesn't enter the
    /// key, so refitting the same text at another size never reshapes it.
    advances: RefCell<HashMap<String, f64>>,
}

impl FontData {
    pub fn new(data: Vec<u8>, metrics: CustomFontMetrics) -> Self {
        Self {
            data,
            metrics,
            advances: RefCell::new(HashMap::new()),
        }
    }

    /// Advance of `text` in font units. Shaped once per distinct string,
    /// falling back to per-character advances if the face can't be shaped.
    pub fn advance_units(&self, text: &str) -> f64 {
        if let Some(units) = self.advances.borrow().get(text) {
            return *units;
        }
        let units = crate::text::shaping::shaped_advance(text, &self.data).unwrap_or_else(|| {
            text.chars()
                .map(|ch| {
                    self.metrics
                        .advance_widths
                        .get(&ch)
                        .copied()
                        .unwrap_or(self.metrics.default_advance) as f64
                })
                .sum()
        });
        let mut advances = self.advances.borrow_mut();
        if advances.len() >= ADVANCE_CACHE_LIMIT {
            advances.clear();
        }
        advances.insert(text.to_string(), units);
        units
    }

    /// Number of strings whose advance is memoized.
    pub fn cached_advances(&self) -> usize {
        self.advances.borrow().len()
    }
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
}

impl CustomFontMetrics {
    /// Get the advance width of a character in pixels.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    /// Parse metrics from font data using ttf-parser.
    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();
        let ascender = face.ascender();
        let descender = face.descender();

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;

        // Latin, Latin-1 and general punctuation cover tournament and player names
        for code in (32u32..=0x024F).chain(0x2000..=0x206F) {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Some(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender,
            descender,
        })
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
        }
    }

    /// Look up a registered font, trying the snapped weight before giving up.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> Option<&FontData> {
        let key = FontKey {
            family: family.to_string(),
            weight,
            italic,
        };
        if let Some(font) = self.fonts.get(&key) {
            return Some(font);
        }

        let snapped_weight = if weight >= 600 { 700 } else { 400 };
        self.fonts.get(&FontKey {
            family: family.to_string(),
            weight: snapped_weight,
            italic,
        })
    }

    /// Register a custom font. Fails when the data isn't a parseable font.
    pub fn register(&mut self, key: FontKey, data: Vec<u8>) -> Result<(), PodiumError> {
        let metrics = CustomFontMetrics::from_font_data(&data).ok_or_else(|| {
            PodiumError::Font(format!("'{}' is not a TrueType/OpenType font", key.family))
        })?;
        log::debug!(
            "registered font {} (weight {}, italic {})",
            key.family,
            key.weight,
            key.italic
        );
        self.fonts.insert(key, FontData::new(data, metrics));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Shared font context used by text measurement.
#[derive(Debug)]
pub struct FontContext {
    registry: FontRegistry,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    /// Register a font from base64 or a `data:` URI.
    pub fn register_encoded(
        &mut self,
        family: &str,
        style: FontStyle,
        src: &str,
    ) -> Result<(), PodiumError> {
        use base64::Engine;
        let b64 = match src.find(";base64,") {
            Some(pos) => &src[pos + ";base64,".len()..],
            None => src,
        };
        let data = base64::engine::general_purpose::STANDARD
            .decode(b64.trim())
            .map_err(|e| PodiumError::Font(format!("font '{}': {}", family, e)))?;
        self.registry.register(FontKey::new(family, style), data)
    }

    /// Get the advance width of a single character in pixels.
    pub fn char_width(
        &self,
        ch: char,
        family: &str,
        weight: u32,
        italic: bool,
        font_size: f64,
    ) -> f64 {
        match self.registry.resolve(family, weight, italic) {
            Some(font) => font.metrics.char_width(ch, font_size),
            None => FallbackMetrics::for_weight(weight).char_width(ch, font_size),
        }
    }

    /// Measure the width of a single line in pixels.
    ///
    /// Registered fonts are shaped so kerning and ligatures count.
    pub fn measure_string(
        &self,
        text: &str,
        family: &str,
        weight: u32,
        italic: bool,
        font_size: f64,
        letter_spacing: f64,
    ) -> f64 {
        let spacing = letter_spacing * text.chars().count() as f64;
        match self.registry.resolve(family, weight, italic) {
            Some(font) => {
                font.advance_units(text) / font.metrics.units_per_em as f64 * font_size + spacing
            }
            None => {
                FallbackMetrics::for_weight(weight).measure_string(text, font_size) + spacing
            }
        }
    }

    /// Access the underlying font registry.
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    /// Access the underlying font registry mutably.
    pub fn registry_mut(&mut self) -> &mut FontRegistry {
        &mut self.registry
    }
}
