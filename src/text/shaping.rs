//! # OpenType Shaping
//!
//! Wraps rustybuzz to perform OpenType shaping (GSUB/GPOS) on text, so that
//! measured widths of registered fonts include kerning and ligatures.

/// Shape `text` and return its total advance in font units.
///
/// Returns `None` if the font data can't be parsed.
pub fn shaped_advance(text: &str, font_data: &[u8]) -> Option<f64> {
    let face = rustybuzz::Face::from_slice(font_data, 0)?;
    let mut buffer = rustybuzz::UnicodeBuffer::new();
    buffer.push_str(text);

    let output = rustybuzz::shape(&face, &[], buffer);
    Some(
        output
            .glyph_positions()
            .iter()
            .map(|pos| pos.x_advance as f64)
            .sum(),
    )
}
