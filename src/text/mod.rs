//! # Text Measurement
//!
//! The engine never rasterizes text; it only needs to know how big a piece of
//! text will be so flex layout can size text children and the fitter can
//! shrink names into their boxes. That capability is the [`TextMeasurer`]
//! trait. Hosts with a real text engine implement `line_width`; the crate
//! ships [`FontContext`] (font-file metrics with a built-in fallback) and
//! [`FixedAdvanceMeasurer`] (every glyph the same width, for deterministic
//! layout).

pub mod fit;
pub mod shaping;

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::FontContext;
use crate::model::{FontStyle, TextConfig, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};

/// Everything that affects the measured size of a text block.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub style: FontStyle,
    pub letter_spacing: f64,
    /// Line height as a multiplier of `size`.
    pub line_height: f64,
    /// Padding on every side of the text block.
    pub padding: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: DEFAULT_FONT_SIZE,
            style: FontStyle::Normal,
            letter_spacing: 0.0,
            line_height: 1.0,
            padding: 0.0,
        }
    }
}

impl FontSpec {
    /// Typography of a text element.
    pub fn from_text(text: &TextConfig) -> Self {
        Self {
            family: text.font_family().to_string(),
            size: text.font_size(),
            style: text.font_style(),
            letter_spacing: text.letter_spacing.unwrap_or(0.0),
            line_height: text.line_height.unwrap_or(1.0),
            padding: text.padding.unwrap_or(0.0),
        }
    }

    /// The same typography at another font size.
    pub fn with_size(&self, size: f64) -> Self {
        Self {
            size,
            ..self.clone()
        }
    }
}

/// Measured size of a text block, padding included.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

/// Text measurement capability supplied to a build pass.
pub trait TextMeasurer {
    /// Width of a single line, letter spacing included, padding excluded.
    fn line_width(&self, text: &str, font: &FontSpec) -> f64;

    /// Size of a text block. When `max_width` is given the text wraps to fit
    /// it (padding included); explicit newlines always break.
    fn measure(&self, text: &str, font: &FontSpec, max_width: Option<f64>) -> TextMetrics {
        let inner = max_width.map(|w| (w - 2.0 * font.padding).max(0.0));
        let lines = break_into_lines(self, text, font, inner);
        let widest = lines.iter().map(|l| l.width).fold(0.0_f64, f64::max);
        TextMetrics {
            width: widest + 2.0 * font.padding,
            height: lines.len() as f64 * font.size * font.line_height + 2.0 * font.padding,
        }
    }
}

impl TextMeasurer for FontContext {
    fn line_width(&self, text: &str, font: &FontSpec) -> f64 {
        self.measure_string(
            text,
            &font.family,
            font.style.weight(),
            font.style.is_italic(),
            font.size,
            font.letter_spacing,
        )
    }
}

/// Every character advances by `ratio × font size`.
#[derive(Debug, Clone, Copy)]
pub struct FixedAdvanceMeasurer {
    pub ratio: f64,
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self { ratio: 0.5 }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn line_width(&self, text: &str, font: &FontSpec) -> f64 {
        let n = text.chars().count() as f64;
        n * (font.size * self.ratio + font.letter_spacing)
    }
}

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    pub text: String,
    /// Width without trailing whitespace.
    pub width: f64,
}

/// Slack allowed when comparing a line against its wrap width. A box sized to
/// a measured line and shrunk back by its padding can land a rounding error
/// below that line's width.
const WRAP_EPSILON: f64 = 1e-6;

fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Break text into lines at UAX#14 opportunities.
///
/// Greedy: a segment moves to the next line when appending it would push the
/// line past `max_width`. A single segment wider than `max_width` keeps its own
/// line rather than being split mid-word. Without `max_width` only mandatory
/// breaks (newlines) apply.
pub fn break_into_lines<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font: &FontSpec,
    max_width: Option<f64>,
) -> Vec<BrokenLine> {
    let make_line = |s: &str| {
        let trimmed = s.trim_end_matches(|c: char| c == ' ' || is_line_terminator(c));
        BrokenLine {
            text: trimmed.to_string(),
            width: measurer.line_width(trimmed, font),
        }
    };

    if text.is_empty() {
        return vec![BrokenLine {
            text: String::new(),
            width: 0.0,
        }];
    }

    let mut lines = Vec::new();
    let mut line_start = 0;
    // Byte offset of the latest allowed break on the current line.
    let mut last_break: Option<usize> = None;

    for (offset, opp) in linebreaks(text) {
        if let Some(limit) = max_width {
            let candidate =
                text[line_start..offset].trim_end_matches(|c: char| c == ' ' || is_line_terminator(c));
            if measurer.line_width(candidate, font) > limit + WRAP_EPSILON {
                if let Some(bp) = last_break.filter(|&bp| bp > line_start) {
                    lines.push(make_line(&text[line_start..bp]));
                    line_start = bp;
                }
            }
        }

        match opp {
            BreakOpportunity::Mandatory => {
                if offset < text.len() || line_start < offset {
                    lines.push(make_line(&text[line_start..offset]));
                }
                line_start = offset;
                last_break = None;
            }
            BreakOpportunity::Allowed => {
                last_break = Some(offset);
            }
        }
    }

    if lines.is_empty() {
        lines.push(make_line(text));
    }
    lines
}
