//! Built-in proportional metrics used when no font file is registered.
//!
//! Widths are Helvetica AFM advances in 1/1000 em for printable ASCII. Other
//! characters use the digit width. Bold is approximated by a uniform
//! widening, which keeps text-fitting decisions stable without shipping
//! a second table.

const DEFAULT_ADVANCE: u16 = 556;
const BOLD_WIDENING: f64 = 1.06;

#[rustfmt::skip]
const ASCII_ADVANCES: [u16; 95] = [
    // ' ' ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[derive(Debug, Clone, Copy)]
pub struct FallbackMetrics {
    widening: f64,
}

impl FallbackMetrics {
    pub fn for_weight(weight: u32) -> Self {
        Self {
            widening: if weight >= 600 { BOLD_WIDENING } else { 1.0 },
        }
    }

    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let code = ch as u32;
        let advance = if (32..127).contains(&code) {
            ASCII_ADVANCES[(code - 32) as usize]
        } else {
            DEFAULT_ADVANCE
        };
        advance as f64 / 1000.0 * font_size * self.widening
    }

    pub fn measure_string(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}
