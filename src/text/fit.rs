//! # Adaptive Text Fitting
//!
//! Shrinks a font size until a single line of text fits a target width.
//! Each step scales the size by `target / measured` with a small safety
//! margin and floors it to a whole pixel, so it converges in a handful of
//! measurements even for fonts whose width isn't linear in size.

use serde::{Deserialize, Serialize};

use super::{FontSpec, TextMeasurer, TextMetrics};
use crate::model::{Anchor, Point, Shadow, SmartTextConfig};

/// Multiplier applied on every shrink step so rounding never lands just over
/// the target.
pub const SAFETY_MARGIN: f64 = 0.95;

/// Tunables of the fitter. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitOptions {
    #[serde(default = "default_min_font_size")]
    pub min_font_size: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_min_font_size() -> f64 {
    8.0
}

fn default_max_iterations() -> u32 {
    10
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            min_font_size: default_min_font_size(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl FitOptions {
    /// Options of a `smartText` element, defaults filling the gaps.
    pub fn for_smart_text(config: &SmartTextConfig) -> Self {
        let defaults = Self::default();
        Self {
            min_font_size: config.min_font_size.unwrap_or(defaults.min_font_size),
            max_iterations: config.max_iterations.unwrap_or(defaults.max_iterations),
        }
    }
}

/// Outcome of fitting one piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub font_size: f64,
    /// Measured size at `font_size`.
    pub metrics: TextMetrics,
    /// Number of shrink steps taken.
    pub iterations: u32,
}

impl FitResult {
    /// `final / requested`, used to scale size-dependent decorations.
    pub fn ratio(&self, requested: f64) -> f64 {
        if requested > 0.0 {
            self.font_size / requested
        } else {
            1.0
        }
    }
}

/// Find the largest font size (at most `font.size`) at which `text` fits in
/// `target_width` on one line.
///
/// The result never drops below `min(options.min_font_size, font.size)`.
/// When the text already fits, the requested size comes back unchanged.
pub fn fit_text<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font: &FontSpec,
    target_width: f64,
    options: &FitOptions,
) -> FitResult {
    let requested = font.size;
    let floor = options.min_font_size.min(requested);

    let mut size = requested;
    let mut metrics = measurer.measure(text, font, None);
    let mut iterations = 0;

    while metrics.width > target_width && iterations < options.max_iterations {
        let scaled = (size * (target_width / metrics.width) * SAFETY_MARGIN).floor();
        let next = scaled.max(floor).min(size);
        iterations += 1;
        if next == size {
            break;
        }
        size = next;
        metrics = measurer.measure(text, &font.with_size(size), None);
    }

    if iterations > 0 {
        log::debug!(
            "fitted {:?} from {} to {} in {} steps (target {})",
            text,
            requested,
            size,
            iterations,
            target_width
        );
    }

    FitResult {
        font_size: size,
        metrics,
        iterations,
    }
}

/// Fractions of width and height an anchor sits at.
pub fn anchor_fractions(anchor: Anchor) -> (f64, f64) {
    match anchor {
        Anchor::TopLeft => (0.0, 0.0),
        Anchor::TopMiddle => (0.5, 0.0),
        Anchor::TopRight => (1.0, 0.0),
        Anchor::MiddleLeft => (0.0, 0.5),
        Anchor::Center => (0.5, 0.5),
        Anchor::MiddleRight => (1.0, 0.5),
        Anchor::BottomLeft => (0.0, 1.0),
        Anchor::BottomMiddle => (0.5, 1.0),
        Anchor::BottomRight => (1.0, 1.0),
    }
}

/// Local origin shift that puts `anchor` of a `width × height` box at the
/// element's position.
pub fn anchor_offset(anchor: Anchor, width: f64, height: f64) -> Point {
    let (fx, fy) = anchor_fractions(anchor);
    Point::new(width * fx, height * fy)
}

/// Shadow with its offset scaled by `ratio`.
pub fn scale_shadow(shadow: &Shadow, ratio: f64) -> Shadow {
    Shadow {
        offset: shadow
            .offset
            .map(|o| Point::new(o.x * ratio, o.y * ratio)),
        ..shadow.clone()
    }
}
