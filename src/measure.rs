//! Bubble measurement.
//!
//! How big a bubble is depends on how the renderer lays out its text, so the
//! view asks a [`BubbleMeasurer`] once per arrival and never again: a
//! bubble's extent is fixed for its whole life.

use serde::{Deserialize, Serialize};

use crate::config::MeasureMetrics;

/// Width and height of a bubble.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Measures the on-screen extent of a bubble before it is placed.
pub trait BubbleMeasurer: Send {
    /// Extent of a bubble showing `sender_name` and `text`, no wider than
    /// `max_width`.
    fn measure(&self, sender_name: &str, text: &str, max_width: f32) -> Extent;
}

/// Estimates extent from character counts and fixed glyph metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMeasurer {
    metrics: MeasureMetrics,
}

impl GlyphMeasurer {
    pub fn new(metrics: MeasureMetrics) -> Self {
        Self { metrics }
    }
}

impl Default for GlyphMeasurer {
    fn default() -> Self {
        Self::new(MeasureMetrics::default())
    }
}

impl BubbleMeasurer for GlyphMeasurer {
    fn measure(&self, sender_name: &str, text: &str, max_width: f32) -> Extent {
        let m = &self.metrics;
        // "name: text" on one run
        let glyphs = (sender_name.chars().count() + 2 + text.chars().count()) as f32;
        let natural = glyphs * m.glyph_width + m.padding_x;
        let width = natural.min(max_width).max(m.padding_x + m.glyph_width);

        let per_line = ((width - m.padding_x) / m.glyph_width).floor().max(1.0);
        let lines = (glyphs / per_line).ceil().max(1.0);

        Extent {
            width,
            height: lines * m.line_height + m.padding_y,
        }
    }
}

/// Measurer that returns the same extent for every bubble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMeasurer(pub Extent);

impl BubbleMeasurer for FixedMeasurer {
    fn measure(&self, _sender_name: &str, _text: &str, max_width: f32) -> Extent {
        Extent::new(self.0.width.min(max_width), self.0.height)
    }
}
