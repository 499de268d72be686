//! Engine configuration: scroll cadence, bubble widths, container sizing and
//! measurement metrics.
//!
//! Every field has a default matching the stock room chat widget, so an
//! empty JSON object (`{}`) is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scheduler::ScrollSpeed;

/// Upward distance covered by one scheduler tick, in display units.
pub const DEFAULT_SCROLL_STEP: f32 = 15.0;

/// Default share of the viewport height given to the chat container.
pub const DEFAULT_VIEWER_HEIGHT_RATIO: f32 = 0.5;

/// Default capacity of the frame broadcast channel.
pub const DEFAULT_FRAME_CAPACITY: usize = 64;

/// Maximum bubble width class selected by room chat settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BubbleWidth {
    /// Widest bubbles
    Wide,
    /// Standard width
    #[default]
    Normal,
    /// Narrow bubbles
    Thin,
}

impl std::fmt::Display for BubbleWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BubbleWidth::Wide => write!(f, "wide"),
            BubbleWidth::Normal => write!(f, "normal"),
            BubbleWidth::Thin => write!(f, "thin"),
        }
    }
}

/// Tick period for each scroll speed, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollPeriods {
    pub fast_ms: u64,
    pub normal_ms: u64,
    pub slow_ms: u64,
}

impl ScrollPeriods {
    /// Period for the given speed.
    pub fn period_ms(&self, speed: ScrollSpeed) -> u64 {
        match speed {
            ScrollSpeed::Fast => self.fast_ms,
            ScrollSpeed::Normal => self.normal_ms,
            ScrollSpeed::Slow => self.slow_ms,
        }
    }
}

impl Default for ScrollPeriods {
    fn default() -> Self {
        Self {
            fast_ms: 3_000,
            normal_ms: 6_000,
            slow_ms: 12_000,
        }
    }
}

/// Maximum bubble width, in display units, for each width class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleWidths {
    pub wide: f32,
    pub normal: f32,
    pub thin: f32,
}

impl BubbleWidths {
    /// Maximum width for the given class.
    pub fn max_width(&self, width: BubbleWidth) -> f32 {
        match width {
            BubbleWidth::Wide => self.wide,
            BubbleWidth::Normal => self.normal,
            BubbleWidth::Thin => self.thin,
        }
    }
}

impl Default for BubbleWidths {
    fn default() -> Self {
        Self {
            wide: 2000.0,
            normal: 350.0,
            thin: 240.0,
        }
    }
}

/// Metrics used by the glyph-count measurer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureMetrics {
    /// Average advance of one glyph
    pub glyph_width: f32,
    /// Height of one text line
    pub line_height: f32,
    /// Horizontal padding (both sides combined, including the avatar slot)
    pub padding_x: f32,
    /// Vertical padding (top and bottom combined)
    pub padding_y: f32,
}

impl Default for MeasureMetrics {
    fn default() -> Self {
        Self {
            glyph_width: 7.0,
            line_height: 14.0,
            padding_x: 40.0,
            padding_y: 12.0,
        }
    }
}

/// Configuration for a chat view and its runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Upward distance per tick
    pub scroll_step: f32,
    /// Tick period per scroll speed
    pub periods: ScrollPeriods,
    /// Maximum width per bubble width class
    pub bubble_widths: BubbleWidths,
    /// Share of the viewport height used by the chat container
    pub viewer_height_ratio: f32,
    /// Container height used until the first resize
    pub initial_container_height: f32,
    /// Measurement metrics
    pub metrics: MeasureMetrics,
    /// Capacity of the frame broadcast channel
    pub frame_capacity: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            scroll_step: DEFAULT_SCROLL_STEP,
            periods: ScrollPeriods::default(),
            bubble_widths: BubbleWidths::default(),
            viewer_height_ratio: DEFAULT_VIEWER_HEIGHT_RATIO,
            initial_container_height: 300.0,
            metrics: MeasureMetrics::default(),
            frame_capacity: DEFAULT_FRAME_CAPACITY,
        }
    }
}

impl ChatConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file (JSON).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Set the scroll step.
    pub fn with_scroll_step(mut self, step: f32) -> Self {
        self.scroll_step = step;
        self
    }

    /// Set the tick periods.
    pub fn with_periods(mut self, periods: ScrollPeriods) -> Self {
        self.periods = periods;
        self
    }

    /// Set the container height used before the first resize.
    pub fn with_container_height(mut self, height: f32) -> Self {
        self.initial_container_height = height;
        self
    }

    /// Set the viewer height ratio.
    pub fn with_viewer_height_ratio(mut self, ratio: f32) -> Self {
        self.viewer_height_ratio = ratio;
        self
    }

    /// Set measurement metrics.
    pub fn with_metrics(mut self, metrics: MeasureMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.scroll_step.is_finite() && self.scroll_step > 0.0) {
            return Err(Error::config("scroll_step must be a positive number"));
        }
        for (name, ms) in [
            ("fast_ms", self.periods.fast_ms),
            ("normal_ms", self.periods.normal_ms),
            ("slow_ms", self.periods.slow_ms),
        ] {
            if ms == 0 {
                return Err(Error::config(format!("periods.{name} must be non-zero")));
            }
        }
        let widths = [
            self.bubble_widths.wide,
            self.bubble_widths.normal,
            self.bubble_widths.thin,
        ];
        if widths.iter().any(|w| !(w.is_finite() && *w > 0.0)) {
            return Err(Error::config("bubble widths must be positive"));
        }
        if !(self.viewer_height_ratio > 0.0 && self.viewer_height_ratio <= 1.0) {
            return Err(Error::config("viewer_height_ratio must be in (0, 1]"));
        }
        if !(self.initial_container_height.is_finite() && self.initial_container_height >= 0.0) {
            return Err(Error::config("initial_container_height must be non-negative"));
        }
        let m = &self.metrics;
        if !(m.glyph_width > 0.0 && m.line_height > 0.0 && m.padding_x >= 0.0 && m.padding_y >= 0.0)
        {
            return Err(Error::config("measure metrics must be positive"));
        }
        if self.frame_capacity == 0 {
            return Err(Error::config("frame_capacity must be non-zero"));
        }
        Ok(())
    }
}
