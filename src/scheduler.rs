//! Scroll scheduling: tick cadence, arm epochs and the per-tick step.
//!
//! The scheduler itself owns no timer. It tracks which period is active and
//! which arm epoch is current; whoever drives the clock (see
//! [`ChatRuntime`](crate::runtime::ChatRuntime)) re-arms its single deadline
//! whenever the epoch moves, and hands the epoch back with every tick so
//! ticks from a superseded arm are ignored.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::ScrollPeriods;

/// Scroll speed selected by room chat settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScrollSpeed {
    Fast,
    #[default]
    Normal,
    Slow,
}

impl std::fmt::Display for ScrollSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrollSpeed::Fast => write!(f, "fast"),
            ScrollSpeed::Normal => write!(f, "normal"),
            ScrollSpeed::Slow => write!(f, "slow"),
        }
    }
}

/// Identifies one arming of the tick timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TickEpoch(u64);

/// Cadence and arm state of the upward scroll.
#[derive(Debug, Clone)]
pub struct ScrollScheduler {
    periods: ScrollPeriods,
    speed: ScrollSpeed,
    step: f32,
    epoch: TickEpoch,
    ticks: u64,
}

impl ScrollScheduler {
    /// Create a scheduler at the default speed.
    pub fn new(periods: ScrollPeriods, step: f32) -> Self {
        Self {
            periods,
            speed: ScrollSpeed::default(),
            step,
            epoch: TickEpoch::default(),
            ticks: 0,
        }
    }

    /// Active scroll speed.
    pub fn speed(&self) -> ScrollSpeed {
        self.speed
    }

    /// Distance bubbles move per tick.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Time between ticks at the active speed.
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.periods.period_ms(self.speed))
    }

    /// Current arm epoch.
    pub fn epoch(&self) -> TickEpoch {
        self.epoch
    }

    /// Number of ticks accepted so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Change speed. Re-arms and returns true only if the speed changed.
    pub fn set_speed(&mut self, speed: ScrollSpeed) -> bool {
        if speed == self.speed {
            return false;
        }
        self.speed = speed;
        self.rearm();
        true
    }

    /// Supersede the current arm. Ticks from older epochs become no-ops.
    pub fn rearm(&mut self) -> TickEpoch {
        self.epoch = TickEpoch(self.epoch.0 + 1);
        self.epoch
    }

    /// Accept a tick fired for `epoch`. Returns false for stale ticks.
    pub fn accept(&mut self, epoch: TickEpoch) -> bool {
        if epoch != self.epoch {
            return false;
        }
        self.ticks += 1;
        true
    }
}

impl Default for ScrollScheduler {
    fn default() -> Self {
        Self::new(ScrollPeriods::default(), crate::config::DEFAULT_SCROLL_STEP)
    }
}
