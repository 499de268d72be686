//! Collision resolution for newly arrived bubbles.
//!
//! Two mutually exclusive layout modes, selected by room chat settings:
//!
//! - **Free-flow**: bubbles may sit anywhere vertically. The newcomer yields
//!   to every live bubble it lands on and climbs until it is clear; nothing
//!   else moves.
//! - **Constrained**: bubbles live inside the container. The newcomer keeps
//!   its natural position and every other bubble shifts up by the container
//!   shortfall (extended, if needed, until the newcomer is clear).
//!
//! Either way the registry holds no overlapping pair once [`place`] returns.
//!
//! ```rust,ignore
//! use bubble_core::layout::{place, LayoutMode};
//!
//! let placement = place(LayoutMode::FreeFlow, &mut registry, bubble, container_height);
//! assert!(placement.survived);
//! ```

pub mod constrained;
pub mod free_flow;
pub mod overlap;

#[cfg(test)]
mod proptest;

pub use overlap::{
    overlaps, overlaps_at, overlaps_horizontally, overlaps_with_offset, EDGE_TOLERANCE,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bubble::{Bubble, BubbleId};
use crate::eviction::evict_hidden;
use crate::registry::BubbleRegistry;

/// Layout policy selected by room chat settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    #[default]
    FreeFlow,
    Constrained,
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutMode::FreeFlow => write!(f, "free_flow"),
            LayoutMode::Constrained => write!(f, "constrained"),
        }
    }
}

/// What a placement did.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// The placed bubble
    pub id: BubbleId,
    /// Mode used
    pub mode: LayoutMode,
    /// Upward movement applied to the newcomer
    pub lifted: f32,
    /// Upward shift applied to every other bubble
    pub shifted: f32,
    /// Bubbles examined as blockers
    pub processed: usize,
    /// Bubbles evicted after placement
    pub evicted: usize,
    /// Whether the newcomer is still live (it can be pushed out of view)
    pub survived: bool,
}

/// Resolve `candidate` against the registry, add it, then evict once.
pub fn place(
    mode: LayoutMode,
    registry: &mut BubbleRegistry,
    mut candidate: Bubble,
    container_height: f32,
) -> Placement {
    let id = candidate.id();
    let rect = candidate.rect();

    let (lifted, shifted, processed) = match mode {
        LayoutMode::FreeFlow => {
            let climb = free_flow::climb(registry, &rect);
            candidate.raise_to(climb.top);
            (climb.moved, 0.0, climb.processed)
        }
        LayoutMode::Constrained => {
            let shift = constrained::make_room(registry, &rect, container_height);
            registry.lift_all(shift.amount);
            (0.0, shift.amount, shift.processed)
        }
    };

    registry.add(candidate);
    let evicted = evict_hidden(registry);
    let survived = registry.contains(id);

    debug!(
        bubble = %id,
        %mode,
        lifted,
        shifted,
        processed,
        evicted,
        "placed bubble"
    );

    Placement {
        id,
        mode,
        lifted,
        shifted,
        processed,
        evicted,
        survived,
    }
}

/// First overlapping pair in the registry, if any.
pub fn find_overlap(registry: &BubbleRegistry) -> Option<(BubbleId, BubbleId)> {
    let bubbles: Vec<&Bubble> = registry.iter().collect();
    for (i, a) in bubbles.iter().enumerate() {
        for b in &bubbles[i + 1..] {
            if overlaps(&a.rect(), &b.rect()) {
                return Some((a.id(), b.id()));
            }
        }
    }
    None
}
