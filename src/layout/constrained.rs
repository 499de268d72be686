//! Constrained placement: the newcomer stays put and everyone else makes room.
//!
//! The shift starts at the container shortfall. If the shifted set would
//! still cut into the newcomer (bubbles of uneven height, or a newcomer that
//! is not on the bottom row), the shift grows until the newcomer is clear,
//! using the same processed-once scan as free-flow.

use std::collections::HashSet;

use super::overlap::overlaps;
use crate::bubble::{BubbleId, Rect};
use crate::registry::BubbleRegistry;

/// How far the newcomer's bottom edge overshoots the room it needs inside
/// the container. Zero when it fits.
pub fn shortfall(candidate: &Rect, container_height: f32) -> f32 {
    let lowest_point = candidate.bottom();
    let required_space = candidate.height;
    let space_available = container_height - lowest_point;

    if space_available < required_space {
        required_space - space_available
    } else {
        0.0
    }
}

/// Result of a constrained pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shift {
    /// Container shortfall
    pub shortfall: f32,
    /// Upward shift to apply to every other bubble
    pub amount: f32,
    /// Bubbles that forced the shift past the shortfall
    pub processed: usize,
}

/// Compute the uniform upward shift for every live bubble that lets
/// `candidate` sit at its natural position.
pub fn make_room(registry: &BubbleRegistry, candidate: &Rect, container_height: f32) -> Shift {
    let shortfall = shortfall(candidate, container_height);
    let mut processed: HashSet<BubbleId> = HashSet::new();
    let mut amount = shortfall;

    // test each bubble where `lift_all(amount)` would leave it
    while let Some(blocker) = registry
        .iter_rev()
        .filter(|other| !processed.contains(&other.id()))
        .find(|other| {
            let rect = other.rect();
            let shifted = Rect::new(rect.left, rect.top - amount, rect.width, rect.height);
            overlaps(candidate, &shifted)
        })
    {
        amount = amount.max(blocker.bottom() - candidate.top);
        processed.insert(blocker.id());
    }

    Shift {
        shortfall,
        amount,
        processed: processed.len(),
    }
}
