//! Free-flow placement: the newcomer climbs until it overlaps nothing.
//!
//! Live bubbles are scanned most recent first. Each time the candidate hits
//! one, the candidate's top is snapped to that bubble's top edge minus its
//! own height, so it sits exactly on top of it. That bubble is marked
//! processed and the scan restarts over the bubbles not yet processed. The
//! candidate only ever rises, so a processed bubble stays clear and the pass
//! ends after at most `registry.len()` hits.

use std::collections::HashSet;

use tracing::trace;

use super::overlap::overlaps_at;
use crate::bubble::{BubbleId, Rect};
use crate::registry::BubbleRegistry;

/// Result of a free-flow pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Climb {
    /// Final top edge for the candidate
    pub top: f32,
    /// Total upward movement for the candidate
    pub moved: f32,
    /// Bubbles the candidate had to clear
    pub processed: usize,
}

/// Compute where `candidate` must rise to clear every live bubble.
pub fn climb(registry: &BubbleRegistry, candidate: &Rect) -> Climb {
    let mut processed: HashSet<BubbleId> = HashSet::new();
    let mut top = candidate.top;

    while let Some(blocker) = registry
        .iter_rev()
        .filter(|other| !processed.contains(&other.id()))
        .find(|other| overlaps_at(candidate, top, &other.rect()))
    {
        // the blocker's top edge is above our bottom, so this only rises
        top = top.min(blocker.top() - candidate.height);
        trace!(blocker = %blocker.id(), top, "candidate yields");
        processed.insert(blocker.id());
    }

    Climb {
        top,
        moved: candidate.top - top,
        processed: processed.len(),
    }
}
