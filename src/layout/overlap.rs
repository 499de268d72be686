//! Overlap predicates.
//!
//! Boxes that share an edge do not overlap. Geometry is `f32`, so an edge
//! computed as `top + height` can land a rounding step past the edge it was
//! snapped to; intersections thinner than [`EDGE_TOLERANCE`] count as
//! touching. The resolver and [`find_overlap`](super::find_overlap) use the
//! same predicates, so they always agree on what overlapping means.

use crate::bubble::Rect;

/// Intersections thinner than this are treated as shared edges.
pub const EDGE_TOLERANCE: f32 = 1e-2;

/// Whether `[a0, a1]` and `[b0, b1]` share more than an edge.
fn ranges_intersect(a0: f32, a1: f32, b0: f32, b1: f32) -> bool {
    a0 < b1 - EDGE_TOLERANCE && b0 < a1 - EDGE_TOLERANCE
}

/// Whether the horizontal extents of two boxes intersect.
pub fn overlaps_horizontally(a: &Rect, b: &Rect) -> bool {
    ranges_intersect(a.left, a.right(), b.left, b.right())
}

/// Whether two boxes overlap.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    overlaps_at(a, a.top, b)
}

/// Whether `candidate`, with its top edge at `top`, overlaps `other`.
pub fn overlaps_at(candidate: &Rect, top: f32, other: &Rect) -> bool {
    overlaps_horizontally(candidate, other)
        && ranges_intersect(top, top + candidate.height, other.top, other.bottom())
}

/// Whether `candidate`, after a pending upward movement of `moved`, overlaps
/// `other`.
pub fn overlaps_with_offset(candidate: &Rect, other: &Rect, moved: f32) -> bool {
    overlaps_at(candidate, candidate.top - moved, other)
}
