//! Eviction of bubbles that have scrolled out of view.
//!
//! A bubble is hidden once its top edge has passed twice its own height above
//! the container: `top <= -(height * 2)`.

use tracing::trace;

use crate::bubble::Bubble;
use crate::registry::BubbleRegistry;

/// Whether a bubble has scrolled far enough to be removed.
pub fn is_hidden(bubble: &Bubble) -> bool {
    bubble.top() <= -(bubble.height() * 2.0)
}

/// Remove every hidden bubble, releasing their render handles.
///
/// Returns the number of bubbles removed.
pub fn evict_hidden(registry: &mut BubbleRegistry) -> usize {
    let before = registry.len();
    if registry.remove_where(is_hidden) {
        let evicted = before - registry.len();
        trace!(evicted, remaining = registry.len(), "evicted hidden bubbles");
        evicted
    } else {
        0
    }
}
