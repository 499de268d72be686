//! Ordered live set of bubbles for one room view.
//!
//! The registry is the only place bubble geometry is written. Scheduler,
//! resolver and drag handling all go through the mutators below, so there is
//! exactly one owner of every bubble at all times.

use crate::bubble::{Bubble, BubbleId, BubbleSnapshot, RenderHandle};

/// Insertion-ordered collection of live bubbles.
#[derive(Debug, Default)]
pub struct BubbleRegistry {
    bubbles: Vec<Bubble>,
}

impl BubbleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bubble.
    pub fn add(&mut self, bubble: Bubble) {
        self.bubbles.push(bubble);
    }

    /// Remove every bubble matching `predicate`, keeping survivors in order.
    ///
    /// Removed bubbles are dropped here, which releases their render handles.
    /// Returns whether anything was removed.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> bool
    where
        F: FnMut(&Bubble) -> bool,
    {
        let before = self.bubbles.len();
        self.bubbles.retain(|bubble| !predicate(bubble));
        self.bubbles.len() != before
    }

    /// Number of live bubbles.
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    /// Check if there are no live bubbles.
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Bubble> + '_ {
        self.bubbles.iter()
    }

    /// Iterate most recent first.
    pub fn iter_rev(&self) -> impl Iterator<Item = &Bubble> + '_ {
        self.bubbles.iter().rev()
    }

    /// Look up a bubble by id.
    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.id() == id)
    }

    /// Check if a bubble is live.
    pub fn contains(&self, id: BubbleId) -> bool {
        self.get(id).is_some()
    }

    /// Snapshot of every bubble, in insertion order.
    pub fn snapshot(&self) -> Vec<BubbleSnapshot> {
        self.bubbles.iter().map(Bubble::snapshot).collect()
    }

    /// Move every bubble up by `amount`.
    pub fn lift_all(&mut self, amount: f32) {
        for bubble in &mut self.bubbles {
            bubble.lift(amount);
        }
    }

    /// Shift every mounted bubble horizontally. Returns how many moved.
    pub fn slide_mounted(&mut self, dx: f32) -> usize {
        let mut moved = 0;
        for bubble in self.bubbles.iter_mut().filter(|b| b.is_mounted()) {
            bubble.slide(dx);
            moved += 1;
        }
        moved
    }

    /// Attach a render handle to a live bubble.
    ///
    /// If the bubble is gone the handle is handed back so the caller decides
    /// when it is released. A handle replaced by a remount is released here.
    pub fn mount(&mut self, id: BubbleId, handle: RenderHandle) -> Result<(), RenderHandle> {
        match self.bubbles.iter_mut().find(|b| b.id() == id) {
            Some(bubble) => {
                drop(bubble.attach(handle));
                Ok(())
            }
            None => Err(handle),
        }
    }

    /// Drop every bubble, releasing all handles. Returns how many were live.
    pub fn clear(&mut self) -> usize {
        let count = self.bubbles.len();
        self.bubbles.clear();
        count
    }
}
