//! Render handles: the renderer's reference to an on-screen bubble.
//!
//! A handle is attached when the renderer mounts a bubble and is released
//! exactly once, when the handle is dropped. Eviction, explicit clears and
//! view teardown all release through `Drop`.

use std::fmt;
use std::sync::Arc;

/// Receives release notifications for handles it issued.
pub trait HandleRelease: Send + Sync {
    /// Called once when the handle with `key` is dropped.
    fn release(&self, key: u64);
}

/// Opaque reference to the on-screen representation of a bubble.
pub struct RenderHandle {
    key: u64,
    owner: Option<Arc<dyn HandleRelease>>,
}

impl RenderHandle {
    /// Create a handle that notifies `owner` when released.
    pub fn new(key: u64, owner: Arc<dyn HandleRelease>) -> Self {
        Self {
            key,
            owner: Some(owner),
        }
    }

    /// Create a handle with nobody to notify on release.
    pub fn detached(key: u64) -> Self {
        Self { key, owner: None }
    }

    /// Renderer-assigned key.
    pub fn key(&self) -> u64 {
        self.key
    }
}

impl Drop for RenderHandle {
    fn drop(&mut self) {
        if let Some(owner) = self.owner.take() {
            owner.release(self.key);
        }
    }
}

impl fmt::Debug for RenderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderHandle")
            .field("key", &self.key)
            .field("tracked", &self.owner.is_some())
            .finish()
    }
}
