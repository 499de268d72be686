//! Outbound side: frames for the presentation layer and selection requests
//! for the room.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::bubble::BubbleSnapshot;
use crate::config::ChatConfig;
use crate::events::SelectionRequest;

/// Ordered snapshot of every live bubble after one mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatFrame {
    /// Increases by one with every published frame
    pub revision: u64,
    /// Live bubbles in arrival order
    pub bubbles: Vec<BubbleSnapshot>,
}

impl ChatFrame {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Presentation layer that draws bubbles.
pub trait ChatSurface: Send {
    /// Draw the latest frame.
    fn present(&mut self, frame: &ChatFrame);

    /// A bubble was just placed.
    fn make_room(&mut self, _bubble: &BubbleSnapshot) {}
}

/// Room collaborator that selects avatars.
pub trait SelectionHandler: Send {
    fn select(&mut self, request: &SelectionRequest);
}

/// Ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl ChatSurface for NullSurface {
    fn present(&mut self, _frame: &ChatFrame) {}
}

impl SelectionHandler for NullSurface {
    fn select(&mut self, _request: &SelectionRequest) {}
}

/// Publishes frames on a broadcast channel.
pub struct BroadcastSurface {
    sender: broadcast::Sender<ChatFrame>,
}

impl BroadcastSurface {
    /// Create a surface with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create a surface sized from `config.frame_capacity`.
    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.frame_capacity)
    }

    /// Subscribe to frames.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatFrame> {
        self.sender.subscribe()
    }

    /// Get number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ChatSurface for BroadcastSurface {
    fn present(&mut self, frame: &ChatFrame) {
        // no subscribers is fine
        let _ = self.sender.send(frame.clone());
    }
}

/// Everything a [`CollectingSurface`] has seen.
#[derive(Debug, Default)]
struct Collected {
    frames: Vec<ChatFrame>,
    placed: Vec<BubbleSnapshot>,
    selections: Vec<SelectionRequest>,
}

/// Records frames, placements and selections; clones share storage.
#[derive(Debug, Default, Clone)]
pub struct CollectingSurface {
    inner: Arc<RwLock<Collected>>,
}

impl CollectingSurface {
    /// Create new collecting surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get collected frames.
    pub fn frames(&self) -> Vec<ChatFrame> {
        self.inner.read().unwrap().frames.clone()
    }

    /// Most recent frame.
    pub fn last_frame(&self) -> Option<ChatFrame> {
        self.inner.read().unwrap().frames.last().cloned()
    }

    /// Bubbles announced through `make_room`.
    pub fn placed(&self) -> Vec<BubbleSnapshot> {
        self.inner.read().unwrap().placed.clone()
    }

    /// Selection requests received.
    pub fn selections(&self) -> Vec<SelectionRequest> {
        self.inner.read().unwrap().selections.clone()
    }

    /// Clear collected data.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.frames.clear();
        inner.placed.clear();
        inner.selections.clear();
    }
}

impl ChatSurface for CollectingSurface {
    fn present(&mut self, frame: &ChatFrame) {
        self.inner.write().unwrap().frames.push(frame.clone());
    }

    fn make_room(&mut self, bubble: &BubbleSnapshot) {
        self.inner.write().unwrap().placed.push(bubble.clone());
    }
}

impl SelectionHandler for CollectingSurface {
    fn select(&mut self, request: &SelectionRequest) {
        self.inner.write().unwrap().selections.push(request.clone());
    }
}
