//! # bubble-core
//!
//! Layout and collision resolution for chat bubbles floating over a room
//! view.
//!
//! ## Core Components
//!
//! - **Bubble**: positioned chat bubbles and their render handles
//! - **Registry**: the ordered set of live bubbles
//! - **Layout**: free-flow and constrained collision resolution
//! - **Scheduler**: the periodic upward scroll and its re-arming
//! - **View**: one room's bubbles and the events that act on them
//! - **Runtime**: an async loop driving a view from an event stream
//!
//! ## Example
//!
//! ```rust,ignore
//! use bubble_core::{ChatConfig, ChatMessage, ChatView};
//!
//! let mut view = ChatView::new(room_id, ChatConfig::default());
//! let message = ChatMessage::new(sender_id, room_id, "hello", 320.0, 200.0);
//! if let Some(placement) = view.receive(&message) {
//!     println!("placed {} (lifted {})", placement.id, placement.lifted);
//! }
//! ```

pub mod bubble;
pub mod config;
pub mod error;
pub mod events;
pub mod eviction;
pub mod layout;
pub mod measure;
pub mod registry;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod scheduler;
pub mod surface;
pub mod view;

// Re-exports for convenience
pub use bubble::{
    Bubble, BubbleContent, BubbleId, BubbleSnapshot, HandleRelease, Point, Rect, RenderHandle,
    Sender,
};
pub use config::{BubbleWidth, BubbleWidths, ChatConfig, MeasureMetrics, ScrollPeriods};
pub use error::{Error, Result};
pub use events::{ChatMessage, GuestRoomInfo, RoomChatSettings, RoomDrag, SelectionRequest};
pub use layout::{find_overlap, place, LayoutMode, Placement};
pub use measure::{BubbleMeasurer, Extent, FixedMeasurer, GlyphMeasurer};
pub use registry::BubbleRegistry;
#[cfg(feature = "tokio-runtime")]
pub use runtime::{ChatEvent, ChatHandle, ChatRuntime};
pub use scheduler::{ScrollScheduler, ScrollSpeed, TickEpoch};
pub use surface::{
    BroadcastSurface, ChatFrame, ChatSurface, CollectingSurface, NullSurface, SelectionHandler,
};
pub use view::{ChatView, TickReport};
