//! Bubble entities and their render handles.
//!
//! A [`Bubble`] is a passive record: identity and payload are fixed at
//! creation, geometry is only ever changed through the
//! [`BubbleRegistry`](crate::registry::BubbleRegistry).

mod handle;
mod types;

#[cfg(test)]
pub(crate) use handle::testing as handle_testing;
#[cfg(test)]
pub(crate) use types::testing;

pub use handle::{HandleRelease, RenderHandle};
pub use types::{
    hex_color, Bubble, BubbleContent, BubbleId, BubbleSnapshot, Point, Rect, Sender,
};
