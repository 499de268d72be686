//! Bubble entity: identity, display payload and mutable geometry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::handle::RenderHandle;
use crate::error::{Error, Result};

/// Identifier of a bubble within one chat view.
///
/// Assigned from a per-view counter, so ids also reflect arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BubbleId(pub u64);

impl std::fmt::Display for BubbleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bubble-{}", self.0)
    }
}

/// A screen coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box in screen space. `top` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Who said it: the avatar or object a bubble belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub sender_id: i64,
    pub sender_category: i32,
    pub sender_name: String,
    pub room_id: i64,
}

/// Immutable display payload of a bubble.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BubbleContent {
    pub text: String,
    pub formatted_text: String,
    pub chat_type: i32,
    pub style_id: i32,
    pub avatar_image: Option<String>,
    /// CSS-style `#rrggbb` colour, when the sender has one
    pub color: Option<String>,
}

/// Format a packed RGB value as `#rrggbb`.
pub fn hex_color(value: u32) -> String {
    format!("#{:06x}", value & 0x00ff_ffff)
}

/// A live chat bubble.
///
/// Geometry is private: only the registry moves bubbles, and `width` and
/// `height` never change after creation.
#[derive(Debug)]
pub struct Bubble {
    id: BubbleId,
    /// Originating avatar
    pub sender: Sender,
    /// Display payload
    pub content: BubbleContent,
    anchor: Point,
    rect: Rect,
    created_at: DateTime<Utc>,
    render_handle: Option<RenderHandle>,
}

impl Bubble {
    /// Create a bubble at `rect`.
    ///
    /// Fails when the extent is not strictly positive or any coordinate is
    /// not finite.
    pub fn new(
        id: BubbleId,
        sender: Sender,
        content: BubbleContent,
        anchor: Point,
        rect: Rect,
    ) -> Result<Self> {
        let finite = [rect.left, rect.top, rect.width, rect.height, anchor.x, anchor.y]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::invalid_geometry(format!(
                "{id} has a non-finite coordinate"
            )));
        }
        if rect.height <= 0.0 || rect.width <= 0.0 {
            return Err(Error::invalid_geometry(format!(
                "{id} measured {}x{}, both sides must be positive",
                rect.width, rect.height
            )));
        }

        Ok(Self {
            id,
            sender,
            content,
            anchor,
            rect,
            created_at: Utc::now(),
            render_handle: None,
        })
    }

    pub fn id(&self) -> BubbleId {
        self.id
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn left(&self) -> f32 {
        self.rect.left
    }

    pub fn top(&self) -> f32 {
        self.rect.top
    }

    pub fn width(&self) -> f32 {
        self.rect.width
    }

    pub fn height(&self) -> f32 {
        self.rect.height
    }

    pub fn bottom(&self) -> f32 {
        self.rect.bottom()
    }

    pub fn right(&self) -> f32 {
        self.rect.right()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the renderer has mounted this bubble.
    pub fn is_mounted(&self) -> bool {
        self.render_handle.is_some()
    }

    pub fn render_handle(&self) -> Option<&RenderHandle> {
        self.render_handle.as_ref()
    }

    /// Move up by `amount`. Negative amounts are ignored so `top` stays
    /// monotonic.
    pub(crate) fn lift(&mut self, amount: f32) {
        if amount > 0.0 {
            self.rect.top -= amount;
        }
    }

    /// Move up so the top edge sits exactly at `top`. Ignored if that would
    /// move the bubble down.
    pub(crate) fn raise_to(&mut self, top: f32) {
        if top < self.rect.top {
            self.rect.top = top;
        }
    }

    pub(crate) fn slide(&mut self, dx: f32) {
        self.rect.left += dx;
    }

    /// Attach a handle, returning the previous one (if any) for release.
    pub(crate) fn attach(&mut self, handle: RenderHandle) -> Option<RenderHandle> {
        self.render_handle.replace(handle)
    }

    /// Read-only view for the presentation layer.
    pub fn snapshot(&self) -> BubbleSnapshot {
        BubbleSnapshot {
            id: self.id,
            left: self.rect.left,
            top: self.rect.top,
            width: self.rect.width,
            height: self.rect.height,
            sender_id: self.sender.sender_id,
            sender_name: self.sender.sender_name.clone(),
            text: self.content.text.clone(),
            formatted_text: self.content.formatted_text.clone(),
            chat_type: self.content.chat_type,
            style_id: self.content.style_id,
            avatar_image: self.content.avatar_image.clone(),
            color: self.content.color.clone(),
            mounted: self.is_mounted(),
        }
    }
}

/// Geometry and styling of one bubble as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubbleSnapshot {
    pub id: BubbleId,
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    pub sender_id: i64,
    pub sender_name: String,
    pub text: String,
    pub formatted_text: String,
    pub chat_type: i32,
    pub style_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub mounted: bool,
}
