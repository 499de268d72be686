//! Inbound notifications from room collaborators and the outbound selection
//! request.
//!
//! Payloads deserialize leniently: fields a collaborator may omit are
//! optional here, and validation happens when a message becomes a bubble.

use serde::{Deserialize, Serialize};

use crate::bubble::{hex_color, BubbleContent, Point, Sender};
use crate::config::BubbleWidth;
use crate::error::{Error, Result};
use crate::layout::LayoutMode;
use crate::scheduler::ScrollSpeed;

/// A chat line said by an avatar or object in the room.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatMessage {
    pub sender_id: Option<i64>,
    pub sender_category: i32,
    pub room_id: i64,
    pub text: String,
    pub formatted_text: String,
    pub sender_name: String,
    pub anchor_x: Option<f32>,
    pub anchor_y: Option<f32>,
    pub chat_type: i32,
    pub style_id: i32,
    pub avatar_image: Option<String>,
    pub color_value: Option<u32>,
}

impl ChatMessage {
    /// Create a message from `sender_id` at `(x, y)`.
    pub fn new(sender_id: i64, room_id: i64, text: impl Into<String>, x: f32, y: f32) -> Self {
        let text = text.into();
        Self {
            sender_id: Some(sender_id),
            room_id,
            formatted_text: text.clone(),
            text,
            anchor_x: Some(x),
            anchor_y: Some(y),
            ..Default::default()
        }
    }

    /// Set the sender's display name.
    pub fn with_sender_name(mut self, name: impl Into<String>) -> Self {
        self.sender_name = name.into();
        self
    }

    /// Set the sender category (avatar, pet, bot, ...).
    pub fn with_sender_category(mut self, category: i32) -> Self {
        self.sender_category = category;
        self
    }

    /// Set the chat type and bubble style.
    pub fn with_style(mut self, chat_type: i32, style_id: i32) -> Self {
        self.chat_type = chat_type;
        self.style_id = style_id;
        self
    }

    /// Set the packed RGB colour.
    pub fn with_color(mut self, color: u32) -> Self {
        self.color_value = Some(color);
        self
    }

    /// Who sent it. Fails without a sender id.
    pub fn sender(&self) -> Result<Sender> {
        let sender_id = self.sender_id.ok_or_else(|| Error::missing_field("sender_id"))?;
        Ok(Sender {
            sender_id,
            sender_category: self.sender_category,
            sender_name: self.sender_name.clone(),
            room_id: self.room_id,
        })
    }

    /// Where the sender stood. Fails without a finite position.
    pub fn anchor(&self) -> Result<Point> {
        let x = self.anchor_x.ok_or_else(|| Error::missing_field("anchor_x"))?;
        let y = self.anchor_y.ok_or_else(|| Error::missing_field("anchor_y"))?;
        if !(x.is_finite() && y.is_finite()) {
            return Err(Error::malformed("anchor", format!("({x}, {y}) is not finite")));
        }
        Ok(Point::new(x, y))
    }

    /// Display payload, with the colour rendered as `#rrggbb`.
    pub fn content(&self) -> BubbleContent {
        // zero means "no colour"
        let color = self.color_value.filter(|c| *c != 0).map(hex_color);
        BubbleContent {
            text: self.text.clone(),
            formatted_text: self.formatted_text.clone(),
            chat_type: self.chat_type,
            style_id: self.style_id,
            avatar_image: self.avatar_image.clone(),
            color,
        }
    }
}

/// Chat settings of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomChatSettings {
    pub mode: LayoutMode,
    pub speed: ScrollSpeed,
    pub bubble_width: BubbleWidth,
}

impl RoomChatSettings {
    pub fn new(mode: LayoutMode, speed: ScrollSpeed, bubble_width: BubbleWidth) -> Self {
        Self {
            mode,
            speed,
            bubble_width,
        }
    }
}

/// Room information delivered on entry and on later refreshes.
///
/// Only a result that marks an actual room entry carries settings the view
/// should adopt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRoomInfo {
    pub room_enter: bool,
    pub chat: RoomChatSettings,
}

/// The room camera was dragged horizontally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDrag {
    pub room_id: i64,
    pub offset_x: f32,
}

/// Ask the room to select the avatar behind a clicked bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub sender_id: i64,
    pub sender_category: i32,
    pub sender_name: String,
    pub room_id: i64,
}

impl From<&Sender> for SelectionRequest {
    fn from(sender: &Sender) -> Self {
        Self {
            sender_id: sender.sender_id,
            sender_category: sender.sender_category,
            sender_name: sender.sender_name.clone(),
            room_id: sender.room_id,
        }
    }
}
