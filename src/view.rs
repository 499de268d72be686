//! The chat view: one room's bubbles and the operations external events map
//! onto.
//!
//! `ChatView` is synchronous and single-owner. Every operation runs to
//! completion on `&mut self`; the async [`ChatRuntime`](crate::runtime::ChatRuntime)
//! only decides *when* to call them.

use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::bubble::{Bubble, BubbleId, BubbleSnapshot, Rect, RenderHandle};
use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::eviction::evict_hidden;
use crate::events::{ChatMessage, GuestRoomInfo, RoomChatSettings, RoomDrag, SelectionRequest};
use crate::layout::{self, Placement};
use crate::measure::{BubbleMeasurer, GlyphMeasurer};
use crate::registry::BubbleRegistry;
use crate::scheduler::{ScrollScheduler, TickEpoch};
use crate::surface::ChatFrame;

/// What one accepted tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Bubbles lifted
    pub moved: usize,
    /// Bubbles evicted afterwards
    pub evicted: usize,
}

/// Live chat bubbles for one room.
pub struct ChatView {
    room_id: i64,
    config: ChatConfig,
    settings: Option<RoomChatSettings>,
    registry: BubbleRegistry,
    scheduler: ScrollScheduler,
    measurer: Box<dyn BubbleMeasurer>,
    container_height: f32,
    next_id: u64,
    revision: u64,
}

impl ChatView {
    /// Create an empty view of `room_id`.
    pub fn new(room_id: i64, config: ChatConfig) -> Self {
        let scheduler = ScrollScheduler::new(config.periods, config.scroll_step);
        Self {
            room_id,
            measurer: Box::new(GlyphMeasurer::new(config.metrics)),
            container_height: config.initial_container_height,
            config,
            settings: None,
            registry: BubbleRegistry::new(),
            scheduler,
            next_id: 1,
            revision: 0,
        }
    }

    /// Replace the measurer.
    pub fn with_measurer(mut self, measurer: impl BubbleMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    pub fn room_id(&self) -> i64 {
        self.room_id
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Active settings, falling back to defaults before the room sends any.
    pub fn settings(&self) -> RoomChatSettings {
        self.settings.unwrap_or_default()
    }

    /// Whether the room has sent chat settings yet.
    pub fn has_settings(&self) -> bool {
        self.settings.is_some()
    }

    /// Read-only access to the live bubbles.
    pub fn registry(&self) -> &BubbleRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &ScrollScheduler {
        &self.scheduler
    }

    pub fn container_height(&self) -> f32 {
        self.container_height
    }

    /// Current tick arm. Changes whenever the timer must be restarted.
    pub fn tick_epoch(&self) -> TickEpoch {
        self.scheduler.epoch()
    }

    /// Time between ticks at the active speed.
    pub fn tick_period(&self) -> Duration {
        self.scheduler.period()
    }

    /// Snapshot of every live bubble.
    pub fn snapshot(&self) -> Vec<BubbleSnapshot> {
        self.registry.snapshot()
    }

    /// Build the next frame for the presentation layer.
    pub fn next_frame(&mut self) -> ChatFrame {
        self.revision += 1;
        ChatFrame {
            revision: self.revision,
            bubbles: self.registry.snapshot(),
        }
    }

    /// Turn a message into a bubble and place it.
    ///
    /// The bubble starts centred on the sender horizontally and on the bottom
    /// row of the container, then goes through the active layout mode.
    /// Messages said in another room are rejected.
    pub fn on_message(&mut self, message: &ChatMessage) -> Result<Placement> {
        if message.room_id != self.room_id {
            return Err(Error::malformed(
                "room_id",
                format!("{} is not the viewed room {}", message.room_id, self.room_id),
            ));
        }
        let sender = message.sender()?;
        let anchor = message.anchor()?;
        let settings = self.settings();

        let max_width = self.config.bubble_widths.max_width(settings.bubble_width);
        let extent = self
            .measurer
            .measure(&sender.sender_name, &message.text, max_width);
        let rect = Rect::new(
            anchor.x - extent.width / 2.0,
            self.container_height - extent.height,
            extent.width,
            extent.height,
        );

        let id = BubbleId(self.next_id);
        let bubble = Bubble::new(id, sender, message.content(), anchor, rect)?;
        self.next_id += 1;

        let placement = layout::place(
            settings.mode,
            &mut self.registry,
            bubble,
            self.container_height,
        );
        self.scheduler.rearm();
        Ok(placement)
    }

    /// Like [`on_message`](Self::on_message), but malformed messages are
    /// logged and dropped.
    pub fn receive(&mut self, message: &ChatMessage) -> Option<Placement> {
        match self.on_message(message) {
            Ok(placement) => Some(placement),
            Err(err) => {
                debug!(error = %err, room = self.room_id, "dropping chat message");
                None
            }
        }
    }

    /// Adopt new chat settings. Existing bubbles stay where they are; a speed
    /// change re-arms the tick timer. Returns whether it did.
    pub fn apply_settings(&mut self, settings: RoomChatSettings) -> bool {
        info!(
            room = self.room_id,
            mode = %settings.mode,
            speed = %settings.speed,
            width = %settings.bubble_width,
            "chat settings updated"
        );
        self.settings = Some(settings);
        self.scheduler.set_speed(settings.speed)
    }

    /// Adopt the settings of a guest room result, if it marks a room entry.
    pub fn on_guest_room(&mut self, info: &GuestRoomInfo) -> bool {
        if !info.room_enter {
            trace!(room = self.room_id, "ignoring guest room result without entry");
            return false;
        }
        self.apply_settings(info.chat);
        true
    }

    /// Shift every mounted bubble by the drag offset. Drags of other rooms
    /// are ignored. Returns how many bubbles moved.
    pub fn on_drag(&mut self, drag: &RoomDrag) -> usize {
        if drag.room_id != self.room_id || self.registry.is_empty() {
            return 0;
        }
        self.registry.slide_mounted(drag.offset_x)
    }

    /// Selection request for a clicked bubble. No state changes.
    pub fn select(&self, id: BubbleId) -> Option<SelectionRequest> {
        self.registry
            .get(id)
            .map(|bubble| SelectionRequest::from(&bubble.sender))
    }

    /// Attach the renderer's handle to a bubble.
    ///
    /// If the bubble has already been evicted the handle is released at once.
    pub fn mount(&mut self, id: BubbleId, handle: RenderHandle) -> bool {
        match self.registry.mount(id, handle) {
            Ok(()) => true,
            Err(handle) => {
                trace!(bubble = %id, "mount after eviction, releasing handle");
                drop(handle);
                false
            }
        }
    }

    /// Size the container from the viewport height.
    pub fn resize_viewport(&mut self, viewport_height: f32) -> Result<()> {
        self.set_container_height(viewport_height * self.config.viewer_height_ratio)
    }

    /// Set the container height directly.
    pub fn set_container_height(&mut self, height: f32) -> Result<()> {
        if !(height.is_finite() && height >= 0.0) {
            warn!(height, "ignoring invalid container height");
            return Err(Error::invalid_geometry(format!(
                "container height {height} must be finite and non-negative"
            )));
        }
        self.container_height = height;
        Ok(())
    }

    /// Scroll every bubble up one step, then evict.
    ///
    /// Ticks armed under an older epoch do nothing and return `None`.
    pub fn tick(&mut self, epoch: TickEpoch) -> Option<TickReport> {
        if !self.scheduler.accept(epoch) {
            trace!(room = self.room_id, "stale tick ignored");
            return None;
        }

        let moved = self.registry.len();
        self.registry.lift_all(self.scheduler.step());
        let evicted = evict_hidden(&mut self.registry);
        if evicted > 0 {
            self.scheduler.rearm();
        }

        Some(TickReport { moved, evicted })
    }

    /// Remove every bubble, releasing their handles.
    pub fn clear(&mut self) -> usize {
        let removed = self.registry.clear();
        if removed > 0 {
            self.scheduler.rearm();
        }
        removed
    }
}

impl std::fmt::Debug for ChatView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatView")
            .field("room_id", &self.room_id)
            .field("settings", &self.settings)
            .field("bubbles", &self.registry.len())
            .field("container_height", &self.container_height)
            .field("epoch", &self.scheduler.epoch())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::bubble::handle_testing::ReleaseLog;
    use crate::config::BubbleWidth;
    use crate::layout::{find_overlap, LayoutMode};
    use crate::measure::{Extent, FixedMeasurer};
    use crate::scheduler::ScrollSpeed;

    const ROOM: i64 = 7;

    fn view(container: f32, mode: LayoutMode) -> ChatView {
        let mut view = ChatView::new(ROOM, ChatConfig::default().with_container_height(container))
            .with_measurer(FixedMeasurer(Extent::new(50.0, 20.0)));
        view.apply_settings(RoomChatSettings::new(
            mode,
            ScrollSpeed::Normal,
            BubbleWidth::Normal,
        ));
        view
    }

    fn say(sender: i64, x: f32) -> ChatMessage {
        ChatMessage::new(sender, ROOM, "hello", x, 0.0).with_sender_name(format!("user{sender}"))
    }

    fn tops(view: &ChatView) -> Vec<f32> {
        view.registry().iter().map(|b| b.top()).collect()
    }

    #[test]
    fn test_defaults_before_settings() {
        let view = ChatView::new(ROOM, ChatConfig::default());
        assert!(!view.has_settings());
        assert_eq!(view.settings().mode, LayoutMode::FreeFlow);
        assert_eq!(view.settings().speed, ScrollSpeed::Normal);
        assert_eq!(view.tick_period(), Duration::from_millis(6_000));
    }

    #[test]
    fn test_natural_position() {
        let mut view = view(300.0, LayoutMode::FreeFlow);
        let placement = view.on_message(&say(1, 200.0)).unwrap();

        let bubble = view.registry().get(placement.id).unwrap();
        assert_eq!(bubble.left(), 175.0);
        assert_eq!(bubble.top(), 280.0);
        assert_eq!(bubble.sender.sender_name, "user1");
    }

    #[test]
    fn test_malformed_message_is_dropped() {
        let mut view = view(300.0, LayoutMode::FreeFlow);
        let mut message = say(1, 10.0);
        message.sender_id = None;

        assert!(view.receive(&message).is_none());
        assert!(view.registry().is_empty());

        // ids are not consumed by rejected messages
        let placement = view.receive(&say(2, 10.0)).unwrap();
        assert_eq!(placement.id, BubbleId(1));
    }

    #[test]
    fn test_message_for_other_room_is_dropped() {
        let mut view = view(300.0, LayoutMode::FreeFlow);
        let elsewhere = ChatMessage::new(1, ROOM + 1, "hello", 100.0, 0.0);

        let err = view.on_message(&elsewhere).unwrap_err();
        assert!(err.to_string().contains("room_id"));
        assert!(view.receive(&elsewhere).is_none());
        assert!(view.registry().is_empty());
    }

    #[test]
    fn test_fractional_arrivals_never_overlap() {
        let mut view = ChatView::new(ROOM, ChatConfig::default().with_viewer_height_ratio(0.37))
            .with_measurer(FixedMeasurer(Extent::new(63.3, 18.191_992)));
        view.resize_viewport(733.0).unwrap();

        for (sender, x) in [(1, 100.0), (2, 113.7), (3, 91.3), (4, 140.9)] {
            view.on_message(&say(sender, x)).unwrap();
            assert_eq!(find_overlap(view.registry()), None);
        }
        view.tick(view.tick_epoch());
        assert_eq!(find_overlap(view.registry()), None);
    }

    #[test]
    fn test_zero_height_measurement_is_rejected() {
        let mut view = ChatView::new(ROOM, ChatConfig::default())
            .with_measurer(FixedMeasurer(Extent::new(50.0, 0.0)));
        let err = view.on_message(&say(1, 10.0)).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_free_flow_arrivals_stack_upward() {
        let mut view = view(300.0, LayoutMode::FreeFlow);
        for sender in 1..=3 {
            view.on_message(&say(sender, 100.0)).unwrap();
        }
        assert_eq!(tops(&view), vec![280.0, 260.0, 240.0]);
        assert_eq!(find_overlap(view.registry()), None);
    }

    #[test]
    fn test_free_flow_apart_stay_on_bottom_row() {
        let mut view = view(300.0, LayoutMode::FreeFlow);
        view.on_message(&say(1, 100.0)).unwrap();
        view.on_message(&say(2, 400.0)).unwrap();
        assert_eq!(tops(&view), vec![280.0, 280.0]);
    }

    #[test]
    fn test_constrained_fourth_arrival_shifts_by_shortfall() {
        let mut view = view(50.0, LayoutMode::Constrained);
        for sender in 1..=3 {
            view.on_message(&say(sender, 100.0)).unwrap();
        }
        assert_eq!(tops(&view), vec![-10.0, 10.0, 30.0]);

        let placement = view.on_message(&say(4, 100.0)).unwrap();
        assert_eq!(placement.shifted, 20.0);
        assert_eq!(tops(&view), vec![-30.0, -10.0, 10.0, 30.0]);
        assert_eq!(view.registry().get(placement.id).unwrap().bottom(), 50.0);
        assert_eq!(find_overlap(view.registry()), None);
    }

    #[test]
    fn test_drag_moves_mounted_only() {
        let mut view = view(300.0, LayoutMode::FreeFlow);
        let a = view.on_message(&say(1, 100.0)).unwrap().id;
        let b = view.on_message(&say(2, 400.0)).unwrap().id;
        let c = view.on_message(&say(3, 700.0)).unwrap().id;
        view.mount(a, RenderHandle::detached(1));
        view.mount(c, RenderHandle::detached(3));
        let before = view.snapshot();

        let moved = view.on_drag(&RoomDrag {
            room_id: ROOM,
            offset_x: 30.0,
        });
        assert_eq!(moved, 2);

        let after = view.snapshot();
        for (old, new) in before.iter().zip(&after) {
            assert_eq!(new.top, old.top);
            let expected = if new.id == b { old.left } else { old.left + 30.0 };
            assert_eq!(new.left, expected);
        }
    }

    #[test]
    fn test_drag_of_other_room_is_ignored() {
        let mut view = view(300.0, LayoutMode::FreeFlow);
        let a = view.on_message(&say(1, 100.0)).unwrap().id;
        view.mount(a, RenderHandle::detached(1));

        let moved = view.on_drag(&RoomDrag {
            room_id: ROOM + 1,
            offset_x: 30.0,
        });
        assert_eq!(moved, 0);
        assert_eq!(view.registry().get(a).unwrap().left(), 75.0);
    }

    #[test]
    fn test_select_forwards_sender() {
        let mut view = view(300.0, LayoutMode::FreeFlow);
        let id = view.on_message(&say(42, 100.0)).unwrap().id;
        let before = view.snapshot();

        let request = view.select(id).unwrap();
        assert_eq!(request.sender_id, 42);
        assert_eq!(request.sender_name, "user42");
        assert_eq!(request.room_id, ROOM);
        assert_eq!(view.snapshot(), before);

        assert!(view.select(BubbleId(999)).is_none());
    }

    #[test]
    fn test_tick_lifts_and_evicts() {
        let mut view = view(30.0, LayoutMode::FreeFlow);
        let id = view.on_message(&say(1, 100.0)).unwrap().id;
        assert_eq!(view.registry().get(id).unwrap().top(), 10.0);

        let report = view.tick(view.tick_epoch()).unwrap();
        assert_eq!(report, TickReport { moved: 1, evicted: 0 });
        assert_eq!(view.registry().get(id).unwrap().top(), -5.0);

        // -5 -> -20 -> -35 -> -50 (<= -40)
        let mut evicted = 0;
        for _ in 0..3 {
            evicted += view.tick(view.tick_epoch()).unwrap().evicted;
        }
        assert_eq!(evicted, 1);
        assert!(view.registry().is_empty());
    }

    #[test]
    fn test_stale_tick_is_noop() {
        let mut view = view(300.0, LayoutMode::FreeFlow);
        let stale = view.tick_epoch();
        view.on_message(&say(1, 100.0)).unwrap();
        assert_ne!(view.tick_epoch(), stale);

        let before = view.snapshot();
        assert!(view.tick(stale).is_none());
        assert_eq!(view.snapshot(), before);
        assert_eq!(view.scheduler().ticks(), 0);
    }

    #[test]
    fn test_speed_change_rearms_without_moving() {
        let mut view = view(300.0, LayoutMode::FreeFlow);
        view.on_message(&say(1, 100.0)).unwrap();
        view.tick(view.tick_epoch()).unwrap();
        let before = view.snapshot();
        let epoch = view.tick_epoch();

        assert!(view.apply_settings(RoomChatSettings::new(
            LayoutMode::Constrained,
            ScrollSpeed::Fast,
            BubbleWidth::Thin,
        )));
        assert_ne!(view.tick_epoch(), epoch);
        assert_eq!(view.tick_period(), Duration::from_millis(3_000));
        assert_eq!(view.snapshot(), before);
    }

    #[test]
    fn test_guest_room_without_entry_is_ignored() {
        let mut view = ChatView::new(ROOM, ChatConfig::default());
        let chat = RoomChatSettings::new(LayoutMode::Constrained, ScrollSpeed::Slow, BubbleWidth::Wide);

        assert!(!view.on_guest_room(&GuestRoomInfo {
            room_enter: false,
            chat,
        }));
        assert!(!view.has_settings());

        assert!(view.on_guest_room(&GuestRoomInfo {
            room_enter: true,
            chat,
        }));
        assert_eq!(view.settings(), chat);
    }

    #[test]
    fn test_resize_viewport() {
        let mut view = ChatView::new(ROOM, ChatConfig::default().with_viewer_height_ratio(0.25));
        view.resize_viewport(800.0).unwrap();
        assert_eq!(view.container_height(), 200.0);
        assert!(view.set_container_height(f32::NAN).is_err());
        assert_eq!(view.container_height(), 200.0);
    }

    #[test]
    fn test_mount_after_eviction_releases() {
        let log = Arc::new(ReleaseLog::default());
        let mut view = view(300.0, LayoutMode::FreeFlow);
        assert!(!view.mount(BubbleId(5), RenderHandle::new(5, log.clone())));
        assert_eq!(log.released(), vec![5]);
    }

    #[test]
    fn test_clear_releases_every_handle() {
        let log = Arc::new(ReleaseLog::default());
        let mut view = view(300.0, LayoutMode::FreeFlow);
        for sender in 1..=3 {
            let id = view.on_message(&say(sender, sender as f32 * 200.0)).unwrap().id;
            view.mount(id, RenderHandle::new(id.0, log.clone()));
        }
        let epoch = view.tick_epoch();

        assert_eq!(view.clear(), 3);
        assert_eq!(log.released(), vec![1, 2, 3]);
        assert_ne!(view.tick_epoch(), epoch);
    }

    #[test]
    fn test_frames_count_up() {
        let mut view = view(300.0, LayoutMode::FreeFlow);
        view.on_message(&say(1, 100.0)).unwrap();
        let first = view.next_frame();
        let second = view.next_frame();
        assert_eq!(first.revision + 1, second.revision);
        assert_eq!(second.bubbles.len(), 1);
    }

    #[test]
    fn test_identical_runs_match() {
        let run = || {
            let mut view = view(120.0, LayoutMode::FreeFlow);
            for (i, x) in [100.0, 120.0, 90.0, 400.0, 110.0].iter().enumerate() {
                view.on_message(&say(i as i64, *x)).unwrap();
                if i % 2 == 1 {
                    view.tick(view.tick_epoch());
                }
            }
            view.snapshot()
                .into_iter()
                .map(|b| (b.id, b.left, b.top))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
