//! Async driver for a [`ChatView`].
//!
//! The runtime owns the view and a single tick deadline. It multiplexes the
//! inbound event stream against that deadline, applies each event or tick to
//! the view, then pushes a fresh frame to the surface. Whenever the view's
//! tick epoch moves the deadline is restarted from now, so there is never
//! more than one pending tick.
//!
//! ```rust,ignore
//! use bubble_core::{ChatConfig, ChatView, CollectingSurface, runtime};
//!
//! let surface = CollectingSurface::new();
//! let view = ChatView::new(room_id, ChatConfig::default());
//! let (handle, task) = runtime::spawn(view, surface.clone(), surface.clone());
//!
//! handle.send(ChatEvent::Message(message))?;
//! drop(handle);
//! let view = task.await?;
//! ```

use futures::stream::{self, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, instrument, trace};

use crate::bubble::{BubbleId, RenderHandle};
use crate::error::{Error, Result};
use crate::events::{ChatMessage, GuestRoomInfo, RoomChatSettings, RoomDrag};
use crate::surface::{ChatSurface, SelectionHandler};
use crate::view::ChatView;

/// Everything the outside world can tell a chat view.
#[derive(Debug)]
pub enum ChatEvent {
    /// A chat line arrived
    Message(ChatMessage),
    /// Room information on entry
    GuestRoom(GuestRoomInfo),
    /// Settings pushed while in the room
    Settings(RoomChatSettings),
    /// The room camera was dragged
    Drag(RoomDrag),
    /// The renderer attached a handle to a bubble
    Mounted { id: BubbleId, handle: RenderHandle },
    /// A bubble was clicked
    Clicked(BubbleId),
    /// The viewport changed height
    Resized { viewport_height: f32 },
    /// Drop every bubble (room left)
    Clear,
}

/// Runs a [`ChatView`] against an event stream and a wall-clock tick.
pub struct ChatRuntime<S, H> {
    view: ChatView,
    surface: S,
    selection: H,
}

impl<S, H> ChatRuntime<S, H>
where
    S: ChatSurface,
    H: SelectionHandler,
{
    pub fn new(view: ChatView, surface: S, selection: H) -> Self {
        Self {
            view,
            surface,
            selection,
        }
    }

    pub fn view(&self) -> &ChatView {
        &self.view
    }

    /// Apply one event. Returns whether the bubbles changed.
    pub fn handle(&mut self, event: ChatEvent) -> bool {
        match event {
            ChatEvent::Message(message) => match self.view.receive(&message) {
                Some(placement) => {
                    if let Some(bubble) = self.view.registry().get(placement.id) {
                        self.surface.make_room(&bubble.snapshot());
                    }
                    true
                }
                None => false,
            },
            ChatEvent::GuestRoom(info) => {
                self.view.on_guest_room(&info);
                false
            }
            ChatEvent::Settings(settings) => {
                self.view.apply_settings(settings);
                false
            }
            ChatEvent::Drag(drag) => self.view.on_drag(&drag) > 0,
            ChatEvent::Mounted { id, handle } => self.view.mount(id, handle),
            ChatEvent::Clicked(id) => {
                if let Some(request) = self.view.select(id) {
                    self.selection.select(&request);
                }
                false
            }
            ChatEvent::Resized { viewport_height } => {
                if let Err(err) = self.view.resize_viewport(viewport_height) {
                    debug!(error = %err, "resize ignored");
                }
                false
            }
            ChatEvent::Clear => self.view.clear() > 0,
        }
    }

    fn publish(&mut self) {
        let frame = self.view.next_frame();
        trace!(revision = frame.revision, bubbles = frame.bubbles.len(), "presenting frame");
        self.surface.present(&frame);
    }

    /// Drive the view until `events` ends, then hand it back.
    #[instrument(skip_all, fields(room = self.view.room_id()))]
    pub async fn run<E>(mut self, mut events: E) -> ChatView
    where
        E: Stream<Item = ChatEvent> + Unpin,
    {
        info!("chat runtime started");
        let mut armed = self.view.tick_epoch();
        let mut deadline = Instant::now() + self.view.tick_period();

        loop {
            tokio::select! {
                biased;

                event = events.next() => {
                    let Some(event) = event else {
                        break;
                    };
                    if self.handle(event) {
                        self.publish();
                    }
                }

                () = sleep_until(deadline) => {
                    if let Some(report) = self.view.tick(armed) {
                        if report.moved > 0 {
                            self.publish();
                        }
                    }
                    // rebase on now so a starved loop does not burst catch-up ticks
                    deadline = Instant::now() + self.view.tick_period();
                }
            }

            let epoch = self.view.tick_epoch();
            if epoch != armed {
                armed = epoch;
                deadline = Instant::now() + self.view.tick_period();
            }
        }

        info!(bubbles = self.view.registry().len(), "chat runtime stopped");
        self.view
    }
}

/// Sending half of a spawned runtime's event channel.
#[derive(Debug, Clone)]
pub struct ChatHandle {
    tx: mpsc::UnboundedSender<ChatEvent>,
}

impl ChatHandle {
    /// Queue an event. Fails once the runtime has stopped.
    pub fn send(&self, event: ChatEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| Error::ChannelClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Build an event channel for a runtime.
pub fn channel() -> (ChatHandle, mpsc::UnboundedReceiver<ChatEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChatHandle { tx }, rx)
}

/// Spawn a runtime on the current tokio runtime.
///
/// The task ends, returning the view, once every [`ChatHandle`] is dropped.
pub fn spawn<S, H>(view: ChatView, surface: S, selection: H) -> (ChatHandle, JoinHandle<ChatView>)
where
    S: ChatSurface + 'static,
    H: SelectionHandler + 'static,
{
    let (handle, mut rx) = channel();
    let events = stream::poll_fn(move |cx| rx.poll_recv(cx));
    let runtime = ChatRuntime::new(view, surface, selection);
    let task = tokio::spawn(runtime.run(events));
    (handle, task)
}
