//! Named events emitted by the pane and their listener slots.
//!
//! Every event kind has two independent slots: one for a handler that takes
//! the event payload and one for a no-argument handler. Either, both or
//! neither may be set; firing calls whichever are present. Handlers run on
//! the interface thread and are invoked without any pane lock held, so they
//! may call back into the pane.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use vellum_types::input::{Modifiers, MouseButton};

// ---------------------------------------------------------------------------
// Identity and kinds
// ---------------------------------------------------------------------------

static NEXT_PANE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a pane; the `source` of its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(u64);

impl PaneId {
    pub(crate) fn next() -> Self {
        PaneId(NEXT_PANE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BrowserPane#{}", self.0)
    }
}

/// Event names understood by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    LinkClick,
    TextChange,
    MousePress,
    MouseRelease,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::LinkClick => "linkclick",
            EventKind::TextChange => "textchange",
            EventKind::MousePress => "mousepress",
            EventKind::MouseRelease => "mouserelease",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linkclick" => Some(EventKind::LinkClick),
            "textchange" => Some(EventKind::TextChange),
            "mousepress" => Some(EventKind::MousePress),
            "mouserelease" => Some(EventKind::MouseRelease),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// A confirmed hyperlink activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEvent {
    pub button: MouseButton,
    pub x: i32,
    pub y: i32,
    pub modifiers: Modifiers,
    /// The activated anchor's href.
    pub request_url: String,
    pub action_command: String,
    pub source: PaneId,
}

/// The document content was replaced or cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChangeEvent {
    pub source: PaneId,
}

/// A pointer press or release received by the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseEvent {
    /// `MousePress` or `MouseRelease`.
    pub kind: EventKind,
    pub button: MouseButton,
    pub x: i32,
    pub y: i32,
    pub modifiers: Modifiers,
    pub source: PaneId,
}

// ---------------------------------------------------------------------------
// Listener slots
// ---------------------------------------------------------------------------

/// Handler receiving the event payload.
pub type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Handler taking no arguments.
pub type VoidHandler = Arc<dyn Fn() + Send + Sync>;

/// The pair of handler slots for one event kind.
pub struct ListenerSlot<E> {
    with_event: Option<Handler<E>>,
    without_event: Option<VoidHandler>,
}

impl<E> Default for ListenerSlot<E> {
    fn default() -> Self {
        Self {
            with_event: None,
            without_event: None,
        }
    }
}

impl<E> ListenerSlot<E> {
    pub fn set(&mut self, handler: Handler<E>) {
        self.with_event = Some(handler);
    }

    pub fn set_void(&mut self, handler: VoidHandler) {
        self.without_event = Some(handler);
    }

    /// Clear both slots.
    pub fn clear(&mut self) {
        self.with_event = None;
        self.without_event = None;
    }

    pub fn is_set(&self) -> bool {
        self.with_event.is_some() || self.without_event.is_some()
    }
}

fn fire<E>(slot: &RwLock<ListenerSlot<E>>, event: &E) -> bool {
    // Clone the handlers out so none of them run under the lock.
    let (with_event, without_event) = {
        let slot = slot.read();
        (slot.with_event.clone(), slot.without_event.clone())
    };
    let fired = with_event.is_some() || without_event.is_some();
    if let Some(handler) = with_event {
        handler(event);
    }
    if let Some(handler) = without_event {
        handler();
    }
    fired
}

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

/// Listener registry for one pane.
#[derive(Default)]
pub struct EventDispatcher {
    link: RwLock<ListenerSlot<LinkEvent>>,
    text_change: RwLock<ListenerSlot<TextChangeEvent>>,
    mouse: RwLock<ListenerSlot<MouseEvent>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any listener is registered for `kind`.
    pub fn is_accepting(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::LinkClick => self.link.read().is_set(),
            EventKind::TextChange => self.text_change.read().is_set(),
            EventKind::MousePress | EventKind::MouseRelease => self.mouse.read().is_set(),
        }
    }

    pub fn link(&self) -> &RwLock<ListenerSlot<LinkEvent>> {
        &self.link
    }

    pub fn text_change(&self) -> &RwLock<ListenerSlot<TextChangeEvent>> {
        &self.text_change
    }

    /// The mouse slot serves both `mousepress` and `mouserelease`.
    pub fn mouse(&self) -> &RwLock<ListenerSlot<MouseEvent>> {
        &self.mouse
    }

    /// Fire a link event. Returns whether any handler ran.
    pub fn fire_link(&self, event: &LinkEvent) -> bool {
        log::debug!("{}: linkclick {}", event.source, event.request_url);
        fire(&self.link, event)
    }

    pub fn fire_text_change(&self, event: &TextChangeEvent) -> bool {
        fire(&self.text_change, event)
    }

    pub fn fire_mouse(&self, event: &MouseEvent) -> bool {
        fire(&self.mouse, event)
    }
}
