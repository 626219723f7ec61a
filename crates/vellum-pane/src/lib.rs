//! Embeddable rich-text browser pane.
//!
//! A [`BrowserPane`] displays markup or plain text in a [`BrowserWidget`]
//! that belongs to a single interface thread. Callers on any thread mutate
//! it through a [`Marshaller`], which runs the change inline on the
//! interface thread or queues it for that thread's [`EventLoop`]. Pointer
//! presses and releases from the host are turned into `linkclick` events
//! when both land on the same hyperlink, and inline base64 `data:` images
//! are decoded in place of the default fetch.

pub mod click;
pub mod config;
pub mod content_type;
pub mod cursor;
pub mod document;
pub mod events;
pub mod layout;
pub mod markup;
pub mod marshal;
pub mod pane;
pub mod resource;
pub mod scroll;
pub mod widget;

#[cfg(test)]
pub(crate) mod test_utils;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use click::{ClickAnchorTracker, ClickState, ReleaseAction};
pub use config::PaneConfig;
pub use document::{TextDocument, TextFormat};
pub use events::{EventKind, LinkEvent, MouseEvent, PaneId, TextChangeEvent};
pub use marshal::{EventLoop, Marshaller};
pub use pane::{BrowserPane, PageMetadata};
pub use resource::{
    DataImageDecoder, DecodedImage, FileFetcher, ImageLimits, Resource, ResourceFetcher,
    ResourceKind,
};
pub use scroll::ScrollState;
pub use widget::{BrowserWidget, WrapMode};
