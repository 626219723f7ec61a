//! The rendering widget behind a pane.
//!
//! `TextBrowser` holds the document and everything derived from it:
//! cursor, layout, scroll bar and click tracker. The host and the pane both
//! talk to it through a cloneable [`BrowserWidget`] handle, which also owns
//! the resource loader. The handle never holds the widget lock while it
//! fetches a resource or dispatches an event, so fetchers and listeners are
//! free to read the widget or call back into the pane.
//!
//! Only the crate mutates the widget, always from the interface thread. The
//! host gets queries and the input entry points.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use url::Url;

use vellum_types::input::{InputEvent, PointerEvent};

use crate::click::{ClickAnchorTracker, ReleaseAction};
use crate::config::PaneConfig;
use crate::cursor::{MoveMode, MoveOperation, TextCursor};
use crate::document::{TextDocument, TextFormat};
use crate::events::{EventKind, LinkEvent, MouseEvent, TextChangeEvent};
use crate::layout::TextLayout;
use crate::pane::PaneShared;
use crate::resource::{Resource, ResourceFetcher, ResourceKind};
use crate::scroll::ScrollState;

/// Line wrapping behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    NoWrap,
    /// Wrap at the viewport width.
    #[default]
    WidgetWidth,
}

/// Resolve `reference` against `base`. Without a base, anything that is
/// not an absolute URL is taken as a local path.
pub fn resolve_url(base: Option<&Url>, reference: &str) -> Option<Url> {
    match Url::parse(reference) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base.join(reference).ok(),
            None => std::path::absolute(reference)
                .ok()
                .and_then(|path| Url::from_file_path(path).ok()),
        },
        Err(e) => {
            log::debug!("cannot resolve {reference:?}: {e}");
            None
        },
    }
}

// ---------------------------------------------------------------------------
// TextBrowser
// ---------------------------------------------------------------------------

/// Widget state. Only the interface thread writes it.
pub(crate) struct TextBrowser {
    document: TextDocument,
    cursor: TextCursor,
    layout: TextLayout,
    scroll: ScrollState,
    read_only: bool,
    wrap: WrapMode,
    viewport_width: i32,
    glyph_width: i32,
    line_height: i32,
    source: Option<Url>,
    tracker: ClickAnchorTracker,
    /// A primary-button drag is in progress.
    dragging: bool,
    visible: bool,
    pane: Weak<PaneShared>,
}

impl TextBrowser {
    fn new(config: &PaneConfig) -> Self {
        let document = TextDocument::new();
        let wrap = if config.line_wrap {
            WrapMode::WidgetWidth
        } else {
            WrapMode::NoWrap
        };
        let mut browser = Self {
            layout: TextLayout::new(&document, None, config.glyph_width, config.line_height),
            document,
            cursor: TextCursor::new(),
            scroll: ScrollState::new(config.viewport_height),
            read_only: !config.editable,
            wrap,
            viewport_width: config.viewport_width,
            glyph_width: config.glyph_width.max(1),
            line_height: config.line_height.max(1),
            source: None,
            tracker: ClickAnchorTracker::new(),
            dragging: false,
            visible: false,
            pane: Weak::new(),
        };
        browser.relayout();
        browser
    }

    fn wrap_columns(&self) -> Option<usize> {
        match self.wrap {
            WrapMode::NoWrap => None,
            WrapMode::WidgetWidth => Some(
                usize::try_from(self.viewport_width / self.glyph_width)
                    .unwrap_or(0)
                    .max(1),
            ),
        }
    }

    fn relayout(&mut self) {
        self.layout = TextLayout::new(
            &self.document,
            self.wrap_columns(),
            self.glyph_width,
            self.line_height,
        );
        self.scroll.set_content_height(self.layout.content_height());
    }

    fn replace_document(&mut self, document: TextDocument) {
        self.document = document;
        self.cursor = TextCursor::new();
        self.tracker.reset();
        self.dragging = false;
        self.scroll.reset();
        self.relayout();
    }

    fn ensure_cursor_visible(&mut self) {
        let top = self.layout.offset_top(self.cursor.position());
        self.scroll.ensure_visible(top, self.line_height);
    }

    fn move_cursor(&mut self, op: MoveOperation, mode: MoveMode, n: usize) {
        self.cursor.move_position(op, mode, n, self.document.len());
    }

    /// Anchor under the viewport point `(x, y)`.
    fn anchor_at(&self, x: i32, y: i32) -> Option<String> {
        let offset = self
            .layout
            .offset_at(x, y.saturating_add(self.scroll.scroll_y))?;
        self.document.anchor_at(offset).map(str::to_string)
    }

    fn cursor_at(&self, x: i32, y: i32) -> usize {
        self.layout
            .cursor_at(x, y.saturating_add(self.scroll.scroll_y))
    }

    /// Default press: place the cursor and start a selection drag.
    fn default_press(&mut self, ev: &PointerEvent) {
        if !ev.button.is_primary() {
            return;
        }
        let mode = if ev.modifiers.shift {
            MoveMode::KeepAnchor
        } else {
            MoveMode::MoveAnchor
        };
        let pos = self.cursor_at(ev.x, ev.y);
        self.cursor.set_position(pos, mode, self.document.len());
        self.dragging = true;
    }

    /// Default release: finish the drag at the release point.
    fn default_release(&mut self, ev: &PointerEvent) {
        if ev.button.is_primary() && self.dragging {
            let pos = self.cursor_at(ev.x, ev.y);
            self.cursor
                .set_position(pos, MoveMode::KeepAnchor, self.document.len());
        }
        self.dragging = false;
    }

    fn listening(pane: Option<&Arc<PaneShared>>) -> bool {
        pane.is_some_and(|p| p.dispatcher.is_accepting(EventKind::LinkClick))
    }
}

/// Fetch every image `document` references, resolving relative sources
/// against `base`. Failures leave the image unloaded.
fn load_images(loader: &dyn ResourceFetcher, base: Option<&Url>, document: &mut TextDocument) {
    for image in document.images_mut() {
        let Some(url) = resolve_url(base, &image.src) else {
            continue;
        };
        match loader.fetch(ResourceKind::Image, &url) {
            Ok(Resource::Image(decoded)) => image.image = Some(decoded),
            Ok(_) => log::debug!("{} is not an image", image.src),
            Err(e) => log::debug!("image {} unavailable: {e}", image.src),
        }
    }
}

// ---------------------------------------------------------------------------
// BrowserWidget handle
// ---------------------------------------------------------------------------

/// Shared handle to the widget state.
///
/// Host entry points (`pointer_press`, `pointer_release`, `handle_input`,
/// `resize`) are called on the interface thread. Content and cursor changes
/// go through the owning [`BrowserPane`](crate::BrowserPane), which
/// marshals them there.
///
/// ```compile_fail
/// fn write_directly(widget: &vellum_pane::BrowserWidget) {
///     widget.set_text("bypassing the pane", "text/plain");
/// }
/// ```
#[derive(Clone)]
pub struct BrowserWidget {
    inner: Arc<Mutex<TextBrowser>>,
    loader: Arc<dyn ResourceFetcher>,
}

impl BrowserWidget {
    /// A detached widget fetching resources through `loader`.
    pub(crate) fn with_loader(config: &PaneConfig, loader: Box<dyn ResourceFetcher>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TextBrowser::new(config))),
            loader: Arc::from(loader),
        }
    }

    pub(crate) fn attach(&self, pane: Weak<PaneShared>) {
        self.inner.lock().pane = pane;
    }

    /// Drop the back-reference to the owning pane. Later pointer events
    /// get default handling only.
    pub(crate) fn detach(&self) {
        let mut browser = self.inner.lock();
        browser.pane = Weak::new();
        browser.tracker.reset();
    }

    /// Whether a live pane owns this widget.
    pub fn is_attached(&self) -> bool {
        self.inner.lock().pane.strong_count() > 0
    }

    fn pane(&self) -> Option<Arc<PaneShared>> {
        self.inner.lock().pane.upgrade()
    }

    fn notify_text_change(&self) {
        if let Some(pane) = self.pane() {
            pane.dispatcher
                .fire_text_change(&TextChangeEvent { source: pane.id });
        }
    }

    // -- content ------------------------------------------------------------

    /// Build a document from `text` and fetch its images, all without the
    /// widget lock.
    fn prepare(&self, text: &str, content_type: &str, base: Option<&Url>) -> TextDocument {
        let format = TextFormat::for_content(content_type, text);
        let mut document = TextDocument::from_text(text, format);
        load_images(self.loader.as_ref(), base, &mut document);
        document
    }

    /// Replace the content, interpreting `text` according to
    /// `content_type`.
    pub(crate) fn set_text(&self, text: &str, content_type: &str) {
        let base = self.source();
        let document = self.prepare(text, content_type, base.as_ref());
        self.inner.lock().replace_document(document);
        self.notify_text_change();
    }

    pub(crate) fn clear(&self) {
        self.inner.lock().replace_document(TextDocument::new());
        self.notify_text_change();
    }

    /// Navigate to `reference`, resolved against the current source.
    /// Returns whether the new content was loaded; on failure the content
    /// is left alone.
    pub(crate) fn set_source(&self, reference: &str) -> bool {
        let Some(url) = resolve_url(self.source().as_ref(), reference) else {
            log::warn!("navigation to {reference:?} failed: not a valid URL or path");
            return false;
        };
        let (text, content_type) = match self.loader.fetch(ResourceKind::Markup, &url) {
            Ok(Resource::Markup { text, content_type }) => (text, content_type),
            Ok(Resource::Image(_)) => {
                log::warn!("navigation to {url} failed: resource is an image");
                return false;
            },
            Err(e) => {
                log::warn!("navigation to {url} failed: {e}");
                return false;
            },
        };
        log::info!("loaded {url} ({content_type})");
        let document = self.prepare(&text, &content_type, Some(&url));
        {
            let mut b = self.inner.lock();
            b.source = Some(url);
            b.replace_document(document);
        }
        self.notify_text_change();
        true
    }

    pub fn source(&self) -> Option<Url> {
        self.inner.lock().source.clone()
    }

    pub fn to_markup(&self) -> String {
        self.inner.lock().document.to_markup()
    }

    pub fn to_plain_text(&self) -> String {
        self.inner.lock().document.to_plain_text()
    }

    pub fn title(&self) -> Option<String> {
        self.inner.lock().document.title().map(str::to_string)
    }

    /// A copy of the current document.
    pub fn document(&self) -> TextDocument {
        self.inner.lock().document.clone()
    }

    pub fn document_len(&self) -> usize {
        self.inner.lock().document.len()
    }

    // -- cursor and selection -----------------------------------------------

    pub fn cursor(&self) -> TextCursor {
        self.inner.lock().cursor
    }

    pub(crate) fn clear_selection(&self) {
        self.inner.lock().cursor.clear_selection();
    }

    pub(crate) fn select_all(&self) {
        let mut b = self.inner.lock();
        let len = b.document.len();
        b.cursor.select_all(len);
    }

    /// Select `length` positions from `start`, clamped to the document.
    pub(crate) fn select(&self, start: usize, length: usize) {
        let mut b = self.inner.lock();
        let len = b.document.len();
        b.cursor.set_position(start, MoveMode::MoveAnchor, len);
        b.cursor
            .move_position(MoveOperation::Right, MoveMode::KeepAnchor, length, len);
    }

    pub(crate) fn set_cursor_position(&self, index: usize, keep_anchor: bool) {
        let mut b = self.inner.lock();
        let mode = if keep_anchor {
            MoveMode::KeepAnchor
        } else {
            MoveMode::MoveAnchor
        };
        let len = b.document.len();
        b.cursor.set_position(index, mode, len);
        b.ensure_cursor_visible();
    }

    pub(crate) fn move_cursor_to_start(&self) {
        let mut b = self.inner.lock();
        b.move_cursor(MoveOperation::Start, MoveMode::MoveAnchor, 1);
        b.ensure_cursor_visible();
    }

    pub(crate) fn move_cursor_to_end(&self) {
        let mut b = self.inner.lock();
        b.move_cursor(MoveOperation::End, MoveMode::MoveAnchor, 1);
        b.ensure_cursor_visible();
    }

    /// Text of the current selection, "" when nothing is selected.
    pub fn selected_text(&self) -> String {
        let b = self.inner.lock();
        if !b.cursor.has_selection() {
            return String::new();
        }
        b.document
            .slice(b.cursor.selection_start(), b.cursor.selection_end())
    }

    // -- scrolling ----------------------------------------------------------

    pub(crate) fn scroll_to_top(&self) {
        self.inner.lock().scroll.scroll_to_top();
    }

    pub(crate) fn scroll_to_bottom(&self) {
        self.inner.lock().scroll.scroll_to_bottom();
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.inner.lock().scroll.clone()
    }

    // -- flags --------------------------------------------------------------

    pub fn is_read_only(&self) -> bool {
        self.inner.lock().read_only
    }

    pub(crate) fn set_read_only(&self, read_only: bool) {
        self.inner.lock().read_only = read_only;
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.inner.lock().wrap
    }

    pub(crate) fn set_wrap_mode(&self, wrap: WrapMode) {
        let mut b = self.inner.lock();
        if b.wrap != wrap {
            b.wrap = wrap;
            b.relayout();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.inner.lock().visible
    }

    pub(crate) fn set_visible(&self, visible: bool) {
        self.inner.lock().visible = visible;
    }

    // -- host input ---------------------------------------------------------

    /// The anchor under viewport point `(x, y)`.
    pub fn anchor_at(&self, x: i32, y: i32) -> Option<String> {
        self.inner.lock().anchor_at(x, y)
    }

    /// Resize the viewport and re-wrap.
    pub fn resize(&self, width: u32, height: u32) {
        let mut b = self.inner.lock();
        b.viewport_width = i32::try_from(width).unwrap_or(i32::MAX);
        b.scroll
            .set_viewport_height(i32::try_from(height).unwrap_or(i32::MAX));
        b.relayout();
    }

    /// A pointer button went down. Default press handling always runs;
    /// a primary press over an anchor then arms link tracking.
    pub fn pointer_press(&self, ev: PointerEvent) {
        let pane = {
            let mut b = self.inner.lock();
            b.default_press(&ev);
            let pane = b.pane.upgrade();
            let listening = TextBrowser::listening(pane.as_ref());
            let anchor = b.anchor_at(ev.x, ev.y);
            b.tracker.press(ev.button, listening, anchor.as_deref());
            pane
        };
        if let Some(pane) = pane {
            pane.dispatcher
                .fire_mouse(&mouse_event(EventKind::MousePress, &ev, &pane));
        }
    }

    /// A pointer button came up. Returns `true` when the release completed
    /// a link click, in which case default release handling was skipped.
    pub fn pointer_release(&self, ev: PointerEvent) -> bool {
        let (pane, action) = {
            let mut b = self.inner.lock();
            let pane = b.pane.upgrade();
            let listening = TextBrowser::listening(pane.as_ref());
            let anchor = b.anchor_at(ev.x, ev.y);
            let action = b.tracker.release(ev.button, listening, anchor.as_deref());
            match action {
                ReleaseAction::Activate(_) => b.dragging = false,
                ReleaseAction::Default => b.default_release(&ev),
            }
            (pane, action)
        };

        let Some(pane) = pane else {
            return false;
        };
        let activated = match action {
            ReleaseAction::Activate(request_url) => {
                let event = LinkEvent {
                    button: ev.button,
                    x: ev.x,
                    y: ev.y,
                    modifiers: ev.modifiers,
                    request_url,
                    action_command: pane.action_command.read().clone(),
                    source: pane.id,
                };
                pane.dispatcher.fire_link(&event);
                true
            },
            ReleaseAction::Default => false,
        };
        pane.dispatcher
            .fire_mouse(&mouse_event(EventKind::MouseRelease, &ev, &pane));
        activated
    }

    /// Handle a host input event. Returns `true` if it was consumed.
    pub fn handle_input(&self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerPress(ev) => {
                self.pointer_press(*ev);
                true
            },
            InputEvent::PointerRelease(ev) => {
                self.pointer_release(*ev);
                true
            },
            InputEvent::Wheel { delta } => {
                self.inner.lock().scroll.wheel_scroll(*delta);
                true
            },
            InputEvent::Resize { width, height } => {
                self.resize(*width, *height);
                true
            },
        }
    }
}

impl std::fmt::Debug for BrowserWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = self.inner.lock();
        f.debug_struct("BrowserWidget")
            .field("len", &b.document.len())
            .field("cursor", &b.cursor)
            .field("source", &b.source.as_ref().map(Url::as_str))
            .field("attached", &(b.pane.strong_count() > 0))
            .finish_non_exhaustive()
    }
}

fn mouse_event(kind: EventKind, ev: &PointerEvent, pane: &PaneShared) -> MouseEvent {
    MouseEvent {
        kind,
        button: ev.button,
        x: ev.x,
        y: ev.y,
        modifiers: ev.modifiers,
        source: pane.id,
    }
}
