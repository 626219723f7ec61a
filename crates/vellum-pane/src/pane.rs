//! The public browser pane.
//!
//! A [`BrowserPane`] can be used from any thread. Mutations are marshaled
//! to the interface thread and return immediately; queries read the widget
//! directly from the calling thread. A foreign thread that needs to see its
//! own writes calls [`BrowserPane::flush`] first.
//!
//! UI-facing operations never return errors. Negative indices are caller
//! bugs and panic; a file that cannot be opened or a page that cannot be
//! fetched is logged and otherwise ignored.

use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use vellum_types::error::Result;

use crate::config::PaneConfig;
use crate::content_type::{self, DEFAULT_CONTENT_TYPE};
use crate::events::{
    EventDispatcher, EventKind, Handler, LinkEvent, MouseEvent, PaneId, TextChangeEvent,
    VoidHandler,
};
use crate::marshal::Marshaller;
use crate::resource::{DataImageDecoder, FileFetcher, ResourceFetcher};
use crate::widget::{BrowserWidget, WrapMode};

/// Where the current content came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    /// Last load source, URL or filesystem path.
    pub page_url: String,
    pub content_type: String,
}

impl Default for PageMetadata {
    fn default() -> Self {
        Self {
            page_url: String::new(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }
}

/// State shared between a pane and its widget's back-reference.
pub(crate) struct PaneShared {
    pub(crate) id: PaneId,
    pub(crate) dispatcher: EventDispatcher,
    pub(crate) action_command: RwLock<String>,
    metadata: RwLock<PageMetadata>,
}

/// Panic unless `value` is non-negative; returns it as an offset.
fn require_non_negative(value: i32, operation: &str, name: &str) -> usize {
    match usize::try_from(value) {
        Ok(v) => v,
        Err(_) => panic!("BrowserPane::{operation}: {name} must be non-negative, was {value}"),
    }
}

fn to_offset(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// BrowserPane
// ---------------------------------------------------------------------------

/// An embeddable, thread-safe rich-text browser pane.
pub struct BrowserPane {
    shared: Arc<PaneShared>,
    widget: BrowserWidget,
    marshal: Marshaller,
}

impl BrowserPane {
    /// Create a pane whose widget lives on `marshal`'s interface thread.
    /// The pane starts invisible.
    pub fn new(marshal: &Marshaller, config: PaneConfig) -> Self {
        let limits = config.image_limits();
        let loader = DataImageDecoder::new(FileFetcher::new(limits), limits);
        Self::build(marshal, config, Box::new(loader))
    }

    /// Create a pane and, when `url` is non-empty, start loading it.
    pub fn with_url(marshal: &Marshaller, config: PaneConfig, url: &str) -> Self {
        let pane = Self::new(marshal, config);
        if !url.is_empty() {
            pane.read_text_from_url(url);
        }
        pane
    }

    /// Create a pane that fetches non-inline resources through `fetcher`.
    /// Inline `data:` images are still decoded by the pane itself.
    pub fn with_fetcher<F>(marshal: &Marshaller, config: PaneConfig, fetcher: F) -> Self
    where
        F: ResourceFetcher + 'static,
    {
        let loader = DataImageDecoder::new(fetcher, config.image_limits());
        Self::build(marshal, config, Box::new(loader))
    }

    fn build(marshal: &Marshaller, config: PaneConfig, loader: Box<dyn ResourceFetcher>) -> Self {
        if let Err(e) = config.validate() {
            log::warn!("{e}; falling back to safe metrics");
        }
        let shared = Arc::new(PaneShared {
            id: PaneId::next(),
            dispatcher: EventDispatcher::new(),
            action_command: RwLock::new(config.action_command.clone()),
            metadata: RwLock::new(PageMetadata::default()),
        });
        let widget = BrowserWidget::with_loader(&config, loader);
        widget.attach(Arc::downgrade(&shared));
        log::debug!("{} created", shared.id);
        Self {
            shared,
            widget,
            marshal: marshal.clone(),
        }
    }

    /// Run `op` against the widget on the interface thread.
    fn on_widget<F>(&self, op: F)
    where
        F: FnOnce(&BrowserWidget) + Send + 'static,
    {
        let widget = self.widget.clone();
        self.marshal.submit(move || op(&widget));
    }

    /// Wait until every mutation submitted so far has been applied.
    pub fn flush(&self) -> Result<()> {
        self.marshal.submit_and_wait(|| ())
    }

    // -- identity -----------------------------------------------------------

    pub fn id(&self) -> PaneId {
        self.shared.id
    }

    pub fn type_name(&self) -> &'static str {
        "BrowserPane"
    }

    /// The host-facing widget handle.
    pub fn widget(&self) -> &BrowserWidget {
        &self.widget
    }

    pub fn is_visible(&self) -> bool {
        self.widget.is_visible()
    }

    pub fn set_visible(&self, visible: bool) {
        self.on_widget(move |w| w.set_visible(visible));
    }

    pub fn action_command(&self) -> String {
        self.shared.action_command.read().clone()
    }

    pub fn set_action_command(&self, command: &str) {
        *self.shared.action_command.write() = command.to_string();
    }

    // -- metadata -----------------------------------------------------------

    pub fn content_type(&self) -> String {
        self.shared.metadata.read().content_type.clone()
    }

    /// Set the content type used to interpret later `set_text` calls.
    pub fn set_content_type(&self, content_type: &str) {
        self.shared.metadata.write().content_type = content_type.to_string();
    }

    pub fn page_url(&self) -> String {
        self.shared.metadata.read().page_url.clone()
    }

    pub fn metadata(&self) -> PageMetadata {
        self.shared.metadata.read().clone()
    }

    // -- text ---------------------------------------------------------------

    /// The document serialized as markup.
    pub fn text(&self) -> String {
        self.widget.to_markup()
    }

    /// Document text without markup.
    pub fn plain_text(&self) -> String {
        self.widget.to_plain_text()
    }

    /// The `<title>` of the current page, if it had one.
    pub fn title(&self) -> Option<String> {
        self.widget.title()
    }

    /// Replace the content, interpreted according to the current content
    /// type.
    pub fn set_text(&self, text: &str) {
        let text = text.to_string();
        let content_type = self.content_type();
        self.on_widget(move |w| w.set_text(&text, &content_type));
    }

    pub fn clear_text(&self) {
        self.on_widget(BrowserWidget::clear);
    }

    /// Load a local file. If it cannot be opened nothing changes, not even
    /// the metadata.
    pub fn read_text_from_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!("{}: cannot open {}: {e}", self.shared.id, path.display());
                return;
            },
        };
        {
            let mut meta = self.shared.metadata.write();
            meta.page_url = path.display().to_string();
            meta.content_type = content_type::resolve_path(path).to_string();
        }
        log::info!("{}: reading {}", self.shared.id, path.display());
        self.read_text_from_reader(file);
    }

    /// Read `reader` to the end and display what it held. Invalid UTF-8 is
    /// replaced; a read error keeps whatever was read before it.
    pub fn read_text_from_reader<R: Read>(&self, mut reader: R) {
        let mut bytes = Vec::new();
        if let Err(e) = reader.read_to_end(&mut bytes) {
            log::debug!("{}: read stopped early: {e}", self.shared.id);
        }
        self.set_text(&String::from_utf8_lossy(&bytes));
    }

    /// Record `url` as the page URL and navigate the widget to it. A failed
    /// fetch is logged and leaves the content as it was.
    pub fn read_text_from_url(&self, url: &str) {
        self.shared.metadata.write().page_url = url.to_string();
        let url = url.to_string();
        self.on_widget(move |w| {
            w.set_source(&url);
        });
    }

    // -- selection and cursor -------------------------------------------------

    pub fn clear_selection(&self) {
        self.on_widget(BrowserWidget::clear_selection);
    }

    pub fn select_all(&self) {
        self.on_widget(BrowserWidget::select_all);
    }

    /// Select `length` positions starting at `start`.
    ///
    /// # Panics
    ///
    /// If `start` or `length` is negative.
    pub fn select(&self, start: i32, length: i32) {
        let start = require_non_negative(start, "select", "start");
        let length = require_non_negative(length, "select", "length");
        self.on_widget(move |w| w.select(start, length));
    }

    /// Move the cursor to `index`, extending the selection when
    /// `keep_anchor` is set, and scroll it into view.
    ///
    /// # Panics
    ///
    /// If `index` is negative.
    pub fn set_cursor_position(&self, index: i32, keep_anchor: bool) {
        let index = require_non_negative(index, "set_cursor_position", "index");
        self.on_widget(move |w| w.set_cursor_position(index, keep_anchor));
    }

    pub fn move_cursor_to_start(&self) {
        self.on_widget(BrowserWidget::move_cursor_to_start);
    }

    pub fn move_cursor_to_end(&self) {
        self.on_widget(BrowserWidget::move_cursor_to_end);
    }

    pub fn cursor_position(&self) -> i32 {
        to_offset(self.widget.cursor().position())
    }

    /// Start of the selection, or -1 when nothing is selected.
    pub fn selection_start(&self) -> i32 {
        let cursor = self.widget.cursor();
        if cursor.has_selection() {
            to_offset(cursor.selection_start())
        } else {
            -1
        }
    }

    /// End of the selection, or -1 when nothing is selected.
    pub fn selection_end(&self) -> i32 {
        let cursor = self.widget.cursor();
        if cursor.has_selection() {
            to_offset(cursor.selection_end())
        } else {
            -1
        }
    }

    pub fn selection_length(&self) -> i32 {
        let cursor = self.widget.cursor();
        to_offset(cursor.selection_end() - cursor.selection_start())
    }

    /// The selected text, "" when nothing is selected.
    ///
    /// Selection offsets are positions in the displayed document, so the
    /// text is cut from the plain rendering, not from the markup that
    /// [`text`](Self::text) returns.
    pub fn selected_text(&self) -> String {
        self.widget.selected_text()
    }

    // -- scrolling and flags --------------------------------------------------

    pub fn scroll_to_top(&self) {
        self.on_widget(BrowserWidget::scroll_to_top);
    }

    pub fn scroll_to_bottom(&self) {
        self.on_widget(BrowserWidget::scroll_to_bottom);
    }

    pub fn is_editable(&self) -> bool {
        !self.widget.is_read_only()
    }

    pub fn set_editable(&self, editable: bool) {
        self.on_widget(move |w| w.set_read_only(!editable));
    }

    pub fn is_line_wrap(&self) -> bool {
        self.widget.wrap_mode() != WrapMode::NoWrap
    }

    pub fn set_line_wrap(&self, wrap: bool) {
        let mode = if wrap {
            WrapMode::WidgetWidth
        } else {
            WrapMode::NoWrap
        };
        self.on_widget(move |w| w.set_wrap_mode(mode));
    }

    // -- listeners ------------------------------------------------------------

    pub fn set_link_listener<F>(&self, handler: F)
    where
        F: Fn(&LinkEvent) + Send + Sync + 'static,
    {
        let handler: Handler<LinkEvent> = Arc::new(handler);
        self.shared.dispatcher.link().write().set(handler);
    }

    pub fn set_link_listener_void<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let handler: VoidHandler = Arc::new(handler);
        self.shared.dispatcher.link().write().set_void(handler);
    }

    pub fn remove_link_listener(&self) {
        self.shared.dispatcher.link().write().clear();
    }

    pub fn set_text_change_listener<F>(&self, handler: F)
    where
        F: Fn(&TextChangeEvent) + Send + Sync + 'static,
    {
        let handler: Handler<TextChangeEvent> = Arc::new(handler);
        self.shared.dispatcher.text_change().write().set(handler);
    }

    pub fn set_text_change_listener_void<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let handler: VoidHandler = Arc::new(handler);
        self.shared.dispatcher.text_change().write().set_void(handler);
    }

    pub fn remove_text_change_listener(&self) {
        self.shared.dispatcher.text_change().write().clear();
    }

    /// Listen for both `mousepress` and `mouserelease`.
    pub fn set_mouse_listener<F>(&self, handler: F)
    where
        F: Fn(&MouseEvent) + Send + Sync + 'static,
    {
        let handler: Handler<MouseEvent> = Arc::new(handler);
        self.shared.dispatcher.mouse().write().set(handler);
    }

    pub fn set_mouse_listener_void<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let handler: VoidHandler = Arc::new(handler);
        self.shared.dispatcher.mouse().write().set_void(handler);
    }

    pub fn remove_mouse_listener(&self) {
        self.shared.dispatcher.mouse().write().clear();
    }

    /// Whether a listener is registered for the event named `name`
    /// (`linkclick`, `textchange`, `mousepress` or `mouserelease`).
    pub fn is_accepting_event(&self, name: &str) -> bool {
        EventKind::from_name(name).is_some_and(|kind| self.shared.dispatcher.is_accepting(kind))
    }
}

impl Drop for BrowserPane {
    fn drop(&mut self) {
        self.widget.detach();
        log::debug!("{} dropped", self.shared.id);
    }
}

impl fmt::Debug for BrowserPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowserPane")
            .field("id", &self.shared.id)
            .field("metadata", &*self.shared.metadata.read())
            .field("widget", &self.widget)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::marshal::EventLoop;
    use crate::test_utils::{EventRecorder, link_page};
    use vellum_types::input::{MouseButton, PointerEvent};

    fn pane_on(lp: &EventLoop) -> BrowserPane {
        BrowserPane::new(&lp.marshaller(), PaneConfig::default())
    }

    fn plain_pane(lp: &EventLoop, text: &str) -> BrowserPane {
        let pane = pane_on(lp);
        pane.set_content_type("text/plain");
        pane.set_text(text);
        pane
    }

    #[test]
    fn pane_is_send_and_sync() {
        fn check<T: Send + Sync>() {}
        check::<BrowserPane>();
        check::<BrowserWidget>();
    }

    #[test]
    fn fresh_pane_defaults() {
        let lp = EventLoop::new();
        let pane = pane_on(&lp);
        assert_eq!(pane.type_name(), "BrowserPane");
        assert_eq!(pane.content_type(), "text/html");
        assert_eq!(pane.page_url(), "");
        assert!(!pane.is_visible());
        assert!(!pane.is_editable());
        assert!(pane.is_line_wrap());
        assert_eq!(pane.cursor_position(), 0);
        assert_eq!(pane.selection_start(), -1);
        assert!(pane.widget().is_attached());
    }

    #[test]
    fn select_reads_back() {
        let lp = EventLoop::new();
        let pane = plain_pane(&lp, "hello world");
        pane.select(6, 5);
        assert_eq!(pane.selection_start(), 6);
        assert_eq!(pane.selection_end(), 11);
        assert_eq!(pane.selection_length(), 5);
        assert_eq!(pane.selected_text(), "world");
    }

    #[test]
    fn empty_selection_reports_minus_one() {
        let lp = EventLoop::new();
        let pane = plain_pane(&lp, "hello");
        pane.select(2, 0);
        assert_eq!(pane.selection_start(), -1);
        assert_eq!(pane.selection_end(), -1);
        assert_eq!(pane.selection_length(), 0);
        assert_eq!(pane.selected_text(), "");
        assert_eq!(pane.cursor_position(), 2);
    }

    #[test]
    #[should_panic(expected = "BrowserPane::select: start must be non-negative, was -1")]
    fn select_negative_start_panics() {
        let lp = EventLoop::new();
        pane_on(&lp).select(-1, 0);
    }

    #[test]
    #[should_panic(expected = "BrowserPane::select: length must be non-negative")]
    fn select_negative_length_panics() {
        let lp = EventLoop::new();
        pane_on(&lp).select(0, -1);
    }

    #[test]
    #[should_panic(expected = "BrowserPane::set_cursor_position: index must be non-negative")]
    fn negative_cursor_position_panics() {
        let lp = EventLoop::new();
        pane_on(&lp).set_cursor_position(-3, false);
    }

    #[test]
    fn clear_selection_is_idempotent() {
        let lp = EventLoop::new();
        let pane = plain_pane(&lp, "hello world");
        pane.select_all();
        assert_eq!(pane.selection_length(), 11);
        pane.clear_selection();
        let once = pane.widget().cursor();
        pane.clear_selection();
        assert_eq!(pane.widget().cursor(), once);
        assert_eq!(pane.selection_start(), -1);
    }

    #[test]
    fn cursor_position_with_keep_anchor() {
        let lp = EventLoop::new();
        let pane = plain_pane(&lp, "abcdef");
        pane.set_cursor_position(1, false);
        pane.set_cursor_position(4, true);
        assert_eq!(pane.selected_text(), "bcd");
        pane.move_cursor_to_end();
        assert_eq!(pane.cursor_position(), 6);
        assert_eq!(pane.selection_start(), -1);
        pane.move_cursor_to_start();
        assert_eq!(pane.cursor_position(), 0);
    }

    #[test]
    fn text_returns_markup() {
        let lp = EventLoop::new();
        let pane = pane_on(&lp);
        pane.set_text("<p>a &amp; b</p>");
        assert!(pane.text().contains("<body>a &amp; b</body>"));
        assert_eq!(pane.plain_text(), "a & b");
        pane.clear_text();
        assert_eq!(pane.plain_text(), "");
    }

    #[test]
    fn flags_round_trip() {
        let lp = EventLoop::new();
        let pane = pane_on(&lp);
        pane.set_editable(true);
        pane.set_line_wrap(false);
        pane.set_visible(true);
        assert!(pane.is_editable());
        assert!(!pane.is_line_wrap());
        assert!(pane.is_visible());
    }

    #[test]
    fn metadata_setters_are_direct() {
        let lp = EventLoop::new();
        let pane = pane_on(&lp);
        pane.set_content_type("text/plain");
        pane.set_action_command("open");
        assert_eq!(pane.content_type(), "text/plain");
        assert_eq!(pane.action_command(), "open");
    }

    #[test]
    fn missing_file_changes_nothing() {
        let lp = EventLoop::new();
        let pane = plain_pane(&lp, "before");
        pane.read_text_from_file("/nonexistent/vellum/page.txt");
        assert_eq!(pane.page_url(), "");
        assert_eq!(pane.content_type(), "text/plain");
        assert_eq!(pane.plain_text(), "before");
    }

    #[test]
    fn reader_contents_become_text() {
        let lp = EventLoop::new();
        let pane = pane_on(&lp);
        pane.read_text_from_reader("<b>from</b> reader".as_bytes());
        assert_eq!(pane.plain_text(), "from reader");
    }

    #[test]
    fn failed_url_load_keeps_page_url() {
        let lp = EventLoop::new();
        let pane = plain_pane(&lp, "old");
        pane.read_text_from_url("https://example.invalid/page.html");
        assert_eq!(pane.page_url(), "https://example.invalid/page.html");
        assert_eq!(pane.plain_text(), "old");
    }

    #[test]
    fn link_click_emits_one_event() {
        let lp = EventLoop::new();
        let pane = pane_on(&lp);
        pane.set_action_command("follow");
        pane.set_text(&link_page());
        let events = EventRecorder::new();
        pane.set_link_listener(events.link_handler());

        let w = pane.widget();
        w.pointer_press(PointerEvent::primary(1, 1));
        assert!(w.pointer_release(PointerEvent::primary(2, 2)));

        let links = events.links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].request_url, "first.html");
        assert_eq!(links[0].action_command, "follow");
        assert_eq!(links[0].source, pane.id());
        assert_eq!((links[0].x, links[0].y), (2, 2));
    }

    #[test]
    fn mismatched_release_emits_nothing() {
        let lp = EventLoop::new();
        let pane = pane_on(&lp);
        pane.set_text(&link_page());
        let events = EventRecorder::new();
        pane.set_link_listener(events.link_handler());
        let w = pane.widget();

        // Each mismatch falls through to the default release, which
        // finishes the drag selection.
        // Press on the first link, release on the second.
        w.pointer_press(PointerEvent::primary(1, 1));
        assert!(!w.pointer_release(PointerEvent::primary(1, 17)));
        assert_eq!((pane.selection_start(), pane.selection_end()), (0, 11));
        assert_eq!(pane.selected_text(), "first link\n");
        // Press on plain text, release on a link.
        w.pointer_press(PointerEvent::primary(1, 33));
        assert!(!w.pointer_release(PointerEvent::primary(1, 1)));
        assert_eq!((pane.selection_start(), pane.selection_end()), (0, 23));
        assert_eq!(pane.cursor_position(), 0);
        // Press on a link, release on plain text.
        w.pointer_press(PointerEvent::primary(1, 1));
        assert!(!w.pointer_release(PointerEvent::primary(33, 41)));
        assert_eq!((pane.selection_start(), pane.selection_end()), (0, 27));
        assert_eq!(pane.cursor_position(), 27);

        assert!(events.links().is_empty());
    }

    #[test]
    fn void_and_event_link_listeners_both_fire() {
        let lp = EventLoop::new();
        let pane = pane_on(&lp);
        pane.set_text(&link_page());
        let events = EventRecorder::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        pane.set_link_listener(events.link_handler());
        pane.set_link_listener_void(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });

        pane.widget().pointer_press(PointerEvent::primary(1, 1));
        pane.widget().pointer_release(PointerEvent::primary(1, 1));
        assert_eq!(events.links().len(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(pane.is_accepting_event("linkclick"));
        pane.remove_link_listener();
        assert!(!pane.is_accepting_event("linkclick"));
        assert!(!pane.is_accepting_event("keypress"));
        // Without a listener the gesture is an ordinary drag over the link.
        pane.widget().pointer_press(PointerEvent::primary(1, 1));
        assert!(!pane.widget().pointer_release(PointerEvent::primary(41, 1)));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(pane.selected_text(), "first");
    }

    #[test]
    fn text_change_fires_on_set_and_clear() {
        let lp = EventLoop::new();
        let pane = pane_on(&lp);
        let events = EventRecorder::new();
        pane.set_text_change_listener(events.text_change_handler());
        pane.set_text("one");
        pane.clear_text();
        assert_eq!(events.text_changes(), 2);
        pane.remove_text_change_listener();
        pane.set_text("two");
        assert_eq!(events.text_changes(), 2);
    }

    #[test]
    fn mouse_listener_sees_press_and_release() {
        let lp = EventLoop::new();
        let pane = plain_pane(&lp, "text");
        let events = EventRecorder::new();
        pane.set_mouse_listener(events.mouse_handler());
        let right = PointerEvent::primary(3, 4).with_button(MouseButton::Right);
        pane.widget().pointer_press(right);
        pane.widget().pointer_release(right);
        let kinds: Vec<_> = events.mouse().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::MousePress, EventKind::MouseRelease]);
        assert_eq!(events.mouse()[0].button, MouseButton::Right);
    }

    #[test]
    fn listener_can_call_back_into_pane() {
        let lp = EventLoop::new();
        let pane = Arc::new(pane_on(&lp));
        pane.set_text(&link_page());
        let inner = Arc::clone(&pane);
        pane.set_link_listener(move |e: &LinkEvent| {
            inner.set_content_type("text/plain");
            inner.set_text(&format!("clicked {}", e.request_url));
        });
        pane.widget().pointer_press(PointerEvent::primary(1, 1));
        pane.widget().pointer_release(PointerEvent::primary(1, 1));
        assert_eq!(pane.plain_text(), "clicked first.html");
        // Break the Arc cycle held by the listener.
        pane.remove_link_listener();
    }

    #[test]
    fn drop_detaches_widget() {
        let lp = EventLoop::new();
        let pane = pane_on(&lp);
        pane.set_text(&link_page());
        let events = EventRecorder::new();
        pane.set_link_listener(events.link_handler());
        let widget = pane.widget().clone();

        widget.pointer_press(PointerEvent::primary(1, 1));
        drop(pane);
        assert!(!widget.is_attached());
        assert!(!widget.pointer_release(PointerEvent::primary(1, 1)));
        assert!(events.links().is_empty());
    }
}
