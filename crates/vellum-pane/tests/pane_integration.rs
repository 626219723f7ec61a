//! End-to-end tests driving a pane from worker threads and the host side.

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use url::Url;

use vellum_pane::{
    BrowserPane, EventLoop, LinkEvent, PaneConfig, Resource, ResourceFetcher, ResourceKind,
};
use vellum_types::error::{PaneError, Result};
use vellum_types::input::{InputEvent, PointerEvent};

/// Serves fixed markup pages by URL.
#[derive(Default)]
struct MapFetcher {
    pages: HashMap<String, String>,
}

impl MapFetcher {
    fn with_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }
}

impl ResourceFetcher for MapFetcher {
    fn fetch(&self, kind: ResourceKind, url: &Url) -> Result<Resource> {
        match (kind, self.pages.get(url.as_str())) {
            (ResourceKind::Markup, Some(text)) => Ok(Resource::Markup {
                text: text.clone(),
                content_type: "text/html".to_string(),
            }),
            _ => Err(PaneError::Resource(format!("not served: {url}"))),
        }
    }
}

/// Run `work` on a worker thread while this thread pumps the loop.
fn drive<F>(lp: &EventLoop, work: F)
where
    F: FnOnce() + Send + 'static,
{
    let quit = lp.marshaller();
    let worker = thread::spawn(move || {
        work();
        quit.quit();
    });
    lp.run();
    worker.join().unwrap();
}

#[test]
fn foreign_writes_wait_for_the_interface_thread() {
    let lp = EventLoop::new();
    let pane = Arc::new(BrowserPane::new(&lp.marshaller(), PaneConfig::default()));

    let p = Arc::clone(&pane);
    thread::spawn(move || {
        p.set_content_type("text/plain");
        p.set_text("queued text");
    })
    .join()
    .unwrap();

    // Metadata is direct, the widget write is still queued.
    assert_eq!(pane.content_type(), "text/plain");
    assert_eq!(pane.plain_text(), "");
    assert_eq!(lp.pending(), 1);

    assert_eq!(lp.run_pending(), 1);
    assert_eq!(pane.plain_text(), "queued text");
}

#[test]
fn flush_makes_own_writes_visible() {
    let lp = EventLoop::new();
    let pane = Arc::new(BrowserPane::new(&lp.marshaller(), PaneConfig::default()));
    let seen = Arc::new(Mutex::new(None));

    let (p, s) = (Arc::clone(&pane), Arc::clone(&seen));
    drive(&lp, move || {
        p.set_content_type("text/plain");
        p.set_text("hello world");
        p.select(6, 5);
        p.flush().unwrap();
        *s.lock() = Some((p.selected_text(), p.selection_start(), p.selection_end()));
    });

    assert_eq!(*seen.lock(), Some(("world".to_string(), 6, 11)));
}

#[test]
fn flush_on_interface_thread_is_immediate() {
    let lp = EventLoop::new();
    let pane = BrowserPane::new(&lp.marshaller(), PaneConfig::default());
    pane.set_text("x");
    pane.flush().unwrap();
    assert_eq!(pane.plain_text(), "x");
}

#[test]
fn files_set_content_type_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("page.html");
    let photo = dir.path().join("photo.JPG");
    let notes = dir.path().join("notes.txt");
    fs::write(&page, "<title>Page</title><p>Hello <a href=\"next.html\">next</a></p>").unwrap();
    fs::write(&photo, [0xFFu8, 0xD8, 0xFF, 0xE0]).unwrap();
    fs::write(&notes, "<b>not bold</b>").unwrap();

    let lp = EventLoop::new();
    let pane = BrowserPane::new(&lp.marshaller(), PaneConfig::default());

    pane.read_text_from_file(&page);
    assert_eq!(pane.content_type(), "text/html");
    assert_eq!(pane.page_url(), page.display().to_string());
    assert_eq!(pane.title().as_deref(), Some("Page"));
    assert_eq!(pane.plain_text(), "Hello next");

    pane.read_text_from_file(&photo);
    assert_eq!(pane.content_type(), "image/jpeg");

    pane.read_text_from_file(&notes);
    assert_eq!(pane.content_type(), "text/plain");
    assert_eq!(pane.plain_text(), "<b>not bold</b>");
}

#[test]
fn file_load_from_worker_thread() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("index.htm");
    fs::write(&page, "<p>from disk</p>").unwrap();

    let lp = EventLoop::new();
    let pane = Arc::new(BrowserPane::new(&lp.marshaller(), PaneConfig::default()));
    let p = Arc::clone(&pane);
    drive(&lp, move || {
        p.read_text_from_file(&page);
        p.flush().unwrap();
    });

    assert_eq!(pane.plain_text(), "from disk");
    assert_eq!(pane.content_type(), "text/html");
}

#[test]
fn url_navigation_resolves_relative_links_and_images() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.html");
    let b = dir.path().join("b.html");
    fs::write(&a, "<a href=\"b.html\">to b</a>").unwrap();
    fs::write(&b, "<p>page b</p>").unwrap();

    let lp = EventLoop::new();
    let pane = Arc::new(BrowserPane::new(&lp.marshaller(), PaneConfig::default()));

    // The host follows activated links by navigating the pane.
    let follower = Arc::downgrade(&pane);
    pane.set_link_listener(move |e: &LinkEvent| {
        if let Some(pane) = follower.upgrade() {
            pane.read_text_from_url(&e.request_url);
        }
    });

    let url = Url::from_file_path(&a).unwrap();
    pane.read_text_from_url(url.as_str());
    assert_eq!(pane.plain_text(), "to b");

    let w = pane.widget();
    assert!(w.handle_input(&InputEvent::PointerPress(PointerEvent::primary(4, 4))));
    assert!(w.pointer_release(PointerEvent::primary(4, 4)));

    assert_eq!(pane.page_url(), "b.html");
    assert_eq!(pane.plain_text(), "page b");
    assert_eq!(w.source(), Some(Url::from_file_path(&b).unwrap()));
}

#[test]
fn with_url_loads_through_custom_fetcher() {
    let fetcher = MapFetcher::default()
        .with_page("https://example.com/", "<title>Example</title><p>hi</p>");
    let lp = EventLoop::new();
    let pane = BrowserPane::with_fetcher(&lp.marshaller(), PaneConfig::default(), fetcher);
    pane.read_text_from_url("https://example.com/");
    assert_eq!(pane.title().as_deref(), Some("Example"));
    assert_eq!(pane.page_url(), "https://example.com/");

    pane.read_text_from_url("https://example.com/missing");
    assert_eq!(pane.page_url(), "https://example.com/missing");
    assert_eq!(pane.plain_text(), "hi");
}

#[test]
fn with_url_constructor_starts_loading() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("start.html");
    fs::write(&page, "<p>start</p>").unwrap();
    let url = Url::from_file_path(&page).unwrap();

    let lp = EventLoop::new();
    let pane = BrowserPane::with_url(&lp.marshaller(), PaneConfig::default(), url.as_str());
    assert_eq!(pane.plain_text(), "start");
    assert_eq!(pane.page_url(), url.as_str());
    assert!(!pane.is_visible());

    let empty = BrowserPane::with_url(&lp.marshaller(), PaneConfig::default(), "");
    assert_eq!(empty.page_url(), "");
}

#[test]
fn widget_outlives_pane_without_events() {
    let lp = EventLoop::new();
    let pane = BrowserPane::new(&lp.marshaller(), PaneConfig::default());
    pane.set_text("<a href=\"x.html\">x</a>");
    let clicks = Arc::new(Mutex::new(0));
    let c = Arc::clone(&clicks);
    pane.set_link_listener_void(move || *c.lock() += 1);

    let widget = pane.widget().clone();
    widget.pointer_press(PointerEvent::primary(1, 1));
    assert!(widget.pointer_release(PointerEvent::primary(1, 1)));
    assert_eq!(*clicks.lock(), 1);

    drop(pane);
    widget.pointer_press(PointerEvent::primary(1, 1));
    assert!(!widget.pointer_release(PointerEvent::primary(1, 1)));
    assert_eq!(*clicks.lock(), 1);
    // Content stays with the widget.
    assert_eq!(widget.to_plain_text(), "x");
}

#[test]
fn config_file_drives_pane_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pane.toml");
    fs::write(&path, "editable = true\nline_wrap = false\naction_command = \"go\"\n").unwrap();

    let config = PaneConfig::from_file(&path).unwrap();
    let lp = EventLoop::new();
    let pane = BrowserPane::new(&lp.marshaller(), config);
    assert!(pane.is_editable());
    assert!(!pane.is_line_wrap());
    assert_eq!(pane.action_command(), "go");
}
