//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::Engine as _;
use parking_lot::Mutex;
use url::Url;

use vellum_types::error::{PaneError, Result};

use crate::events::{LinkEvent, MouseEvent, TextChangeEvent};
use crate::resource::{Resource, ResourceFetcher, ResourceKind};

/// PNG bytes of a `width` x `height` opaque red image.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// `data:image/png;base64,...` URL of [`png_bytes`].
pub fn png_data_url(width: u32, height: u32) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(png_bytes(width, height));
    format!("data:image/png;base64,{payload}")
}

/// Three lines: a link, another link, plain text. At the default 8x16
/// metrics, y in 0..16 hits `first.html`, 16..32 hits `second.html` and
/// 32..48 hits plain text.
pub fn link_page() -> String {
    "<p><a href=\"first.html\">first link</a></p>\
     <p><a href=\"second.html\">second link</a></p>\
     <p>plain text</p>"
        .to_string()
}

// ---------------------------------------------------------------------------
// RecordingFetcher
// ---------------------------------------------------------------------------

/// Serves registered markup pages, fails everything else, and records
/// every request.
#[derive(Clone, Default)]
pub struct RecordingFetcher {
    pages: Arc<Mutex<HashMap<String, (String, String)>>>,
    requests: Arc<Mutex<Vec<(ResourceKind, String)>>>,
}

impl RecordingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&self, url: &str, text: &str, content_type: &str) {
        self.pages
            .lock()
            .insert(url.to_string(), (text.to_string(), content_type.to_string()));
    }

    pub fn requests(&self) -> Vec<(ResourceKind, String)> {
        self.requests.lock().clone()
    }
}

impl ResourceFetcher for RecordingFetcher {
    fn fetch(&self, kind: ResourceKind, url: &Url) -> Result<Resource> {
        self.requests.lock().push((kind, url.to_string()));
        match (kind, self.pages.lock().get(url.as_str())) {
            (ResourceKind::Markup, Some((text, content_type))) => Ok(Resource::Markup {
                text: text.clone(),
                content_type: content_type.clone(),
            }),
            _ => Err(PaneError::Resource(format!("no fixture for {url}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// EventRecorder
// ---------------------------------------------------------------------------

/// Collects events delivered to the handlers it hands out.
#[derive(Clone, Default)]
pub struct EventRecorder {
    links: Arc<Mutex<Vec<LinkEvent>>>,
    text_changes: Arc<AtomicUsize>,
    mouse: Arc<Mutex<Vec<MouseEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn link_handler(&self) -> impl Fn(&LinkEvent) + Send + Sync + 'static {
        let links = Arc::clone(&self.links);
        move |e: &LinkEvent| links.lock().push(e.clone())
    }

    pub fn text_change_handler(&self) -> impl Fn(&TextChangeEvent) + Send + Sync + 'static {
        let count = Arc::clone(&self.text_changes);
        move |_: &TextChangeEvent| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn mouse_handler(&self) -> impl Fn(&MouseEvent) + Send + Sync + 'static {
        let mouse = Arc::clone(&self.mouse);
        move |e: &MouseEvent| mouse.lock().push(e.clone())
    }

    pub fn links(&self) -> Vec<LinkEvent> {
        self.links.lock().clone()
    }

    pub fn text_changes(&self) -> usize {
        self.text_changes.load(Ordering::SeqCst)
    }

    pub fn mouse(&self) -> Vec<MouseEvent> {
        self.mouse.lock().clone()
    }
}
