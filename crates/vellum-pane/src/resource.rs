//! Document resource loading.
//!
//! The widget asks a [`ResourceFetcher`] for every resource its content
//! references: the markup behind a navigation and each `<img src>`. The
//! loader installed by default is a [`DataImageDecoder`] in front of a
//! [`FileFetcher`]: inline `data:image/...;base64,` images are decoded in
//! place, everything else goes to the local filesystem.

use std::fs;
use std::io::Cursor;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use once_cell::sync::Lazy;
use url::Url;

use vellum_types::error::{PaneError, Result};

use crate::content_type;

/// Default cap on the encoded size of a single image.
pub const MAX_IMAGE_BYTES: usize = 16 * 1024 * 1024;
/// Default cap on either image dimension.
pub const MAX_IMAGE_SIDE: u32 = 4096;

/// Standard alphabet, padding optional.
static LENIENT_BASE64: Lazy<GeneralPurpose> = Lazy::new(|| {
    GeneralPurpose::new(
        &alphabet::STANDARD,
        GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
    )
});

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What the widget is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A page to display.
    Markup,
    /// An inline image.
    Image,
}

/// Decoded RGBA image data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// RGBA pixels, row-major, 4 bytes per pixel.
    pub pixels: Vec<u8>,
}

/// A fetched resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Markup { text: String, content_type: String },
    Image(DecodedImage),
}

/// Source of document resources.
///
/// The widget never holds its own lock while fetching, so an implementation
/// may read the widget or pane it serves.
pub trait ResourceFetcher: Send + Sync {
    fn fetch(&self, kind: ResourceKind, url: &Url) -> Result<Resource>;
}

impl<F: ResourceFetcher + ?Sized> ResourceFetcher for Box<F> {
    fn fetch(&self, kind: ResourceKind, url: &Url) -> Result<Resource> {
        (**self).fetch(kind, url)
    }
}

/// Size limits applied before and after decoding an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    pub max_bytes: usize,
    pub max_side: u32,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_bytes: MAX_IMAGE_BYTES,
            max_side: MAX_IMAGE_SIDE,
        }
    }
}

impl ImageLimits {
    fn check_dimensions(&self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(PaneError::Resource("image has zero size".into()));
        }
        if width > self.max_side || height > self.max_side {
            return Err(PaneError::Resource(format!(
                "image {width}x{height} exceeds {} px per side",
                self.max_side
            )));
        }
        Ok(())
    }
}

/// Decode PNG/JPEG/GIF/BMP bytes to RGBA, enforcing `limits`.
pub fn decode_image(bytes: &[u8], limits: &ImageLimits) -> Result<DecodedImage> {
    if bytes.len() > limits.max_bytes {
        return Err(PaneError::Resource(format!(
            "image of {} bytes exceeds {} byte limit",
            bytes.len(),
            limits.max_bytes
        )));
    }
    // Reject oversized images from the header before allocating pixels.
    if let Ok(reader) = image::ImageReader::new(Cursor::new(bytes)).with_guessed_format()
        && let Ok((w, h)) = reader.into_dimensions()
    {
        limits.check_dimensions(w, h)?;
    }

    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    limits.check_dimensions(width, height)?;
    Ok(DecodedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

// ---------------------------------------------------------------------------
// FileFetcher
// ---------------------------------------------------------------------------

/// Default fetcher: serves `file:` URLs from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    limits: ImageLimits,
}

impl FileFetcher {
    pub fn new(limits: ImageLimits) -> Self {
        Self { limits }
    }
}

impl ResourceFetcher for FileFetcher {
    fn fetch(&self, kind: ResourceKind, url: &Url) -> Result<Resource> {
        if url.scheme() != "file" {
            return Err(PaneError::UnsupportedScheme(url.scheme().to_string()));
        }
        let path = url
            .to_file_path()
            .map_err(|()| PaneError::Resource(format!("not a local path: {url}")))?;
        let bytes = fs::read(&path)?;
        log::debug!("fetched {} ({} bytes)", path.display(), bytes.len());

        match kind {
            ResourceKind::Markup => Ok(Resource::Markup {
                text: String::from_utf8_lossy(&bytes).into_owned(),
                content_type: content_type::resolve_path(&path).to_string(),
            }),
            ResourceKind::Image => decode_image(&bytes, &self.limits).map(Resource::Image),
        }
    }
}

// ---------------------------------------------------------------------------
// DataImageDecoder
// ---------------------------------------------------------------------------

/// Decodes `data:image/<subtype>;base64,<payload>` images itself and hands
/// every other request to `fallback`.
#[derive(Debug, Clone, Default)]
pub struct DataImageDecoder<F> {
    fallback: F,
    limits: ImageLimits,
}

impl<F: ResourceFetcher> DataImageDecoder<F> {
    pub fn new(fallback: F, limits: ImageLimits) -> Self {
        Self { fallback, limits }
    }

    fn decode_inline(&self, payload: &str) -> Result<DecodedImage> {
        let bytes = LENIENT_BASE64.decode(payload)?;
        decode_image(&bytes, &self.limits)
    }
}

impl<F: ResourceFetcher> ResourceFetcher for DataImageDecoder<F> {
    fn fetch(&self, kind: ResourceKind, url: &Url) -> Result<Resource> {
        if kind == ResourceKind::Image
            && url.scheme() == "data"
            && let Some(payload) = base64_image_payload(url.path())
        {
            match self.decode_inline(payload) {
                Ok(image) => return Ok(Resource::Image(image)),
                Err(e) => log::debug!("inline image not decoded ({e}); using default fetch"),
            }
        }
        self.fallback.fetch(kind, url)
    }
}

/// The base64 payload of a data URL path of the form
/// `image/<subtype>;base64,<payload>`.
pub fn base64_image_payload(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("image/")?;
    let (subtype, rest) = rest.split_once(';')?;
    if subtype.is_empty() {
        return None;
    }
    rest.strip_prefix("base64,").filter(|p| !p.is_empty())
}
