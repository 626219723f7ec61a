//! Rich-text document model.
//!
//! A document is a flat sequence of characters addressed by cursor
//! position. Line breaks occupy one position and every image occupies one
//! position holding [`OBJECT_REPLACEMENT`]. Hyperlinks are half-open
//! position ranges carrying their href.

use crate::content_type;
use crate::markup;
use crate::resource::DecodedImage;

/// Placeholder character standing in for an inline image.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// A hyperlink over `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSpan {
    pub start: usize,
    pub end: usize,
    pub href: String,
}

/// An inline image at `offset`, materialized on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub offset: usize,
    pub src: String,
    pub image: Option<DecodedImage>,
}

/// How text handed to the document should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Markup,
    Plain,
}

impl TextFormat {
    /// Pick an interpretation from the content type, sniffing the text when
    /// the type says neither markup nor plain text.
    pub fn for_content(content_type: &str, text: &str) -> Self {
        if content_type::is_markup(content_type) {
            TextFormat::Markup
        } else if content_type::is_plain_text(content_type) {
            TextFormat::Plain
        } else if markup::might_be_markup(text) {
            TextFormat::Markup
        } else {
            TextFormat::Plain
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextDocument {
    chars: Vec<char>,
    anchors: Vec<AnchorSpan>,
    images: Vec<ImageRef>,
    title: Option<String>,
}

impl TextDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from plain text. `\r\n` and lone `\r` become `\n`.
    pub fn from_plain_text(text: &str) -> Self {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        Self {
            chars: normalized.chars().collect(),
            ..Self::default()
        }
    }

    /// Build a document by scanning markup.
    pub fn from_markup(source: &str) -> Self {
        markup::parse(source)
    }

    pub fn from_text(text: &str, format: TextFormat) -> Self {
        match format {
            TextFormat::Markup => Self::from_markup(text),
            TextFormat::Plain => Self::from_plain_text(text),
        }
    }

    pub(crate) fn from_parts(
        chars: Vec<char>,
        anchors: Vec<AnchorSpan>,
        images: Vec<ImageRef>,
        title: Option<String>,
    ) -> Self {
        Self {
            chars,
            anchors,
            images,
            title,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Number of cursor positions past the start (the end position).
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn anchors(&self) -> &[AnchorSpan] {
        &self.anchors
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut [ImageRef] {
        &mut self.images
    }

    /// Contents of the markup `<title>`, if any.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The href of the anchor covering the character at `offset`.
    pub fn anchor_at(&self, offset: usize) -> Option<&str> {
        self.anchors
            .iter()
            .find(|a| a.start <= offset && offset < a.end)
            .map(|a| a.href.as_str())
    }

    /// Text between two positions. Image placeholders are dropped.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end]
            .iter()
            .filter(|&&c| c != OBJECT_REPLACEMENT)
            .collect()
    }

    pub fn to_plain_text(&self) -> String {
        self.slice(0, self.chars.len())
    }

    /// Serialize back to markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::from("<html><head>");
        if let Some(title) = &self.title {
            out.push_str("<title>");
            markup::push_escaped(&mut out, title);
            out.push_str("</title>");
        }
        out.push_str("</head><body>");

        let mut images = self.images.iter().peekable();
        let mut open: Option<&AnchorSpan> = None;
        for (i, &c) in self.chars.iter().enumerate() {
            if open.is_some_and(|a| a.end == i) {
                out.push_str("</a>");
                open = None;
            }
            if open.is_none()
                && let Some(a) = self.anchors.iter().find(|a| a.start == i && a.end > i)
            {
                out.push_str("<a href=\"");
                markup::push_escaped(&mut out, &a.href);
                out.push_str("\">");
                open = Some(a);
            }
            match c {
                '\n' => out.push_str("<br />"),
                OBJECT_REPLACEMENT => {
                    while images.peek().is_some_and(|img| img.offset < i) {
                        images.next();
                    }
                    if let Some(img) = images.next_if(|img| img.offset == i) {
                        out.push_str("<img src=\"");
                        markup::push_escaped(&mut out, &img.src);
                        out.push_str("\" />");
                    }
                },
                _ => {
                    let mut buf = [0u8; 4];
                    markup::push_escaped(&mut out, c.encode_utf8(&mut buf));
                },
            }
        }
        if open.is_some() {
            out.push_str("</a>");
        }
        out.push_str("</body></html>");
        out
    }
}
