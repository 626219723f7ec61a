//! Lightweight markup scanner.
//!
//! Turns an HTML-ish string into a [`TextDocument`]: text runs with
//! collapsed whitespace, line breaks for block-level elements, anchor spans
//! for `<a href>`, image placeholders for `<img src>` and the page title.
//! Styling, scripts and everything else a full engine would honour are
//! dropped. Malformed input never panics; an unterminated or bogus tag is
//! kept as literal text.

use std::borrow::Cow;

use crate::document::{AnchorSpan, ImageRef, OBJECT_REPLACEMENT, TextDocument};

/// Elements that start and end on their own line.
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "section",
    "table",
    "tr",
    "ul",
];

/// Elements whose content is skipped entirely.
const SKIPPED_TAGS: &[&str] = &["script", "style", "template"];

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Scan `source` into a document.
pub fn parse(source: &str) -> TextDocument {
    let mut b = Builder::default();
    let mut rest = source;
    // Absolute offset of the next '>' at or after the scan position.
    let mut next_gt = source.find('>');

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |i| &after[i + 3..]);
            continue;
        }
        if rest.starts_with('<') {
            let at = source.len() - rest.len();
            if next_gt.is_some_and(|gt| gt < at) {
                next_gt = rest.find('>').map(|i| i + at);
            }
            // No tag can close from here on.
            if next_gt.is_none() {
                b.push_text(&decode_entities(rest));
                break;
            }
            if let Some((tag, after)) = parse_tag(rest) {
                rest = b.handle_tag(&tag, after);
                continue;
            }
        }
        // Text up to the next '<' (a literal '<' at the front is included).
        let skip = rest.chars().next().map_or(0, char::len_utf8);
        let end = rest[skip..].find('<').map_or(rest.len(), |i| i + skip);
        b.push_text(&decode_entities(&rest[..end]));
        rest = &rest[end..];
    }

    b.finish()
}

/// Heuristic for untyped text: does the first line contain a tag?
pub fn might_be_markup(text: &str) -> bool {
    let first_line = text.trim_start().lines().next().unwrap_or("");
    let Some(lt) = first_line.find('<') else {
        return false;
    };
    let after = &first_line[lt + 1..];
    let starts_tag = after
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '!' || c == '/');
    starts_tag && after.contains('>')
}

/// Append `text` with `&`, `<`, `>` and `"` escaped.
pub fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Replace character references (`&amp;`, `&#65;`, `&#x41;`) in `text`.
/// Unknown references are left as written.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest[1..]
            .find(';')
            .filter(|&semi| semi > 0 && semi <= 32)
            .and_then(|semi| decode_reference(&rest[1..=semi]).map(|c| (c, semi + 2)));
        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            },
            None => {
                out.push('&');
                rest = &rest[1..];
            },
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).filter(|&c| c != '\0');
    }
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{00A0}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "thinsp" => '\u{2009}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "hellip" => '\u{2026}',
        "bull" => '\u{2022}',
        "middot" => '\u{00B7}',
        "laquo" => '\u{00AB}',
        "raquo" => '\u{00BB}',
        "copy" => '\u{00A9}',
        "reg" => '\u{00AE}',
        "trade" => '\u{2122}',
        "times" => '\u{00D7}',
        "divide" => '\u{00F7}',
        "deg" => '\u{00B0}',
        "para" => '\u{00B6}',
        "sect" => '\u{00A7}',
        "euro" => '\u{20AC}',
        "pound" => '\u{00A3}',
        "yen" => '\u{00A5}',
        "cent" => '\u{00A2}',
        "larr" => '\u{2190}',
        "rarr" => '\u{2192}',
        "uarr" => '\u{2191}',
        "darr" => '\u{2193}',
        _ => return None,
    };
    Some(c)
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Tag {
    /// Lowercased element name; empty for declarations and doctypes.
    name: String,
    end: bool,
    attributes: Vec<(String, String)>,
}

impl Tag {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse the tag at the start of `s` (which begins with `<`). Returns the
/// tag and the input after its closing `>`.
fn parse_tag(s: &str) -> Option<(Tag, &str)> {
    let body = &s[1..];

    // <!DOCTYPE ...>, <?xml ...?>
    if body.starts_with(['!', '?']) {
        let close = body.find('>')?;
        let tag = Tag {
            name: String::new(),
            end: false,
            attributes: Vec::new(),
        };
        return Some((tag, &body[close + 1..]));
    }

    let (end, body) = match body.strip_prefix('/') {
        Some(b) => (true, b),
        None => (false, body),
    };
    if !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    let name_len = body
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/' || c == '<')
        .unwrap_or(body.len());
    let name = body[..name_len].to_ascii_lowercase();
    let mut rest = &body[name_len..];
    let mut attributes = Vec::new();

    loop {
        rest = rest.trim_start();
        if let Some(after) = rest.strip_prefix('>') {
            return Some((
                Tag {
                    name,
                    end,
                    attributes,
                },
                after,
            ));
        }
        if let Some(after) = rest.strip_prefix('/') {
            rest = after;
            continue;
        }
        if rest.is_empty() || rest.starts_with('<') {
            return None;
        }

        let attr_len = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/' || c == '<')
            .unwrap_or(rest.len());
        let attr_name = rest[..attr_len].to_ascii_lowercase();
        rest = rest[attr_len..].trim_start();

        let mut value = String::new();
        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            if let Some(quote) = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'') {
                let inner = &after_eq[1..];
                let close = inner.find(quote)?;
                value = decode_entities(&inner[..close]).into_owned();
                rest = &inner[close + 1..];
            } else {
                let len = after_eq
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(after_eq.len());
                value = decode_entities(&after_eq[..len]).into_owned();
                rest = &after_eq[len..];
            }
        }
        if !attr_name.is_empty() {
            attributes.push((attr_name, value));
        }
    }
}

/// Byte offset of `needle` in `haystack`, ASCII case-insensitively.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Split raw element content at its end tag: `(content, after end tag)`.
fn split_raw_text<'a>(s: &'a str, name: &str) -> (&'a str, &'a str) {
    let closing = format!("</{name}");
    match find_ignore_ascii_case(s, &closing) {
        Some(i) => {
            let after = &s[i..];
            let gt = after.find('>').map_or(after.len(), |g| g + 1);
            (&s[..i], &after[gt..])
        },
        None => (s, ""),
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Builder {
    chars: Vec<char>,
    anchors: Vec<AnchorSpan>,
    images: Vec<ImageRef>,
    title: Option<String>,
    open_anchor: Option<(usize, String)>,
    pending_space: bool,
    pre_depth: usize,
    in_head: bool,
}

impl Builder {
    fn handle_tag<'a>(&mut self, tag: &Tag, after: &'a str) -> &'a str {
        let name = tag.name.as_str();

        if !tag.end && SKIPPED_TAGS.contains(&name) {
            return split_raw_text(after, name).1;
        }
        if !tag.end && name == "title" {
            let (raw, rest) = split_raw_text(after, name);
            let title = decode_entities(raw)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            self.title = Some(title);
            return rest;
        }

        // Head content other than the title is not displayed.
        match (name, tag.end) {
            ("head", false) => {
                self.in_head = true;
                return after;
            },
            ("head", true) | ("body", false) => self.in_head = false,
            _ if self.in_head => return after,
            _ => {},
        }

        match (name, tag.end) {
            ("a", false) => {
                if let Some(href) = tag.attr("href") {
                    self.open_anchor(href);
                }
            },
            ("a", true) => self.close_anchor(),
            ("img", false) => {
                if let Some(src) = tag.attr("src") {
                    self.push_image(src);
                }
            },
            ("br", false) => self.hard_break(),
            ("pre", false) => {
                self.block_break();
                self.pre_depth += 1;
            },
            ("pre", true) => {
                self.pre_depth = self.pre_depth.saturating_sub(1);
                self.block_break();
            },
            ("td" | "th", true) => self.soft_space(),
            _ if BLOCK_TAGS.contains(&name) => self.block_break(),
            _ => {},
        }
        after
    }

    fn push_text(&mut self, text: &str) {
        if self.in_head {
            return;
        }
        if self.pre_depth > 0 {
            self.flush_space();
            self.chars.extend(text.chars().filter(|&c| c != '\r'));
            return;
        }
        for c in text.chars() {
            if c.is_whitespace() && c != '\u{00A0}' {
                self.soft_space();
            } else {
                self.flush_space();
                self.chars.push(c);
            }
        }
    }

    /// Request a separating space unless the line is empty or already
    /// ends in one.
    fn soft_space(&mut self) {
        if self.chars.last().is_some_and(|&l| l != '\n' && l != ' ') {
            self.pending_space = true;
        }
    }

    fn flush_space(&mut self) {
        if std::mem::take(&mut self.pending_space) {
            self.chars.push(' ');
        }
    }

    fn hard_break(&mut self) {
        self.pending_space = false;
        self.chars.push('\n');
    }

    fn block_break(&mut self) {
        self.pending_space = false;
        if self.chars.last().is_some_and(|&l| l != '\n') {
            self.chars.push('\n');
        }
    }

    fn open_anchor(&mut self, href: &str) {
        self.close_anchor();
        self.flush_space();
        self.open_anchor = Some((self.chars.len(), href.to_string()));
    }

    fn close_anchor(&mut self) {
        if let Some((start, href)) = self.open_anchor.take() {
            let end = self.chars.len();
            if end > start {
                self.anchors.push(AnchorSpan { start, end, href });
            }
        }
    }

    fn push_image(&mut self, src: &str) {
        self.flush_space();
        self.images.push(ImageRef {
            offset: self.chars.len(),
            src: src.to_string(),
            image: None,
        });
        self.chars.push(OBJECT_REPLACEMENT);
    }

    fn finish(mut self) -> TextDocument {
        self.close_anchor();
        while self.chars.last() == Some(&'\n') {
            self.chars.pop();
        }
        let len = self.chars.len();
        for anchor in &mut self.anchors {
            anchor.end = anchor.end.min(len);
        }
        self.anchors.retain(|a| a.end > a.start);
        TextDocument::from_parts(self.chars, self.anchors, self.images, self.title)
    }
}
