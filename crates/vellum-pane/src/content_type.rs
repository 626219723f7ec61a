//! File extension to MIME type resolution.
//!
//! The lookup table is built once on first use and never mutated
//! afterwards. Unknown or missing extensions resolve to `text/html`, which
//! makes the renderer treat the content as markup.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

/// Content type used when nothing better is known.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Lowercase extension (no leading dot) => MIME type.
static CONTENT_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("bmp", "image/bmp"),
        ("bz", "application/x-bzip"),
        ("bz2", "application/x-bzip2"),
        ("c", "text/plain"),
        ("cc", "text/plain"),
        ("com", "application/octet-stream"),
        ("cpp", "text/plain"),
        ("css", "text/css"),
        ("doc", "application/msword"),
        ("dot", "application/msword"),
        ("exe", "application/octet-stream"),
        ("gif", "image/gif"),
        ("gz", "application/x-gzip"),
        ("gzip", "application/x-gzip"),
        ("h", "text/plain"),
        ("hh", "text/plain"),
        ("hpp", "text/plain"),
        ("htm", "text/html"),
        ("html", "text/html"),
        ("htmls", "text/html"),
        ("ico", "image/x-icon"),
        ("inf", "text/plain"),
        ("jar", "application/octet-stream"),
        ("jav", "text/plain"),
        ("java", "text/plain"),
        ("jpe", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("jpg", "image/jpeg"),
        ("mid", "audio/midi"),
        ("midi", "audio/midi"),
        ("mod", "audio/mod"),
        ("mov", "video/quicktime"),
        ("mp3", "text/plain"),
        ("mpg", "video/mpeg"),
        ("o", "application/octet-stream"),
        ("odc", "application/vnd.oasis.opendocument.chart"),
        ("odp", "application/vnd.oasis.opendocument.presentation"),
        ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
        ("odt", "application/vnd.oasis.opendocument.text"),
        ("pct", "image/x-pict"),
        ("pcx", "image/x-pcx"),
        ("pdf", "application/pdf"),
        ("pl", "text/plain"),
        ("pm", "text/plain"),
        ("ppt", "application/powerpoint"),
        ("ps", "application/postscript"),
        ("psd", "application/octet-stream"),
        ("py", "text/plain"),
        ("qt", "video/quicktime"),
        ("ra", "audio/x-realaudio"),
        ("rb", "text/plain"),
        ("rm", "application/vnd.rn-realmedia"),
        ("rtf", "application/rtf"),
        ("s", "text/x-asm"),
        ("sh", "text/plain"),
        ("shtml", "text/html"),
        ("swf", "application/x-shockwave-flash"),
        ("tcl", "application/x-tcl"),
        ("tex", "application/x-tex"),
        ("tgz", "application/x-compressed"),
        ("tif", "image/tiff"),
        ("tiff", "image/tiff"),
        ("txt", "text/plain"),
        ("voc", "audio/voc"),
        ("wav", "audio/wav"),
        ("xls", "application/excel"),
        ("xlt", "application/excel"),
        ("xpm", "image/xpm"),
        ("z", "application/x-compressed"),
        ("zip", "application/zip"),
    ])
});

/// Resolve a file extension to a MIME type.
///
/// The lookup is case-insensitive and only the part after the final `.` is
/// considered, so `".html"`, `"HTML"` and `"archive.tar.GZ"` all work.
/// Empty or unrecognised extensions yield [`DEFAULT_CONTENT_TYPE`].
pub fn resolve(extension: &str) -> &'static str {
    if extension.is_empty() {
        return DEFAULT_CONTENT_TYPE;
    }

    // "foo.BAZ.BaR" => "bar"
    let lower = extension.to_lowercase();
    let ext = match lower.rfind('.') {
        Some(dot) => &lower[dot + 1..],
        None => lower.as_str(),
    };

    CONTENT_TYPES
        .get(ext)
        .copied()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Resolve the content type of a filesystem path from its extension.
pub fn resolve_path(path: &Path) -> &'static str {
    path.extension()
        .map(|ext| resolve(&ext.to_string_lossy()))
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Whether content of this type should be interpreted as markup.
pub fn is_markup(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    essence.eq_ignore_ascii_case("text/html") || essence.eq_ignore_ascii_case("application/xhtml+xml")
}

/// Whether content of this type is some flavour of plain text.
pub fn is_plain_text(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    essence.len() > 5
        && essence
            .get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("text/"))
        && !is_markup(essence)
}
