//! Error types for Vellum.

use std::io;

/// Errors produced by the Vellum crates.
///
/// UI-facing pane operations never return these; they fall back silently
/// (see the pane module docs). Library plumbing such as configuration
/// loading, resource fetching and synchronous marshaling does.
#[derive(Debug, thiserror::Error)]
pub enum PaneError {
    #[error("config error: {0}")]
    Config(String),

    #[error("resource error: {0}")]
    Resource(String),

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("marshaled task did not complete: event loop closed or task panicked")]
    TaskAborted,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PaneError>;
