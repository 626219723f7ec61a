//! Pane configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use vellum_types::error::{PaneError, Result};

use crate::resource::{ImageLimits, MAX_IMAGE_BYTES, MAX_IMAGE_SIDE};

/// Construction-time settings for a [`BrowserPane`](crate::BrowserPane).
///
/// Every field has a default, so a TOML file only needs to name what it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaneConfig {
    // Viewport
    pub viewport_width: i32,
    pub viewport_height: i32,

    // Monospace metrics
    pub glyph_width: i32,
    pub line_height: i32,

    /// Start editable instead of read-only.
    pub editable: bool,
    /// Wrap lines at the viewport width.
    pub line_wrap: bool,
    /// Action command carried by link events.
    pub action_command: String,

    // Inline image limits
    pub max_image_bytes: usize,
    pub max_image_side: u32,
}

impl Default for PaneConfig {
    fn default() -> Self {
        Self {
            viewport_width: 640,
            viewport_height: 480,
            glyph_width: 8,
            line_height: 16,
            editable: false,
            line_wrap: true,
            action_command: String::new(),
            max_image_bytes: MAX_IMAGE_BYTES,
            max_image_side: MAX_IMAGE_SIDE,
        }
    }
}

impl PaneConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Pretty JSON dump, for diagnostics.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.glyph_width <= 0 {
            return Err(PaneError::Config(format!(
                "glyph_width must be positive, was {}",
                self.glyph_width
            )));
        }
        if self.line_height <= 0 {
            return Err(PaneError::Config(format!(
                "line_height must be positive, was {}",
                self.line_height
            )));
        }
        if self.viewport_width < 0 || self.viewport_height < 0 {
            return Err(PaneError::Config(format!(
                "viewport must not be negative, was {}x{}",
                self.viewport_width, self.viewport_height
            )));
        }
        Ok(())
    }

    pub fn image_limits(&self) -> ImageLimits {
        ImageLimits {
            max_bytes: self.max_image_bytes,
            max_side: self.max_image_side,
        }
    }
}
