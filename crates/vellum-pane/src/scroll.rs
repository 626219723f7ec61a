//! Vertical scroll bar state for the text viewport.

/// Pixels scrolled per mouse wheel notch.
pub const SCROLL_WHEEL: i32 = 48;

/// Vertical scroll bar of a text viewport.
///
/// The value always stays within `[0, max_scroll()]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    /// Current vertical scroll offset in pixels.
    pub scroll_y: i32,
    /// Total content height (from layout).
    pub content_height: i32,
    /// Visible viewport height.
    pub viewport_height: i32,
}

impl ScrollState {
    pub fn new(viewport_height: i32) -> Self {
        Self {
            scroll_y: 0,
            content_height: 0,
            viewport_height,
        }
    }

    /// Scroll by mouse wheel notches.
    pub fn wheel_scroll(&mut self, delta: i32) {
        self.scroll_y = self.scroll_y.saturating_add(delta.saturating_mul(SCROLL_WHEEL));
        self.clamp();
    }

    /// Scroll the minimum distance needed to make `[target_y,
    /// target_y + target_height)` visible.
    pub fn ensure_visible(&mut self, target_y: i32, target_height: i32) {
        let visible_bottom = self.scroll_y + self.viewport_height;
        if target_y < self.scroll_y {
            self.scroll_y = target_y;
        } else if target_y + target_height > visible_bottom {
            self.scroll_y = target_y + target_height - self.viewport_height;
        } else {
            return;
        }
        self.clamp();
    }

    /// Move to the scroll bar minimum.
    pub fn scroll_to_top(&mut self) {
        self.scroll_y = 0;
    }

    /// Move to the scroll bar maximum.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_y = self.max_scroll();
    }

    /// Update content height (after layout).
    pub fn set_content_height(&mut self, height: i32) {
        self.content_height = height;
        self.clamp();
    }

    /// Update viewport height (after resize).
    pub fn set_viewport_height(&mut self, height: i32) {
        self.viewport_height = height;
        self.clamp();
    }

    /// Scroll bar maximum.
    pub fn max_scroll(&self) -> i32 {
        (self.content_height - self.viewport_height).max(0)
    }

    fn clamp(&mut self) {
        self.scroll_y = self.scroll_y.clamp(0, self.max_scroll());
    }

    /// Reset for a new document.
    pub fn reset(&mut self) {
        self.scroll_y = 0;
        self.content_height = 0;
    }
}
