//! Toolkit-agnostic pointer input types.
//!
//! The host toolkit maps its native mouse/touch events to these types before
//! handing them to a widget. Coordinates are widget-relative pixels.

use serde::{Deserialize, Serialize};

/// A toolkit-agnostic input event delivered to a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A pointer button was pressed.
    PointerPress(PointerEvent),
    /// A pointer button was released.
    PointerRelease(PointerEvent),
    /// Mouse wheel moved by `delta` notches (positive scrolls down).
    Wheel { delta: i32 },
    /// The widget's viewport was resized.
    Resize { width: u32, height: u32 },
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
}

impl MouseButton {
    /// Whether this is the primary (left) button.
    pub fn is_primary(self) -> bool {
        self == MouseButton::Left
    }
}

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// A single pointer press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub button: MouseButton,
    pub x: i32,
    pub y: i32,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Primary-button event with no modifiers.
    pub fn primary(x: i32, y: i32) -> Self {
        Self {
            button: MouseButton::Left,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
