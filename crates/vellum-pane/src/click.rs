//! Press/release link activation tracking.
//!
//! A link is activated only when the primary button is pressed and released
//! over the same anchor. Anything else (dragging off a link to select text,
//! releasing on a different link, releasing on plain text) falls through to
//! the renderer's default handling.

use vellum_types::input::MouseButton;

/// Gesture state between a press and the following release.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClickState {
    #[default]
    Idle,
    /// Primary button went down over this anchor.
    Pending(String),
}

/// What the widget should do with a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseAction {
    /// Consume the release and emit a link activation for this anchor.
    Activate(String),
    /// Hand the release to the default handler.
    Default,
}

/// Turns raw press/release pairs into link activations.
#[derive(Debug, Default)]
pub struct ClickAnchorTracker {
    state: ClickState,
}

impl ClickAnchorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ClickState {
        &self.state
    }

    /// Record a press. `anchor` is the anchor under the pointer, if any.
    ///
    /// Presses of other buttons leave the state alone; the release that
    /// ends them resets it anyway.
    pub fn press(&mut self, button: MouseButton, listening: bool, anchor: Option<&str>) {
        if !button.is_primary() {
            return;
        }
        self.state = match anchor {
            Some(a) if listening && !a.is_empty() => ClickState::Pending(a.to_string()),
            _ => ClickState::Idle,
        };
    }

    /// Record a release and decide whether it completes a link click.
    /// The state is always `Idle` afterwards.
    pub fn release(
        &mut self,
        button: MouseButton,
        listening: bool,
        anchor: Option<&str>,
    ) -> ReleaseAction {
        let ClickState::Pending(pending) = std::mem::take(&mut self.state) else {
            return ReleaseAction::Default;
        };
        let matches = anchor.is_some_and(|a| !a.is_empty() && a == pending);
        if listening && button.is_primary() && matches {
            ReleaseAction::Activate(pending)
        } else {
            ReleaseAction::Default
        }
    }

    /// Drop any pending gesture.
    pub fn reset(&mut self) {
        self.state = ClickState::Idle;
    }
}
