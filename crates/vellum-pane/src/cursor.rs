//! Text cursor with an anchor/position selection model.

/// Whether a move drags the selection anchor along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveMode {
    /// Collapse the selection onto the new position.
    #[default]
    MoveAnchor,
    /// Keep the anchor where it is, extending the selection.
    KeepAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOperation {
    Start,
    End,
    Left,
    Right,
}

/// A cursor over `[0, len]` cursor positions. The selection spans from
/// `anchor` to `position` in either direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCursor {
    anchor: usize,
    position: usize,
}

impl TextCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Place the cursor at `pos`, clamped to `doc_len`.
    pub fn set_position(&mut self, pos: usize, mode: MoveMode, doc_len: usize) {
        self.position = pos.min(doc_len);
        if mode == MoveMode::MoveAnchor {
            self.anchor = self.position;
        }
    }

    /// Apply `op` `n` times. Moves stop at the document bounds.
    pub fn move_position(&mut self, op: MoveOperation, mode: MoveMode, n: usize, doc_len: usize) {
        let target = match op {
            MoveOperation::Start => 0,
            MoveOperation::End => doc_len,
            MoveOperation::Left => self.position.saturating_sub(n),
            MoveOperation::Right => self.position.saturating_add(n),
        };
        self.set_position(target, mode, doc_len);
    }

    pub fn has_selection(&self) -> bool {
        self.anchor != self.position
    }

    pub fn selection_start(&self) -> usize {
        self.anchor.min(self.position)
    }

    pub fn selection_end(&self) -> usize {
        self.anchor.max(self.position)
    }

    /// Collapse the selection onto the current position.
    pub fn clear_selection(&mut self) {
        self.anchor = self.position;
    }

    pub fn select_all(&mut self, doc_len: usize) {
        self.anchor = 0;
        self.position = doc_len;
    }
}
