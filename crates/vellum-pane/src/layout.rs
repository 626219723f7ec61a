//! Monospace line layout and hit testing.
//!
//! Every character is `glyph_width` pixels wide and every line
//! `line_height` pixels tall. With wrapping on, paragraphs break at the last
//! space that fits, or mid-word when a single word is wider than the
//! viewport. Coordinates here are document coordinates; the widget adds
//! the scroll offset before asking.

use crate::document::TextDocument;

/// One visual line: document offsets `[start, end)`, excluding any
/// terminating line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    lines: Vec<Line>,
    glyph_width: i32,
    line_height: i32,
}

impl TextLayout {
    /// Lay out `doc`. `wrap_columns` is the number of glyphs per line, or
    /// `None` for no wrapping.
    pub fn new(
        doc: &TextDocument,
        wrap_columns: Option<usize>,
        glyph_width: i32,
        line_height: i32,
    ) -> Self {
        let chars = doc.chars();
        let mut lines = Vec::new();
        let mut para_start = 0;

        for (i, &c) in chars.iter().enumerate() {
            if c == '\n' {
                wrap_paragraph(chars, para_start, i, wrap_columns, &mut lines);
                para_start = i + 1;
            }
        }
        wrap_paragraph(chars, para_start, chars.len(), wrap_columns, &mut lines);

        Self {
            lines,
            glyph_width: glyph_width.max(1),
            line_height: line_height.max(1),
        }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    pub fn content_height(&self) -> i32 {
        i32::try_from(self.lines.len())
            .unwrap_or(i32::MAX)
            .saturating_mul(self.line_height)
    }

    /// Index of the line holding cursor position `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.lines
            .partition_point(|l| l.start <= offset)
            .saturating_sub(1)
    }

    /// Top edge of line `index`.
    pub fn line_top(&self, index: usize) -> i32 {
        i32::try_from(index)
            .unwrap_or(i32::MAX)
            .saturating_mul(self.line_height)
    }

    /// Top edge of the line holding `offset`.
    pub fn offset_top(&self, offset: usize) -> i32 {
        self.line_top(self.line_of(offset))
    }

    /// The character directly under `(x, y)`, if any.
    pub fn offset_at(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let line = self.lines.get(usize::try_from(y / self.line_height).ok()?)?;
        let offset = line.start + usize::try_from(x / self.glyph_width).ok()?;
        (offset < line.end).then_some(offset)
    }

    /// The cursor position nearest to `(x, y)`. Points outside the text
    /// clamp to the nearest line and column.
    pub fn cursor_at(&self, x: i32, y: i32) -> usize {
        let last = self.lines.len().saturating_sub(1);
        let index = usize::try_from(y.max(0) / self.line_height)
            .unwrap_or(0)
            .min(last);
        let Some(line) = self.lines.get(index) else {
            return 0;
        };
        let column = usize::try_from((x.max(0) + self.glyph_width / 2) / self.glyph_width)
            .unwrap_or(0);
        (line.start + column).min(line.end)
    }
}

fn wrap_paragraph(
    chars: &[char],
    start: usize,
    end: usize,
    columns: Option<usize>,
    lines: &mut Vec<Line>,
) {
    let Some(columns) = columns.map(|c| c.max(1)) else {
        lines.push(Line { start, end });
        return;
    };

    let mut line_start = start;
    while end - line_start > columns {
        let limit = line_start + columns;
        let space = chars[line_start..=limit]
            .iter()
            .rposition(|&c| c == ' ')
            .filter(|&p| p > 0);
        match space {
            // The space stays at the end of the line it breaks.
            Some(p) => {
                lines.push(Line {
                    start: line_start,
                    end: line_start + p + 1,
                });
                line_start += p + 1;
            },
            None => {
                lines.push(Line {
                    start: line_start,
                    end: limit,
                });
                line_start = limit;
            },
        }
    }
    lines.push(Line {
        start: line_start,
        end,
    });
}
