//! Selection model and per-line range resolution.
//!
//! A selection is either inactive or an active mode with its anchor; the cursor is always the
//! moving endpoint. Ranges are resolved from anchor and cursor every time they are needed, so
//! the highlighted text and the copied text can never disagree.

use std::ops::Range;

/// A document position in line index and rune column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// The three selection shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Continuous run of characters in document order
    Char,
    /// Whole lines
    Line,
    /// Rectangle of columns
    Block,
}

impl SelectionMode {
    /// Label shown in the status line.
    pub fn label(self) -> &'static str {
        match self {
            SelectionMode::Char => "visual",
            SelectionMode::Line => "visual-line",
            SelectionMode::Block => "visual-block",
        }
    }
}

/// Current selection state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Inactive,
    Active {
        mode: SelectionMode,
        anchor: Position,
    },
}

impl Selection {
    pub fn mode(&self) -> Option<SelectionMode> {
        match self {
            Selection::Inactive => None,
            Selection::Active { mode, .. } => Some(*mode),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Selection::Active { .. })
    }

    /// Inclusive line interval covered by the selection.
    ///
    /// `cursor` is the moving endpoint as reported by [`Selection::endpoint`].
    pub fn line_bounds(&self, cursor: Position) -> Option<(usize, usize)> {
        match self {
            Selection::Inactive => None,
            Selection::Active { anchor, .. } => Some((
                anchor.line.min(cursor.line),
                anchor.line.max(cursor.line),
            )),
        }
    }

    /// The moving endpoint for this selection.
    ///
    /// Block selections follow the goal column so the rectangle keeps its width while the
    /// cursor snaps to the ends of shorter lines.
    pub fn endpoint(&self, cursor: Position, goal_col: usize) -> Position {
        match self {
            Selection::Active {
                mode: SelectionMode::Block,
                ..
            } => Position::new(cursor.line, goal_col),
            _ => cursor,
        }
    }

    /// Selected rune range on `line`, whose length is `line_len` runes.
    ///
    /// Returns `None` when the line is outside the selection or contributes no characters.
    /// Whole-line selections return `0..line_len` even for empty lines.
    pub fn range_for_line(
        &self,
        line: usize,
        line_len: usize,
        endpoint: Position,
    ) -> Option<Range<usize>> {
        let Selection::Active { mode, anchor } = *self else {
            return None;
        };
        let (first, last) = self.line_bounds(endpoint)?;
        if line < first || line > last {
            return None;
        }

        let clip = |start: usize, end_inclusive: usize| -> Option<Range<usize>> {
            let end = (end_inclusive + 1).min(line_len);
            (start < end).then_some(start..end)
        };

        match mode {
            SelectionMode::Line => Some(0..line_len),
            SelectionMode::Block => {
                let lo = anchor.col.min(endpoint.col);
                let hi = anchor.col.max(endpoint.col);
                clip(lo, hi)
            }
            SelectionMode::Char => {
                let (start, end) = if anchor <= endpoint {
                    (anchor, endpoint)
                } else {
                    (endpoint, anchor)
                };
                if start.line == end.line {
                    clip(start.col, end.col)
                } else if line == start.line {
                    (start.col < line_len).then_some(start.col..line_len)
                } else if line == end.line {
                    clip(0, end.col)
                } else {
                    Some(0..line_len)
                }
            }
        }
    }
}
