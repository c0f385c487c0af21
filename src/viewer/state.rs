//! Viewer state and the cursor operations that drive it.
//!
//! All positions are measured in runes. After every operation the cursor line is within the
//! document and the cursor column is within its line (0 for empty lines); `goal_col`
//! remembers the column the user intended so vertical motion over short lines can come back to
//! it.

use crate::clipboard::Clipboard;
use crate::file_handler::LineStore;
use crate::input::SearchDirection;
use crate::viewer::geometry::Viewport;
use crate::viewer::search::SearchState;
use crate::viewer::selection::{Position, Selection, SelectionMode};
use log::{debug, warn};

/// Startup options that affect viewer state.
#[derive(Debug, Clone, Copy)]
pub struct ViewerOptions {
    pub line_numbers: bool,
    pub wrap: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            line_numbers: true,
            wrap: false,
        }
    }
}

/// Status line information
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusLine {
    /// Transient message such as "copied" or "no matches"
    pub message: Option<String>,
    /// Search prompt being edited, if any
    pub search_prompt: Option<(SearchDirection, String)>,
}

impl StatusLine {
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn set_search_prompt(&mut self, direction: SearchDirection, buffer: impl Into<String>) {
        self.search_prompt = Some((direction, buffer.into()));
    }

    pub fn clear_search_prompt(&mut self) {
        self.search_prompt = None;
    }

    pub fn is_prompting(&self) -> bool {
        self.search_prompt.is_some()
    }
}

/// The log viewer: lines, cursor, scroll, search and selection.
#[derive(Debug)]
pub struct Viewer {
    lines: LineStore,
    cursor: Position,
    goal_col: usize,
    top_line: usize,
    top_segment: usize,
    h_offset: usize,
    wrap: bool,
    line_numbers: bool,
    viewport: Viewport,
    pub(super) selection: Selection,
    pub(super) search: SearchState,
    pub(super) status: StatusLine,
}

fn offset(base: usize, delta: isize) -> usize {
    if delta < 0 {
        base.saturating_sub(delta.unsigned_abs())
    } else {
        base.saturating_add(delta as usize)
    }
}

impl Viewer {
    pub fn new(lines: LineStore, options: ViewerOptions) -> Self {
        Self {
            lines,
            cursor: Position::default(),
            goal_col: 0,
            top_line: 0,
            top_segment: 0,
            h_offset: 0,
            wrap: options.wrap,
            line_numbers: options.line_numbers,
            viewport: Viewport::default(),
            selection: Selection::Inactive,
            search: SearchState::default(),
            status: StatusLine::default(),
        }
    }

    pub fn lines(&self) -> &LineStore {
        &self.lines
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn goal_column(&self) -> usize {
        self.goal_col
    }

    /// First visible line and its first visible segment.
    pub fn scroll_top(&self) -> (usize, usize) {
        (self.top_line, self.top_segment)
    }

    pub fn h_offset(&self) -> usize {
        self.h_offset
    }

    pub fn wrap(&self) -> bool {
        self.wrap
    }

    pub fn line_numbers(&self) -> bool {
        self.line_numbers
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusLine {
        &mut self.status
    }

    pub(super) fn set_scroll(&mut self, top_line: usize, top_segment: usize, h_offset: usize) {
        self.top_line = top_line;
        self.top_segment = top_segment;
        self.h_offset = h_offset;
    }

    /// Largest valid column on `line`.
    fn max_col(&self, line: usize) -> usize {
        self.lines.rune_len(line).saturating_sub(1)
    }

    pub(super) fn clamp_cursor(&mut self) {
        let last = self.lines.last_index().unwrap_or(0);
        self.cursor.line = self.cursor.line.min(last);
        self.cursor.col = self.cursor.col.min(self.max_col(self.cursor.line));
    }

    /// Move to `position`, clamped, remembering its column as the goal.
    pub(super) fn jump_to(&mut self, position: Position) {
        self.cursor = position;
        self.clamp_cursor();
        self.goal_col = self.cursor.col;
    }

    /// Move to `line`, landing on the goal column or the end of a shorter line.
    fn move_to_line(&mut self, line: usize) {
        let last = self.lines.last_index().unwrap_or(0);
        self.cursor.line = line.min(last);
        self.cursor.col = self.goal_col.min(self.max_col(self.cursor.line));
    }

    /// Move the cursor `delta` lines, keeping the goal column.
    pub fn move_cursor(&mut self, delta: isize) {
        self.status.clear_message();
        self.move_to_line(offset(self.cursor.line, delta));
    }

    /// Move the cursor `delta` columns within its line.
    pub fn move_cursor_col(&mut self, delta: isize) {
        self.status.clear_message();
        let col = offset(self.cursor.col, delta).min(self.max_col(self.cursor.line));
        self.cursor.col = col;
        self.goal_col = col;
    }

    pub fn line_start(&mut self) {
        self.status.clear_message();
        self.cursor.col = 0;
        self.goal_col = 0;
    }

    pub fn line_end(&mut self) {
        self.status.clear_message();
        let col = self.max_col(self.cursor.line);
        self.cursor.col = col;
        self.goal_col = col;
    }

    /// Move a page of rows (one row of context kept) in direction `dir`.
    pub fn page(&mut self, dir: isize) {
        let rows = self.viewport.page_size() as isize;
        self.move_cursor(dir.signum() * rows);
    }

    pub fn cursor_top(&mut self) {
        self.status.clear_message();
        self.cursor = Position::default();
        self.goal_col = 0;
    }

    pub fn cursor_bottom(&mut self) {
        self.status.clear_message();
        self.cursor = Position::new(self.lines.last_index().unwrap_or(0), 0);
        self.goal_col = 0;
    }

    /// Turn soft wrapping on or off; scroll offsets inside a line are reset.
    pub fn toggle_wrap(&mut self) {
        self.wrap = !self.wrap;
        self.h_offset = 0;
        self.top_segment = 0;
        debug!("wrap {}", if self.wrap { "on" } else { "off" });
    }

    pub fn toggle_line_numbers(&mut self) {
        self.line_numbers = !self.line_numbers;
    }

    /// Start selecting in `mode`, or stop when that mode is already active.
    ///
    /// Switching to a different mode re-anchors at the cursor. Block selections anchor at the
    /// goal column.
    pub fn toggle_selection(&mut self, mode: SelectionMode) {
        if self.selection.mode() == Some(mode) {
            self.clear_selection();
            return;
        }
        let col = match mode {
            SelectionMode::Block => self.goal_col,
            SelectionMode::Char | SelectionMode::Line => self.cursor.col,
        };
        self.selection = Selection::Active {
            mode,
            anchor: Position::new(self.cursor.line, col),
        };
        self.status.clear_message();
    }

    pub fn clear_selection(&mut self) {
        if self.selection.is_active() {
            self.selection = Selection::Inactive;
            self.status.set_message("selection cleared");
        }
    }

    /// The moving end of the active selection.
    pub fn selection_endpoint(&self) -> Position {
        self.selection.endpoint(self.cursor, self.goal_col)
    }

    /// Text covered by the selection, lines joined with `\n`.
    pub fn selected_text(&self) -> Option<String> {
        let endpoint = self.selection_endpoint();
        let (first, last) = self.selection.line_bounds(endpoint)?;
        let text = (first..=last)
            .map(|line| {
                match self
                    .selection
                    .range_for_line(line, self.lines.rune_len(line), endpoint)
                {
                    Some(range) => self.lines.rune_slice(line, range.start, range.end),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        Some(text)
    }

    /// Copy the selection to `clipboard`. The selection stays active.
    pub fn copy_selection(&mut self, clipboard: &mut dyn Clipboard) {
        let Some(text) = self.selected_text() else {
            self.status.set_message("no selection");
            return;
        };
        match clipboard.write(&text) {
            Ok(()) => {
                debug!("copied {} bytes to clipboard", text.len());
                self.status.set_message("copied");
            }
            Err(err) => {
                warn!("clipboard write failed: {err}");
                self.status.set_message("clipboard failed");
            }
        }
    }

    /// Append lines produced by follow mode.
    ///
    /// A cursor sitting on the last line moves to the new last line; otherwise cursor and
    /// scroll stay put. New lines matching the active query join the match list.
    pub fn append_lines(&mut self, batch: Vec<String>) {
        if batch.is_empty() {
            return;
        }
        let tracking = self
            .lines
            .last_index()
            .map_or(true, |last| self.cursor.line >= last);
        let first = self.lines.extend(batch);
        self.search.extend_matches(&self.lines, first);
        if tracking {
            self.cursor = Position::new(self.lines.last_index().unwrap_or(0), 0);
            self.goal_col = 0;
        }
    }

    /// Append the empty marker line inserted when Enter is pressed in follow mode.
    pub fn insert_marker(&mut self) {
        self.append_lines(vec![String::new()]);
    }
}
