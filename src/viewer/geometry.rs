//! Viewport geometry and scroll arithmetic.
//!
//! With wrapping on, each line occupies `ceil(runes / width)` display segments (at least one,
//! also for empty lines). Scrolling works on the global segment index: the number of segments
//! that precede a `(line, segment)` pair in the whole document. With wrapping off every line is
//! exactly one segment and horizontal scrolling takes over.

use super::state::Viewer;

/// Terminal size used when the real one cannot be determined.
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(FALLBACK_SIZE.0, FALLBACK_SIZE.1)
    }
}

impl Viewport {
    /// Zero dimensions fall back to the default terminal size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: if width == 0 { FALLBACK_SIZE.0 } else { width },
            height: if height == 0 { FALLBACK_SIZE.1 } else { height },
        }
    }

    /// Rows available for text: everything but the status row.
    pub fn content_height(&self) -> usize {
        usize::from(self.height).saturating_sub(1).max(1)
    }

    /// Rows moved by a page motion, keeping one row of context.
    pub fn page_size(&self) -> usize {
        self.content_height().saturating_sub(1).max(1)
    }
}

/// Number of decimal digits needed to print `n`.
pub fn digit_count(mut n: usize) -> usize {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

impl Viewer {
    /// Width of the line-number column, excluding its separating space.
    pub fn gutter_width(&self) -> usize {
        digit_count(self.lines().len())
    }

    /// Columns to the left of the text area.
    pub fn text_offset(&self) -> usize {
        if self.line_numbers() {
            self.gutter_width() + 1
        } else {
            0
        }
    }

    /// Columns available for line text.
    pub fn content_width(&self) -> usize {
        usize::from(self.viewport().width)
            .saturating_sub(self.text_offset())
            .max(1)
    }

    pub fn content_height(&self) -> usize {
        self.viewport().content_height()
    }

    /// Display segments occupied by `line`.
    pub fn segment_count(&self, line: usize) -> usize {
        if !self.wrap() {
            return 1;
        }
        self.lines().rune_len(line).div_ceil(self.content_width()).max(1)
    }

    /// Rune range shown by segment `segment` of `line`.
    ///
    /// With wrapping off this is the horizontally scrolled window.
    pub fn segment_range(&self, line: usize, segment: usize) -> std::ops::Range<usize> {
        let width = self.content_width();
        let len = self.lines().rune_len(line);
        let start = if self.wrap() {
            segment * width
        } else {
            self.h_offset()
        };
        let start = start.min(len);
        start..(start + width).min(len)
    }

    /// Segment of the cursor line that contains the cursor.
    pub fn cursor_segment(&self) -> usize {
        if self.wrap() {
            self.cursor().col / self.content_width()
        } else {
            0
        }
    }

    /// Number of segments before `(line, segment)` in the whole document.
    pub fn global_segment(&self, line: usize, segment: usize) -> usize {
        if !self.wrap() {
            return line + segment;
        }
        (0..line).map(|l| self.segment_count(l)).sum::<usize>() + segment
    }

    /// Inverse of [`Viewer::global_segment`], clamped to the last segment of the document.
    pub fn from_global_segment(&self, mut index: usize) -> (usize, usize) {
        let Some(last) = self.lines().last_index() else {
            return (0, 0);
        };
        if !self.wrap() {
            return (index.min(last), 0);
        }
        for line in 0..=last {
            let count = self.segment_count(line);
            if index < count {
                return (line, index);
            }
            index -= count;
        }
        (last, self.segment_count(last) - 1)
    }

    /// Clamp the cursor and scroll the view so the cursor is visible.
    ///
    /// Called before every draw; viewport or gutter changes since the last draw are absorbed
    /// here.
    pub fn ensure_cursor_visible(&mut self) {
        self.clamp_cursor();
        if self.lines().is_empty() {
            self.set_scroll(0, 0, 0);
            return;
        }

        let height = self.content_height();
        let (top, top_segment) = self.scroll_top();
        let mut first = self.global_segment(top, top_segment);
        let cursor = self.global_segment(self.cursor().line, self.cursor_segment());
        if cursor < first {
            first = cursor;
        } else if cursor >= first + height {
            first = cursor + 1 - height;
        }
        let (top, top_segment) = self.from_global_segment(first);

        let h_offset = if self.wrap() {
            0
        } else {
            let width = self.content_width();
            let col = self.cursor().col;
            let mut offset = self.h_offset();
            if col < offset {
                offset = col;
            } else if col >= offset + width {
                offset = col + 1 - width;
            }
            let max_offset = self
                .lines()
                .rune_len(self.cursor().line)
                .saturating_sub(width);
            offset.min(max_offset)
        };

        self.set_scroll(top, top_segment, h_offset);
    }

    /// Cursor position relative to the top-left of the text area.
    pub fn cursor_screen_offset(&self) -> (usize, usize) {
        let (top, top_segment) = self.scroll_top();
        let first = self.global_segment(top, top_segment);
        let cursor = self.global_segment(self.cursor().line, self.cursor_segment());
        let row = cursor.saturating_sub(first).min(self.content_height() - 1);

        let width = self.content_width();
        let col = if self.wrap() {
            self.cursor().col % width
        } else {
            self.cursor().col.saturating_sub(self.h_offset())
        };
        (row, col.min(width - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_handler::LineStore;
    use crate::viewer::ViewerOptions;

    fn viewer(lines: &[&str], width: u16, height: u16, wrap: bool) -> Viewer {
        let store = LineStore::new(lines.iter().map(|s| s.to_string()).collect());
        let mut viewer = Viewer::new(
            store,
            ViewerOptions {
                line_numbers: false,
                wrap,
            },
        );
        viewer.set_viewport(Viewport::new(width, height));
        viewer
    }

    #[test]
    fn digit_counts() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(12345), 5);
    }

    #[test]
    fn zero_size_falls_back() {
        assert_eq!(Viewport::new(0, 0), Viewport::new(80, 24));
        assert_eq!(Viewport::new(10, 1).content_height(), 1);
        assert_eq!(Viewport::new(10, 2).page_size(), 1);
        assert_eq!(Viewport::new(10, 12).page_size(), 10);
    }

    #[test]
    fn line_numbers_narrow_the_text_area() {
        let mut v = viewer(&["a"; 120], 20, 10, false);
        assert_eq!(v.content_width(), 20);
        v.toggle_line_numbers();
        assert_eq!(v.gutter_width(), 3);
        assert_eq!(v.content_width(), 16);
    }

    #[test]
    fn wrapped_segments_and_global_index() {
        let v = viewer(&["0123456789", "", "abcd"], 4, 10, true);
        assert_eq!(v.segment_count(0), 3);
        assert_eq!(v.segment_count(1), 1);
        assert_eq!(v.segment_count(2), 1);
        assert_eq!(v.global_segment(2, 0), 4);
        assert_eq!(v.from_global_segment(4), (2, 0));
        assert_eq!(v.from_global_segment(2), (0, 2));
        assert_eq!(v.from_global_segment(99), (2, 0));
        assert_eq!(v.segment_range(0, 2), 8..10);
    }

    #[test]
    fn scrolls_down_to_keep_cursor_visible() {
        let lines: Vec<String> = (0..50).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut v = viewer(&refs, 40, 6, false);
        v.move_cursor(20);
        v.ensure_cursor_visible();
        assert_eq!(v.scroll_top(), (16, 0));
        assert_eq!(v.cursor_screen_offset(), (4, 0));

        v.move_cursor(-18);
        v.ensure_cursor_visible();
        assert_eq!(v.scroll_top(), (2, 0));
    }

    #[test]
    fn wrapped_cursor_segment_drives_scroll() {
        let mut v = viewer(&["0123456789abcdef", "x"], 4, 3, true);
        v.line_end();
        v.ensure_cursor_visible();
        // cursor sits in segment 3 of line 0, two content rows
        assert_eq!(v.cursor_segment(), 3);
        assert_eq!(v.scroll_top(), (0, 2));
        assert_eq!(v.cursor_screen_offset(), (1, 3));
    }

    #[test]
    fn horizontal_offset_clamps_to_cursor_line() {
        let mut v = viewer(&["0123456789abcdefghij", "short"], 8, 5, false);
        v.line_end();
        v.ensure_cursor_visible();
        assert_eq!(v.h_offset(), 12);
        assert_eq!(v.cursor_screen_offset(), (0, 7));

        v.move_cursor(1);
        v.ensure_cursor_visible();
        assert_eq!(v.h_offset(), 0);
    }
}
