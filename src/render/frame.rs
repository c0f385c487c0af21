//! Frame composition: viewer state in, exact screen rows out.
//!
//! Each content row is one display segment: gutter, then the segment's runes with rule colors,
//! query highlight and selection merged into runs of identical styling. Rule spans and query
//! ranges are resolved on the whole logical line and then clipped to the segment, so a match
//! broken by wrapping keeps its styling on both rows.

use crate::highlight::palette::sgr_params;
use crate::highlight::{Color, Highlighter, Span, TextStyle};
use crate::render::status::{prompt_cursor_column, status_text};
use crate::render::text::pad_right;
use crate::render::theme::{paint, ColorTheme};
use crate::viewer::Viewer;
use std::ops::Range;

/// Where the status row goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPosition {
    Top,
    #[default]
    Bottom,
}

/// A fully composed screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// One SGR-styled string per terminal row, each exactly as wide as the terminal
    pub rows: Vec<String>,
    /// Cursor cell as `(column, row)`
    pub cursor: (u16, u16),
}

/// Styling of one rune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct CellStyle {
    color: Option<Color>,
    style: Option<TextStyle>,
    query: bool,
    selected: bool,
}

impl CellStyle {
    fn params(&self, theme: &ColorTheme) -> Option<String> {
        let mut parts = Vec::new();
        let query = if self.query {
            theme.query_match.clone()
        } else {
            None
        };
        match query {
            Some(params) => parts.push(params),
            None => parts.extend(sgr_params(self.color, self.style)),
        }
        if self.selected {
            parts.push(theme.selection.clone());
        }
        (!parts.is_empty()).then(|| parts.join(";"))
    }
}

/// Cursor over sorted, non-overlapping ranges, queried with increasing positions.
struct RangeCursor<'a, T> {
    items: &'a [T],
    next: usize,
}

impl<'a, T> RangeCursor<'a, T> {
    fn new(items: &'a [T]) -> Self {
        Self { items, next: 0 }
    }

    fn find(&mut self, pos: usize, range: impl Fn(&T) -> Range<usize>) -> Option<&'a T> {
        let items = self.items;
        while self.next < items.len() && range(&items[self.next]).end <= pos {
            self.next += 1;
        }
        items
            .get(self.next)
            .filter(|item| range(item).contains(&pos))
    }
}

/// Styling inputs of one logical line, in line coordinates.
struct LineStyling {
    line: usize,
    /// Rule spans in bytes
    spans: Vec<Span>,
    /// Query occurrences in runes
    query_ranges: Vec<Range<usize>>,
    /// Selected runes
    selected: Option<Range<usize>>,
}

/// Composes frames from viewer state.
pub struct FrameComposer<'a> {
    pub highlighter: &'a Highlighter,
    pub theme: &'a ColorTheme,
    pub status_position: StatusPosition,
}

impl FrameComposer<'_> {
    /// Compose the screen for `viewer`.
    ///
    /// The viewer's scroll position must already keep the cursor visible
    /// (see [`Viewer::ensure_cursor_visible`]).
    pub fn compose(&self, viewer: &Viewer) -> Frame {
        let viewport = viewer.viewport();
        let width = usize::from(viewport.width);
        let height = viewer.content_height();

        let status = paint(Some(&self.theme.status_bar), &status_text(viewer, width));
        let mut rows = Vec::with_capacity(height + 1);
        let content_top = match self.status_position {
            StatusPosition::Top => {
                rows.push(status.clone());
                1
            }
            StatusPosition::Bottom => 0,
        };

        let (mut line, mut segment) = viewer.scroll_top();
        let mut cached: Option<LineStyling> = None;
        for _ in 0..height {
            let Some(text) = viewer.lines().get(line) else {
                rows.push(" ".repeat(width));
                continue;
            };
            // resolved once per logical line, shared by all of its wrap segments
            let styling = match cached.take() {
                Some(styling) if styling.line == line => styling,
                _ => self.line_styling(viewer, line, text),
            };
            let row = format!(
                "{}{}",
                self.gutter(viewer, line, segment),
                self.segment_text(viewer, text, &styling, segment)
            );
            rows.push(pad_right(&row, width));
            cached = Some(styling);

            segment += 1;
            if segment >= viewer.segment_count(line) {
                line += 1;
                segment = 0;
            }
        }

        let status_row = match self.status_position {
            StatusPosition::Top => 0,
            StatusPosition::Bottom => {
                rows.push(status);
                height
            }
        };

        let cursor = match prompt_cursor_column(viewer, width) {
            Some(col) => (col, status_row),
            None => {
                let (row, col) = viewer.cursor_screen_offset();
                (col + viewer.text_offset(), row + content_top)
            }
        };

        Frame {
            rows,
            cursor: (to_u16(cursor.0), to_u16(cursor.1)),
        }
    }

    /// Line number for the first segment of a line, blank for continuation rows.
    fn gutter(&self, viewer: &Viewer, line: usize, segment: usize) -> String {
        if !viewer.line_numbers() {
            return String::new();
        }
        let width = viewer.gutter_width();
        if segment > 0 {
            return " ".repeat(width + 1);
        }
        let number = format!("{:>width$} ", line + 1);
        paint(self.theme.line_numbers.as_deref(), &number)
    }

    /// Rule spans, query ranges and selection of one logical line.
    fn line_styling(&self, viewer: &Viewer, line: usize, text: &str) -> LineStyling {
        let query_ranges = match self.theme.query_match {
            Some(_) if !self.highlighter.is_plain() => {
                viewer.search().matcher().rune_ranges(text)
            }
            _ => Vec::new(),
        };
        LineStyling {
            line,
            spans: self.highlighter.spans(text),
            query_ranges,
            selected: viewer.selection().range_for_line(
                line,
                viewer.lines().rune_len(line),
                viewer.selection_endpoint(),
            ),
        }
    }

    /// Styled runes of one display segment.
    fn segment_text(
        &self,
        viewer: &Viewer,
        text: &str,
        styling: &LineStyling,
        segment: usize,
    ) -> String {
        let visible = viewer.segment_range(styling.line, segment);
        if visible.is_empty() {
            return String::new();
        }
        let selected = &styling.selected;

        let mut spans_at = RangeCursor::new(&styling.spans);
        let mut queries_at = RangeCursor::new(&styling.query_ranges);
        let mut out = String::new();
        let mut run = String::new();
        let mut run_style = CellStyle::default();

        for (rune, (byte, c)) in text
            .char_indices()
            .enumerate()
            .skip(visible.start)
            .take(visible.len())
        {
            let span = spans_at.find(byte, |s| s.start..s.end);
            let style = CellStyle {
                color: span.and_then(|s| s.color),
                style: span.and_then(|s| s.style),
                query: queries_at.find(rune, Range::clone).is_some(),
                selected: selected.as_ref().is_some_and(|r| r.contains(&rune)),
            };
            if style != run_style && !run.is_empty() {
                out.push_str(&paint(run_style.params(self.theme).as_deref(), &run));
                run.clear();
            }
            run_style = style;
            // control characters would move the terminal cursor
            run.push(if c.is_control() { ' ' } else { c });
        }
        out.push_str(&paint(run_style.params(self.theme).as_deref(), &run));
        out
    }
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
