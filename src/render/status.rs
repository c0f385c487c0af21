//! Status line composition.
//!
//! Left to right: current match ordinal, selection mode, active query, transient message and
//! the key reference, joined with `" | "` and cut to fit. The `current/total` line indicator
//! is right-aligned and never truncated.

use crate::render::text::{pad_left, pad_right, visible_width};
use crate::viewer::Viewer;

/// Key reference shown at the end of the status line.
pub const HELP: &str = "q quit • / ? search • n/N next • h/j/k/l move • w/b/e word • \
                        0/$/I/A line • g/G top/bot • v/V/ctrl-v select • y yank • \
                        L line# • W wrap";

/// `current/total` line indicator.
pub fn line_indicator(viewer: &Viewer) -> String {
    let total = viewer.lines().len();
    let current = if total == 0 {
        0
    } else {
        viewer.cursor().line + 1
    };
    format!("{current}/{total}")
}

/// The left-hand parts of the status line, in display order.
pub fn status_parts(viewer: &Viewer) -> Vec<String> {
    let mut parts = Vec::new();
    if let Some((current, total)) = viewer.match_position() {
        parts.push(format!("match {current}/{total}"));
    }
    if let Some(mode) = viewer.selection().mode() {
        parts.push(mode.label().to_string());
    }
    if !viewer.query().is_empty() {
        parts.push(format!("/{}", viewer.query()));
    }
    if let Some(message) = &viewer.status().message {
        parts.push(message.clone());
    }
    parts.push(HELP.to_string());
    parts
}

/// Plain status text exactly `width` runes wide.
pub fn status_text(viewer: &Viewer, width: usize) -> String {
    if let Some((direction, buffer)) = &viewer.status().search_prompt {
        let prompt = format!("{}{}", direction.to_char(), buffer);
        let visible: String = prompt.chars().take(width).collect();
        return pad_right(&visible, width);
    }

    let indicator = line_indicator(viewer);
    let available = width.saturating_sub(visible_width(&indicator));
    if available < 1 {
        return pad_left(&indicator, width);
    }
    let left: String = status_parts(viewer)
        .join(" | ")
        .chars()
        .take(available)
        .collect();
    format!("{}{indicator}", pad_right(&left, available))
}

/// Column of the prompt cursor on the status row.
pub fn prompt_cursor_column(viewer: &Viewer, width: usize) -> Option<usize> {
    let (_, buffer) = viewer.status().search_prompt.as_ref()?;
    Some((buffer.chars().count() + 1).min(width.saturating_sub(1)))
}
