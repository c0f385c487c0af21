//! Word motions.
//!
//! A word is a maximal run of letters, digits and `_`. Everything else separates words. Empty
//! lines count as word starts for `w` and `b`, and are skipped by `e`.

use crate::file_handler::LineStore;
use crate::viewer::selection::Position;
use crate::viewer::state::Viewer;

fn is_word_rune(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn runes(lines: &LineStore, line: usize) -> Vec<char> {
    lines.get(line).unwrap_or_default().chars().collect()
}

/// Start of the next word after `from`.
pub fn next_word_start(lines: &LineStore, from: Position) -> Option<Position> {
    let current = runes(lines, from.line);
    let mut col = from.col;
    if col < current.len() {
        if is_word_rune(current[col]) {
            while col < current.len() && is_word_rune(current[col]) {
                col += 1;
            }
        }
        while col < current.len() && !is_word_rune(current[col]) {
            col += 1;
        }
        if col < current.len() {
            return Some(Position::new(from.line, col));
        }
    }

    for line in from.line + 1..lines.len() {
        let text = runes(lines, line);
        if text.is_empty() {
            return Some(Position::new(line, 0));
        }
        if let Some(col) = text.iter().position(|&c| is_word_rune(c)) {
            return Some(Position::new(line, col));
        }
    }
    None
}

/// Start of the word before `from`, or of the word containing it.
pub fn prev_word_start(lines: &LineStore, from: Position) -> Option<Position> {
    let mut line = from.line;
    let mut text = runes(lines, line);
    let mut col = from.col.min(text.len()).checked_sub(1);

    loop {
        match col {
            Some(c) if is_word_rune(text[c]) => {
                let start = text[..c]
                    .iter()
                    .rposition(|&r| !is_word_rune(r))
                    .map_or(0, |i| i + 1);
                return Some(Position::new(line, start));
            }
            Some(c) => col = c.checked_sub(1),
            None => {
                line = line.checked_sub(1)?;
                text = runes(lines, line);
                if text.is_empty() {
                    return Some(Position::new(line, 0));
                }
                col = Some(text.len() - 1);
            }
        }
    }
}

/// End of the word after `from`.
pub fn next_word_end(lines: &LineStore, from: Position) -> Option<Position> {
    let mut line = from.line;
    let mut text = runes(lines, line);
    let mut col = from.col + 1;

    loop {
        if col >= text.len() {
            line += 1;
            if line >= lines.len() {
                return None;
            }
            text = runes(lines, line);
            col = 0;
            continue;
        }
        if is_word_rune(text[col]) {
            while col + 1 < text.len() && is_word_rune(text[col + 1]) {
                col += 1;
            }
            return Some(Position::new(line, col));
        }
        col += 1;
    }
}

impl Viewer {
    /// `w`: no-op when there is no later word.
    pub fn word_forward(&mut self) {
        self.status.clear_message();
        if let Some(target) = next_word_start(self.lines(), self.cursor()) {
            self.jump_to(target);
        }
    }

    /// `b`: falls back to the top of the document.
    pub fn word_backward(&mut self) {
        self.status.clear_message();
        let target = prev_word_start(self.lines(), self.cursor()).unwrap_or_default();
        self.jump_to(target);
    }

    /// `e`: no-op when there is no later word end.
    pub fn word_end(&mut self) {
        self.status.clear_message();
        if let Some(target) = next_word_end(self.lines(), self.cursor()) {
            self.jump_to(target);
        }
    }
}
