//! ANSI-aware text measurement and layout.
//!
//! Screen rows are composed as SGR-styled strings. Widths here count visible runes only;
//! escape sequences are zero-width and are never split. [`ansi_line`] converts a composed row
//! into a ratatui [`Line`] for the terminal backend.

use crate::highlight::RESET;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const ESC: char = '\x1b';

/// One piece of a styled string.
#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    /// A complete escape sequence, including the introducer
    Escape(&'a str),
}

/// Split `s` into visible text and escape sequences.
///
/// A CSI sequence runs from `ESC [` to its final byte (`@`..=`~`); `ESC` followed by anything
/// else covers two characters. An unterminated sequence swallows the rest of the string.
fn tokenize(s: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut chars = s.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != ESC {
            continue;
        }
        if text_start < start {
            tokens.push(Token::Text(&s[text_start..start]));
        }
        let mut end = s.len();
        match chars.next() {
            Some((_, '[')) => {
                for (i, c) in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        end = i + c.len_utf8();
                        break;
                    }
                }
            }
            Some((i, c)) => end = i + c.len_utf8(),
            None => {}
        }
        tokens.push(Token::Escape(&s[start..end]));
        text_start = end;
    }
    if text_start < s.len() {
        tokens.push(Token::Text(&s[text_start..]));
    }
    tokens
}

/// Remove every escape sequence.
pub fn strip_ansi(s: &str) -> String {
    tokenize(s)
        .into_iter()
        .filter_map(|token| match token {
            Token::Text(text) => Some(text),
            Token::Escape(_) => None,
        })
        .collect()
}

/// Number of visible runes.
pub fn visible_width(s: &str) -> usize {
    tokenize(s)
        .into_iter()
        .map(|token| match token {
            Token::Text(text) => text.chars().count(),
            Token::Escape(_) => 0,
        })
        .sum()
}

/// Cut `s` down to `width` visible runes.
///
/// Strings that already fit are returned unchanged. Truncated output keeps every escape
/// sequence intact and ends with a reset so no style leaks past the cut.
pub fn truncate_ansi(s: &str, width: usize) -> String {
    if visible_width(s) <= width {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + RESET.len());
    let mut remaining = width;
    'tokens: for token in tokenize(s) {
        match token {
            Token::Escape(seq) => out.push_str(seq),
            Token::Text(text) => {
                for c in text.chars() {
                    if remaining == 0 {
                        break 'tokens;
                    }
                    out.push(c);
                    remaining -= 1;
                }
            }
        }
    }
    out.push_str(RESET);
    out
}

/// Pad with spaces (or truncate) to exactly `width` visible runes.
pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_width(s);
    if visible >= width {
        return truncate_ansi(s, width);
    }
    format!("{s}{}", " ".repeat(width - visible))
}

/// Left-pad with spaces to `width`; wider strings are returned unchanged.
pub fn pad_left(s: &str, width: usize) -> String {
    let visible = visible_width(s);
    if visible >= width {
        return s.to_string();
    }
    format!("{}{s}", " ".repeat(width - visible))
}

fn ansi_color(code: u16) -> Option<Color> {
    let color = match code {
        0 => Color::Black,
        1 => Color::Red,
        2 => Color::Green,
        3 => Color::Yellow,
        4 => Color::Blue,
        5 => Color::Magenta,
        6 => Color::Cyan,
        7 => Color::Gray,
        _ => return None,
    };
    Some(color)
}

fn bright_color(code: u16) -> Option<Color> {
    let color = match code {
        0 => Color::DarkGray,
        1 => Color::LightRed,
        2 => Color::LightGreen,
        3 => Color::LightYellow,
        4 => Color::LightBlue,
        5 => Color::LightMagenta,
        6 => Color::LightCyan,
        7 => Color::White,
        _ => return None,
    };
    Some(color)
}

/// Apply the parameters of one SGR sequence to `style`.
fn apply_sgr(style: Style, params: &str) -> Style {
    let mut style = style;
    for param in params.split(';') {
        let code: u16 = if param.is_empty() {
            0
        } else {
            match param.parse() {
                Ok(code) => code,
                Err(_) => continue,
            }
        };
        style = match code {
            0 => Style::default(),
            1 => style.add_modifier(Modifier::BOLD),
            2 => style.add_modifier(Modifier::DIM),
            4 => style.add_modifier(Modifier::UNDERLINED),
            7 => style.add_modifier(Modifier::REVERSED),
            22 => style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            24 => style.remove_modifier(Modifier::UNDERLINED),
            27 => style.remove_modifier(Modifier::REVERSED),
            30..=37 => ansi_color(code - 30).map_or(style, |c| style.fg(c)),
            39 => style.fg(Color::Reset),
            40..=47 => ansi_color(code - 40).map_or(style, |c| style.bg(c)),
            49 => style.bg(Color::Reset),
            90..=97 => bright_color(code - 90).map_or(style, |c| style.fg(c)),
            100..=107 => bright_color(code - 100).map_or(style, |c| style.bg(c)),
            _ => style,
        };
    }
    style
}

/// Convert an SGR-styled string into a ratatui line.
///
/// Only SGR (`m`) sequences affect style; other escape sequences are dropped.
pub fn ansi_line(s: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut style = Style::default();
    for token in tokenize(s) {
        match token {
            Token::Text(text) => spans.push(Span::styled(text.to_string(), style)),
            Token::Escape(seq) => {
                if let Some(params) = seq
                    .strip_prefix("\x1b[")
                    .and_then(|rest| rest.strip_suffix('m'))
                {
                    style = apply_sgr(style, params);
                }
            }
        }
    }
    Line::from(spans)
}
