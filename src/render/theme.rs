//! Color theme for the viewer chrome.
//!
//! Themes are expressed as SGR parameter lists so they compose with the styled text produced
//! by the highlight rules.

use crate::highlight::palette::sgr_params;
use crate::highlight::rules::{QUERY_COLOR, QUERY_STYLE};
use crate::highlight::RESET;

/// Color theme for terminal UI elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTheme {
    /// Status line
    pub status_bar: String,

    /// Line-number gutter (`None` draws it unstyled)
    pub line_numbers: Option<String>,

    /// Occurrences of the active query (`None` disables query highlighting)
    pub query_match: Option<String>,

    /// Selected text
    pub selection: String,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            status_bar: "100;97".to_string(),
            line_numbers: Some("90".to_string()),
            query_match: sgr_params(Some(QUERY_COLOR), Some(QUERY_STYLE)),
            selection: "7".to_string(),
        }
    }
}

impl ColorTheme {
    /// Theme for `--plain`: reverse-video chrome, no colors.
    pub fn monochrome() -> Self {
        Self {
            status_bar: "7".to_string(),
            line_numbers: None,
            query_match: None,
            selection: "7".to_string(),
        }
    }
}

/// Wrap `text` in the SGR parameters `params`, if any.
pub fn paint(params: Option<&str>, text: &str) -> String {
    match params {
        Some(params) if !params.is_empty() && !text.is_empty() => {
            format!("\x1b[{params}m{text}{RESET}")
        }
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_codes() {
        let theme = ColorTheme::default();
        assert_eq!(theme.status_bar, "100;97");
        assert_eq!(theme.line_numbers.as_deref(), Some("90"));
        assert_eq!(theme.query_match.as_deref(), Some("4;34"));
        assert_eq!(theme.selection, "7");
    }

    #[test]
    fn monochrome_has_no_colors() {
        let theme = ColorTheme::monochrome();
        assert_eq!(theme.status_bar, "7");
        assert_eq!(theme.line_numbers, None);
        assert_eq!(theme.query_match, None);
    }

    #[test]
    fn paint_wraps_and_resets() {
        assert_eq!(paint(Some("90"), "12 "), "\x1b[90m12 \x1b[0m");
        assert_eq!(paint(None, "12 "), "12 ");
        assert_eq!(paint(Some("7"), ""), "");
    }
}
