//! The fixed styling palette: nine foreground colors and three text styles.
//!
//! Names are matched case-insensitively. Anything outside the palette resolves to `None` and the
//! text it was meant to decorate is emitted unstyled.

/// SGR sequence that clears every attribute.
pub const RESET: &str = "\x1b[0m";

/// Foreground colors available to highlight rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    Gray,
}

impl Color {
    /// Resolve a color by name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.trim().to_ascii_lowercase().as_str() {
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            "gray" => Color::Gray,
            _ => return None,
        };
        Some(color)
    }

    /// SGR parameter selecting this foreground color.
    pub fn sgr_code(self) -> &'static str {
        match self {
            Color::Black => "30",
            Color::Red => "31",
            Color::Green => "32",
            Color::Yellow => "33",
            Color::Blue => "34",
            Color::Magenta => "35",
            Color::Cyan => "36",
            Color::White => "37",
            Color::Gray => "90",
        }
    }
}

/// Text attributes available to highlight rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextStyle {
    Bold,
    Dim,
    Underline,
}

impl TextStyle {
    /// Resolve a style by name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        let style = match name.trim().to_ascii_lowercase().as_str() {
            "bold" => TextStyle::Bold,
            "dim" => TextStyle::Dim,
            "underline" => TextStyle::Underline,
            _ => return None,
        };
        Some(style)
    }

    /// SGR parameter enabling this attribute.
    pub fn sgr_code(self) -> &'static str {
        match self {
            TextStyle::Bold => "1",
            TextStyle::Dim => "2",
            TextStyle::Underline => "4",
        }
    }
}

/// Combined SGR parameter list, style first and color second (`"1;31"`).
///
/// Returns `None` when neither attribute is set.
pub fn sgr_params(color: Option<Color>, style: Option<TextStyle>) -> Option<String> {
    match (style, color) {
        (None, None) => None,
        (Some(s), None) => Some(s.sgr_code().to_string()),
        (None, Some(c)) => Some(c.sgr_code().to_string()),
        (Some(s), Some(c)) => Some(format!("{};{}", s.sgr_code(), c.sgr_code())),
    }
}

/// Wrap `text` in a single combined escape sequence terminated by a reset.
pub fn wrap(text: &str, color: Option<Color>, style: Option<TextStyle>) -> String {
    match sgr_params(color, style) {
        Some(params) => format!("\x1b[{params}m{text}{RESET}"),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(Color::from_name("RED"), Some(Color::Red));
        assert_eq!(Color::from_name(" gray "), Some(Color::Gray));
        assert_eq!(Color::from_name("purple"), None);
        assert_eq!(TextStyle::from_name("Underline"), Some(TextStyle::Underline));
        assert_eq!(TextStyle::from_name("italic"), None);
    }

    #[test]
    fn wrap_puts_style_before_color() {
        assert_eq!(
            wrap("boom", Some(Color::Red), Some(TextStyle::Bold)),
            "\x1b[1;31mboom\x1b[0m"
        );
        assert_eq!(wrap("t", Some(Color::Gray), None), "\x1b[90mt\x1b[0m");
        assert_eq!(wrap("u", None, Some(TextStyle::Dim)), "\x1b[2mu\x1b[0m");
    }

    #[test]
    fn wrap_without_attributes_is_verbatim() {
        assert_eq!(wrap("plain", None, None), "plain");
    }
}
