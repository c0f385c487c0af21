//! Regex-driven colorization.
//!
//! - [`palette`] - the fixed nine-color / three-style palette and SGR wrapping
//! - [`rules`] - built-in and custom rules, overlap resolution, styled output
//! - [`query`] - case-insensitive literal matching used by search and query highlighting

pub mod palette;
pub mod query;
pub mod rules;

pub use palette::{Color, TextStyle, RESET};
pub use query::QueryMatcher;
pub use rules::{
    apply_rules, build_rules, default_rules, highlight_query, rule_spans, CustomRule, Rule, Span,
};

/// Rule set bound to the session's color mode.
///
/// In plain mode every query returns no spans, so callers never need to branch on it.
#[derive(Debug, Clone)]
pub struct Highlighter {
    rules: Vec<Rule>,
    plain: bool,
}

impl Highlighter {
    pub fn new(rules: Vec<Rule>, plain: bool) -> Self {
        Self { rules, plain }
    }

    /// A highlighter that never decorates anything.
    pub fn plain() -> Self {
        Self::new(Vec::new(), true)
    }

    pub fn is_plain(&self) -> bool {
        self.plain
    }

    /// Resolved rule spans for a whole logical line.
    pub fn spans(&self, line: &str) -> Vec<Span> {
        if self.plain {
            return Vec::new();
        }
        rule_spans(line, &self.rules)
    }

    /// Styled form of `line` for non-interactive output.
    pub fn apply(&self, line: &str) -> String {
        if self.plain {
            return line.to_string();
        }
        apply_rules(line, &self.rules)
    }
}
