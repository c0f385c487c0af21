//! Highlight rules and overlap-resolving span matching.
//!
//! Rules are evaluated in priority order against the original, unstyled line. A match is only
//! accepted when none of its bytes were claimed by an earlier rule, so the first rule to claim a
//! byte wins regardless of match length.

use crate::error::{Result, TiloError};
use crate::highlight::palette::{self, Color, TextStyle};
use crate::highlight::query::QueryMatcher;
use log::debug;
use regex::Regex;
use std::collections::HashMap;

/// Name given to custom rules that do not carry one.
pub const CUSTOM_RULE_NAME: &str = "custom";

/// A compiled highlight rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub regex: Regex,
    pub color: Option<Color>,
    pub style: Option<TextStyle>,
    pub enabled: bool,
}

/// A user-supplied rule as it comes out of the configuration, not yet compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRule {
    pub name: Option<String>,
    pub pattern: String,
    pub color: String,
    pub style: String,
    pub enabled: bool,
}

impl CustomRule {
    pub fn new(pattern: impl Into<String>, color: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            name: None,
            pattern: pattern.into(),
            color: color.into(),
            style: style.into(),
            enabled: true,
        }
    }

    fn compile(&self) -> Result<Rule> {
        let regex = Regex::new(&self.pattern).map_err(|source| TiloError::InvalidRulePattern {
            pattern: self.pattern.clone(),
            source,
        })?;
        Ok(Rule {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| CUSTOM_RULE_NAME.to_string()),
            regex,
            color: Color::from_name(&self.color),
            style: TextStyle::from_name(&self.style),
            enabled: self.enabled,
        })
    }
}

/// A resolved byte range of a line together with its decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub color: Option<Color>,
    pub style: Option<TextStyle>,
}

// Digits are ASCII-only; other Unicode decimal digits never form timestamps, addresses or ports.
const TIMESTAMP: &str = r"\b[0-9]{4}-[0-9]{2}-[0-9]{2}[T ][0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?(?:Z|[+-][0-9]{2}:[0-9]{2})?\b|\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+[0-9]{1,2}\s+[0-9]{2}:[0-9]{2}:[0-9]{2}\b";
const URL: &str = r"\bhttps?://[^\s)\]}>,;:]+";
const IPV4: &str = r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b";
const IPV6: &str = r"\b(?:[0-9a-fA-F]{0,4}:){2,7}[0-9a-fA-F]{0,4}\b";
const MAC: &str = r"\b(?:[0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}\b";
const PORT: &str = r":[0-9]{2,5}\b";
const PATH: &str = r"\B/(?:[^\s)\]}>,;:]+)";
const FAIL_WORDS: &str = r"(?i)\b(fail|failed|failure|error|err|fatal|panic|crashed|crash|abort|aborted|timeout|timedout|refused|reject|denied|unreachable|unavailable|corrupted|invalid)\b";
const SUCCESS_WORDS: &str = r"(?i)\b(ok|okay|success|successful|successfully|succeeded|complete|completed|done|ready|healthy|passed|pass|connected|accepted|resolved)\b";
const KEYWORDS: &str =
    r"(?i)\b(kube|pod|node|container|nginx|envoy|http|grpc|tcp|udp|timeout|retry|panic|crash)\b";

/// Built-in rules in priority order: (name, pattern, color, style).
const BUILTIN_RULES: &[(&str, &str, Color, Option<TextStyle>)] = &[
    ("timestamp", TIMESTAMP, Color::Cyan, None),
    ("url", URL, Color::Blue, None),
    ("ipv4", IPV4, Color::Yellow, None),
    ("ipv6", IPV6, Color::Yellow, None),
    ("mac", MAC, Color::Yellow, None),
    ("port", PORT, Color::Magenta, None),
    ("path", PATH, Color::Green, None),
    ("level_error", r"(?i)\b(ERROR|FATAL)\b", Color::Red, Some(TextStyle::Bold)),
    ("level_warn", r"(?i)\b(WARN|WARNING)\b", Color::Yellow, Some(TextStyle::Bold)),
    ("level_info", r"(?i)\bINFO\b", Color::Blue, Some(TextStyle::Bold)),
    ("level_debug", r"(?i)\bDEBUG\b", Color::Magenta, Some(TextStyle::Bold)),
    ("level_trace", r"(?i)\bTRACE\b", Color::Gray, Some(TextStyle::Bold)),
    ("fail", FAIL_WORDS, Color::Red, Some(TextStyle::Bold)),
    ("success", SUCCESS_WORDS, Color::Green, Some(TextStyle::Bold)),
    ("keyword", KEYWORDS, Color::Magenta, None),
];

/// Compile the built-in rule set, all enabled.
pub fn default_rules() -> Result<Vec<Rule>> {
    BUILTIN_RULES
        .iter()
        .map(|&(name, pattern, color, style)| {
            let regex = Regex::new(pattern).map_err(|source| TiloError::InvalidRulePattern {
                pattern: pattern.to_string(),
                source,
            })?;
            Ok(Rule {
                name: name.to_string(),
                regex,
                color: Some(color),
                style,
                enabled: true,
            })
        })
        .collect()
}

/// Assemble the effective rule list.
///
/// `color_overrides` maps rule names to color names and replaces the color of matching
/// built-ins; `disabled` switches built-ins off. Both match names case-insensitively and
/// silently ignore names that do not exist. Custom rules are compiled and appended after the
/// built-ins; the first pattern that fails to compile aborts the whole build.
pub fn build_rules(
    defaults: Vec<Rule>,
    color_overrides: &HashMap<String, String>,
    disabled: &[String],
    custom: &[CustomRule],
) -> Result<Vec<Rule>> {
    let overrides: HashMap<String, &str> = color_overrides
        .iter()
        .map(|(name, color)| (name.to_lowercase(), color.as_str()))
        .collect();
    let disabled: Vec<String> = disabled.iter().map(|name| name.to_lowercase()).collect();

    let mut rules = Vec::with_capacity(defaults.len() + custom.len());
    for mut rule in defaults {
        let key = rule.name.to_lowercase();
        rule.enabled = !disabled.contains(&key);
        if let Some(color) = overrides.get(&key) {
            rule.color = Color::from_name(color);
        }
        rules.push(rule);
    }

    for custom_rule in custom {
        rules.push(custom_rule.compile()?);
    }

    debug!(
        "built {} highlight rules ({} disabled, {} custom)",
        rules.len(),
        rules.iter().filter(|r| !r.enabled).count(),
        custom.len()
    );
    Ok(rules)
}

/// Resolve the non-overlapping spans of `line`, sorted by start offset.
pub fn rule_spans(line: &str, rules: &[Rule]) -> Vec<Span> {
    if line.is_empty() || rules.is_empty() {
        return Vec::new();
    }
    let mut claimed = vec![false; line.len()];
    let mut spans = Vec::new();

    for rule in rules.iter().filter(|r| r.enabled) {
        for found in rule.regex.find_iter(line) {
            let (start, end) = (found.start(), found.end());
            if start >= end || claimed[start..end].iter().any(|&c| c) {
                continue;
            }
            claimed[start..end].iter_mut().for_each(|c| *c = true);
            spans.push(Span {
                start,
                end,
                color: rule.color,
                style: rule.style,
            });
        }
    }

    spans.sort_by_key(|span| (span.start, span.end));
    spans
}

/// Produce the styled form of `line`: matched ranges wrapped in SGR sequences, everything else
/// copied verbatim.
pub fn apply_rules(line: &str, rules: &[Rule]) -> String {
    let spans = rule_spans(line, rules);
    if spans.is_empty() {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + spans.len() * 12);
    let mut pos = 0;
    for span in spans {
        out.push_str(&line[pos..span.start]);
        out.push_str(&palette::wrap(
            &line[span.start..span.end],
            span.color,
            span.style,
        ));
        pos = span.end;
    }
    out.push_str(&line[pos..]);
    out
}

/// Color used for active search query occurrences.
pub const QUERY_COLOR: Color = Color::Blue;
/// Style used for active search query occurrences.
pub const QUERY_STYLE: TextStyle = TextStyle::Underline;

/// Wrap every case-insensitive occurrence of `query` in `text` with the query highlight.
///
/// `text` is treated as unstyled; the renderer merges query ranges and rule spans itself.
pub fn highlight_query(text: &str, query: &str) -> String {
    let matcher = QueryMatcher::new(query);
    let ranges = matcher.byte_ranges(text);
    if ranges.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + ranges.len() * 12);
    let mut pos = 0;
    for range in ranges {
        out.push_str(&text[pos..range.start]);
        out.push_str(&palette::wrap(
            &text[range.clone()],
            Some(QUERY_COLOR),
            Some(QUERY_STYLE),
        ));
        pos = range.end;
    }
    out.push_str(&text[pos..]);
    out
}
