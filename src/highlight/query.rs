//! Case-insensitive literal matching shared by search and query highlighting.
//!
//! Matching runs over case-folded runes rather than lower-cased bytes so that reported
//! positions always land on character boundaries of the original text, even when folding
//! changes the UTF-8 length of a character.

use std::ops::Range;

/// Fold a single rune to its lower-case form, keeping a 1:1 rune mapping.
fn fold(c: char) -> char {
    if c.is_ascii() {
        c.to_ascii_lowercase()
    } else {
        c.to_lowercase().next().unwrap_or(c)
    }
}

/// A compiled, case-insensitive literal query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMatcher {
    needle: Vec<char>,
}

impl QueryMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.chars().map(fold).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Rune-index ranges of every non-overlapping occurrence, scanning left to right.
    pub fn rune_ranges(&self, line: &str) -> Vec<Range<usize>> {
        if self.needle.is_empty() {
            return Vec::new();
        }
        let hay: Vec<char> = line.chars().map(fold).collect();
        let n = self.needle.len();
        let mut out = Vec::new();
        let mut i = 0;
        while i + n <= hay.len() {
            if hay[i..i + n] == self.needle[..] {
                out.push(i..i + n);
                i += n;
            } else {
                i += 1;
            }
        }
        out
    }

    /// Byte ranges of every non-overlapping occurrence.
    pub fn byte_ranges(&self, line: &str) -> Vec<Range<usize>> {
        let ranges = self.rune_ranges(line);
        if ranges.is_empty() {
            return ranges;
        }
        let offsets: Vec<usize> = line
            .char_indices()
            .map(|(b, _)| b)
            .chain(std::iter::once(line.len()))
            .collect();
        ranges
            .into_iter()
            .map(|r| offsets[r.start]..offsets[r.end])
            .collect()
    }

    /// Rune column of the first occurrence, if any.
    pub fn first_column(&self, line: &str) -> Option<usize> {
        if self.needle.is_empty() {
            return None;
        }
        let hay: Vec<char> = line.chars().map(fold).collect();
        hay.windows(self.needle.len())
            .position(|window| window == &self.needle[..])
    }

    pub fn matches(&self, line: &str) -> bool {
        self.first_column(line).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_case_insensitive_occurrences() {
        let m = QueryMatcher::new("error");
        assert_eq!(m.rune_ranges("ERROR then error"), vec![0..5, 11..16]);
        assert!(m.matches("an Error occurred"));
        assert!(!m.matches("all good"));
    }

    #[test]
    fn occurrences_do_not_overlap() {
        let m = QueryMatcher::new("aa");
        assert_eq!(m.rune_ranges("aaaa"), vec![0..2, 2..4]);
        assert_eq!(m.rune_ranges("aaa"), vec![0..2]);
    }

    #[test]
    fn columns_count_runes_not_bytes() {
        let m = QueryMatcher::new("fail");
        assert_eq!(m.first_column("ünïcode FAIL"), Some(8));
        assert_eq!(m.byte_ranges("ünïcode FAIL"), vec![10..14]);
    }

    #[test]
    fn empty_query_matches_nothing() {
        let m = QueryMatcher::new("");
        assert!(m.is_empty());
        assert_eq!(m.first_column("anything"), None);
        assert!(m.byte_ranges("anything").is_empty());
    }
}
