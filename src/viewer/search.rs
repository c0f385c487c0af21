//! Query search over the loaded lines.

use crate::file_handler::LineStore;
use crate::highlight::QueryMatcher;
use crate::input::SearchDirection;
use crate::viewer::selection::Position;
use crate::viewer::state::Viewer;
use log::debug;

/// Active query with its matching lines.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    matcher: QueryMatcher,
    /// Ascending indices of lines containing the query
    matches: Vec<usize>,
    /// Position in `matches` of the current match
    current: usize,
}

impl SearchState {
    fn new(query: &str, lines: &LineStore) -> Self {
        let matcher = QueryMatcher::new(query);
        let matches = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| matcher.matches(line))
            .map(|(index, _)| index)
            .collect();
        Self {
            query: query.to_string(),
            matcher,
            matches,
            current: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matcher(&self) -> &QueryMatcher {
        &self.matcher
    }

    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    /// Line index of the current match.
    pub fn current_line(&self) -> Option<usize> {
        self.matches.get(self.current).copied()
    }

    /// Scan lines from `first` on and add those that match.
    pub(super) fn extend_matches(&mut self, lines: &LineStore, first: usize) {
        if self.matcher.is_empty() {
            return;
        }
        for index in first..lines.len() {
            if lines.get(index).is_some_and(|line| self.matcher.matches(line)) {
                self.matches.push(index);
            }
        }
    }
}

impl Viewer {
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn query(&self) -> &str {
        self.search.query()
    }

    /// Current match as `(1-based position, total)` for the status line.
    pub fn match_position(&self) -> Option<(usize, usize)> {
        let total = self.search.matches.len();
        (total > 0).then(|| (self.search.current + 1, total))
    }

    /// Set the query and jump to the nearest match in `direction`.
    ///
    /// The text is trimmed; an empty query clears the search. Matching is a case-insensitive
    /// literal test. When nothing is found in `direction` the search wraps around.
    pub fn set_query(&mut self, text: &str, direction: SearchDirection) {
        let query = text.trim();
        self.search = SearchState::new(query, self.lines());
        if query.is_empty() {
            self.status.clear_message();
            return;
        }
        debug!(
            "query {:?} matched {} lines",
            query,
            self.search.matches.len()
        );

        let cursor_line = self.cursor().line;
        let matches = &self.search.matches;
        let Some(last) = matches.len().checked_sub(1) else {
            self.status.set_message("no matches");
            return;
        };
        self.search.current = match direction {
            SearchDirection::Forward => matches
                .iter()
                .position(|&line| line >= cursor_line)
                .unwrap_or(0),
            SearchDirection::Backward => matches
                .iter()
                .rposition(|&line| line <= cursor_line)
                .unwrap_or(last),
        };
        self.jump_to_current_match();
    }

    /// Step through matches cyclically; positive `step` goes forward.
    pub fn next_match(&mut self, step: isize) {
        let total = self.search.matches.len();
        if total == 0 {
            self.status.set_message("no matches");
            return;
        }
        let current = self.search.current as isize + step;
        self.search.current = current.rem_euclid(total as isize) as usize;
        self.jump_to_current_match();
    }

    fn jump_to_current_match(&mut self) {
        let Some(line) = self.search.current_line() else {
            return;
        };
        let col = self
            .lines()
            .get(line)
            .and_then(|text| self.search.matcher.first_column(text))
            .unwrap_or(0);
        self.jump_to(Position::new(line, col));
        self.status.clear_message();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::ViewerOptions;

    fn viewer(lines: &[&str]) -> Viewer {
        Viewer::new(
            LineStore::new(lines.iter().map(|s| s.to_string()).collect()),
            ViewerOptions::default(),
        )
    }

    fn numbered_matches() -> Viewer {
        let lines: Vec<String> = (0..12)
            .map(|i| {
                if [2, 5, 9].contains(&i) {
                    format!("{i} hit")
                } else {
                    format!("{i} miss")
                }
            })
            .collect();
        Viewer::new(LineStore::new(lines), ViewerOptions::default())
    }

    #[test]
    fn finds_case_insensitive_match() {
        let mut v = viewer(&["a", "ERROR here", "b"]);
        v.set_query("error", SearchDirection::Forward);
        assert_eq!(v.search().matches(), &[1]);
        assert_eq!(v.cursor(), Position::new(1, 0));
        assert_eq!(v.match_position(), Some((1, 1)));
    }

    #[test]
    fn cursor_lands_on_first_occurrence_column() {
        let mut v = viewer(&["x", "some text with Needle and needle"]);
        v.set_query("needle", SearchDirection::Forward);
        assert_eq!(v.cursor(), Position::new(1, 15));
        assert_eq!(v.goal_column(), 15);
    }

    #[test]
    fn query_is_trimmed() {
        let mut v = viewer(&["alpha", "beta"]);
        v.set_query("  beta ", SearchDirection::Forward);
        assert_eq!(v.query(), "beta");
        assert_eq!(v.cursor().line, 1);
    }

    #[test]
    fn empty_query_clears_search() {
        let mut v = viewer(&["alpha", "beta"]);
        v.set_query("beta", SearchDirection::Forward);
        v.set_query("   ", SearchDirection::Forward);
        assert_eq!(v.query(), "");
        assert!(v.search().matches().is_empty());
        assert_eq!(v.match_position(), None);
    }

    #[test]
    fn no_match_reports_status() {
        let mut v = viewer(&["alpha"]);
        v.set_query("zzz", SearchDirection::Forward);
        assert_eq!(v.status().message.as_deref(), Some("no matches"));
        assert_eq!(v.cursor(), Position::new(0, 0));

        v.next_match(1);
        assert_eq!(v.status().message.as_deref(), Some("no matches"));
    }

    #[test]
    fn forward_search_wraps_to_first() {
        let mut v = numbered_matches();
        v.move_cursor(10);
        v.set_query("hit", SearchDirection::Forward);
        assert_eq!(v.cursor().line, 2);
    }

    #[test]
    fn backward_search_picks_nearest_above() {
        let mut v = numbered_matches();
        v.move_cursor(8);
        v.set_query("hit", SearchDirection::Backward);
        assert_eq!(v.cursor().line, 5);

        v.cursor_top();
        v.set_query("hit", SearchDirection::Backward);
        assert_eq!(v.cursor().line, 9);
    }

    #[test]
    fn next_match_cycles() {
        let mut v = numbered_matches();
        v.move_cursor(9);
        v.set_query("hit", SearchDirection::Forward);
        assert_eq!(v.cursor().line, 9);
        v.next_match(1);
        assert_eq!(v.cursor().line, 2);
        v.next_match(-1);
        assert_eq!(v.cursor().line, 9);
        v.next_match(-1);
        assert_eq!(v.cursor().line, 5);
    }

    #[test]
    fn appended_lines_extend_matches() {
        let mut v = viewer(&["error one", "fine"]);
        v.set_query("error", SearchDirection::Forward);
        v.append_lines(vec!["ok".to_string(), "ERROR two".to_string()]);
        assert_eq!(v.search().matches(), &[0, 3]);
        assert_eq!(v.match_position(), Some((1, 2)));
    }
}
