//! Append-only in-memory line storage.
//!
//! Every line is kept as an owned `String` next to its cached rune count, because the viewer
//! addresses columns in runes and the layout code asks for line lengths on every redraw.

/// Ordered, append-only sequence of text lines.
#[derive(Debug, Clone, Default)]
pub struct LineStore {
    lines: Vec<String>,
    rune_counts: Vec<usize>,
}

impl LineStore {
    pub fn new(lines: Vec<String>) -> Self {
        let rune_counts = lines.iter().map(|l| l.chars().count()).collect();
        Self { lines, rune_counts }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line text by 0-based index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Number of runes in the line, 0 for out-of-range indices.
    pub fn rune_len(&self, index: usize) -> usize {
        self.rune_counts.get(index).copied().unwrap_or(0)
    }

    /// Index of the last line, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.lines.len().checked_sub(1)
    }

    /// Append a batch, returning the index of its first line.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = String>) -> usize {
        let first = self.lines.len();
        for line in batch {
            self.rune_counts.push(line.chars().count());
            self.lines.push(line);
        }
        first
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Runes `start..end` of a line as an owned string, clipped to the line.
    pub fn rune_slice(&self, index: usize, start: usize, end: usize) -> String {
        match self.get(index) {
            Some(line) if start < end => line.chars().skip(start).take(end - start).collect(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_rune_lengths() {
        let store = LineStore::new(vec!["abc".to_string(), "héllo".to_string(), String::new()]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.rune_len(1), 5);
        assert_eq!(store.rune_len(2), 0);
        assert_eq!(store.rune_len(99), 0);
        assert_eq!(store.last_index(), Some(2));
    }

    #[test]
    fn extend_appends_in_order() {
        let mut store = LineStore::default();
        assert!(store.is_empty());
        assert_eq!(store.last_index(), None);

        let first = store.extend(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(first, 0);
        let next = store.extend(vec!["three".to_string()]);
        assert_eq!(next, 2);
        assert_eq!(store.iter().collect::<Vec<_>>(), vec!["one", "two", "three"]);
    }

    #[test]
    fn rune_slice_clips_to_line() {
        let store = LineStore::new(vec!["日本語テキスト".to_string()]);
        assert_eq!(store.rune_slice(0, 1, 3), "本語");
        assert_eq!(store.rune_slice(0, 5, 50), "スト");
        assert_eq!(store.rune_slice(0, 3, 3), "");
        assert_eq!(store.rune_slice(7, 0, 2), "");
    }
}
