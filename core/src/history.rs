//! Ordered record of finalized command lines plus a navigation cursor.

/// Command history with bash-style up/down navigation.
///
/// The cursor always stays in `[0, len]`; `len` means "not browsing".
/// A line is appended only if no entry with identical text exists anywhere
/// in the list.
#[derive(Debug, Default)]
pub struct HistoryList {
    entries: Vec<String>,
    cursor: usize,
}

impl HistoryList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores entries persisted by an earlier session, cursor at the end.
    pub fn seeded(entries: Vec<String>) -> Self {
        let cursor = entries.len();
        Self { entries, cursor }
    }

    /// Records a finalized line. Duplicate text anywhere in the list makes
    /// this a no-op, leaving even the cursor untouched.
    pub fn append(&mut self, text: &str) {
        if self.entries.iter().any(|entry| entry == text) {
            return;
        }
        self.entries.push(text.to_string());
        self.cursor = self.entries.len();
    }

    /// Steps back one entry; `None` at the oldest entry (cursor 0).
    pub fn previous(&mut self) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Steps forward one entry. Past the newest entry the cursor parks at
    /// `len` and an empty line comes back, clearing the input.
    pub fn next(&mut self) -> String {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.entries[self.cursor].clone()
        } else {
            self.cursor = self.entries.len();
            String::new()
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn append_dedups_against_the_whole_list() {
        let mut history = HistoryList::new();
        history.append("ls");
        history.append("pwd");
        history.append("ls");
        assert_eq!(history.entries(), ["ls", "pwd"]);
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn deduped_append_leaves_the_cursor_alone() {
        let mut history = HistoryList::new();
        history.append("ls");
        history.append("pwd");
        history.previous();
        assert_eq!(history.cursor(), 1);
        history.append("ls");
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn previous_at_the_oldest_entry_is_a_no_op() {
        let mut history = HistoryList::new();
        history.append("a");
        assert_eq!(history.previous(), Some("a".to_string()));
        assert_eq!(history.previous(), None);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn next_past_the_newest_entry_clears_the_input() {
        let mut history = HistoryList::new();
        history.append("a");
        history.append("b");
        history.previous();
        history.previous();
        assert_eq!(history.next(), "b");
        assert_eq!(history.next(), "");
        assert_eq!(history.cursor(), 2);
        // Still clears when not browsing at all.
        assert_eq!(history.next(), "");
    }

    #[test]
    fn navigation_never_leaves_bounds() {
        let mut history = HistoryList::new();
        for text in ["a", "b", "c"] {
            history.append(text);
        }
        for _ in 0..10 {
            history.previous();
            assert!(history.cursor() <= history.len());
        }
        assert_eq!(history.cursor(), 0);
        for _ in 0..10 {
            history.next();
            assert!(history.cursor() <= history.len());
        }
        assert_eq!(history.cursor(), 3);
    }

    #[test]
    fn empty_list_navigation_is_safe() {
        let mut history = HistoryList::new();
        assert_eq!(history.previous(), None);
        assert_eq!(history.next(), "");
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn seeded_history_starts_past_the_end() {
        let mut history = HistoryList::seeded(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.previous(), Some("y".to_string()));
    }
}
