//! Gatekeeping rules for raw edit operations against the edit region.
//!
//! Rejections are silent: an edit below the mark is simply dropped, never
//! surfaced as an error.

/// Whether text may be inserted at `at`.
pub fn allows_insert(mark: usize, at: usize) -> bool {
    at >= mark
}

/// Whether the char immediately before `at` may be deleted. The char being
/// removed sits at `at - 1`, which must be at or past the mark.
pub fn allows_delete(mark: usize, at: usize) -> bool {
    at > mark
}

/// Resolves a proposed cursor target; positions before the mark clamp to it.
pub fn clamp_cursor(mark: usize, target: usize) -> usize {
    target.max(mark)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_allowed_at_or_past_mark() {
        assert!(allows_insert(4, 4));
        assert!(allows_insert(4, 9));
        assert!(!allows_insert(4, 3));
        assert!(!allows_insert(4, 0));
    }

    #[test]
    fn delete_needs_a_char_inside_the_region() {
        assert!(!allows_delete(4, 4));
        assert!(allows_delete(4, 5));
        assert!(!allows_delete(4, 0));
        assert!(allows_delete(0, 1));
    }

    #[test]
    fn cursor_clamps_to_mark() {
        assert_eq!(clamp_cursor(4, 0), 4);
        assert_eq!(clamp_cursor(4, 4), 4);
        assert_eq!(clamp_cursor(4, 7), 7);
    }
}
