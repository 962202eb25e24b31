//! Styled transcript storage with a single mutable suffix, the edit region.
//!
//! The buffer is append-only below the edit-region mark. The mark never
//! moves backward; it advances via [`ScrollbackBuffer::seal`] (normally
//! called when a prompt is emitted or a typed line is consumed) and resets
//! only on [`ScrollbackBuffer::clear`]. All positions are char offsets.

/// Visual class of a run of text. The display surface decides what each
/// class looks like; the engine only tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextStyle {
    /// Regular output text.
    Normal,
    /// The prompt itself.
    Prompt,
    /// Error output and failure notices.
    Error,
    /// Informational text: help, history listing, the startup banner.
    Info,
}

/// One uniformly styled stretch of transcript text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Default)]
pub struct ScrollbackBuffer {
    runs: Vec<StyledRun>,
    /// Total length in chars.
    len: usize,
    /// Start of the edit region. Everything before it is immutable.
    mark: usize,
}

impl ScrollbackBuffer {
    /// Appends styled text at the end of the transcript. Callers keep the
    /// ordering discipline: transcript appends happen while the edit region
    /// is empty, so they never interleave with typed input.
    pub fn append(&mut self, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        self.push_run(text, style);
        self.len += text.chars().count();
    }

    /// Wipes the transcript and reopens the edit region at position 0.
    pub fn clear(&mut self) {
        self.runs.clear();
        self.len = 0;
        self.mark = 0;
    }

    /// Advances the edit-region mark to the end of the buffer. This is the
    /// only way the mark moves, so it is forward-only between clears.
    pub fn seal(&mut self) {
        self.mark = self.len;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn edit_mark(&self) -> usize {
        self.mark
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    /// Full transcript text, styles dropped.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Text of the edit region, from the mark to the end.
    pub fn region_text(&self) -> String {
        self.suffix_from(self.mark)
    }

    /// Inserts text at `at`, which must lie inside the edit region
    /// (`mark ≤ at ≤ len`). Inserting at the very end opens a new run with
    /// the given style; inserting mid-run inherits that run's style.
    pub fn insert_in_region(&mut self, at: usize, text: &str, style: TextStyle) {
        debug_assert!(at >= self.mark && at <= self.len);
        if text.is_empty() {
            return;
        }
        if at == self.len {
            self.push_run(text, style);
        } else {
            let (idx, offset) = self.locate(at);
            let run = &mut self.runs[idx];
            let byte = byte_index(&run.text, offset);
            run.text.insert_str(byte, text);
        }
        self.len += text.chars().count();
    }

    /// Removes the char immediately before `at`. The removed char must lie
    /// inside the edit region (`at > mark`).
    pub fn delete_before(&mut self, at: usize) {
        debug_assert!(at > self.mark && at <= self.len);
        if at == 0 || at > self.len {
            return;
        }
        let (idx, offset) = self.locate(at - 1);
        if idx >= self.runs.len() {
            return;
        }
        let byte = byte_index(&self.runs[idx].text, offset);
        self.runs[idx].text.remove(byte);
        if self.runs[idx].text.is_empty() {
            self.runs.remove(idx);
        }
        self.len -= 1;
    }

    /// Replaces the whole edit region with `text`.
    pub fn replace_region(&mut self, text: &str, style: TextStyle) {
        self.truncate_to_mark();
        if !text.is_empty() {
            self.push_run(text, style);
            self.len += text.chars().count();
        }
    }

    fn truncate_to_mark(&mut self) {
        if self.len == self.mark {
            return;
        }
        let (idx, offset) = self.locate(self.mark);
        if idx < self.runs.len() {
            if offset == 0 {
                self.runs.truncate(idx);
            } else {
                let byte = byte_index(&self.runs[idx].text, offset);
                self.runs[idx].text.truncate(byte);
                self.runs.truncate(idx + 1);
            }
        }
        self.len = self.mark;
    }

    /// Appends to the trailing run when styles match, else starts a new run.
    fn push_run(&mut self, text: &str, style: TextStyle) {
        if let Some(last) = self.runs.last_mut() {
            if last.style == style {
                last.text.push_str(text);
                return;
            }
        }
        self.runs.push(StyledRun {
            text: text.to_string(),
            style,
        });
    }

    /// Maps a char position to (run index, char offset within the run).
    /// A position equal to `len` maps past the last run.
    fn locate(&self, pos: usize) -> (usize, usize) {
        let mut remaining = pos;
        for (idx, run) in self.runs.iter().enumerate() {
            let chars = run.text.chars().count();
            if remaining < chars {
                return (idx, remaining);
            }
            remaining -= chars;
        }
        (self.runs.len(), 0)
    }

    fn suffix_from(&self, pos: usize) -> String {
        if pos >= self.len {
            return String::new();
        }
        let (idx, offset) = self.locate(pos);
        let mut out = String::new();
        for (i, run) in self.runs.iter().enumerate().skip(idx) {
            if i == idx {
                let byte = byte_index(&run.text, offset);
                out.push_str(&run.text[byte..]);
            } else {
                out.push_str(&run.text);
            }
        }
        out
    }
}

/// Byte index of the `char_offset`-th char; `text.len()` when past the end.
fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn append_coalesces_matching_styles() {
        let mut buffer = ScrollbackBuffer::default();
        buffer.append("one", TextStyle::Normal);
        buffer.append(" two", TextStyle::Normal);
        buffer.append("!", TextStyle::Error);
        assert_eq!(buffer.runs().len(), 2);
        assert_eq!(buffer.text(), "one two!");
        assert_eq!(buffer.len(), 8);
    }

    #[test]
    fn clear_resets_length_and_mark() {
        let mut buffer = ScrollbackBuffer::default();
        buffer.append("prompt$ ", TextStyle::Prompt);
        buffer.seal();
        buffer.clear();
        assert_eq!(buffer.len(), 0);
        assert_eq!(buffer.edit_mark(), 0);
        assert!(buffer.runs().is_empty());
    }

    #[test]
    fn seal_moves_mark_to_end() {
        let mut buffer = ScrollbackBuffer::default();
        buffer.append("$ ", TextStyle::Prompt);
        assert_eq!(buffer.edit_mark(), 0);
        buffer.seal();
        assert_eq!(buffer.edit_mark(), 2);
        assert_eq!(buffer.region_text(), "");
    }

    #[test]
    fn region_insert_and_delete_round_trip() {
        let mut buffer = ScrollbackBuffer::default();
        buffer.append("$ ", TextStyle::Prompt);
        buffer.seal();
        buffer.insert_in_region(2, "ls", TextStyle::Normal);
        buffer.insert_in_region(3, "x", TextStyle::Normal);
        assert_eq!(buffer.region_text(), "lxs");
        buffer.delete_before(4);
        assert_eq!(buffer.region_text(), "ls");
        assert_eq!(buffer.text(), "$ ls");
    }

    #[test]
    fn delete_drops_emptied_runs() {
        let mut buffer = ScrollbackBuffer::default();
        buffer.append("$ ", TextStyle::Prompt);
        buffer.seal();
        buffer.insert_in_region(2, "a", TextStyle::Normal);
        buffer.delete_before(3);
        assert_eq!(buffer.runs().len(), 1);
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn multibyte_chars_use_char_offsets() {
        let mut buffer = ScrollbackBuffer::default();
        buffer.append("é ", TextStyle::Prompt);
        buffer.seal();
        buffer.insert_in_region(2, "日本", TextStyle::Normal);
        assert_eq!(buffer.len(), 4);
        buffer.insert_in_region(3, "語", TextStyle::Normal);
        assert_eq!(buffer.region_text(), "日語本");
        buffer.delete_before(4);
        assert_eq!(buffer.region_text(), "日本");
    }

    #[test]
    fn replace_region_splits_a_merged_run() {
        let mut buffer = ScrollbackBuffer::default();
        buffer.append("out\n", TextStyle::Normal);
        buffer.seal();
        // Same style as the sealed text, so the run coalesces across the mark.
        buffer.insert_in_region(4, "typed", TextStyle::Normal);
        assert_eq!(buffer.runs().len(), 1);
        buffer.replace_region("new", TextStyle::Normal);
        assert_eq!(buffer.text(), "out\nnew");
        assert_eq!(buffer.region_text(), "new");
        buffer.replace_region("", TextStyle::Normal);
        assert_eq!(buffer.text(), "out\n");
        assert_eq!(buffer.len(), buffer.edit_mark());
    }

    #[test]
    fn region_text_spans_multiple_runs() {
        let mut buffer = ScrollbackBuffer::default();
        buffer.append("$ ", TextStyle::Prompt);
        buffer.seal();
        buffer.insert_in_region(2, "a", TextStyle::Normal);
        buffer.insert_in_region(3, "b", TextStyle::Error);
        assert_eq!(buffer.region_text(), "ab");
    }
}
