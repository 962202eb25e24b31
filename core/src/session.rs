//! Session orchestration.
//!
//! A [`Session`] owns the scrollback buffer, the history list, the working
//! directory and the busy flag, and is the only place any of them change.
//! Frontends feed it edit operations and finalized lines and read the buffer
//! back out for rendering; external command results re-enter through
//! [`Session::apply_result`] on the owning thread.

use std::path::Path;
use std::path::PathBuf;

use crate::builtins;
use crate::builtins::Builtin;
use crate::builtins::ParsedLine;
use crate::completion;
use crate::edit_region;
use crate::exec::DEFAULT_TIMEOUT;
use crate::exec::ExecutionRequest;
use crate::exec::ExecutionResult;
use crate::exec::ExternalExecutor;
use crate::history::HistoryList;
use crate::paths;
use crate::prompt;
use crate::prompt::PromptContext;
use crate::scrollback::ScrollbackBuffer;
use crate::scrollback::TextStyle;

/// How many entries the `history` builtin lists.
const HISTORY_DISPLAY_MAX: usize = 20;

/// Typed input renders as regular text; only the prompt is highlighted.
const INPUT_STYLE: TextStyle = TextStyle::Normal;

const HELP_TEXT: &str = "\
Available commands:
  help            Show this help text
  clear           Clear the screen
  cd [path]       Change the working directory (no path: go home)
  history         Show the most recent commands
  exit, quit      End the session

Up/Down browse history, Tab completes file paths.

";

/// What a finalized line turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Handled synchronously; a fresh prompt is already in the buffer.
    Handled,
    /// Forwarded to the host shell; the session is busy until the result
    /// comes back through [`Session::apply_result`].
    Submitted,
    /// A command is already in flight. Nothing was consumed; the typed line
    /// stays in the edit region.
    Busy,
    /// `exit`/`quit`: the owner should persist state and shut down.
    Exit,
}

pub struct Session {
    buffer: ScrollbackBuffer,
    history: HistoryList,
    prompt: PromptContext,
    working_dir: PathBuf,
    executor: ExternalExecutor,
    /// Cursor position in the buffer, always within the edit region.
    cursor: usize,
    busy: bool,
}

impl Session {
    pub fn new(prompt: PromptContext, working_dir: PathBuf, executor: ExternalExecutor) -> Self {
        Self {
            buffer: ScrollbackBuffer::default(),
            history: HistoryList::new(),
            prompt,
            working_dir,
            executor,
            cursor: 0,
            busy: false,
        }
    }

    /// Restores history persisted by an earlier session. Call before
    /// [`Session::start`].
    pub fn seed_history(&mut self, entries: Vec<String>) {
        self.history = HistoryList::seeded(entries);
    }

    /// Appends info-styled text ahead of the first prompt.
    pub fn append_banner(&mut self, text: &str) {
        self.buffer.append(text, TextStyle::Info);
    }

    /// Emits the first prompt. Call once, after any banner text.
    pub fn start(&mut self) {
        self.emit_prompt();
    }

    pub fn buffer(&self) -> &ScrollbackBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn history_entries(&self) -> &[String] {
        self.history.entries()
    }

    /// Inserts text at the cursor. Dropped silently when the cursor sits
    /// below the edit-region mark.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !edit_region::allows_insert(self.buffer.edit_mark(), self.cursor) {
            return;
        }
        self.buffer.insert_in_region(self.cursor, text, INPUT_STYLE);
        self.cursor += text.chars().count();
    }

    /// Deletes the char before the cursor. Dropped silently when that char
    /// lies outside the edit region.
    pub fn backspace(&mut self) {
        if !edit_region::allows_delete(self.buffer.edit_mark(), self.cursor) {
            return;
        }
        self.buffer.delete_before(self.cursor);
        self.cursor -= 1;
    }

    pub fn move_left(&mut self) {
        let target = self.cursor.saturating_sub(1);
        self.cursor = edit_region::clamp_cursor(self.buffer.edit_mark(), target);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.buffer.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = edit_region::clamp_cursor(self.buffer.edit_mark(), 0);
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    /// Up arrow: replace the edit region with the previous history entry.
    pub fn history_previous(&mut self) {
        if let Some(entry) = self.history.previous() {
            self.buffer.replace_region(&entry, INPUT_STYLE);
            self.cursor = self.buffer.len();
        }
    }

    /// Down arrow: the entry after the cursor, or an empty line past the end.
    pub fn history_next(&mut self) {
        let entry = self.history.next();
        self.buffer.replace_region(&entry, INPUT_STYLE);
        self.cursor = self.buffer.len();
    }

    /// Tab: complete the last token of the edit region as a path. Zero or
    /// multiple matches leave the region untouched.
    pub fn complete_path(&mut self) {
        let region = self.buffer.region_text();
        let completed = completion::complete_line(&region, &self.working_dir, self.prompt.home());
        if let Some(line) = completed {
            self.buffer.replace_region(&line, INPUT_STYLE);
            self.cursor = self.buffer.len();
        }
    }

    /// Ctrl+C: echo `^C` and drop any unsent input. Idle gets a fresh
    /// prompt; while busy the next prompt arrives with the pending result.
    pub fn interrupt(&mut self) {
        self.buffer.replace_region("", INPUT_STYLE);
        self.buffer.append("^C\n", TextStyle::Normal);
        self.buffer.seal();
        if self.busy {
            self.cursor = self.buffer.len();
        } else {
            self.emit_prompt();
        }
    }

    /// Ctrl+L: wipe the transcript but keep whatever was typed.
    pub fn clear_screen(&mut self) {
        let pending = self.buffer.region_text();
        self.buffer.clear();
        if !self.busy {
            self.emit_prompt();
        }
        self.buffer.append(&pending, INPUT_STYLE);
        self.cursor = self.buffer.len();
    }

    /// Enter: finalize the edit region and dispatch it.
    pub fn submit_line(&mut self) -> DispatchOutcome {
        if self.busy {
            return DispatchOutcome::Busy;
        }
        let line = self.buffer.region_text().trim().to_string();
        self.buffer.append("\n", TextStyle::Normal);
        self.buffer.seal();
        self.cursor = self.buffer.len();
        if line.is_empty() {
            self.emit_prompt();
            return DispatchOutcome::Handled;
        }
        self.history.append(&line);
        match builtins::parse_line(&line) {
            ParsedLine::Builtin { command, arg } => self.run_builtin(command, arg.as_deref()),
            ParsedLine::External { line } => {
                tracing::debug!("forwarding to host shell: {line:?}");
                self.busy = true;
                self.executor
                    .submit(ExecutionRequest::new(line, self.working_dir.clone()));
                DispatchOutcome::Submitted
            }
        }
    }

    /// Applies a delivered execution result: output lands ahead of the fresh
    /// prompt, and anything typed while busy carries over into the new edit
    /// region.
    pub fn apply_result(&mut self, result: ExecutionResult) {
        let pending = self.buffer.region_text();
        self.buffer.replace_region("", INPUT_STYLE);
        self.busy = false;
        match result {
            ExecutionResult::Completed { stdout, stderr } => {
                let ends_with_newline = if !stderr.is_empty() {
                    stderr.ends_with('\n')
                } else if !stdout.is_empty() {
                    stdout.ends_with('\n')
                } else {
                    true
                };
                self.buffer.append(&stdout, TextStyle::Normal);
                self.buffer.append(&stderr, TextStyle::Error);
                if !ends_with_newline {
                    self.buffer.append("\n", TextStyle::Normal);
                }
            }
            ExecutionResult::TimedOut => {
                let secs = DEFAULT_TIMEOUT.as_secs();
                self.buffer.append(
                    &format!("Command timed out after {secs} seconds\n"),
                    TextStyle::Error,
                );
            }
            ExecutionResult::NotFound { program } => {
                self.buffer.append(
                    &format!("bash: {program}: command not found\n"),
                    TextStyle::Error,
                );
            }
            ExecutionResult::Failed { message } => {
                self.buffer
                    .append(&format!("Error: {message}\n"), TextStyle::Error);
            }
        }
        self.emit_prompt();
        self.buffer.append(&pending, INPUT_STYLE);
        self.cursor = self.buffer.len();
    }

    fn run_builtin(&mut self, command: Builtin, arg: Option<&str>) -> DispatchOutcome {
        match command {
            Builtin::Help => self.buffer.append(HELP_TEXT, TextStyle::Info),
            Builtin::Clear => self.buffer.clear(),
            Builtin::Cd => self.change_dir(arg),
            Builtin::History => self.show_history(),
            Builtin::Exit => return DispatchOutcome::Exit,
        }
        self.emit_prompt();
        DispatchOutcome::Handled
    }

    /// No argument goes home. A target that is not an existing directory
    /// leaves the working directory untouched and reports the resolved path.
    fn change_dir(&mut self, arg: Option<&str>) {
        let raw = arg.unwrap_or("~");
        let target = paths::resolve_target(raw, &self.working_dir, self.prompt.home());
        if target.is_dir() {
            self.working_dir = target;
        } else {
            let path = target.display();
            self.buffer.append(
                &format!("bash: cd: {path}: No such file or directory\n"),
                TextStyle::Error,
            );
        }
    }

    fn show_history(&mut self) {
        if self.history.is_empty() {
            self.buffer
                .append("No commands in history\n", TextStyle::Normal);
            return;
        }
        self.buffer.append("Command History:\n", TextStyle::Info);
        let entries = self.history.entries();
        let start = entries.len().saturating_sub(HISTORY_DISPLAY_MAX);
        let mut listing = String::new();
        for (i, entry) in entries[start..].iter().enumerate() {
            let number = i + 1;
            listing.push_str(&format!("{number:>3}: {entry}\n"));
        }
        self.buffer.append(&listing, TextStyle::Normal);
    }

    fn emit_prompt(&mut self) {
        prompt::emit(&mut self.buffer, &self.prompt, &self.working_dir);
        self.cursor = self.buffer.len();
    }
}
