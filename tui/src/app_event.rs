use crossterm::event::KeyEvent;
use viridian_core::ExecutionResult;

#[derive(Debug)]
pub(crate) enum AppEvent {
    KeyEvent(KeyEvent),

    /// Bracketed paste from the terminal.
    Paste(String),

    /// Result of the in-flight external command, forwarded from the
    /// executor channel so it is applied on the app thread.
    ExecResult(ExecutionResult),

    /// Request a redraw which will be debounced by the [`crate::app::App`].
    RequestRedraw,

    /// Actually draw the next frame.
    Redraw,

    /// Leave the event loop and shut down.
    ExitRequest,
}
