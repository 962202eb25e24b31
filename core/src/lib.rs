//! Root of the `viridian-core` library: the session engine behind the
//! `viridian` terminal frontend.
//!
//! Everything here is display-agnostic. The frontend owns the event loop
//! and the screen; this crate owns the transcript, the edit-region
//! contract, history, builtin commands, and external command execution.

// Prevent accidental direct writes to stdout/stderr in library code. All
// user-visible output must go through the scrollback buffer or tracing.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod builtins;
pub mod completion;
pub mod edit_region;
pub mod exec;
pub mod history;
pub mod paths;
pub mod prompt;
pub mod scrollback;
pub mod session;
pub mod store;

pub use exec::ExecutionRequest;
pub use exec::ExecutionResult;
pub use scrollback::StyledRun;
pub use scrollback::TextStyle;
pub use session::DispatchOutcome;
pub use session::Session;
pub use store::SessionRecord;
