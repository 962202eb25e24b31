// Forbid accidental stdout/stderr writes in the library portion of the TUI.
// While the alternate screen is active, anything printed there corrupts the
// display; the library logs through tracing instead.
#![deny(clippy::print_stdout, clippy::print_stderr)]

use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;

use tracing_appender::non_blocking;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use viridian_core::Session;
use viridian_core::SessionRecord;
use viridian_core::exec::ExternalExecutor;
use viridian_core::prompt::PromptContext;
use viridian_core::store::SessionStore;
use viridian_core::store::find_state_home;

use app::App;

mod app;
mod app_event;
mod app_event_sender;
mod cli;
mod colors;
mod greeting;
mod tui;
mod view;

pub use cli::Cli;

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    let state_dir = match &cli.state_dir {
        Some(dir) => dir.clone(),
        None => find_state_home()?,
    };

    let log_dir = state_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Open (or create) the log file, appending to it.
    let mut log_file_opts = OpenOptions::new();
    log_file_opts.create(true).append(true);

    // Ensure the file is only readable and writable by the current user.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        log_file_opts.mode(0o600);
    }

    let log_file = log_file_opts.open(log_dir.join("viridian-tui.log"))?;

    // Wrap the file in a non-blocking writer so logging never stalls a draw.
    let (non_blocking, _guard) = non_blocking(log_file);

    let default_filter = if cli.debug {
        "viridian_core=debug,viridian_tui=debug"
    } else {
        "viridian_core=info,viridian_tui=info"
    };

    // Use the RUST_LOG env var when set, defaulting based on the debug flag.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_target(false)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(file_layer).try_init();

    run_ratatui_app(&cli, &state_dir)
}

fn run_ratatui_app(cli: &Cli, state_dir: &Path) -> anyhow::Result<()> {
    // Forward panic reports into the log. The hook installed by `tui::init`
    // restores the terminal before this one runs.
    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("panic: {info}");
        prev_hook(info);
    }));

    let store = SessionStore::new(state_dir);
    let mut record = store.load();

    let prompt = PromptContext::from_env();
    let working_dir = initial_working_dir(cli, &record, prompt.home());
    tracing::info!("starting session in {}", working_dir.display());

    let (executor, exec_rx) = ExternalExecutor::new();
    let mut session = Session::new(prompt, working_dir, executor);
    session.seed_history(record.history.clone());
    session.append_banner(&greeting::banner());
    session.start();

    let mut terminal = tui::init()?;
    terminal.clear()?;

    let mut app = App::new(session, exec_rx);
    let app_result = app.run(&mut terminal);

    // The record keeps its font untouched so other frontends can honor it.
    record.working_directory = Some(app.session().working_dir().to_path_buf());
    record.history = app.session().history_entries().to_vec();
    store.save(&record);

    restore();
    app_result
}

/// `--cd` beats the persisted directory, which in turn is used only while it
/// still exists; otherwise the session starts where the process did.
fn initial_working_dir(cli: &Cli, record: &SessionRecord, home: &Path) -> PathBuf {
    if let Some(dir) = &cli.cd {
        return dir.canonicalize().unwrap_or_else(|_| dir.clone());
    }
    if let Some(dir) = &record.working_directory {
        if dir.is_dir() {
            return dir.clone();
        }
    }
    std::env::current_dir().unwrap_or_else(|_| home.to_path_buf())
}

#[expect(
    clippy::print_stderr,
    reason = "the terminal is restored at this point, so stderr is visible again"
)]
fn restore() {
    if let Err(err) = tui::restore() {
        eprintln!(
            "failed to restore terminal. Run `reset` or restart your terminal to recover: {err}"
        );
    }
}
