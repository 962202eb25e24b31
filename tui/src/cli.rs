use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Start the session in the specified directory instead of the one
    /// recorded last time.
    #[clap(long = "cd", short = 'C', value_name = "DIR")]
    pub cd: Option<PathBuf>,

    /// Where session state and logs live. Defaults to `$VIRIDIAN_HOME`,
    /// falling back to `~/.viridian`.
    #[clap(long = "state-dir", value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Enable verbose logging.
    #[clap(long = "debug", short = 'd', default_value_t = false)]
    pub debug: bool,
}
