use clap::Parser;
use viridian_tui::Cli;
use viridian_tui::run_main;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_main(cli))
}
