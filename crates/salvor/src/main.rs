mod cli;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = cli::Cli::parse();
    match cli.command {
        cli::Command::Fetch(cmd) => cmd.run().await,
        cli::Command::Verify(cmd) => cmd.run(),
    }
}

/// RUST_LOG-filtered diagnostics; the per-asset/per-file console lines are
/// printed unconditionally by the pipelines themselves.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
