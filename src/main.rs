use clap::Parser;
use repomerge::presentation::cli::{default_log_directives, Cli, CliApp};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence; otherwise -v raises the filter to debug.
    // Diagnostics go to stderr, user-facing progress to stdout regardless.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directives(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    CliApp::new().run(cli).await
}
