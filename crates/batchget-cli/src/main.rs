//! batchget - batch package installer CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use batchget_cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; child output owns stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    batchget_cli::run(&cli).await?;
    Ok(())
}
