//! batchget - batch package installs
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
//!
//! Reads a list of packages and install locations from a TOML file, skips
//! the ones the package manager already reports as installed, and installs
//! the rest with a fixed number of concurrent package manager processes.
//!
//! Per-package failures are logged and do not change the exit status; only
//! configuration and probe errors make the process fail.

pub mod reporter;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use batchget_core::{BatchSummary, Pipeline, ProcessInstaller, Reporter, probe};
use batchget_schema::{Config, DEFAULT_CONFIG_FILE};

pub use crate::reporter::ConsoleReporter;

#[derive(Debug, Parser)]
#[command(name = "batchget")]
#[command(author, version, about = "batchget - install a list of packages through winget")]
pub struct Cli {
    /// Configuration file
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Number of concurrent installations
    #[arg(
        short = 'n',
        long = "concurrency",
        default_value_t = 4,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub concurrency: u16,

    /// Show the install commands without running them
    #[arg(long)]
    pub dry_run: bool,
}

/// Run one batch: load the configuration, probe installed packages, and
/// install everything else.
pub async fn run(cli: &Cli) -> Result<BatchSummary> {
    let Config {
        location,
        target,
        manager,
    } = load_config(cli)?;

    let installed = probe(&manager.probe)
        .await
        .context("Failed to query installed packages")?;
    info!(count = installed.len(), "found installed packages");

    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::new());
    let installer = ProcessInstaller::new(manager.command, Arc::new(location), reporter.clone())
        .with_dry_run(cli.dry_run);
    let pipeline = Pipeline::new(
        Arc::new(installer),
        reporter.clone(),
        usize::from(cli.concurrency),
    );
    debug!(workers = pipeline.workers(), dry_run = cli.dry_run, "starting installs");

    let summary = pipeline.run(target, &installed).await;
    reporter.summary(&summary);
    Ok(summary)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load(&cli.config).context("load the configuration file failed")?;

    for (first, second) in config.path_collisions() {
        warn!("{second} installs into the same directory as {first}");
    }
    for t in config.target.iter().filter(|t| config.root(&t.link).is_none()) {
        warn!("{} links to unknown location `{}`", t.id, t.link);
    }

    Ok(config)
}
