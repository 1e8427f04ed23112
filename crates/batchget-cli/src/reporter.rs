//! Terminal reporter.
//!
//! Package manager output goes to stdout, one `[<name>] <line>` per line, so
//! concurrent installs stay readable when interleaved. Everything else is a
//! `tracing` event.

use std::io::Write;

use batchget_core::{BatchSummary, Reporter};
use batchget_schema::PackageId;
use tracing::{debug, error, info};

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

/// Prefix a line of child output with the package's short name.
pub fn format_output_line(name: &str, line: &str) -> String {
    format!("[{name}] {line}")
}

impl Reporter for ConsoleReporter {
    fn skipped(&self, id: &PackageId) {
        info!("skip installed app: {id}");
    }

    fn started(&self, name: &str, command: &str) {
        info!("[{name}] start install: {command}");
    }

    fn output(&self, name: &str, line: &str) {
        // one locked write per line keeps lines from different workers whole
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", format_output_line(name, line)) {
            debug!("write to stdout failed: {e}");
        }
    }

    fn done(&self, name: &str) {
        info!("[{name}] install finished");
    }

    fn failed(&self, _name: &str, reason: &str) {
        error!("{reason}");
    }

    fn summary(&self, summary: &BatchSummary) {
        info!(
            queued = summary.queued,
            skipped = summary.skipped,
            succeeded = summary.succeeded,
            planned = summary.planned,
            failed = summary.failed,
            "batch finished"
        );
    }
}
