//! Reporter trait for dependency injection
//!
//! The pipeline reports progress through this trait so the core does not
//! care whether output ends up on a terminal, in a log, or in a test buffer.

use crate::pipeline::BatchSummary;
use batchget_schema::PackageId;

/// Receives progress events from the pipeline. Called concurrently from
/// every worker.
pub trait Reporter: Send + Sync {
    /// A target was filtered out because it is already installed.
    fn skipped(&self, id: &PackageId);

    /// The package manager is about to run for `name`.
    fn started(&self, name: &str, command: &str);

    /// One line of the package manager's output for `name`.
    fn output(&self, name: &str, line: &str);

    /// The installation of `name` succeeded.
    fn done(&self, name: &str);

    /// The installation of `name` failed.
    fn failed(&self, name: &str, reason: &str);

    /// All queued jobs have been attempted.
    fn summary(&self, summary: &BatchSummary);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn skipped(&self, id: &PackageId) {
        (**self).skipped(id);
    }
    fn started(&self, name: &str, command: &str) {
        (**self).started(name, command);
    }
    fn output(&self, name: &str, line: &str) {
        (**self).output(name, line);
    }
    fn done(&self, name: &str) {
        (**self).done(name);
    }
    fn failed(&self, name: &str, reason: &str) {
        (**self).failed(name, reason);
    }
    fn summary(&self, summary: &BatchSummary) {
        (**self).summary(summary);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn skipped(&self, _: &PackageId) {}
    fn started(&self, _: &str, _: &str) {}
    fn output(&self, _: &str, _: &str) {}
    fn done(&self, _: &str) {}
    fn failed(&self, _: &str, _: &str) {}
    fn summary(&self, _: &BatchSummary) {}
}
