//! Job queue and worker pool.
//!
//! The producer (the caller of [`Pipeline::run`]) normalizes targets and
//! pushes jobs into a bounded channel sized to the worker count. `N` workers
//! share the receiving end and pull jobs until the channel is closed and
//! drained. Closing the channel is the only termination signal.
//!
//! A failed job is reported and counted; it never stops its worker or the
//! batch. Completion order across workers is unspecified.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use batchget_schema::Target;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::executor::{InstallOutcome, Installer};
use crate::normalize::{Job, Normalized, normalize};
use crate::probe::InstalledSet;
use crate::reporter::Reporter;

/// Counts for one run. Per-job failures are informational only; they do not
/// change the process exit status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Jobs handed to the queue.
    pub queued: usize,
    /// Targets skipped as already installed.
    pub skipped: usize,
    /// Jobs whose installation succeeded.
    pub succeeded: usize,
    /// Jobs only reported, not run (dry run).
    pub planned: usize,
    /// Jobs whose installation failed.
    pub failed: usize,
}

#[derive(Debug, Default)]
struct Counters {
    succeeded: AtomicUsize,
    planned: AtomicUsize,
    failed: AtomicUsize,
}

type SharedQueue = Arc<Mutex<mpsc::Receiver<Job>>>;

/// Fixed-size worker pool fed by a bounded queue.
#[derive(Clone)]
pub struct Pipeline {
    installer: Arc<dyn Installer>,
    reporter: Arc<dyn Reporter>,
    workers: usize,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a pool of `workers` workers (at least one).
    pub fn new(installer: Arc<dyn Installer>, reporter: Arc<dyn Reporter>, workers: usize) -> Self {
        Self {
            installer,
            reporter,
            workers: workers.max(1),
        }
    }

    /// Number of workers this pipeline starts.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Install every target not in `installed`, at most `workers` at a time,
    /// and return once each queued job has been attempted exactly once.
    pub async fn run(&self, targets: Vec<Target>, installed: &InstalledSet) -> BatchSummary {
        let (tx, rx) = mpsc::channel::<Job>(self.workers);
        let queue: SharedQueue = Arc::new(Mutex::new(rx));
        let counters = Arc::new(Counters::default());

        let mut set = JoinSet::new();
        for worker in 0..self.workers {
            set.spawn(work(
                worker,
                queue.clone(),
                self.installer.clone(),
                self.reporter.clone(),
                counters.clone(),
            ));
        }

        let mut summary = BatchSummary::default();
        for target in targets {
            match normalize(target, installed) {
                Normalized::Skip(target) => {
                    self.reporter.skipped(&target.id);
                    summary.skipped += 1;
                }
                Normalized::Job(job) => {
                    if let Err(mpsc::error::SendError(job)) = tx.send(job).await {
                        // every worker is gone; nothing left to run the rest
                        error!(package = %job.target.id, "job queue closed unexpectedly");
                        break;
                    }
                    summary.queued += 1;
                }
            }
        }
        drop(tx);

        while let Some(res) = set.join_next().await {
            if let Err(e) = res {
                error!("installer worker terminated abnormally: {e}");
            }
        }

        summary.succeeded = counters.succeeded.load(Ordering::Relaxed);
        summary.planned = counters.planned.load(Ordering::Relaxed);
        summary.failed = counters.failed.load(Ordering::Relaxed);
        summary
    }
}

async fn work(
    worker: usize,
    queue: SharedQueue,
    installer: Arc<dyn Installer>,
    reporter: Arc<dyn Reporter>,
    counters: Arc<Counters>,
) {
    loop {
        // The lock is only held while waiting for the next job.
        let next = queue.lock().await.recv().await;
        let Some(job) = next else {
            break;
        };

        debug!(worker, package = %job.target.id, "picked up job");
        match installer.install(&job).await {
            Ok(InstallOutcome::Installed) => {
                counters.succeeded.fetch_add(1, Ordering::Relaxed);
                reporter.done(&job.short_name);
            }
            Ok(InstallOutcome::Planned) => {
                counters.planned.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::Relaxed);
                reporter.failed(&job.short_name, &e.to_string());
            }
        }
    }
    debug!(worker, "queue drained, worker exiting");
}
