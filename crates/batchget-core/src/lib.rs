//! Core installation pipeline for batchget.
//!
//! The flow is:
//!
//! 1. [`probe`] asks the package manager which packages are already installed.
//! 2. [`normalize`] turns each configured target into a [`Job`], or a skip.
//! 3. [`Pipeline`] pushes jobs through a bounded queue to a fixed pool of
//!    workers, each of which hands the job to an [`Installer`].
//! 4. [`ProcessInstaller`] runs the package manager for one job, streaming
//!    its output through the [`Reporter`], and cleans up empty install
//!    directories via [`DirGuard`].

pub mod command;
pub mod error;
pub mod executor;
pub mod hygiene;
pub mod normalize;
pub mod pipeline;
pub mod probe;
pub mod reporter;

#[cfg(test)]
pub(crate) mod testing;

pub use command::InstallCommand;
pub use error::{InstallError, ProbeError};
pub use executor::{InstallOutcome, Installer, ProcessInstaller, resolve_install_path};
pub use hygiene::{DirGuard, remove_if_empty};
pub use normalize::{Job, Normalized, normalize};
pub use pipeline::{BatchSummary, Pipeline};
pub use probe::{InstalledSet, parse_installed, probe};
pub use reporter::{NullReporter, Reporter};
