//! Error types for probing and installing.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to determine the installed-package set. Always fatal for the run.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// No query command was configured.
    #[error("installed-package query is empty")]
    EmptyCommand,

    /// The query process could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The query ran but exited unsuccessfully.
    #[error("get installed app failed (exit code {code:?}): {output}")]
    Status {
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Combined output of the query, trimmed.
        output: String,
    },

    /// The query output lacks the header and separator lines.
    #[error("unexpected installed-package listing: {0:?}")]
    Unparsable(String),
}

/// Failure of a single installation job.
///
/// Every variant names the target's short name so logged errors can be
/// matched to the interleaved output of concurrent installs.
#[derive(Error, Debug)]
pub enum InstallError {
    /// The target's `link` does not name a configured location.
    #[error("[{name}] unknown location `{link}`")]
    UnknownLocation {
        /// Short name of the target.
        name: String,
        /// The unresolved location key.
        link: String,
    },

    /// The install directory could not be created.
    #[error("[{name}] check path error: {}: {source}", .path.display())]
    CreateDir {
        /// Short name of the target.
        name: String,
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The package manager could not be started.
    #[error("[{name}] error starting command: {source}")]
    Spawn {
        /// Short name of the target.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The child's standard output was not captured.
    #[error("[{name}] error creating stdout pipe for command")]
    Stdout {
        /// Short name of the target.
        name: String,
    },

    /// Waiting for the child failed.
    #[error("[{name}] error waiting for command: {source}")]
    Wait {
        /// Short name of the target.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The package manager exited unsuccessfully.
    #[error("[{name}] install failed (exit code {code:?})")]
    Failed {
        /// Short name of the target.
        name: String,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
    },
}

impl InstallError {
    /// Short name of the target the error belongs to.
    pub fn name(&self) -> &str {
        match self {
            Self::UnknownLocation { name, .. }
            | Self::CreateDir { name, .. }
            | Self::Spawn { name, .. }
            | Self::Stdout { name }
            | Self::Wait { name, .. }
            | Self::Failed { name, .. } => name,
        }
    }
}
