//! Installation executor.
//!
//! One call to [`Installer::install`] handles one job end to end: resolve the
//! install path, create it, run the package manager with its output streamed
//! line by line to the [`Reporter`], and map the exit status to a result.

use std::path::{PathBuf, is_separator};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use batchget_schema::LocationMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::command::InstallCommand;
use crate::error::InstallError;
use crate::hygiene::DirGuard;
use crate::normalize::Job;
use crate::reporter::Reporter;

/// What a successful [`Installer::install`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The package manager ran and exited successfully.
    Installed,
    /// Dry run: the command was reported but nothing was executed.
    Planned,
}

/// Performs the installation side effect for one job.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Install `job`.
    ///
    /// # Errors
    ///
    /// Returns an [`InstallError`] naming the job when the installation
    /// cannot be started or does not succeed. Errors are per job and never
    /// abort the batch.
    async fn install(&self, job: &Job) -> Result<InstallOutcome, InstallError>;
}

/// Resolve the absolute install directory of `job`: the location root with
/// trailing separators stripped, then the job's subpath.
///
/// # Errors
///
/// Returns [`InstallError::UnknownLocation`] if the job's `link` is not a
/// configured location.
pub fn resolve_install_path(locations: &LocationMap, job: &Job) -> Result<PathBuf, InstallError> {
    let root = locations
        .get(&job.target.link)
        .ok_or_else(|| InstallError::UnknownLocation {
            name: job.short_name.clone(),
            link: job.target.link.clone(),
        })?;

    let root = root.trim_end_matches(is_separator);
    let mut joined = String::with_capacity(root.len() + 1 + job.target.path.len());
    joined.push_str(root);
    joined.push(std::path::MAIN_SEPARATOR);
    joined.push_str(&job.target.path);
    Ok(PathBuf::from(joined))
}

/// Runs the external package manager as a child process.
#[derive(Clone)]
pub struct ProcessInstaller {
    command: Vec<String>,
    locations: Arc<LocationMap>,
    reporter: Arc<dyn Reporter>,
    dry_run: bool,
}

impl std::fmt::Debug for ProcessInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessInstaller")
            .field("command", &self.command)
            .field("locations", &self.locations)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl ProcessInstaller {
    /// Create an installer that spawns `command` (program plus leading
    /// arguments) for every job.
    pub fn new(
        command: Vec<String>,
        locations: Arc<LocationMap>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            command,
            locations,
            reporter,
            dry_run: false,
        }
    }

    /// Only report the commands; touch neither the filesystem nor processes.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    async fn run(&self, job: &Job, command: &InstallCommand) -> Result<(), InstallError> {
        let name = &job.short_name;

        let mut child = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| InstallError::Spawn {
                name: name.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| InstallError::Stdout { name: name.clone() })?;

        stream_lines(BufReader::new(stdout), |line| self.reporter.output(name, line)).await;

        let status = child.wait().await.map_err(|source| InstallError::Wait {
            name: name.clone(),
            source,
        })?;
        debug!(package = %name, %status, "package manager exited");

        if status.success() {
            Ok(())
        } else {
            Err(InstallError::Failed {
                name: name.clone(),
                code: status.code(),
            })
        }
    }
}

#[async_trait]
impl Installer for ProcessInstaller {
    async fn install(&self, job: &Job) -> Result<InstallOutcome, InstallError> {
        let path = resolve_install_path(&self.locations, job)?;
        let command = InstallCommand::new(&self.command, job, &path);

        if self.dry_run {
            self.reporter
                .started(&job.short_name, &format!("(dry run) {command}"));
            return Ok(InstallOutcome::Planned);
        }

        // Dropped on every return below, removing the directory if still empty.
        let _guard = DirGuard::acquire(&path).map_err(|source| InstallError::CreateDir {
            name: job.short_name.clone(),
            path: path.clone(),
            source,
        })?;

        self.reporter
            .started(&job.short_name, &command.to_string());
        self.run(job, &command).await?;
        Ok(InstallOutcome::Installed)
    }
}

/// Feed every line of `reader` to `on_line` as it arrives, until end of
/// stream. Invalid UTF-8 is replaced rather than treated as an error.
async fn stream_lines<R, F>(mut reader: R, mut on_line: F)
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&str),
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                on_line(line.trim_end_matches(['\r', '\n']));
            }
            Err(e) => {
                warn!("reading package manager output failed: {e}");
                break;
            }
        }
    }
}
