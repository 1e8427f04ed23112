//! Installed-package probe.
//!
//! Runs the package manager's listing query once before any job is queued.
//! The listing is tabular: a header line, a separator line, then one package
//! per line with the identifier in the first column.

use std::collections::HashSet;

use batchget_schema::PackageId;
use tokio::process::Command;
use tracing::debug;

use crate::error::ProbeError;

/// Number of leading lines (header and separator) in the listing.
const HEADER_LINES: usize = 2;

/// Lower-cased identifiers of the packages present at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledSet(HashSet<String>);

impl InstalledSet {
    /// Whether `id` is installed, ignoring case.
    pub fn contains(&self, id: &PackageId) -> bool {
        self.0.contains(&id.comparison_key())
    }

    /// Number of installed packages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing is installed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for InstalledSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

/// Parse the listing printed by the probe query.
///
/// # Errors
///
/// Returns [`ProbeError::Unparsable`] if the text has fewer lines than the
/// header and separator.
pub fn parse_installed(text: &str) -> Result<InstalledSet, ProbeError> {
    let trimmed = text.trim();
    let lines: Vec<&str> = trimmed.lines().collect();
    if lines.len() < HEADER_LINES {
        return Err(ProbeError::Unparsable(trimmed.to_string()));
    }

    Ok(lines[HEADER_LINES..]
        .iter()
        .filter_map(|line| line.split_whitespace().next())
        .collect())
}

/// Run the probe query given as a full argument vector and parse its
/// combined output.
///
/// # Errors
///
/// Returns [`ProbeError::EmptyCommand`] for an empty `argv`,
/// [`ProbeError::Spawn`] if the program cannot be started,
/// [`ProbeError::Status`] if it exits unsuccessfully, and
/// [`ProbeError::Unparsable`] for output without the table header.
pub async fn probe(argv: &[String]) -> Result<InstalledSet, ProbeError> {
    let (program, args) = argv.split_first().ok_or(ProbeError::EmptyCommand)?;

    debug!(%program, ?args, "querying installed packages");
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|source| ProbeError::Spawn {
            program: program.clone(),
            source,
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(ProbeError::Status {
            code: output.status.code(),
            output: combined.trim().to_string(),
        });
    }

    let installed = parse_installed(&combined)?;
    debug!(count = installed.len(), "installed packages found");
    Ok(installed)
}
