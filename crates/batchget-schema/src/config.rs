//! Configuration file loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::types::PackageId;

/// Named install roots, keyed by the value targets use in `link`.
pub type LocationMap = BTreeMap<String, String>;

/// Errors raised while loading a configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or does not match the expected layout.
    #[error("Configuration file format error in {}: {source}", .path.display())]
    Parse {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// A `[[target]]` entry has an empty `id`.
    #[error("Target #{index} has an empty id")]
    EmptyId {
        /// One-based position of the target in the file.
        index: usize,
    },

    /// `[manager].command` is empty.
    #[error("manager.command must name the package manager executable")]
    EmptyCommand,

    /// `[manager].probe` is empty.
    #[error("manager.probe must contain the installed-package query")]
    EmptyProbe,
}

/// One package the tool should install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Target {
    /// Package identifier, e.g. `Publisher.Product`.
    pub id: PackageId,

    /// Install subpath relative to the location root. Empty means derive it
    /// from the identifier.
    #[serde(default)]
    pub path: String,

    /// Key into the `[location]` table.
    #[serde(default)]
    pub link: String,

    /// Exact version to install; latest when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Skip the upgrade if some version is already installed.
    #[serde(default)]
    pub no_upgrade: bool,

    /// Ignore installer hash mismatches.
    #[serde(default)]
    pub ignore_security_hash: bool,

    /// Uninstall the previous version during an upgrade.
    #[serde(default)]
    pub uninstall_previous: bool,

    /// Do not install package dependencies.
    #[serde(default)]
    pub skip_dependencies: bool,
}

impl Target {
    /// Create a target with default flags.
    pub fn new(id: impl Into<PackageId>, link: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            path: String::new(),
            link: link.into(),
            version: None,
            no_upgrade: false,
            ignore_security_hash: false,
            uninstall_previous: false,
            skip_dependencies: false,
        }
    }

    /// Subpath that will actually be used: the configured one, or the
    /// identifier-derived default.
    pub fn effective_subpath(&self) -> String {
        if self.path.is_empty() {
            self.id.default_subpath()
        } else {
            self.path.clone()
        }
    }
}

/// How the external package manager is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerSettings {
    /// Program (and leading arguments) that receives the `install ...` arguments.
    pub command: Vec<String>,

    /// Full command line of the installed-package query.
    pub probe: Vec<String>,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            command: vec!["winget".to_string()],
            probe: vec![
                "pwsh".to_string(),
                "-Command".to_string(),
                "Get-WinGetPackage | Select ID".to_string(),
            ],
        }
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Install roots by key.
    #[serde(default)]
    pub location: LocationMap,

    /// Packages to install, in file order.
    #[serde(default)]
    pub target: Vec<Target>,

    /// Package manager invocation.
    #[serde(default)]
    pub manager: ManagerSettings,
}

impl Config {
    /// Read, parse and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not valid TOML for this layout, or a
    /// validation error (see [`Config::validate`]).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse and validate configuration text that did not come from a file.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], minus the read error.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, Path::new("<inline>"))
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyId`] for a blank target id, and
    /// [`ConfigError::EmptyCommand`] / [`ConfigError::EmptyProbe`] when the
    /// manager command lines are empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(pos) = self.target.iter().position(|t| t.id.is_blank()) {
            return Err(ConfigError::EmptyId { index: pos + 1 });
        }
        if self.manager.command.is_empty() {
            return Err(ConfigError::EmptyCommand);
        }
        if self.manager.probe.is_empty() {
            return Err(ConfigError::EmptyProbe);
        }
        Ok(())
    }

    /// Root directory configured for `key`.
    pub fn root(&self, key: &str) -> Option<&str> {
        self.location.get(key).map(String::as_str)
    }

    /// Pairs of targets that would install into the same directory.
    ///
    /// Paths are compared case-insensitively since the install roots usually
    /// live on a case-insensitive filesystem. Each later target is paired with
    /// the first one that claimed the path.
    pub fn path_collisions(&self) -> Vec<(PackageId, PackageId)> {
        let mut seen: HashMap<(String, String), &PackageId> = HashMap::new();
        let mut collisions = Vec::new();

        for target in &self.target {
            let key = (
                target.link.clone(),
                target.effective_subpath().to_lowercase(),
            );
            match seen.get(&key) {
                Some(first) => collisions.push(((*first).clone(), target.id.clone())),
                None => {
                    seen.insert(key, &target.id);
                }
            }
        }

        collisions
    }
}
