//! Package manager command line construction.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use tokio::process::Command;

use crate::normalize::Job;

/// Arguments passed to the package manager for one installation.
///
/// The arguments are handed to the child as a vector, never through a shell,
/// so identifiers and paths from the configuration are not reinterpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    program: String,
    args: Vec<OsString>,
}

impl InstallCommand {
    /// Build the install command for `job` into `path`.
    ///
    /// `base` is the configured package manager command; its first element is
    /// the program and the rest are prepended to the install arguments.
    pub fn new(base: &[String], job: &Job, path: &Path) -> Self {
        let (program, prefix) = base
            .split_first()
            .map_or(("winget", &[][..]), |(p, rest)| (p.as_str(), rest));

        let target = &job.target;
        let mut args: Vec<OsString> = prefix.iter().map(OsString::from).collect();
        args.extend([
            "install".into(),
            "--id".into(),
            target.id.as_str().into(),
            "-l".into(),
            path.as_os_str().to_owned(),
            "--verbose".into(),
        ]);

        if target.ignore_security_hash {
            args.push("--ignore-security-hash".into());
        }
        if target.no_upgrade {
            args.push("--no-upgrade".into());
        }
        if let Some(version) = target.version.as_deref().filter(|v| !v.is_empty()) {
            args.push("--version".into());
            args.push(version.into());
        }
        if target.uninstall_previous {
            args.push("--uninstall-previous".into());
        }
        if target.skip_dependencies {
            args.push("--skip-dependencies".into());
        }

        Self {
            program: program.to_string(),
            args,
        }
    }

    /// Program that will be spawned.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    #[cfg(test)]
    pub(crate) fn has_arg(&self, flag: &str) -> bool {
        self.args.iter().any(|a| a == flag)
    }

    /// A process builder for this command.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
