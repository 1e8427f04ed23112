//! Shared configuration types for batchget.
//!
//! The configuration file is a TOML document with three tables:
//!
//! ```toml
//! [location]
//! apps = 'D:\Apps'
//!
//! [[target]]
//! id = "Microsoft.PowerToys"
//! link = "apps"
//!
//! [manager]                      # optional
//! command = ["winget"]
//! probe = ["pwsh", "-Command", "Get-WinGetPackage | Select ID"]
//! ```

pub mod config;
pub mod types;

// Re-exports
pub use config::{Config, ConfigError, LocationMap, ManagerSettings, Target};
pub use types::*;

/// Configuration file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
