//! Package identifier newtype.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::path::MAIN_SEPARATOR_STR;

/// Separator between the segments of a package identifier (`Publisher.Product`).
pub const ID_DELIMITER: char = '.';

/// A package identifier in the package manager's namespace.
///
/// The original spelling is kept for the install command line; comparisons
/// against the installed set go through [`PackageId::comparison_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// Wrap an identifier as written in the configuration.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Return the identifier as configured.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Lower-cased form used for installed-set membership.
    pub fn comparison_key(&self) -> String {
        self.0.to_lowercase()
    }

    /// Final segment after the last delimiter, used to prefix log lines.
    ///
    /// ```
    /// use batchget_schema::PackageId;
    ///
    /// assert_eq!(PackageId::new("Foo.Bar").short_name(), "Bar");
    /// assert_eq!(PackageId::new("plain").short_name(), "plain");
    /// ```
    pub fn short_name(&self) -> &str {
        self.0
            .rsplit_once(ID_DELIMITER)
            .map_or(self.0.as_str(), |(_, tail)| tail)
    }

    /// Install subpath used when a target does not configure one: the
    /// comparison key with every delimiter turned into a path separator.
    pub fn default_subpath(&self) -> String {
        self.comparison_key()
            .replace(ID_DELIMITER, MAIN_SEPARATOR_STR)
    }
}

impl std::fmt::Display for PackageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PackageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PackageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PackageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
