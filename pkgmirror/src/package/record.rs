//! Normalized package record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one package, as extracted from its manifest.
///
/// # Example
///
/// ```
/// use pkgmirror::package::PackageRecord;
///
/// let record = PackageRecord::new("Mozilla.Firefox", None)
///     .with_version("128.0")
///     .with_publisher("Mozilla");
///
/// assert_eq!(record.name, "Mozilla.Firefox"); // falls back to the identifier
/// assert_eq!(record.version.as_deref(), Some("128.0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRecord {
    /// Globally unique package identifier (e.g., "Microsoft.PowerToys").
    pub id: String,

    /// Display name. Equal to `id` when the manifest carries no name.
    pub name: String,

    /// Version string as written in the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Publisher name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// When this record was parsed.
    pub last_updated: DateTime<Utc>,
}

impl PackageRecord {
    /// Create a record stamped with the current time.
    ///
    /// A missing name falls back to the identifier.
    pub fn new(id: impl Into<String>, name: Option<String>) -> Self {
        let id = id.into();
        let name = name.unwrap_or_else(|| id.clone());
        Self {
            id,
            name,
            version: None,
            publisher: None,
            last_updated: Utc::now(),
        }
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the publisher.
    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    /// Whether the name came from the manifest rather than the identifier.
    pub fn has_name(&self) -> bool {
        self.name != self.id
    }

    /// Combine with an older record for the same identifier.
    ///
    /// Fields this record carries win; fields it lacks keep the older value.
    /// A package split across several manifest files (version, installer,
    /// locale) therefore keeps its name and publisher whichever file is
    /// applied last.
    pub fn merged_over(mut self, older: &PackageRecord) -> Self {
        if !self.has_name() && older.has_name() {
            self.name = older.name.clone();
        }
        if self.version.is_none() {
            self.version = older.version.clone();
        }
        if self.publisher.is_none() {
            self.publisher = older.publisher.clone();
        }
        self
    }

    /// Compare everything except the parse timestamp.
    pub fn same_content(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.version == other.version
            && self.publisher == other.publisher
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)?;
        if let Some(version) = &self.version {
            write!(f, " v{}", version)?;
        }
        Ok(())
    }
}

impl AsRef<PackageRecord> for PackageRecord {
    fn as_ref(&self) -> &PackageRecord {
        self
    }
}
