//! Manifest parsers.
//!
//! A [`ManifestParser`] turns one manifest file into a [`PackageRecord`], or
//! declines it. Parsers never fail: malformed input is a skip.
//!
//! Parsers are selected by name through the closed [`ParserFormat`]
//! registry. Adding a format means adding a variant and its parser type;
//! selection itself does not change.
//!
//! ```
//! use std::path::Path;
//! use pkgmirror::parser::ParserFormat;
//!
//! let parser = "winget".parse::<ParserFormat>().unwrap().create_parser();
//! let record = parser.parse_manifest(
//!     Path::new("manifests/g/Git/Git/2.45.0/Git.Git.yaml"),
//!     "PackageIdentifier: Git.Git\nPackageVersion: 2.45.0\n",
//! );
//! assert_eq!(record.unwrap().id, "Git.Git");
//!
//! assert!("nuget".parse::<ParserFormat>().is_err());
//! ```

mod winget;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::package::PackageRecord;

pub use winget::WingetParser;

/// Converts manifest files into package records.
pub trait ManifestParser: Send + Sync {
    /// Short format name, as used in configuration.
    fn name(&self) -> &'static str;

    /// File extensions (without the dot) of the structured-data format.
    fn extensions(&self) -> &'static [&'static str];

    /// Whether `path` may hold a manifest this parser understands.
    ///
    /// The default accepts any file with one of [`Self::extensions`].
    fn is_eligible(&self, path: &Path) -> bool {
        has_extension(path, self.extensions())
    }

    /// Parse one manifest.
    ///
    /// `path` is relative to the mirror root. Returns `None` for anything
    /// that is not a well-formed package manifest.
    fn parse_manifest(&self, path: &Path, content: &str) -> Option<PackageRecord>;
}

/// Check a path's extension against a list, ignoring case.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Error selecting a parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    #[error("unsupported parser type: {0}")]
    UnknownFormat(String),
}

/// Supported manifest formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParserFormat {
    /// Windows Package Manager YAML manifests.
    #[default]
    Winget,
}

impl ParserFormat {
    /// Every supported format.
    pub const ALL: &'static [ParserFormat] = &[ParserFormat::Winget];

    /// Configuration name of the format.
    pub fn name(self) -> &'static str {
        match self {
            ParserFormat::Winget => "winget",
        }
    }

    /// Instantiate the parser for this format.
    pub fn create_parser(self) -> Arc<dyn ManifestParser> {
        match self {
            ParserFormat::Winget => Arc::new(WingetParser::new()),
        }
    }
}

impl FromStr for ParserFormat {
    type Err = ParserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParserError::UnknownFormat(wanted.to_string()))
    }
}

impl fmt::Display for ParserFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("winget".parse::<ParserFormat>(), Ok(ParserFormat::Winget));
        assert_eq!(" WinGet ".parse::<ParserFormat>(), Ok(ParserFormat::Winget));
    }

    #[test]
    fn test_unknown_format_is_error() {
        let err = "scoop".parse::<ParserFormat>().unwrap_err();
        assert_eq!(err, ParserError::UnknownFormat("scoop".to_string()));
        assert_eq!(err.to_string(), "unsupported parser type: scoop");
    }

    #[test]
    fn test_format_names_round_trip() {
        for format in ParserFormat::ALL {
            assert_eq!(format.name().parse::<ParserFormat>().unwrap(), *format);
            assert_eq!(format.create_parser().name(), format.name());
        }
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("a/b.yaml"), &["yaml", "yml"]));
        assert!(has_extension(Path::new("a/b.YML"), &["yaml", "yml"]));
        assert!(!has_extension(Path::new("a/b.json"), &["yaml", "yml"]));
        assert!(!has_extension(Path::new("a/yaml"), &["yaml", "yml"]));
    }
}
