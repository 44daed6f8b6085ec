//! Windows Package Manager (winget) manifest parser.
//!
//! The winget-pkgs repository stores one directory per package version with
//! several YAML files (version, installer, locale). Each of them carries the
//! `PackageIdentifier`; name and publisher live either at the top level or
//! under `DefaultLocale`.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use super::{has_extension, ManifestParser};
use crate::package::PackageRecord;

/// Parser for winget YAML manifests.
#[derive(Debug, Clone, Copy, Default)]
pub struct WingetParser;

impl WingetParser {
    pub fn new() -> Self {
        Self
    }
}

impl ManifestParser for WingetParser {
    fn name(&self) -> &'static str {
        "winget"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    /// YAML files, excluding validation fixtures and schema files.
    fn is_eligible(&self, path: &Path) -> bool {
        let text = path.to_string_lossy();
        has_extension(path, self.extensions())
            && !text.contains(".validation")
            && !text.contains("schema")
    }

    fn parse_manifest(&self, path: &Path, content: &str) -> Option<PackageRecord> {
        let content = content.trim_start_matches('\u{feff}');
        if !self.is_eligible(path) || content.trim().is_empty() {
            return None;
        }

        let manifest: Value = match serde_yaml::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse manifest");
                return None;
            }
        };

        let root = manifest.as_mapping()?;
        let locale = root.get("DefaultLocale").and_then(Value::as_mapping);
        let from_root_or_locale =
            |key: &str| scalar(root, key).or_else(|| locale.and_then(|l| scalar(l, key)));

        let id = scalar(root, "PackageIdentifier")?;
        let mut record = PackageRecord::new(id, from_root_or_locale("PackageName"));
        record.version = scalar(root, "PackageVersion");
        record.publisher = from_root_or_locale("Publisher");

        Some(record)
    }
}

/// Read a scalar as a non-blank string.
///
/// YAML may type `PackageVersion: 2` as a number; the textual form is kept.
fn scalar(map: &Mapping, key: &str) -> Option<String> {
    let text = match map.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSION_PATH: &str = "manifests/m/Microsoft/PowerToys/0.81.0/Microsoft.PowerToys.yaml";

    fn parse(path: &str, content: &str) -> Option<PackageRecord> {
        WingetParser::new().parse_manifest(Path::new(path), content)
    }

    #[test]
    fn test_parse_full_manifest() {
        let content = r#"
# yaml-language-server: $schema=https://aka.ms/winget-manifest.defaultLocale.1.6.0.schema.json
PackageIdentifier: Microsoft.PowerToys
PackageVersion: 0.81.0
PackageName: PowerToys
Publisher: Microsoft Corporation
ManifestType: defaultLocale
"#;
        let record = parse(VERSION_PATH, content).unwrap();

        assert_eq!(record.id, "Microsoft.PowerToys");
        assert_eq!(record.name, "PowerToys");
        assert_eq!(record.version.as_deref(), Some("0.81.0"));
        assert_eq!(record.publisher.as_deref(), Some("Microsoft Corporation"));
    }

    #[test]
    fn test_name_and_publisher_from_default_locale() {
        let content = r#"
PackageIdentifier: Microsoft.PowerToys
PackageVersion: 0.81.0
DefaultLocale:
  PackageName: PowerToys (Preview)
  Publisher: Microsoft
"#;
        let record = parse(VERSION_PATH, content).unwrap();

        assert_eq!(record.name, "PowerToys (Preview)");
        assert_eq!(record.publisher.as_deref(), Some("Microsoft"));
    }

    #[test]
    fn test_top_level_fields_win_over_locale() {
        let content = r#"
PackageIdentifier: Vendor.Tool
PackageName: Tool
DefaultLocale:
  PackageName: Localized Tool
"#;
        assert_eq!(parse(VERSION_PATH, content).unwrap().name, "Tool");
    }

    #[test]
    fn test_missing_name_falls_back_to_id() {
        let record = parse(VERSION_PATH, "PackageIdentifier: Vendor.Tool\n").unwrap();
        assert_eq!(record.name, "Vendor.Tool");
        assert!(record.version.is_none());
        assert!(record.publisher.is_none());
    }

    #[test]
    fn test_numeric_version_is_stringified() {
        let record = parse(VERSION_PATH, "PackageIdentifier: Vendor.Tool\nPackageVersion: 2\n");
        assert_eq!(record.unwrap().version.as_deref(), Some("2"));
    }

    #[test]
    fn test_missing_identifier_is_skip() {
        assert!(parse(VERSION_PATH, "PackageName: Orphan\n").is_none());
        assert!(parse(VERSION_PATH, "PackageIdentifier: '   '\n").is_none());
        assert!(parse(VERSION_PATH, "PackageIdentifier: ~\n").is_none());
    }

    #[test]
    fn test_malformed_content_is_skip() {
        assert!(parse(VERSION_PATH, "").is_none());
        assert!(parse(VERSION_PATH, "   \n\t").is_none());
        assert!(parse(VERSION_PATH, "PackageIdentifier: [unclosed").is_none());
        assert!(parse(VERSION_PATH, "- just\n- a list\n").is_none());
        assert!(parse(VERSION_PATH, "plain scalar").is_none());
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let record = parse(VERSION_PATH, "\u{feff}PackageIdentifier: Vendor.Tool\n");
        assert_eq!(record.unwrap().id, "Vendor.Tool");
    }

    #[test]
    fn test_eligibility() {
        let parser = WingetParser::new();

        assert!(parser.is_eligible(Path::new(VERSION_PATH)));
        assert!(parser.is_eligible(Path::new("manifests/a/b/1.0/b.installer.yml")));
        assert!(!parser.is_eligible(Path::new("manifests/a/b/1.0/b.json")));
        assert!(!parser.is_eligible(Path::new("Tools/.validation/a.yaml")));
        assert!(!parser.is_eligible(Path::new("schemas/JSON/manifests/v1.6.0/schema.yaml")));
    }

    #[test]
    fn test_ineligible_path_is_skip_even_with_valid_content() {
        let content = "PackageIdentifier: Vendor.Tool\n";
        assert!(parse("manifests/schema/Vendor.Tool.yaml", content).is_none());
        assert!(parse("manifests/Vendor.Tool.txt", content).is_none());
    }

    #[test]
    fn test_parse_is_idempotent_apart_from_timestamp() {
        let content = "PackageIdentifier: Vendor.Tool\nPackageVersion: 1.2.3\nPublisher: Vendor\n";
        let first = parse(VERSION_PATH, content).unwrap();
        let second = parse(VERSION_PATH, content).unwrap();

        assert!(first.same_content(&second));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_never_yields_blank_identifier(content in ".{0,200}") {
                if let Some(record) = parse(VERSION_PATH, &content) {
                    prop_assert!(!record.id.trim().is_empty());
                }
            }

            #[test]
            fn test_identifier_survives_parse(id in "[A-Za-z][A-Za-z0-9]{0,12}\\.[A-Za-z][A-Za-z0-9]{0,12}") {
                let content = format!("PackageIdentifier: {}\n", id);
                let record = parse(VERSION_PATH, &content);
                prop_assert_eq!(record.map(|r| r.id), Some(id));
            }
        }
    }
}
