//! Recursive manifest discovery.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::parser::{has_extension, ManifestParser};

/// List manifest files under `manifest_dir`, relative to `root`.
///
/// Only files with one of the parser's extensions are returned, sorted by
/// path. Unreadable directories are logged and skipped; the walk goes on.
pub fn scan_manifest_files(
    root: &Path,
    manifest_dir: &Path,
    parser: &dyn ManifestParser,
) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(manifest_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    path = %e.path().unwrap_or(manifest_dir).display(),
                    error = %e,
                    "Could not read directory"
                );
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), parser.extensions()) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        files.push(relative);
    }

    files
}
