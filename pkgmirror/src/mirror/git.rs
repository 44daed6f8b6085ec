//! Git-backed mirror.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use git2::build::CheckoutBuilder;
use git2::{Commit, Repository};
use tracing::{info, warn};

use super::{Mirror, MirrorError, MirrorUpdate};
use crate::config::RepoConfig;

/// Mirror that keeps a git checkout in sync with its `origin`.
#[derive(Debug, Clone)]
pub struct GitMirror {
    url: String,
    local_path: PathBuf,
    manifest_path: PathBuf,
}

impl GitMirror {
    /// Create a mirror of `url` at `local_path`, reporting changes under
    /// `manifest_path` (relative to the checkout).
    pub fn new(
        url: impl Into<String>,
        local_path: impl Into<PathBuf>,
        manifest_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            url: url.into(),
            local_path: local_path.into(),
            manifest_path: manifest_path.into(),
        }
    }

    /// Create a mirror from repository settings.
    pub fn from_config(config: &RepoConfig) -> Self {
        Self::new(config.url(), config.local_path(), config.manifest_path())
    }

    fn is_cloned(&self) -> bool {
        self.local_path.join(".git").exists()
    }

    fn clone_repository(&self) -> Result<(), MirrorError> {
        if let Some(parent) = self.local_path.parent() {
            fs::create_dir_all(parent).map_err(|source| MirrorError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        info!(url = %self.url, path = %self.local_path.display(), "Cloning repository");
        Repository::clone(&self.url, &self.local_path).map_err(|source| MirrorError::Clone {
            url: self.url.clone(),
            source,
        })?;
        info!("Repository cloned successfully");
        Ok(())
    }

    /// Fetch `origin`, fast-forward the checkout and diff the old and new heads.
    fn pull(&self) -> Result<MirrorUpdate, git2::Error> {
        let repo = Repository::open(&self.local_path)?;

        let mut remote = repo.find_remote("origin")?;
        remote.fetch(&["HEAD"], None, None)?;

        let fetched = repo.find_reference("FETCH_HEAD")?.peel_to_commit()?;
        let head = repo.head()?;
        let current = head.peel_to_commit()?;

        if fetched.id() == current.id() {
            return Ok(MirrorUpdate::NoChanges);
        }

        let changed = match self.changed_paths(&repo, &current, &fetched) {
            Ok(paths) => Some(paths),
            Err(e) => {
                warn!(error = %e, "Could not get changed files, will do full scan");
                None
            }
        };

        // Check out while HEAD still names the old commit so files deleted
        // upstream are removed from the working tree.
        repo.checkout_tree(fetched.as_object(), Some(CheckoutBuilder::new().force()))?;
        if head.is_branch() {
            let mut head = head;
            head.set_target(fetched.id(), "pkgmirror: fast-forward")?;
        } else {
            repo.set_head_detached(fetched.id())?;
        }

        Ok(match changed {
            Some(paths) => MirrorUpdate::Changed(paths),
            None => MirrorUpdate::FreshClone,
        })
    }

    /// Every path touched between two commits that lies in the manifest directory.
    fn changed_paths(
        &self,
        repo: &Repository,
        old: &Commit<'_>,
        new: &Commit<'_>,
    ) -> Result<Vec<PathBuf>, git2::Error> {
        let old_tree = old.tree()?;
        let new_tree = new.tree()?;
        let diff = repo.diff_tree_to_tree(Some(&old_tree), Some(&new_tree), None)?;

        let mut paths = BTreeSet::new();
        for delta in diff.deltas() {
            for file in [delta.old_file(), delta.new_file()] {
                if let Some(path) = file.path().filter(|p| self.in_manifest_dir(p)) {
                    paths.insert(path.to_path_buf());
                }
            }
        }
        Ok(paths.into_iter().collect())
    }

    fn in_manifest_dir(&self, path: &Path) -> bool {
        let prefix = self.manifest_path.as_path();
        prefix.as_os_str().is_empty() || prefix == Path::new(".") || path.starts_with(prefix)
    }
}

impl Mirror for GitMirror {
    fn local_path(&self) -> &Path {
        &self.local_path
    }

    fn clone_or_update(&self) -> Result<MirrorUpdate, MirrorError> {
        if !self.is_cloned() {
            self.clone_repository()?;
            return Ok(MirrorUpdate::FreshClone);
        }

        info!(path = %self.local_path.display(), "Updating repository");
        let update = self.pull().map_err(|source| MirrorError::Update {
            path: self.local_path.clone(),
            source,
        })?;

        match &update {
            MirrorUpdate::NoChanges => info!("No changes found"),
            MirrorUpdate::Changed(paths) => {
                info!(changes = paths.len(), "Repository updated")
            }
            MirrorUpdate::FreshClone => {}
        }
        Ok(update)
    }
}
