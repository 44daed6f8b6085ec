//! Full-scan / incremental sync driver.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::scan::scan_manifest_files;
use super::SyncError;
use crate::config::{RepoConfig, SyncConfig};
use crate::index::IndexStore;
use crate::mirror::{Mirror, MirrorUpdate};
use crate::package::{PackageRecord, SyncStats};
use crate::parser::ManifestParser;

/// What a sync attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Index rebuilt from every manifest file.
    FullScan { files: usize, indexed: usize },
    /// Changed files re-parsed and upserted.
    Incremental { files: usize, indexed: usize },
    /// Mirror reported nothing relevant; index untouched.
    UpToDate,
    /// Another sync was in progress; this request did nothing.
    AlreadyRunning,
}

/// Drives the mirror, the parser and the index store.
///
/// The orchestrator is the only writer of its store. At most one sync runs
/// at a time; overlapping requests return [`SyncOutcome::AlreadyRunning`].
pub struct SyncOrchestrator {
    config: RepoConfig,
    batch_size: usize,
    mirror: Arc<dyn Mirror>,
    parser: Arc<dyn ManifestParser>,
    store: Arc<IndexStore>,
    last_sync: RwLock<Option<DateTime<Utc>>>,
    in_flight: Mutex<()>,
}

impl SyncOrchestrator {
    /// Create an orchestrator writing into `store`.
    ///
    /// The parser is chosen from the config's parser format.
    pub fn new(
        config: RepoConfig,
        sync: SyncConfig,
        mirror: Arc<dyn Mirror>,
        store: Arc<IndexStore>,
    ) -> Self {
        let parser = config.parser().create_parser();
        Self {
            config,
            batch_size: sync.batch_size.max(1),
            mirror,
            parser,
            store,
            last_sync: RwLock::new(None),
            in_flight: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    /// Current record count and last successful sync time.
    pub fn stats(&self) -> SyncStats {
        SyncStats {
            total_packages: self.store.len(),
            last_sync: *self.last_sync.read(),
        }
    }

    /// First sync at startup.
    ///
    /// Waits for any sync already in progress, then syncs. An error here
    /// means the service should not start.
    pub async fn initialize(&self) -> Result<SyncOutcome, SyncError> {
        info!(url = %self.config.url(), parser = %self.config.parser(), "Initializing package index");
        let _guard = self.in_flight.lock().await;
        let outcome = self.run().await?;
        info!(packages = self.store.len(), "Package index ready");
        Ok(outcome)
    }

    /// Sync with upstream, on a timer or on demand.
    ///
    /// Returns immediately with [`SyncOutcome::AlreadyRunning`] if another
    /// sync holds the guard. On error the store and the last-sync time are
    /// unchanged.
    pub async fn sync_repository(&self) -> Result<SyncOutcome, SyncError> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            info!("Sync already in progress, skipping");
            return Ok(SyncOutcome::AlreadyRunning);
        };
        self.run().await
    }

    async fn run(&self) -> Result<SyncOutcome, SyncError> {
        let update = self.fetch_update().await.inspect_err(|e| {
            error!(error = %e, "Repository sync failed");
        })?;

        let outcome = if self.store.is_empty() {
            self.full_scan().await?
        } else {
            match update {
                MirrorUpdate::FreshClone => self.full_scan().await?,
                MirrorUpdate::Changed(paths) if !paths.is_empty() => {
                    self.incremental_update(&paths).await
                }
                MirrorUpdate::Changed(_) | MirrorUpdate::NoChanges => SyncOutcome::UpToDate,
            }
        };

        *self.last_sync.write() = Some(Utc::now());
        Ok(outcome)
    }

    async fn fetch_update(&self) -> Result<MirrorUpdate, SyncError> {
        let mirror = Arc::clone(&self.mirror);
        let update = tokio::task::spawn_blocking(move || mirror.clone_or_update()).await??;
        Ok(update)
    }

    async fn full_scan(&self) -> Result<SyncOutcome, SyncError> {
        info!("Performing full manifest scan...");

        let root = self.mirror.local_path().to_path_buf();
        let manifest_dir = root.join(self.config.manifest_path());
        let parser = Arc::clone(&self.parser);
        let files = tokio::task::spawn_blocking(move || {
            scan_manifest_files(&root, &manifest_dir, parser.as_ref())
        })
        .await?;

        let mut records = Vec::new();
        self.parse_files(&files, |batch| records.extend(batch)).await;
        let indexed = self.store.replace_all(records);

        info!(files = files.len(), packages = indexed, "Full scan complete");
        Ok(SyncOutcome::FullScan {
            files: files.len(),
            indexed,
        })
    }

    async fn incremental_update(&self, paths: &[PathBuf]) -> SyncOutcome {
        info!(files = paths.len(), "Performing incremental update");

        let store = Arc::clone(&self.store);
        let indexed = self
            .parse_files(paths, |batch| {
                store.upsert_all(batch);
            })
            .await;

        info!(
            files = paths.len(),
            updated = indexed,
            packages = self.store.len(),
            "Incremental update complete"
        );
        SyncOutcome::Incremental {
            files: paths.len(),
            indexed,
        }
    }

    /// Parse `files` in sequential batches of concurrent tasks.
    ///
    /// Each finished batch is handed to `apply` in file order. Failed files
    /// are logged and left out. Returns the number of records produced.
    async fn parse_files<F>(&self, files: &[PathBuf], mut apply: F) -> usize
    where
        F: FnMut(Vec<PackageRecord>),
    {
        let total = files.len();
        let mut processed = 0;
        let mut produced = 0;

        for batch in files.chunks(self.batch_size) {
            let mut tasks = JoinSet::new();
            for (position, relative) in batch.iter().enumerate() {
                let parser = Arc::clone(&self.parser);
                let relative = relative.clone();
                let full_path = self.mirror.local_path().join(&relative);
                tasks.spawn_blocking(move || {
                    (position, parse_file(parser.as_ref(), &relative, &full_path))
                });
            }

            let mut slots: Vec<Option<PackageRecord>> = vec![None; batch.len()];
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((position, record)) => slots[position] = record,
                    Err(e) => warn!(error = %e, "Manifest parse task failed"),
                }
            }

            let records: Vec<PackageRecord> = slots.into_iter().flatten().collect();
            produced += records.len();
            processed += batch.len();
            info!(processed, total, "Processed manifest files");
            apply(records);
        }

        info!(processed, packages = produced, "Finished parsing manifests");
        produced
    }
}

/// Read and parse one file. Any failure is a skip.
fn parse_file(
    parser: &dyn ManifestParser,
    relative: &Path,
    full_path: &Path,
) -> Option<PackageRecord> {
    if !parser.is_eligible(relative) {
        return None;
    }

    match std::fs::read_to_string(full_path) {
        Ok(content) => parser.parse_manifest(relative, &content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %relative.display(), "Manifest removed upstream");
            None
        }
        Err(e) => {
            warn!(path = %relative.display(), error = %e, "Failed to process file");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::MirrorError;
    use std::collections::VecDeque;
    use std::fs;
    use tempfile::TempDir;

    /// Mirror that replays scripted updates over a plain directory.
    struct ScriptedMirror {
        root: PathBuf,
        updates: parking_lot::Mutex<VecDeque<Result<MirrorUpdate, MirrorError>>>,
    }

    impl ScriptedMirror {
        fn new(root: &Path, updates: Vec<Result<MirrorUpdate, MirrorError>>) -> Arc<Self> {
            Arc::new(Self {
                root: root.to_path_buf(),
                updates: parking_lot::Mutex::new(updates.into()),
            })
        }
    }

    impl Mirror for ScriptedMirror {
        fn local_path(&self) -> &Path {
            &self.root
        }

        fn clone_or_update(&self) -> Result<MirrorUpdate, MirrorError> {
            self.updates
                .lock()
                .pop_front()
                .unwrap_or(Ok(MirrorUpdate::NoChanges))
        }
    }

    fn write_manifest(root: &Path, relative: &str, id: &str, name: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            path,
            format!("PackageIdentifier: {}\nPackageName: {}\n", id, name),
        )
        .unwrap();
    }

    fn orchestrator(
        dir: &TempDir,
        updates: Vec<Result<MirrorUpdate, MirrorError>>,
        batch_size: usize,
    ) -> (SyncOrchestrator, Arc<IndexStore>) {
        let store = Arc::new(IndexStore::new());
        let config = RepoConfig::new("unused", dir.path());
        let mirror = ScriptedMirror::new(dir.path(), updates);
        let orchestrator = SyncOrchestrator::new(
            config,
            SyncConfig::default().with_batch_size(batch_size),
            mirror,
            Arc::clone(&store),
        );
        (orchestrator, store)
    }

    fn mirror_failure() -> MirrorError {
        MirrorError::Io {
            path: PathBuf::from("/unreachable"),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "offline"),
        }
    }

    #[tokio::test]
    async fn test_initialize_full_scan() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "manifests/a/A.yaml", "App.A", "Alpha");
        write_manifest(dir.path(), "manifests/b/B.yaml", "App.B", "Beta");
        fs::write(dir.path().join("manifests/b/broken.yaml"), ": : :\n- [").unwrap();

        let (orchestrator, store) = orchestrator(&dir, vec![Ok(MirrorUpdate::FreshClone)], 500);
        assert!(!orchestrator.stats().is_synced());

        let outcome = orchestrator.initialize().await.unwrap();

        assert_eq!(outcome, SyncOutcome::FullScan { files: 3, indexed: 2 });
        assert_eq!(store.len(), 2);
        assert!(orchestrator.stats().is_synced());
    }

    #[tokio::test]
    async fn test_empty_store_scans_even_without_changes() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "manifests/a/A.yaml", "App.A", "Alpha");

        let (orchestrator, store) = orchestrator(&dir, vec![Ok(MirrorUpdate::NoChanges)], 500);

        let outcome = orchestrator.sync_repository().await.unwrap();
        assert_eq!(outcome, SyncOutcome::FullScan { files: 1, indexed: 1 });
        assert!(store.contains("App.A"));
    }

    #[tokio::test]
    async fn test_no_changes_leaves_store_alone() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "manifests/a/A.yaml", "App.A", "Alpha");

        let (orchestrator, store) = orchestrator(
            &dir,
            vec![
                Ok(MirrorUpdate::FreshClone),
                Ok(MirrorUpdate::NoChanges),
                Ok(MirrorUpdate::Changed(Vec::new())),
            ],
            500,
        );
        orchestrator.initialize().await.unwrap();
        write_manifest(dir.path(), "manifests/a/A.yaml", "App.A", "Renamed");

        assert_eq!(
            orchestrator.sync_repository().await.unwrap(),
            SyncOutcome::UpToDate
        );
        assert_eq!(
            orchestrator.sync_repository().await.unwrap(),
            SyncOutcome::UpToDate
        );
        assert_eq!(store.get("App.A").unwrap().name, "Alpha");
    }

    #[tokio::test]
    async fn test_incremental_update_upserts_only_changed() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "manifests/a/A.yaml", "App.A", "Alpha");
        write_manifest(dir.path(), "manifests/b/B.yaml", "App.B", "Beta");

        let (orchestrator, store) = orchestrator(
            &dir,
            vec![
                Ok(MirrorUpdate::FreshClone),
                Ok(MirrorUpdate::Changed(vec![
                    PathBuf::from("manifests/a/A.yaml"),
                    PathBuf::from("manifests/c/C.yaml"),
                ])),
            ],
            500,
        );
        orchestrator.initialize().await.unwrap();
        let beta_before = store.get("App.B").unwrap();

        write_manifest(dir.path(), "manifests/a/A.yaml", "App.A", "Alpha 2");
        write_manifest(dir.path(), "manifests/b/B.yaml", "App.B", "Beta 2");
        write_manifest(dir.path(), "manifests/c/C.yaml", "App.C", "Gamma");

        let outcome = orchestrator.sync_repository().await.unwrap();

        assert_eq!(outcome, SyncOutcome::Incremental { files: 2, indexed: 2 });
        assert_eq!(store.get("App.A").unwrap().name, "Alpha 2");
        assert_eq!(store.get("App.C").unwrap().name, "Gamma");
        assert_eq!(*store.get("App.B").unwrap(), *beta_before);
    }

    #[tokio::test]
    async fn test_incremental_keeps_deleted_but_full_scan_drops() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "manifests/a/A.yaml", "App.A", "Alpha");
        write_manifest(dir.path(), "manifests/b/B.yaml", "App.B", "Beta");

        let (orchestrator, store) = orchestrator(
            &dir,
            vec![
                Ok(MirrorUpdate::FreshClone),
                Ok(MirrorUpdate::Changed(vec![PathBuf::from("manifests/b/B.yaml")])),
                Ok(MirrorUpdate::FreshClone),
            ],
            500,
        );
        orchestrator.initialize().await.unwrap();
        fs::remove_file(dir.path().join("manifests/b/B.yaml")).unwrap();

        let outcome = orchestrator.sync_repository().await.unwrap();
        assert_eq!(outcome, SyncOutcome::Incremental { files: 1, indexed: 0 });
        assert!(store.contains("App.B"));

        let outcome = orchestrator.sync_repository().await.unwrap();
        assert_eq!(outcome, SyncOutcome::FullScan { files: 1, indexed: 1 });
        assert!(!store.contains("App.B"));
        assert!(store.contains("App.A"));
    }

    #[tokio::test]
    async fn test_mirror_failure_keeps_index_and_timestamp() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "manifests/a/A.yaml", "App.A", "Alpha");

        let (orchestrator, store) = orchestrator(
            &dir,
            vec![Ok(MirrorUpdate::FreshClone), Err(mirror_failure())],
            500,
        );
        orchestrator.initialize().await.unwrap();
        let synced_at = orchestrator.stats().last_sync;

        let err = orchestrator.sync_repository().await.unwrap_err();

        assert!(matches!(err, SyncError::Mirror(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(orchestrator.stats().last_sync, synced_at);
    }

    #[tokio::test]
    async fn test_initialize_fails_when_mirror_fails() {
        let dir = TempDir::new().unwrap();
        let (orchestrator, store) = orchestrator(&dir, vec![Err(mirror_failure())], 500);

        assert!(orchestrator.initialize().await.is_err());
        assert!(store.is_empty());
        assert!(!orchestrator.stats().is_synced());
    }

    #[tokio::test]
    async fn test_small_batches_cover_every_file() {
        let dir = TempDir::new().unwrap();
        for i in 0..23 {
            write_manifest(
                dir.path(),
                &format!("manifests/p{:02}/P.yaml", i),
                &format!("Pkg.{:02}", i),
                "pkg",
            );
        }

        let (orchestrator, store) = orchestrator(&dir, vec![Ok(MirrorUpdate::FreshClone)], 5);
        let outcome = orchestrator.initialize().await.unwrap();

        assert_eq!(outcome, SyncOutcome::FullScan { files: 23, indexed: 23 });
        assert_eq!(store.len(), 23);
    }

    #[tokio::test]
    async fn test_later_path_wins_for_shared_identifier() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "manifests/t/1.0/Tool.yaml", "Vendor.Tool", "Tool 1");
        write_manifest(dir.path(), "manifests/t/2.0/Tool.yaml", "Vendor.Tool", "Tool 2");

        let (orchestrator, store) = orchestrator(&dir, vec![Ok(MirrorUpdate::FreshClone)], 500);
        orchestrator.initialize().await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Vendor.Tool").unwrap().name, "Tool 2");
    }

    #[tokio::test]
    async fn test_split_winget_manifests_keep_locale_fields() {
        let dir = TempDir::new().unwrap();
        let version_dir = "manifests/g/Git/Git/2.45.0";
        let files = [
            (
                "Git.Git.installer.yaml",
                "PackageIdentifier: Git.Git\nPackageVersion: 2.45.0\nManifestType: installer\n",
            ),
            (
                "Git.Git.locale.en-US.yaml",
                "PackageIdentifier: Git.Git\nPackageVersion: 2.45.0\nPackageLocale: en-US\n\
                 Publisher: The Git Team\nPackageName: Git\nManifestType: defaultLocale\n",
            ),
            (
                "Git.Git.yaml",
                "PackageIdentifier: Git.Git\nPackageVersion: 2.45.0\nDefaultLocale: en-US\n\
                 ManifestType: version\n",
            ),
        ];
        for (name, content) in files {
            let path = dir.path().join(version_dir).join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        let (orchestrator, store) = orchestrator(&dir, vec![Ok(MirrorUpdate::FreshClone)], 500);
        let outcome = orchestrator.initialize().await.unwrap();

        assert_eq!(outcome, SyncOutcome::FullScan { files: 3, indexed: 1 });
        let git = store.get("Git.Git").unwrap();
        assert_eq!(git.name, "Git");
        assert_eq!(git.publisher.as_deref(), Some("The Git Team"));
        assert_eq!(git.version.as_deref(), Some("2.45.0"));
    }

    #[test]
    fn test_parse_file_skips_ineligible_and_missing() {
        let dir = TempDir::new().unwrap();
        let parser = crate::parser::WingetParser::new();
        write_manifest(dir.path(), "schema/A.yaml", "App.A", "Alpha");

        assert!(parse_file(
            &parser,
            Path::new("schema/A.yaml"),
            &dir.path().join("schema/A.yaml")
        )
        .is_none());
        assert!(parse_file(
            &parser,
            Path::new("gone.yaml"),
            &dir.path().join("gone.yaml")
        )
        .is_none());
    }
}
