//! On-disk store of extracted repository snapshots
//!
//! Layout under the data directory:
//!
//! ```text
//! repos/<key>/_meta/info.json   entry metadata
//! repos/<key>/_meta/tree.json   serialized file tree
//! repos/<key>/...               extracted repository files
//! repos/.staging/<key>-XXXXXX/  in-progress imports and updates
//! repos/.trash/                 entries being replaced or deleted
//! ```
//!
//! A new snapshot is always assembled under `.staging` and moved into place
//! by rename, so a key names either the previous complete entry or the new
//! complete entry.

use crate::archive::sandbox::{resolve_within, to_slash};
use crate::cache::key::{RepoInfo, RepoKey};
use crate::cache::locks::{KeyLock, KeyLocks};
use crate::cache::{INFO_FILE, META_DIR, TREE_FILE};
use crate::content::{read_file_content, FileContent};
use crate::error::{LensError, LensResult};
use crate::tree::FileNode;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

const REPOS_DIR: &str = "repos";
const STAGING_DIR: &str = ".staging";
const TRASH_DIR: &str = ".trash";
const ARCHIVE_FILE: &str = "snapshot.tar.gz";
const CONTENT_DIR: &str = "content";

/// Separator in trash names of replaced entries (restorable)
const REPLACED_SEP: char = '~';
/// Separator in trash names of deleted entries (never restored)
const DELETED_SEP: char = '!';

/// Age thresholds for crash recovery at open time
///
/// Another process sharing the data directory may own young staging or
/// trash entries, so only entries older than these are touched.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryPolicy {
    pub staging_age: Duration,
    pub trash_age: Duration,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self {
            staging_age: Duration::from_secs(24 * 60 * 60),
            trash_age: Duration::from_secs(10 * 60),
        }
    }
}

/// A snapshot being assembled outside the live cache
///
/// Dropping it without [`CacheStore::put`] discards everything staged.
pub struct StagedEntry {
    key: RepoKey,
    temp: TempDir,
    content_dir: PathBuf,
}

impl StagedEntry {
    pub fn key(&self) -> &RepoKey {
        &self.key
    }

    /// Where the downloaded snapshot archive goes
    pub fn archive_path(&self) -> PathBuf {
        self.temp.path().join(ARCHIVE_FILE)
    }

    /// Empty directory that becomes the live entry on `put`
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }
}

/// Cache of repository snapshots rooted at a data directory
pub struct CacheStore {
    repos_dir: PathBuf,
    locks: KeyLocks,
}

impl CacheStore {
    /// Open (creating if needed) the cache under `data_dir`
    pub async fn open(data_dir: &Path) -> LensResult<Self> {
        Self::open_with(data_dir, RecoveryPolicy::default()).await
    }

    /// Open with an explicit recovery policy
    pub async fn open_with(data_dir: &Path, policy: RecoveryPolicy) -> LensResult<Self> {
        let store = Self {
            repos_dir: data_dir.join(REPOS_DIR),
            locks: KeyLocks::new(),
        };

        for dir in [store.staging_dir(), store.trash_dir()] {
            fs::create_dir_all(&dir)
                .await
                .map_err(|e| LensError::io(format!("creating directory {}", dir.display()), e))?;
        }

        store.recover(policy).await?;
        debug!("Opened cache at {}", store.repos_dir.display());
        Ok(store)
    }

    /// Directory holding all entries
    pub fn repos_dir(&self) -> &Path {
        &self.repos_dir
    }

    /// Directory of the live entry for `key` (may not exist)
    pub fn entry_dir(&self, key: &RepoKey) -> PathBuf {
        self.repos_dir.join(key.as_str())
    }

    fn staging_dir(&self) -> PathBuf {
        self.repos_dir.join(STAGING_DIR)
    }

    fn trash_dir(&self) -> PathBuf {
        self.repos_dir.join(TRASH_DIR)
    }

    fn trash_path(&self, key: &RepoKey, sep: char) -> PathBuf {
        self.trash_dir().join(format!("{}{}{}", key, sep, Uuid::new_v4()))
    }

    fn meta_path(&self, key: &RepoKey, file: &str) -> PathBuf {
        self.entry_dir(key).join(META_DIR).join(file)
    }

    /// Locks for `key`; the operation mutex is for callers running a whole
    /// import, update or delete
    pub fn lock(&self, key: &RepoKey) -> Arc<KeyLock> {
        self.locks.get(key)
    }

    /// Let go of the registry entry for `key` once no caller holds it
    pub fn release_lock(&self, key: &RepoKey) {
        self.locks.prune(key);
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.locks.len()
    }

    /// Create a fresh staging area for `key`
    pub fn stage(&self, key: &RepoKey) -> LensResult<StagedEntry> {
        let temp = tempfile::Builder::new()
            .prefix(&format!("{}-", key))
            .tempdir_in(self.staging_dir())
            .map_err(|e| LensError::io("creating staging directory", e))?;

        let content_dir = temp.path().join(CONTENT_DIR);
        std::fs::create_dir(&content_dir).map_err(|e| {
            LensError::io(format!("creating directory {}", content_dir.display()), e)
        })?;

        Ok(StagedEntry {
            key: key.clone(),
            temp,
            content_dir,
        })
    }

    /// Write metadata into `staged` and atomically make it the live entry,
    /// replacing any previous entry for the same key.
    pub async fn put(&self, staged: StagedEntry, info: &RepoInfo, tree: &FileNode) -> LensResult<()> {
        if info.key != staged.key {
            return Err(LensError::Internal(format!(
                "staged entry for {} cannot hold {}",
                staged.key, info.key
            )));
        }

        let meta = staged.content_dir.join(META_DIR);
        if exists(&meta).await? {
            // The snapshot shipped its own _meta; ours takes its place
            remove_path(&meta).await?;
        }
        fs::create_dir_all(&meta)
            .await
            .map_err(|e| LensError::io(format!("creating {}", meta.display()), e))?;
        write_json(&meta.join(TREE_FILE), &serde_json::to_vec(tree)?).await?;

        let lock = self.lock(&info.key);
        let replaced = {
            let _guard = lock.content.write().await;

            // A touch that landed while the snapshot was being built wins
            let mut info = info.clone();
            if let Ok(live) = read_json::<RepoInfo>(&self.meta_path(&info.key, INFO_FILE), &info.key).await {
                info.last_opened_at = info.last_opened_at.max(live.last_opened_at);
            }
            write_json(&meta.join(INFO_FILE), &serde_json::to_vec_pretty(&info)?).await?;

            self.swap_in(&info.key, &staged.content_dir).await?
        };

        if let Some(old) = replaced {
            if let Err(e) = remove_path(&old).await {
                warn!("Failed to remove replaced entry {}: {}", old.display(), e);
            }
        }

        info!("Stored {} ({}@{})", info.key, info.full_name(), info.branch);
        Ok(())
    }

    async fn swap_in(&self, key: &RepoKey, staged: &Path) -> LensResult<Option<PathBuf>> {
        let live = self.entry_dir(key);

        let replaced = if exists(&live).await? {
            let trash = self.trash_path(key, REPLACED_SEP);
            fs::rename(&live, &trash).await.map_err(|e| {
                LensError::io(format!("moving {} aside", live.display()), e)
            })?;
            Some(trash)
        } else {
            None
        };

        if let Err(e) = fs::rename(staged, &live).await {
            if let Some(trash) = &replaced {
                if let Err(restore) = fs::rename(trash, &live).await {
                    warn!(
                        "Failed to restore {} from {}: {}",
                        live.display(),
                        trash.display(),
                        restore
                    );
                }
            }
            return Err(LensError::io(format!("installing {}", live.display()), e));
        }

        Ok(replaced)
    }

    /// Metadata of one entry
    pub async fn get_info(&self, key: &RepoKey) -> LensResult<RepoInfo> {
        let lock = self.lock(key);
        let _guard = lock.content.read().await;
        read_json(&self.meta_path(key, INFO_FILE), key).await
    }

    /// Stored tree of one entry
    pub async fn get_tree(&self, key: &RepoKey) -> LensResult<FileNode> {
        let lock = self.lock(key);
        let _guard = lock.content.read().await;
        read_json(&self.meta_path(key, TREE_FILE), key).await
    }

    /// Metadata of every readable entry, most recently opened first
    pub async fn list(&self) -> LensResult<Vec<RepoInfo>> {
        let mut entries = fs::read_dir(&self.repos_dir)
            .await
            .map_err(|e| LensError::io("reading cache directory", e))?;

        let mut infos = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| LensError::io("reading cache entry", e))?
        {
            let name = entry.file_name();
            let Some(key) = name.to_str().and_then(|n| RepoKey::parse(n).ok()) else {
                continue;
            };

            match self.get_info(&key).await {
                Ok(info) => infos.push(info),
                Err(e) => debug!("Skipping {}: {}", key, e),
            }
        }

        infos.sort_by(|a, b| {
            b.last_opened_at
                .cmp(&a.last_opened_at)
                .then_with(|| a.key.cmp(&b.key))
        });
        Ok(infos)
    }

    /// Record that an entry was opened now
    pub async fn touch(&self, key: &RepoKey) -> LensResult<RepoInfo> {
        let lock = self.lock(key);
        let _guard = lock.content.write().await;

        let path = self.meta_path(key, INFO_FILE);
        let mut info: RepoInfo = read_json(&path, key).await?;
        info.last_opened_at = Utc::now();
        write_json(&path, &serde_json::to_vec_pretty(&info)?).await?;

        debug!("Touched {}", key);
        Ok(info)
    }

    /// Remove an entry entirely. Returns whether anything was removed;
    /// deleting an absent key is a no-op.
    pub async fn delete(&self, key: &RepoKey) -> LensResult<bool> {
        let lock = self.lock(key);
        let trashed = {
            let _guard = lock.content.write().await;
            let live = self.entry_dir(key);
            if !exists(&live).await? {
                return Ok(false);
            }

            let trash = self.trash_path(key, DELETED_SEP);
            fs::rename(&live, &trash)
                .await
                .map_err(|e| LensError::io(format!("removing {}", live.display()), e))?;
            trash
        };

        if let Err(e) = remove_path(&trashed).await {
            warn!("Deleted {} but cleanup failed: {}", key, e);
        }
        info!("Deleted {}", key);
        Ok(true)
    }

    /// Absolute path of a live entry
    pub async fn resolve_path(&self, key: &RepoKey) -> LensResult<PathBuf> {
        let lock = self.lock(key);
        let _guard = lock.content.read().await;

        let info_path = self.meta_path(key, INFO_FILE);
        if !exists(&info_path).await? {
            return Err(LensError::NotCached(key.to_string()));
        }

        let dir = self.entry_dir(key);
        fs::canonicalize(&dir)
            .await
            .map_err(|e| LensError::io(format!("resolving {}", dir.display()), e))
    }

    /// Read one file of an entry. The path must name a file node of the
    /// stored tree.
    pub async fn read_file(&self, key: &RepoKey, path: &str) -> LensResult<FileContent> {
        let not_found = || LensError::FileNotFound(path.to_string());
        let entry = self.entry_dir(key);
        let full = resolve_within(&entry, Path::new(path)).map_err(|_| not_found())?;
        let tree_path = full
            .strip_prefix(&entry)
            .map(to_slash)
            .map_err(|_| not_found())?;

        let lock = self.lock(key);
        let _guard = lock.content.read().await;

        let tree: FileNode = read_json(&self.meta_path(key, TREE_FILE), key).await?;
        match tree.find(&tree_path) {
            Some(node) if !node.is_dir => {}
            _ => return Err(not_found()),
        }

        tokio::task::spawn_blocking(move || read_file_content(&full))
            .await
            .map_err(|e| LensError::Internal(format!("read task failed: {}", e)))?
    }

    /// Clean up after a crash: drop abandoned staging areas, put back entries
    /// that were moved aside but never replaced, drop everything else in trash.
    async fn recover(&self, policy: RecoveryPolicy) -> LensResult<()> {
        for entry in stale_children(&self.staging_dir(), policy.staging_age).await? {
            debug!("Removing abandoned staging area {}", entry.display());
            if let Err(e) = remove_path(&entry).await {
                warn!("Failed to remove {}: {}", entry.display(), e);
            }
        }

        for entry in stale_children(&self.trash_dir(), policy.trash_age).await? {
            let restorable = entry
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.split_once(REPLACED_SEP))
                .and_then(|(key, _)| RepoKey::parse(key).ok());

            if let Some(key) = restorable {
                let live = self.entry_dir(&key);
                if !exists(&live).await? {
                    warn!("Restoring interrupted replacement of {}", key);
                    fs::rename(&entry, &live).await.map_err(|e| {
                        LensError::io(format!("restoring {}", live.display()), e)
                    })?;
                    continue;
                }
            }

            if let Err(e) = remove_path(&entry).await {
                warn!("Failed to remove {}: {}", entry.display(), e);
            }
        }

        Ok(())
    }
}

async fn exists(path: &Path) -> LensResult<bool> {
    fs::try_exists(path)
        .await
        .map_err(|e| LensError::io(format!("checking {}", path.display()), e))
}

async fn remove_path(path: &Path) -> LensResult<()> {
    let result = match fs::symlink_metadata(path).await {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path).await,
        Ok(_) => fs::remove_file(path).await,
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    };
    result.map_err(|e| LensError::io(format!("removing {}", path.display()), e))
}

/// Children of `dir` whose modification time is at least `age` ago
async fn stale_children(dir: &Path, age: Duration) -> LensResult<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| LensError::io(format!("reading {}", dir.display()), e))?;

    let mut stale = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| LensError::io(format!("reading {}", dir.display()), e))?
    {
        let old_enough = entry
            .metadata()
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .and_then(|t| t.elapsed().ok())
            .is_some_and(|elapsed| elapsed >= age);
        if old_enough || age.is_zero() {
            stale.push(entry.path());
        }
    }
    Ok(stale)
}

async fn read_json<T: DeserializeOwned>(path: &Path, key: &RepoKey) -> LensResult<T> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(LensError::NotCached(key.to_string())),
        Err(e) => Err(LensError::io(format!("reading {}", path.display()), e)),
    }
}

/// Write through a sibling temp file and rename, so readers never see a
/// partially written file
async fn write_json(path: &Path, bytes: &[u8]) -> LensResult<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes)
        .await
        .map_err(|e| LensError::io(format!("writing {}", tmp.display()), e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| LensError::io(format!("writing {}", path.display()), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;

    async fn store_in(temp: &TempDir) -> CacheStore {
        CacheStore::open(temp.path()).await.unwrap()
    }

    async fn put_files(store: &CacheStore, owner: &str, repo: &str, branch: &str, files: &[(&str, &str)]) -> RepoInfo {
        let info = RepoInfo::new(owner, repo, branch);
        let staged = store.stage(&info.key).unwrap();
        for (path, body) in files {
            let full = staged.content_dir().join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(full, body).unwrap();
        }
        let tree = build_tree(staged.content_dir(), repo).unwrap();
        store.put(staged, &info, &tree).await.unwrap();
        info
    }

    #[tokio::test]
    async fn put_then_get() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let info = put_files(&store, "octo", "hello", "main", &[("README.md", "# hi\n")]).await;

        let loaded = store.get_info(&info.key).await.unwrap();
        assert_eq!(loaded, info);

        let tree = store.get_tree(&info.key).await.unwrap();
        assert_eq!(tree.file_count(), 1);

        let entry = store.entry_dir(&info.key);
        assert!(entry.join("_meta").join("info.json").is_file());
        assert!(entry.join("_meta").join("tree.json").is_file());
        assert!(entry.join("README.md").is_file());
    }

    #[tokio::test]
    async fn put_replaces_whole_entry() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        put_files(&store, "octo", "hello", "main", &[("old.txt", "old")]).await;
        let info = put_files(&store, "octo", "hello", "dev", &[("new.txt", "new")]).await;

        let entry = store.entry_dir(&info.key);
        assert!(!entry.join("old.txt").exists());
        assert!(entry.join("new.txt").is_file());
        assert_eq!(store.get_info(&info.key).await.unwrap().branch, "dev");

        let trash: Vec<_> = std::fs::read_dir(store.trash_dir()).unwrap().collect();
        assert!(trash.is_empty());
    }

    #[tokio::test]
    async fn put_keeps_newer_last_opened() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let first = put_files(&store, "octo", "hello", "main", &[("a", "")]).await;

        let staged = store.stage(&first.key).unwrap();
        let stale = first.refreshed("main");
        tokio::time::sleep(Duration::from_millis(5)).await;
        let touched = store.touch(&first.key).await.unwrap();

        let tree = build_tree(staged.content_dir(), "hello").unwrap();
        store.put(staged, &stale, &tree).await.unwrap();

        let stored = store.get_info(&first.key).await.unwrap();
        assert_eq!(stored.last_opened_at, touched.last_opened_at);
        assert_eq!(stored.imported_at, stale.imported_at);
    }

    #[tokio::test]
    async fn put_rejects_mismatched_key() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let staged = store.stage(&RepoKey::derive("octo", "a")).unwrap();
        let info = RepoInfo::new("octo", "b", "main");

        let err = store.put(staged, &info, &FileNode::dir("b", "")).await.unwrap_err();
        assert!(matches!(err, LensError::Internal(_)));
        assert!(!store.entry_dir(&info.key).exists());
    }

    #[tokio::test]
    async fn snapshot_meta_dir_is_replaced() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let info = put_files(&store, "octo", "hello", "main", &[("_meta/info.json", "garbage")]).await;

        assert_eq!(store.get_info(&info.key).await.unwrap(), info);
    }

    #[tokio::test]
    async fn missing_key_is_not_cached() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let key = RepoKey::derive("octo", "ghost");

        assert!(matches!(store.get_info(&key).await, Err(LensError::NotCached(_))));
        assert!(matches!(store.get_tree(&key).await, Err(LensError::NotCached(_))));
        assert!(matches!(store.resolve_path(&key).await, Err(LensError::NotCached(_))));
        assert!(matches!(store.touch(&key).await, Err(LensError::NotCached(_))));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let info = put_files(&store, "octo", "hello", "main", &[("a.rs", "")]).await;

        assert!(store.delete(&info.key).await.unwrap());
        assert!(!store.entry_dir(&info.key).exists());
        assert!(matches!(store.get_tree(&info.key).await, Err(LensError::NotCached(_))));
        assert!(!store.delete(&info.key).await.unwrap());
    }

    #[tokio::test]
    async fn released_lock_leaves_registry() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let missing = RepoKey::derive("foo", "bar");

        assert!(store.read_file(&missing, "x").await.is_err());
        assert_eq!(store.tracked_locks(), 1);

        store.release_lock(&missing);
        assert_eq!(store.tracked_locks(), 0);
    }

    #[tokio::test]
    async fn list_orders_by_last_opened() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let first = put_files(&store, "octo", "first", "main", &[("a", "")]).await;
        let second = put_files(&store, "octo", "second", "main", &[("b", "")]).await;

        tokio::time::sleep(Duration::from_millis(5)).await;
        store.touch(&first.key).await.unwrap();

        let keys: Vec<_> = store.list().await.unwrap().into_iter().map(|i| i.key).collect();
        assert_eq!(keys, vec![first.key, second.key]);
    }

    #[tokio::test]
    async fn list_skips_unreadable_entries() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        put_files(&store, "octo", "hello", "main", &[("a", "")]).await;
        std::fs::create_dir_all(store.repos_dir().join("stray_dir")).unwrap();

        let infos = store.list().await.unwrap();
        assert_eq!(infos.len(), 1);
    }

    #[tokio::test]
    async fn touch_updates_only_last_opened() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let info = put_files(&store, "octo", "hello", "main", &[("a", "")]).await;
        let tree_before = std::fs::read(store.meta_path(&info.key, TREE_FILE)).unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        let touched = store.touch(&info.key).await.unwrap();

        assert!(touched.last_opened_at > info.last_opened_at);
        assert_eq!(touched.imported_at, info.imported_at);
        assert_eq!(
            std::fs::read(store.meta_path(&info.key, TREE_FILE)).unwrap(),
            tree_before
        );
    }

    #[tokio::test]
    async fn resolve_path_is_absolute_entry_dir() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let info = put_files(&store, "octo", "hello", "main", &[("a", "")]).await;

        let path = store.resolve_path(&info.key).await.unwrap();
        assert!(path.is_absolute());
        assert!(path.join("a").is_file());
    }

    #[tokio::test]
    async fn read_file_checks_tree() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let info = put_files(
            &store,
            "octo",
            "hello",
            "main",
            &[("src/lib.rs", "pub fn x() {}\n"), ("node_modules/dep.js", "x")],
        )
        .await;

        let content = store.read_file(&info.key, "src/lib.rs").await.unwrap();
        assert_eq!(content.content, "pub fn x() {}\n");
        assert_eq!(content.language, "rust");

        for bad in ["src", "missing.rs", "node_modules/dep.js", "../hello/src/lib.rs", "/etc/passwd", "_meta/info.json"] {
            assert!(
                matches!(store.read_file(&info.key, bad).await, Err(LensError::FileNotFound(_))),
                "read {bad:?}"
            );
        }
    }

    #[tokio::test]
    async fn dropped_stage_leaves_nothing() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp).await;
        let staged = store.stage(&RepoKey::derive("octo", "hello")).unwrap();
        std::fs::write(staged.archive_path(), b"partial").unwrap();
        drop(staged);

        let leftovers: Vec<_> = std::fs::read_dir(store.staging_dir()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn recovery_restores_interrupted_replacement() {
        let temp = TempDir::new().unwrap();
        let info = {
            let store = store_in(&temp).await;
            let info = put_files(&store, "octo", "hello", "main", &[("a.rs", "a")]).await;

            // Simulate a crash between moving the old entry aside and installing the new one
            let trash = store.trash_path(&info.key, REPLACED_SEP);
            std::fs::rename(store.entry_dir(&info.key), &trash).unwrap();
            std::fs::create_dir_all(store.staging_dir().join("octo_hello-abandoned")).unwrap();
            info
        };

        let policy = RecoveryPolicy {
            staging_age: Duration::ZERO,
            trash_age: Duration::ZERO,
        };
        let store = CacheStore::open_with(temp.path(), policy).await.unwrap();

        assert_eq!(store.get_info(&info.key).await.unwrap(), info);
        assert_eq!(std::fs::read_dir(store.trash_dir()).unwrap().count(), 0);
        assert_eq!(std::fs::read_dir(store.staging_dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn recovery_never_restores_deleted_entries() {
        let temp = TempDir::new().unwrap();
        let key = {
            let store = store_in(&temp).await;
            let info = put_files(&store, "octo", "hello", "main", &[("a.rs", "a")]).await;
            let trash = store.trash_path(&info.key, DELETED_SEP);
            std::fs::rename(store.entry_dir(&info.key), trash).unwrap();
            info.key
        };

        let policy = RecoveryPolicy {
            staging_age: Duration::ZERO,
            trash_age: Duration::ZERO,
        };
        let store = CacheStore::open_with(temp.path(), policy).await.unwrap();

        assert!(matches!(store.get_info(&key).await, Err(LensError::NotCached(_))));
        assert_eq!(std::fs::read_dir(store.trash_dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn recovery_leaves_young_entries_alone() {
        let temp = TempDir::new().unwrap();
        {
            let store = store_in(&temp).await;
            std::fs::create_dir_all(store.staging_dir().join("octo_hello-inflight")).unwrap();
        }

        let store = store_in(&temp).await;
        assert!(store.staging_dir().join("octo_hello-inflight").is_dir());
    }
}
