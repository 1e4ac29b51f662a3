//! Repository ingestion and access
//!
//! [`RepoService`] composes the pipeline
//! `resolve -> download -> extract -> build tree -> put` and exposes the
//! operations the rest of the application works with. Nothing reaches the
//! cache unless every stage succeeds.

use crate::archive::extract_tarball;
use crate::cache::{CacheStore, RepoInfo, RepoKey, StagedEntry};
use crate::content::FileContent;
use crate::error::{LensError, LensResult};
use crate::remote::{parse_reference, RepoHost};
use crate::tree::{build_tree, FileNode};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a successful import
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub key: RepoKey,
    pub info: RepoInfo,
    pub tree: FileNode,
}

/// Outcome of a successful update
#[derive(Debug, Clone, Serialize)]
pub struct UpdateResult {
    pub info: RepoInfo,
    pub tree: FileNode,
}

/// Entry point for importing, refreshing and reading cached repositories
pub struct RepoService {
    store: Arc<CacheStore>,
    host: Arc<dyn RepoHost>,
}

impl RepoService {
    pub fn new(store: Arc<CacheStore>, host: Arc<dyn RepoHost>) -> Self {
        Self { store, host }
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn host_name(&self) -> &'static str {
        self.host.host_name()
    }

    /// Import a repository from a URL or `owner/repo[@branch]` reference.
    ///
    /// Importing a repository that is already cached replaces its snapshot
    /// and keeps its key.
    pub async fn import(&self, reference: &str) -> LensResult<ImportResult> {
        let parsed = parse_reference(reference)?;
        let branch = match parsed.branch {
            Some(branch) => branch,
            None => {
                let branch = self.host.default_branch(&parsed.owner, &parsed.repo).await?;
                debug!("Default branch of {}/{} is {}", parsed.owner, parsed.repo, branch);
                branch
            }
        };

        let key = RepoKey::derive(&parsed.owner, &parsed.repo);
        let lock = self.store.lock(&key);
        let _operation = lock.operation.lock().await;

        let info = match self.store.get_info(&key).await {
            Ok(existing) => existing.refreshed(&branch),
            Err(LensError::NotCached(_)) => RepoInfo::new(&parsed.owner, &parsed.repo, &branch),
            Err(e) => return Err(e),
        };

        let (staged, tree) = self.build_snapshot(&key, &info.owner, &info.repo, &branch).await?;
        self.store.put(staged, &info, &tree).await?;
        let info = self.store.get_info(&key).await?;

        info!("Imported {} as {} ({} files)", info.full_name(), key, tree.file_count());
        Ok(ImportResult { key, info, tree })
    }

    /// Fetch the current default branch of an entry's repository and replace
    /// the entry with it. On failure the previous entry stays as it was.
    pub async fn update(&self, key: &RepoKey) -> LensResult<UpdateResult> {
        let lock = self.store.lock(key);
        let _operation = lock.operation.lock().await;

        let current = self.store.get_info(key).await?;
        let branch = self.host.default_branch(&current.owner, &current.repo).await?;

        let (staged, tree) = self
            .build_snapshot(key, &current.owner, &current.repo, &branch)
            .await?;
        self.store.put(staged, &current.refreshed(&branch), &tree).await?;
        let info = self.store.get_info(key).await?;

        info!("Updated {} to {}", key, branch);
        Ok(UpdateResult { info, tree })
    }

    /// Download, extract and index a snapshot without touching the live entry
    async fn build_snapshot(
        &self,
        key: &RepoKey,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> LensResult<(StagedEntry, FileNode)> {
        let staged = self.store.stage(key)?;
        let archive = staged.archive_path();

        let bytes = self
            .host
            .download_archive(owner, repo, branch, &archive)
            .await?;
        debug!("Fetched {}/{}@{} ({} bytes)", owner, repo, branch, bytes);

        let content_dir = staged.content_dir().to_path_buf();
        let root_name = repo.to_string();
        let tree = tokio::task::spawn_blocking(move || -> LensResult<FileNode> {
            let stats = extract_tarball(&archive, &content_dir)?;
            debug!(
                "Extracted {} files, {} dirs from {} (skipped {} links)",
                stats.files, stats.dirs, stats.wrapper, stats.skipped_links
            );
            if let Err(e) = std::fs::remove_file(&archive) {
                debug!("Could not remove {}: {}", archive.display(), e);
            }
            build_tree(&content_dir, &root_name)
        })
        .await
        .map_err(|e| LensError::Internal(format!("snapshot task failed: {}", e)))??;

        Ok((staged, tree))
    }

    /// Read one file of a cached repository
    pub async fn read(&self, key: &RepoKey, path: &str) -> LensResult<FileContent> {
        self.store.read_file(key, path).await
    }

    /// All cached repositories, most recently opened first
    pub async fn list(&self) -> LensResult<Vec<RepoInfo>> {
        self.store.list().await
    }

    pub async fn get_info(&self, key: &RepoKey) -> LensResult<RepoInfo> {
        self.store.get_info(key).await
    }

    pub async fn get_tree(&self, key: &RepoKey) -> LensResult<FileNode> {
        self.store.get_tree(key).await
    }

    /// Remove an entry; removing an absent entry is a no-op
    pub async fn delete(&self, key: &RepoKey) -> LensResult<()> {
        let removed = {
            let lock = self.store.lock(key);
            let _operation = lock.operation.lock().await;
            self.store.delete(key).await
        };
        self.store.release_lock(key);

        if !removed? {
            debug!("Nothing cached under {}", key);
        }
        Ok(())
    }

    /// Mark an entry as opened now
    pub async fn touch(&self, key: &RepoKey) -> LensResult<RepoInfo> {
        self.store.touch(key).await
    }

    /// Local directory of an entry
    pub async fn resolve_path(&self, key: &RepoKey) -> LensResult<PathBuf> {
        self.store.resolve_path(key).await
    }
}
