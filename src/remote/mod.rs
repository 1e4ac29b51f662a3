//! Remote repository hosts
//!
//! The [`RepoHost`] trait is the seam between the ingestion pipeline and
//! the network, so the pipeline can run against GitHub or a test double.

pub mod github;
pub mod reference;

pub use github::GithubHost;
pub use reference::{parse_reference, RepoRef};

use crate::error::LensResult;
use async_trait::async_trait;
use std::path::Path;

/// Source of repository metadata and snapshot archives
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Name of the repository's default branch
    async fn default_branch(&self, owner: &str, repo: &str) -> LensResult<String>;

    /// Stream the gzip tarball of `branch` into `dest`, returning bytes written.
    ///
    /// Dropping the future abandons the download; `dest` may then hold a
    /// partial file which the caller discards.
    async fn download_archive(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        dest: &Path,
    ) -> LensResult<u64>;

    /// Human-readable host name for display
    fn host_name(&self) -> &'static str;
}
