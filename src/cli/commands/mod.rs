//! CLI command implementations

pub mod cat;
pub mod config;
pub mod import;
pub mod info;
pub mod list;
pub mod path;
pub mod rm;
pub mod tree;
pub mod update;

pub use cat::execute as cat;
pub use config::execute as config;
pub use import::execute as import;
pub use info::execute as info;
pub use list::execute as list;
pub use path::execute as path;
pub use rm::execute as rm;
pub use tree::execute as tree;
pub use update::execute as update;

use crate::cache::{CacheStore, RepoKey};
use crate::config::{GithubConfig, NetworkConfig};
use crate::error::{LensError, LensResult};
use crate::remote::{parse_reference, GithubHost};
use crate::service::RepoService;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Open the cache under `data_dir` and connect it to GitHub
pub async fn open_service(
    data_dir: &Path,
    github: GithubConfig,
    network: NetworkConfig,
) -> LensResult<RepoService> {
    debug!("Using data directory {}", data_dir.display());
    let store = CacheStore::open(data_dir).await?;
    let host = GithubHost::new(github, network)?;
    Ok(RepoService::new(Arc::new(store), Arc::new(host)))
}

/// Accept either a cache key or an `owner/repo` reference
pub fn resolve_key(raw: &str) -> LensResult<RepoKey> {
    if let Ok(key) = RepoKey::parse(raw) {
        return Ok(key);
    }

    parse_reference(raw)
        .map(|r| RepoKey::derive(&r.owner, &r.repo))
        .map_err(|_| LensError::NotCached(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_key_accepts_keys_and_references() {
        assert_eq!(resolve_key("octo_hello").unwrap().as_str(), "octo_hello");
        assert_eq!(resolve_key("Octo/Hello").unwrap().as_str(), "octo_hello");
        assert_eq!(
            resolve_key("https://github.com/octo/hello").unwrap().as_str(),
            "octo_hello"
        );
    }

    #[test]
    fn resolve_key_rejects_paths() {
        for raw in ["../etc", ".staging", "a b c"] {
            assert!(
                matches!(resolve_key(raw), Err(LensError::NotCached(_))),
                "accepted {raw:?}"
            );
        }
    }
}
