//! Cache keys and entry metadata

use crate::error::{LensError, LensResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_KEY_LEN: usize = 200;

fn is_key_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')
}

/// Filesystem-safe identifier of one cache entry
///
/// Derived from `(owner, repo)` only, so re-importing the same repository
/// on another branch lands on the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoKey(String);

impl RepoKey {
    /// Derive the key for a repository. Pure and deterministic; case-insensitive
    /// like GitHub names.
    pub fn derive(owner: &str, repo: &str) -> Self {
        let sanitize = |s: &str| -> String {
            s.chars()
                .map(|c| c.to_ascii_lowercase())
                .map(|c| if is_key_char(c) { c } else { '-' })
                .collect()
        };

        let mut key = format!("{}_{}", sanitize(owner), sanitize(repo));
        if !key.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            key.insert(0, 'r');
        }
        key.truncate(MAX_KEY_LEN);
        Self(key)
    }

    /// Validate a key supplied by a caller.
    ///
    /// A string that could not have come from [`RepoKey::derive`] can never
    /// name a cache entry, so it is reported as `NotCached`.
    pub fn parse(raw: &str) -> LensResult<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_KEY_LEN
            && raw.starts_with(|c: char| c.is_ascii_alphanumeric())
            && raw.chars().all(is_key_char);

        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(LensError::NotCached(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for RepoKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Metadata persisted as `_meta/info.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub key: RepoKey,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub imported_at: DateTime<Utc>,
    pub last_opened_at: DateTime<Utc>,
    pub canonical_url: String,
}

impl RepoInfo {
    /// Create metadata for a fresh import
    pub fn new(owner: &str, repo: &str, branch: &str) -> Self {
        let now = Utc::now();
        Self {
            key: RepoKey::derive(owner, repo),
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            imported_at: now,
            last_opened_at: now,
            canonical_url: canonical_url(owner, repo),
        }
    }

    /// Metadata for a refreshed snapshot of the same entry.
    ///
    /// Identity fields and `last_opened_at` carry over; branch and import
    /// time describe the new snapshot.
    pub fn refreshed(&self, branch: &str) -> Self {
        Self {
            branch: branch.to_string(),
            imported_at: Utc::now(),
            ..self.clone()
        }
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Canonical web URL of a repository
pub fn canonical_url(owner: &str, repo: &str) -> String {
    format!("https://github.com/{}/{}", owner, repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic_and_case_insensitive() {
        let a = RepoKey::derive("Octo-Org", "Hello.World");
        let b = RepoKey::derive("octo-org", "hello.world");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "octo-org_hello.world");
    }

    #[test]
    fn derive_replaces_unsafe_chars() {
        let key = RepoKey::derive("own er", "re/po");
        assert_eq!(key.as_str(), "own-er_re-po");
        assert!(RepoKey::parse(key.as_str()).is_ok());
    }

    #[test]
    fn derived_keys_never_start_with_dot() {
        let key = RepoKey::derive(".hidden", "repo");
        assert!(key.as_str().starts_with('r'));
        assert!(RepoKey::parse(key.as_str()).is_ok());
    }

    #[test]
    fn parse_rejects_path_like_keys() {
        for raw in ["", "..", ".staging", "a/b", "../etc", "UPPER_case", "a\\b"] {
            assert!(
                matches!(RepoKey::parse(raw), Err(LensError::NotCached(_))),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn refreshed_keeps_identity() {
        let mut info = RepoInfo::new("octo", "hello", "main");
        info.last_opened_at = DateTime::from_timestamp(1_000, 0).unwrap();

        let next = info.refreshed("develop");
        assert_eq!(next.key, info.key);
        assert_eq!(next.canonical_url, "https://github.com/octo/hello");
        assert_eq!(next.last_opened_at, info.last_opened_at);
        assert_eq!(next.branch, "develop");
        assert!(next.imported_at >= info.imported_at);
    }

    #[test]
    fn info_serializes_key_as_string() {
        let info = RepoInfo::new("octo", "hello", "main");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["key"], "octo_hello");
        assert_eq!(json["canonical_url"], "https://github.com/octo/hello");
    }
}
