//! Local cache of repository snapshots
//!
//! Every entry is a directory named by its [`RepoKey`] holding the
//! extracted repository plus a `_meta` directory with the entry's
//! [`RepoInfo`] and serialized tree.
//!
//! # Guarantees
//!
//! - Entries are replaced whole: readers see the old snapshot or the new
//!   one, never a mix
//! - A failed import or update leaves the previous entry untouched
//! - Operations on different keys never wait on each other

pub mod key;
pub mod locks;
pub mod store;

pub use key::{canonical_url, RepoInfo, RepoKey};
pub use locks::{KeyLock, KeyLocks};
pub use store::{CacheStore, RecoveryPolicy, StagedEntry};

/// Metadata directory inside each entry
pub const META_DIR: &str = "_meta";

/// Entry metadata file inside [`META_DIR`]
pub const INFO_FILE: &str = "info.json";

/// Serialized tree file inside [`META_DIR`]
pub const TREE_FILE: &str = "tree.json";
