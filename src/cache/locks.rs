//! Per-key locking for cache entries
//!
//! Each key gets two locks. The operation mutex serializes whole
//! import/update/delete runs on one key, including their network phase.
//! The content lock guards the on-disk entry itself: readers hold it shared,
//! the final swap, touch and delete hold it exclusively and only briefly.
//! Different keys never contend.
//!
//! Looking up any well-formed key adds a registry entry, cached or not.
//! Entries are dropped again by [`KeyLocks::prune`] once a delete finishes
//! and nobody else holds them; the rest live as long as the store.

use crate::cache::key::RepoKey;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock as ContentLock};

/// Locks belonging to one cache key
#[derive(Debug, Default)]
pub struct KeyLock {
    pub operation: Mutex<()>,
    pub content: ContentLock<()>,
}

/// Registry handing out one [`KeyLock`] per key
#[derive(Debug, Default)]
pub struct KeyLocks {
    locks: RwLock<HashMap<RepoKey, Arc<KeyLock>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the lock for `key`
    pub fn get(&self, key: &RepoKey) -> Arc<KeyLock> {
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(key) {
                return lock.clone();
            }
        }

        // Another task may have inserted it between the two map locks
        let mut map = self.locks.write();
        map.entry(key.clone()).or_default().clone()
    }

    /// Forget the lock for `key` if the registry holds the only reference
    pub fn prune(&self, key: &RepoKey) {
        let mut map = self.locks.write();
        if map.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(key);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.read().len()
    }
}
