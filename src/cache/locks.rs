//! Per-key mutual exclusion for compiles
//!
//! Two requests for the same source path must not compile and write the
//! same artifact at the same time. Requests for different keys never wait on
//! each other.

use crate::cache::key::CacheKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guard held while a key is being compiled
pub type KeyGuard = OwnedMutexGuard<()>;

/// Lock table keyed by cache key
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn lock(&self, key: &CacheKey) -> KeyGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop entries nobody is holding or waiting on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(key.clone()).or_default())
        };

        lock.lock_owned().await
    }

    /// Number of keys currently held or waited on
    #[cfg(test)]
    pub fn active(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}
