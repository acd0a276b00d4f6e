//! Memory Store Module
//!
//! In-process [`KeyValueStore`] with per-key TTL. Every batch runs under a
//! single write lock, which is what makes `atomic_multi` atomic here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{KeyValueStore, StoredEntry, WriteOp};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;

// == Memory Store ==
/// HashMap-backed store with lazy TTL expiry.
#[derive(Debug)]
pub struct MemoryStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, StoredEntry>>,
    /// Time source for expiry checks
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store whose expiry follows `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    // == Time To Live ==
    /// Remaining TTL of a live key in seconds.
    ///
    /// Returns None when the key is absent, expired, or has no expiry.
    pub async fn ttl(&self, key: &str) -> Option<u64> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .and_then(|entry| entry.ttl_remaining(now))
    }

    // == Purge Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();

        if removed > 0 {
            debug!(removed, "purged expired entries");
        }
        removed
    }

    // == Length ==
    /// Returns the number of live entries.
    pub async fn len(&self) -> usize {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries.values().filter(|entry| !entry.is_expired(now)).count()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn live_value(entries: &HashMap<String, StoredEntry>, key: &str, now: i64) -> Option<Vec<u8>> {
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        Ok(Self::live_value(&entries, key, now))
    }

    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        Ok(keys
            .iter()
            .map(|key| Self::live_value(&entries, key, now))
            .collect())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredEntry::new(value, None, now));
        Ok(())
    }

    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), StoredEntry::new(value, Some(ttl_secs), now));
        Ok(())
    }

    async fn atomic_multi(&self, ops: Vec<WriteOp>) -> Result<Vec<bool>> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let results = ops
            .into_iter()
            .map(|op| {
                let (key, entry) = match op {
                    WriteOp::Set { key, value } => (key, StoredEntry::new(value, None, now)),
                    WriteOp::SetWithTtl {
                        key,
                        value,
                        ttl_secs,
                    } => (key, StoredEntry::new(value, Some(ttl_secs), now)),
                };
                entries.insert(key, entry);
                true
            })
            .collect();
        Ok(results)
    }

    async fn delete(&self, keys: &[&str]) -> Result<usize> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let removed = keys
            .iter()
            .filter_map(|key| entries.remove(*key))
            .filter(|entry| !entry.is_expired(now))
            .count();
        Ok(removed)
    }
}
