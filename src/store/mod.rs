//! Store Module
//!
//! The key-value store capability consumed by the cache frontend, the
//! provider that resolves it, and an in-memory reference backend.

mod entry;
mod memory;
mod provider;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::StoredEntry;
pub use memory::MemoryStore;
pub use provider::StoreProvider;

// == Write Operation ==
/// A single write inside an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    /// Plain set; clears any previous TTL on the key
    Set { key: String, value: Vec<u8> },
    /// Set with a hard TTL in seconds
    SetWithTtl {
        key: String,
        value: Vec<u8>,
        ttl_secs: u64,
    },
}

impl WriteOp {
    pub fn set(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        WriteOp::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn set_with_ttl(key: impl Into<String>, value: impl Into<Vec<u8>>, ttl_secs: u64) -> Self {
        WriteOp::SetWithTtl {
            key: key.into(),
            value: value.into(),
            ttl_secs,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            WriteOp::Set { key, .. } | WriteOp::SetWithTtl { key, .. } => key,
        }
    }
}

// == Key-Value Store ==
/// Byte-oriented key-value store with TTL and atomic multi-key writes.
///
/// Implementations report their own failures as [`crate::CacheError::Store`].
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the bytes under `key`, or None when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Batched get; the result order matches `keys`.
    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<Option<Vec<u8>>>>;

    /// Stores `value` with no expiry.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Stores `value` expiring after `ttl_secs` seconds.
    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl_secs: u64) -> Result<()>;

    /// Applies every op so they become visible together, or none of them.
    ///
    /// Returns one success flag per op, in order.
    async fn atomic_multi(&self, ops: Vec<WriteOp>) -> Result<Vec<bool>>;

    /// Removes `keys` and returns how many actually existed.
    async fn delete(&self, keys: &[&str]) -> Result<usize>;
}
