//! Stored Entry Module
//!
//! A single value held by the in-memory store, with optional hard expiry.

// == Stored Entry ==
/// Bytes plus an optional expiry instant (unix seconds).
#[derive(Debug, Clone)]
pub struct StoredEntry {
    /// The stored bytes
    pub value: Vec<u8>,
    /// Expiration timestamp (unix seconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl StoredEntry {
    // == Constructor ==
    /// Creates a new entry written at `now` with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The bytes to store
    /// * `ttl_secs` - Optional TTL in seconds
    /// * `now` - Current unix timestamp in seconds
    pub fn new(value: Vec<u8>, ttl_secs: Option<u64>, now: i64) -> Self {
        let expires_at =
            ttl_secs.map(|ttl| now.saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX)));

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: the entry is expired once `now >= expires_at`, so a
    /// TTL of N seconds is gone exactly N seconds after the write.
    pub fn is_expired(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in seconds, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(0)` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self, now: i64) -> Option<u64> {
        self.expires_at
            .map(|expires| u64::try_from(expires - now).unwrap_or(0))
    }
}
