//! Cache Frontend Module
//!
//! Read-through cache over a [`KeyValueStore`] that keeps concurrent callers
//! from recomputing the same expired value at once.
//!
//! Each value key has a companion `timer:<key>` holding the unix timestamp it
//! stays fresh until. The value itself carries a longer hard TTL
//! (`expires_in + max_retries * race_condition_ttl`) so a stale copy survives
//! while callers recompute it.
//!
//! # Soft lock
//! A caller that finds a stale timer pushes it forward by
//! `race_condition_ttl` before recomputing, so later callers see a fresh timer
//! and return the stale value instead of piling on. The timer check and the
//! push are two separate store calls, not a compare-and-set: callers that read
//! the same stale timer before either push lands will all recompute. Only the
//! value + timer write pair is atomic.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::deadline::{run_with_deadline, Deadline};
use super::stats::{CacheStats, StatsRecorder};
use super::timer::{decode_timer, encode_timer, offset_from, timer_key};
use crate::clock::{Clock, SystemClock};
use crate::codec::{JsonCodec, ValueCodec};
use crate::config::FetchOptions;
use crate::error::{CacheError, Result};
use crate::store::{KeyValueStore, StoreProvider, WriteOp};

// == Cache Frontend ==
/// Stampede-resistant cache over an injected key-value store.
#[derive(Debug)]
pub struct CacheFrontend<C = JsonCodec> {
    /// Store handle, resolved on every operation
    store: Option<StoreProvider>,
    /// Value codec
    codec: C,
    /// Source of "now" for freshness timers
    clock: Arc<dyn Clock>,
    /// Options used when a call passes none
    defaults: FetchOptions,
    /// Fetch outcome counters
    stats: StatsRecorder,
}

impl CacheFrontend<JsonCodec> {
    // == Constructor ==
    /// Creates an unconfigured frontend using the JSON codec.
    ///
    /// Every operation fails with [`CacheError::Configuration`] until a store
    /// is set.
    pub fn new() -> Self {
        Self::with_codec(JsonCodec)
    }

    /// Creates a frontend bound to `store`.
    pub fn with_store(store: impl Into<StoreProvider>) -> Self {
        let mut frontend = Self::new();
        frontend.set_store(store);
        frontend
    }
}

impl Default for CacheFrontend<JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ValueCodec> CacheFrontend<C> {
    /// Creates an unconfigured frontend using `codec`.
    pub fn with_codec(codec: C) -> Self {
        Self {
            store: None,
            codec,
            clock: Arc::new(SystemClock),
            defaults: FetchOptions::default(),
            stats: StatsRecorder::default(),
        }
    }

    /// Replaces the clock used for freshness decisions.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the options used when a call passes `None`.
    pub fn with_default_options(mut self, options: FetchOptions) -> Self {
        self.defaults = options;
        self
    }

    // == Store Configuration ==
    /// Sets the store handle, either an instance or a lazy [`StoreProvider`].
    pub fn set_store(&mut self, store: impl Into<StoreProvider>) {
        self.store = Some(store.into());
        info!("cache store configured");
    }

    /// Removes the store handle.
    pub fn clear_store(&mut self) {
        self.store = None;
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    pub fn default_options(&self) -> FetchOptions {
        self.defaults
    }

    /// Returns a snapshot of fetch statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    fn store(&self) -> Result<Arc<dyn KeyValueStore>> {
        self.store
            .as_ref()
            .map(StoreProvider::resolve)
            .ok_or(CacheError::Configuration)
    }

    // == Fetch ==
    /// Returns the cached value for `key`, computing it when missing or stale.
    ///
    /// - Fresh entry: returned as-is, `compute` is not called.
    /// - Stale entry: the timer is pushed forward as a soft lock and
    ///   `compute` runs with a `race_condition_ttl` deadline. A value that
    ///   arrives in time is written and returned; otherwise the stale value is
    ///   returned and nothing is written.
    /// - Missing entry: `compute` runs with no deadline and its value is written.
    ///
    /// Compute failures propagate as [`CacheError::Compute`] on both paths.
    pub async fn fetch<T, F, Fut>(
        &self,
        key: &str,
        options: Option<FetchOptions>,
        compute: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let store = self.store()?;
        let opts = options.unwrap_or(self.defaults);
        let timer_key = timer_key(key);
        let now = self.clock.now();

        let Some(cached) = store.get(key).await? else {
            debug!(key, "cache miss, computing");
            self.stats.record_miss();
            let value = compute().await.map_err(CacheError::compute)?;
            self.persist(store.as_ref(), key, &timer_key, &value, now, &opts)
                .await?;
            self.stats.record_recompute();
            return Ok(value);
        };

        let valid_until = decode_timer(store.get(&timer_key).await?.as_deref());
        if valid_until >= now {
            debug!(key, valid_until, "cache hit");
            self.stats.record_hit();
            return self.codec.deserialize(&cached);
        }

        debug!(key, valid_until, now, "stale entry, recomputing");
        self.stats.record_stale_hit();
        store
            .set(
                &timer_key,
                encode_timer(offset_from(now, opts.race_condition_ttl)),
            )
            .await?;

        let limit = Duration::from_secs(opts.race_condition_ttl);
        match run_with_deadline(limit, compute()).await? {
            Deadline::Completed(value) => {
                self.persist(store.as_ref(), key, &timer_key, &value, now, &opts)
                    .await?;
                self.stats.record_recompute();
                Ok(value)
            }
            Deadline::Exceeded => {
                warn!(
                    key,
                    race_condition_ttl = opts.race_condition_ttl,
                    "recompute exceeded deadline, serving stale value"
                );
                self.stats.record_deadline_exceeded();
                self.codec.deserialize(&cached)
            }
        }
    }

    // == Read ==
    /// Returns the value for `key` only while its timer is fresh.
    ///
    /// Unlike [`fetch`](Self::fetch), a stale value is hidden.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store()?;
        let timer_key = timer_key(key);
        let now = self.clock.now();

        let mut values = store
            .multi_get(&[key, timer_key.as_str()])
            .await?
            .into_iter();
        let value = values.next().flatten();
        let timer = values.next().flatten();

        match (value, timer) {
            (Some(bytes), Some(timer)) if decode_timer(Some(timer.as_slice())) >= now => {
                self.codec.deserialize(&bytes).map(Some)
            }
            _ => Ok(None),
        }
    }

    // == Write ==
    /// Stores `value` and marks it fresh, ignoring any soft lock in place.
    ///
    /// Returns true iff both writes of the atomic batch succeeded.
    pub async fn write<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        options: Option<FetchOptions>,
    ) -> Result<bool> {
        let store = self.store()?;
        let opts = options.unwrap_or(self.defaults);
        let now = self.clock.now();

        self.persist(store.as_ref(), key, &timer_key(key), value, now, &opts)
            .await
    }

    // == Delete ==
    /// Removes the value and its timer together.
    ///
    /// Returns true only if both existed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let store = self.store()?;
        let timer_key = timer_key(key);

        let removed = store.delete(&[key, timer_key.as_str()]).await?;
        debug!(key, removed, "deleted entry");
        Ok(removed == 2)
    }

    /// Atomically writes the value with its hard TTL and the fresh timer.
    async fn persist<T: Serialize>(
        &self,
        store: &dyn KeyValueStore,
        key: &str,
        timer_key: &str,
        value: &T,
        now: i64,
        opts: &FetchOptions,
    ) -> Result<bool> {
        let bytes = self.codec.serialize(value)?;
        let valid_until = offset_from(now, opts.expires_in);

        let results = store
            .atomic_multi(vec![
                WriteOp::set_with_ttl(key, bytes, opts.hard_ttl()),
                WriteOp::set(timer_key, encode_timer(valid_until)),
            ])
            .await?;

        debug!(key, valid_until, ttl = opts.hard_ttl(), "wrote entry");
        Ok(results.len() == 2 && results.iter().all(|ok| *ok))
    }
}
