//! Configuration Module
//!
//! Timing parameters for fetch and write operations, loadable from
//! environment variables or deserialized from an application config file.

use std::env;

use serde::{Deserialize, Serialize};

/// Default freshness window in seconds (one day)
pub const DEFAULT_EXPIRES_IN: u64 = 60 * 60 * 24;

/// Default seconds allotted to a recompute before falling back to the stale value
pub const DEFAULT_RACE_CONDITION_TTL: u64 = 30;

/// Default number of stale recompute windows folded into the hard TTL
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Per-call timing options for the cache frontend.
///
/// `max_retries` is not a loop count. It only widens the hard TTL so an entry
/// survives several timed-out recompute windows before the store expires it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Freshness window in seconds
    pub expires_in: u64,
    /// Deadline in seconds for a recompute on the stale path
    pub race_condition_ttl: u64,
    /// Stale windows added to the hard TTL ceiling
    pub max_retries: u32,
}

impl FetchOptions {
    /// Creates options with the default timing parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates FetchOptions by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_EXPIRES_IN` - Freshness window in seconds (default: 86400)
    /// - `CACHE_RACE_CONDITION_TTL` - Recompute deadline in seconds (default: 30)
    /// - `CACHE_MAX_RETRIES` - Stale windows in the hard TTL (default: 3)
    pub fn from_env() -> Self {
        Self {
            expires_in: env::var("CACHE_EXPIRES_IN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EXPIRES_IN),
            race_condition_ttl: env::var("CACHE_RACE_CONDITION_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RACE_CONDITION_TTL),
            max_retries: env::var("CACHE_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_RETRIES),
        }
    }

    pub fn with_expires_in(mut self, secs: u64) -> Self {
        self.expires_in = secs;
        self
    }

    pub fn with_race_condition_ttl(mut self, secs: u64) -> Self {
        self.race_condition_ttl = secs;
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    // == Hard TTL ==
    /// Store-level TTL for the value key: `expires_in + max_retries * race_condition_ttl`.
    pub fn hard_ttl(&self) -> u64 {
        self.expires_in
            .saturating_add(u64::from(self.max_retries).saturating_mul(self.race_condition_ttl))
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            expires_in: DEFAULT_EXPIRES_IN,
            race_condition_ttl: DEFAULT_RACE_CONDITION_TTL,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let opts = FetchOptions::default();
        assert_eq!(opts.expires_in, 86_400);
        assert_eq!(opts.race_condition_ttl, 30);
        assert_eq!(opts.max_retries, 3);
        assert_eq!(opts.hard_ttl(), 86_490);
    }

    #[test]
    fn test_hard_ttl() {
        let opts = FetchOptions::new()
            .with_expires_in(100)
            .with_race_condition_ttl(10)
            .with_max_retries(3);
        assert_eq!(opts.hard_ttl(), 130);
    }

    #[test]
    fn test_hard_ttl_zero_retries() {
        let opts = FetchOptions::new().with_expires_in(60).with_max_retries(0);
        assert_eq!(opts.hard_ttl(), 60);
    }

    #[test]
    fn test_deserialize_partial() {
        let opts: FetchOptions = serde_json::from_str(r#"{"expires_in": 120}"#).unwrap();
        assert_eq!(opts.expires_in, 120);
        assert_eq!(opts.race_condition_ttl, DEFAULT_RACE_CONDITION_TTL);
        assert_eq!(opts.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_options_from_env() {
        env::remove_var("CACHE_EXPIRES_IN");
        env::remove_var("CACHE_RACE_CONDITION_TTL");
        env::remove_var("CACHE_MAX_RETRIES");
        assert_eq!(FetchOptions::from_env(), FetchOptions::default());

        env::set_var("CACHE_EXPIRES_IN", "600");
        env::set_var("CACHE_RACE_CONDITION_TTL", "not-a-number");
        let opts = FetchOptions::from_env();
        assert_eq!(opts.expires_in, 600);
        assert_eq!(opts.race_condition_ttl, DEFAULT_RACE_CONDITION_TTL);

        env::remove_var("CACHE_EXPIRES_IN");
        env::remove_var("CACHE_RACE_CONDITION_TTL");
    }
}
