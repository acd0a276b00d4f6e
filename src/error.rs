//! Error types for the cache frontend
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache frontend.
///
/// A recompute that overruns its deadline is not an error: the frontend
/// serves the stale value instead (see [`crate::cache::Deadline`]).
#[derive(Error, Debug)]
pub enum CacheError {
    /// No store handle has been configured
    #[error("Cache store must be configured before use")]
    Configuration,

    /// The underlying key-value store failed
    #[error("Store error: {0}")]
    Store(String),

    /// The value codec failed to encode or decode
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The application compute callback failed
    #[error("Compute failed: {0}")]
    Compute(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl CacheError {
    /// Wraps a compute callback failure.
    pub fn compute(err: anyhow::Error) -> Self {
        CacheError::Compute(err.into())
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache frontend.
pub type Result<T> = std::result::Result<T, CacheError>;
