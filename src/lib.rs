//! Stampede Cache - a dogpile-resistant read-through cache frontend
//!
//! Serves values from a TTL key-value store, recomputing them when stale
//! while keeping concurrent callers from recomputing the same value at once.
//! A recompute that overruns its deadline falls back to the stale value.
//!
//! # Example
//! ```ignore
//! let store = Arc::new(MemoryStore::new());
//! let cache = CacheFrontend::with_store(store);
//!
//! let report: Report = cache
//!     .fetch("report:daily", None, || async { build_report().await })
//!     .await?;
//! ```

pub mod cache;
pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod store;

pub use cache::{CacheFrontend, CacheStats, Deadline};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{JsonCodec, ValueCodec};
pub use config::FetchOptions;
pub use error::{CacheError, Result};
pub use store::{KeyValueStore, MemoryStore, StoreProvider, WriteOp};
