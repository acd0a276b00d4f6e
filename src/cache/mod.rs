//! Cache Module
//!
//! The stampede-resistant frontend and the pieces it is built from.

mod deadline;
mod frontend;
mod stats;
mod timer;


// Re-export public types
pub use deadline::{run_with_deadline, Deadline};
pub use frontend::CacheFrontend;
pub use stats::CacheStats;
pub use timer::{decode_timer, encode_timer, timer_key, TIMER_PREFIX};
