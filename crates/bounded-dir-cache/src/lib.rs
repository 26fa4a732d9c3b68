//! Size-bounded cache directory
//!
//! Keeps the disk footprint of a directory under a ceiling. When the total
//! size of the tree crosses `max_size_mb`, the oldest direct children of the
//! root are removed (whole subtrees at a time) until a fresh measurement
//! reads below `target_size_mb`. Cleanup cycles are serialized by a lock
//! owned by the [`CacheDirectory`], and can run on demand or from a
//! background loop started with [`CacheDirectory::start_auto_cleaner`].

mod cache;
mod cleaner;
mod error;
pub mod planner;
pub mod probe;
mod types;

pub use cache::CacheDirectory;
pub use cleaner::AutoCleanerHandle;
pub use error::{CacheError, Result};
pub use types::{
    CacheConfig, CacheStats, CleanupOutcome, CleanupReport, TopLevelEntry, BYTES_PER_MB,
    DEFAULT_CLEAN_INTERVAL, DEFAULT_MAX_SIZE_MB, DEFAULT_TARGET_SIZE_MB,
};
