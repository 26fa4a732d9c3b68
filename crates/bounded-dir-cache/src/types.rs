//! Cache types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const BYTES_PER_MB: u64 = 1024 * 1024;
pub const DEFAULT_MAX_SIZE_MB: u64 = 2048;
pub const DEFAULT_TARGET_SIZE_MB: u64 = 1536;
pub const DEFAULT_CLEAN_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

/// Construction-time settings for a cache directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Absolute path of the directory to govern
    pub cache_dir: PathBuf,
    /// Size that triggers a cleanup cycle when exceeded
    pub max_size_mb: u64,
    /// Size a cleanup cycle evicts down to
    pub target_size_mb: u64,
}

impl CacheConfig {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            target_size_mb: DEFAULT_TARGET_SIZE_MB,
        }
    }

    pub fn with_limits(mut self, max_size_mb: u64, target_size_mb: u64) -> Self {
        self.max_size_mb = max_size_mb;
        self.target_size_mb = target_size_mb;
        self
    }
}

/// A direct child of the cache root, the unit of eviction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopLevelEntry {
    pub path: PathBuf,
    /// mtime of the entry itself, never derived from its contents
    pub modified: DateTime<Utc>,
}

/// How a cleanup cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupOutcome {
    /// Size was at or below the ceiling, nothing was touched
    WithinLimit,
    /// A fresh measurement dropped below the target
    TargetReached,
    /// Every planned entry was tried
    PlanExhausted,
}

/// Result of one guarded cleanup cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupReport {
    pub started_at: DateTime<Utc>,
    pub outcome: CleanupOutcome,
    pub size_before: u64,
    pub size_after: u64,
    /// Deleted entries, oldest first
    pub deleted: Vec<PathBuf>,
    pub failed: usize,
}

impl CleanupReport {
    pub fn evicted(&self) -> bool {
        !self.deleted.is_empty()
    }
}

/// Statistics about the cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub cache_dir: PathBuf,
    pub max_size_mb: u64,
    pub target_size_mb: u64,
    pub size_bytes: u64,
    pub size_mb: f64,
    pub cycles: u64,
    pub evicting_cycles: u64,
    pub entries_deleted: u64,
    pub delete_failures: u64,
    pub last_cleanup: Option<CleanupReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CacheConfig::new("/var/cache/operator");
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/operator"));
        assert_eq!(config.max_size_mb, 2048);
        assert_eq!(config.target_size_mb, 1536);
    }

    #[test]
    fn test_config_with_limits() {
        let config = CacheConfig::new("/tmp/c").with_limits(15, 10);
        assert_eq!(config.max_size_mb, 15);
        assert_eq!(config.target_size_mb, 10);
    }

    #[test]
    fn test_default_interval_is_six_hours() {
        assert_eq!(DEFAULT_CLEAN_INTERVAL.as_secs(), 21_600);
    }

    #[test]
    fn test_cleanup_report_serialization() {
        let report = CleanupReport {
            started_at: Utc::now(),
            outcome: CleanupOutcome::TargetReached,
            size_before: 18 * BYTES_PER_MB,
            size_after: 9 * BYTES_PER_MB,
            deleted: vec![PathBuf::from("/cache/a")],
            failed: 0,
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("target_reached"));
        assert!(json.contains("/cache/a"));

        let deserialized: CleanupReport = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.outcome, CleanupOutcome::TargetReached);
        assert!(deserialized.evicted());
    }
}
