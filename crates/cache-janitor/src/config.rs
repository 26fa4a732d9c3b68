use bounded_dir_cache::{
    CacheConfig, DEFAULT_CLEAN_INTERVAL, DEFAULT_MAX_SIZE_MB, DEFAULT_TARGET_SIZE_MB,
};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Service configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct JanitorConfig {
    pub port: u16,
    pub cache_dir: PathBuf,
    pub max_size_mb: u64,
    pub target_size_mb: u64,
    pub clean_interval: Duration,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            port: 3005,
            cache_dir: PathBuf::from("./cache"),
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            target_size_mb: DEFAULT_TARGET_SIZE_MB,
            clean_interval: DEFAULT_CLEAN_INTERVAL,
        }
    }
}

impl JanitorConfig {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let cache_dir = lookup("CACHE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir);

        let max_size_mb = lookup("MAX_CACHE_SIZE_MB")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.max_size_mb);

        let target_size_mb = lookup("TARGET_CACHE_SIZE_MB")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.target_size_mb);

        // Fractional hours are allowed, e.g. 0.5 for a half-hour cadence
        let clean_interval = lookup("CLEAN_INTERVAL_HOURS")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|h| h.is_finite() && *h > 0.0)
            .map(|h| Duration::from_secs_f64(h * 3600.0))
            .unwrap_or(defaults.clean_interval);

        Self {
            port,
            cache_dir,
            max_size_mb,
            target_size_mb,
            clean_interval,
        }
    }

    /// Cache settings with the directory resolved against `cwd`
    pub fn cache_config(&self, cwd: &Path) -> CacheConfig {
        let cache_dir = if self.cache_dir.is_absolute() {
            self.cache_dir.clone()
        } else {
            cwd.join(&self.cache_dir)
        };
        CacheConfig::new(cache_dir).with_limits(self.max_size_mb, self.target_size_mb)
    }
}
