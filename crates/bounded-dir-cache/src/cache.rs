//! Guarded cleanup of a size-bounded cache directory

use crate::error::{CacheError, Result};
use crate::planner;
use crate::probe;
use crate::types::{CacheConfig, CacheStats, CleanupOutcome, CleanupReport, BYTES_PER_MB};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// A directory whose total size is kept under a ceiling
pub struct CacheDirectory {
    root: PathBuf,
    max_size: u64,
    target_size: u64,
    config: CacheConfig,
    /// Held for the whole of a cleanup cycle
    guard: Mutex<()>,
    pub(crate) auto_cleaner_running: AtomicBool,
    cycles: AtomicU64,
    evicting_cycles: AtomicU64,
    entries_deleted: AtomicU64,
    delete_failures: AtomicU64,
    last_report: RwLock<Option<CleanupReport>>,
    #[cfg(test)]
    pub(crate) hooks: TestHooks,
}

/// Injection points for exercising failure and race paths
#[cfg(test)]
#[derive(Default)]
pub(crate) struct TestHooks {
    pub(crate) panic_next_cycle: AtomicBool,
    pub(crate) after_delete: std::sync::Mutex<Option<Box<dyn FnMut(&Path) + Send>>>,
}

#[cfg(test)]
impl TestHooks {
    pub(crate) fn on_delete(&self, hook: impl FnMut(&Path) + Send + 'static) {
        let hook: Box<dyn FnMut(&Path) + Send> = Box::new(hook);
        *self.after_delete.lock().unwrap() = Some(hook);
    }

    fn before_cycle(&self) {
        if self.panic_next_cycle.swap(false, Ordering::AcqRel) {
            panic!("injected cleanup failure");
        }
    }

    fn after_delete(&self, path: &Path) {
        if let Some(hook) = self.after_delete.lock().unwrap().as_mut() {
            hook(path);
        }
    }
}

impl CacheDirectory {
    /// Create a cache directory governor, validating the configuration
    pub fn new(config: CacheConfig) -> Result<Self> {
        if !config.cache_dir.is_absolute() {
            return Err(CacheError::Config(format!(
                "cache_dir must be absolute: {}",
                config.cache_dir.display()
            )));
        }
        if config.target_size_mb > config.max_size_mb {
            return Err(CacheError::Config(format!(
                "target_size_mb ({}) exceeds max_size_mb ({})",
                config.target_size_mb, config.max_size_mb
            )));
        }

        Ok(Self {
            root: config.cache_dir.clone(),
            max_size: config.max_size_mb.saturating_mul(BYTES_PER_MB),
            target_size: config.target_size_mb.saturating_mul(BYTES_PER_MB),
            config,
            guard: Mutex::new(()),
            auto_cleaner_running: AtomicBool::new(false),
            cycles: AtomicU64::new(0),
            evicting_cycles: AtomicU64::new(0),
            entries_deleted: AtomicU64::new(0),
            delete_failures: AtomicU64::new(0),
            last_report: RwLock::new(None),
            #[cfg(test)]
            hooks: TestHooks::default(),
        })
    }

    /// Ensure the cache root exists
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        info!(cache_dir = ?self.root, "Cache initialized");
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn is_auto_cleaner_running(&self) -> bool {
        self.auto_cleaner_running.load(Ordering::Acquire)
    }

    pub async fn current_size_bytes(&self) -> u64 {
        probe::measure(&self.root).await
    }

    /// Current measured size in megabytes
    pub async fn current_size_mb(&self) -> f64 {
        mb(self.current_size_bytes().await)
    }

    /// Run one guarded cleanup cycle.
    ///
    /// Cycles never overlap: a caller arriving while another cycle runs waits
    /// for it and then performs its own measurement.
    pub async fn clean_if_needed(&self) -> CleanupReport {
        let _guard = self.guard.lock().await;
        #[cfg(test)]
        self.hooks.before_cycle();
        let started_at = Utc::now();

        let size_before = probe::measure(&self.root).await;
        info!(
            cache_dir = ?self.root,
            size_mb = mb(size_before),
            limit_mb = self.config.max_size_mb,
            "Checking cache"
        );

        let report = if size_before <= self.max_size {
            info!("Size within limits, no action needed");
            CleanupReport {
                started_at,
                outcome: CleanupOutcome::WithinLimit,
                size_before,
                size_after: size_before,
                deleted: Vec::new(),
                failed: 0,
            }
        } else {
            info!("Limit exceeded, starting cleanup");
            self.evict_oldest(started_at, size_before).await
        };

        self.record(&report);
        report
    }

    /// Delete oldest entries until a fresh measurement reads below target
    async fn evict_oldest(
        &self,
        started_at: chrono::DateTime<Utc>,
        size_before: u64,
    ) -> CleanupReport {
        let candidates = planner::plan(&self.root).await;
        let mut outcome = CleanupOutcome::PlanExhausted;
        let mut deleted = Vec::new();
        let mut failed = 0usize;

        for entry in candidates {
            // Re-measured each time so concurrent writers are accounted for
            let current = probe::measure(&self.root).await;
            if current < self.target_size {
                info!(
                    target_mb = self.config.target_size_mb,
                    "Target size reached, stopping cleanup"
                );
                outcome = CleanupOutcome::TargetReached;
                break;
            }

            match entry.remove().await {
                Ok(()) => {
                    info!(
                        entry = %entry.name(),
                        modified = %entry.modified,
                        "Deleted cache entry"
                    );
                    #[cfg(test)]
                    self.hooks.after_delete(&entry.path);
                    deleted.push(entry.path);
                }
                Err(e) => {
                    warn!(entry = %entry.name(), error = %e, "Failed to delete cache entry");
                    failed += 1;
                }
            }
        }

        let size_after = probe::measure(&self.root).await;
        if outcome == CleanupOutcome::PlanExhausted && size_after >= self.target_size {
            warn!(
                size_mb = mb(size_after),
                target_mb = self.config.target_size_mb,
                "Eviction plan exhausted above target"
            );
        }
        info!(
            size_mb = mb(size_after),
            deleted = deleted.len(),
            failed,
            "Cleanup finished"
        );

        CleanupReport {
            started_at,
            outcome,
            size_before,
            size_after,
            deleted,
            failed,
        }
    }

    fn record(&self, report: &CleanupReport) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        if report.evicted() {
            self.evicting_cycles.fetch_add(1, Ordering::Relaxed);
        }
        self.entries_deleted
            .fetch_add(report.deleted.len() as u64, Ordering::Relaxed);
        self.delete_failures
            .fetch_add(report.failed as u64, Ordering::Relaxed);

        match self.last_report.write() {
            Ok(mut last) => *last = Some(report.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(report.clone()),
        }
        debug!(outcome = ?report.outcome, "Recorded cleanup cycle");
    }

    /// Get current cache statistics
    pub async fn stats(&self) -> CacheStats {
        let size_bytes = self.current_size_bytes().await;
        let last_cleanup = match self.last_report.read() {
            Ok(last) => last.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        CacheStats {
            cache_dir: self.root.clone(),
            max_size_mb: self.config.max_size_mb,
            target_size_mb: self.config.target_size_mb,
            size_bytes,
            size_mb: mb(size_bytes),
            cycles: self.cycles.load(Ordering::Relaxed),
            evicting_cycles: self.evicting_cycles.load(Ordering::Relaxed),
            entries_deleted: self.entries_deleted.load(Ordering::Relaxed),
            delete_failures: self.delete_failures.load(Ordering::Relaxed),
            last_cleanup,
        }
    }
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB as f64
}
