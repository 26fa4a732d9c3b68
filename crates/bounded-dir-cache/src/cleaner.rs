//! Periodic background cleanup

use crate::cache::CacheDirectory;
use crate::error::{CacheError, Result};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Stop handle for a running auto-cleaner.
///
/// Dropping the handle also stops the loop once the current sleep or cycle
/// finishes.
#[must_use = "dropping the handle stops the auto-cleaner"]
pub struct AutoCleanerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl AutoCleanerHandle {
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the loop to stop and wait for it to exit.
    ///
    /// A cycle already in progress runs to completion first.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            error!(error = %e, "Auto-cleaner task failed");
        }
    }
}

impl CacheDirectory {
    /// Spawn a background loop that sleeps for `interval` and then runs a
    /// guarded cleanup cycle, forever until stopped.
    ///
    /// Only one loop may run per cache directory; a second start while one is
    /// live is rejected.
    pub fn start_auto_cleaner(self: &Arc<Self>, interval: Duration) -> Result<AutoCleanerHandle> {
        if interval.is_zero() {
            return Err(CacheError::Config(
                "auto-cleaner interval must be non-zero".to_string(),
            ));
        }
        if self
            .auto_cleaner_running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(CacheError::AutoCleanerRunning);
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let flag = RunningFlag(self.clone());
        let task = tokio::spawn(run_loop(flag, interval, stop_rx));
        info!(
            cache_dir = ?self.root(),
            interval_secs = interval.as_secs(),
            "Auto-cleaner started"
        );

        Ok(AutoCleanerHandle { stop_tx, task })
    }
}

/// Clears the running flag however the loop ends, including when the
/// runtime drops the task before or during a cycle.
struct RunningFlag(Arc<CacheDirectory>);

impl Drop for RunningFlag {
    fn drop(&mut self) {
        self.0.auto_cleaner_running.store(false, Ordering::Release);
    }
}

async fn run_loop(flag: RunningFlag, interval: Duration, mut stop_rx: watch::Receiver<bool>) {
    let cache = &flag.0;
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            // Fires on an explicit stop and when the handle is dropped
            _ = stop_rx.changed() => break,
        }

        match AssertUnwindSafe(cache.clean_if_needed()).catch_unwind().await {
            Ok(report) => debug!(outcome = ?report.outcome, "Auto-cleaner cycle complete"),
            Err(_) => error!("Auto-cleaner loop error: cleanup cycle panicked"),
        }
    }

    info!(cache_dir = ?cache.root(), "Auto-cleaner stopped");
}
