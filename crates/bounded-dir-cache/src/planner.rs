//! Eviction planning over the direct children of the cache root

use crate::types::TopLevelEntry;
use chrono::{DateTime, Utc};
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error};

/// List the immediate children of `root`, oldest mtime first.
///
/// Entries whose metadata cannot be read are left out. Equal mtimes keep
/// directory listing order. A root that cannot be listed yields an empty
/// plan.
pub async fn plan(root: &Path) -> Vec<TopLevelEntry> {
    let mut dir = match fs::read_dir(root).await {
        Ok(dir) => dir,
        Err(e) => {
            error!(root = ?root, error = %e, "Error listing cache entries");
            return Vec::new();
        }
    };

    let mut entries = Vec::new();
    loop {
        let entry = match dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                error!(root = ?root, error = %e, "Error listing cache entries");
                break;
            }
        };

        let modified = match entry.metadata().await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                debug!(path = ?entry.path(), error = %e, "Dropping entry without mtime");
                continue;
            }
        };

        entries.push(TopLevelEntry {
            path: entry.path(),
            modified: DateTime::<Utc>::from(modified),
        });
    }

    entries.sort_by_key(|e| e.modified);
    entries
}

impl TopLevelEntry {
    /// Remove the entry in its entirety.
    ///
    /// Real directories are removed recursively; files and symlinks are
    /// unlinked without following the link.
    pub async fn remove(&self) -> io::Result<()> {
        let meta = fs::symlink_metadata(&self.path).await?;
        if meta.is_dir() {
            fs::remove_dir_all(&self.path).await
        } else {
            fs::remove_file(&self.path).await
        }
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
