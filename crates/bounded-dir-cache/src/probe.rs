//! Directory size measurement
//!
//! Always a fresh walk of the tree; nothing is cached between calls.

use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error};
use walkdir::WalkDir;

/// Sum the sizes of all regular files under `root`.
///
/// A missing root measures 0. Files or nested directories that vanish or
/// cannot be read mid-walk contribute nothing. If the root itself cannot be
/// walked the failure is logged and 0 is returned, so an unreadable cache
/// never looks bigger than it is.
pub async fn measure(root: &Path) -> u64 {
    let root = root.to_path_buf();
    match tokio::task::spawn_blocking(move || dir_size_bytes_nofollow(&root)).await {
        Ok(total) => total,
        Err(e) => {
            error!(error = %e, "Cache size walk did not complete");
            0
        }
    }
}

fn dir_size_bytes_nofollow(root: &Path) -> u64 {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            error!(root = ?root, "Cache root is not a directory");
            return 0;
        }
        Err(e) if e.kind() == ErrorKind::NotFound => return 0,
        Err(e) => {
            error!(root = ?root, error = %e, "Failed to stat cache root");
            return 0;
        }
    }

    let mut total = 0u64;
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                error!(root = ?root, error = %err, "Error calculating cache size");
                return 0;
            }
            Err(err) => {
                // Entries can race with eviction or external writers
                let vanished = err
                    .io_error()
                    .is_some_and(|e| e.kind() == ErrorKind::NotFound);
                if !vanished {
                    debug!(path = ?err.path(), error = %err, "Skipping unreadable entry");
                }
                continue;
            }
        };

        // Symlinks are neither followed nor counted
        if !entry.file_type().is_file() {
            continue;
        }

        match entry.metadata() {
            Ok(meta) => total = total.saturating_add(meta.len()),
            Err(err) => debug!(path = ?entry.path(), error = %err, "Skipping file size"),
        }
    }

    total
}
