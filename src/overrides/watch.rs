//! Hot reload of override files
//!
//! Watches the override directory with debouncing and swaps in a fresh
//! snapshot whenever one of the override files changes.

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{error, info, warn};

use super::loader::is_override_file;
use super::store::OverrideStore;

/// Error during watch setup
#[derive(Debug)]
pub enum WatchError {
    /// Failed to initialize file watcher
    WatcherInit(notify::Error),
    /// Failed to add watch path
    WatchPath(notify::Error),
    /// Override directory not found
    DirNotFound(PathBuf),
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchError::WatcherInit(e) => write!(f, "Failed to initialize file watcher: {}", e),
            WatchError::WatchPath(e) => write!(f, "Failed to watch path: {}", e),
            WatchError::DirNotFound(path) => {
                write!(f, "Override directory not found: {}", path.display())
            }
        }
    }
}

impl std::error::Error for WatchError {}

/// A running override watcher. Dropping it stops watching.
pub struct OverrideWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
}

/// Start watching `dir` and reload `store` on changes.
///
/// Reload runs on a background thread; failures are logged and the previous
/// snapshot stays active.
pub fn watch_overrides(
    store: Arc<OverrideStore>,
    dir: &Path,
    debounce: Duration,
) -> Result<OverrideWatcher, WatchError> {
    if !dir.is_dir() {
        return Err(WatchError::DirNotFound(dir.to_path_buf()));
    }

    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(debounce, tx).map_err(WatchError::WatcherInit)?;
    debouncer
        .watcher()
        .watch(dir, RecursiveMode::NonRecursive)
        .map_err(WatchError::WatchPath)?;

    let dir = dir.to_path_buf();
    info!(dir = %dir.display(), "watching overrides for changes");
    thread::spawn(move || reload_loop(&store, &dir, rx));

    Ok(OverrideWatcher { _debouncer: debouncer })
}

fn reload_loop(store: &OverrideStore, dir: &Path, rx: Receiver<DebounceEventResult>) {
    // Ends when the debouncer (and with it the sender) is dropped.
    while let Ok(result) = rx.recv() {
        match result {
            Ok(events) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| matches!(e.kind, DebouncedEventKind::Any) && is_override_file(&e.path))
                    .collect();
                if changed.is_empty() {
                    continue;
                }
                for event in &changed {
                    info!(file = %event.path.display(), "override file changed");
                }
                if let Err(e) = store.reload(dir) {
                    error!("override reload failed, keeping previous snapshot: {}", e);
                }
            }
            Err(e) => warn!("override watch error: {:?}", e),
        }
    }
}
