//! Snapshot store for the active override set.

use std::path::Path;
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use super::loader::{load_dir, OverrideError};
use super::map::OverrideSet;

/// Holds the current [`OverrideSet`] behind a single swappable reference.
///
/// Requests take one snapshot and use it throughout, so a reload that lands
/// mid-request is never observed half-applied.
#[derive(Debug, Default)]
pub struct OverrideStore {
    current: RwLock<Arc<OverrideSet>>,
}

impl OverrideStore {
    pub fn new(set: OverrideSet) -> Self {
        Self { current: RwLock::new(Arc::new(set)) }
    }

    /// Load the initial snapshot from an override directory.
    pub fn open(dir: &Path) -> Result<Self, OverrideError> {
        let set = load_dir(dir)?;
        log_loaded(&set, dir);
        Ok(Self::new(set))
    }

    /// The snapshot to use for one request.
    pub fn snapshot(&self) -> Arc<OverrideSet> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the whole set at once.
    pub fn replace(&self, set: OverrideSet) {
        let next = Arc::new(set);
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = next;
    }

    /// Re-read the override directory and swap in the result.
    ///
    /// On failure the previous snapshot stays active.
    pub fn reload(&self, dir: &Path) -> Result<(), OverrideError> {
        let set = load_dir(dir)?;
        log_loaded(&set, dir);
        self.replace(set);
        Ok(())
    }
}

fn log_loaded(set: &OverrideSet, dir: &Path) {
    let (assets, faces, snouts, backgrounds) = set.counts();
    info!(
        dir = %dir.display(),
        assets, faces, snouts, backgrounds,
        "loaded overrides"
    );
    for problem in set.validate() {
        warn!("{}", problem);
    }
}
