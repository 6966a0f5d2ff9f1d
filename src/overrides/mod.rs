//! Override configuration: the four name/pattern keyed maps that steer
//! asset lookup and region selection, plus loading and hot reload.

pub mod loader;
mod map;
mod store;
pub mod watch;

pub use loader::{load_dir, OverrideError};
pub use map::{OverrideMap, OverrideSet};
pub use store::OverrideStore;
pub use watch::{watch_overrides, OverrideWatcher, WatchError};
