//! Data models for face overrides (regions, snouts, backgrounds)

mod background;
mod region;
mod snout;

// Re-export all public types
pub use background::BackgroundEntry;
pub use region::{Region, RegionError};
pub use snout::{Offset, SnoutEntry};
