//! Configuration module for the pixelface server
//!
//! Provides types and parsing for `pixelface.toml`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::*;
