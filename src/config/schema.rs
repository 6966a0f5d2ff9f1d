//! Configuration schema types for `pixelface.toml`
//!
//! Defines the structure and validation rules for server configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::fetch::DEFAULT_BASE_URL;
use crate::service::DEFAULT_WIDTH;

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_bind")]
    pub bind: String,
    /// TCP port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), port: default_port() }
    }
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Texture host settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Base URL that asset paths are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { base_url: default_base_url() }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Output sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacesConfig {
    /// Width used when a request omits `width`
    #[serde(default = "default_width")]
    pub default_width: u32,
    /// Largest width a request may ask for
    #[serde(default = "default_max_width")]
    pub max_width: u32,
}

impl Default for FacesConfig {
    fn default() -> Self {
        Self { default_width: default_width(), max_width: default_max_width() }
    }
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_max_width() -> u32 {
    1024
}

/// Override directory and hot reload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverridesConfig {
    /// Directory holding the override JSON files
    #[serde(default = "default_overrides_dir")]
    pub dir: PathBuf,
    /// Reload when files change
    #[serde(default = "default_true")]
    pub watch: bool,
    /// Debounce delay in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u32,
}

impl Default for OverridesConfig {
    fn default() -> Self {
        Self { dir: default_overrides_dir(), watch: true, debounce_ms: default_debounce_ms() }
    }
}

fn default_overrides_dir() -> PathBuf {
    PathBuf::from("overrides")
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u32 {
    250
}

/// Root of `pixelface.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub faces: FacesConfig,
    #[serde(default)]
    pub overrides: OverridesConfig,
}

impl FaceConfig {
    /// Check the configuration, returning every problem found.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.server.port == 0 {
            errors.push("server.port must be greater than 0".to_string());
        }
        if self.assets.base_url.trim().is_empty() {
            errors.push("assets.base_url must not be empty".to_string());
        }
        if self.faces.default_width == 0 {
            errors.push("faces.default_width must be greater than 0".to_string());
        }
        if self.faces.default_width > self.faces.max_width {
            errors.push(format!(
                "faces.default_width ({}) exceeds faces.max_width ({})",
                self.faces.default_width, self.faces.max_width
            ));
        }

        errors
    }

    /// Socket address string for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FaceConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.faces.default_width, 64);
        assert_eq!(config.overrides.dir, PathBuf::from("overrides"));
        assert!(config.overrides.watch);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FaceConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [faces]
            max_width = 512
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.faces.max_width, 512);
        assert_eq!(config.faces.default_width, 64);
        assert_eq!(config.assets.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = FaceConfig::default();
        config.server.port = 0;
        config.assets.base_url = " ".to_string();
        config.faces.default_width = 2048;

        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert!(errors[2].contains("exceeds faces.max_width"));
    }

    #[test]
    fn test_listen_addr() {
        let config = FaceConfig::default();
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    }
}
