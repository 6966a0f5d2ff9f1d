//! Configuration loading and discovery for `pixelface.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::FaceConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for when no explicit path is given.
pub const CONFIG_FILE: &str = "pixelface.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse pixelface.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override listen port
    pub port: Option<u16>,
    /// Override bind address
    pub bind: Option<String>,
    /// Override override-file directory
    pub overrides_dir: Option<PathBuf>,
    /// Disable hot reload
    pub no_watch: bool,
    /// Override texture host
    pub base_url: Option<String>,
}

/// Find pixelface.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Find pixelface.toml starting at the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// `find_config()`; with no file found, defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<FaceConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(FaceConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<FaceConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: FaceConfig = toml::from_str(&contents)?;
    check(&config)?;
    Ok(config)
}

/// Apply the `PORT` environment variable, if set and numeric.
pub fn apply_env(config: &mut FaceConfig) {
    if let Some(port) = env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
        config.server.port = port;
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file and environment values.
pub fn merge_cli_overrides(config: &mut FaceConfig, overrides: &CliOverrides) {
    if let Some(port) = overrides.port {
        config.server.port = port;
    }

    if let Some(ref bind) = overrides.bind {
        config.server.bind = bind.clone();
    }

    if let Some(ref dir) = overrides.overrides_dir {
        config.overrides.dir = dir.clone();
    }

    if overrides.no_watch {
        config.overrides.watch = false;
    }

    if let Some(ref base_url) = overrides.base_url {
        config.assets.base_url = base_url.clone();
    }
}

/// Validate a fully merged configuration.
pub fn check(config: &FaceConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();

        let found = find_config_from(nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[server]\nport = 9000\n\n[overrides]\nwatch = false\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(!config.overrides.watch);
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[server\nport = ").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_fails_validation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[faces]\ndefault_width = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().contains("default_width"));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = FaceConfig::default();
        let overrides = CliOverrides {
            port: Some(4000),
            overrides_dir: Some(PathBuf::from("/etc/pixelface/overrides")),
            no_watch: true,
            ..Default::default()
        };
        merge_cli_overrides(&mut config, &overrides);

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.bind, "0.0.0.0");
        assert_eq!(config.overrides.dir, PathBuf::from("/etc/pixelface/overrides"));
        assert!(!config.overrides.watch);
    }
}
