//! Reading override files from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use super::map::{OverrideMap, OverrideSet};

pub const ASSET_MAPPINGS_FILE: &str = "assetMappings.json";
pub const FACE_REGIONS_FILE: &str = "faceRegions.json";
pub const SNOUT_REGIONS_FILE: &str = "snoutRegions.json";
pub const BACKGROUND_REGIONS_FILE: &str = "backgroundRegions.json";

/// All override file names, in load order.
pub const OVERRIDE_FILES: [&str; 4] =
    [ASSET_MAPPINGS_FILE, FACE_REGIONS_FILE, SNOUT_REGIONS_FILE, BACKGROUND_REGIONS_FILE];

/// Override loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OverrideError {
    /// File exists but could not be read
    #[error("Failed to read {}: {source}", file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: io::Error,
    },
    /// File is not valid JSON
    #[error("Failed to parse {}: {source}", file.display())]
    Parse {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Top-level JSON value is not an object
    #[error("{} must contain a JSON object", file.display())]
    NotAnObject { file: PathBuf },
}

/// Load all four override maps from `dir`.
///
/// A missing file is an empty map. Any other failure aborts the whole load
/// so that a reload never produces a partially updated set.
pub fn load_dir(dir: &Path) -> Result<OverrideSet, OverrideError> {
    Ok(OverrideSet {
        asset_mappings: load_file(&dir.join(ASSET_MAPPINGS_FILE))?,
        face_regions: load_file(&dir.join(FACE_REGIONS_FILE))?,
        snout_regions: load_file(&dir.join(SNOUT_REGIONS_FILE))?,
        background_regions: load_file(&dir.join(BACKGROUND_REGIONS_FILE))?,
    })
}

/// Load a single override file.
pub fn load_file(path: &Path) -> Result<OverrideMap, OverrideError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(file = %path.display(), "override file not found, using empty map");
            return Ok(OverrideMap::new());
        }
        Err(source) => return Err(OverrideError::Io { file: path.to_path_buf(), source }),
    };

    let value: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|source| OverrideError::Parse { file: path.to_path_buf(), source })?;

    OverrideMap::from_json(value).ok_or_else(|| OverrideError::NotAnObject { file: path.to_path_buf() })
}

/// Whether a changed path is one of the override files.
pub fn is_override_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| OVERRIDE_FILES.contains(&n))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_dir_all_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(ASSET_MAPPINGS_FILE), r#"{"ghast": null, "*_cat": "cat/{name}"}"#).unwrap();
        fs::write(dir.path().join(FACE_REGIONS_FILE), r#"{"cat": [5, 5, 5, 4]}"#).unwrap();
        fs::write(dir.path().join(SNOUT_REGIONS_FILE), r#"{"cat": [2, 26, 3, 2]}"#).unwrap();
        fs::write(dir.path().join(BACKGROUND_REGIONS_FILE), r#"{"bee": [[0, 0, 4, 4]]}"#).unwrap();

        let set = load_dir(dir.path()).unwrap();
        assert_eq!(set.counts(), (2, 1, 1, 1));
        assert!(set.asset_mappings.get("ghast").unwrap().is_null());
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = tempdir().unwrap();
        let set = load_dir(dir.path()).unwrap();
        assert_eq!(set, OverrideSet::default());
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(FACE_REGIONS_FILE), "{").unwrap();
        let err = load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, OverrideError::Parse { .. }));
        assert!(err.to_string().contains(FACE_REGIONS_FILE));
    }

    #[test]
    fn test_non_object_top_level() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SNOUT_REGIONS_FILE), "[1, 2, 3]").unwrap();
        assert!(matches!(load_dir(dir.path()), Err(OverrideError::NotAnObject { .. })));
    }

    #[test]
    fn test_is_override_file() {
        assert!(is_override_file(Path::new("/srv/overrides/faceRegions.json")));
        assert!(!is_override_file(Path::new("/srv/overrides/notes.json")));
        assert!(!is_override_file(Path::new("/srv/overrides/")));
    }
}
