//! Name to asset path and region resolution
//!
//! Region lookups run three tiers, first match wins:
//!
//! | Tier | Key form | Matched against |
//! |------|----------|-----------------|
//! | 1 | exact name | name |
//! | 2 | `^pattern` | resolved asset path |
//! | 3 | `pattern` with `*` | name |
//!
//! Within a tier, keys are tried in file order. Asset mappings use tiers 1
//! and 3 only.

use serde_json::Value;
use thiserror::Error;

use crate::models::{BackgroundEntry, Region, RegionError, SnoutEntry};
use crate::overrides::{OverrideMap, OverrideSet};
use crate::wildcard;

/// Prefix marking a key that matches the asset path instead of the name.
pub const ASSET_PATH_PREFIX: char = '^';

/// Token substituted with the requested name in asset-path templates.
pub const NAME_TOKEN: &str = "{name}";

/// A malformed override entry reached during resolution.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    /// Asset mapping value is neither a string nor null
    #[error("asset mapping '{key}' must be a path template or null, found {found}")]
    AssetMapping { key: String, found: String },
    /// Region-shaped entry failed to parse
    #[error("{map} entry '{key}': {source}")]
    Region {
        map: &'static str,
        key: String,
        #[source]
        source: RegionError,
    },
}

/// Everything the compositor needs for one face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRegions {
    pub face: Region,
    pub snout: Option<Region>,
    pub background: Option<Vec<Region>>,
}

/// Resolve the asset path for `name`.
///
/// Returns `Ok(None)` when the mapping is explicitly `null`, meaning the mob
/// has no usable texture. Without any mapping the default is `name/name`.
pub fn resolve_asset_path(name: &str, assets: &OverrideMap) -> Result<Option<String>, EntryError> {
    let hit = assets.get(name).map(|v| (name, v)).or_else(|| {
        assets
            .iter()
            .filter(|(key, _)| !key.starts_with(ASSET_PATH_PREFIX) && wildcard::is_pattern(key))
            .find(|(key, _)| assets.key_matches(key, name))
            .map(|(key, value)| (key.as_str(), value))
    });

    match hit {
        None => Ok(Some(format!("{}/{}", name, name))),
        Some((_, Value::Null)) => Ok(None),
        Some((_, Value::String(template))) => Ok(Some(template.replace(NAME_TOKEN, name))),
        Some((key, other)) => {
            Err(EntryError::AssetMapping { key: key.to_string(), found: other.to_string() })
        }
    }
}

/// Find the entry for `name` in a region-style map using the three tiers.
pub fn find_entry<'a>(
    name: &str,
    map: &'a OverrideMap,
    asset_path: &str,
) -> Option<(&'a str, &'a Value)> {
    if let Some((key, value)) = map.iter().find(|(key, _)| key.as_str() == name) {
        return Some((key.as_str(), value));
    }

    let by_asset_path = map.iter().find(|(key, _)| {
        key.strip_prefix(ASSET_PATH_PREFIX)
            .map(|pattern| map.key_matches(pattern, asset_path))
            .unwrap_or(false)
    });
    if let Some((key, value)) = by_asset_path {
        return Some((key.as_str(), value));
    }

    map.iter()
        .filter(|(key, _)| !key.starts_with(ASSET_PATH_PREFIX))
        .find(|(key, _)| map.key_matches(key, name))
        .map(|(key, value)| (key.as_str(), value))
}

/// Resolve a face region, or `None` if no key applies.
pub fn resolve_region(
    name: &str,
    map: &OverrideMap,
    asset_path: &str,
) -> Result<Option<Region>, EntryError> {
    find_entry(name, map, asset_path)
        .map(|(key, value)| Region::from_value(value).map_err(|e| entry_error("faceRegions", key, e)))
        .transpose()
}

/// Resolve a snout region with its offset applied.
pub fn resolve_snout(
    name: &str,
    map: &OverrideMap,
    asset_path: &str,
) -> Result<Option<Region>, EntryError> {
    find_entry(name, map, asset_path)
        .map(|(key, value)| {
            SnoutEntry::from_value(value)
                .and_then(|entry| entry.normalize())
                .map_err(|e| entry_error("snoutRegions", key, e))
        })
        .transpose()
}

/// Resolve background layers in draw order. An empty list counts as none.
pub fn resolve_background(
    name: &str,
    map: &OverrideMap,
    asset_path: &str,
) -> Result<Option<Vec<Region>>, EntryError> {
    let layers = find_entry(name, map, asset_path)
        .map(|(key, value)| {
            BackgroundEntry::from_value(value)
                .map(BackgroundEntry::into_layers)
                .map_err(|e| entry_error("backgroundRegions", key, e))
        })
        .transpose()?;
    Ok(layers.filter(|layers| !layers.is_empty()))
}

/// Face region used when no override matches, chosen by texture size.
pub fn default_face_region(width: u32, height: u32) -> Region {
    match (width, height) {
        (64, 64) => Region::new(8, 8, 8, 8),
        (128, 64) => Region::new(7, 7, 7, 7),
        (32, 32) => Region::new(5, 5, 5, 5),
        _ => Region::new(8, 8, 8, 8),
    }
}

/// Resolve face, snout and background for a texture of the given size.
///
/// The snout map is only consulted when no background applies, so a snout
/// entry never affects a background face.
pub fn resolve_regions(
    name: &str,
    overrides: &OverrideSet,
    asset_path: &str,
    texture_size: (u32, u32),
) -> Result<ResolvedRegions, EntryError> {
    let face = resolve_region(name, &overrides.face_regions, asset_path)?
        .unwrap_or_else(|| default_face_region(texture_size.0, texture_size.1));
    let background = resolve_background(name, &overrides.background_regions, asset_path)?;
    let snout = match background {
        Some(_) => None,
        None => resolve_snout(name, &overrides.snout_regions, asset_path)?,
    };
    Ok(ResolvedRegions { face, snout, background })
}

fn entry_error(map: &'static str, key: &str, source: RegionError) -> EntryError {
    EntryError::Region { map, key: key.to_string(), source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(pairs: &[(&str, Value)]) -> OverrideMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_asset_path_default() {
        let assets = OverrideMap::new();
        assert_eq!(resolve_asset_path("cow", &assets).unwrap(), Some("cow/cow".to_string()));
    }

    #[test]
    fn test_asset_path_exact_with_name_token() {
        let assets = map(&[("cat", json!("cat/{name}_tabby"))]);
        assert_eq!(resolve_asset_path("cat", &assets).unwrap(), Some("cat/cat_tabby".to_string()));
    }

    #[test]
    fn test_asset_path_exact_beats_pattern() {
        let assets = map(&[("*_fox", json!("fox/{name}")), ("snow_fox", json!("fox/snow"))]);
        assert_eq!(resolve_asset_path("snow_fox", &assets).unwrap(), Some("fox/snow".to_string()));
        assert_eq!(resolve_asset_path("red_fox", &assets).unwrap(), Some("fox/red_fox".to_string()));
    }

    #[test]
    fn test_asset_path_first_pattern_wins() {
        let assets = map(&[("*zombie*", json!("zombie/{name}")), ("baby_*", json!("baby/{name}"))]);
        assert_eq!(
            resolve_asset_path("baby_zombie", &assets).unwrap(),
            Some("zombie/baby_zombie".to_string())
        );
    }

    #[test]
    fn test_asset_path_null_disables() {
        let assets = map(&[("ender_dragon", Value::Null), ("*_ghost", Value::Null)]);
        assert_eq!(resolve_asset_path("ender_dragon", &assets).unwrap(), None);
        assert_eq!(resolve_asset_path("pale_ghost", &assets).unwrap(), None);
    }

    #[test]
    fn test_asset_path_ignores_caret_keys() {
        let assets = map(&[("^*", json!("never/{name}"))]);
        assert_eq!(resolve_asset_path("cow", &assets).unwrap(), Some("cow/cow".to_string()));
    }

    #[test]
    fn test_asset_path_bad_value() {
        let assets = map(&[("cow", json!(12))]);
        assert!(matches!(resolve_asset_path("cow", &assets), Err(EntryError::AssetMapping { .. })));
    }

    #[test]
    fn test_region_exact_beats_wildcard() {
        let faces = map(&[("*zombie*", json!([1, 1, 1, 1])), ("baby_zombie", json!([2, 2, 2, 2]))]);
        let region = resolve_region("baby_zombie", &faces, "zombie/baby_zombie").unwrap();
        assert_eq!(region, Some(Region::new(2, 2, 2, 2)));
    }

    #[test]
    fn test_region_asset_path_tier_beats_name_pattern() {
        let faces = map(&[("*cat*", json!([1, 1, 1, 1])), ("^cat/*", json!([3, 3, 3, 3]))]);
        let region = resolve_region("black_cat", &faces, "cat/black").unwrap();
        assert_eq!(region, Some(Region::new(3, 3, 3, 3)));
    }

    #[test]
    fn test_region_caret_never_matches_name() {
        let faces = map(&[("^cow", json!([3, 3, 3, 3]))]);
        assert_eq!(resolve_region("cow", &faces, "cow/cow").unwrap(), None);
        assert_eq!(resolve_region("mooshroom", &faces, "cow").unwrap(), Some(Region::new(3, 3, 3, 3)));
    }

    #[test]
    fn test_region_plain_key_needs_exact_match() {
        let faces = map(&[("zombie", json!([3, 3, 3, 3]))]);
        assert_eq!(resolve_region("zombie_villager", &faces, "zombie_villager/zombie_villager").unwrap(), None);
    }

    #[test]
    fn test_region_malformed_is_error() {
        let faces = map(&[("cow", json!({"x": 8, "y": 8, "width": "wide", "height": 8}))]);
        let err = resolve_region("cow", &faces, "cow/cow").unwrap_err();
        assert!(matches!(err, EntryError::Region { map: "faceRegions", .. }));
    }

    #[test]
    fn test_snout_offset_normalized() {
        let snouts = map(&[("wolf*", json!({"region": [4, 14, 3, 3], "offset": {"x": 0, "y": 1}}))]);
        let snout = resolve_snout("wolf_angry", &snouts, "wolf/wolf_angry").unwrap();
        assert_eq!(snout, Some(Region::new(4, 15, 3, 3)));
    }

    #[test]
    fn test_background_single_and_empty() {
        let backgrounds = map(&[("bee", json!([0, 0, 4, 4])), ("moth", json!([]))]);
        assert_eq!(
            resolve_background("bee", &backgrounds, "bee/bee").unwrap(),
            Some(vec![Region::new(0, 0, 4, 4)])
        );
        assert_eq!(resolve_background("moth", &backgrounds, "moth/moth").unwrap(), None);
        assert_eq!(resolve_background("ant", &backgrounds, "ant/ant").unwrap(), None);
    }

    #[test]
    fn test_default_face_region_by_size() {
        assert_eq!(default_face_region(64, 64), Region::new(8, 8, 8, 8));
        assert_eq!(default_face_region(128, 64), Region::new(7, 7, 7, 7));
        assert_eq!(default_face_region(32, 32), Region::new(5, 5, 5, 5));
        assert_eq!(default_face_region(64, 32), Region::new(8, 8, 8, 8));
    }

    #[test]
    fn test_resolve_regions_uses_default_face() {
        let mut overrides = OverrideSet::default();
        overrides.snout_regions.insert("cat", json!([2, 26, 3, 2]));
        let resolved = resolve_regions("cat", &overrides, "cat/cat", (32, 32)).unwrap();
        assert_eq!(resolved.face, Region::new(5, 5, 5, 5));
        assert_eq!(resolved.snout, Some(Region::new(2, 26, 3, 2)));
        assert_eq!(resolved.background, None);
    }

    #[test]
    fn test_background_skips_snout_lookup() {
        let mut overrides = OverrideSet::default();
        overrides.background_regions.insert("bee", json!([[4, 4, 16, 16]]));
        overrides.snout_regions.insert("*", json!("broken"));

        let resolved = resolve_regions("bee", &overrides, "bee/bee", (64, 64)).unwrap();
        assert_eq!(resolved.background, Some(vec![Region::new(4, 4, 16, 16)]));
        assert_eq!(resolved.snout, None);

        let err = resolve_regions("cow", &overrides, "cow/cow", (64, 64)).unwrap_err();
        assert!(matches!(err, EntryError::Region { map: "snoutRegions", .. }));
    }
}
