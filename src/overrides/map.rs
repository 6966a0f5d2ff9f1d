//! Ordered key to value override maps.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::models::{BackgroundEntry, Region, SnoutEntry};
use crate::resolve::ASSET_PATH_PREFIX;
use crate::wildcard::{self, Pattern};

/// One override file: keys (names, wildcard patterns, or `^`-prefixed
/// asset-path patterns) mapped to raw JSON values.
///
/// Iteration follows insertion order, which is the order keys appear in
/// the source file. Resolution tiers rely on it.
///
/// Wildcard keys are compiled when they enter the map, keyed by their text
/// without the `^` prefix.
#[derive(Debug, Clone, Default)]
pub struct OverrideMap {
    entries: Map<String, Value>,
    patterns: HashMap<String, Pattern>,
}

impl OverrideMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a parsed JSON object. Returns `None` for non-object values.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(entries) => Some(Self::with_entries(entries)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        self.compile_key(&key);
        self.entries.insert(key, value);
    }

    /// Match `candidate` against a key's pattern text, using the compiled
    /// form when the map holds one.
    pub fn key_matches(&self, pattern: &str, candidate: &str) -> bool {
        match self.patterns.get(pattern) {
            Some(compiled) => compiled.is_match(candidate),
            None => wildcard::matches(pattern, candidate),
        }
    }

    /// Number of compiled wildcard patterns.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn with_entries(entries: Map<String, Value>) -> Self {
        let mut map = Self { entries, patterns: HashMap::new() };
        let keys: Vec<String> = map.entries.keys().cloned().collect();
        for key in &keys {
            map.compile_key(key);
        }
        map
    }

    fn compile_key(&mut self, key: &str) {
        let text = key.strip_prefix(ASSET_PATH_PREFIX).unwrap_or(key);
        if wildcard::is_pattern(text) && !self.patterns.contains_key(text) {
            self.patterns.insert(text.to_string(), Pattern::new(text));
        }
    }
}

impl PartialEq for OverrideMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<(String, Value)> for OverrideMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::with_entries(iter.into_iter().collect())
    }
}

/// The four override maps that make up one configuration snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideSet {
    /// Name or pattern to asset-path template (`{name}` is substituted), or null
    pub asset_mappings: OverrideMap,
    /// Face regions
    pub face_regions: OverrideMap,
    /// Snout regions (bare region, tuple, or region with offset)
    pub snout_regions: OverrideMap,
    /// Background region or ordered list of regions
    pub background_regions: OverrideMap,
}

impl OverrideSet {
    /// Check every entry and describe the ones a request would reject.
    ///
    /// Malformed entries do not prevent loading; they fail only the requests
    /// that resolve to them.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for (key, value) in self.asset_mappings.iter() {
            if !(value.is_string() || value.is_null()) {
                problems.push(format!(
                    "assetMappings['{}']: expected a path template or null, found {}",
                    key, value
                ));
            }
        }
        for (key, value) in self.face_regions.iter() {
            if let Err(e) = Region::from_value(value) {
                problems.push(format!("faceRegions['{}']: {}", key, e));
            }
        }
        for (key, value) in self.snout_regions.iter() {
            if let Err(e) = SnoutEntry::from_value(value).and_then(|s| s.normalize()) {
                problems.push(format!("snoutRegions['{}']: {}", key, e));
            }
        }
        for (key, value) in self.background_regions.iter() {
            if let Err(e) = BackgroundEntry::from_value(value) {
                problems.push(format!("backgroundRegions['{}']: {}", key, e));
            }
        }

        problems
    }

    /// Entry counts for logging: (assets, faces, snouts, backgrounds).
    pub fn counts(&self) -> (usize, usize, usize, usize) {
        (
            self.asset_mappings.len(),
            self.face_regions.len(),
            self.snout_regions.len(),
            self.background_regions.len(),
        )
    }
}
