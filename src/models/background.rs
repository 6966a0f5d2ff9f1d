//! Background overrides: layers drawn beneath the face.

use serde_json::Value;

use super::region::{Region, RegionError};

/// One region or an ordered stack of regions.
///
/// Layering follows sequence order: later entries are drawn on top of
/// earlier ones, and the face is always drawn last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundEntry {
    Single(Region),
    Layers(Vec<Region>),
}

impl BackgroundEntry {
    /// Parse a background value.
    ///
    /// An array of four numbers is a single region in tuple form; any other
    /// array is a list of regions.
    pub fn from_value(value: &Value) -> Result<Self, RegionError> {
        match value {
            Value::Array(items) if items.is_empty() || !items.iter().all(Value::is_number) => items
                .iter()
                .map(Region::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(BackgroundEntry::Layers),
            _ => Region::from_value(value).map(BackgroundEntry::Single),
        }
    }

    /// Layers in draw order.
    pub fn into_layers(self) -> Vec<Region> {
        match self {
            BackgroundEntry::Single(region) => vec![region],
            BackgroundEntry::Layers(layers) => layers,
        }
    }
}
