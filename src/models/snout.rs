//! Snout overrides: a secondary region drawn over the bottom of the face.

use serde_json::Value;

use super::region::{describe, Region, RegionError};

/// Signed adjustment applied to a snout region's origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offset {
    pub x: i64,
    pub y: i64,
}

/// A snout override as written in `snoutRegions.json`.
///
/// Three shapes are accepted:
/// ```json
/// { "x": 4, "y": 14, "width": 3, "height": 3 }
/// [4, 14, 3, 3]
/// { "region": [4, 14, 3, 3], "offset": { "x": 0, "y": 1 } }
/// ```
/// The first two are the older forms and behave like the third with a
/// zero offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnoutEntry {
    /// Bare region, object or tuple form
    Bare(Region),
    /// Region with an optional origin offset
    Placed { region: Region, offset: Option<Offset> },
}

impl SnoutEntry {
    pub fn from_value(value: &Value) -> Result<Self, RegionError> {
        match value {
            Value::Object(map) if map.contains_key("region") => {
                let region = Region::from_value(&map["region"])?;
                let offset = match map.get("offset") {
                    None | Some(Value::Null) => None,
                    Some(raw) => Some(parse_offset(raw)?),
                };
                Ok(SnoutEntry::Placed { region, offset })
            }
            _ => Region::from_value(value).map(SnoutEntry::Bare),
        }
    }

    /// Canonical region with any offset already applied.
    pub fn normalize(&self) -> Result<Region, RegionError> {
        match self {
            SnoutEntry::Bare(region) => Ok(*region),
            SnoutEntry::Placed { region, offset: None } => Ok(*region),
            SnoutEntry::Placed { region, offset: Some(offset) } => {
                region.offset_by(offset.x, offset.y)
            }
        }
    }
}

fn parse_offset(raw: &Value) -> Result<Offset, RegionError> {
    let map = match raw {
        Value::Object(map) => map,
        other => return Err(RegionError::NotARegion { found: describe(other) }),
    };
    let axis = |field: &'static str| -> Result<i64, RegionError> {
        match map.get(field) {
            None => Ok(0),
            Some(v) => {
                v.as_i64().ok_or_else(|| RegionError::InvalidField { field, value: v.to_string() })
            }
        }
    };
    Ok(Offset { x: axis("x")?, y: axis("y")? })
}
