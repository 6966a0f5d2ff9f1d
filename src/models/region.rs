//! Pixel rectangles within a source texture.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Error for a region definition that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// Value is neither an object nor a 4-element array
    #[error("expected a region object or [x, y, width, height], found {found}")]
    NotARegion { found: String },
    /// Array form with the wrong number of elements
    #[error("region array must have 4 elements, found {len}")]
    WrongArity { len: usize },
    /// Object form missing one of x/y/width/height
    #[error("region is missing field '{field}'")]
    MissingField { field: &'static str },
    /// Field present but not a non-negative integer
    #[error("region field '{field}' must be a non-negative integer, found {value}")]
    InvalidField { field: &'static str, value: String },
    /// Zero-area region
    #[error("region must have a positive size, found {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    /// Offset moved the region off the top/left edge of the texture
    #[error("offset moves region origin to ({x}, {y}), outside the texture")]
    NegativeOrigin { x: i64, y: i64 },
}

/// An integer pixel rectangle in source texture coordinates.
///
/// Accepted JSON forms:
/// ```json
/// { "x": 8, "y": 8, "width": 8, "height": 8 }
/// [8, 8, 8, 8]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

const FIELDS: [&str; 4] = ["x", "y", "width", "height"];

impl Region {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Parse and validate a region from an override value.
    pub fn from_value(value: &Value) -> Result<Self, RegionError> {
        let fields = match value {
            Value::Object(map) => {
                let mut fields = [0u32; 4];
                for (slot, field) in fields.iter_mut().zip(FIELDS) {
                    let raw = map.get(field).ok_or(RegionError::MissingField { field })?;
                    *slot = parse_field(field, raw)?;
                }
                fields
            }
            Value::Array(items) => {
                if items.len() != 4 {
                    return Err(RegionError::WrongArity { len: items.len() });
                }
                let mut fields = [0u32; 4];
                for ((slot, field), raw) in fields.iter_mut().zip(FIELDS).zip(items) {
                    *slot = parse_field(field, raw)?;
                }
                fields
            }
            other => return Err(RegionError::NotARegion { found: describe(other) }),
        };

        let region = Region::new(fields[0], fields[1], fields[2], fields[3]);
        region.validate()?;
        Ok(region)
    }

    /// Reject zero-area regions.
    pub fn validate(&self) -> Result<(), RegionError> {
        if self.width == 0 || self.height == 0 {
            return Err(RegionError::ZeroSize { width: self.width, height: self.height });
        }
        Ok(())
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Whether the region lies entirely inside a `width` x `height` raster.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }

    /// Shift the origin by a signed offset.
    pub fn offset_by(&self, dx: i64, dy: i64) -> Result<Self, RegionError> {
        let x = self.x as i64 + dx;
        let y = self.y as i64 + dy;
        if x < 0 || y < 0 || x > u32::MAX as i64 || y > u32::MAX as i64 {
            return Err(RegionError::NegativeOrigin { x, y });
        }
        Ok(Region { x: x as u32, y: y as u32, ..*self })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

fn parse_field(field: &'static str, raw: &Value) -> Result<u32, RegionError> {
    raw.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| RegionError::InvalidField { field, value: raw.to_string() })
}

/// Short description of a JSON value for error messages.
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string \"{}\"", s),
        Value::Array(items) => format!("an array of {} elements", items.len()),
        Value::Object(_) => "an object".to_string(),
    }
}
