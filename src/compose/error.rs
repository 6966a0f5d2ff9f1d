//! Error types for face compositing

use thiserror::Error;

use crate::models::Region;

/// A raster operation failed while building a face.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Crop rectangle reaches past the texture edge
    #[error("region {region} exceeds texture bounds ({width}x{height})")]
    OutOfBounds { region: Region, width: u32, height: u32 },
    /// Texture bytes could not be decoded
    #[error("failed to decode texture: {0}")]
    Decode(#[source] image::ImageError),
    /// PNG encoding failed
    #[error("failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),
    /// Blocking raster task panicked or was cancelled
    #[error("raster task failed: {0}")]
    Task(String),
}
