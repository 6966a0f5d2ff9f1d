//! Raster primitives: decode, probe, crop, nearest-neighbor resize and draw.

use image::imageops::{self, FilterType};
use image::io::Reader as ImageReader;
use image::{Pixel, RgbaImage};
use std::io::Cursor;

use super::error::ProcessingError;
use crate::models::Region;

/// Read texture dimensions from the image header without decoding pixels.
pub fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), image::ImageError> {
    ImageReader::new(Cursor::new(bytes)).with_guessed_format()?.into_dimensions()
}

/// Decode texture bytes to RGBA.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, ProcessingError> {
    image::load_from_memory(bytes).map(|img| img.to_rgba8()).map_err(ProcessingError::Decode)
}

/// Copy `region` out of `source`. Fails if the region leaves the raster.
pub fn crop(source: &RgbaImage, region: &Region) -> Result<RgbaImage, ProcessingError> {
    let (width, height) = source.dimensions();
    if !region.fits_within(width, height) {
        return Err(ProcessingError::OutOfBounds { region: *region, width, height });
    }
    Ok(imageops::crop_imm(source, region.x, region.y, region.width, region.height).to_image())
}

/// Crop `region` and resize it to `width` x `height` with nearest-neighbor
/// filtering. Zero target dimensions are clamped to one pixel.
pub fn crop_resized(
    source: &RgbaImage,
    region: &Region,
    width: u32,
    height: u32,
) -> Result<RgbaImage, ProcessingError> {
    let cropped = crop(source, region)?;
    let (width, height) = (width.max(1), height.max(1));
    if cropped.dimensions() == (width, height) {
        return Ok(cropped);
    }
    Ok(imageops::resize(&cropped, width, height, FilterType::Nearest))
}

/// Draw `region` of `source`, scaled to `width` x `height`, onto `canvas`
/// with its top-left corner at (`x`, `y`), alpha-blended.
///
/// Only destination pixels inside the canvas are sampled, so the cost is
/// bounded by the canvas size however large the scaled layer would be.
/// Sampling is nearest-neighbor.
pub fn draw_scaled(
    canvas: &mut RgbaImage,
    source: &RgbaImage,
    region: &Region,
    (width, height): (u32, u32),
    (x, y): (i64, i64),
) -> Result<(), ProcessingError> {
    let (source_width, source_height) = source.dimensions();
    if !region.fits_within(source_width, source_height) {
        return Err(ProcessingError::OutOfBounds { region: *region, width: source_width, height: source_height });
    }

    let (width, height) = (width.max(1), height.max(1));
    let (canvas_width, canvas_height) = canvas.dimensions();
    let (left, right) = (x.max(0), (x + width as i64).min(canvas_width as i64));
    let (top, bottom) = (y.max(0), (y + height as i64).min(canvas_height as i64));

    for cy in top..bottom {
        let sy = region.y + nearest(cy - y, height, region.height);
        for cx in left..right {
            let sx = region.x + nearest(cx - x, width, region.width);
            let pixel = *source.get_pixel(sx, sy);
            canvas.get_pixel_mut(cx as u32, cy as u32).blend(&pixel);
        }
    }
    Ok(())
}

/// Source index for destination `offset` when `source_len` pixels are
/// stretched over `out_len`.
fn nearest(offset: i64, out_len: u32, source_len: u32) -> u32 {
    let position = (offset as f64 + 0.5) * source_len as f64 / out_len as f64;
    (position as u32).min(source_len - 1)
}
