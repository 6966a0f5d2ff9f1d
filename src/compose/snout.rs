//! Face with a snout drawn over its bottom edge.

use image::RgbaImage;

use super::error::ProcessingError;
use super::plain::crop_face;
use super::raster::{crop_resized, draw_scaled};
use super::registry::{ComposeMode, FaceComposer};
use crate::models::Region;
use crate::resolve::ResolvedRegions;
use crate::scale::{scale_factor, scaled, snap};

/// Build a face with the snout layered on top.
///
/// `out_width` is snapped to a multiple of the face width first. The snout is
/// scaled by the same factor as the face, centered horizontally and aligned
/// to the bottom edge.
pub fn crop_face_with_snout(
    raster: &RgbaImage,
    out_width: u32,
    face: &Region,
    snout: &Region,
) -> Result<RgbaImage, ProcessingError> {
    let out_width = snap(out_width, face.width);
    let scale = scale_factor(out_width, face.width);
    let out_height = scaled(face.height, scale);

    let mut canvas = crop_resized(raster, face, out_width, out_height)?;

    let snout_width = scaled(snout.width, scale).max(1);
    let snout_height = scaled(snout.height, scale).max(1);
    let left = ((out_width as f64 - snout_width as f64) / 2.0).round() as i64;
    let top = out_height as i64 - snout_height as i64;
    draw_scaled(&mut canvas, raster, snout, (snout_width, snout_height), (left, top))?;

    Ok(canvas)
}

/// Composer for faces with a snout override.
#[derive(Debug, Default, Clone, Copy)]
pub struct SnoutComposer;

impl FaceComposer for SnoutComposer {
    fn mode(&self) -> ComposeMode {
        ComposeMode::Snout
    }

    fn compose(
        &self,
        raster: &RgbaImage,
        out_width: u32,
        regions: &ResolvedRegions,
    ) -> Result<RgbaImage, ProcessingError> {
        match &regions.snout {
            Some(snout) => crop_face_with_snout(raster, out_width, &regions.face, snout),
            None => crop_face(raster, out_width, &regions.face),
        }
    }
}
