//! Plain face crop.

use image::RgbaImage;

use super::error::ProcessingError;
use super::raster::crop_resized;
use super::registry::{ComposeMode, FaceComposer};
use crate::models::Region;
use crate::resolve::ResolvedRegions;
use crate::scale::{scale_factor, scaled};

/// Crop `region` and scale it so its width becomes `out_width`.
///
/// Height scales by the same factor, so the region's aspect ratio is kept.
/// The width is used as given; no snapping happens in this mode.
pub fn crop_face(
    raster: &RgbaImage,
    out_width: u32,
    region: &Region,
) -> Result<RgbaImage, ProcessingError> {
    let scale = scale_factor(out_width, region.width);
    crop_resized(raster, region, scaled(region.width, scale), scaled(region.height, scale))
}

/// Composer for faces with no snout or background override.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainComposer;

impl FaceComposer for PlainComposer {
    fn mode(&self) -> ComposeMode {
        ComposeMode::Plain
    }

    fn compose(
        &self,
        raster: &RgbaImage,
        out_width: u32,
        regions: &ResolvedRegions,
    ) -> Result<RgbaImage, ProcessingError> {
        crop_face(raster, out_width, &regions.face)
    }
}
