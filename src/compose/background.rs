//! Face layered over one or more background regions on a square canvas.

use image::RgbaImage;
use std::iter;

use super::error::ProcessingError;
use super::plain::crop_face;
use super::raster::draw_scaled;
use super::registry::{ComposeMode, FaceComposer};
use crate::models::Region;
use crate::resolve::ResolvedRegions;
use crate::scale::{scale_factor, scaled, snap};

/// Axis-aligned box in source texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: u64,
    pub min_y: u64,
    pub max_x: u64,
    pub max_y: u64,
}

impl Bounds {
    pub fn width(&self) -> u64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> u64 {
        self.max_y - self.min_y
    }

    /// Smallest box covering every region.
    pub fn covering<'a>(regions: impl IntoIterator<Item = &'a Region>) -> Option<Self> {
        regions.into_iter().fold(None, |acc, r| {
            let next = Bounds { min_x: r.x as u64, min_y: r.y as u64, max_x: r.right(), max_y: r.bottom() };
            Some(match acc {
                None => next,
                Some(b) => Bounds {
                    min_x: b.min_x.min(next.min_x),
                    min_y: b.min_y.min(next.min_y),
                    max_x: b.max_x.max(next.max_x),
                    max_y: b.max_y.max(next.max_y),
                },
            })
        })
    }
}

/// Composite background layers, then the face, onto a transparent square
/// canvas `out_width` wide (after snapping to the face width).
///
/// The scaled bounding box of all regions is centered on the canvas and each
/// region keeps its position relative to that box. Layers are drawn straight
/// onto the canvas; parts scaled past its edges are never materialized.
pub fn crop_face_with_background(
    raster: &RgbaImage,
    out_width: u32,
    face: &Region,
    background: &[Region],
) -> Result<RgbaImage, ProcessingError> {
    let out_width = snap(out_width, face.width);
    let scale = scale_factor(out_width, face.width);

    let layers: Vec<&Region> = background.iter().chain(iter::once(face)).collect();
    let bounds = match Bounds::covering(layers.iter().copied()) {
        Some(bounds) => bounds,
        None => return crop_face(raster, out_width, face),
    };

    let mut canvas = RgbaImage::new(out_width, out_width);
    let offset_x = centered(out_width, bounds.width(), scale);
    let offset_y = centered(out_width, bounds.height(), scale);

    for region in layers {
        let size = (scaled(region.width, scale), scaled(region.height, scale));
        let x = offset_x + ((region.x as u64 - bounds.min_x) as f64 * scale).round() as i64;
        let y = offset_y + ((region.y as u64 - bounds.min_y) as f64 * scale).round() as i64;
        draw_scaled(&mut canvas, raster, region, size, (x, y))?;
    }

    Ok(canvas)
}

fn centered(canvas: u32, length: u64, scale: f64) -> i64 {
    ((canvas as f64 - length as f64 * scale) / 2.0).round() as i64
}

/// Composer for faces with a background override.
#[derive(Debug, Default, Clone, Copy)]
pub struct BackgroundComposer;

impl FaceComposer for BackgroundComposer {
    fn mode(&self) -> ComposeMode {
        ComposeMode::Background
    }

    fn compose(
        &self,
        raster: &RgbaImage,
        out_width: u32,
        regions: &ResolvedRegions,
    ) -> Result<RgbaImage, ProcessingError> {
        let background = regions.background.as_deref().unwrap_or_default();
        crop_face_with_background(raster, out_width, &regions.face, background)
    }
}
