//! Pixel-perfect output sizing
//!
//! Faces are tiny pixel-art crops (often 5 to 8 pixels wide). Upscaling them
//! by a non-integer factor with nearest-neighbor filtering produces uneven
//! pixel columns, so output widths are snapped to a multiple of the source
//! width where a compositing mode requires it.

/// Snap `target` to the nearest multiple of `native`.
///
/// Ties favor the lower multiple. The result is never zero: a target below
/// `native` snaps up to `native`.
///
/// ```
/// use pixelface::scale::snap;
///
/// assert_eq!(snap(70, 8), 72);
/// assert_eq!(snap(64, 8), 64);
/// assert_eq!(snap(12, 8), 8);
/// ```
pub fn snap(target: u32, native: u32) -> u32 {
    if native == 0 || (target > 0 && target % native == 0) {
        return target;
    }

    let lower = target / native * native;
    let upper = lower + native;
    if lower == 0 {
        return upper;
    }

    if target - lower <= upper - target {
        lower
    } else {
        upper
    }
}

/// Scale factor taking a `native`-wide region to `out_width`.
pub fn scale_factor(out_width: u32, native: u32) -> f64 {
    out_width as f64 / native as f64
}

/// Scale a length, rounding half away from zero.
pub fn scaled(length: u32, scale: f64) -> u32 {
    (length as f64 * scale).round() as u32
}
