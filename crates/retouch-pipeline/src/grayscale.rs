//! Grayscale conversion.
//!
//! Collapses a color raster to a single luminance channel. This is the one
//! effect that changes the channel layout; every later stage in the
//! pipeline must cope with single-channel input.

use crate::types::{GrayImage, Raster};

/// BT.601 luma weights in 14-bit fixed point: `0.299`, `0.587`, `0.114`.
const WEIGHT_R: u32 = 4899;
const WEIGHT_G: u32 = 9617;
const WEIGHT_B: u32 = 1868;
const SHIFT: u32 = 14;

/// BT.601 luma of one pixel, rounded half up in fixed point.
#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
#[must_use]
pub const fn bt601_luma([r, g, b]: [u8; 3]) -> u8 {
    let sum = r as u32 * WEIGHT_R + g as u32 * WEIGHT_G + b as u32 * WEIGHT_B;
    // The weights sum to 1 << SHIFT, so the result never exceeds 255.
    ((sum + (1 << (SHIFT - 1))) >> SHIFT) as u8
}

/// Convert a raster to single-channel gray.
///
/// Uses BT.601 weights (`0.299 R + 0.587 G + 0.114 B`). Rasters that are
/// already gray are returned unchanged.
#[must_use = "returns the grayscale raster"]
pub fn to_grayscale(raster: &Raster) -> Raster {
    match raster {
        Raster::Rgb(img) => Raster::Gray(GrayImage::from_fn(img.width(), img.height(), |x, y| {
            image::Luma([bt601_luma(img.get_pixel(x, y).0)])
        })),
        Raster::Gray(_) => raster.clone(),
    }
}
