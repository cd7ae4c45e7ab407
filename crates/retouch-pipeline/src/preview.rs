//! Fixed-width display previews.
//!
//! Previews are scaled so the width is exactly [`PREVIEW_WIDTH`] pixels
//! while preserving aspect ratio. They are purely a view artifact: the
//! pipeline never reads them, and the selection mapper only needs the
//! preview width to convert pointer coordinates back to source pixels.
//!
//! The output is always three-channel so the display collaborator never
//! has to special-case gray buffers.

use image::imageops::FilterType;

use crate::types::{Dimensions, Raster, RgbImage};

/// Width of every preview canvas, in pixels.
pub const PREVIEW_WIDTH: u32 = 255;

/// Dimensions of a preview of `source` at the given width.
///
/// The height is `source.height * width / source.width`, truncated, and
/// never less than 1.
#[must_use]
pub fn preview_dimensions(source: Dimensions, width: u32) -> Dimensions {
    if source.width == 0 {
        return Dimensions::new(width, 1);
    }
    let height = u64::from(source.height) * u64::from(width) / u64::from(source.width);
    Dimensions::new(width, u32::try_from(height).unwrap_or(u32::MAX).max(1))
}

/// Render a three-channel preview of `raster` at [`PREVIEW_WIDTH`].
#[must_use = "returns the preview image"]
pub fn preview(raster: &Raster) -> RgbImage {
    preview_with_width(raster, PREVIEW_WIDTH)
}

/// Render a three-channel preview of `raster` at an arbitrary width.
///
/// Uses bilinear (triangle) resampling in both directions, so small
/// sources are upscaled to fill the canvas.
#[must_use = "returns the preview image"]
pub fn preview_with_width(raster: &Raster, width: u32) -> RgbImage {
    let target = preview_dimensions(raster.dimensions(), width);
    let rgb = raster.to_rgb();
    if rgb.dimensions() == (target.width, target.height) {
        return rgb;
    }
    image::imageops::resize(&rgb, target.width, target.height, FilterType::Triangle)
}
