//! Selection mapping: from a drag on the preview canvas to a crop of the
//! full-resolution image.
//!
//! This module is the only place that knows about the preview scale
//! factor. The pipeline itself works exclusively in source pixels.
//!
//! # Coordinate system
//!
//! - Preview points are in preview-canvas pixels, origin top-left, and
//!   may lie outside the canvas (pointer dragged past the edge).
//! - [`SourceRect`] is a half-open pixel rectangle `[x1, x2) x [y1, y2)`
//!   in the coordinate space of the image being previewed.

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, PipelineError, Raster};

/// A pointer position on the preview canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewPoint {
    /// Column in preview pixels.
    pub x: f64,
    /// Row in preview pixels.
    pub y: f64,
}

impl PreviewPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in image pixel coordinates, normalized so that
/// `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRect {
    /// Left edge (inclusive).
    pub x1: u32,
    /// Top edge (inclusive).
    pub y1: u32,
    /// Right edge (exclusive).
    pub x2: u32,
    /// Bottom edge (exclusive).
    pub y2: u32,
}

impl SourceRect {
    /// Build a rectangle from two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: (u32, u32), b: (u32, u32)) -> Self {
        Self {
            x1: a.0.min(b.0),
            y1: a.1.min(b.1),
            x2: a.0.max(b.0),
            y2: a.1.max(b.1),
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }

    /// Returns `true` if the rectangle has zero width or zero height.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x1 >= self.x2 || self.y1 >= self.y2
    }

    /// Whether the rectangle lies entirely within an image of `bounds`.
    #[must_use]
    pub const fn fits_within(&self, bounds: Dimensions) -> bool {
        self.x2 <= bounds.width && self.y2 <= bounds.height
    }

    /// Shift the rectangle by `origin`'s top-left corner.
    ///
    /// Converts a rectangle expressed relative to a crop back into the
    /// coordinate space the crop was taken from.
    #[must_use]
    pub const fn offset_by(&self, origin: &Self) -> Self {
        Self {
            x1: self.x1 + origin.x1,
            y1: self.y1 + origin.y1,
            x2: self.x2 + origin.x1,
            y2: self.y2 + origin.y1,
        }
    }
}

/// Map a drag on a preview of width `preview_width` to a rectangle in the
/// pixel space of an image of size `source`.
///
/// The scale factor is `source.width / preview_width`. Corners are
/// normalized, scaled, truncated toward zero and clamped to the image.
///
/// # Errors
///
/// Returns [`PipelineError::EmptySelection`] if the mapped rectangle has
/// zero width or height. Returns [`PipelineError::InvalidConfig`] if the
/// source or preview width is zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn map_drag_to_source_rect(
    start: PreviewPoint,
    end: PreviewPoint,
    source: Dimensions,
    preview_width: u32,
) -> Result<SourceRect, PipelineError> {
    if preview_width == 0 || source.is_empty() {
        return Err(PipelineError::InvalidConfig(format!(
            "cannot map selection for source {}x{} on preview width {preview_width}",
            source.width, source.height,
        )));
    }

    let t = f64::from(source.width) / f64::from(preview_width);
    // NaN coordinates saturate to 0 in the final cast.
    let to_source =
        |v: f64, limit: u32| -> u32 { (v * t).trunc().clamp(0.0, f64::from(limit)) as u32 };

    let rect = SourceRect {
        x1: to_source(start.x.min(end.x), source.width),
        y1: to_source(start.y.min(end.y), source.height),
        x2: to_source(start.x.max(end.x), source.width),
        y2: to_source(start.y.max(end.y), source.height),
    };

    if rect.is_empty() {
        return Err(PipelineError::EmptySelection);
    }
    Ok(rect)
}

/// Extract the sub-image covered by `rect`.
///
/// # Errors
///
/// Returns [`PipelineError::EmptySelection`] for a zero-area rectangle and
/// [`PipelineError::InvalidConfig`] if it extends past the raster.
pub fn crop(raster: &Raster, rect: &SourceRect) -> Result<Raster, PipelineError> {
    if rect.is_empty() {
        return Err(PipelineError::EmptySelection);
    }
    let bounds = raster.dimensions();
    if !rect.fits_within(bounds) {
        return Err(PipelineError::InvalidConfig(format!(
            "region {rect:?} exceeds image bounds {}x{}",
            bounds.width, bounds.height,
        )));
    }

    let (x, y, w, h) = (rect.x1, rect.y1, rect.width(), rect.height());
    Ok(match raster {
        Raster::Rgb(img) => Raster::Rgb(image::imageops::crop_imm(img, x, y, w, h).to_image()),
        Raster::Gray(img) => Raster::Gray(image::imageops::crop_imm(img, x, y, w, h).to_image()),
    })
}

/// Tracks at most one in-progress drag.
///
/// A press starts (or restarts) a drag, moves update its free corner, and
/// a release hands back both corners and clears the tracker. Moves and
/// releases without a preceding press are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragTracker {
    active: Option<(PreviewPoint, PreviewPoint)>,
}

impl DragTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Begin a drag at `point`, discarding any drag already in progress.
    pub const fn press(&mut self, point: PreviewPoint) {
        self.active = Some((point, point));
    }

    /// Move the free corner of the active drag.
    pub const fn motion(&mut self, point: PreviewPoint) {
        if let Some((_, current)) = &mut self.active {
            *current = point;
        }
    }

    /// Finish the active drag at `point`, returning `(start, end)`.
    pub const fn release(&mut self, point: PreviewPoint) -> Option<(PreviewPoint, PreviewPoint)> {
        match self.active.take() {
            Some((start, _)) => Some((start, point)),
            None => None,
        }
    }

    /// Abandon the active drag, if any.
    pub const fn cancel(&mut self) {
        self.active = None;
    }

    /// The in-progress rectangle corners, for rubber-band rendering.
    #[must_use]
    pub const fn current(&self) -> Option<(PreviewPoint, PreviewPoint)> {
        self.active
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
