//! Per-value tone effects: negative, binarization, and gamma correction.
//!
//! All three are point operations applied independently to every channel
//! value, so they work the same on color and gray rasters.

use crate::types::Raster;

/// Invert every channel value (`255 - v`).
#[must_use = "returns the inverted raster"]
pub fn negative(raster: &Raster) -> Raster {
    raster.map_values(|v| !v)
}

/// Threshold every channel value to pure black or white.
///
/// Values at or above `threshold` become 255, everything else 0. Color
/// rasters are thresholded per channel, so the result may contain any of
/// the eight primary/secondary colors.
#[must_use = "returns the binarized raster"]
pub fn binarize(raster: &Raster, threshold: u8) -> Raster {
    raster.map_values(|v| if v >= threshold { u8::MAX } else { 0 })
}

/// Build a 256-entry lookup table for `255 * (v / 255) ^ gamma`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn gamma_lut(gamma: f64) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (v, out) in (0..=u8::MAX).zip(lut.iter_mut()) {
        let normalized = f64::from(v) / 255.0;
        *out = (255.0 * normalized.powf(gamma)).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

/// Apply gamma correction uniformly across channels.
///
/// A gamma of exactly 1.0 returns the raster unchanged.
#[must_use = "returns the gamma-corrected raster"]
pub fn gamma(raster: &Raster, gamma: f64) -> Raster {
    if (gamma - 1.0).abs() < f64::EPSILON {
        return raster.clone();
    }
    let lut = gamma_lut(gamma);
    raster.map_values(|v| lut[usize::from(v)])
}
