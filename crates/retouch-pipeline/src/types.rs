//! Shared types for the retouch effect pipeline.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can build single-channel
/// rasters without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage` so downstream crates can build color rasters and
/// consume previews without depending on `image` directly.
pub use image::RgbImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create a new set of dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either axis is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// An 8-bit raster that is either three-channel color or single-channel
/// gray.
///
/// Every effect accepts both variants. Grayscale conversion is the only
/// effect that changes the variant; everything after it keeps operating on
/// the single channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Raster {
    /// Three 8-bit channels per pixel.
    Rgb(RgbImage),
    /// One 8-bit channel per pixel.
    Gray(GrayImage),
}

impl Raster {
    /// Pixel dimensions of the raster.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        let (width, height) = match self {
            Self::Rgb(img) => img.dimensions(),
            Self::Gray(img) => img.dimensions(),
        };
        Dimensions { width, height }
    }

    /// Number of channels per pixel (3 or 1).
    #[must_use]
    pub const fn channels(&self) -> u8 {
        match self {
            Self::Rgb(_) => 3,
            Self::Gray(_) => 1,
        }
    }

    /// Returns `true` if the raster has no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimensions().is_empty()
    }

    /// Raw interleaved channel bytes, row-major.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        match self {
            Self::Rgb(img) => img.as_raw(),
            Self::Gray(img) => img.as_raw(),
        }
    }

    /// Apply a per-channel value mapping, keeping the channel layout.
    #[must_use = "returns the mapped raster"]
    pub fn map_values(&self, f: impl Fn(u8) -> u8) -> Self {
        let mut out = self.clone();
        let values: &mut [u8] = match &mut out {
            Self::Rgb(img) => &mut **img,
            Self::Gray(img) => &mut **img,
        };
        for v in values.iter_mut() {
            *v = f(*v);
        }
        out
    }

    /// Expand to a three-channel image (gray values are replicated).
    #[must_use]
    pub fn to_rgb(&self) -> RgbImage {
        match self {
            Self::Rgb(img) => img.clone(),
            Self::Gray(img) => DynamicImage::ImageLuma8(img.clone()).to_rgb8(),
        }
    }
}

impl From<DynamicImage> for Raster {
    /// Gray sources (with or without alpha, any depth) stay single-channel;
    /// everything else is flattened to 8-bit RGB.
    fn from(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(img) => Self::Gray(img),
            DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_) => Self::Gray(image.to_luma8()),
            DynamicImage::ImageRgb8(img) => Self::Rgb(img),
            other => Self::Rgb(other.to_rgb8()),
        }
    }
}

/// A parity-based effect: an odd number of activations means applied.
///
/// Variants are declared in pipeline order; [`Toggle::ALL`] is the order
/// in which active toggles are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    /// Horizontal mirror.
    Flip,
    /// Collapse to a single luminance channel.
    Grayscale,
    /// Invert every channel value.
    Negative,
    /// Black/white threshold against [`EffectConfig::threshold`].
    Binarize,
}

impl Toggle {
    /// All toggles in application order.
    pub const ALL: [Self; 4] = [Self::Flip, Self::Grayscale, Self::Negative, Self::Binarize];
}

/// Activation counts for each [`Toggle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleCounts {
    /// Activations of [`Toggle::Flip`].
    pub flip: u32,
    /// Activations of [`Toggle::Grayscale`].
    pub grayscale: u32,
    /// Activations of [`Toggle::Negative`].
    pub negative: u32,
    /// Activations of [`Toggle::Binarize`].
    pub binarize: u32,
}

impl ToggleCounts {
    /// Number of times `toggle` has been activated.
    #[must_use]
    pub const fn count(&self, toggle: Toggle) -> u32 {
        match toggle {
            Toggle::Flip => self.flip,
            Toggle::Grayscale => self.grayscale,
            Toggle::Negative => self.negative,
            Toggle::Binarize => self.binarize,
        }
    }

    /// Whether `toggle` is currently applied (odd activation count).
    #[must_use]
    pub const fn is_active(&self, toggle: Toggle) -> bool {
        self.count(toggle) % 2 == 1
    }

    /// Record one more activation of `toggle`.
    pub const fn activate(&mut self, toggle: Toggle) {
        let count = match toggle {
            Toggle::Flip => &mut self.flip,
            Toggle::Grayscale => &mut self.grayscale,
            Toggle::Negative => &mut self.negative,
            Toggle::Binarize => &mut self.binarize,
        };
        // Wrapping preserves parity.
        *count = count.wrapping_add(1);
    }
}

/// An order-sensitive morphology step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MorphOp {
    /// Local minimum over the structuring element.
    Erode,
    /// Local maximum over the structuring element.
    Dilate,
}

/// A single continuous parameter change, as delivered by a slider or
/// checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    /// Binarization threshold shared by both binarize paths.
    Threshold(u8),
    /// Enable or disable the post-morphology threshold.
    ThresholdEnabled(bool),
    /// Counter-clockwise rotation in degrees, 0 to 360.
    RotationAngle(u16),
    /// Gamma exponent, 0.1 to 5.0.
    Gamma(f64),
    /// Morphology kernel side length: odd, 1 to 15.
    KernelSize(u8),
}

impl Parameter {
    /// Check the value against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] describing the first
    /// violated bound.
    pub fn validate(self) -> Result<(), PipelineError> {
        match self {
            Self::Threshold(_) | Self::ThresholdEnabled(_) => Ok(()),
            Self::RotationAngle(angle) if angle > EffectConfig::MAX_ROTATION_ANGLE => {
                Err(PipelineError::InvalidConfig(format!(
                    "rotation_angle must be at most {}, got {angle}",
                    EffectConfig::MAX_ROTATION_ANGLE,
                )))
            }
            Self::RotationAngle(_) => Ok(()),
            Self::Gamma(gamma)
                if !gamma.is_finite()
                    || !(EffectConfig::MIN_GAMMA..=EffectConfig::MAX_GAMMA).contains(&gamma) =>
            {
                Err(PipelineError::InvalidConfig(format!(
                    "gamma must be within {}..={}, got {gamma}",
                    EffectConfig::MIN_GAMMA,
                    EffectConfig::MAX_GAMMA,
                )))
            }
            Self::Gamma(_) => Ok(()),
            Self::KernelSize(size)
                if size % 2 == 0 || size > EffectConfig::MAX_KERNEL_SIZE =>
            {
                Err(PipelineError::InvalidConfig(format!(
                    "kernel_size must be odd and within 1..={}, got {size}",
                    EffectConfig::MAX_KERNEL_SIZE,
                )))
            }
            Self::KernelSize(_) => Ok(()),
        }
    }
}

/// Effect configuration: parity toggles, the morphology log, and the
/// continuous parameters.
///
/// The processed image is a pure function of the pipeline input and this
/// value. Parameters are read live at recompute time, so changing
/// `kernel_size` affects every morphology step already in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Activation counts of the parity toggles.
    pub toggles: ToggleCounts,

    /// Morphology steps in activation order.
    pub morphology: Vec<MorphOp>,

    /// Binarization threshold. Values at or above it become 255.
    pub threshold: u8,

    /// Apply a second, independent binarization after morphology.
    pub threshold_enabled: bool,

    /// Counter-clockwise rotation in degrees (0 to 360).
    pub rotation_angle: u16,

    /// Gamma exponent (0.1 to 5.0). 1.0 is the identity.
    pub gamma: f64,

    /// Side length of the square morphology kernel. Odd, 1 to 15.
    pub kernel_size: u8,
}

impl EffectConfig {
    pub const DEFAULT_THRESHOLD: u8 = 127;
    pub const DEFAULT_ROTATION_ANGLE: u16 = 0;
    pub const MAX_ROTATION_ANGLE: u16 = 360;
    pub const DEFAULT_GAMMA: f64 = 1.0;
    pub const MIN_GAMMA: f64 = 0.1;
    pub const MAX_GAMMA: f64 = 5.0;
    pub const DEFAULT_KERNEL_SIZE: u8 = 3;
    pub const MAX_KERNEL_SIZE: u8 = 15;

    /// The continuous parameters as individual [`Parameter`] values.
    #[must_use]
    pub const fn parameters(&self) -> [Parameter; 5] {
        [
            Parameter::Threshold(self.threshold),
            Parameter::ThresholdEnabled(self.threshold_enabled),
            Parameter::RotationAngle(self.rotation_angle),
            Parameter::Gamma(self.gamma),
            Parameter::KernelSize(self.kernel_size),
        ]
    }

    /// Check every continuous parameter against its range.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] for the first parameter
    /// out of range.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.parameters().into_iter().try_for_each(Parameter::validate)
    }

    /// Validate and store a parameter. A rejected value leaves the
    /// configuration unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the value is out of
    /// range.
    pub fn set_parameter(&mut self, parameter: Parameter) -> Result<(), PipelineError> {
        parameter.validate()?;
        match parameter {
            Parameter::Threshold(v) => self.threshold = v,
            Parameter::ThresholdEnabled(v) => self.threshold_enabled = v,
            Parameter::RotationAngle(v) => self.rotation_angle = v,
            Parameter::Gamma(v) => self.gamma = v,
            Parameter::KernelSize(v) => self.kernel_size = v,
        }
        Ok(())
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            toggles: ToggleCounts::default(),
            morphology: Vec::new(),
            threshold: Self::DEFAULT_THRESHOLD,
            threshold_enabled: false,
            rotation_angle: Self::DEFAULT_ROTATION_ANGLE,
            gamma: Self::DEFAULT_GAMMA,
            kernel_size: Self::DEFAULT_KERNEL_SIZE,
        }
    }
}

/// Errors produced by the pipeline and the selection mapper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// A parameter or input violates the pipeline contract.
    #[error("invalid effect configuration: {0}")]
    InvalidConfig(String),

    /// A drag or region has zero width or zero height.
    #[error("selection has zero area")]
    EmptySelection,
}
