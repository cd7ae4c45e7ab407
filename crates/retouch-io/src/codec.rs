//! In-memory decoding and encoding.

use std::io::Cursor;

use image::ImageFormat;
use retouch_pipeline::{GrayImage, Raster};

use crate::IoError;

/// Formats accepted by [`encode`] and [`crate::save`].
pub const SUPPORTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Bmp,
    ImageFormat::WebP,
];

/// Decode raw image bytes into a raster.
///
/// The format is sniffed from the data. Gray images stay single-channel;
/// color images (alpha dropped) become 8-bit RGB.
///
/// BMP and WebP have no gray layout the decoder reports as such: gray BMPs
/// are palettes and WebP is always color. For those formats an image whose
/// channels are equal at every pixel is returned as gray.
///
/// # Errors
///
/// Returns [`IoError::EmptyInput`] if `bytes` is empty and
/// [`IoError::Decode`] if the data is unrecognized or corrupt.
pub fn decode(bytes: &[u8]) -> Result<Raster, IoError> {
    if bytes.is_empty() {
        return Err(IoError::EmptyInput);
    }
    let format = image::guess_format(bytes).map_err(IoError::Decode)?;
    let image = image::load_from_memory_with_format(bytes, format).map_err(IoError::Decode)?;
    let raster = Raster::from(image);
    if matches!(format, ImageFormat::Bmp | ImageFormat::WebP) {
        return Ok(collapse_neutral(raster));
    }
    Ok(raster)
}

/// Turn an RGB raster with `R == G == B` everywhere into a gray one.
fn collapse_neutral(raster: Raster) -> Raster {
    match raster {
        Raster::Rgb(img) if img.pixels().all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2]) => {
            log::debug!("decoded neutral {}x{} image as gray", img.width(), img.height());
            Raster::Gray(GrayImage::from_fn(img.width(), img.height(), |x, y| {
                image::Luma([img.get_pixel(x, y).0[0]])
            }))
        }
        other => other,
    }
}

/// Encode a raster in the given format.
///
/// # Errors
///
/// Returns [`IoError::Encode`] if `format` is not one of
/// [`SUPPORTED_FORMATS`] or the encoder fails.
pub fn encode(raster: &Raster, format: ImageFormat) -> Result<Vec<u8>, IoError> {
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(IoError::Encode(image::ImageError::Unsupported(
            image::error::UnsupportedError::from_format_and_kind(
                format.into(),
                image::error::UnsupportedErrorKind::Format(format.into()),
            ),
        )));
    }
    let mut buf = Cursor::new(Vec::new());
    let written = match raster {
        Raster::Rgb(img) => img.write_to(&mut buf, format),
        Raster::Gray(img) => img.write_to(&mut buf, format),
    };
    written.map_err(IoError::Encode)?;
    Ok(buf.into_inner())
}
