//! retouch-io: file I/O for the retouch effect pipeline.
//!
//! Decodes image files into [`Raster`](retouch_pipeline::Raster) values
//! and encodes processed rasters back to disk. The pipeline crate itself
//! never touches the filesystem.
//!
//! Supported formats: PNG, JPEG, BMP, WebP.

pub mod codec;
pub mod file;

use std::path::PathBuf;

pub use codec::{decode, encode};
pub use file::{format_from_path, load, save};

/// Errors that can occur while reading or writing images.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The input byte buffer was empty.
    #[error("input image is empty")]
    EmptyInput,

    /// The bytes could not be decoded as a supported image.
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The raster could not be encoded in the requested format.
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// The output path does not name a supported format.
    #[error("unsupported image format for {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Reading or writing the file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
