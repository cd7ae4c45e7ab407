//! Filesystem helpers: read and write images by path.

use std::path::Path;

use image::ImageFormat;
use retouch_pipeline::Raster;

use crate::IoError;
use crate::codec::{self, SUPPORTED_FORMATS};

/// Pick the output format from a path's extension.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for unknown extensions or
/// formats outside [`SUPPORTED_FORMATS`].
pub fn format_from_path(path: &Path) -> Result<ImageFormat, IoError> {
    ImageFormat::from_path(path)
        .ok()
        .filter(|format| SUPPORTED_FORMATS.contains(format))
        .ok_or_else(|| IoError::UnsupportedFormat(path.to_path_buf()))
}

/// Read and decode an image file.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be read, otherwise the
/// errors of [`codec::decode`].
pub fn load(path: &Path) -> Result<Raster, IoError> {
    let bytes = std::fs::read(path)?;
    log::debug!("read {} ({} bytes)", path.display(), bytes.len());
    codec::decode(&bytes)
}

/// Encode `raster` in the format implied by `path` and write it.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] if the extension is not
/// supported, [`IoError::Encode`] if encoding fails, and [`IoError::Io`]
/// if the file cannot be written.
pub fn save(path: &Path, raster: &Raster) -> Result<(), IoError> {
    let format = format_from_path(path)?;
    let bytes = codec::encode(raster, format)?;
    std::fs::write(path, &bytes)?;
    log::debug!(
        "wrote {} ({format:?}, {} bytes)",
        path.display(),
        bytes.len()
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn extensions_map_to_formats() {
        for (name, expected) in [
            ("out.png", ImageFormat::Png),
            ("out.JPG", ImageFormat::Jpeg),
            ("out.jpeg", ImageFormat::Jpeg),
            ("dir/out.bmp", ImageFormat::Bmp),
            ("out.webp", ImageFormat::WebP),
        ] {
            assert_eq!(format_from_path(Path::new(name)).unwrap(), expected, "{name}");
        }
    }

    #[test]
    fn unknown_extension_rejected() {
        for name in ["out.gif", "out.txt", "no_extension"] {
            let err = format_from_path(Path::new(name)).unwrap_err();
            assert!(
                matches!(&err, IoError::UnsupportedFormat(p) if p == &PathBuf::from(name)),
                "{name}: {err}"
            );
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load(Path::new("/nonexistent/retouch/input.png"));
        assert!(matches!(result, Err(IoError::Io(_))));
    }
}
