//! Geometric effects: horizontal flip and rotation about the center.

use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

use crate::types::Raster;

/// Mirror the raster around its vertical axis.
#[must_use = "returns the flipped raster"]
pub fn flip_horizontal(raster: &Raster) -> Raster {
    match raster {
        Raster::Rgb(img) => Raster::Rgb(image::imageops::flip_horizontal(img)),
        Raster::Gray(img) => Raster::Gray(image::imageops::flip_horizontal(img)),
    }
}

/// Rotate counter-clockwise by `degrees` about the raster center.
///
/// The canvas keeps its size: corners that rotate out of frame are
/// clipped and uncovered areas are filled with black. Uses bilinear
/// sampling. Multiples of 360 return the raster unchanged.
#[must_use = "returns the rotated raster"]
pub fn rotate(raster: &Raster, degrees: u16) -> Raster {
    if degrees % 360 == 0 {
        return raster.clone();
    }
    // imageproc rotates clockwise for positive theta.
    let theta = -f32::from(degrees).to_radians();
    match raster {
        Raster::Rgb(img) => Raster::Rgb(rotate_about_center(
            img,
            theta,
            Interpolation::Bilinear,
            image::Rgb([0, 0, 0]),
        )),
        Raster::Gray(img) => Raster::Gray(rotate_about_center(
            img,
            theta,
            Interpolation::Bilinear,
            image::Luma([0]),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GrayImage, RgbImage};

    /// 5x3 gray image whose value encodes the column.
    #[allow(clippy::cast_possible_truncation)]
    fn columns() -> Raster {
        Raster::Gray(GrayImage::from_fn(5, 3, |x, _| image::Luma([x as u8 * 10])))
    }

    #[test]
    fn flip_mirrors_columns() {
        let Raster::Gray(flipped) = flip_horizontal(&columns()) else {
            unreachable!("gray input stays gray");
        };
        assert_eq!(flipped.get_pixel(0, 0).0[0], 40);
        assert_eq!(flipped.get_pixel(4, 2).0[0], 0);
    }

    #[test]
    fn double_flip_is_identity() {
        let img = Raster::Rgb(RgbImage::from_fn(4, 3, |x, y| {
            image::Rgb([u8::try_from(x).unwrap_or(0), u8::try_from(y).unwrap_or(0), 7])
        }));
        assert_eq!(flip_horizontal(&flip_horizontal(&img)), img);
    }

    #[test]
    fn zero_and_full_turn_are_identity() {
        let img = columns();
        assert_eq!(rotate(&img, 0), img);
        assert_eq!(rotate(&img, 360), img);
    }

    #[test]
    fn rotation_keeps_canvas_size() {
        let img = Raster::Rgb(RgbImage::new(20, 10));
        let rotated = rotate(&img, 45);
        assert_eq!(rotated.dimensions(), img.dimensions());
        assert_eq!(rotated.channels(), 3);
    }

    #[test]
    fn rotation_clips_corners_to_black() {
        let img = Raster::Gray(GrayImage::from_pixel(21, 21, image::Luma([200])));
        let Raster::Gray(rotated) = rotate(&img, 45) else {
            unreachable!("gray input stays gray");
        };
        // Corners leave the frame after 45 degrees; the center stays put.
        assert_eq!(rotated.get_pixel(0, 0).0[0], 0);
        let center = rotated.get_pixel(10, 10).0[0];
        assert!(center.abs_diff(200) <= 1, "center drifted to {center}");
    }

    #[test]
    fn rotation_is_counter_clockwise() {
        // A bright pixel right of center ends up above center after 90 degrees.
        let mut img = GrayImage::new(21, 21);
        img.put_pixel(18, 10, image::Luma([255]));
        let Raster::Gray(rotated) = rotate(&Raster::Gray(img), 90) else {
            unreachable!("gray input stays gray");
        };
        let (bx, by, _) = rotated
            .enumerate_pixels()
            .max_by_key(|(_, _, p)| p.0[0])
            .map(|(x, y, p)| (x, y, p.0[0]))
            .unwrap_or((0, 0, 0));
        assert_eq!(bx, 10, "expected brightest column at center, got {bx}");
        assert!(by < 10, "expected brightest row above center, got {by}");
    }
}
