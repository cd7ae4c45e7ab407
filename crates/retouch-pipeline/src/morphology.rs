//! Grayscale morphology: erosion and dilation with a square kernel.
//!
//! Wraps [`imageproc::morphology::grayscale_erode`] and
//! [`imageproc::morphology::grayscale_dilate`] with an all-ones square
//! structuring element. Erosion takes the local minimum, dilation the local
//! maximum; pixels outside the image do not participate.
//!
//! `imageproc` only accepts `GrayImage`, so color rasters are split into
//! three single-channel images, processed independently, and reassembled.

use image::GrayImage;
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode};

use crate::types::{MorphOp, Raster, RgbImage};

/// Apply one morphology step with a square kernel of side `kernel_size`.
///
/// `kernel_size` is expected to be odd; an even value is treated as the
/// next smaller odd size. A size of 1 is the identity.
#[must_use = "returns the processed raster"]
pub fn apply(raster: &Raster, op: MorphOp, kernel_size: u8) -> Raster {
    let radius = kernel_size / 2;
    if radius == 0 {
        return raster.clone();
    }
    let mask = Mask::square(radius);
    let run = |channel: &GrayImage| match op {
        MorphOp::Erode => grayscale_erode(channel, &mask),
        MorphOp::Dilate => grayscale_dilate(channel, &mask),
    };

    match raster {
        Raster::Gray(img) => Raster::Gray(run(img)),
        Raster::Rgb(img) => {
            let (w, h) = img.dimensions();

            let channels: [GrayImage; 3] = std::array::from_fn(|c| {
                GrayImage::from_fn(w, h, |x, y| image::Luma([img.get_pixel(x, y).0[c]]))
            });
            let processed: [GrayImage; 3] = std::array::from_fn(|c| run(&channels[c]));

            Raster::Rgb(RgbImage::from_fn(w, h, |x, y| {
                image::Rgb([
                    processed[0].get_pixel(x, y).0[0],
                    processed[1].get_pixel(x, y).0[0],
                    processed[2].get_pixel(x, y).0[0],
                ])
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 9x9 black image with a single white pixel in the center.
    fn dot() -> Raster {
        let mut img = GrayImage::new(9, 9);
        img.put_pixel(4, 4, image::Luma([255]));
        Raster::Gray(img)
    }

    fn white_count(raster: &Raster) -> usize {
        raster.as_raw().iter().filter(|&&v| v == 255).count()
    }

    #[test]
    fn kernel_one_is_identity() {
        let img = dot();
        assert_eq!(apply(&img, MorphOp::Dilate, 1), img);
        assert_eq!(apply(&img, MorphOp::Erode, 1), img);
    }

    #[test]
    fn dilate_grows_dot_to_square() {
        let dilated = apply(&dot(), MorphOp::Dilate, 3);
        assert_eq!(white_count(&dilated), 9);

        let dilated = apply(&dot(), MorphOp::Dilate, 5);
        assert_eq!(white_count(&dilated), 25);
    }

    #[test]
    fn erode_removes_isolated_dot() {
        let eroded = apply(&dot(), MorphOp::Erode, 3);
        assert_eq!(white_count(&eroded), 0);
    }

    #[test]
    fn erode_shrinks_square() {
        let img = Raster::Gray(GrayImage::from_fn(9, 9, |x, y| {
            if (2..7).contains(&x) && (2..7).contains(&y) {
                image::Luma([255])
            } else {
                image::Luma([0])
            }
        }));
        let eroded = apply(&img, MorphOp::Erode, 3);
        assert_eq!(white_count(&eroded), 9);
    }

    #[test]
    fn dilate_takes_local_maximum_of_gray_values() {
        let mut img = GrayImage::from_pixel(5, 5, image::Luma([10]));
        img.put_pixel(2, 2, image::Luma([90]));
        let dilated = apply(&Raster::Gray(img), MorphOp::Dilate, 3);
        let Raster::Gray(out) = dilated else {
            unreachable!("gray input stays gray");
        };
        assert_eq!(out.get_pixel(1, 1).0[0], 90);
        assert_eq!(out.get_pixel(0, 0).0[0], 10);
    }

    #[test]
    fn color_channels_processed_independently() {
        let mut img = RgbImage::from_pixel(5, 5, image::Rgb([0, 200, 0]));
        img.put_pixel(2, 2, image::Rgb([255, 0, 0]));
        let dilated = apply(&Raster::Rgb(img), MorphOp::Dilate, 3);
        let Raster::Rgb(out) = dilated else {
            unreachable!("color input stays color");
        };
        assert_eq!(out.get_pixel(1, 1).0, [255, 200, 0]);
        assert_eq!(out.get_pixel(4, 4).0, [0, 200, 0]);
    }

    #[test]
    fn erode_then_dilate_differs_from_dilate_then_erode() {
        // Opening removes the dot; closing keeps it.
        let opened = apply(&apply(&dot(), MorphOp::Erode, 3), MorphOp::Dilate, 3);
        let closed = apply(&apply(&dot(), MorphOp::Dilate, 3), MorphOp::Erode, 3);
        assert_ne!(opened, closed);
        assert_eq!(white_count(&opened), 0);
        assert_eq!(white_count(&closed), 1);
    }

    #[test]
    fn dimensions_preserved() {
        let img = Raster::Rgb(RgbImage::new(17, 31));
        let out = apply(&img, MorphOp::Erode, 7);
        assert_eq!(out.dimensions(), img.dimensions());
    }
}
