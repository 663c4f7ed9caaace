//! 8-bit RGB to HSV conversion
//!
//! Hue is stored on the 0-180 scale (degrees halved) so that it fits a byte,
//! saturation and value on 0-255. Achromatic pixels (`max == min`) get hue 0.
//! Rounding follows the usual fixed-point formulation: halves round up, and
//! negative hues in the red sector wrap by +180, so hue never reaches 180.

use image::{ImageBuffer, Luma, Rgb};
use imageproc::definitions::Image;
use itertools::Itertools;

use crate::error::RecolorError;
use crate::recolor::RecolorablePixel;
use crate::utils::validate_non_empty_image;

/// Upper bound (exclusive) of the 8-bit hue scale.
pub const HUE_RANGE: i32 = 180;

/// A single pixel in the 8-bit HSV color space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsv {
    /// Hue in `0..180`
    pub hue: u8,
    /// Saturation in `0..=255`
    pub saturation: u8,
    /// Value (brightness) in `0..=255`
    pub value: u8,
}

/// Converts one RGB triple to HSV.
///
/// # Examples
///
/// ```
/// use chameleon_recolor::{rgb_to_hsv, Hsv};
/// use image::Rgb;
///
/// assert_eq!(
///     rgb_to_hsv(Rgb([0, 0, 255])),
///     Hsv { hue: 120, saturation: 255, value: 255 }
/// );
/// ```
pub fn rgb_to_hsv(pixel: Rgb<u8>) -> Hsv {
    let Rgb([r, g, b]) = pixel;
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));

    let value = r.max(g).max(b);
    let diff = value - r.min(g).min(b);

    let saturation = if value == 0 {
        0
    } else {
        round_half_up(255.0 * f64::from(diff) / f64::from(value))
    };

    let hue = if diff == 0 {
        0
    } else {
        let sector = if value == r {
            g - b
        } else if value == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let hue = round_half_up(30.0 * f64::from(sector) / f64::from(diff));
        if hue < 0 {
            hue + HUE_RANGE
        } else {
            hue
        }
    };

    Hsv {
        hue: hue as u8,
        saturation: saturation as u8,
        value: value as u8,
    }
}

#[inline]
fn round_half_up(x: f64) -> i32 {
    (x + 0.5).floor() as i32
}

/// Color space conversion into HSV.
pub trait ConvertToHsv {
    /// Converts every pixel to HSV, packed as `Rgb([hue, saturation, value])`.
    ///
    /// # Errors
    ///
    /// * `RecolorError::EmptyImage` - The image has a zero dimension
    fn to_hsv(&self) -> Result<Image<Rgb<u8>>, RecolorError>;

    /// Converts every pixel to HSV and keeps only the hue channel.
    ///
    /// # Errors
    ///
    /// * `RecolorError::EmptyImage` - The image has a zero dimension
    fn hue_plane(&self) -> Result<Image<Luma<u8>>, RecolorError>;
}

impl<P> ConvertToHsv for Image<P>
where
    P: RecolorablePixel,
{
    fn to_hsv(&self) -> Result<Image<Rgb<u8>>, RecolorError> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;

        let data = self
            .pixels()
            .flat_map(|pixel| {
                let Hsv {
                    hue,
                    saturation,
                    value,
                } = rgb_to_hsv(pixel.to_rgb());
                [hue, saturation, value]
            })
            .collect_vec();

        ImageBuffer::from_raw(width, height, data).ok_or(RecolorError::ImageBufferCreationFailed)
    }

    fn hue_plane(&self) -> Result<Image<Luma<u8>>, RecolorError> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;

        let data = hue_plane_impl(self.as_raw(), usize::from(P::CHANNEL_COUNT));

        ImageBuffer::from_raw(width, height, data).ok_or(RecolorError::ImageBufferCreationFailed)
    }
}

#[cfg(not(feature = "rayon"))]
fn hue_plane_impl(raw: &[u8], channels: usize) -> Vec<u8> {
    raw.chunks_exact(channels)
        .map(|pixel| rgb_to_hsv(Rgb([pixel[0], pixel[1], pixel[2]])).hue)
        .collect()
}

#[cfg(feature = "rayon")]
fn hue_plane_impl(raw: &[u8], channels: usize) -> Vec<u8> {
    use rayon::prelude::*;

    raw.par_chunks_exact(channels)
        .map(|pixel| rgb_to_hsv(Rgb([pixel[0], pixel[1], pixel[2]])).hue)
        .collect()
}

/// Determines the hue of a single color by converting a private one-pixel
/// raster, the same way the full image is converted.
///
/// # Errors
///
/// * `RecolorError::HueUnavailable` - The conversion produced no pixel
pub fn reference_hue(target: Rgb<u8>) -> Result<u8, RecolorError> {
    let sample: Image<Rgb<u8>> = ImageBuffer::from_pixel(1, 1, target);
    let hsv = sample.to_hsv().map_err(|_| RecolorError::HueUnavailable)?;
    hsv.get_pixel_checked(0, 0)
        .map(|pixel| pixel[0])
        .ok_or(RecolorError::HueUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn primaries_and_secondaries() {
        assert_eq!(rgb_to_hsv(Rgb([255, 0, 0])).hue, 0);
        assert_eq!(rgb_to_hsv(Rgb([255, 255, 0])).hue, 30);
        assert_eq!(rgb_to_hsv(Rgb([0, 255, 0])).hue, 60);
        assert_eq!(rgb_to_hsv(Rgb([0, 255, 255])).hue, 90);
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 255])).hue, 120);
        assert_eq!(rgb_to_hsv(Rgb([255, 0, 255])).hue, 150);
    }

    #[test]
    fn gray_has_zero_hue_and_saturation() {
        let hsv = rgb_to_hsv(Rgb([128, 128, 128]));
        assert_eq!(
            hsv,
            Hsv {
                hue: 0,
                saturation: 0,
                value: 128
            }
        );
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 0])).saturation, 0);
    }

    #[test]
    fn saturation_is_relative_to_value() {
        // diff 100 over value 200
        assert_eq!(rgb_to_hsv(Rgb([200, 100, 100])).saturation, 128);
        assert_eq!(rgb_to_hsv(Rgb([200, 0, 0])).saturation, 255);
    }

    #[test]
    fn red_sector_wraps_below_zero() {
        // blue slightly above green: negative sector, wraps to the top of the scale
        let hsv = rgb_to_hsv(Rgb([255, 0, 60]));
        assert_eq!(hsv.hue, 173);
        assert!(i32::from(rgb_to_hsv(Rgb([255, 0, 1])).hue) < HUE_RANGE);
    }

    #[test]
    fn hue_never_reaches_range_end() {
        for r in (0..=255).step_by(15) {
            for g in (0..=255).step_by(15) {
                for b in (0..=255).step_by(15) {
                    let hsv = rgb_to_hsv(Rgb([r as u8, g as u8, b as u8]));
                    assert!(i32::from(hsv.hue) < HUE_RANGE);
                }
            }
        }
    }

    #[test]
    fn hue_plane_matches_per_pixel_conversion() {
        let image = crate::test_utils::create_test_rgb_image();
        let plane = image.hue_plane().unwrap();
        for (x, y, pixel) in image.enumerate_pixels() {
            assert_eq!(plane.get_pixel(x, y)[0], rgb_to_hsv(*pixel).hue);
        }
    }

    #[test]
    fn rgba_conversion_ignores_alpha() {
        let opaque: Image<Rgba<u8>> = ImageBuffer::from_pixel(2, 2, Rgba([0, 255, 0, 255]));
        let clear: Image<Rgba<u8>> = ImageBuffer::from_pixel(2, 2, Rgba([0, 255, 0, 0]));
        assert_eq!(opaque.hue_plane().unwrap(), clear.hue_plane().unwrap());
        assert_eq!(opaque.to_hsv().unwrap().get_pixel(1, 1), &Rgb([60, 255, 255]));
    }

    #[test]
    fn empty_image_is_rejected() {
        let empty: Image<Rgb<u8>> = ImageBuffer::new(0, 3);
        assert_eq!(
            empty.to_hsv(),
            Err(RecolorError::EmptyImage {
                width: 0,
                height: 3
            })
        );
        assert!(empty.hue_plane().is_err());
    }

    #[test]
    fn reference_hue_of_target_colors() {
        assert_eq!(reference_hue(Rgb([255, 0, 0])), Ok(0));
        assert_eq!(reference_hue(Rgb([0, 0, 255])), Ok(120));
        assert_eq!(reference_hue(Rgb([128, 128, 128])), Ok(0));
    }
}
