//! Target color selection
//!
//! Colors come either from a point the user touched or from a small palette
//! of the most common colors in the photo.

use std::collections::HashMap;

use image::{Pixel, Rgb};
use imageproc::definitions::Image;
use itertools::Itertools;

use crate::error::RecolorError;
use crate::recolor::RecolorablePixel;
use crate::utils::validate_non_empty_image;

/// Bits kept per channel when bucketing colors for the palette.
const QUANTIZE_BITS: u32 = 5;

/// A palette entry: the mean color of a bucket and how many pixels fell in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub color: Rgb<u8>,
    pub population: u32,
}

/// Unpacks an `0xAARRGGBB` color integer, dropping alpha.
///
/// ```
/// use chameleon_recolor::rgb_from_argb;
/// use image::Rgb;
///
/// assert_eq!(rgb_from_argb(0xFF3B5998), Rgb([0x3B, 0x59, 0x98]));
/// ```
pub const fn rgb_from_argb(argb: u32) -> Rgb<u8> {
    Rgb([(argb >> 16) as u8, (argb >> 8) as u8, argb as u8])
}

/// Ways of choosing a target color from an image.
pub trait ColorPicker {
    /// Returns the color under `(x, y)`.
    ///
    /// # Errors
    ///
    /// * `RecolorError::PixelOutOfBounds` - The point lies outside the image
    fn pick_color(&self, x: u32, y: u32) -> Result<Rgb<u8>, RecolorError>;

    /// Returns up to `count` swatches, most populated first.
    ///
    /// Pixels are bucketed by the top 5 bits of each channel; each swatch is
    /// the average of the pixels in its bucket. Ties are broken by bucket
    /// index so the order is deterministic.
    ///
    /// # Errors
    ///
    /// * `RecolorError::EmptyImage` - The image has a zero dimension
    /// * `RecolorError::InvalidParameter` - `count` is zero
    fn dominant_colors(&self, count: usize) -> Result<Vec<Swatch>, RecolorError>;
}

impl<P> ColorPicker for Image<P>
where
    P: RecolorablePixel,
{
    fn pick_color(&self, x: u32, y: u32) -> Result<Rgb<u8>, RecolorError> {
        let (width, height) = self.dimensions();
        self.get_pixel_checked(x, y)
            .map(Pixel::to_rgb)
            .ok_or(RecolorError::PixelOutOfBounds {
                x,
                y,
                width,
                height,
            })
    }

    fn dominant_colors(&self, count: usize) -> Result<Vec<Swatch>, RecolorError> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;
        if count == 0 {
            return Err(RecolorError::InvalidParameter(
                "palette size must be > 0".to_owned(),
            ));
        }

        let mut buckets: HashMap<u32, ([u64; 3], u32)> = HashMap::new();
        for pixel in self.pixels() {
            let Rgb([r, g, b]) = pixel.to_rgb();
            let (sums, population) = buckets.entry(bucket_index(r, g, b)).or_default();
            sums[0] += u64::from(r);
            sums[1] += u64::from(g);
            sums[2] += u64::from(b);
            *population += 1;
        }

        let swatches = buckets
            .into_iter()
            .sorted_by(|(index_a, (_, a)), (index_b, (_, b))| {
                b.cmp(a).then(index_a.cmp(index_b))
            })
            .take(count)
            .map(|(_, (sums, population))| {
                let mean = |sum: u64| ((sum + u64::from(population) / 2) / u64::from(population)) as u8;
                Swatch {
                    color: Rgb([mean(sums[0]), mean(sums[1]), mean(sums[2])]),
                    population,
                }
            })
            .collect();

        Ok(swatches)
    }
}

#[inline]
fn bucket_index(r: u8, g: u8, b: u8) -> u32 {
    let shift = 8 - QUANTIZE_BITS;
    (u32::from(r >> shift) << (2 * QUANTIZE_BITS))
        | (u32::from(g >> shift) << QUANTIZE_BITS)
        | u32::from(b >> shift)
}
