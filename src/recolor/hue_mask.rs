//! Stages that turn a hue plane into a soft, attenuated highlight mask
//!
//! Each stage maps a single-channel 8-bit raster to another one of the same
//! size, and every value stays in `0..=255` throughout.

use image::{GrayImage, Luma, Pixel};
use imageproc::definitions::Image;
use imageproc::map::map_colors;
use imageproc::morphology::{grayscale_dilate, grayscale_erode, Mask};

use crate::error::RecolorError;

/// Builds a binary mask: 255 where `hue` lies within `reference ± tolerance`
/// (inclusive), 0 elsewhere.
///
/// The window does not wrap around the 0/180 boundary, so a reference hue of
/// 2 accepts `0..=12` and nothing near 179.
pub fn threshold_hue(hue: &GrayImage, reference: u8, tolerance: u8) -> GrayImage {
    let lower = i16::from(reference) - i16::from(tolerance);
    let upper = i16::from(reference) + i16::from(tolerance);

    map_colors(hue, |Luma([h])| {
        let h = i16::from(h);
        Luma([if (lower..=upper).contains(&h) { 255 } else { 0 }])
    })
}

/// Morphological opening: erosion followed by dilation with the same element.
///
/// Removes bright specks smaller than the element while keeping the outline
/// of larger regions. Pixels outside the image are ignored, so regions
/// touching the border are not eroded from outside.
pub fn open_mask(mask: &GrayImage, element: &Mask) -> GrayImage {
    let eroded = grayscale_erode(mask, element);
    grayscale_dilate(&eroded, element)
}

/// Scales every mask value by `factor`, rounding to the nearest integer
/// (ties to even) and saturating into `0..=255`.
pub fn attenuate(mask: &GrayImage, factor: f64) -> GrayImage {
    map_colors(mask, |Luma([value])| {
        let scaled = (f64::from(value) * factor).round_ties_even();
        Luma([scaled.clamp(0.0, 255.0) as u8])
    })
}

/// Adds the mask value to every color channel of the matching pixel with
/// saturating arithmetic. Alpha, if present, is left untouched.
///
/// # Errors
///
/// * `RecolorError::DimensionMismatch` - The mask size differs from the image size
pub fn apply_mask<P>(image: &Image<P>, mask: &GrayImage) -> Result<Image<P>, RecolorError>
where
    P: Pixel<Subpixel = u8>,
{
    if image.dimensions() != mask.dimensions() {
        return Err(RecolorError::DimensionMismatch {
            expected: image.dimensions(),
            actual: mask.dimensions(),
        });
    }

    let mut output = image.clone();
    for (pixel, Luma([boost])) in output.pixels_mut().zip(mask.pixels()) {
        let boost = *boost;
        pixel.apply_with_alpha(|channel| channel.saturating_add(boost), |alpha| alpha);
    }
    Ok(output)
}
