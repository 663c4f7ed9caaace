//! Elliptical structuring elements for grayscale morphology
//!
//! The ellipse is inscribed in a `size`x`size` box: for each row offset `dy`
//! from the center, the row spans `c - dx ..= c + dx` where
//! `dx = round(c * sqrt(1 - dy² / r²))`. This reproduces the classic
//! `MORPH_ELLIPSE` geometry, which is slightly wider than a Euclidean disk
//! on the middle rows.

use image::{GrayImage, Luma};
use imageproc::morphology::Mask;

use crate::error::RecolorError;

/// Largest element side accepted by [`Mask::from_image`].
pub const MAX_ELEMENT_SIZE: u32 = 511;

/// Renders a `size`x`size` ellipse as a binary image (255 inside, 0 outside).
///
/// # Errors
///
/// * `RecolorError::InvalidParameter` - `size` is zero or larger than [`MAX_ELEMENT_SIZE`]
pub fn ellipse_image(size: u32) -> Result<GrayImage, RecolorError> {
    if size == 0 || size > MAX_ELEMENT_SIZE {
        return Err(RecolorError::InvalidParameter(format!(
            "structuring element size must be in 1..={MAX_ELEMENT_SIZE}, got {size}"
        )));
    }

    let radius = i64::from(size / 2);
    let center = i64::from(size / 2);
    let inv_r2 = if radius > 0 {
        1.0 / (radius * radius) as f64
    } else {
        0.0
    };

    let mut element = GrayImage::new(size, size);
    for row in 0..size {
        let dy = i64::from(row) - radius;
        if dy.abs() > radius {
            continue;
        }
        let dx = (center as f64 * (((radius * radius - dy * dy) as f64) * inv_r2).sqrt()).round()
            as i64;
        let start = (center - dx).max(0);
        let end = (center + dx + 1).min(i64::from(size));
        for column in start..end {
            element.put_pixel(column as u32, row, Luma([255]));
        }
    }

    Ok(element)
}

/// Builds an elliptical [`Mask`] anchored at its center pixel.
///
/// # Errors
///
/// * `RecolorError::InvalidParameter` - `size` is zero or larger than [`MAX_ELEMENT_SIZE`]
pub fn ellipse_mask(size: u32) -> Result<Mask, RecolorError> {
    let element = ellipse_image(size)?;
    let anchor = (size / 2) as u8;
    Ok(Mask::from_image(&element, anchor, anchor))
}
