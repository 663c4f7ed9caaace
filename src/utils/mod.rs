//! Internal utility functions for chameleon-recolor.
//!
//! This module contains common functionality used across the pipeline stages.

use imageproc::definitions::Clamp;

use crate::error::RecolorError;

/// Rounds a floating-point value to the nearest integer and clamps it into `u8`.
///
/// `imageproc`'s [`Clamp`] truncates, so the value is rounded first. Ties
/// round away from zero.
#[inline]
pub fn round_f32_to_u8(value: f32) -> u8 {
    <u8 as Clamp<f32>>::clamp(value.round())
}

/// Validates that an image has non-zero dimensions.
///
/// # Arguments
///
/// * `width` - The width of the image
/// * `height` - The height of the image
///
/// # Returns
///
/// `Ok(())` if the dimensions are valid, otherwise [`RecolorError::EmptyImage`]
pub fn validate_non_empty_image(width: u32, height: u32) -> Result<(), RecolorError> {
    if width == 0 || height == 0 {
        Err(RecolorError::EmptyImage { width, height })
    } else {
        Ok(())
    }
}

/// Validates that a raw interleaved buffer holds exactly `width * height` pixels.
///
/// # Arguments
///
/// * `width` - The width of the image
/// * `height` - The height of the image
/// * `channels` - Number of interleaved channels per pixel
/// * `actual` - Length of the buffer in bytes
pub fn validate_buffer_len(
    width: u32,
    height: u32,
    channels: usize,
    actual: usize,
) -> Result<(), RecolorError> {
    let expected = width as usize * height as usize * channels;
    if expected == actual {
        Ok(())
    } else {
        Err(RecolorError::BufferSizeMismatch { expected, actual })
    }
}

/// Maps an out-of-range index back into `0..len` by mirroring around the
/// edge pixels without repeating them (`gfedcb|abcdefgh|gfedcba`).
///
/// Handles offsets larger than the image by reflecting repeatedly. A
/// single-pixel axis always maps to index 0.
#[inline]
pub fn reflect_101(index: i64, len: i64) -> usize {
    if len == 1 {
        return 0;
    }
    let mut p = index;
    while p < 0 || p >= len {
        if p < 0 {
            p = -p;
        } else {
            p = 2 * (len - 1) - p;
        }
    }
    p as usize
}
