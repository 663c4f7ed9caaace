//! Decoded rasters handed to the recoloring pipeline
//!
//! Decoding itself belongs to the `image` crate; this module only turns its
//! output, or a raw buffer, into a validated 8-bit RGB raster.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Rgb, Rgba};
use imageproc::definitions::Image;
use tracing::debug;

use crate::error::{RecolorError, SourceError};
use crate::utils::{validate_buffer_len, validate_non_empty_image};

/// Anything that can supply a non-empty RGB raster.
pub trait ImageSource {
    /// Returns the raster as 8-bit RGB.
    ///
    /// # Errors
    ///
    /// * `RecolorError::EmptyImage` - The raster has a zero dimension
    fn to_raster(&self) -> Result<Image<Rgb<u8>>, RecolorError>;
}

impl ImageSource for Image<Rgb<u8>> {
    fn to_raster(&self) -> Result<Image<Rgb<u8>>, RecolorError> {
        validate_non_empty_image(self.width(), self.height())?;
        Ok(self.clone())
    }
}

impl ImageSource for Image<Rgba<u8>> {
    fn to_raster(&self) -> Result<Image<Rgb<u8>>, RecolorError> {
        validate_non_empty_image(self.width(), self.height())?;
        Ok(DynamicImage::ImageRgba8(self.clone()).to_rgb8())
    }
}

impl ImageSource for DynamicImage {
    fn to_raster(&self) -> Result<Image<Rgb<u8>>, RecolorError> {
        validate_non_empty_image(self.width(), self.height())?;
        Ok(self.to_rgb8())
    }
}

/// Builds an RGB raster from an interleaved `RGBRGB...` buffer.
///
/// # Errors
///
/// * `RecolorError::EmptyImage` - `width` or `height` is zero
/// * `RecolorError::BufferSizeMismatch` - `data` is not `width * height * 3` bytes
pub fn raster_from_raw(
    width: u32,
    height: u32,
    data: Vec<u8>,
) -> Result<Image<Rgb<u8>>, RecolorError> {
    validate_non_empty_image(width, height)?;
    validate_buffer_len(width, height, 3, data.len())?;
    ImageBuffer::from_raw(width, height, data).ok_or(RecolorError::ImageBufferCreationFailed)
}

/// Decodes an image file into an RGB raster.
///
/// Which formats can be decoded depends on the enabled `image` codecs (see
/// the `jpeg` and `png` features).
///
/// # Errors
///
/// * `SourceError::Decode` - The file could not be read or decoded
/// * `SourceError::Invalid` - The decoded image is empty
pub fn load_raster<Q: AsRef<Path>>(path: Q) -> Result<Image<Rgb<u8>>, SourceError> {
    let path = path.as_ref();
    let decoded = image::open(path)?;
    debug!(
        path = %path.display(),
        width = decoded.width(),
        height = decoded.height(),
        "decoded source image"
    );
    Ok(decoded.to_raster()?)
}
