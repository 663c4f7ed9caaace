//! Hue-matched region recoloring
//!
//! Brightens every part of an image whose hue is close to a target color,
//! with a boost that is spatially cleaned up and feathered so one coherent
//! region appears to glow.
//!
//! ## Pipeline
//!
//! 1. Reference hue: the target color converted to HSV (0-180 hue scale).
//! 2. Hue plane of the image; pixel (0,0) of this private plane carries the
//!    reference hue, as if the working copy's corner had been painted with
//!    the target color. The caller's buffer is never written.
//! 3. Threshold at `reference ± 10` into a binary mask.
//! 4. Opening (erode, then dilate) with a 15x15 ellipse.
//! 5. 9x9 Gaussian blur, σ = 3.
//! 6. Attenuation by 0.35 (maximum boost 89).
//! 7. Saturating addition of the mask to R, G and B of the source.
//!
//! The parameters are fixed so results are reproducible across callers.

use enough::{Stop, Unstoppable};
use image::{Luma, Rgb};
use imageproc::definitions::Image;
use tracing::{debug, instrument};

use crate::error::RecolorError;
use crate::recolor::gaussian::GaussianBlur;
use crate::recolor::hsv::{reference_hue, ConvertToHsv};
use crate::recolor::hue_mask::{apply_mask, attenuate, open_mask, threshold_hue};
use crate::recolor::structuring_element::ellipse_mask;
use crate::recolor::RecolorablePixel;
use crate::utils::validate_non_empty_image;

/// Half-width of the accepted hue window, on the 0-180 scale.
pub const HUE_TOLERANCE: u8 = 10;

/// Side of the elliptical structuring element used for the opening.
pub const STRUCTURING_ELEMENT_SIZE: u32 = 15;

/// Side of the Gaussian kernel.
pub const BLUR_KERNEL_SIZE: usize = 9;

/// Standard deviation of the Gaussian kernel, on both axes.
pub const BLUR_SIGMA: f64 = 3.0;

/// Multiplier applied to the blurred mask before it is added.
pub const ATTENUATION: f64 = 0.35;

/// Region recoloring for RGB and RGBA images.
pub trait RegionRecolor {
    /// Recolored image type
    type Output;

    /// Produces a new image in which the region matching the hue of `target`
    /// glows.
    ///
    /// The output has the same dimensions as `self`; `self` is not modified.
    ///
    /// # Errors
    ///
    /// * `RecolorError::EmptyImage` - The image has a zero dimension
    /// * `RecolorError::HueUnavailable` - No hue could be derived from `target`
    ///
    /// # Examples
    ///
    /// ```
    /// use chameleon_recolor::{Image, RegionRecolor};
    /// use image::Rgb;
    ///
    /// # fn example() -> Result<(), chameleon_recolor::RecolorError> {
    /// let gray: Image<Rgb<u8>> = Image::from_pixel(4, 4, Rgb([128, 128, 128]));
    /// let glowing = gray.recolor_region(Rgb([255, 0, 0]))?;
    /// assert_eq!(glowing.get_pixel(2, 2), &Rgb([217, 217, 217]));
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    fn recolor_region(&self, target: Rgb<u8>) -> Result<Self::Output, RecolorError>;

    /// Like [`recolor_region`](Self::recolor_region), but asks `stop`
    /// whether to continue between pipeline stages.
    ///
    /// Returns `Ok(None)` once `stop` reports a
    /// [`StopReason`](enough::StopReason). A stage that has already started
    /// runs to completion first. Intermediate buffers are dropped before
    /// returning.
    fn recolor_region_cancellable<S>(
        &self,
        target: Rgb<u8>,
        stop: &S,
    ) -> Result<Option<Self::Output>, RecolorError>
    where
        S: Stop + ?Sized;
}

impl<P> RegionRecolor for Image<P>
where
    P: RecolorablePixel,
{
    type Output = Self;

    fn recolor_region(&self, target: Rgb<u8>) -> Result<Self::Output, RecolorError> {
        run_pipeline(self, target, &Unstoppable)
    }

    fn recolor_region_cancellable<S>(
        &self,
        target: Rgb<u8>,
        stop: &S,
    ) -> Result<Option<Self::Output>, RecolorError>
    where
        S: Stop + ?Sized,
    {
        match run_pipeline(self, target, stop) {
            Ok(image) => Ok(Some(image)),
            Err(RecolorError::Stopped(reason)) => {
                debug!(?reason, "recoloring stopped");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}

/// Runs the stages in order, checking `stop` between them.
#[instrument(level = "debug", skip_all, fields(width = image.width(), height = image.height()))]
fn run_pipeline<P, S>(image: &Image<P>, target: Rgb<u8>, stop: &S) -> Result<Image<P>, RecolorError>
where
    P: RecolorablePixel,
    S: Stop + ?Sized,
{
    let (width, height) = image.dimensions();
    validate_non_empty_image(width, height)?;

    let reference = reference_hue(target)?;
    debug!(?target, reference, "reference hue");

    let mut hue = image.hue_plane()?;
    hue.put_pixel(0, 0, Luma([reference]));
    stop.check()?;

    let mask = threshold_hue(&hue, reference, HUE_TOLERANCE);
    drop(hue);
    stop.check()?;

    let element = ellipse_mask(STRUCTURING_ELEMENT_SIZE)?;
    let mask = open_mask(&mask, &element);
    stop.check()?;

    let mask = mask.gaussian_blur(BLUR_KERNEL_SIZE, BLUR_SIGMA)?;
    stop.check()?;

    let mask = attenuate(&mask, ATTENUATION);
    debug!(
        peak_boost = mask.pixels().map(|p| p[0]).max().unwrap_or(0),
        "hue mask ready"
    );
    stop.check()?;

    apply_mask(image, &mask)
}
