//! Fixed-size separable Gaussian blur for 8-bit masks
//!
//! Unlike a sigma-derived kernel, the kernel width here is chosen by the
//! caller, so a 9-tap kernel with σ = 3 stays 9 taps wide. Borders are
//! extended with reflect-101 (`dcb|abcd|cba`), and the result is rounded back
//! to 8 bits.

use image::{GrayImage, ImageBuffer};

use crate::error::RecolorError;
use crate::utils::{reflect_101, round_f32_to_u8, validate_non_empty_image};

/// Builds a normalized 1-D Gaussian kernel of `size` taps.
///
/// # Errors
///
/// * `RecolorError::InvalidParameter` - `size` is even or zero, or `sigma` is not positive
pub fn gaussian_kernel(size: usize, sigma: f64) -> Result<Vec<f32>, RecolorError> {
    if size == 0 || size % 2 == 0 {
        return Err(RecolorError::InvalidParameter(format!(
            "kernel size must be odd and positive, got {size}"
        )));
    }
    if sigma.is_nan() || sigma <= 0.0 {
        return Err(RecolorError::InvalidParameter(format!(
            "sigma must be positive, got {sigma}"
        )));
    }

    let center = (size / 2) as f64;
    let scale = -0.5 / (sigma * sigma);
    let weights: Vec<f64> = (0..size)
        .map(|i| {
            let x = i as f64 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();

    Ok(weights.iter().map(|w| (w / sum) as f32).collect())
}

/// Gaussian smoothing with an explicit kernel size.
pub trait GaussianBlur {
    /// Filter output type
    type Output;

    /// Blurs with a `size`x`size` Gaussian kernel of standard deviation `sigma`
    /// on both axes.
    ///
    /// # Errors
    ///
    /// * `RecolorError::EmptyImage` - The image has a zero dimension
    /// * `RecolorError::InvalidParameter` - Invalid kernel size or sigma
    fn gaussian_blur(&self, size: usize, sigma: f64) -> Result<Self::Output, RecolorError>;
}

impl GaussianBlur for GrayImage {
    type Output = Self;

    fn gaussian_blur(&self, size: usize, sigma: f64) -> Result<Self::Output, RecolorError> {
        let (width, height) = self.dimensions();
        validate_non_empty_image(width, height)?;
        let kernel = gaussian_kernel(size, sigma)?;

        let horizontal = convolve_rows(self, &kernel);
        let vertical = convolve_columns(&horizontal, width, height, &kernel);

        ImageBuffer::from_raw(
            width,
            height,
            vertical.into_iter().map(round_f32_to_u8).collect(),
        )
        .ok_or(RecolorError::ImageBufferCreationFailed)
    }
}

/// Horizontal pass, kept in `f32` so the vertical pass rounds only once.
fn convolve_rows(image: &GrayImage, kernel: &[f32]) -> Vec<f32> {
    let (width, height) = image.dimensions();
    let radius = (kernel.len() / 2) as i64;
    let row_len = width as usize;
    let raw = image.as_raw();

    let mut output = vec![0.0f32; row_len * height as usize];
    for (row, out_row) in raw
        .chunks_exact(row_len)
        .zip(output.chunks_exact_mut(row_len))
    {
        for (x, out) in out_row.iter_mut().enumerate() {
            *out = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let source = reflect_101(x as i64 + k as i64 - radius, i64::from(width));
                    weight * f32::from(row[source])
                })
                .sum();
        }
    }
    output
}

fn convolve_columns(data: &[f32], width: u32, height: u32, kernel: &[f32]) -> Vec<f32> {
    let radius = (kernel.len() / 2) as i64;
    let row_len = width as usize;

    let mut output = vec![0.0f32; data.len()];
    for y in 0..height as usize {
        for x in 0..row_len {
            output[y * row_len + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let source = reflect_101(y as i64 + k as i64 - radius, i64::from(height));
                    weight * data[source * row_len + x]
                })
                .sum();
        }
    }
    output
}
