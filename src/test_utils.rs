//! Test utilities for chameleon-recolor
//!
//! This module provides common fixtures for testing the recoloring pipeline.
//! It is only compiled when running tests.

use std::ops::Range;

use image::Rgb;
use imageproc::definitions::Image;

/// Creates a test RGB image with predefined pixel values for testing.
///
/// This function creates a 2x2 test image with known pixel values:
/// - (0,0): [200, 150, 100]
/// - (1,0): [100, 200, 150]
/// - (0,1): [150, 100, 200]
/// - (1,1): [50, 75, 25]
pub fn create_test_rgb_image() -> Image<Rgb<u8>> {
    let mut image: Image<Rgb<u8>> = Image::new(2, 2);
    image.put_pixel(0, 0, Rgb([200, 150, 100]));
    image.put_pixel(1, 0, Rgb([100, 200, 150]));
    image.put_pixel(0, 1, Rgb([150, 100, 200]));
    image.put_pixel(1, 1, Rgb([50, 75, 25]));
    image
}

/// Creates an image filled with `outside`, with a square block of `inside`
/// covering `block` on both axes.
pub fn create_block_image(
    width: u32,
    height: u32,
    block: Range<u32>,
    inside: Rgb<u8>,
    outside: Rgb<u8>,
) -> Image<Rgb<u8>> {
    Image::from_fn(width, height, |x, y| {
        if block.contains(&x) && block.contains(&y) {
            inside
        } else {
            outside
        }
    })
}

/// Installs a test-friendly `tracing` subscriber honoring `RUST_LOG`.
///
/// Safe to call from several tests; only the first call installs it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
