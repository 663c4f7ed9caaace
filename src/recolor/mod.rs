pub mod color_picker;
pub mod gaussian;
pub mod hsv;
pub mod hue_mask;
pub mod region_recolor;
pub mod structuring_element;

use image::{Pixel, Rgb, Rgba};

mod sealed {
    pub trait Sealed {}
    impl Sealed for image::Rgb<u8> {}
    impl Sealed for image::Rgba<u8> {}
}

/// 8-bit RGB or RGBA pixels, the layouts the recoloring pipeline accepts.
///
/// The first three channels are red, green and blue. Any further channel is
/// alpha and passes through untouched.
pub trait RecolorablePixel: Pixel<Subpixel = u8> + sealed::Sealed {}

impl RecolorablePixel for Rgb<u8> {}
impl RecolorablePixel for Rgba<u8> {}
