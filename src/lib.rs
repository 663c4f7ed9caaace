mod error;
mod notification;
mod recolor;
mod source;
mod task;
mod utils;

#[cfg(test)]
mod test_utils;

use image::{ImageBuffer, Pixel};

// Stop sources accepted by `RegionRecolor::recolor_region_cancellable`
pub use enough::{Stop, StopReason, Unstoppable};

pub use error::{RecolorError, SourceError, TaskError};
pub use notification::NotificationSource;
pub use recolor::color_picker::{rgb_from_argb, ColorPicker, Swatch};
pub use recolor::gaussian::{gaussian_kernel, GaussianBlur};
pub use recolor::hsv::{reference_hue, rgb_to_hsv, ConvertToHsv, Hsv};
pub use recolor::hue_mask::{apply_mask, attenuate, open_mask, threshold_hue};
pub use recolor::region_recolor::{
    RegionRecolor, ATTENUATION, BLUR_KERNEL_SIZE, BLUR_SIGMA, HUE_TOLERANCE,
    STRUCTURING_ELEMENT_SIZE,
};
pub use recolor::structuring_element::{ellipse_image, ellipse_mask};
pub use recolor::RecolorablePixel;
pub use source::{load_raster, raster_from_raw, ImageSource};
pub use task::slots::{SlotEvent, SlotRunner};
pub use task::{CancellationToken, RecolorTask, TaskHandle, TaskOutcome};

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;
