use enough::StopReason;
use thiserror::Error;

/// Error type for region recoloring operations
///
/// This error type represents the failure modes of the recoloring pipeline
/// and of the helpers that feed it (raw buffer validation, color sampling).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecolorError {
    /// The image has a zero width or height
    ///
    /// This error is raised before any processing takes place, so no
    /// partial output is ever produced for an empty image.
    #[error("Image dimensions must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    /// Image and mask dimensions do not match
    #[error("Image and mask dimensions do not match: expected {expected:?}, actual {actual:?}")]
    DimensionMismatch {
        /// Expected dimensions (width, height)
        expected: (u32, u32),
        /// Actual dimensions (width, height)
        actual: (u32, u32),
    },

    /// A raw pixel buffer does not hold exactly `width * height` pixels
    #[error("Pixel buffer length mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        /// Expected buffer length in bytes
        expected: usize,
        /// Actual buffer length in bytes
        actual: usize,
    },

    /// The reference pixel could not be converted to a usable hue
    ///
    /// Returned instead of a zeroed or corrupt image when the single-pixel
    /// color space conversion yields nothing.
    #[error("Failed to determine the reference hue of the target color")]
    HueUnavailable,

    /// Failed to create an image buffer from processed pixels
    #[error("Failed to create ImageBuffer from processed pixels")]
    ImageBufferCreationFailed,

    /// A pixel coordinate lies outside the image
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} image")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Invalid parameter provided to the operation
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The caller's stop source asked the pipeline to stop between stages
    #[error("Recoloring stopped: {0:?}")]
    Stopped(StopReason),
}

impl From<StopReason> for RecolorError {
    fn from(reason: StopReason) -> Self {
        Self::Stopped(reason)
    }
}

/// Error type for image sources
///
/// Decoding failures come from the `image` crate; everything else is a
/// validation failure of the decoded raster.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The file could not be opened or decoded
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The decoded raster is not usable by the recoloring pipeline
    #[error(transparent)]
    Invalid(#[from] RecolorError),
}

/// Error type for background task infrastructure
///
/// These describe failures of the worker itself, not of the computation it
/// was running. Cancellation is never reported through this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The recoloring computation itself failed
    #[error(transparent)]
    Recolor(#[from] RecolorError),

    /// The worker thread could not be started
    #[error("Failed to spawn worker thread: {0}")]
    SpawnFailed(String),

    /// The worker thread panicked before producing an outcome
    #[error("Worker thread panicked")]
    WorkerPanicked,
}
