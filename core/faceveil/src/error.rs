use thiserror::Error;

/// Error that aborts an obscuring call. Nothing is returned for the image.
#[derive(Debug, Error)]
pub enum ObscureError {
    /// No detector was configured, or it reported it is not ready.
    #[error("face detection models are not loaded yet")]
    ModelsNotLoaded,

    /// The primary detection pass failed.
    #[error("face detection failed: {0}")]
    DetectionFailure(String),

    /// The input bytes are not a supported image.
    #[error("failed to decode image: {0}")]
    DecodeError(String),

    /// The image has zero width or height.
    #[error("image dimensions are zero")]
    ZeroDimensions,

    /// PNG encoding of the result failed.
    #[error("failed to encode image: {0}")]
    EncodeError(String),

    /// `min_confidence` outside `0.0..=1.0`.
    #[error("min confidence must be between 0.0 and 1.0, got {0}")]
    InvalidConfidence(f32),

    /// The solid fill color could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// The emoji is empty or whitespace only.
    #[error("emoji must not be empty")]
    EmptyEmoji,

    /// A detector model file could not be read or parsed.
    #[error("failed to load detection model: {0}")]
    ModelLoad(String),
}

/// Error reported by a [`crate::FaceDetector`] implementation.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// The model ran but failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Landmark refinement is not available for this detector.
    #[error("detector does not support landmark refinement")]
    LandmarksUnsupported,
}

/// Why a single face region was skipped. Never fatal for the image.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegionEffectError {
    /// A coordinate or size is NaN or infinite.
    #[error("face bounds contain non-finite coordinates")]
    NonFiniteBounds,

    /// The padded region starts at or past the canvas edge.
    #[error("region starts outside the {width}x{height} canvas")]
    OutsideCanvas {
        /// Canvas width.
        width: u32,
        /// Canvas height.
        height: u32,
    },

    /// Nothing is left of the region after clipping.
    #[error("region has zero area after clipping")]
    EmptyRegion,

    /// The region is too short for a 1px glyph.
    #[error("region is too small to draw a glyph")]
    GlyphTooSmall,
}
