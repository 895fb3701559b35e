//! Face obscuring: detect faces, then blur, fill, or cover each one with an emoji.
//!
//! # Example
//!
//! ```no_run
//! use faceveil::{FaceObscurer, ObscureMode, RustfaceDetector};
//!
//! let raw_bytes = std::fs::read("group.jpg").unwrap();
//! let detector = RustfaceDetector::from_file("seeta_fd_frontal_v1.0.bin").unwrap();
//! let result = FaceObscurer::new(raw_bytes)
//!     .unwrap()
//!     .mode(ObscureMode::Solid)
//!     .solid_color("#000")
//!     .face_detector(Box::new(detector))
//!     .obscure()
//!     .unwrap();
//! println!("Obscured {} face(s)", result.report.applied);
//! ```
#![warn(missing_docs)]

mod blur;
mod color;
mod composite;
/// Tiered face detection pipeline.
pub mod detection;
mod emoji;
mod encode;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
mod region;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;

pub use ab_glyph::FontArc;

/// Box blur kernel and the radius used for face regions.
pub use blur::{box_blur, BLUR_RADIUS};
/// CSS-style color parsing.
pub use color::parse_color;
/// Region compositing and its per-face report.
pub use composite::{apply_regions, CompositeReport, SkippedRegion};
pub use detection::{detect_faces, DetectionOutcome, DetectionTier};
/// Base64 data URL helper for PNG output.
pub use encode::png_data_url;
/// Error types returned by faceveil operations.
pub use error::{DetectorError, ObscureError, RegionEffectError};
/// Face detection trait and face bounding-box types.
pub use face_detector::{AsFaceBounds, DetectionOptions, FaceBounds, FaceDetector, LandmarkedFace};
/// Padded, clipped face regions.
pub use region::{padded_region, Region};
#[cfg(feature = "rustface")]
/// Built-in detector that loads a SeetaFace model at runtime.
pub use rustface_backend::RustfaceDetector;

use image::{Rgba, RgbaImage};

/// Default detection threshold.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.1;

/// Default fill for [`ObscureMode::Solid`].
pub const DEFAULT_SOLID_COLOR: &str = "#FF0000";

/// Default glyph for [`ObscureMode::Emoji`].
pub const DEFAULT_EMOJI: &str = "😎";

/// How each face region is obscured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObscureMode {
    /// Box blur with radius [`BLUR_RADIUS`].
    #[default]
    Blur,

    /// Opaque fill with the configured color.
    Solid,

    /// The configured emoji drawn centered on the face.
    Emoji,
}

/// Validated obscuring settings.
///
/// Construct with [`ObscureConfig::try_new`], or use [`Default`] for blur mode
/// at confidence 0.1, red fill, and 😎.
#[derive(Debug, Clone, PartialEq)]
pub struct ObscureConfig {
    mode: ObscureMode,
    min_confidence: f32,
    solid_color: Rgba<u8>,
    emoji: String,
}

impl ObscureConfig {
    /// Validate and build a configuration.
    ///
    /// `min_confidence` must lie in `[0, 1]`, `solid_color` must parse with
    /// [`parse_color`], and `emoji` must be non-empty.
    pub fn try_new(
        mode: ObscureMode,
        min_confidence: f32,
        solid_color: &str,
        emoji: &str,
    ) -> Result<Self, ObscureError> {
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(ObscureError::InvalidConfidence(min_confidence));
        }
        let solid_color = parse_color(solid_color)?;
        if emoji.trim().is_empty() {
            return Err(ObscureError::EmptyEmoji);
        }

        Ok(Self {
            mode,
            min_confidence,
            solid_color,
            emoji: emoji.to_string(),
        })
    }

    /// The obscuring mode.
    pub fn mode(&self) -> ObscureMode {
        self.mode
    }

    /// Detection threshold for the primary and enhanced passes.
    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    /// Fill color for solid mode.
    pub fn solid_color(&self) -> Rgba<u8> {
        self.solid_color
    }

    /// Glyph drawn in emoji mode.
    pub fn emoji(&self) -> &str {
        &self.emoji
    }
}

impl Default for ObscureConfig {
    fn default() -> Self {
        Self {
            mode: ObscureMode::default(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            solid_color: Rgba([255, 0, 0, 255]),
            emoji: DEFAULT_EMOJI.to_string(),
        }
    }
}

/// Result of a single obscuring operation.
#[derive(Debug, Clone)]
pub struct ObscuredImage {
    /// The processed image as PNG bytes.
    pub data: Vec<u8>,

    /// Width of the output image in pixels.
    pub width: u32,

    /// Height of the output image in pixels.
    pub height: u32,

    /// Size of the original input in bytes (0 when built from pixels).
    pub original_size: usize,

    /// Which detection stage produced `faces`, `None` when boxes were supplied.
    pub tier: Option<DetectionTier>,

    /// The face boxes that were composited, in application order.
    pub faces: Vec<FaceBounds>,

    /// Per-face applied/skipped counts.
    pub report: CompositeReport,
}

impl ObscuredImage {
    /// The PNG output as a `data:image/png;base64,...` URL.
    pub fn data_url(&self) -> String {
        png_data_url(&self.data)
    }
}

/// Builder for obscuring faces in a photo.
///
/// Decodes the input image on construction, then detects faces and applies
/// the configured effect to each one.
pub struct FaceObscurer {
    image: RgbaImage,
    original_size: usize,
    mode: ObscureMode,
    min_confidence: f32,
    solid_color: String,
    emoji: String,
    font: Option<FontArc>,
    detector: Option<Box<dyn FaceDetector>>,
}

impl FaceObscurer {
    /// Create an obscurer from raw image bytes (JPEG, PNG, WebP, ...).
    pub fn new(input: Vec<u8>) -> Result<Self, ObscureError> {
        let image = encode::decode_image(&input)?;
        Ok(Self::with_image(image, input.len()))
    }

    /// Create an obscurer from an already decoded RGBA image.
    pub fn from_image(image: RgbaImage) -> Result<Self, ObscureError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(ObscureError::ZeroDimensions);
        }
        Ok(Self::with_image(image, 0))
    }

    fn with_image(image: RgbaImage, original_size: usize) -> Self {
        Self {
            image,
            original_size,
            mode: ObscureMode::default(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            solid_color: DEFAULT_SOLID_COLOR.to_string(),
            emoji: DEFAULT_EMOJI.to_string(),
            font: None,
            detector: None,
        }
    }

    /// Set the obscuring mode (default: `ObscureMode::Blur`).
    pub fn mode(mut self, mode: ObscureMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the detection threshold from 0.0 to 1.0 (default: 0.1).
    pub fn min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Set the fill color for solid mode (default: `#FF0000`).
    pub fn solid_color(mut self, color: &str) -> Self {
        self.solid_color = color.to_string();
        self
    }

    /// Set the glyph for emoji mode (default: 😎).
    pub fn emoji(mut self, emoji: &str) -> Self {
        self.emoji = emoji.to_string();
        self
    }

    /// Provide the font used to render the emoji glyph.
    ///
    /// Without a font, or when the font has no outline for the glyph (as with
    /// color-bitmap emoji fonts), a filled disc is drawn instead.
    pub fn emoji_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Provide the face detector used by [`FaceObscurer::obscure`].
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    fn config(&self) -> Result<ObscureConfig, ObscureError> {
        ObscureConfig::try_new(self.mode, self.min_confidence, &self.solid_color, &self.emoji)
    }

    /// Detect faces with the configured detector and obscure them.
    ///
    /// Fails with [`ObscureError::ModelsNotLoaded`] before doing any work if no
    /// detector was set or it reports not ready.
    pub fn obscure(self) -> Result<ObscuredImage, ObscureError> {
        let detector = match self.detector.as_deref() {
            Some(detector) if detector.is_ready() => detector,
            _ => return Err(ObscureError::ModelsNotLoaded),
        };
        let config = self.config()?;

        let outcome = detect_faces(detector, &self.image, config.min_confidence())?;
        let tier = outcome.tier();
        log::debug!("detection finished at {tier:?} with {} face(s)", outcome.faces().len());

        self.composite(&config, outcome.into_faces(), Some(tier))
    }

    /// Obscure caller-supplied face boxes, skipping detection entirely.
    pub fn obscure_regions(self, faces: &[FaceBounds]) -> Result<ObscuredImage, ObscureError> {
        let config = self.config()?;
        self.composite(&config, faces.to_vec(), None)
    }

    fn composite(
        &self,
        config: &ObscureConfig,
        faces: Vec<FaceBounds>,
        tier: Option<DetectionTier>,
    ) -> Result<ObscuredImage, ObscureError> {
        let (canvas, report) = apply_regions(&self.image, &faces, config, self.font.as_ref());
        let data = encode::encode_png(&canvas)?;

        Ok(ObscuredImage {
            data,
            width: canvas.width(),
            height: canvas.height(),
            original_size: self.original_size,
            tier,
            faces,
            report,
        })
    }
}
