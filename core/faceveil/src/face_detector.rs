use image::RgbaImage;

use crate::error::DetectorError;

/// Bounding box of a detected face within an image.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceBounds {
    /// X coordinate of the top-left corner (pixels). May be negative.
    pub x: f64,
    /// Y coordinate of the top-left corner (pixels). May be negative.
    pub y: f64,
    /// Width of the bounding box (pixels).
    pub width: f64,
    /// Height of the bounding box (pixels).
    pub height: f64,
    /// Detection confidence score in `[0, 1]`.
    pub confidence: f64,
}

impl FaceBounds {
    /// Box with full confidence, for callers that already know where faces are.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence: 1.0,
        }
    }
}

/// A detection refined with facial landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkedFace {
    /// The refined bounding box.
    pub detection: FaceBounds,
    /// Landmark points in image coordinates.
    pub landmarks: Vec<(f64, f64)>,
}

/// Anything that carries a face bounding box, either directly or nested
/// inside a richer detection result.
pub trait AsFaceBounds {
    /// The bounding box of this detection.
    fn face_bounds(&self) -> &FaceBounds;
}

impl AsFaceBounds for FaceBounds {
    fn face_bounds(&self) -> &FaceBounds {
        self
    }
}

impl AsFaceBounds for LandmarkedFace {
    fn face_bounds(&self) -> &FaceBounds {
        &self.detection
    }
}

/// Options passed to each detector call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionOptions {
    /// Detections scoring below this are discarded.
    pub min_confidence: f32,
}

/// Pluggable face detection backend.
///
/// Implement this trait to provide a face detector (ONNX, SeetaFace, a remote
/// service, etc.) and pass it to [`crate::FaceObscurer::face_detector`].
/// Methods take `&self` so a single loaded model can be shared across calls.
pub trait FaceDetector {
    /// Whether the model weights are loaded and the detector can run.
    fn is_ready(&self) -> bool {
        true
    }

    /// Detect faces scoring at least `options.min_confidence`.
    fn detect(
        &self,
        image: &RgbaImage,
        options: &DetectionOptions,
    ) -> Result<Vec<FaceBounds>, DetectorError>;

    /// Detect faces and refine each with landmarks.
    ///
    /// The default reports [`DetectorError::LandmarksUnsupported`], which the
    /// detection pipeline treats as "keep the plain detections".
    fn detect_with_landmarks(
        &self,
        _image: &RgbaImage,
        _options: &DetectionOptions,
    ) -> Result<Vec<LandmarkedFace>, DetectorError> {
        Err(DetectorError::LandmarksUnsupported)
    }
}
