use std::path::Path;

use image::RgbaImage;

use crate::error::{DetectorError, ObscureError};
use crate::face_detector::{DetectionOptions, FaceBounds, FaceDetector};

/// SeetaFace's stock score threshold. Maps to a confidence of 0.5.
const REFERENCE_SCORE: f64 = 2.0;

/// Confidences are clamped to this margin from 0 and 1 before inverting.
const CONFIDENCE_EPSILON: f64 = 1e-3;

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// The model (`seeta_fd_frontal_v1.0.bin`) is loaded at runtime from a file
/// or from bytes the caller already fetched.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Load the SeetaFace model from raw bytes.
    pub fn from_bytes(model_data: &[u8]) -> Result<Self, ObscureError> {
        let model = rustface::read_model(std::io::Cursor::new(model_data))
            .map_err(|e| ObscureError::ModelLoad(e.to_string()))?;
        Ok(Self { model })
    }

    /// Load the SeetaFace model from a file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ObscureError> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| ObscureError::ModelLoad(format!("{}: {e}", path.display())))?;
        log::info!("loaded SeetaFace model from {}", path.display());
        Self::from_bytes(&data)
    }
}

/// Squash an unbounded SVM score into `(0, 1)`.
fn score_to_confidence(score: f64) -> f64 {
    1.0 / (1.0 + (-(score - REFERENCE_SCORE)).exp())
}

/// Inverse of [`score_to_confidence`].
fn confidence_to_score(confidence: f64) -> f64 {
    let p = confidence.clamp(CONFIDENCE_EPSILON, 1.0 - CONFIDENCE_EPSILON);
    REFERENCE_SCORE + (p / (1.0 - p)).ln()
}

impl FaceDetector for RustfaceDetector {
    fn detect(
        &self,
        image: &RgbaImage,
        options: &DetectionOptions,
    ) -> Result<Vec<FaceBounds>, DetectorError> {
        let gray = image::imageops::grayscale(image);
        let (width, height) = gray.dimensions();

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(20);
        detector.set_score_thresh(confidence_to_score(f64::from(options.min_confidence)));
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray.as_raw(), width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceBounds {
                    x: bbox.x() as f64,
                    y: bbox.y() as f64,
                    width: bbox.width() as f64,
                    height: bbox.height() as f64,
                    confidence: score_to_confidence(face.score()),
                }
            })
            .filter(|face| face.confidence >= f64::from(options.min_confidence))
            .collect())
    }
}
