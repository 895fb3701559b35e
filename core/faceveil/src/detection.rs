use image::RgbaImage;

use crate::error::{DetectorError, ObscureError};
use crate::face_detector::{AsFaceBounds, DetectionOptions, FaceBounds, FaceDetector};

/// Threshold floor for the fallback pass when the primary pass finds nothing.
pub const RELAXED_MIN_CONFIDENCE: f32 = 0.2;

/// Which detection stage produced the final faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionTier {
    /// Plain detection at the configured threshold.
    Primary,
    /// Landmark-refined detection at the configured threshold.
    Enhanced,
    /// Fallback detection at the relaxed threshold.
    Relaxed,
    /// Every stage came back empty.
    None,
}

/// Result of the tiered detection pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    /// Faces from the primary pass (no refinement available).
    Primary(Vec<FaceBounds>),
    /// Landmark-refined faces, which replaced the primary ones.
    Enhanced(Vec<FaceBounds>),
    /// Faces found only by the relaxed fallback pass.
    Relaxed(Vec<FaceBounds>),
    /// No stage found a face.
    Empty,
}

impl DetectionOutcome {
    /// The detected faces, empty for [`DetectionOutcome::Empty`].
    pub fn faces(&self) -> &[FaceBounds] {
        match self {
            Self::Primary(faces) | Self::Enhanced(faces) | Self::Relaxed(faces) => faces,
            Self::Empty => &[],
        }
    }

    /// Take ownership of the detected faces.
    pub fn into_faces(self) -> Vec<FaceBounds> {
        match self {
            Self::Primary(faces) | Self::Enhanced(faces) | Self::Relaxed(faces) => faces,
            Self::Empty => Vec::new(),
        }
    }

    /// The stage that produced this outcome.
    pub fn tier(&self) -> DetectionTier {
        match self {
            Self::Primary(_) => DetectionTier::Primary,
            Self::Enhanced(_) => DetectionTier::Enhanced,
            Self::Relaxed(_) => DetectionTier::Relaxed,
            Self::Empty => DetectionTier::None,
        }
    }
}

/// Run the detection stages in order, first success wins:
///
/// 1. primary pass at `min_confidence`; an error here is fatal
/// 2. if it found faces, a landmark-refined pass replaces them when it also
///    finds faces, otherwise the primary faces are kept
/// 3. if it found nothing, one retry at `max(0.2, min_confidence)`
///
/// Failures in stages 2 and 3 are logged and fall back to the prior result.
pub fn detect_faces(
    detector: &dyn FaceDetector,
    image: &RgbaImage,
    min_confidence: f32,
) -> Result<DetectionOutcome, ObscureError> {
    let options = DetectionOptions { min_confidence };
    let primary = detector
        .detect(image, &options)
        .map_err(|e| ObscureError::DetectionFailure(e.to_string()))?;
    log::debug!(
        "primary pass found {} face(s) at min confidence {min_confidence}",
        primary.len()
    );

    let outcome = if primary.is_empty() {
        relaxed_pass(detector, image, min_confidence)
    } else {
        enhanced_pass(detector, image, &options, primary)
    };
    Ok(outcome)
}

fn enhanced_pass(
    detector: &dyn FaceDetector,
    image: &RgbaImage,
    options: &DetectionOptions,
    primary: Vec<FaceBounds>,
) -> DetectionOutcome {
    match detector.detect_with_landmarks(image, options) {
        Ok(refined) if !refined.is_empty() => {
            log::debug!("enhanced pass refined {} face(s)", refined.len());
            DetectionOutcome::Enhanced(refined.iter().map(|f| f.face_bounds().clone()).collect())
        }
        Ok(_) => {
            log::debug!("enhanced pass found nothing, keeping primary faces");
            DetectionOutcome::Primary(primary)
        }
        Err(DetectorError::LandmarksUnsupported) => DetectionOutcome::Primary(primary),
        Err(e) => {
            log::warn!("enhanced detection failed, keeping primary faces: {e}");
            DetectionOutcome::Primary(primary)
        }
    }
}

fn relaxed_pass(
    detector: &dyn FaceDetector,
    image: &RgbaImage,
    min_confidence: f32,
) -> DetectionOutcome {
    let options = DetectionOptions {
        min_confidence: RELAXED_MIN_CONFIDENCE.max(min_confidence),
    };
    match detector.detect(image, &options) {
        Ok(faces) if !faces.is_empty() => {
            log::debug!(
                "relaxed pass found {} face(s) at min confidence {}",
                faces.len(),
                options.min_confidence
            );
            DetectionOutcome::Relaxed(faces)
        }
        Ok(_) => DetectionOutcome::Empty,
        Err(e) => {
            log::warn!("relaxed detection failed: {e}");
            DetectionOutcome::Empty
        }
    }
}
