use ab_glyph::FontArc;
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::blur::{box_blur, BLUR_RADIUS};
use crate::emoji::draw_glyph;
use crate::error::RegionEffectError;
use crate::face_detector::{AsFaceBounds, FaceBounds};
use crate::region::{padded_region, Region};
use crate::{ObscureConfig, ObscureMode};

/// A face that could not be obscured.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRegion {
    /// Position of the face in the input list.
    pub index: usize,
    /// Why it was skipped.
    pub reason: RegionEffectError,
}

/// Outcome of compositing every face onto the canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeReport {
    /// Number of faces whose effect was applied.
    pub applied: usize,
    /// Faces that were skipped, in input order.
    pub skipped: Vec<SkippedRegion>,
}

impl CompositeReport {
    /// Number of faces that were skipped.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Apply the configured effect to every face region of a copy of `image`.
///
/// Faces are processed in order, so overlapping regions resolve
/// last-write-wins. A face that cannot be processed is recorded in the
/// report and the rest proceed.
pub fn apply_regions<B: AsFaceBounds>(
    image: &RgbaImage,
    faces: &[B],
    config: &ObscureConfig,
    font: Option<&FontArc>,
) -> (RgbaImage, CompositeReport) {
    let mut canvas = image.clone();
    let mut report = CompositeReport::default();

    for (index, face) in faces.iter().enumerate() {
        match apply_region(&mut canvas, face.face_bounds(), config, font) {
            Ok(region) => {
                log::debug!("obscured face {index} at {region:?}");
                report.applied += 1;
            }
            Err(reason) => {
                log::warn!("skipping face {index}: {reason}");
                report.skipped.push(SkippedRegion { index, reason });
            }
        }
    }

    (canvas, report)
}

fn apply_region(
    canvas: &mut RgbaImage,
    bounds: &FaceBounds,
    config: &ObscureConfig,
    font: Option<&FontArc>,
) -> Result<Region, RegionEffectError> {
    let region = padded_region(bounds, canvas.width(), canvas.height())?;
    let Region {
        x,
        y,
        width,
        height,
    } = region;

    match config.mode() {
        ObscureMode::Blur => {
            let patch = imageops::crop_imm(&*canvas, x, y, width, height).to_image();
            let blurred = box_blur(&patch, BLUR_RADIUS);
            imageops::replace(canvas, &blurred, i64::from(x), i64::from(y));
        }
        ObscureMode::Solid => {
            let [r, g, b, _] = config.solid_color().0;
            let rect = Rect::at(x as i32, y as i32).of_size(width, height);
            draw_filled_rect_mut(canvas, rect, Rgba([r, g, b, 255]));
        }
        ObscureMode::Emoji => draw_glyph(canvas, config.emoji(), region, font)?,
    }

    Ok(region)
}
