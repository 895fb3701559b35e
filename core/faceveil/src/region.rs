use crate::error::RegionEffectError;
use crate::face_detector::FaceBounds;

/// Padding added on every side of a face box, as a fraction of its larger side.
const PADDING_FRACTION: f64 = 0.1;

/// Pixel region within the canvas. Always non-empty and fully inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge (pixels).
    pub x: u32,
    /// Top edge (pixels).
    pub y: u32,
    /// Width (pixels), at least 1.
    pub width: u32,
    /// Height (pixels), at least 1.
    pub height: u32,
}

/// Compute the padded region for a face box, clipped to the canvas.
///
/// The box grows by `0.1 × max(width, height)` on each side. The start is
/// clamped at zero and floored to a pixel; the far edge is rounded up and
/// clamped to the canvas.
pub fn padded_region(
    bounds: &FaceBounds,
    canvas_width: u32,
    canvas_height: u32,
) -> Result<Region, RegionEffectError> {
    let FaceBounds {
        x,
        y,
        width,
        height,
        ..
    } = *bounds;
    if ![x, y, width, height].iter().all(|v| v.is_finite()) {
        return Err(RegionEffectError::NonFiniteBounds);
    }

    let (canvas_w, canvas_h) = (canvas_width as f64, canvas_height as f64);
    let padding = PADDING_FRACTION * width.max(height);

    let start_x = (x - padding).max(0.0);
    let start_y = (y - padding).max(0.0);
    if start_x >= canvas_w || start_y >= canvas_h {
        return Err(RegionEffectError::OutsideCanvas {
            width: canvas_width,
            height: canvas_height,
        });
    }

    let region_w = (canvas_w - start_x).min(width + 2.0 * padding);
    let region_h = (canvas_h - start_y).min(height + 2.0 * padding);
    if region_w <= 0.0 || region_h <= 0.0 {
        return Err(RegionEffectError::EmptyRegion);
    }

    let x0 = start_x.floor() as u32;
    let y0 = start_y.floor() as u32;
    let x1 = (start_x + region_w).ceil().min(canvas_w) as u32;
    let y1 = (start_y + region_h).ceil().min(canvas_h) as u32;
    if x1 <= x0 || y1 <= y0 {
        return Err(RegionEffectError::EmptyRegion);
    }

    Ok(Region {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    })
}
