use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, Rect, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_text_mut};

use crate::error::RegionEffectError;
use crate::region::Region;

/// Glyph height relative to the region height.
const GLYPH_SCALE: f32 = 0.9;

/// Fill for outline glyphs.
const GLYPH_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Fill for the disc drawn when no font can render the glyph.
const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([255, 204, 77, 255]);

/// True if every non-whitespace char of `text` has an outline in `font`.
///
/// Color-bitmap emoji fonts map the codepoint but carry no outline, so they
/// fail this check as well.
fn has_outlines(font: &FontArc, text: &str) -> bool {
    text.chars().filter(|c| !c.is_whitespace()).all(|c| {
        let id = font.glyph_id(c);
        id.0 != 0 && font.outline(id).is_some()
    })
}

/// Pixel bounds of the ink `draw_text_mut` would paint for `text` drawn at
/// the origin, or `None` when nothing has an outline.
///
/// Walks the same layout as imageproc: each glyph sits on a baseline at the
/// font's ascent and the caret advances by `h_advance` plus kerning.
fn ink_bounds(font: &FontArc, scale: PxScale, text: &str) -> Option<Rect> {
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0;
    let mut last: Option<GlyphId> = None;
    let mut bounds: Option<Rect> = None;

    for c in text.chars() {
        let id = scaled.glyph_id(c);
        let glyph = id.with_scale_and_position(scale, point(caret, scaled.ascent()));
        caret += scaled.h_advance(id);
        let Some(outlined) = scaled.outline_glyph(glyph) else {
            continue;
        };
        if let Some(last) = last {
            caret += scaled.kern(id, last);
        }
        last = Some(id);

        let bb = outlined.px_bounds();
        bounds = Some(match bounds {
            None => bb,
            Some(acc) => Rect {
                min: point(acc.min.x.min(bb.min.x), acc.min.y.min(bb.min.y)),
                max: point(acc.max.x.max(bb.max.x), acc.max.y.max(bb.max.y)),
            },
        });
    }

    bounds
}

/// Draw `glyph` centered on `region` at 90% of the region height.
///
/// The ink box is centered rather than the font's line box, so glyphs with
/// descenders stay inside the region. Without a usable font, a filled disc
/// of the same size stands in for the glyph. Pixels outside the glyph's
/// footprint are left untouched.
pub(crate) fn draw_glyph(
    canvas: &mut RgbaImage,
    glyph: &str,
    region: Region,
    font: Option<&FontArc>,
) -> Result<(), RegionEffectError> {
    let font_size = (region.height as f32 * GLYPH_SCALE).floor();
    if font_size < 1.0 {
        return Err(RegionEffectError::GlyphTooSmall);
    }

    let center_x = region.x as f32 + region.width as f32 / 2.0;
    let center_y = region.y as f32 + region.height as f32 / 2.0;
    let scale = PxScale::from(font_size);

    let outlined = font
        .filter(|f| has_outlines(f, glyph))
        .and_then(|f| ink_bounds(f, scale, glyph).map(|ink| (f, ink)));

    match outlined {
        Some((font, ink)) => {
            let x = (center_x - (ink.min.x + ink.max.x) / 2.0).round() as i32;
            let y = (center_y - (ink.min.y + ink.max.y) / 2.0).round() as i32;
            draw_text_mut(canvas, GLYPH_COLOR, x, y, scale, font, glyph);
        }
        None => {
            log::debug!("no outline available for {glyph:?}, drawing placeholder disc");
            let radius = (font_size / 2.0).floor() as i32;
            draw_filled_circle_mut(
                canvas,
                (center_x as i32, center_y as i32),
                radius,
                PLACEHOLDER_COLOR,
            );
        }
    }

    Ok(())
}
