//! TrueType rendering with ab_glyph.
//!
//! Anti-aliased coverage is blended straight into the target surface.

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use image::Rgba;

use crate::render::surface::Surface;

/// Glyph ids and pen positions for one line, starting at x = 0.
fn layout(font: &FontArc, text: &str, px: f32) -> (Vec<(GlyphId, f32)>, f32) {
    let scaled = font.as_scaled(PxScale::from(px));
    let mut glyphs = Vec::with_capacity(text.len());
    let mut caret_x = 0.0f32;
    let mut previous: Option<GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret_x += scaled.kern(prev, glyph_id);
        }
        glyphs.push((glyph_id, caret_x));
        caret_x += scaled.h_advance(glyph_id);
        previous = Some(glyph_id);
    }

    (glyphs, caret_x)
}

/// Advance width of `text` at `px`.
pub fn measure(font: &FontArc, text: &str, px: f32) -> f32 {
    layout(font, text, px).1
}

/// Draw one line with its left edge at `left` and vertical middle at `middle`.
pub fn draw_line(
    surface: &mut Surface,
    font: &FontArc,
    text: &str,
    left: f32,
    middle: f32,
    px: f32,
    color: Rgba<u8>,
) {
    if px <= 0.0 {
        return;
    }
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);
    // Center the ascent..descent box on `middle`; descent is negative.
    let baseline_y = middle + (scaled.ascent() + scaled.descent()) / 2.0;
    let (glyphs, _) = layout(font, text, px);
    let (width, height) = (surface.width() as i64, surface.height() as i64);

    for (glyph_id, glyph_x) in glyphs {
        let glyph = glyph_id.with_scale_and_position(scale, point(left + glyph_x, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px_x, px_y, coverage| {
                let x = px_x as i64 + bounds.min.x as i64;
                let y = px_y as i64 + bounds.min.y as i64;
                if x >= 0 && x < width && y >= 0 && y < height {
                    surface.blend_pixel(x as u32, y as u32, color, coverage);
                }
            });
        }
    }
}
