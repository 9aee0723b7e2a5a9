//! Built-in bitmap face.
//!
//! Uses the Spleen bitmap fonts so text renders without any font files.
//! Glyphs are area-resampled to the requested pixel size, which gives
//! anti-aliased edges when scaling down and soft edges when scaling up.

use image::Rgba;
use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};

use crate::render::surface::Surface;

/// Width of a cell as a fraction of its height (both Spleen sizes are 1:2).
const CELL_ASPECT: f32 = 0.5;

/// Below this pixel size the 6x12 source reads better than the 12x24 one.
const SMALL_FONT_MAX_PX: f32 = 16.0;

/// Source bitmap sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Small,
    Large,
}

impl Source {
    fn for_px(px: f32) -> Self {
        if px <= SMALL_FONT_MAX_PX {
            Source::Small
        } else {
            Source::Large
        }
    }

    fn font_data(self) -> &'static [u8] {
        match self {
            Source::Small => FONT_6X12,
            Source::Large => FONT_12X24,
        }
    }

    fn cell(self) -> (usize, usize) {
        match self {
            Source::Small => (6, 12),
            Source::Large => (12, 24),
        }
    }
}

/// One decoded glyph as a row-major on/off grid.
struct GlyphMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl GlyphMask {
    /// Decode every character of `text`, parsing the font once.
    ///
    /// One entry per character; whitespace and undecodable characters are
    /// `None`. Characters missing from the font fall back to `?`.
    fn decode_line(text: &str, source: Source) -> Vec<Option<Self>> {
        let Ok(mut font) = PSF2Font::new(source.font_data()) else {
            return text.chars().map(|_| None).collect();
        };
        let (width, height) = source.cell();
        let mut utf8 = [0u8; 4];

        text.chars()
            .map(|ch| {
                if ch.is_whitespace() {
                    return None;
                }
                let encoded = ch.encode_utf8(&mut utf8).as_bytes();
                let key: &[u8] = if font.glyph_for_utf8(encoded).is_some() {
                    encoded
                } else {
                    b"?"
                };
                let glyph = font.glyph_for_utf8(key)?;

                let mut bits = vec![false; width * height];
                for (row_y, row) in glyph.enumerate() {
                    for (col_x, on) in row.enumerate() {
                        if row_y < height && col_x < width {
                            bits[row_y * width + col_x] = on;
                        }
                    }
                }
                Some(Self {
                    width,
                    height,
                    bits,
                })
            })
            .collect()
    }

    /// Fraction of the source rectangle `[x0, x1) x [y0, y1)` that is lit.
    fn coverage(&self, x0: f32, x1: f32, y0: f32, y1: f32) -> f32 {
        let area = (x1 - x0) * (y1 - y0);
        if area <= 0.0 {
            return 0.0;
        }
        let sx_start = x0.floor().max(0.0) as usize;
        let sx_end = (x1.ceil().max(0.0) as usize).min(self.width);
        let sy_start = y0.floor().max(0.0) as usize;
        let sy_end = (y1.ceil().max(0.0) as usize).min(self.height);

        let mut lit = 0.0;
        for sy in sy_start..sy_end {
            let oy = (y1.min(sy as f32 + 1.0) - y0.max(sy as f32)).max(0.0);
            if oy == 0.0 {
                continue;
            }
            for sx in sx_start..sx_end {
                if self.bits[sy * self.width + sx] {
                    let ox = (x1.min(sx as f32 + 1.0) - x0.max(sx as f32)).max(0.0);
                    lit += ox * oy;
                }
            }
        }
        (lit / area).min(1.0)
    }
}

/// Horizontal advance of one character at `px`.
pub fn advance(px: f32) -> f32 {
    px * CELL_ASPECT
}

/// Width of `text` at `px`.
pub fn measure(text: &str, px: f32) -> f32 {
    text.chars().count() as f32 * advance(px)
}

/// Draw one line with its left edge at `left` and vertical middle at `middle`.
pub fn draw_line(surface: &mut Surface, text: &str, left: f32, middle: f32, px: f32, color: Rgba<u8>) {
    if px <= 0.0 {
        return;
    }
    let source = Source::for_px(px);
    let (_, cell_h) = source.cell();
    let scale = px / cell_h as f32;
    let top = middle - px / 2.0;
    let step = advance(px);

    for (i, mask) in GlyphMask::decode_line(text, source).iter().enumerate() {
        if let Some(mask) = mask {
            let origin_x = left + i as f32 * step;
            draw_mask(surface, mask, origin_x, top, scale, color);
        }
    }
}

fn draw_mask(surface: &mut Surface, mask: &GlyphMask, origin_x: f32, origin_y: f32, scale: f32, color: Rgba<u8>) {
    let right = origin_x + mask.width as f32 * scale;
    let bottom = origin_y + mask.height as f32 * scale;
    let max_x = (surface.width() as f32).min(right.ceil());
    let max_y = (surface.height() as f32).min(bottom.ceil());

    let mut dy = origin_y.floor().max(0.0);
    while dy < max_y {
        let sy0 = (dy - origin_y) / scale;
        let sy1 = (dy + 1.0 - origin_y) / scale;
        let mut dx = origin_x.floor().max(0.0);
        while dx < max_x {
            let sx0 = (dx - origin_x) / scale;
            let sx1 = (dx + 1.0 - origin_x) / scale;
            let cov = mask.coverage(sx0, sx1, sy0, sy1);
            if cov > 0.0 {
                surface.blend_pixel(dx as u32, dy as u32, color, cov);
            }
            dx += 1.0;
        }
        dy += 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn blank(w: u32, h: u32) -> Surface {
        Surface::filled(w, h, Rgba([255, 255, 255, 255]), &EngineConfig::default()).unwrap()
    }

    fn dark_pixels(surface: &Surface) -> usize {
        surface
            .as_image()
            .pixels()
            .filter(|p| p[0] < 128)
            .count()
    }

    #[test]
    fn test_measure_is_monospaced() {
        assert_eq!(measure("abcd", 24.0), 48.0);
        assert_eq!(measure("", 24.0), 0.0);
        assert_eq!(advance(10.0), 5.0);
    }

    #[test]
    fn test_glyph_mask_decodes() {
        let masks = GlyphMask::decode_line("A", Source::Large);
        let mask = masks[0].as_ref().unwrap();
        assert_eq!((mask.width, mask.height), (12, 24));
        assert!(mask.bits.iter().any(|&b| b));
    }

    #[test]
    fn test_decode_line_keeps_positions() {
        let masks = GlyphMask::decode_line("ab a\u{10FFFD}", Source::Small);
        assert_eq!(masks.len(), 5);
        assert!(masks[2].is_none());
        assert!(masks.iter().enumerate().all(|(i, m)| (i == 2) != m.is_some()));

        // Repeated characters decode to the same glyph.
        let (first, again) = (masks[0].as_ref().unwrap(), masks[3].as_ref().unwrap());
        assert_eq!(first.bits, again.bits);
        assert_eq!((first.width, first.height), (6, 12));

        // Unknown characters fall back to the question mark.
        let question = GlyphMask::decode_line("?", Source::Small);
        assert_eq!(masks[4].as_ref().unwrap().bits, question[0].as_ref().unwrap().bits);
    }

    #[test]
    fn test_long_line_draws_every_glyph() {
        let text = "x".repeat(200);
        let mut surface = blank(1200, 24);
        draw_line(&mut surface, &text, 0.0, 12.0, 12.0, Rgba([0, 0, 0, 255]));
        let image = surface.as_image();
        let inked = |x0: u32| (x0..x0 + 6).any(|x| (0..24).any(|y| image.get_pixel(x, y)[0] < 128));
        assert!(inked(0));
        assert!(inked(600));
        assert!(inked(1194));
    }

    #[test]
    fn test_draw_line_marks_pixels() {
        let mut surface = blank(120, 40);
        draw_line(&mut surface, "Hi", 10.0, 20.0, 24.0, Rgba([0, 0, 0, 255]));
        assert!(dark_pixels(&surface) > 0);
    }

    #[test]
    fn test_draw_scaled_up_covers_more() {
        let mut small = blank(400, 200);
        draw_line(&mut small, "W", 0.0, 100.0, 24.0, Rgba([0, 0, 0, 255]));
        let mut large = blank(400, 200);
        draw_line(&mut large, "W", 0.0, 100.0, 96.0, Rgba([0, 0, 0, 255]));
        assert!(dark_pixels(&large) > dark_pixels(&small) * 4);
    }

    #[test]
    fn test_draw_clips_to_surface() {
        let mut surface = blank(10, 10);
        draw_line(&mut surface, "clipped text", -30.0, 0.0, 48.0, Rgba([0, 0, 0, 255]));
        assert_eq!(surface.width(), 10);
    }

    #[test]
    fn test_small_sizes_use_small_source() {
        assert_eq!(Source::for_px(12.0), Source::Small);
        assert_eq!(Source::for_px(32.0), Source::Large);
    }
}
