//! Drawing surfaces.
//!
//! A [`Surface`] is an RGBA buffer with the handful of canvas operations the
//! engine needs: rectangle fills, source-over pixel blending and scaled image
//! blits. Allocation is checked against the engine's surface limits so
//! oversized layouts fail with [`CollageError::SurfaceCreation`] instead of
//! aborting the process.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::config::EngineConfig;
use crate::error::CollageError;

/// An RGBA drawing buffer.
#[derive(Debug, Clone)]
pub struct Surface {
    image: RgbaImage,
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32, config: &EngineConfig) -> Result<Self, CollageError> {
        Self::filled(width, height, Rgba([0, 0, 0, 0]), config)
    }

    /// Allocate a surface filled with `color`.
    pub fn filled(
        width: u32,
        height: u32,
        color: Rgba<u8>,
        config: &EngineConfig,
    ) -> Result<Self, CollageError> {
        check_limits(width, height, config)?;
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, color),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Fill a rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width as i64).min(self.width() as i64);
        let y1 = (y + height as i64).min(self.height() as i64);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px as u32, py as u32, color, 1.0);
            }
        }
    }

    /// Source-over blend of `color` scaled by `coverage` (0.0..=1.0).
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>, coverage: f32) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let src_a = color[3] as f32 / 255.0 * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        if src_a >= 1.0 {
            *dst = color;
            return;
        }
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            *dst = Rgba([0, 0, 0, 0]);
            return;
        }
        for c in 0..3 {
            let v = (color[c] as f32 * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
            dst[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Draw `image` scaled to `width` x `height` with its top-left at `(x, y)`.
    ///
    /// Zero-sized sources or targets draw nothing, and so do targets larger
    /// than this surface; the resize buffer is never bigger than the surface.
    pub fn draw_image(
        &mut self,
        image: &RgbaImage,
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        filter: FilterType,
    ) {
        if width == 0 || height == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        if width > self.width() || height > self.height() {
            tracing::warn!(
                width,
                height,
                surface_width = self.width(),
                surface_height = self.height(),
                "skipping blit larger than its surface"
            );
            return;
        }
        if image.dimensions() == (width, height) {
            imageops::overlay(&mut self.image, image, x, y);
        } else {
            let resized = imageops::resize(image, width, height, filter);
            imageops::overlay(&mut self.image, &resized, x, y);
        }
    }
}

fn check_limits(width: u32, height: u32, config: &EngineConfig) -> Result<(), CollageError> {
    let fail = |reason: String| CollageError::SurfaceCreation {
        width: width as u64,
        height: height as u64,
        reason,
    };
    if width > config.max_surface_side || height > config.max_surface_side {
        return Err(fail(format!(
            "edge exceeds {} pixels",
            config.max_surface_side
        )));
    }
    let pixels = width as u64 * height as u64;
    if pixels > config.max_surface_pixels {
        return Err(fail(format!(
            "area exceeds {} pixels",
            config.max_surface_pixels
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_limits_enforced() {
        let config = EngineConfig::default().with_surface_limits(100, 5_000);
        assert!(Surface::new(100, 50, &config).is_ok());
        let err = Surface::new(101, 1, &config).unwrap_err();
        assert!(matches!(err, CollageError::SurfaceCreation { width: 101, .. }));
        assert!(Surface::new(100, 51, &config).is_err());
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_zero_sized_surface_allowed() {
        let s = Surface::new(0, 0, &EngineConfig::default()).unwrap();
        assert_eq!((s.width(), s.height()), (0, 0));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut s = Surface::filled(10, 10, WHITE, &EngineConfig::default()).unwrap();
        s.fill_rect(-5, 8, 8, 10, RED);
        assert_eq!(*s.as_image().get_pixel(0, 9), RED);
        assert_eq!(*s.as_image().get_pixel(2, 9), RED);
        assert_eq!(*s.as_image().get_pixel(3, 9), WHITE);
        assert_eq!(*s.as_image().get_pixel(0, 7), WHITE);
    }

    #[test]
    fn test_blend_half_coverage() {
        let mut s = Surface::filled(1, 1, WHITE, &EngineConfig::default()).unwrap();
        s.blend_pixel(0, 0, Rgba([0, 0, 0, 255]), 0.5);
        let p = s.as_image().get_pixel(0, 0);
        assert!((p[0] as i32 - 128).abs() <= 1);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn test_blend_out_of_bounds_ignored() {
        let mut s = Surface::filled(2, 2, WHITE, &EngineConfig::default()).unwrap();
        s.blend_pixel(5, 5, RED, 1.0);
        assert!(s.as_image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_draw_image_refuses_oversized_target() {
        let src = RgbaImage::from_pixel(2, 2, RED);
        let mut s = Surface::filled(10, 10, WHITE, &EngineConfig::default()).unwrap();
        s.draw_image(&src, 0, 0, u32::MAX, 100_000, FilterType::Nearest);
        s.draw_image(&src, 0, 0, 11, 5, FilterType::Nearest);
        assert!(s.as_image().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn test_draw_image_scales() {
        let src = RgbaImage::from_pixel(2, 2, RED);
        let mut s = Surface::filled(10, 10, WHITE, &EngineConfig::default()).unwrap();
        s.draw_image(&src, 2, 2, 6, 4, FilterType::Nearest);
        assert_eq!(*s.as_image().get_pixel(2, 2), RED);
        assert_eq!(*s.as_image().get_pixel(7, 5), RED);
        assert_eq!(*s.as_image().get_pixel(8, 5), WHITE);
        assert_eq!(*s.as_image().get_pixel(7, 6), WHITE);
    }
}
