//! The compositing pipeline.
//!
//! ```text
//! decoded images ─► layout plan ─► strip / grid surfaces (native scale)
//!                                         │
//!                                         ▼
//!                  final surface ◄── one resize to canonical width
//!                  (background, outer gap, title band)
//! ```
//!
//! Label fonts are sized in native (content) pixels as
//! `font_size * label_font_ratio / scale_ratio`, so after the single resize
//! they land at the requested size. The title band is drawn directly at
//! canonical scale.

use image::{DynamicImage, Rgba, RgbaImage};

use super::layout::{self, GridPlan, StripPlan};
use super::surface::Surface;
use crate::config::EngineConfig;
use crate::error::CollageError;
use crate::options::{CombineItem, CombineOptions, Layout};
use crate::text::{FontBook, Pen, Typeface};

/// Band height as a multiple of its font size: the text plus one font size
/// of padding above and below.
pub const BAND_FACTOR: f32 = 3.0;

/// Height of a label or title band for text at `px`.
pub fn band_height(px: f32) -> u32 {
    if px > 0.0 && px.is_finite() {
        (px * BAND_FACTOR).round() as u32
    } else {
        0
    }
}

/// Reject gaps that could never fit a surface under `config`'s limits.
pub fn check_gap(options: &CombineOptions, config: &EngineConfig) -> Result<(), CollageError> {
    if options.gap > config.max_surface_side as f32 {
        return Err(CollageError::InvalidOption(format!(
            "gap {} exceeds the {} pixel surface limit",
            options.gap, config.max_surface_side
        )));
    }
    Ok(())
}

/// Width available to wrapped text in a band `width` pixels wide.
fn wrap_width(width: u32, px: f32) -> f32 {
    (width as f32 - 2.0 * px).max(0.0)
}

/// Scale factor from native content width to the canonical width.
///
/// A zero-width content surface keeps a 1:1 scale.
pub fn scale_ratio(native_width: u32, canonical_width: u32) -> f32 {
    if native_width == 0 {
        1.0
    } else {
        canonical_width as f32 / native_width as f32
    }
}

/// Compose already-loaded images into the final RGBA image.
///
/// `images[i]` belongs to `items[i]`.
pub fn compose(
    images: &[DynamicImage],
    items: &[CombineItem],
    options: &CombineOptions,
    fonts: &FontBook,
    config: &EngineConfig,
) -> Result<RgbaImage, CollageError> {
    if images.is_empty() {
        return Err(CollageError::EmptyInput);
    }
    if images.len() != items.len() {
        return Err(CollageError::InvalidOption(format!(
            "{} images for {} items",
            images.len(),
            items.len()
        )));
    }

    check_gap(options, config)?;

    let pixels: Vec<RgbaImage> = images.iter().map(DynamicImage::to_rgba8).collect();
    let sizes: Vec<(u32, u32)> = pixels.iter().map(RgbaImage::dimensions).collect();
    let labeled: Vec<bool> = items.iter().map(|i| i.caption().is_some()).collect();
    let has_labels = labeled.iter().any(|&l| l);
    let gap = options.gap.round() as u32;

    let native_width = match options.layout {
        Layout::Horizontal => layout::plan_horizontal(&sizes, gap, 0, &labeled)?.width,
        Layout::Vertical => layout::plan_vertical(&sizes, gap, 0, &labeled)?.width,
        Layout::Grid => layout::plan_grid(&sizes, gap, &labeled, |_| 0)?.width,
    };
    let ratio = scale_ratio(native_width, config.canonical_width);

    let style = &options.label_style;
    let label_px = if has_labels {
        style.font_size * config.label_font_ratio / ratio
    } else {
        0.0
    };

    let painter = Painter {
        config,
        face: fonts.resolve(&style.font_family),
        options,
    };
    tracing::debug!(
        layout = options.layout.name(),
        items = items.len(),
        native_width,
        scale_ratio = ratio,
        label_px,
        face = painter.face.family(),
        "composing"
    );

    let content = match options.layout {
        Layout::Horizontal => {
            let plan = layout::plan_horizontal(&sizes, gap, band_height(label_px), &labeled)?;
            painter.strip(&plan, &pixels, items, label_px)?
        }
        Layout::Vertical => {
            let plan = layout::plan_vertical(&sizes, gap, band_height(label_px), &labeled)?;
            painter.strip(&plan, &pixels, items, label_px)?
        }
        Layout::Grid => {
            let plan = layout::plan_grid(&sizes, gap, &labeled, |scale| {
                band_height(label_px / scale)
            })?;
            painter.grid(&plan, &pixels, items, label_px)?
        }
    };

    painter
        .assemble(content, ratio)
        .map(Surface::into_image)
}

/// Shared drawing state for one composition.
struct Painter<'a> {
    config: &'a EngineConfig,
    face: Typeface,
    options: &'a CombineOptions,
}

impl Painter<'_> {
    fn background(&self) -> Rgba<u8> {
        self.options.background_color.to_rgba()
    }

    fn pen(&self, px: f32) -> Pen<'_> {
        Pen::new(&self.face, px, self.options.label_style.font_color.to_rgba())
    }

    /// Draw one strip at native scale with labels at `label_px`.
    fn strip(
        &self,
        plan: &StripPlan,
        pixels: &[RgbaImage],
        items: &[CombineItem],
        label_px: f32,
    ) -> Result<Surface, CollageError> {
        let mut surface = Surface::filled(plan.width, plan.height, self.background(), self.config)?;
        let band_color = self.options.label_style.background_color.to_rgba();
        let pen = self.pen(label_px);

        for ((slot, image), item) in plan.slots.iter().zip(pixels).zip(items) {
            let r = slot.image;
            surface.draw_image(
                image,
                r.x as i64,
                r.y as i64,
                r.width,
                r.height,
                self.config.resize_filter,
            );

            if let (Some(band), Some(text)) = (slot.label, item.caption()) {
                surface.fill_rect(band.x as i64, band.y as i64, band.width, band.height, band_color);
                let (cx, cy) = band.center();
                pen.draw_wrapped(
                    &mut surface,
                    text,
                    cx,
                    cy,
                    wrap_width(band.width, label_px),
                    self.config.line_height,
                );
            }
        }
        Ok(surface)
    }

    /// Draw every row as its own strip, then stack the rescaled rows.
    fn grid(
        &self,
        plan: &GridPlan,
        pixels: &[RgbaImage],
        items: &[CombineItem],
        label_px: f32,
    ) -> Result<Surface, CollageError> {
        let mut surface = Surface::filled(plan.width, plan.height, self.background(), self.config)?;

        for row in &plan.rows {
            if row.scale <= 0.0 {
                continue;
            }
            let range = row.start..row.start + row.strip.slots.len();
            // Row-space font so the text matches other rows after rescaling.
            let row_px = label_px / row.scale;
            let strip = self.strip(&row.strip, &pixels[range.clone()], &items[range], row_px)?;
            surface.draw_image(
                strip.as_image(),
                0,
                row.y as i64,
                plan.width,
                row.scaled_height,
                self.config.resize_filter,
            );
        }
        Ok(surface)
    }

    /// Rescale content to the canonical width and add padding and title.
    fn assemble(&self, content: Surface, ratio: f32) -> Result<Surface, CollageError> {
        let scaled_width = (content.width() as f32 * ratio).round() as u32;
        let scaled_height = (content.height() as f32 * ratio).round() as u32;
        let gap = (self.options.gap * ratio).round() as u32;

        let title = self.options.title();
        let title_px = self.options.label_style.font_size;
        let title_band = if title.is_some() { band_height(title_px) } else { 0 };
        let title_block = if title.is_some() {
            title_band.saturating_add(gap)
        } else {
            0
        };

        let width = scaled_width.saturating_add(gap.saturating_mul(2));
        let height = scaled_height
            .saturating_add(title_block)
            .saturating_add(gap.saturating_mul(2));
        tracing::debug!(width, height, scaled_gap = gap, title_band, "assembling");

        let mut surface = Surface::filled(width, height, self.background(), self.config)?;

        if let Some(text) = title {
            let band_color = self.options.label_style.background_color.to_rgba();
            surface.fill_rect(gap as i64, gap as i64, scaled_width, title_band, band_color);
            let center_x = gap as f32 + scaled_width as f32 / 2.0;
            let center_y = gap as f32 + title_band as f32 / 2.0;
            self.pen(title_px).draw_wrapped(
                &mut surface,
                text,
                center_x,
                center_y,
                wrap_width(scaled_width, title_px),
                self.config.line_height,
            );
        }

        surface.draw_image(
            content.as_image(),
            gap as i64,
            (gap + title_block) as i64,
            scaled_width,
            scaled_height,
            self.config.resize_filter,
        );
        Ok(surface)
    }
}
