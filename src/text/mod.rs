//! # Text
//!
//! Font resolution, measurement and drawing for label and title bands.
//!
//! - [`FontBook`]: resolves CSS-style family lists to a [`Typeface`]
//! - [`Pen`]: one typeface at one size and color; measures and draws
//! - [`wrap_words`]: greedy line breaking
//!
//! Measurement and drawing always go through the same [`Pen`], so the widths
//! used for wrapping are the widths that get drawn.
//!
//! ## Usage Example
//!
//! ```
//! use collage::text::{FontBook, Pen};
//! use image::Rgba;
//!
//! let fonts = FontBook::new();
//! let face = fonts.resolve("Inter, sans-serif"); // nothing registered: bitmap face
//! let pen = Pen::new(&face, 24.0, Rgba([0, 0, 0, 255]));
//! assert!(pen.measure("Hello") > 0.0);
//! ```

mod bitmap;
mod ttf;
mod wrap;

pub use wrap::wrap_words;

use ab_glyph::FontArc;
use image::Rgba;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::CollageError;
use crate::render::surface::Surface;

/// A concrete face text is drawn with.
#[derive(Clone)]
pub enum Typeface {
    /// Built-in Spleen bitmap face, always available.
    Bitmap,
    /// A registered TrueType/OpenType face.
    Outline { family: String, font: FontArc },
}

impl Typeface {
    pub fn family(&self) -> &str {
        match self {
            Typeface::Bitmap => "spleen",
            Typeface::Outline { family, .. } => family,
        }
    }
}

impl fmt::Debug for Typeface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Typeface({})", self.family())
    }
}

/// Registry of font families available to the engine.
#[derive(Clone, Default)]
pub struct FontBook {
    faces: HashMap<String, FontArc>,
}

impl fmt::Debug for FontBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontBook")
            .field("families", &self.families())
            .finish()
    }
}

fn normalize_family(name: &str) -> String {
    name.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_ascii_lowercase()
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register font data under `family`.
    pub fn register_bytes(&mut self, family: &str, bytes: Vec<u8>) -> Result<(), CollageError> {
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| CollageError::Font(format!("invalid font for '{}': {}", family, e)))?;
        self.faces.insert(normalize_family(family), font);
        Ok(())
    }

    /// Register a font file; the family defaults to the file stem.
    ///
    /// Returns the family name it was registered under.
    pub fn register_file(&mut self, family: Option<&str>, path: &Path) -> Result<String, CollageError> {
        let family = match family {
            Some(f) => f.to_string(),
            None => path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| CollageError::Font(format!("no family name for {}", path.display())))?
                .to_string(),
        };
        let bytes = std::fs::read(path)?;
        self.register_bytes(&family, bytes)?;
        Ok(normalize_family(&family))
    }

    /// Register every `.ttf`/`.otf` file in `dir`, named after its stem.
    ///
    /// Returns how many faces were added.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, CollageError> {
        let mut count = 0;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
            if !is_font {
                continue;
            }
            match self.register_file(None, &path) {
                Ok(family) => {
                    tracing::debug!(family = %family, path = %path.display(), "registered font");
                    count += 1;
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping font"),
            }
        }
        Ok(count)
    }

    /// Registered family names, sorted.
    pub fn families(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.faces.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// First registered family of a comma-separated list, else the bitmap face.
    pub fn resolve(&self, family_list: &str) -> Typeface {
        family_list
            .split(',')
            .map(normalize_family)
            .find_map(|name| {
                self.faces.get(&name).map(|font| Typeface::Outline {
                    family: name.clone(),
                    font: font.clone(),
                })
            })
            .unwrap_or(Typeface::Bitmap)
    }
}

/// A typeface at a pixel size and color.
#[derive(Debug, Clone, Copy)]
pub struct Pen<'a> {
    face: &'a Typeface,
    px: f32,
    color: Rgba<u8>,
}

impl<'a> Pen<'a> {
    pub fn new(face: &'a Typeface, px: f32, color: Rgba<u8>) -> Self {
        Self { face, px, color }
    }

    pub fn px(&self) -> f32 {
        self.px
    }

    /// Distance between consecutive baselines.
    pub fn line_advance(&self, line_height: f32) -> f32 {
        self.px * line_height
    }

    /// Advance width of a single line.
    pub fn measure(&self, text: &str) -> f32 {
        match self.face {
            Typeface::Bitmap => bitmap::measure(text, self.px),
            Typeface::Outline { font, .. } => ttf::measure(font, text, self.px),
        }
    }

    /// Draw one line centered on `(center_x, center_y)`.
    pub fn draw_centered(&self, surface: &mut Surface, text: &str, center_x: f32, center_y: f32) {
        let left = center_x - self.measure(text) / 2.0;
        match self.face {
            Typeface::Bitmap => bitmap::draw_line(surface, text, left, center_y, self.px, self.color),
            Typeface::Outline { font, .. } => {
                ttf::draw_line(surface, font, text, left, center_y, self.px, self.color)
            }
        }
    }

    /// Wrap `text` to `max_width` and draw the block centered on both axes.
    ///
    /// Each line is centered on its own; lines advance by `px * line_height`.
    /// Returns the number of lines drawn.
    pub fn draw_wrapped(
        &self,
        surface: &mut Surface,
        text: &str,
        center_x: f32,
        center_y: f32,
        max_width: f32,
        line_height: f32,
    ) -> usize {
        let lines = wrap_words(text, max_width, |s| self.measure(s));
        let advance = self.line_advance(line_height);
        let first_y = center_y - (lines.len().saturating_sub(1)) as f32 * advance / 2.0;
        for (i, line) in lines.iter().enumerate() {
            self.draw_centered(surface, line, center_x, first_y + i as f32 * advance);
        }
        lines.len()
    }
}
