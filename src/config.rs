//! # Engine Configuration
//!
//! Tunable constants of the compositing engine.
//!
//! | Setting | Default | Meaning |
//! |---------|---------|---------|
//! | canonical_width | 1536 | Width of the content area in the final image |
//! | label_font_ratio | 0.8 | Per-item label size relative to the title size |
//! | line_height | 1.2 | Line advance as a multiple of the font size |
//! | max_surface_side | 32767 | Largest allowed surface edge |
//! | max_surface_pixels | 268435456 | Largest allowed surface area |
//!
//! ## Usage
//!
//! ```
//! use collage::config::{EngineConfig, OutputFormat};
//!
//! let config = EngineConfig::default()
//!     .with_canonical_width(1024)
//!     .with_output_format(OutputFormat::Jpeg);
//! assert_eq!(config.canonical_width, 1024);
//! ```

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CollageError;

/// Encoded output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CollageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            other => Err(CollageError::InvalidOption(format!(
                "unknown output format '{}'",
                other
            ))),
        }
    }
}

/// # Engine Configuration
///
/// Values the engine treats as constants for one composition run.
///
/// ## Scale Model
///
/// ```text
/// scale_ratio = canonical_width / native_content_width
/// label_px    = font_size * label_font_ratio / scale_ratio   (content space)
/// title_px    = font_size                                    (canonical space)
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Width the content surface is rescaled to
    pub canonical_width: u32,

    /// Per-item label font size as a fraction of the title font size
    pub label_font_ratio: f32,

    /// Line advance as a multiple of font size
    pub line_height: f32,

    /// Maximum width or height of any surface
    pub max_surface_side: u32,

    /// Maximum pixel count of any surface
    pub max_surface_pixels: u64,

    /// Encoding of the final image
    pub output_format: OutputFormat,

    /// Filter used when normalizing images and rescaling surfaces
    pub resize_filter: FilterType,
}

impl EngineConfig {
    /// Defaults used by the studio front end.
    pub const STUDIO: EngineConfig = EngineConfig {
        canonical_width: 1536,
        label_font_ratio: 0.8,
        line_height: 1.2,
        max_surface_side: 32_767,
        max_surface_pixels: 268_435_456,
        output_format: OutputFormat::Png,
        resize_filter: FilterType::Triangle,
    };

    pub fn with_canonical_width(mut self, width: u32) -> Self {
        self.canonical_width = width;
        self
    }

    pub fn with_label_font_ratio(mut self, ratio: f32) -> Self {
        self.label_font_ratio = ratio;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_resize_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = filter;
        self
    }

    pub fn with_surface_limits(mut self, max_side: u32, max_pixels: u64) -> Self {
        self.max_surface_side = max_side;
        self.max_surface_pixels = max_pixels;
        self
    }

    /// Reject configurations that would make the scale math meaningless.
    pub fn validate(&self) -> Result<(), CollageError> {
        if self.canonical_width == 0 {
            return Err(CollageError::InvalidOption(
                "canonical width must be positive".to_string(),
            ));
        }
        if !(self.label_font_ratio.is_finite() && self.label_font_ratio > 0.0) {
            return Err(CollageError::InvalidOption(format!(
                "label font ratio must be positive, got {}",
                self.label_font_ratio
            )));
        }
        if !(self.line_height.is_finite() && self.line_height > 0.0) {
            return Err(CollageError::InvalidOption(format!(
                "line height must be positive, got {}",
                self.line_height
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::STUDIO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_studio_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.canonical_width, 1536);
        assert!((config.label_font_ratio - 0.8).abs() < 1e-6);
        assert!((config.line_height - 1.2).abs() < 1e-6);
        assert_eq!(config.output_format, OutputFormat::Png);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_canonical_width_rejected() {
        let config = EngineConfig::default().with_canonical_width(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert_eq!("jpg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert!("gif".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Jpeg.mime(), "image/jpeg");
    }
}
