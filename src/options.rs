//! Composition inputs: items, layout mode and per-run options.
//!
//! Every option carries an explicit default so callers (CLI flags, JSON
//! bodies) can supply only what they care about.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::color::Color;
use crate::error::CollageError;
use crate::source::ImageSource;

/// Packing algorithm for the content surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Rows of roughly equal length, each rescaled to the widest row.
    #[default]
    #[serde(alias = "smart-grid")]
    Grid,
    /// One row, images normalized to a common height.
    Horizontal,
    /// One column, images normalized to a common width.
    Vertical,
}

impl Layout {
    pub const ALL: [Layout; 3] = [Layout::Grid, Layout::Horizontal, Layout::Vertical];

    pub fn name(self) -> &'static str {
        match self {
            Layout::Grid => "grid",
            Layout::Horizontal => "horizontal",
            Layout::Vertical => "vertical",
        }
    }
}

impl FromStr for Layout {
    type Err = CollageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" | "smart-grid" => Ok(Layout::Grid),
            "horizontal" => Ok(Layout::Horizontal),
            "vertical" => Ok(Layout::Vertical),
            _ => Err(CollageError::InvalidLayout(s.to_string())),
        }
    }
}

/// One input image plus its caption.
#[derive(Debug, Clone, Deserialize)]
pub struct CombineItem {
    pub source: ImageSource,
    #[serde(default)]
    pub label: String,
}

impl CombineItem {
    pub fn new(source: impl Into<ImageSource>, label: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            label: label.into(),
        }
    }

    pub fn unlabeled(source: impl Into<ImageSource>) -> Self {
        Self::new(source, "")
    }

    /// Label text with surrounding whitespace removed; empty means no band.
    pub fn caption(&self) -> Option<&str> {
        let trimmed = self.label.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Text styling shared by per-item labels and the title band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelStyle {
    pub font_color: Color,
    pub background_color: Color,
    /// Title font size in final (canonical) pixels; labels use a fraction of it.
    pub font_size: f32,
    /// CSS-style family list, e.g. `"Inter, sans-serif"`.
    pub font_family: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_color: Color::BLACK,
            background_color: Color::WHITE,
            font_size: 40.0,
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Configuration for one composition run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CombineOptions {
    pub layout: Layout,
    pub main_title: Option<String>,
    /// Spacing between cells at native scale.
    pub gap: f32,
    pub background_color: Color,
    pub label_style: LabelStyle,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            layout: Layout::Grid,
            main_title: None,
            gap: 20.0,
            background_color: Color::WHITE,
            label_style: LabelStyle::default(),
        }
    }
}

impl CombineOptions {
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.main_title = Some(title.into());
        self
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.label_style = style;
        self
    }

    /// Title text with whitespace trimmed, if any remains.
    pub fn title(&self) -> Option<&str> {
        self.main_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Labels are enabled when there is a title or any non-empty item label.
    pub fn labels_enabled(&self, items: &[CombineItem]) -> bool {
        self.title().is_some() || items.iter().any(|i| i.caption().is_some())
    }

    /// Synchronous checks run before any image is loaded.
    pub fn validate(&self, items: &[CombineItem]) -> Result<(), CollageError> {
        if items.is_empty() {
            return Err(CollageError::EmptyInput);
        }
        if !(self.gap.is_finite() && self.gap >= 0.0) {
            return Err(CollageError::InvalidOption(format!(
                "gap must be a non-negative number, got {}",
                self.gap
            )));
        }
        if self.labels_enabled(items)
            && !(self.label_style.font_size.is_finite() && self.label_style.font_size > 0.0)
        {
            return Err(CollageError::InvalidOption(format!(
                "font size must be positive when labels are shown, got {}",
                self.label_style.font_size
            )));
        }
        Ok(())
    }
}
