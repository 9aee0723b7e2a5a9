//! # Collage - Image Compositing Engine
//!
//! Collage combines several images into one: side by side, stacked, or in a
//! balanced grid, with optional per-image labels and a title band. Output is
//! always rescaled so the content area is a fixed canonical width (1536px by
//! default), which keeps label and title text a predictable size no matter
//! how large the source images are.
//!
//! ## Quick Start
//!
//! ```no_run
//! use collage::{CombineItem, CombineOptions, Layout, combine_images};
//!
//! # async fn demo() -> Result<(), collage::CollageError> {
//! let items = vec![
//!     CombineItem::new("photos/left.jpg", "Left"),
//!     CombineItem::new("photos/right.jpg", "Right"),
//! ];
//! let options = CombineOptions::default().with_layout(Layout::Grid);
//!
//! let png = combine_images(&items, &options).await?;
//! std::fs::write("collage.png", &png.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`options`] | Layouts, items and caller options |
//! | [`source`] | Image references and the loader seam |
//! | [`render`] | Layout geometry, drawing and encoding |
//! | [`text`] | Fonts, measurement and word wrapping |
//! | [`compositor`] | The end-to-end engine |
//! | [`server`] | HTTP API |
//! | [`config`] | Engine tunables |
//! | [`color`] | CSS-style color parsing |
//! | [`error`] | Error types |

pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod options;
pub mod render;
pub mod server;
pub mod source;
pub mod text;

// Re-exports for convenience
pub use color::Color;
pub use compositor::{Compositor, combine_images};
pub use config::{EngineConfig, OutputFormat};
pub use error::CollageError;
pub use options::{CombineItem, CombineOptions, LabelStyle, Layout};
pub use render::encode::EncodedImage;
pub use source::ImageSource;
