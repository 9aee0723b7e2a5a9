//! # Rendering Module
//!
//! Everything between decoded images and encoded output bytes.
//!
//! ## Modules
//!
//! - [`layout`]: integer geometry for the horizontal, vertical and grid modes
//! - [`surface`]: RGBA drawing buffer with checked allocation
//! - [`compose`]: draws a layout plan, rescales it and adds the title band
//! - [`encode`]: PNG/JPEG encoding and data URIs
//!
//! ## Usage Example
//!
//! ```
//! use collage::config::EngineConfig;
//! use collage::options::{CombineItem, CombineOptions, Layout};
//! use collage::render::compose::compose;
//! use collage::text::FontBook;
//! use image::DynamicImage;
//!
//! let images = vec![DynamicImage::new_rgba8(40, 20), DynamicImage::new_rgba8(20, 20)];
//! let items: Vec<CombineItem> = images.iter().cloned().map(CombineItem::unlabeled).collect();
//! let options = CombineOptions::default().with_layout(Layout::Horizontal);
//!
//! let out = compose(&images, &items, &options, &FontBook::new(), &EngineConfig::default())?;
//! assert!(out.width() > 1536); // canonical width plus the outer gap
//! # Ok::<(), collage::CollageError>(())
//! ```

pub mod compose;
pub mod encode;
pub mod layout;
pub mod surface;
