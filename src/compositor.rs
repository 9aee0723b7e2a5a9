//! # Compositor
//!
//! The engine's entry point: load every item, lay them out, encode.
//!
//! ```text
//! items ─► ImageLoader (concurrent) ─► compose (blocking pool) ─► EncodedImage
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use collage::{CombineItem, CombineOptions, Compositor, Layout};
//!
//! # async fn demo() -> Result<(), collage::CollageError> {
//! let compositor = Compositor::new()?;
//! let items = vec![
//!     CombineItem::new("https://example.com/a.png", "Before"),
//!     CombineItem::new("https://example.com/b.png", "After"),
//! ];
//! let options = CombineOptions::default()
//!     .with_layout(Layout::Horizontal)
//!     .with_title("Comparison");
//!
//! let collage = compositor.combine(&items, &options).await?;
//! println!("{}x{} {}", collage.width, collage.height, collage.mime());
//! # Ok(())
//! # }
//! ```

use image::DynamicImage;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::CollageError;
use crate::options::{CombineItem, CombineOptions};
use crate::render::compose::{check_gap, compose};
use crate::render::encode::EncodedImage;
use crate::source::{DefaultLoader, ImageLoader, load_all};
use crate::text::FontBook;

/// Combines images into one collage.
///
/// Cheap to clone; clones share the loader and font registry.
#[derive(Clone)]
pub struct Compositor {
    loader: Arc<dyn ImageLoader>,
    fonts: Arc<FontBook>,
    config: EngineConfig,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("fonts", &self.fonts)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Compositor {
    /// Compositor with the default loader, no registered fonts and the
    /// studio configuration.
    pub fn new() -> Result<Self, CollageError> {
        Ok(Self::with_loader(Arc::new(DefaultLoader::new()?)))
    }

    pub fn with_loader(loader: Arc<dyn ImageLoader>) -> Self {
        Self {
            loader,
            fonts: Arc::new(FontBook::new()),
            config: EngineConfig::default(),
        }
    }

    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = Arc::new(fonts);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Load all items, compose them and encode the result.
    ///
    /// Options are validated before any image is fetched. Any failed load
    /// fails the whole call. Drawing runs on the blocking thread pool.
    #[tracing::instrument(skip_all, fields(items = items.len(), layout = options.layout.name()))]
    pub async fn combine(
        &self,
        items: &[CombineItem],
        options: &CombineOptions,
    ) -> Result<EncodedImage, CollageError> {
        self.config.validate()?;
        options.validate(items)?;
        check_gap(options, &self.config)?;

        let images = load_all(self.loader.as_ref(), items).await?;
        tracing::debug!(loaded = images.len(), "images loaded");

        let this = self.clone();
        let items = items.to_vec();
        let options = options.clone();
        tokio::task::spawn_blocking(move || this.render(&images, &items, &options))
            .await
            .map_err(|e| CollageError::Encode(format!("render task failed: {}", e)))?
    }

    /// Compose already-decoded images; `images[i]` belongs to `items[i]`.
    pub fn render(
        &self,
        images: &[DynamicImage],
        items: &[CombineItem],
        options: &CombineOptions,
    ) -> Result<EncodedImage, CollageError> {
        self.config.validate()?;
        options.validate(items)?;
        let pixels = compose(images, items, options, &self.fonts, &self.config)?;
        let encoded = EncodedImage::encode(&pixels, self.config.output_format)?;
        tracing::info!(
            width = encoded.width,
            height = encoded.height,
            bytes = encoded.bytes.len(),
            "collage rendered"
        );
        Ok(encoded)
    }
}

/// Combine images with a default [`Compositor`].
///
/// The result is always a PNG.
pub async fn combine_images(
    items: &[CombineItem],
    options: &CombineOptions,
) -> Result<EncodedImage, CollageError> {
    Compositor::new()?.combine(items, options).await
}
