//! # Image Sources
//!
//! References to input images and the loader that turns them into pixels.
//!
//! | Form | Example | Resolved by |
//! |------|---------|-------------|
//! | URL | `https://host/cat.png` | HTTP GET via `reqwest` |
//! | Data URI | `data:image/png;base64,iVBOR...` | base64 decode |
//! | Path | `photos/cat.jpg`, `file:///tmp/cat.jpg` | file read |
//! | Bytes | encoded buffer already in memory | decode only |
//! | Decoded | pixels already in memory | nothing |

mod decode;
mod loader;

pub use decode::{decode_bytes, decode_data_uri, is_heic};
pub use loader::{DefaultLoader, ImageLoader, load_all};

use image::DynamicImage;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Longest reference kept in error messages and logs.
pub const MAX_REFERENCE_CHARS: usize = 64;

/// Where an item's image comes from.
#[derive(Clone, Deserialize)]
#[serde(from = "String")]
pub enum ImageSource {
    Url(String),
    DataUri(String),
    Path(PathBuf),
    Bytes(Arc<[u8]>),
    Decoded(Arc<DynamicImage>),
}

impl ImageSource {
    /// Classify a textual reference.
    pub fn parse(reference: &str) -> Self {
        let trimmed = reference.trim();
        let lower = trimmed.get(..8).unwrap_or(trimmed).to_ascii_lowercase();
        if lower.starts_with("data:") {
            ImageSource::DataUri(trimmed.to_string())
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageSource::Url(trimmed.to_string())
        } else if let Some(path) = trimmed.strip_prefix("file://") {
            ImageSource::Path(PathBuf::from(path))
        } else {
            ImageSource::Path(PathBuf::from(trimmed))
        }
    }

    /// Short human-readable reference, truncated to [`MAX_REFERENCE_CHARS`].
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Url(s) | ImageSource::DataUri(s) => truncate(s),
            ImageSource::Path(p) => truncate(&p.display().to_string()),
            ImageSource::Bytes(b) => format!("<{} bytes>", b.len()),
            ImageSource::Decoded(img) => format!("<{}x{} image>", img.width(), img.height()),
        }
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_REFERENCE_CHARS {
        s.to_string()
    } else {
        let head: String = s.chars().take(MAX_REFERENCE_CHARS).collect();
        format!("{}...", head)
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ImageSource::Url(_) => "Url",
            ImageSource::DataUri(_) => "DataUri",
            ImageSource::Path(_) => "Path",
            ImageSource::Bytes(_) => "Bytes",
            ImageSource::Decoded(_) => "Decoded",
        };
        f.debug_tuple(kind).field(&self.describe()).finish()
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        ImageSource::parse(&s)
    }
}

impl From<&str> for ImageSource {
    fn from(s: &str) -> Self {
        ImageSource::parse(s)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(p: PathBuf) -> Self {
        ImageSource::Path(p)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes.into())
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(img: DynamicImage) -> Self {
        ImageSource::Decoded(Arc::new(img))
    }
}
