//! # Error Types
//!
//! This module defines error types used throughout the collage library.
//!
//! Errors fall into three families:
//!
//! | Family | Variants | Raised |
//! |--------|----------|--------|
//! | Input validation | `EmptyInput`, `InvalidLayout`, `InvalidOption` | before any image is loaded |
//! | Image loading | `ImageLoad` | first failing source aborts the call |
//! | Environment | `SurfaceCreation`, `Encode`, `Font`, `Transport`, `Io` | drawing, encoding, serving |

use thiserror::Error;

/// Main error type for collage operations
#[derive(Debug, Error)]
pub enum CollageError {
    /// No items were supplied
    #[error("No images to combine")]
    EmptyInput,

    /// Layout name that is not grid, horizontal or vertical
    #[error("Invalid layout '{0}' (expected grid, horizontal or vertical)")]
    InvalidLayout(String),

    /// Option value out of range (negative gap, zero font size, bad color)
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// An image source could not be fetched or decoded
    #[error("Failed to load image {reference}: {reason}")]
    ImageLoad {
        /// Truncated source reference
        reference: String,
        reason: String,
    },

    /// A drawing surface could not be allocated
    #[error("Cannot allocate {width}x{height} surface: {reason}")]
    SurfaceCreation {
        width: u64,
        height: u64,
        reason: String,
    },

    /// Output encoding error
    #[error("Encode error: {0}")]
    Encode(String),

    /// Font registration error
    #[error("Font error: {0}")]
    Font(String),

    /// Server-level errors (bind, serve)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CollageError {
    /// True for errors caused by the caller's items or options.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CollageError::EmptyInput
                | CollageError::InvalidLayout(_)
                | CollageError::InvalidOption(_)
        )
    }

    /// Build an `ImageLoad` error for a source reference.
    pub fn image_load(reference: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        CollageError::ImageLoad {
            reference: reference.into(),
            reason: reason.to_string(),
        }
    }
}
