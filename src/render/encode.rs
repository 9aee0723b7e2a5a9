//! Output encoding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::config::OutputFormat;
use crate::error::CollageError;

/// An encoded collage ready to send or save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

impl EncodedImage {
    /// Encode `image` as `format`.
    ///
    /// JPEG has no alpha channel, so the image is flattened to RGB first.
    pub fn encode(image: &RgbaImage, format: OutputFormat) -> Result<Self, CollageError> {
        let mut bytes = Vec::new();
        let result = match format {
            OutputFormat::Png => image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png),
            OutputFormat::Jpeg => DynamicImage::ImageRgba8(image.clone())
                .to_rgb8()
                .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg),
        };
        result.map_err(|e| CollageError::Encode(e.to_string()))?;

        Ok(Self {
            bytes,
            width: image.width(),
            height: image.height(),
            format,
        })
    }

    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime(), STANDARD.encode(&self.bytes))
    }
}
