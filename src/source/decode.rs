//! Byte-level decoding: data URIs, common raster formats and HEIC.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;

use crate::error::CollageError;

/// Extract the payload bytes of a `data:` URI.
///
/// Base64 payloads are decoded; anything else is returned verbatim.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, String> {
    let rest = uri
        .get(..5)
        .filter(|p| p.eq_ignore_ascii_case("data:"))
        .map(|_| &uri[5..])
        .ok_or("not a data URI")?;
    let (header, payload) = rest.split_once(',').ok_or("data URI has no payload")?;
    if header
        .split(';')
        .any(|part| part.trim().eq_ignore_ascii_case("base64"))
    {
        let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| format!("invalid base64 payload: {}", e))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Check for an ISO-BMFF container with a HEIF-family brand.
pub fn is_heic(data: &[u8]) -> bool {
    if data.len() < 12 {
        return false;
    }

    // Box size (4 bytes) followed by "ftyp"
    if &data[4..8] != b"ftyp" {
        return false;
    }

    let brand = &data[8..12];
    matches!(
        brand,
        b"heic" | b"heix" | b"hevc" | b"hevx" | b"heim" | b"heis" | b"hevm" | b"hevs" | b"mif1" | b"msf1"
    )
}

/// Decode encoded image bytes, naming `reference` in any error.
pub fn decode_bytes(bytes: &[u8], reference: &str) -> Result<DynamicImage, CollageError> {
    if bytes.is_empty() {
        return Err(CollageError::image_load(reference, "empty image data"));
    }

    let image = if is_heic(bytes) {
        decode_heic(bytes).map_err(|e| CollageError::image_load(reference, e))?
    } else {
        image::load_from_memory(bytes)
            .map_err(|e| CollageError::image_load(reference, format!("failed to decode: {}", e)))?
    };

    if image.width() == 0 || image.height() == 0 {
        return Err(CollageError::image_load(
            reference,
            "image has zero width or height",
        ));
    }
    Ok(image)
}

#[cfg(feature = "heif")]
fn decode_heic(data: &[u8]) -> Result<DynamicImage, String> {
    use image::RgbImage;
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib_heif = LibHeif::new();
    let ctx =
        HeifContext::read_from_bytes(data).map_err(|e| format!("failed to read HEIC: {}", e))?;

    let handle = ctx
        .primary_image_handle()
        .map_err(|e| format!("failed to get primary image: {}", e))?;

    let image = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|e| format!("failed to decode HEIC image: {}", e))?;

    let planes = image.planes();
    let interleaved = planes
        .interleaved
        .ok_or("no interleaved RGB data in HEIC")?;

    let width = image.width();
    let height = image.height();
    let stride = interleaved.stride;
    let data = interleaved.data;

    let mut rgb_image = RgbImage::new(width, height);
    for y in 0..height {
        let row = y as usize * stride;
        for x in 0..width {
            let offset = row + x as usize * 3;
            if let Some(px) = data.get(offset..offset + 3) {
                rgb_image.put_pixel(x, y, image::Rgb([px[0], px[1], px[2]]));
            }
        }
    }

    Ok(DynamicImage::ImageRgb8(rgb_image))
}

#[cfg(not(feature = "heif"))]
fn decode_heic(_data: &[u8]) -> Result<DynamicImage, String> {
    Err("HEIC images require the `heif` feature".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_data_uri_base64() {
        let bytes = png_bytes(3, 2);
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(&bytes));
        assert_eq!(decode_data_uri(&uri).unwrap(), bytes);
    }

    #[test]
    fn test_decode_data_uri_plain_and_invalid() {
        assert_eq!(decode_data_uri("data:text/plain,hello").unwrap(), b"hello");
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
        assert!(decode_data_uri("http://x").is_err());
    }

    #[test]
    fn test_decode_bytes_round_trips_dimensions() {
        let img = decode_bytes(&png_bytes(7, 5), "mem").unwrap();
        assert_eq!((img.width(), img.height()), (7, 5));
    }

    #[test]
    fn test_decode_bytes_rejects_garbage() {
        let err = decode_bytes(b"definitely not an image", "junk.bin").unwrap_err();
        match err {
            CollageError::ImageLoad { reference, .. } => assert_eq!(reference, "junk.bin"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(decode_bytes(&[], "empty").is_err());
    }

    #[test]
    fn test_is_heic() {
        let mut header = vec![0u8, 0, 0, 24];
        header.extend_from_slice(b"ftypheic");
        assert!(is_heic(&header));
        assert!(!is_heic(&png_bytes(1, 1)));
        assert!(!is_heic(b"short"));
    }
}
