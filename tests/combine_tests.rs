//! # Combine Tests
//!
//! End-to-end checks of the compositor through its public API: output
//! geometry, label and title bands, determinism and load failures.
//!
//! All images are synthesized in memory, so nothing here touches the network.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use collage::render::layout::partition_rows;
use collage::{
    CollageError, Color, CombineItem, CombineOptions, Compositor, EncodedImage, ImageSource,
    Layout,
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use std::io::Cursor;

const CANONICAL: u32 = 1536;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(rgba)))
}

fn png_bytes(image: &DynamicImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn data_uri(image: &DynamicImage) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png_bytes(image)))
}

async fn combine(items: &[CombineItem], options: &CombineOptions) -> EncodedImage {
    Compositor::new()
        .unwrap()
        .combine(items, options)
        .await
        .unwrap()
}

fn decode(encoded: &EncodedImage) -> RgbaImage {
    image::load_from_memory(&encoded.bytes).unwrap().to_rgba8()
}

/// Outer gap after rescaling from `native_width` to the canonical width.
fn scaled_gap(gap: f32, native_width: u32) -> u32 {
    (gap * CANONICAL as f32 / native_width as f32).round() as u32
}

// ============================================================================
// GEOMETRY
// ============================================================================

#[tokio::test]
async fn test_output_is_never_empty() {
    let shapes = [(1, 1), (2, 40), (40, 2), (7, 3)];
    for layout in Layout::ALL {
        let items: Vec<CombineItem> = shapes
            .iter()
            .map(|&(w, h)| CombineItem::unlabeled(solid(w, h, [10, 10, 10, 255])))
            .collect();
        let out = combine(&items, &CombineOptions::default().with_layout(layout)).await;
        assert!(out.width > 0 && out.height > 0, "{:?}", layout);
        let decoded = decode(&out);
        assert_eq!((decoded.width(), decoded.height()), (out.width, out.height));
    }
}

#[tokio::test]
async fn test_content_width_is_canonical() {
    let cases: [&[(u32, u32)]; 3] = [
        &[(400, 300), (300, 400)],
        &[(12, 9), (30, 20), (5, 5)],
        &[(640, 480); 7],
    ];
    for sizes in cases {
        for layout in Layout::ALL {
            let items: Vec<CombineItem> = sizes
                .iter()
                .map(|&(w, h)| CombineItem::new(solid(w, h, [0, 0, 0, 255]), "caption"))
                .collect();
            let options = CombineOptions::default().with_layout(layout).with_gap(0.0);
            let out = combine(&items, &options).await;
            assert!(
                out.width.abs_diff(CANONICAL) <= 1,
                "{:?} {:?} -> {}",
                layout,
                sizes,
                out.width
            );
        }
    }
}

#[tokio::test]
async fn test_blank_labels_allocate_no_band() {
    let images = [solid(80, 40, [0, 0, 0, 255]), solid(40, 40, [0, 0, 0, 255])];
    for layout in Layout::ALL {
        let options = CombineOptions::default().with_layout(layout);
        let blank: Vec<CombineItem> = images
            .iter()
            .cloned()
            .map(|img| CombineItem::new(img, "   "))
            .collect();
        let unlabeled: Vec<CombineItem> =
            images.iter().cloned().map(CombineItem::unlabeled).collect();
        let labeled: Vec<CombineItem> = images
            .iter()
            .cloned()
            .map(|img| CombineItem::new(img, "x"))
            .collect();

        let blank_out = combine(&blank, &options).await;
        let unlabeled_out = combine(&unlabeled, &options).await;
        let labeled_out = combine(&labeled, &options).await;
        assert_eq!(blank_out.height, unlabeled_out.height, "{:?}", layout);
        assert!(labeled_out.height > unlabeled_out.height, "{:?}", layout);
    }
}

#[test]
fn test_grid_partition_is_balanced() {
    for n in 2..100usize {
        let rows = partition_rows(n);
        assert_eq!(rows.len(), (n as f64).sqrt().floor() as usize);
        assert_eq!(rows.iter().sum::<usize>(), n);
        let spread = rows.iter().max().unwrap() - rows.iter().min().unwrap();
        assert!(spread <= 1, "n = {}: {:?}", n, rows);
    }
}

// ============================================================================
// DETERMINISM AND FAILURES
// ============================================================================

#[tokio::test]
async fn test_identical_calls_are_byte_identical() {
    let items = vec![
        CombineItem::new(solid(50, 30, [200, 10, 10, 255]), "red"),
        CombineItem::new(solid(30, 50, [10, 200, 10, 255]), "green"),
        CombineItem::new(solid(40, 40, [10, 10, 200, 255]), "blue"),
    ];
    let options = CombineOptions::default().with_title("Determinism");
    let first = combine(&items, &options).await;
    let second = combine(&items, &options).await;
    assert!(first.bytes == second.bytes);
}

#[tokio::test]
async fn test_one_bad_image_fails_the_call() {
    let good = solid(10, 10, [0, 0, 0, 255]);
    let items = vec![
        CombineItem::unlabeled(data_uri(&good)),
        CombineItem::unlabeled(png_bytes(&good)),
        CombineItem::unlabeled("data:image/png;base64,bm90IGFuIGltYWdl"),
        CombineItem::unlabeled(good.clone()),
    ];
    let err = Compositor::new()
        .unwrap()
        .combine(&items, &CombineOptions::default())
        .await
        .unwrap_err();
    match err {
        CollageError::ImageLoad { reference, .. } => {
            assert!(reference.starts_with("data:image/png"), "{}", reference)
        }
        other => panic!("expected ImageLoad, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_items_rejected_before_loading() {
    let err = Compositor::new()
        .unwrap()
        .combine(&[], &CombineOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CollageError::EmptyInput));
}

#[tokio::test]
async fn test_file_sources_load() {
    let path = std::env::temp_dir().join(format!("collage-{}.png", uuid::Uuid::new_v4()));
    std::fs::write(&path, png_bytes(&solid(20, 10, [0, 0, 0, 255]))).unwrap();

    let source = ImageSource::parse(path.to_str().unwrap());
    assert!(matches!(source, ImageSource::Path(_)));
    let out = combine(&[CombineItem::unlabeled(source)], &CombineOptions::default()).await;
    std::fs::remove_file(&path).unwrap();

    let gap = scaled_gap(20.0, 20);
    assert_eq!(out.width, CANONICAL + 2 * gap);
}

#[tokio::test]
async fn test_oversized_layouts_fail_without_panicking() {
    let compositor = Compositor::new().unwrap();

    let squares = vec![
        CombineItem::unlabeled(solid(10, 10, [0, 0, 0, 255])),
        CombineItem::unlabeled(solid(10, 10, [0, 0, 0, 255])),
    ];
    let huge_gap = CombineOptions::default()
        .with_layout(Layout::Horizontal)
        .with_gap(5e9);
    let err = compositor.combine(&squares, &huge_gap).await.unwrap_err();
    assert!(matches!(err, CollageError::InvalidOption(_)), "{:?}", err);

    let slivers = vec![
        CombineItem::unlabeled(solid(100_000, 1, [0, 0, 0, 255])),
        CombineItem::unlabeled(solid(1, 100_000, [0, 0, 0, 255])),
    ];
    let horizontal = CombineOptions::default().with_layout(Layout::Horizontal);
    let err = compositor.combine(&slivers, &horizontal).await.unwrap_err();
    assert!(matches!(err, CollageError::SurfaceCreation { .. }), "{:?}", err);
    assert!(!err.is_input_error());
}

// ============================================================================
// SCENARIOS
// ============================================================================

/// Two labeled images side by side, each with its own centered band.
#[tokio::test]
async fn test_horizontal_pair_with_labels() {
    let yellow = Color::rgb(255, 255, 0);
    let mut options = CombineOptions::default()
        .with_layout(Layout::Horizontal)
        .with_gap(10.0);
    options.label_style.background_color = yellow;

    let items = vec![
        CombineItem::new(solid(100, 50, [0, 0, 255, 255]), "A"),
        CombineItem::new(solid(200, 50, [0, 0, 255, 255]), "B"),
    ];
    let out = combine(&items, &options).await;

    // Native content: 100 + 10 + 200 = 310 wide.
    let ratio = CANONICAL as f32 / 310.0;
    let gap = scaled_gap(10.0, 310);
    assert_eq!(out.width, CANONICAL + 2 * gap);

    let pixels = decode(&out);
    let image_bottom = gap + (50.0 * ratio).round() as u32;
    let band_bottom = out.height - gap;
    let spans = [
        (gap as f32, gap as f32 + 100.0 * ratio),
        (gap as f32 + 110.0 * ratio, gap as f32 + 310.0 * ratio),
    ];

    for (left, right) in spans {
        let (x0, x1) = (left.ceil() as u32 + 3, right.floor() as u32 - 3);
        let band = pixels.get_pixel(x0 + 10, image_bottom + 15);
        assert!(band[0] > 240 && band[1] > 240 && band[2] < 20, "{:?}", band);

        // Ink: dark pixels inside this image's band.
        let mut ink_x = Vec::new();
        for y in image_bottom + 15..band_bottom - 15 {
            for x in x0..x1 {
                if pixels.get_pixel(x, y)[0] < 200 {
                    ink_x.push(x);
                }
            }
        }
        assert!(!ink_x.is_empty(), "no label ink in band {}..{}", left, right);
        let min = *ink_x.iter().min().unwrap() as f32;
        let max = *ink_x.iter().max().unwrap() as f32;
        let band_center = (left + right) / 2.0;
        assert!(
            ((min + max) / 2.0 - band_center).abs() < 12.0,
            "label centered at {} in band centered at {}",
            (min + max) / 2.0,
            band_center
        );
    }
}

/// Five squares in a grid become rows of 3 and 2.
#[tokio::test]
async fn test_five_squares_grid() {
    assert_eq!(partition_rows(5), vec![3, 2]);

    let items: Vec<CombineItem> = (0..5)
        .map(|i| CombineItem::unlabeled(solid(60, 60, [i * 40, 0, 0, 255])))
        .collect();
    let out = combine(&items, &CombineOptions::default().with_gap(0.0)).await;

    // Row 0 is 180x60; row 1 (120x60) stretches to 180x90.
    let ratio = CANONICAL as f32 / 180.0;
    assert_eq!(out.width, CANONICAL);
    assert_eq!(out.height, (150.0 * ratio).round() as u32);

    let pixels = decode(&out);
    // Second row, first item: the fourth square (red = 120).
    let p = pixels.get_pixel(200, out.height - 200);
    assert!(p[0].abs_diff(120) <= 2, "{:?}", p);
}

/// A titled single image: content, title band and three scaled gaps.
#[tokio::test]
async fn test_vertical_with_title() {
    let options = CombineOptions::default()
        .with_layout(Layout::Vertical)
        .with_title("My Collage");
    let items = vec![CombineItem::unlabeled(solid(300, 200, [0, 128, 0, 255]))];
    let out = combine(&items, &options).await;

    let ratio = CANONICAL as f32 / 300.0;
    let gap = scaled_gap(20.0, 300);
    let content_height = (200.0 * ratio).round() as u32;
    let title_band = 3 * 40;
    assert_eq!(out.height, content_height + title_band + 3 * gap);
    assert_eq!(out.width, CANONICAL + 2 * gap);

    // The title band carries ink somewhere along its middle row.
    let pixels = decode(&out);
    let mid = gap + title_band / 2;
    let inked = (gap..gap + CANONICAL).any(|x| pixels.get_pixel(x, mid)[0] < 128);
    assert!(inked);
}
