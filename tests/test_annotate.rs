//! Integration tests for drawing detections onto images.

mod common;

use detectview::config::FONT_CANDIDATES;
use detectview::detection::annotate::clamp_to_image;
use image::RgbImage;
use std::path::Path;

use common::*;

fn black(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, BLACK)
}

#[test]
fn test_draws_box_outline() {
    let mut image = black(100, 100);
    let annotator = Annotator::new(AnnotationStyle::default());
    annotator.annotate(&mut image, &[make_detection("rose", 0.9, 10.0, 30.0, 50.0, 70.0)]);

    assert_eq!(image.get_pixel(10, 30), &GREEN);
    assert_eq!(image.get_pixel(30, 30), &GREEN);
    assert_eq!(image.get_pixel(50, 70), &GREEN);
    assert_eq!(image.get_pixel(10, 50), &GREEN);
    // Interior and outside untouched
    assert_eq!(image.get_pixel(30, 50), &BLACK);
    assert_eq!(image.get_pixel(5, 5), &BLACK);
}

#[test]
fn test_out_of_bounds_box_is_clamped() {
    let mut image = black(100, 80);
    let annotator = Annotator::new(AnnotationStyle::default());
    annotator.annotate(&mut image, &[make_detection("rose", 0.9, -20.0, -5.0, 150.0, 300.0)]);

    assert_eq!(image.get_pixel(0, 0), &GREEN);
    assert_eq!(image.get_pixel(99, 79), &GREEN);
    assert_eq!(image.get_pixel(50, 40), &BLACK);
}

#[test]
fn test_box_outside_image_is_skipped() {
    let mut image = black(100, 100);
    let annotator = Annotator::new(AnnotationStyle::default());
    annotator.annotate(&mut image, &[make_detection("rose", 0.9, 200.0, 200.0, 300.0, 300.0)]);

    assert!(image.pixels().all(|p| *p == BLACK));
}

#[test]
fn test_thickness_grows_inwards() {
    let mut image = black(100, 100);
    let style = AnnotationStyle {
        thickness: 3,
        ..Default::default()
    };
    Annotator::new(style).annotate(&mut image, &[make_detection("rose", 0.9, 10.0, 10.0, 60.0, 60.0)]);

    assert_eq!(image.get_pixel(10, 30), &GREEN);
    assert_eq!(image.get_pixel(12, 30), &GREEN);
    assert_eq!(image.get_pixel(13, 30), &BLACK);
    assert_eq!(image.get_pixel(9, 30), &BLACK);
}

#[test]
fn test_clamp_to_image() {
    let rect = clamp_to_image(&BoundingBox::new(-3.0, 4.7, 20.2, 500.0), 64, 48).expect("visible");
    assert_eq!((rect.left(), rect.top()), (0, 4));
    assert_eq!((rect.right(), rect.bottom()), (20, 47));

    assert!(clamp_to_image(&BoundingBox::new(1.0, 1.0, 5.0, 5.0), 0, 0).is_none());
}

/// Annotator with the first installed system font, if any
fn labelling_annotator() -> anyhow::Result<Option<Annotator>> {
    let Some(font) = FONT_CANDIDATES.iter().map(Path::new).find(|p| p.is_file()) else {
        eprintln!("no system font installed, skipping label rendering");
        return Ok(None);
    };
    Ok(Some(Annotator::new(AnnotationStyle::default()).with_font_file(font)?))
}

#[test]
fn test_label_drawn_above_box_when_font_available() -> anyhow::Result<()> {
    let Some(annotator) = labelling_annotator()? else {
        return Ok(());
    };
    assert!(annotator.has_font());

    let mut image = black(200, 120);
    annotator.annotate(&mut image, &[make_detection("rose", 0.87, 20.0, 60.0, 120.0, 110.0)]);

    let label_pixels = image
        .enumerate_pixels()
        .filter(|(x, y, p)| *y < 60 && (20..200).contains(x) && p[1] > 0)
        .count();
    assert!(label_pixels > 0, "expected label text above the box");
    Ok(())
}

#[test]
fn test_label_moves_inside_box_near_top_edge() -> anyhow::Result<()> {
    let Some(annotator) = labelling_annotator()? else {
        return Ok(());
    };

    let mut image = black(200, 120);
    annotator.annotate(&mut image, &[make_detection("rose", 0.87, 20.0, 5.0, 150.0, 100.0)]);

    // Strictly inside the outline, in the band the label occupies
    let label_pixels = image
        .enumerate_pixels()
        .filter(|(x, y, p)| (6..=25).contains(y) && (21..150).contains(x) && p[1] > 0)
        .count();
    assert!(label_pixels > 0, "expected label text inside the box");
    Ok(())
}

#[test]
fn test_with_font_file_rejects_garbage() {
    let file = create_temp_file(".ttf", b"definitely not a font");
    let result = Annotator::new(AnnotationStyle::default()).with_font_file(file.path());
    assert!(result.is_err());
}
