//! Integration tests for fitting images into the preview viewport.

use detectview::display::{fit_to_viewport, resize_to_fit};
use image::{Rgb, RgbImage};

const SIZES: [u32; 9] = [1, 3, 17, 100, 333, 640, 800, 1080, 4000];

#[test]
fn test_wide_image_in_landscape_viewport() {
    let t = fit_to_viewport((1600, 400), (800, 600)).expect("valid sizes");

    assert_eq!(t.scale, 0.5);
    assert_eq!((t.scaled_width, t.scaled_height), (800, 200));
    assert_eq!((t.offset_x, t.offset_y), (0, 200));
}

#[test]
fn test_unlaid_out_viewport_is_deferred() {
    assert!(fit_to_viewport((1600, 400), (0, 0)).is_none());
    assert!(fit_to_viewport((1600, 400), (800, 0)).is_none());
    assert!(fit_to_viewport((0, 400), (800, 600)).is_none());
}

#[test]
fn test_already_fitted_image_is_unchanged() {
    let t = fit_to_viewport((800, 600), (800, 600)).expect("valid sizes");

    assert_eq!(t.scale, 1.0);
    assert_eq!((t.scaled_width, t.scaled_height), (800, 600));
    assert_eq!((t.offset_x, t.offset_y), (0, 0));
}

#[test]
fn test_fitted_image_stays_inside_and_touches_an_edge() {
    for &vw in &SIZES {
        for &vh in &SIZES {
            for &iw in &SIZES {
                for &ih in &SIZES {
                    let t = fit_to_viewport((iw, ih), (vw, vh)).expect("valid sizes");
                    let ctx = format!("image {}x{} in viewport {}x{}: {:?}", iw, ih, vw, vh, t);

                    assert!(t.scale > 0.0, "{}", ctx);
                    assert!(t.scaled_width <= vw && t.scaled_height <= vh, "{}", ctx);
                    assert!(
                        t.scaled_width == vw || t.scaled_height == vh,
                        "image should touch a viewport edge: {}",
                        ctx
                    );
                    assert!(t.offset_x + t.scaled_width <= vw, "{}", ctx);
                    assert!(t.offset_y + t.scaled_height <= vh, "{}", ctx);

                    // Centered to within the floor-division pixel
                    let right = vw - t.offset_x - t.scaled_width;
                    let bottom = vh - t.offset_y - t.scaled_height;
                    assert!(right.abs_diff(t.offset_x) <= 1, "{}", ctx);
                    assert!(bottom.abs_diff(t.offset_y) <= 1, "{}", ctx);
                }
            }
        }
    }
}

#[test]
fn test_upscales_small_images() {
    let t = fit_to_viewport((100, 50), (800, 600)).expect("valid sizes");

    assert_eq!(t.scale, 8.0);
    assert_eq!((t.scaled_width, t.scaled_height), (800, 400));
    assert_eq!((t.offset_x, t.offset_y), (0, 100));
}

#[test]
fn test_resize_to_fit_produces_fitted_pixels() {
    let image = RgbImage::from_pixel(400, 100, Rgb([10, 200, 30]));
    let (resized, transform) = resize_to_fit(&image, (200, 200)).expect("valid sizes");

    assert_eq!(resized.dimensions(), (200, 50));
    assert_eq!(transform.offset_y, 75);
    assert!(resize_to_fit(&image, (0, 200)).is_none());
}
