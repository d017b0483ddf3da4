use image::RgbImage;
use image::imageops::{self, FilterType};

/// Uniform scale plus centering offset that places an image inside a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayTransform {
    pub scale: f64,
    pub scaled_width: u32,
    pub scaled_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl DisplayTransform {
    /// Map a point in viewport coordinates back into the source image
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        (
            ((x - self.offset_x as f32) as f64 / self.scale) as f32,
            ((y - self.offset_y as f32) as f64 / self.scale) as f32,
        )
    }
}

/// Fit an `image` sized `(width, height)` into `viewport` without distortion.
///
/// Returns `None` when either size has a zero dimension, e.g. a widget that
/// has not been laid out yet. Callers should retry once a real size is known.
pub fn fit_to_viewport(image: (u32, u32), viewport: (u32, u32)) -> Option<DisplayTransform> {
    let (img_w, img_h) = image;
    let (view_w, view_h) = viewport;
    if img_w == 0 || img_h == 0 || view_w == 0 || view_h == 0 {
        return None;
    }

    let scale = (view_w as f64 / img_w as f64).min(view_h as f64 / img_h as f64);

    // Rounding can push the non-limiting side one pixel past the viewport
    let scaled_width = ((img_w as f64 * scale).round() as u32).clamp(1, view_w);
    let scaled_height = ((img_h as f64 * scale).round() as u32).clamp(1, view_h);

    Some(DisplayTransform {
        scale,
        scaled_width,
        scaled_height,
        offset_x: (view_w - scaled_width) / 2,
        offset_y: (view_h - scaled_height) / 2,
    })
}

/// Resize `image` to the size it takes up inside `viewport`
pub fn resize_to_fit(image: &RgbImage, viewport: (u32, u32)) -> Option<(RgbImage, DisplayTransform)> {
    let transform = fit_to_viewport(image.dimensions(), viewport)?;
    let resized = if (transform.scaled_width, transform.scaled_height) == image.dimensions() {
        image.clone()
    } else {
        imageops::resize(
            image,
            transform.scaled_width,
            transform.scaled_height,
            FilterType::Lanczos3,
        )
    };
    Some((resized, transform))
}
