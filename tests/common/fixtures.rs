use detectview::detection::Detector;
use detectview::models::{BoundingBox, Detection};
use image::{DynamicImage, ImageBuffer, Rgb};
use std::time::Duration;
use tempfile::NamedTempFile;

pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Creates a black test image of the given size and returns the temp file.
/// The file will be automatically cleaned up when dropped.
pub fn create_test_image(width: u32, height: u32, suffix: &str) -> NamedTempFile {
    let img = ImageBuffer::from_pixel(width, height, BLACK);
    let format = if suffix == ".png" {
        image::ImageFormat::Png
    } else {
        image::ImageFormat::Jpeg
    };
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), format)
        .expect("Failed to save test image");
    file
}

/// Creates a temp file with the given suffix holding arbitrary bytes
pub fn create_temp_file(suffix: &str, contents: &[u8]) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    std::fs::write(file.path(), contents).expect("Failed to write temp file");
    file
}

pub fn make_detection(class_name: &str, confidence: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> Detection {
    Detection {
        class_id: 0,
        class_name: class_name.to_string(),
        confidence,
        bbox: BoundingBox::new(x1, y1, x2, y2),
    }
}

/// Returns the same detections for every image
pub struct StaticDetector {
    pub detections: Vec<Detection>,
}

impl Detector for StaticDetector {
    fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        Ok(self.detections.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Always fails, like a model that rejects its input
pub struct FailingDetector;

impl Detector for FailingDetector {
    fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        anyhow::bail!("model exploded")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Sleeps before returning nothing
pub struct SlowDetector {
    pub delay: Duration,
}

impl Detector for SlowDetector {
    fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
        std::thread::sleep(self.delay);
        Ok(Vec::new())
    }

    fn name(&self) -> &str {
        "slow"
    }
}
