pub mod annotate;
pub mod postprocess;
pub mod yolo;

use image::DynamicImage;

use crate::models::Detection;

pub use annotate::{AnnotationStyle, Annotator};
pub use yolo::YoloDetector;

/// Anything that can find objects in an image
pub trait Detector: Send + Sync {
    /// Detections in source image pixel coordinates, highest confidence first
    fn detect(&self, image: &DynamicImage) -> anyhow::Result<Vec<Detection>>;

    /// Human-readable name (used in log output)
    fn name(&self) -> &str;
}
