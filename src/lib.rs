pub mod config;
pub mod detection;
pub mod display;
pub mod models;
pub mod pipeline;

pub use config::{AppConfig, ConfigError, DetectorParams, YoloHead};
pub use detection::{AnnotationStyle, Annotator, Detector, YoloDetector};
pub use display::{DisplayTransform, fit_to_viewport, resize_to_fit};
pub use models::{BoundingBox, Detection, ResultRow, TableRow, ViewState};
pub use pipeline::{ProcessError, process_image, process_image_blocking, process_image_with_deadline};

#[cfg(feature = "gui")]
pub mod gui;
