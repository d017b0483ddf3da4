use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::detection::annotate::AnnotationStyle;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.25;
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.45;
pub const DEFAULT_INPUT_SIZE: u32 = 640;
pub const DEFAULT_MAX_DETECTIONS: usize = 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Fonts probed for label text when no font is configured
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },
    #[error("input size must be a positive multiple of 32, got {0}")]
    InvalidInputSize(u32),
    #[error("max detections must be at least 1")]
    NoDetectionsAllowed,
}

/// Which YOLO output layout the model produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YoloHead {
    /// Guess from the output tensor shape
    #[default]
    Auto,
    /// `[1, N, 5 + classes]` with an objectness column
    V5,
    /// `[1, 4 + classes, N]` without objectness
    V8,
}

/// Settings fixed once when the detector is built
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorParams {
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub input_size: u32,
    pub max_detections: usize,
    pub head: YoloHead,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            input_size: DEFAULT_INPUT_SIZE,
            max_detections: DEFAULT_MAX_DETECTIONS,
            head: YoloHead::Auto,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_path: PathBuf,
    /// Class names, one per line. `None` means `<model>.names`
    pub labels_path: Option<PathBuf>,
    pub font_path: Option<PathBuf>,
    pub detector: DetectorParams,
    pub style: AnnotationStyle,
    /// Deadline for one image; `None` waits forever
    pub timeout: Option<Duration>,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("best.onnx"),
            labels_path: None,
            font_path: None,
            detector: DetectorParams::default(),
            style: AnnotationStyle::default(),
            timeout: Some(DEFAULT_TIMEOUT),
            verbose: false,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.detector;
        for (name, value) in [
            ("confidence threshold", d.confidence_threshold),
            ("IoU threshold", d.iou_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }
        if d.input_size == 0 || d.input_size % 32 != 0 {
            return Err(ConfigError::InvalidInputSize(d.input_size));
        }
        if d.max_detections == 0 {
            return Err(ConfigError::NoDetectionsAllowed);
        }
        Ok(())
    }

    pub fn labels_path(&self) -> PathBuf {
        self.labels_path
            .clone()
            .unwrap_or_else(|| self.model_path.with_extension("names"))
    }

    /// Configured font, or the first system font that exists
    pub fn resolve_font(&self) -> Option<PathBuf> {
        if let Some(path) = &self.font_path {
            return Some(path.clone());
        }
        FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .find(|p| p.is_file())
            .map(Path::to_path_buf)
    }
}
