use image::RgbImage;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Axis-aligned box in source image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build from a YOLO style center/size box
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x1: cx - w / 2.0,
            y1: cy - h / 2.0,
            x2: cx + w / 2.0,
            y2: cy + h / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            return 0.0;
        }
        inter / union
    }

    /// Clamp to `[0, width] x [0, height]`
    pub fn clamped(&self, width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        Self {
            x1: self.x1.clamp(0.0, w),
            y1: self.y1.clamp(0.0, h),
            x2: self.x2.clamp(0.0, w),
            y2: self.y2.clamp(0.0, h),
        }
    }
}

/// One object found by a detector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub class_id: usize,
    pub class_name: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    /// Label drawn next to the box, e.g. `rose 0.87`
    pub fn label(&self) -> String {
        format!("{} {:.2}", self.class_name, self.confidence)
    }
}

/// Display projection of a [`Detection`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub class_name: String,
    pub confidence_text: String,
    pub position_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    /// Shown instead of any result when nothing was detected
    Placeholder(String),
    Result(ResultRow),
}

impl TableRow {
    pub fn as_result(&self) -> Option<&ResultRow> {
        match self {
            TableRow::Result(row) => Some(row),
            TableRow::Placeholder(_) => None,
        }
    }
}

/// Everything the window shows for one processed image.
///
/// Built once per upload and never mutated afterwards; a new upload replaces
/// the whole value.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub source: PathBuf,
    pub annotated: Arc<RgbImage>,
    pub detections: Vec<Detection>,
    pub rows: Vec<TableRow>,
}

impl ViewState {
    pub fn result_rows(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter().filter_map(TableRow::as_result)
    }
}
