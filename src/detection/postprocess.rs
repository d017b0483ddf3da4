//! Model-independent halves of YOLO inference: letterboxing the input and
//! decoding, filtering and suppressing the raw predictions.

use anyhow::Result;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use crate::config::YoloHead;
use crate::display::{DisplayTransform, fit_to_viewport};
use crate::models::BoundingBox;

/// Gray used for letterbox padding
pub const LETTERBOX_FILL: u8 = 114;

/// Prediction kept after decoding, still in letterbox coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub class_id: usize,
    pub score: f32,
    pub bbox: BoundingBox,
}

/// Batch-0 slice of the model output as a row-major 2D matrix
#[derive(Debug, Clone)]
pub struct RawOutput {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl RawOutput {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        if data.len() != rows * cols {
            anyhow::bail!(
                "output has {} values, expected {}x{}={}",
                data.len(),
                rows,
                cols,
                rows * cols
            );
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.cols + col]
    }

    /// Pick a concrete layout. There are always far more anchors than
    /// classes, so the long axis is the anchor axis.
    pub fn resolve_head(&self, head: YoloHead) -> YoloHead {
        match head {
            YoloHead::Auto if self.rows >= self.cols => YoloHead::V5,
            YoloHead::Auto => YoloHead::V8,
            explicit => explicit,
        }
    }
}

/// Fit `image` into a `size`x`size` square, padding with [`LETTERBOX_FILL`]
pub fn letterbox(image: &RgbImage, size: u32) -> Option<(RgbImage, DisplayTransform)> {
    let transform = fit_to_viewport(image.dimensions(), (size, size))?;
    let resized = imageops::resize(
        image,
        transform.scaled_width,
        transform.scaled_height,
        FilterType::Triangle,
    );

    let mut canvas = RgbImage::from_pixel(size, size, Rgb([LETTERBOX_FILL; 3]));
    imageops::overlay(
        &mut canvas,
        &resized,
        transform.offset_x.into(),
        transform.offset_y.into(),
    );
    Some((canvas, transform))
}

/// Planar RGB scaled to `[0, 1]`, laid out as `[3, height, width]`
pub fn to_chw(image: &RgbImage) -> Vec<f32> {
    let (width, height) = image.dimensions();
    let plane = (width * height) as usize;
    let mut data = vec![0.0f32; 3 * plane];

    for (x, y, pixel) in image.enumerate_pixels() {
        let idx = (y * width + x) as usize;
        data[idx] = pixel[0] as f32 / 255.0;
        data[plane + idx] = pixel[1] as f32 / 255.0;
        data[2 * plane + idx] = pixel[2] as f32 / 255.0;
    }

    data
}

/// Turn raw predictions into scored candidates above `confidence_threshold`
pub fn decode(output: &RawOutput, head: YoloHead, confidence_threshold: f32) -> Vec<Candidate> {
    match output.resolve_head(head) {
        YoloHead::V8 => decode_v8(output, confidence_threshold),
        _ => decode_v5(output, confidence_threshold),
    }
}

fn best_class(scores: impl Iterator<Item = f32>) -> Option<(usize, f32)> {
    scores
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
}

fn decode_v5(output: &RawOutput, confidence_threshold: f32) -> Vec<Candidate> {
    if output.cols <= 5 {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for row in 0..output.rows {
        let objectness = output.get(row, 4);
        if objectness <= confidence_threshold {
            continue;
        }
        let Some((class_id, class_score)) =
            best_class((5..output.cols).map(|col| output.get(row, col)))
        else {
            continue;
        };

        let score = objectness * class_score;
        if score > confidence_threshold {
            candidates.push(Candidate {
                class_id,
                score,
                bbox: BoundingBox::from_center(
                    output.get(row, 0),
                    output.get(row, 1),
                    output.get(row, 2),
                    output.get(row, 3),
                ),
            });
        }
    }
    candidates
}

fn decode_v8(output: &RawOutput, confidence_threshold: f32) -> Vec<Candidate> {
    if output.rows <= 4 {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for anchor in 0..output.cols {
        let Some((class_id, score)) =
            best_class((4..output.rows).map(|row| output.get(row, anchor)))
        else {
            continue;
        };

        if score > confidence_threshold {
            candidates.push(Candidate {
                class_id,
                score,
                bbox: BoundingBox::from_center(
                    output.get(0, anchor),
                    output.get(1, anchor),
                    output.get(2, anchor),
                    output.get(3, anchor),
                ),
            });
        }
    }
    candidates
}

/// Per-class greedy NMS. Output is ordered by descending score.
pub fn non_max_suppression(
    mut candidates: Vec<Candidate>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }
        let suppressed = kept.iter().any(|k| {
            k.class_id == candidate.class_id && k.bbox.iou(&candidate.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(candidate);
        }
    }
    kept
}

/// Undo the letterbox and clamp to the source image
pub fn to_source_box(
    bbox: &BoundingBox,
    transform: &DisplayTransform,
    width: u32,
    height: u32,
) -> BoundingBox {
    let (x1, y1) = transform.to_source(bbox.x1, bbox.y1);
    let (x2, y2) = transform.to_source(bbox.x2, bbox.y2);
    BoundingBox::new(x1, y1, x2, y2).clamped(width, height)
}
