use anyhow::{Context, Result};
use image::DynamicImage;
use rten::Model;
use rten_tensor::NdTensor;
use rten_tensor::prelude::*;
use std::path::Path;
use std::time::Instant;

use crate::config::DetectorParams;
use crate::detection::Detector;
use crate::detection::postprocess::{self, RawOutput};
use crate::models::Detection;

/// YOLOv5/YOLOv8 detector running on the RTen inference engine
pub struct YoloDetector {
    model: Model,
    labels: Vec<String>,
    params: DetectorParams,
    name: String,
}

impl YoloDetector {
    /// Load a `.onnx` or `.rten` model. Class names come from `labels_path`
    /// when that file exists.
    pub fn load(model_path: &Path, labels_path: &Path, params: DetectorParams) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("Model not found: {}", model_path.display());
        }

        let started = Instant::now();
        let model = Model::load_file(model_path)
            .with_context(|| format!("Failed to load model {}", model_path.display()))?;

        let labels = if labels_path.is_file() {
            load_labels(labels_path)?
        } else {
            tracing::warn!(
                "No labels file at {}, classes will be shown by id",
                labels_path.display()
            );
            Vec::new()
        };

        let name = model_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "yolo".to_string());

        tracing::info!(
            "Loaded model {} ({} classes) in {:.0?}",
            name,
            labels.len(),
            started.elapsed()
        );

        Ok(Self {
            model,
            labels,
            params,
            name,
        })
    }

    pub fn class_name(&self, class_id: usize) -> String {
        class_name(&self.labels, class_id)
    }
}

impl Detector for YoloDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<Detection>> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let size = self.params.input_size;

        let (boxed, transform) = postprocess::letterbox(&rgb, size)
            .ok_or_else(|| anyhow::anyhow!("Image has no pixels"))?;
        let input = NdTensor::from_data(
            [1, 3, size as usize, size as usize],
            postprocess::to_chw(&boxed),
        );

        let started = Instant::now();
        let output = self
            .model
            .run_one(input.view().into(), None)
            .context("Model inference failed")?;
        let output: NdTensor<f32, 3> = output
            .try_into()
            .context("Model output is not a 3D float tensor")?;
        tracing::debug!("{} inference took {:.0?}", self.name, started.elapsed());

        let [_, rows, cols] = output.shape();
        let raw = RawOutput::new(rows, cols, output.to_vec())?;

        let candidates = postprocess::decode(&raw, self.params.head, self.params.confidence_threshold);
        let kept = postprocess::non_max_suppression(
            candidates,
            self.params.iou_threshold,
            self.params.max_detections,
        );

        Ok(kept
            .into_iter()
            .map(|c| Detection {
                class_id: c.class_id,
                class_name: self.class_name(c.class_id),
                confidence: c.score.clamp(0.0, 1.0),
                bbox: postprocess::to_source_box(&c.bbox, &transform, width, height),
            })
            .collect())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Read class names, one per line, skipping blank lines
pub fn load_labels(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read labels {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

pub fn class_name(labels: &[String], class_id: usize) -> String {
    labels
        .get(class_id)
        .cloned()
        .unwrap_or_else(|| format!("class {}", class_id))
}
