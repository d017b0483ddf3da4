use image::ImageReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::detection::{Annotator, Detector};
use crate::display::build_rows;
use crate::models::ViewState;

/// Extensions accepted by the file picker and by [`process_image`]
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Why an image could not be processed
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Unsupported file type: {} (expected .jpg, .jpeg or .png)", .0.display())]
    UnsupportedExtension(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Detection failed: {0:#}")]
    Inference(#[source] anyhow::Error),
    #[error("Detection did not finish within {0:?}")]
    TimedOut(Duration),
    #[error("Detection worker stopped unexpectedly: {0}")]
    Worker(#[from] tokio::task::JoinError),
    #[error("Could not start the detection runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Detect, annotate and tabulate one image.
///
/// Blocks for as long as the detector takes.
pub fn process_image(
    path: &Path,
    detector: &dyn Detector,
    annotator: &Annotator,
) -> Result<ViewState, ProcessError> {
    if !is_supported(path) {
        return Err(ProcessError::UnsupportedExtension(path.to_path_buf()));
    }

    let started = Instant::now();
    let image = ImageReader::open(path)
        .map_err(|source| ProcessError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .with_guessed_format()
        .map_err(|source| ProcessError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .decode()?;

    tracing::debug!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );

    let detections = detector.detect(&image).map_err(ProcessError::Inference)?;

    let mut annotated = image.to_rgb8();
    annotator.annotate(&mut annotated, &detections);
    let rows = build_rows(&detections);

    tracing::info!(
        "{}: {} detections by {} in {:.0?}",
        path.display(),
        detections.len(),
        detector.name(),
        started.elapsed()
    );

    Ok(ViewState {
        source: path.to_path_buf(),
        annotated: Arc::new(annotated),
        detections,
        rows,
    })
}

/// Run [`process_image`] on a blocking worker, giving up after `deadline`.
///
/// A timed out worker is left to finish on its own; its result is discarded.
pub async fn process_image_with_deadline(
    path: PathBuf,
    detector: Arc<dyn Detector>,
    annotator: Arc<Annotator>,
    deadline: Option<Duration>,
) -> Result<ViewState, ProcessError> {
    let worker = tokio::task::spawn_blocking(move || {
        process_image(&path, detector.as_ref(), annotator.as_ref())
    });

    match deadline {
        Some(limit) => match tokio::time::timeout(limit, worker).await {
            Ok(joined) => joined?,
            Err(_) => Err(ProcessError::TimedOut(limit)),
        },
        None => worker.await?,
    }
}

/// Blocking form of [`process_image_with_deadline`] for callers without a runtime.
///
/// Uses a throwaway current-thread runtime that is shut down without waiting
/// for a timed out worker.
pub fn process_image_blocking(
    path: PathBuf,
    detector: Arc<dyn Detector>,
    annotator: Arc<Annotator>,
    deadline: Option<Duration>,
) -> Result<ViewState, ProcessError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(ProcessError::Runtime)?;

    let result = runtime.block_on(process_image_with_deadline(path, detector, annotator, deadline));
    runtime.shutdown_background();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("a/b/rose.JPG")));
        assert!(is_supported(Path::new("tulip.jpeg")));
        assert!(is_supported(Path::new("daisy.png")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("no_extension")));
    }
}
