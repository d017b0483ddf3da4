use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

use detectview::config::{self, AppConfig, DetectorParams, YoloHead};
use detectview::detection::{Annotator, Detector, YoloDetector};
use detectview::display::table::COLUMNS;
use detectview::models::TableRow;
use detectview::pipeline;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Head {
    Auto,
    V5,
    V8,
}

impl From<Head> for YoloHead {
    fn from(head: Head) -> Self {
        match head {
            Head::Auto => YoloHead::Auto,
            Head::V5 => YoloHead::V5,
            Head::V8 => YoloHead::V8,
        }
    }
}

#[derive(Parser)]
#[command(name = "detectview")]
#[command(about = "Run an object detection model on images and view the results")]
struct Cli {
    /// Process this image and print the results instead of opening a window
    #[arg(value_name = "IMAGE")]
    image_path: Option<PathBuf>,

    /// YOLO model (.onnx or .rten)
    #[arg(short, long, default_value = "best.onnx")]
    model: PathBuf,

    /// Class names, one per line [default: <MODEL>.names]
    #[arg(short, long)]
    labels: Option<PathBuf>,

    /// TrueType font for box labels [default: first system font found]
    #[arg(long)]
    font: Option<PathBuf>,

    /// Minimum confidence for a detection
    #[arg(long, default_value_t = config::DEFAULT_CONFIDENCE_THRESHOLD)]
    conf: f32,

    /// IoU above which overlapping boxes of one class are suppressed
    #[arg(long, default_value_t = config::DEFAULT_IOU_THRESHOLD)]
    iou: f32,

    /// Square model input size in pixels
    #[arg(long, default_value_t = config::DEFAULT_INPUT_SIZE)]
    input_size: u32,

    /// Keep at most this many detections per image
    #[arg(long, default_value_t = config::DEFAULT_MAX_DETECTIONS)]
    max_detections: usize,

    /// Model output layout
    #[arg(long, value_enum, default_value = "auto")]
    head: Head,

    /// Give up on an image after this many seconds (0 waits forever)
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Print results as JSON (with IMAGE)
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> (AppConfig, Option<PathBuf>, bool) {
        let config = AppConfig {
            model_path: self.model,
            labels_path: self.labels,
            font_path: self.font,
            detector: DetectorParams {
                confidence_threshold: self.conf,
                iou_threshold: self.iou,
                input_size: self.input_size,
                max_detections: self.max_detections,
                head: self.head.into(),
            },
            timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            verbose: self.verbose,
            ..Default::default()
        };
        (config, self.image_path, self.json)
    }
}

fn build_annotator(config: &AppConfig) -> Annotator {
    let Some(font) = config.resolve_font() else {
        tracing::warn!("No font found, boxes will be drawn without labels (use --font)");
        return Annotator::new(config.style);
    };

    match Annotator::new(config.style).with_font_file(&font) {
        Ok(annotator) => {
            tracing::debug!("Label font: {}", font.display());
            annotator
        }
        Err(e) => {
            tracing::warn!("{:#}, boxes will be drawn without labels", e);
            Annotator::new(config.style)
        }
    }
}

fn print_table(rows: &[TableRow]) {
    println!("{:<20} {:>12} {:>14}", COLUMNS[0], COLUMNS[1], COLUMNS[2]);
    for row in rows {
        match row {
            TableRow::Placeholder(message) => println!("{}", message),
            TableRow::Result(r) => println!(
                "{:<20} {:>12} {:>14}",
                r.class_name, r.confidence_text, r.position_text
            ),
        }
    }
}

fn run_headless(
    image_path: PathBuf,
    detector: Arc<dyn Detector>,
    annotator: Arc<Annotator>,
    timeout: Option<Duration>,
    json: bool,
) -> anyhow::Result<()> {
    let state = pipeline::process_image_blocking(image_path.clone(), detector, annotator, timeout)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state.detections)?);
    } else {
        let (width, height) = state.annotated.dimensions();
        println!("\n=== {} ({}x{}) ===", image_path.display(), width, height);
        print_table(&state.rows);
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let (config, image_path, json) = Cli::parse().into_config();

    tracing_subscriber::fmt()
        .with_max_level(if config.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    config.validate()?;

    let detector = YoloDetector::load(
        &config.model_path,
        &config.labels_path(),
        config.detector.clone(),
    )
    .context("Could not start the detector")?;
    let detector: Arc<dyn Detector> = Arc::new(detector);
    let annotator = Arc::new(build_annotator(&config));

    match image_path {
        Some(path) => run_headless(path, detector, annotator, config.timeout, json),
        None => launch_gui(detector, annotator, &config),
    }
}

#[cfg(feature = "gui")]
fn launch_gui(detector: Arc<dyn Detector>, annotator: Arc<Annotator>, config: &AppConfig) -> anyhow::Result<()> {
    detectview::gui::run(detector, annotator, config.timeout)?;
    Ok(())
}

#[cfg(not(feature = "gui"))]
fn launch_gui(_detector: Arc<dyn Detector>, _annotator: Arc<Annotator>, _config: &AppConfig) -> anyhow::Result<()> {
    anyhow::bail!("Built without the `gui` feature; pass an IMAGE to run headless")
}
