use iced::widget::{button, canvas, column, container, row, text};
use iced::{Element, Length, Task, Theme};
use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageLevel};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::Message;
use super::widgets::{ImagePreview, panel, results_table};
use crate::detection::{Annotator, Detector};
use crate::models::ViewState;
use crate::pipeline::{self, SUPPORTED_EXTENSIONS};

const WINDOW_SIZE: (f32, f32) = (1000.0, 700.0);
const CONTROL_WIDTH: f32 = 340.0;

pub struct DetectViewApp {
    detector: Arc<dyn Detector>,
    annotator: Arc<Annotator>,
    timeout: Option<Duration>,
    /// What the window currently shows; replaced as a whole per upload
    view_state: Option<Arc<ViewState>>,
    preview_cache: canvas::Cache,
    /// Bumped on every upload so late results from older uploads are dropped
    generation: u64,
    status: String,
}

impl DetectViewApp {
    pub fn new(
        detector: Arc<dyn Detector>,
        annotator: Arc<Annotator>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            detector,
            annotator,
            timeout,
            view_state: None,
            preview_cache: canvas::Cache::new(),
            generation: 0,
            status: "Upload an image to start.".to_string(),
        }
    }

    pub fn title(&self) -> String {
        match &self.view_state {
            Some(state) => format!(
                "DetectView - {}",
                state
                    .source
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_default()
            ),
            None => "DetectView".to_string(),
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UploadPressed => Task::perform(
                AsyncFileDialog::new()
                    .set_title("Select an image")
                    .add_filter("Image files", &SUPPORTED_EXTENSIONS)
                    .pick_file(),
                |handle| Message::FileChosen(handle.map(|h| h.path().to_path_buf())),
            ),
            Message::FileChosen(None) => Task::none(),
            Message::FileChosen(Some(path)) => self.start_processing(path),
            Message::Processed(generation, _) if generation != self.generation => {
                tracing::debug!("Dropping result of superseded upload {}", generation);
                Task::none()
            }
            Message::Processed(_, Ok(state)) => {
                self.status = format!(
                    "{} object(s) found in {}",
                    state.detections.len(),
                    state.source.display()
                );
                self.view_state = Some(state);
                self.preview_cache.clear();
                Task::none()
            }
            Message::Processed(_, Err(err)) => {
                tracing::error!("{}", err);
                self.status = "Processing failed.".to_string();
                show_error(format!("Error while processing image: {}", err))
            }
            Message::ErrorDismissed => Task::none(),
        }
    }

    fn start_processing(&mut self, path: PathBuf) -> Task<Message> {
        self.generation += 1;
        let generation = self.generation;
        self.status = format!("Detecting objects in {}...", path.display());

        Task::perform(
            pipeline::process_image_with_deadline(
                path,
                self.detector.clone(),
                self.annotator.clone(),
                self.timeout,
            ),
            move |result| Message::Processed(generation, result.map(Arc::new).map_err(Arc::new)),
        )
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = container(text("Object Detection").size(28))
            .center_x(Length::Fill)
            .padding(10);

        let rows = self
            .view_state
            .as_ref()
            .map(|s| s.rows.as_slice())
            .unwrap_or_default();

        let controls = column![
            button("Upload image")
                .on_press(Message::UploadPressed)
                .padding(10),
            text(&self.status).size(14),
            panel("Results", results_table(rows)).width(Length::Fill),
        ]
        .spacing(15)
        .width(Length::Fixed(CONTROL_WIDTH));

        let preview = panel(
            "Preview",
            canvas(ImagePreview::new(
                self.view_state.as_deref(),
                &self.preview_cache,
            ))
            .width(Length::Fill)
            .height(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill);

        column![header, row![controls, preview].spacing(20).height(Length::Fill)]
            .padding(20)
            .into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn show_error(message: String) -> Task<Message> {
    // Built inside the task so no dialog exists until the runtime polls it
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(MessageLevel::Error)
                .set_title("Error")
                .set_description(message)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::ErrorDismissed,
    )
}

/// Open the main window and block until it is closed
pub fn run(
    detector: Arc<dyn Detector>,
    annotator: Arc<Annotator>,
    timeout: Option<Duration>,
) -> iced::Result {
    iced::application(
        move || DetectViewApp::new(detector.clone(), annotator.clone(), timeout),
        DetectViewApp::update,
        DetectViewApp::view,
    )
    .title(DetectViewApp::title)
    .theme(DetectViewApp::theme)
    .window_size(WINDOW_SIZE)
    .centered()
    .run()
}
