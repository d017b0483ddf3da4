use std::path::PathBuf;
use std::sync::Arc;

use crate::models::ViewState;
use crate::pipeline::ProcessError;

#[derive(Debug, Clone)]
pub enum Message {
    UploadPressed,
    FileChosen(Option<PathBuf>),
    /// Result of the upload with the given generation number
    Processed(u64, Result<Arc<ViewState>, Arc<ProcessError>>),
    ErrorDismissed,
}
