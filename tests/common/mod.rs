mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from detectview for tests
pub use detectview::detection::{AnnotationStyle, Annotator, Detector};
pub use detectview::models::{BoundingBox, Detection, ResultRow, TableRow, ViewState};
