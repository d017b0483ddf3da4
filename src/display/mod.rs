//! Turning processed images and detections into something a window can show.

pub mod fit;
pub mod table;

pub use fit::{DisplayTransform, fit_to_viewport, resize_to_fit};
pub use table::{NO_DETECTIONS, build_rows};
