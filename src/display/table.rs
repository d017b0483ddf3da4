use crate::models::{BoundingBox, Detection, ResultRow, TableRow};

/// Text of the single row shown when an image has no detections
pub const NO_DETECTIONS: &str = "No objects detected";

/// Column headings, in display order
pub const COLUMNS: [&str; 3] = ["Class", "Confidence", "Position"];

/// Build the results table for one image.
///
/// Rows keep the detector's order; nothing is sorted, filtered or merged.
pub fn build_rows(detections: &[Detection]) -> Vec<TableRow> {
    if detections.is_empty() {
        return vec![TableRow::Placeholder(NO_DETECTIONS.to_string())];
    }

    detections
        .iter()
        .map(|d| TableRow::Result(result_row(d)))
        .collect()
}

pub fn result_row(detection: &Detection) -> ResultRow {
    ResultRow {
        class_name: detection.class_name.clone(),
        confidence_text: format_confidence(detection.confidence),
        position_text: format_position(&detection.bbox),
    }
}

/// `0.8725` -> `87.25%`
pub fn format_confidence(confidence: f32) -> String {
    format!("{:.2}%", confidence.clamp(0.0, 1.0) * 100.0)
}

/// Top-left corner only, rounded: `(12, 40)`
pub fn format_position(bbox: &BoundingBox) -> String {
    format!("({:.0}, {:.0})", bbox.x1.round(), bbox.y1.round())
}
