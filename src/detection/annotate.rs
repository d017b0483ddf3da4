use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;

use crate::models::{BoundingBox, Detection};

/// Gap between the label baseline and the box's top edge
pub const LABEL_GAP: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationStyle {
    pub color: [u8; 3],
    /// Box outline width in pixels
    pub thickness: u32,
    /// Label height in pixels
    pub text_scale: f32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            color: [0, 255, 0],
            thickness: 1,
            text_scale: 20.0,
        }
    }
}

/// Draws detection boxes and labels onto images
pub struct Annotator {
    style: AnnotationStyle,
    font: Option<FontVec>,
}

impl Annotator {
    /// Boxes only; labels need a font (see [`Annotator::with_font_file`])
    pub fn new(style: AnnotationStyle) -> Self {
        Self { style, font: None }
    }

    pub fn with_font_file(mut self, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font {}", path.display()))?;
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| anyhow::anyhow!("Invalid font {}: {}", path.display(), e))?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw every detection onto `image` in place
    pub fn annotate(&self, image: &mut RgbImage, detections: &[Detection]) {
        let color = Rgb(self.style.color);
        let scale = PxScale::from(self.style.text_scale);
        let (width, height) = image.dimensions();

        for detection in detections {
            let Some(rect) = clamp_to_image(&detection.bbox, width, height) else {
                continue;
            };
            draw_box(image, rect, self.style.thickness, color);

            if let Some(font) = &self.font {
                let label = detection.label();
                let (_, text_h) = text_size(scale, font, &label);
                let (x, baseline) = label_origin(rect.left(), rect.top());
                // imageproc positions text by its top edge
                let top = (baseline - text_h as i32).max(0);
                draw_text_mut(image, color, x, top, scale, font, &label);
            }
        }
    }
}

/// Where a label's baseline starts for a box whose top-left is `(x1, y1)`.
///
/// Normally just above the box; boxes touching the top of the image get the
/// label just inside instead so it is not cut off.
pub fn label_origin(x1: i32, y1: i32) -> (i32, i32) {
    let above = y1 - LABEL_GAP;
    if above < LABEL_GAP {
        (x1, y1 + LABEL_GAP)
    } else {
        (x1, above)
    }
}

/// Integer rectangle of `bbox` limited to the image, `None` if nothing is left
pub fn clamp_to_image(bbox: &BoundingBox, width: u32, height: u32) -> Option<Rect> {
    if width == 0 || height == 0 {
        return None;
    }
    let clamped = bbox.clamped(width - 1, height - 1);
    let x1 = clamped.x1.min(clamped.x2) as i32;
    let y1 = clamped.y1.min(clamped.y2) as i32;
    let x2 = clamped.x1.max(clamped.x2) as i32;
    let y2 = clamped.y1.max(clamped.y2) as i32;

    let w = (x2 - x1) as u32 + 1;
    let h = (y2 - y1) as u32 + 1;
    if w < 2 || h < 2 {
        return None;
    }
    Some(Rect::at(x1, y1).of_size(w, h))
}

fn draw_box(image: &mut RgbImage, rect: Rect, thickness: u32, color: Rgb<u8>) {
    draw_hollow_rect_mut(image, rect, color);

    // Thicker outlines grow inwards
    let max_inset = (rect.width().min(rect.height()) / 2) as i32;
    for t in 1..(thickness as i32).min(max_inset) {
        let inner = Rect::at(rect.left() + t, rect.top() + t)
            .of_size(rect.width() - 2 * t as u32, rect.height() - 2 * t as u32);
        draw_hollow_rect_mut(image, inner, color);
    }
}
