use iced::mouse::Cursor;
use iced::widget::canvas::{self, Program};
use iced::widget::image::Handle;
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};
use image::DynamicImage;

use crate::display::resize_to_fit;
use crate::models::ViewState;

const BACKGROUND: Color = Color::from_rgb(0.973, 0.976, 0.980);

/// Canvas that shows the annotated image fitted and centered in its bounds.
///
/// The resized image is cached until the canvas size changes or the owner
/// clears the cache for a new [`ViewState`].
pub struct ImagePreview<'a> {
    view_state: Option<&'a ViewState>,
    cache: &'a canvas::Cache,
}

impl<'a> ImagePreview<'a> {
    pub fn new(view_state: Option<&'a ViewState>, cache: &'a canvas::Cache) -> Self {
        Self { view_state, cache }
    }
}

impl<Message> Program<Message> for ImagePreview<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let geometry = self.cache.draw(renderer, bounds.size(), |frame| {
            frame.fill_rectangle(Point::ORIGIN, frame.size(), BACKGROUND);

            let Some(state) = self.view_state else {
                return;
            };

            // Zero until the layout pass has run; the next redraw retries
            let viewport = (bounds.width.floor() as u32, bounds.height.floor() as u32);
            let Some((fitted, transform)) = resize_to_fit(&state.annotated, viewport) else {
                return;
            };

            let (width, height) = fitted.dimensions();
            let rgba = DynamicImage::ImageRgb8(fitted).into_rgba8().into_raw();
            frame.draw_image(
                Rectangle::new(
                    Point::new(transform.offset_x as f32, transform.offset_y as f32),
                    Size::new(width as f32, height as f32),
                ),
                canvas::Image::new(Handle::from_rgba(width, height, rgba)),
            );
        });

        vec![geometry]
    }
}
