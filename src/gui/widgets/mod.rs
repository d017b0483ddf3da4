mod preview;

pub use preview::ImagePreview;

use iced::widget::{Column, Container, column, container, row, scrollable, text};
use iced::{Color, Element, Length, Theme, border};
use iced_widget::container::bordered_box;

use crate::display::table::COLUMNS;
use crate::models::TableRow;

const COLUMN_WIDTH: f32 = 100.0;
const ROW_HEIGHT: f32 = 28.0;
const VISIBLE_ROWS: usize = 5;
const PLACEHOLDER_COLOR: Color = Color::from_rgb(0.5, 0.5, 0.5);

/// Titled, bordered box around `content`
pub fn panel<'a, Message>(
    title: &'a str,
    content: impl Into<Element<'a, Message>>,
) -> Container<'a, Message>
where
    Message: 'a,
{
    container(column![text(title).size(16), content.into()].spacing(10))
        .style(|theme: &Theme| bordered_box(theme).border(border::width(1).rounded(4.0)))
        .padding(10)
}

fn cell<'a, Message: 'a>(value: &'a str) -> Element<'a, Message> {
    container(text(value).size(14))
        .center_x(Length::Fixed(COLUMN_WIDTH))
        .center_y(Length::Fixed(ROW_HEIGHT))
        .into()
}

/// Class / confidence / position table. Scrolls past five rows.
pub fn results_table<'a, Message: 'a>(rows: &'a [TableRow]) -> Element<'a, Message> {
    if rows.is_empty() {
        return text("No image processed yet.")
            .size(14)
            .color(PLACEHOLDER_COLOR)
            .into();
    }

    if let [TableRow::Placeholder(message)] = rows {
        return text(message.as_str())
            .size(14)
            .color(PLACEHOLDER_COLOR)
            .into();
    }

    let header = row(COLUMNS.iter().map(|title| cell(title)));

    let body = Column::with_children(rows.iter().filter_map(TableRow::as_result).map(|r| {
        row![
            cell(&r.class_name),
            cell(&r.confidence_text),
            cell(&r.position_text),
        ]
        .into()
    }));

    let visible = rows.len().min(VISIBLE_ROWS) as f32;
    column![
        header,
        scrollable(body).height(Length::Fixed(visible * ROW_HEIGHT)),
    ]
    .into()
}
