//! Cell formats for the final-plan workbook.
//!
//! All fills/borders are applied by row kind and column index from the sheet
//! plan — never by inspecting cell content.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

/// Date header band and the 18-column table header.
pub const ASH: Color = Color::RGB(0xD9D9D9);
/// Section header rows and the Total row.
pub const SECTION_ORANGE: Color = Color::RGB(0xFABF8F);
/// Bonus data rows.
pub const BONUS_BLUE: Color = Color::RGB(0xDEEFFA);
/// Weekend date columns.
pub const WEEKEND_GREEN: Color = Color::RGB(0xD8E4BC);
/// Summary/KPI sheet headers.
pub const HEADER_GREEN: Color = Color::RGB(0xC6EFCE);

pub fn meta_label() -> Format {
    Format::new().set_align(FormatAlign::Right).set_align(FormatAlign::VerticalCenter)
}

pub fn meta_value() -> Format {
    Format::new().set_bold().set_align(FormatAlign::VerticalCenter)
}

pub fn month_header() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(ASH)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
}

/// Weekday initials run vertically to keep the day columns narrow.
pub fn weekday_header() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(ASH)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_rotation(90)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
}

pub fn day_header() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(ASH)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
}

pub fn column_header() -> Format {
    Format::new().set_bold().set_background_color(ASH).set_border(FormatBorder::Thin)
}

pub fn section_header() -> Format {
    Format::new().set_bold().set_background_color(SECTION_ORANGE)
}

pub fn data_cell() -> Format {
    Format::new()
        .set_border_left(FormatBorder::Thin)
        .set_border_right(FormatBorder::Thin)
        .set_border_top(FormatBorder::Thin)
        .set_border_bottom(FormatBorder::Thin)
}

pub fn bonus_cell() -> Format {
    data_cell().set_background_color(BONUS_BLUE)
}

pub fn total_cell() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(SECTION_ORANGE)
        .set_border(FormatBorder::Thin)
}

/// Empty date-area cell: dotted verticals inside the grid.
pub fn date_area() -> Format {
    Format::new()
        .set_border_left(FormatBorder::Dotted)
        .set_border_right(FormatBorder::Dotted)
        .set_border_top(FormatBorder::Thin)
        .set_border_bottom(FormatBorder::Thin)
}

pub fn date_area_weekend() -> Format {
    date_area().set_background_color(WEEKEND_GREEN)
}

pub fn summary_header() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(HEADER_GREEN)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
        .set_border(FormatBorder::Thin)
}

pub fn summary_text() -> Format {
    Format::new().set_align(FormatAlign::Left).set_border(FormatBorder::Thin)
}

pub fn summary_number() -> Format {
    Format::new().set_align(FormatAlign::Right).set_border(FormatBorder::Thin)
}
