//! Fixed terminal palette: light text on black with a green prompt.

use ratatui::style::Color;
use viridian_core::TextStyle;

pub(crate) fn background() -> Color {
    Color::Black
}

pub(crate) fn text() -> Color {
    Color::White
}

pub(crate) fn prompt() -> Color {
    Color::Green
}

pub(crate) fn error() -> Color {
    Color::Rgb(255, 68, 68)
}

pub(crate) fn info() -> Color {
    Color::Cyan
}

pub(crate) fn for_style(style: TextStyle) -> Color {
    match style {
        TextStyle::Normal => text(),
        TextStyle::Prompt => prompt(),
        TextStyle::Error => error(),
        TextStyle::Info => info(),
    }
}
