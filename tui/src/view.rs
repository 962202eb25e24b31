//! Turns the styled scrollback into wrapped screen rows.
//!
//! Wrapping is done here rather than by the paragraph widget because the
//! cursor is a char offset into the buffer and has to map onto a screen
//! cell after wrapping.

use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use unicode_width::UnicodeWidthChar;
use viridian_core::StyledRun;
use viridian_core::TextStyle;

use crate::colors;

const TAB_STOP: usize = 8;

/// Wrapped rows plus the cursor in (column, row) screen coordinates.
pub(crate) struct Layout {
    pub rows: Vec<Line<'static>>,
    pub cursor: (u16, u16),
}

pub(crate) fn layout(runs: &[StyledRun], cursor: usize, width: u16) -> Layout {
    let width = width.max(1) as usize;
    let mut rows: Vec<Line<'static>> = Vec::new();
    let mut row = RowBuilder::default();
    let mut cursor_pos = None;
    let mut idx = 0usize;

    for run in runs {
        for ch in run.text.chars() {
            if idx == cursor {
                cursor_pos = Some((row.col as u16, rows.len() as u16));
            }
            idx += 1;
            match ch {
                '\n' => rows.push(row.take()),
                '\r' => {}
                '\t' => {
                    let mut pad = TAB_STOP - row.col % TAB_STOP;
                    if row.col + pad > width {
                        pad = width.saturating_sub(row.col);
                    }
                    row.push_spaces(pad, run.style);
                }
                _ => {
                    let Some(w) = ch.width() else {
                        continue;
                    };
                    if row.col + w > width {
                        rows.push(row.take());
                    }
                    row.push_char(ch, run.style, w);
                }
            }
        }
    }
    // The cursor normally sits at the buffer end, past the last char.
    let cursor = cursor_pos.unwrap_or((row.col as u16, rows.len() as u16));
    rows.push(row.take());
    Layout { rows, cursor }
}

#[derive(Default)]
struct RowBuilder {
    spans: Vec<Span<'static>>,
    current: String,
    current_style: Option<TextStyle>,
    col: usize,
}

impl RowBuilder {
    fn push_char(&mut self, ch: char, style: TextStyle, width: usize) {
        self.switch_style(style);
        self.current.push(ch);
        self.col += width;
    }

    fn push_spaces(&mut self, count: usize, style: TextStyle) {
        self.switch_style(style);
        for _ in 0..count {
            self.current.push(' ');
        }
        self.col += count;
    }

    fn switch_style(&mut self, style: TextStyle) {
        if self.current_style != Some(style) {
            self.flush_current();
            self.current_style = Some(style);
        }
    }

    fn flush_current(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let style = self.current_style.unwrap_or(TextStyle::Normal);
        self.spans.push(Span::styled(
            std::mem::take(&mut self.current),
            Style::default().fg(colors::for_style(style)),
        ));
    }

    fn take(&mut self) -> Line<'static> {
        self.flush_current();
        self.current_style = None;
        self.col = 0;
        Line::from(std::mem::take(&mut self.spans))
    }
}
