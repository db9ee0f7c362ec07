//! Input composer for the chat view

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Renders the input line at the bottom of the chat view. Input is gated
/// while a request is pending, mirroring the controller's submit guard.
pub struct ComposerView<'a> {
    input: &'a str,
    awaiting_response: bool,
}

impl<'a> ComposerView<'a> {
    pub fn new(input: &'a str, awaiting_response: bool) -> Self {
        Self {
            input,
            awaiting_response,
        }
    }
}

impl Widget for ComposerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, border_style) = if self.awaiting_response {
            ("⏳ Waiting for reply", Style::default().fg(Color::DarkGray))
        } else {
            ("📤 Message", Style::default().fg(Color::Blue))
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);

        let inner_area = block.inner(area);
        block.render(area, buf);

        let line = if self.input.is_empty() {
            Line::from(vec![Span::styled(
                "Ask me anything...",
                Style::default().fg(Color::DarkGray),
            )])
        } else {
            // Show the tail when the input outgrows the box
            let width = inner_area.width.saturating_sub(1) as usize;
            let visible = tail_window(self.input, width);
            Line::from(vec![
                Span::raw(visible),
                Span::styled("▋", Style::default().fg(Color::Yellow)),
            ])
        };

        buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
    }
}

/// Trailing slice of `input` that fits in `width` display columns. Counts
/// columns rather than chars so wide glyphs cannot overflow the box.
fn tail_window(input: &str, width: usize) -> String {
    let mut columns = 0;
    let mut tail: Vec<char> = Vec::new();

    for ch in input.chars().rev() {
        let ch_width = ch.width().unwrap_or(0);
        if columns + ch_width > width {
            break;
        }
        columns += ch_width;
        tail.push(ch);
    }

    tail.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_window_keeps_short_input_whole() {
        assert_eq!(tail_window("hello", 10), "hello");
    }

    #[test]
    fn tail_window_slices_ascii_by_column() {
        assert_eq!(tail_window("hello world", 5), "world");
    }

    #[test]
    fn tail_window_counts_wide_glyphs_as_two_columns() {
        // Each CJK character occupies two columns
        assert_eq!(tail_window("a你好", 4), "你好");
        assert_eq!(tail_window("a你好", 3), "好");
        assert_eq!(tail_window("ab🤖", 3), "b🤖");
    }
}
