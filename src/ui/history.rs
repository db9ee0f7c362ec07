//! Conversation history display component

use crate::conversation::{Message, Origin};
use crate::ui::EXAMPLE_QUESTIONS;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Renders the message log, or a welcome screen while it is empty
pub struct HistoryView<'a> {
    messages: &'a [Message],
    awaiting_response: bool,
    show_timestamps: bool,
}

impl<'a> HistoryView<'a> {
    pub fn new(messages: &'a [Message], awaiting_response: bool, show_timestamps: bool) -> Self {
        Self {
            messages,
            awaiting_response,
            show_timestamps,
        }
    }
}

impl Widget for HistoryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("💬 AI Chat Assistant");

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.messages.is_empty() && !self.awaiting_response {
            self.render_welcome(inner_area, buf);
            return;
        }

        // Collect all lines, then show the tail that fits
        let mut all_lines: Vec<Line> = Vec::new();
        for message in self.messages {
            let mut lines = self.render_message(message, inner_area.width);
            all_lines.append(&mut lines);
            // spacing between messages
            all_lines.push(Line::from(vec![Span::raw("")]));
        }

        if self.awaiting_response {
            all_lines.push(Line::from(vec![
                Span::styled("🤖 ", Style::default().fg(Color::Green)),
                Span::styled("Thinking...", Style::default().fg(Color::Green)),
            ]));
        }

        let height = inner_area.height as usize;
        let total = all_lines.len();
        let start = total.saturating_sub(height);
        let visible = &all_lines[start..];

        for (i, line) in visible.iter().enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

impl HistoryView<'_> {
    fn render_welcome(&self, area: Rect, buf: &mut Buffer) {
        let mut lines = vec![
            Line::from(vec![Span::styled(
                "Welcome to the AI Chat Assistant! 💬",
                Style::default().fg(Color::Green),
            )]),
            Line::from(vec![Span::raw("")]),
            Line::from(vec![Span::styled(
                "Ask me anything: explanations, calculations, weather, and more.",
                Style::default().fg(Color::Gray),
            )]),
            Line::from(vec![Span::raw("")]),
            Line::from(vec![Span::styled(
                "Try one of these (press its number):",
                Style::default().fg(Color::Gray),
            )]),
        ];

        for (i, question) in EXAMPLE_QUESTIONS.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}. ", i + 1),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(*question),
            ]));
        }

        lines.push(Line::from(vec![Span::raw("")]));
        lines.push(Line::from(vec![Span::styled(
            "Enter to send · Ctrl+L to clear · Esc to quit",
            Style::default().fg(Color::DarkGray),
        )]));

        for (i, line) in lines.iter().enumerate() {
            if i < area.height as usize {
                buf.set_line(area.x, area.y + i as u16, line, area.width);
            }
        }
    }

    /// Render a single message into lines
    fn render_message(&self, message: &Message, width: u16) -> Vec<Line> {
        let mut lines = Vec::new();

        let role_icon = match message.origin {
            Origin::User => "👤",
            Origin::Agent => "🤖",
        };

        let header = if self.show_timestamps {
            let timestamp = message.sent_at.format("%H:%M").to_string();
            format!("{} {} {}", role_icon, timestamp, "─".repeat(20))
        } else {
            format!("{} {}", role_icon, "─".repeat(20))
        };

        lines.push(Line::from(vec![Span::styled(
            header,
            Style::default().fg(Color::DarkGray),
        )]));

        let style = self.content_style(message);
        let content_lines = wrap_text(&message.text, width.saturating_sub(2) as usize);
        for content_line in content_lines {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(content_line, style),
            ]));
        }

        lines
    }

    fn content_style(&self, message: &Message) -> Style {
        if message.is_error {
            return Style::default().fg(Color::Red);
        }
        match message.origin {
            Origin::User => Style::default().fg(Color::Blue),
            Origin::Agent => Style::default().fg(Color::Green),
        }
    }
}

/// Wrap text to fit within the given width
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        // A word wider than the box gets hard-broken at the width
        if word_len > width {
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(width) {
                if chunk.len() == width {
                    lines.push(chunk.iter().collect());
                } else {
                    current_line = chunk.iter().collect();
                }
            }
            continue;
        }

        if current_line.chars().count() + word_len + 1 <= width {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        } else {
            if !current_line.is_empty() {
                lines.push(current_line);
                current_line = String::new();
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
