//! Terminal setup and the chat event loop

use crate::config::Config;
use crate::controller::ConversationController;
use crate::ui::{ComposerView, HistoryView, EXAMPLE_QUESTIONS};
use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io::Stdout;
use tokio::time::{interval, Duration};

/// The interactive chat application
pub struct App {
    controller: ConversationController,
    config: Config,
    should_quit: bool,
}

impl App {
    pub fn new(controller: ConversationController, config: Config) -> Self {
        Self {
            controller,
            config,
            should_quit: false,
        }
    }

    /// Run the chat loop until the user quits
    pub async fn run(mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        let mut events = EventStream::new();
        // The tick drains completed request outcomes and animates the
        // thinking indicator
        let mut tick = interval(Duration::from_millis(100));

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                maybe_event = events.next() => {
                    if let Some(Ok(Event::Key(key))) = maybe_event {
                        self.handle_key(key);
                    }
                }
                _ = tick.tick() => {
                    self.controller.poll();
                }
            }
        }

        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(3)])
            .split(frame.size());

        let conversation = self.controller.conversation();
        frame.render_widget(
            HistoryView::new(
                conversation.messages(),
                conversation.awaiting_response(),
                self.config.ui.show_timestamps,
            ),
            chunks[0],
        );
        frame.render_widget(
            ComposerView::new(
                conversation.pending_input(),
                conversation.awaiting_response(),
            ),
            chunks[1],
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.controller.clear();
            }
            KeyCode::Enter => {
                self.controller.submit();
            }
            // Editing is disabled while a request is pending, same as the
            // submit guard; quit and clear stay live
            KeyCode::Backspace => {
                if !self.controller.awaiting_response() {
                    self.controller.pop_input_char();
                }
            }
            KeyCode::Char(ch) => {
                if self.controller.awaiting_response() {
                    return;
                }
                // On the welcome screen a bare digit picks an example
                if let Some(question) = self.example_for_digit(ch) {
                    self.controller.select_example(question);
                } else {
                    self.controller.push_input_char(ch);
                }
            }
            _ => {}
        }
    }

    fn example_for_digit(&self, ch: char) -> Option<&'static str> {
        let conversation = self.controller.conversation();
        if !conversation.is_empty() || !conversation.pending_input().is_empty() {
            return None;
        }
        let index = ch.to_digit(10)? as usize;
        if index == 0 {
            return None;
        }
        EXAMPLE_QUESTIONS.get(index - 1).copied()
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::QueryError;
    use crate::controller::QueryTransport;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Fake transport whose request never resolves
    struct StalledTransport;

    #[async_trait]
    impl QueryTransport for StalledTransport {
        async fn query(&self, _message: &str) -> Result<String, QueryError> {
            std::future::pending().await
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[tokio::test]
    async fn editing_is_gated_while_awaiting_reply() {
        let controller = ConversationController::new(Arc::new(StalledTransport));
        let mut app = App::new(controller, Config::default());

        app.handle_key(key(KeyCode::Char('h')));
        app.handle_key(key(KeyCode::Char('i')));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.controller.awaiting_response());

        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Char('y')));
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.controller.conversation().pending_input(), "");
        assert_eq!(app.controller.conversation().message_count(), 1);
    }

    #[tokio::test]
    async fn clear_stays_live_while_awaiting_reply() {
        let controller = ConversationController::new(Arc::new(StalledTransport));
        let mut app = App::new(controller, Config::default());

        app.handle_key(key(KeyCode::Char('q')));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.controller.conversation().message_count(), 1);

        app.handle_key(ctrl('l'));
        assert!(app.controller.conversation().is_empty());
        assert!(app.controller.awaiting_response());
    }

    #[tokio::test]
    async fn digits_type_normally_once_conversation_started() {
        let controller = ConversationController::new(Arc::new(StalledTransport));
        let mut app = App::new(controller, Config::default());

        // Welcome screen: a digit selects an example
        app.handle_key(key(KeyCode::Char('4')));
        assert_eq!(
            app.controller.conversation().pending_input(),
            "Calculate 234 * 567"
        );

        // With input present, digits append like any other character
        app.handle_key(key(KeyCode::Char('8')));
        assert_eq!(
            app.controller.conversation().pending_input(),
            "Calculate 234 * 5678"
        );
    }
}
