use chrono::{DateTime, Utc};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The human typing into the composer
    User,
    /// The remote assistant (or an error surfaced on its behalf)
    Agent,
}

/// A single entry in the conversation log
#[derive(Debug, Clone)]
pub struct Message {
    pub origin: Origin,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    pub is_error: bool,
}

impl Message {
    pub fn user(text: String) -> Self {
        Self {
            origin: Origin::User,
            text,
            sent_at: Utc::now(),
            is_error: false,
        }
    }

    pub fn agent(text: String) -> Self {
        Self {
            origin: Origin::Agent,
            text,
            sent_at: Utc::now(),
            is_error: false,
        }
    }

    pub fn agent_error(text: String) -> Self {
        Self {
            origin: Origin::Agent,
            text,
            sent_at: Utc::now(),
            is_error: true,
        }
    }
}

/// The conversation state: ordered message log, input buffer, and the
/// in-flight-request flag that serializes submissions.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    log: Vec<Message>,
    pending_input: String,
    awaiting_response: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user message to the log
    pub fn push_user(&mut self, text: String) {
        self.log.push(Message::user(text));
    }

    /// Append an agent reply to the log
    pub fn push_agent(&mut self, text: String) {
        self.log.push(Message::agent(text));
    }

    /// Append a failed outcome as an error-flagged agent message
    pub fn push_agent_error(&mut self, text: String) {
        self.log.push(Message::agent_error(text));
    }

    /// Empty the log. Leaves the awaiting flag alone so an in-flight
    /// request still resolves normally.
    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Replace the input buffer with a canned example question
    pub fn select_example(&mut self, question: &str) {
        self.pending_input = question.to_string();
    }

    pub fn set_input(&mut self, input: String) {
        self.pending_input = input;
    }

    pub fn push_input_char(&mut self, ch: char) {
        self.pending_input.push(ch);
    }

    pub fn pop_input_char(&mut self) {
        self.pending_input.pop();
    }

    /// Drain the input buffer, returning its trimmed content if non-empty
    pub fn take_input(&mut self) -> Option<String> {
        let trimmed = self.pending_input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let text = trimmed.to_string();
        self.pending_input.clear();
        Some(text)
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    pub fn set_awaiting_response(&mut self, awaiting: bool) {
        self.awaiting_response = awaiting;
    }

    pub fn messages(&self) -> &[Message] {
        &self.log
    }

    #[allow(dead_code)]
    pub fn message_count(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}
