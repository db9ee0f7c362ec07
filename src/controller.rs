use crate::client::{QueryClient, QueryError};
use crate::conversation::Conversation;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Outcome of one submission cycle, delivered back to the controller
type QueryOutcome = Result<String, QueryError>;

/// Transport seam so the controller can be driven without a live backend
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn query(&self, message: &str) -> Result<String, QueryError>;
}

#[async_trait]
impl QueryTransport for QueryClient {
    async fn query(&self, message: &str) -> Result<String, QueryError> {
        QueryClient::query(self, message).await
    }
}

/// Owns the conversation state and serializes the request lifecycle.
///
/// Each submission walks IDLE -> SENDING -> (RESOLVED | FAILED) -> IDLE.
/// The awaiting flag gates new sends, so at most one request is ever in
/// flight and the log reflects real submission order. Completions arrive
/// over a channel and are folded in by `poll` (UI tick) or
/// `resolve_pending` (one-shot).
pub struct ConversationController {
    conversation: Conversation,
    transport: Arc<dyn QueryTransport>,
    outcome_tx: mpsc::UnboundedSender<QueryOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<QueryOutcome>,
}

impl ConversationController {
    pub fn new(transport: Arc<dyn QueryTransport>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            conversation: Conversation::new(),
            transport,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn awaiting_response(&self) -> bool {
        self.conversation.awaiting_response()
    }

    /// Submit the pending input. No-op when the trimmed input is empty or
    /// a request is already in flight. Returns whether a request was
    /// actually issued.
    pub fn submit(&mut self) -> bool {
        if self.conversation.awaiting_response() {
            return false;
        }

        let Some(text) = self.conversation.take_input() else {
            return false;
        };

        info!(chars = text.len(), "submitting message");
        self.conversation.push_user(text.clone());
        self.conversation.set_awaiting_response(true);

        let transport = Arc::clone(&self.transport);
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = transport.query(&text).await;
            // Receiver only drops with the controller itself
            let _ = outcome_tx.send(outcome);
        });

        true
    }

    /// Drain completed outcomes without blocking (called from the UI tick).
    /// Returns true when the conversation changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.finish(outcome);
            changed = true;
        }
        changed
    }

    /// Wait for the in-flight request to complete. Used by the one-shot
    /// CLI path where there is no render loop to poll from.
    pub async fn resolve_pending(&mut self) {
        if !self.conversation.awaiting_response() {
            return;
        }
        if let Some(outcome) = self.outcome_rx.recv().await {
            self.finish(outcome);
        }
    }

    fn finish(&mut self, outcome: QueryOutcome) {
        match outcome {
            Ok(reply) => {
                info!(chars = reply.len(), "received reply");
                self.conversation.push_agent(reply);
            }
            Err(err) => {
                info!(error = %err, "submission failed");
                self.conversation.push_agent_error(err.user_message());
            }
        }
        self.conversation.set_awaiting_response(false);
    }

    /// Empty the log. An in-flight request still appends its outcome.
    pub fn clear(&mut self) {
        self.conversation.clear();
    }

    pub fn select_example(&mut self, question: &str) {
        self.conversation.select_example(question);
    }

    pub fn set_input(&mut self, input: String) {
        self.conversation.set_input(input);
    }

    pub fn push_input_char(&mut self, ch: char) {
        self.conversation.push_input_char(ch);
    }

    pub fn pop_input_char(&mut self) {
        self.conversation.pop_input_char();
    }
}
