use crate::models::{ChatResponse, Message, Usage};

/// Ordered conversation held by the client for the lifetime of a session
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    last_usage: Usage,
    total_usage: Usage,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append the user's turn before it is sent
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Append the assistant's turn after a successful call.
    ///
    /// Failed calls are never recorded: the user turn stays, nothing else changes.
    pub fn record_reply(&mut self, response: &ChatResponse) {
        self.messages.push(Message::assistant(response.response.clone()));
        self.last_usage = response.usage;
        self.total_usage.accumulate(&response.usage);
    }

    /// Usage of the most recent turn
    pub fn last_usage(&self) -> Usage {
        self.last_usage
    }

    /// Usage summed over the session
    pub fn total_usage(&self) -> Usage {
        self.total_usage
    }

    /// Forget everything; purely local
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
