// src/services/session.rs
use std::fmt::Debug;

use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::{
    error::ChatError,
    message::{ChatRequest, ChatResponse, Message, MessageRole},
    services::chatbot::ChatApi,
};

/// A conversation with the chatbot and its transcript.
pub struct ChatSession<C> {
    id: String,
    api: C,
    messages: Vec<Message>,
}

impl<C> Debug for ChatSession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("id", &self.id)
            .field("messages", &self.messages.len())
            .finish()
    }
}

impl<C: ChatApi> ChatSession<C> {
    // Start a fresh session with an empty transcript.
    pub fn new(api: C) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            api,
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn api(&self) -> &C {
        &self.api
    }

    /// Send `text` to the chatbot and record both sides of the exchange.
    ///
    /// Blank input is rejected before anything goes over the wire. When the
    /// call fails the user's message stays in the transcript without a reply.
    pub async fn send(&mut self, text: &str) -> Result<ChatResponse, ChatError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.messages.push(Message::new(MessageRole::User, trimmed));

        let request = ChatRequest::new(trimmed);
        let response = self
            .api
            .send_message(&request)
            .instrument(info_span!("chat", session = %self.id))
            .await?;

        debug!(session = %self.id, method = ?response.method, "reply received");
        self.messages.push(Message::new(MessageRole::Bot, response.reply.clone()));
        Ok(response)
    }

    /// The transcript, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Bot)
            .map(|m| m.content.as_str())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    // Drop the transcript but keep the session id.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
