//! API request and response types

use crate::state_machine::{ChatState, Event, InboundEvent, MessageType, SessionKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message pushed by the chat platform to the webhook
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub user_id: Uuid,
    pub line_id: Uuid,
    pub message_type: MessageType,
    /// Only meaningful for text messages; absent or null otherwise
    #[serde(default)]
    pub text: Option<String>,
}

impl InboundMessage {
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.user_id, self.line_id)
    }

    /// Classify into the event the state machine understands
    pub fn into_event(self) -> InboundEvent {
        let text = self.text.as_deref().unwrap_or_default();
        let event = Event::classify(&self.message_type, text);
        InboundEvent::new(self.key(), event)
    }
}

/// Stored state of one conversation
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub line_id: Uuid,
    /// False when nothing usable is stored and the default is shown
    pub stored: bool,
    pub previous_state: ChatState,
    pub current_state: ChatState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub active_workers: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
