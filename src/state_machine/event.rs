//! Inbound events and their classification

use super::state::SessionKey;
use serde::Deserialize;
use std::fmt;

/// Message type as reported by the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum MessageType {
    Text,
    TreatmentClose,
    TreatmentCloseActive,
    TreatmentCloseDelLine,
    TreatmentCloseDelSubs,
    TreatmentCloseDelUser,
    /// Anything the bot has no handling for (files, images, ...)
    Other(String),
}

impl From<String> for MessageType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "text" => MessageType::Text,
            "treatment_close" => MessageType::TreatmentClose,
            "treatment_close_active" => MessageType::TreatmentCloseActive,
            "treatment_close_del_line" => MessageType::TreatmentCloseDelLine,
            "treatment_close_del_subs" => MessageType::TreatmentCloseDelSubs,
            "treatment_close_del_user" => MessageType::TreatmentCloseDelUser,
            _ => MessageType::Other(raw),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageType::Text => "text",
            MessageType::TreatmentClose => "treatment_close",
            MessageType::TreatmentCloseActive => "treatment_close_active",
            MessageType::TreatmentCloseDelLine => "treatment_close_del_line",
            MessageType::TreatmentCloseDelSubs => "treatment_close_del_subs",
            MessageType::TreatmentCloseDelUser => "treatment_close_del_user",
            MessageType::Other(raw) => raw,
        };
        f.write_str(s)
    }
}

/// Why the platform closed a treatment. Kept for logging only; every
/// reason is handled the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureReason {
    Closed,
    ClosedActive,
    LineDeleted,
    SubscriptionDeleted,
    UserDeleted,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Administrative closure of the treatment
    Closure { reason: ClosureReason },
    /// Free text, already normalized into a menu-choice token
    Text { choice: String },
    /// A message type with no menu semantics
    Unsupported { message_type: String },
}

impl Event {
    /// Classify a raw platform message
    pub fn classify(message_type: &MessageType, text: &str) -> Self {
        let reason = match message_type {
            MessageType::Text => {
                return Event::Text {
                    choice: normalize_choice(text),
                }
            }
            MessageType::Other(raw) => {
                return Event::Unsupported {
                    message_type: raw.clone(),
                }
            }
            MessageType::TreatmentClose => ClosureReason::Closed,
            MessageType::TreatmentCloseActive => ClosureReason::ClosedActive,
            MessageType::TreatmentCloseDelLine => ClosureReason::LineDeleted,
            MessageType::TreatmentCloseDelSubs => ClosureReason::SubscriptionDeleted,
            MessageType::TreatmentCloseDelUser => ClosureReason::UserDeleted,
        };
        Event::Closure { reason }
    }

    pub fn text(raw: &str) -> Self {
        Event::Text {
            choice: normalize_choice(raw),
        }
    }
}

/// Fold free text into the form menu keys and labels are compared in
pub fn normalize_choice(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A classified event addressed to one conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub key: SessionKey,
    pub event: Event,
}

impl InboundEvent {
    pub fn new(key: SessionKey, event: Event) -> Self {
        Self { key, event }
    }
}
