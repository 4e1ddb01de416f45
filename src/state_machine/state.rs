//! Chat state types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

// ============================================================================
// Chat State
// ============================================================================

/// Position of a conversation within the support menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChatState {
    /// Sentinel for an uninitialized conversation
    Dummy,
    /// Entry point; the next text message shows the main menu
    #[default]
    Greetings,
    /// Main menu displayed, awaiting a choice
    MainMenu,
    /// Document delivered, awaiting yes/no/transfer
    Parting,
}

impl ChatState {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatState::Dummy => "dummy",
            ChatState::Greetings => "greetings",
            ChatState::MainMenu => "main_menu",
            ChatState::Parting => "parting",
        }
    }
}

impl fmt::Display for ChatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Session
// ============================================================================

/// Persisted conversation record for one (user, line) pair.
///
/// A conversation with no stored record behaves exactly like
/// `Session::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Session {
    pub previous_state: ChatState,
    pub current_state: ChatState,
}

impl Session {
    /// Shift the current state into `previous_state` and enter `next`
    #[must_use]
    pub fn advance(self, next: ChatState) -> Self {
        Self {
            previous_state: self.current_state,
            current_state: next,
        }
    }
}

/// Identity of a conversation: the user and the line it happens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub user_id: Uuid,
    pub line_id: Uuid,
}

impl SessionKey {
    pub fn new(user_id: Uuid, line_id: Uuid) -> Self {
        Self { user_id, line_id }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user_id, self.line_id)
    }
}

// ============================================================================
// Context
// ============================================================================

/// Static inputs to the transition function
#[derive(Debug, Clone)]
pub struct ChatContext {
    /// Directory holding the documents the main menu offers
    pub files_dir: PathBuf,
}

impl ChatContext {
    pub fn new(files_dir: impl Into<PathBuf>) -> Self {
        Self {
            files_dir: files_dir.into(),
        }
    }
}
