//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the lifecycle with mock implementations.

use crate::db::Database;
use crate::gateway::GatewayError;
use crate::state_machine::{Menu, Session, SessionKey};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Prefix of every session key in the store
pub const STATE_PREFIX: &str = "state:";

/// Store key for a conversation: `state:<user>:<line>`
pub fn store_key(key: &SessionKey) -> String {
    format!("{STATE_PREFIX}{}:{}", key.user_id, key.line_id)
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session store unavailable: {0}")]
    Backend(String),
    #[error("Stored session is not decodable: {0}")]
    Decode(String),
    #[error("Session cannot be encoded: {0}")]
    Encode(String),
}

/// Storage for conversation sessions.
///
/// `load` keeps "nothing stored" (`Ok(None)`) and "stored but unreadable"
/// (`Err(StoreError::Decode)`) apart, even though the lifecycle recovers
/// from both the same way.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, key: &SessionKey) -> Result<Option<Session>, StoreError>;

    /// Write the session, refreshing its expiry
    async fn save(&self, key: &SessionKey, session: &Session) -> Result<(), StoreError>;
}

/// Client for the chat platform's outbound actions
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send_message(
        &self,
        line_id: Uuid,
        user_id: Uuid,
        text: &str,
        menu: Menu,
    ) -> Result<(), GatewayError>;

    async fn send_document(
        &self,
        line_id: Uuid,
        user_id: Uuid,
        file_name: &str,
        file_path: &Path,
        caption: &str,
        menu: Menu,
    ) -> Result<(), GatewayError>;

    async fn hide_input_controls(&self, line_id: Uuid, user_id: Uuid) -> Result<(), GatewayError>;

    async fn close_conversation(&self, line_id: Uuid, user_id: Uuid) -> Result<(), GatewayError>;

    async fn transfer_to_agent(&self, line_id: Uuid, user_id: Uuid) -> Result<(), GatewayError>;
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use Database as a `SessionStore`
#[derive(Clone)]
pub struct DatabaseSessionStore {
    db: Database,
    ttl: Duration,
}

impl DatabaseSessionStore {
    pub fn new(db: Database, ttl: Duration) -> Self {
        Self { db, ttl }
    }
}

#[async_trait]
impl SessionStore for DatabaseSessionStore {
    async fn load(&self, key: &SessionKey) -> Result<Option<Session>, StoreError> {
        let raw = self
            .db
            .get(&store_key(key))
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        raw.map(|raw| serde_json::from_str(&raw).map_err(|e| StoreError::Decode(e.to_string())))
            .transpose()
    }

    async fn save(&self, key: &SessionKey, session: &Session) -> Result<(), StoreError> {
        let data = serde_json::to_string(session).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.db
            .set(&store_key(key), &data, self.ttl)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
