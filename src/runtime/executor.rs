//! Per-event session lifecycle

use super::traits::{MessagingGateway, SessionStore, StoreError};
use crate::gateway::GatewayError;
use crate::state_machine::{
    transition, ChatContext, ChatState, Effect, Event, InboundEvent, Session, SessionKey,
};
use std::sync::Arc;

/// How handling an event ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The effect was delivered and the transition persisted
    Advanced,
    /// The conversation was sent back to `Greetings` instead of advancing
    FellBack { reason: String },
    /// The new state could not be written; this turn is lost
    SaveFailed { reason: String },
}

/// Completion record for one handled event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub key: SessionKey,
    pub previous_state: ChatState,
    pub next_state: ChatState,
    /// Effect the state machine asked for, if any
    pub effect: Option<&'static str>,
    pub outcome: Outcome,
}

/// Load, transition, execute, persist.
///
/// Every failure ends in the conversation being returned to `Greetings`
/// (or, for a failed save, left as it was); nothing is retried.
pub struct SessionLifecycle {
    context: ChatContext,
    store: Arc<dyn SessionStore>,
    gateway: Arc<dyn MessagingGateway>,
}

impl SessionLifecycle {
    pub fn new(
        context: ChatContext,
        store: Arc<dyn SessionStore>,
        gateway: Arc<dyn MessagingGateway>,
    ) -> Self {
        Self {
            context,
            store,
            gateway,
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub async fn handle(&self, inbound: &InboundEvent) -> Processed {
        let key = inbound.key;
        if let Event::Closure { reason } = &inbound.event {
            tracing::info!(user_id = %key.user_id, line_id = %key.line_id, ?reason, "Treatment closed by platform");
        }
        let session = self.load_session(&key).await;

        let (effect, next_state, fallback) =
            match transition(session.current_state, &self.context, &inbound.event) {
                Ok(result) => {
                    let kind = result.effect.kind();
                    match self.execute_effect(&key, &result.effect).await {
                        Ok(()) => (Some(kind), result.new_state, None),
                        Err(e) => {
                            tracing::warn!(
                                user_id = %key.user_id,
                                line_id = %key.line_id,
                                effect = kind,
                                error_kind = ?e.kind,
                                error = %e,
                                "Gateway failed, returning conversation to greetings"
                            );
                            (
                                Some(kind),
                                ChatState::Greetings,
                                Some(format!("{kind} failed: {e}")),
                            )
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        user_id = %key.user_id,
                        line_id = %key.line_id,
                        error = %e,
                        "Unhandled input, returning conversation to greetings"
                    );
                    (None, ChatState::Greetings, Some(e.to_string()))
                }
            };

        let updated = session.advance(next_state);
        let outcome = match self.store.save(&key, &updated).await {
            Ok(()) => fallback.map_or(Outcome::Advanced, |reason| Outcome::FellBack { reason }),
            Err(e) => {
                tracing::error!(
                    user_id = %key.user_id,
                    line_id = %key.line_id,
                    error = %e,
                    "Failed to save session"
                );
                Outcome::SaveFailed {
                    reason: e.to_string(),
                }
            }
        };

        Processed {
            key,
            previous_state: session.current_state,
            next_state,
            effect,
            outcome,
        }
    }

    /// Stored session, or the default one when nothing usable is stored
    async fn load_session(&self, key: &SessionKey) -> Session {
        match self.store.load(key).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::info!(user_id = %key.user_id, line_id = %key.line_id, "No stored session");
                Session::default()
            }
            Err(e @ StoreError::Decode(_)) => {
                tracing::warn!(user_id = %key.user_id, line_id = %key.line_id, error = %e, "Discarding undecodable session");
                Session::default()
            }
            Err(e) => {
                tracing::warn!(user_id = %key.user_id, line_id = %key.line_id, error = %e, "Failed to read session");
                Session::default()
            }
        }
    }

    async fn execute_effect(&self, key: &SessionKey, effect: &Effect) -> Result<(), GatewayError> {
        let SessionKey { user_id, line_id } = *key;
        match effect {
            Effect::ShowMenu { text, menu } => {
                self.gateway
                    .send_message(line_id, user_id, text, *menu)
                    .await
            }
            Effect::DeliverDocument {
                document_name,
                document_path,
                caption,
                menu,
            } => {
                self.gateway
                    .send_document(line_id, user_id, document_name, document_path, caption, *menu)
                    .await
            }
            Effect::CloseConversation => self.gateway.close_conversation(line_id, user_id).await,
            Effect::TransferToAgent => self.gateway.transfer_to_agent(line_id, user_id).await,
            Effect::HideInputControls => self.gateway.hide_input_controls(line_id, user_id).await,
        }
    }
}
