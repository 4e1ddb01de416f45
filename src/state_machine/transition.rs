//! Pure state transition function

use super::menu::{Choice, MAIN_MENU, PARTING_MENU};
use super::{ChatContext, ChatState, Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effect: Effect,
}

impl TransitionResult {
    pub fn new(state: ChatState, effect: Effect) -> Self {
        Self {
            new_state: state,
            effect,
        }
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("No transition from {state} for {event:?}")]
    UnhandledInput { state: ChatState, event: Event },
}

/// Pure transition function.
///
/// Given the same inputs it always produces the same outputs, with no I/O.
/// The caller executes the effect and decides what to persist when the
/// effect fails.
pub fn transition(
    state: ChatState,
    context: &ChatContext,
    event: &Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Administrative closure wins over any menu context
        (_, Event::Closure { .. }) => Ok(TransitionResult::new(
            ChatState::Greetings,
            Effect::HideInputControls,
        )),

        (ChatState::Dummy | ChatState::Greetings, Event::Text { .. }) => Ok(
            TransitionResult::new(ChatState::MainMenu, Effect::greeting()),
        ),

        (ChatState::MainMenu, Event::Text { choice }) => {
            let result = match MAIN_MENU.find(choice).map(|o| o.choice) {
                Some(Choice::Document(document)) => TransitionResult::new(
                    ChatState::Parting,
                    Effect::deliver(context, document, PARTING_MENU),
                ),
                Some(Choice::CloseTreatment) => {
                    TransitionResult::new(ChatState::Greetings, Effect::CloseConversation)
                }
                Some(Choice::TransferToAgent) => {
                    TransitionResult::new(ChatState::Greetings, Effect::TransferToAgent)
                }
                Some(Choice::Yes | Choice::No) | None => {
                    TransitionResult::new(ChatState::MainMenu, Effect::apology(MAIN_MENU))
                }
            };
            Ok(result)
        }

        (ChatState::Parting, Event::Text { choice }) => {
            let result = match PARTING_MENU.find(choice).map(|o| o.choice) {
                Some(Choice::Yes) => TransitionResult::new(ChatState::MainMenu, Effect::greeting()),
                Some(Choice::No) => {
                    TransitionResult::new(ChatState::Greetings, Effect::CloseConversation)
                }
                Some(Choice::TransferToAgent) => {
                    TransitionResult::new(ChatState::Greetings, Effect::TransferToAgent)
                }
                Some(Choice::Document(_) | Choice::CloseTreatment) | None => {
                    TransitionResult::new(ChatState::Parting, Effect::apology(PARTING_MENU))
                }
            };
            Ok(result)
        }

        (state, Event::Unsupported { message_type }) => Err(TransitionError::UnhandledInput {
            state,
            event: Event::Unsupported {
                message_type: message_type.clone(),
            },
        }),
    }
}
