//! Core conversation state machine
//!
//! Pure transitions over a fixed support menu: given the current chat state
//! and a classified inbound event, decide the outbound effect and the next
//! state. All I/O lives in the runtime.

mod effect;
pub mod event;
pub mod menu;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{ClosureReason, Event, InboundEvent, MessageType};
pub use menu::Menu;
pub use state::{ChatContext, ChatState, Session, SessionKey};
pub use transition::{transition, TransitionError, TransitionResult};
