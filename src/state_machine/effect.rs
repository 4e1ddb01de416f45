//! Effects produced by state transitions

use super::menu::{Document, Menu, APOLOGY, DOCUMENT_CAPTION, GREETING, MAIN_MENU};
use super::state::ChatContext;
use std::path::PathBuf;

/// Outbound action for the runtime to perform through the messaging gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a text message with a keyboard menu
    ShowMenu { text: &'static str, menu: Menu },

    /// Send a document from the files directory, followed by a menu
    DeliverDocument {
        document_name: &'static str,
        document_path: PathBuf,
        caption: &'static str,
        menu: Menu,
    },

    /// Close the treatment on the platform
    CloseConversation,

    /// Hand the treatment over to a human specialist
    TransferToAgent,

    /// Remove the keyboard from the user's client
    HideInputControls,
}

impl Effect {
    pub fn greeting() -> Self {
        Effect::ShowMenu {
            text: GREETING,
            menu: MAIN_MENU,
        }
    }

    pub fn apology(menu: Menu) -> Self {
        Effect::ShowMenu {
            text: APOLOGY,
            menu,
        }
    }

    pub fn deliver(context: &ChatContext, document: Document, menu: Menu) -> Self {
        Effect::DeliverDocument {
            document_name: document.file_name,
            document_path: context.files_dir.join(document.file_name),
            caption: DOCUMENT_CAPTION,
            menu,
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::ShowMenu { .. } => "show_menu",
            Effect::DeliverDocument { .. } => "deliver_document",
            Effect::CloseConversation => "close_conversation",
            Effect::TransferToAgent => "transfer_to_agent",
            Effect::HideInputControls => "hide_input_controls",
        }
    }
}
