//! Static menu definitions
//!
//! Menus, phrases and documents are compiled in. A user picks an option
//! either by its numeric key or by typing its label; both compare after
//! case folding.

use super::event::normalize_choice;
use serde::Serialize;

pub const GREETING: &str = "Выберите, какая информация вас интересует:";
pub const APOLOGY: &str =
    "Извините, но я вас не понимаю. Выберите, пожалуйста, один из вариантов:";
pub const DOCUMENT_CAPTION: &str = "Вот, пожалуйста";

/// A document the bot can deliver from the files directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document {
    pub file_name: &'static str,
}

pub const EMPLOYEE_MEMO: Document = Document {
    file_name: "Памятка сотрудника.pdf",
};
pub const STAFF_REGULATIONS: Document = Document {
    file_name: "Положение о персонале.pdf",
};
pub const WISHES_POLICY: Document = Document {
    file_name: "Регламент.pdf",
};

/// What selecting an option means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Document(Document),
    CloseTreatment,
    TransferToAgent,
    Yes,
    No,
}

/// One button of a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MenuOption {
    #[serde(rename = "id")]
    pub key: &'static str,
    #[serde(rename = "text")]
    pub label: &'static str,
    #[serde(skip)]
    pub choice: Choice,
}

impl MenuOption {
    /// Whether normalized user input selects this option
    pub fn matches(&self, choice: &str) -> bool {
        choice == self.key || choice == normalize_choice(self.label)
    }
}

/// Ordered rows of buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Menu {
    pub rows: &'static [&'static [MenuOption]],
}

impl Menu {
    pub fn options(&self) -> impl Iterator<Item = &'static MenuOption> {
        self.rows.iter().flat_map(|row| row.iter())
    }

    /// Resolve normalized input to an option. Keys are checked before
    /// labels; the two never collide.
    pub fn find(&self, choice: &str) -> Option<&'static MenuOption> {
        self.options()
            .find(|o| o.key == choice)
            .or_else(|| self.options().find(|o| o.matches(choice)))
    }
}

const TRANSFER_LABEL: &str = "Перевести на специалиста";

pub const MAIN_MENU: Menu = Menu {
    rows: &[
        &[MenuOption {
            key: "1",
            label: "Памятка сотрудника",
            choice: Choice::Document(EMPLOYEE_MEMO),
        }],
        &[MenuOption {
            key: "2",
            label: "Положение о персонале",
            choice: Choice::Document(STAFF_REGULATIONS),
        }],
        &[MenuOption {
            key: "3",
            label: "Регламент о пожеланиях",
            choice: Choice::Document(WISHES_POLICY),
        }],
        &[MenuOption {
            key: "9",
            label: "Закрыть обращение",
            choice: Choice::CloseTreatment,
        }],
        &[MenuOption {
            key: "0",
            label: TRANSFER_LABEL,
            choice: Choice::TransferToAgent,
        }],
    ],
};

pub const PARTING_MENU: Menu = Menu {
    rows: &[
        &[
            MenuOption {
                key: "1",
                label: "Да",
                choice: Choice::Yes,
            },
            MenuOption {
                key: "2",
                label: "Нет",
                choice: Choice::No,
            },
        ],
        &[MenuOption {
            key: "0",
            label: TRANSFER_LABEL,
            choice: Choice::TransferToAgent,
        }],
    ],
};
