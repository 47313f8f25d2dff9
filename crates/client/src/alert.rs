//! User-facing alerts.
//!
//! Every failure ends as an [`Alert`] with a short title and message:
//! validation failures list each field, a lost session asks the user to
//! sign in again, and anything else gets a generic message for the action
//! that failed. Plant lookup failures never get here; they are absorbed
//! by [`LotRepository`](crate::lots::LotRepository).

use std::fmt;

use sprout_core::error::CoreError;

use crate::error::ClientError;

pub const ERROR_TITLE: &str = "Error";
pub const VALIDATION_TITLE: &str = "Please fix the following errors:";
pub const SESSION_ENDED: &str = "Your session has ended. Please sign in again.";

/// What the user was doing when the failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SignIn,
    SignUp,
    LoadCatalog,
    LoadLots,
    CreateLot,
    DeleteLot,
    LoadJournal,
    SaveJournalEntry,
    DeleteJournalEntry,
    LoadNotifications,
    SaveNotification,
}

impl Action {
    fn failure_message(self) -> &'static str {
        match self {
            Action::SignIn | Action::SignUp => "Authorization failed",
            Action::LoadCatalog => "Could not load the plant catalog",
            Action::LoadLots => "Could not load lots",
            Action::CreateLot => "Could not create the lot",
            Action::DeleteLot => "Could not delete the lot",
            Action::LoadJournal => "Could not load the journal",
            Action::SaveJournalEntry => "Could not save the journal entry",
            Action::DeleteJournalEntry => "Could not delete the journal entry",
            Action::LoadNotifications => "Could not load notifications",
            Action::SaveNotification => "Could not save the notification",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn from_error(action: Action, err: &ClientError) -> Self {
        match err {
            ClientError::Core(CoreError::Validation(violations)) => {
                let message = violations
                    .iter()
                    .map(|v| format!("• {}", v.message))
                    .collect::<Vec<_>>()
                    .join("\n");
                Alert::new(VALIDATION_TITLE, message)
            }
            ClientError::Unauthenticated => Alert::new(ERROR_TITLE, SESSION_ENDED),
            _ if matches!(action, Action::SignIn | Action::SignUp) => {
                let reason = err
                    .server_message()
                    .unwrap_or_else(|| action.failure_message().to_string());
                let code = err
                    .status()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                Alert::new(ERROR_TITLE, format!("{reason}\nCode: {code}"))
            }
            _ => Alert::new(ERROR_TITLE, action.failure_message()),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.title, self.message)
    }
}
