//! User-facing messages produced by the grid.

use super::actions::ActionCode;
use super::error::{ActionDispatchError, LoadError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A non-blocking message for the host to show (toast, status line, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }

    pub fn load_failed(err: &LoadError) -> Self {
        Self::error(format!("Failed to load email senders data: {err}"))
    }

    pub fn action_succeeded(code: ActionCode, sender_name: &str) -> Self {
        match code {
            ActionCode::EditSender => {
                Self::success(format!("Sender \"{sender_name}\" opened for editing"))
            }
            ActionCode::DeleteSender => {
                Self::success(format!("Sender \"{sender_name}\" deleted successfully"))
            }
        }
    }

    pub fn action_failed(code: ActionCode, sender_name: &str, err: &ActionDispatchError) -> Self {
        match code {
            ActionCode::EditSender => Self::error(format!(
                "Failed to open sender \"{sender_name}\" for editing: {err}"
            )),
            ActionCode::DeleteSender => Self::error(format!(
                "Failed to delete sender \"{sender_name}\": {err}"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_interpolate_sender_name() {
        let ok = Notification::action_succeeded(ActionCode::DeleteSender, "Alice");
        assert_eq!(ok.level, NotificationLevel::Success);
        assert_eq!(ok.message, "Sender \"Alice\" deleted successfully");

        let failed = Notification::action_failed(
            ActionCode::EditSender,
            "Unknown",
            &ActionDispatchError::rejected("boom"),
        );
        assert!(failed.is_error());
        assert_eq!(
            failed.message,
            "Failed to open sender \"Unknown\" for editing: boom"
        );
    }

    #[test]
    fn load_failure_message_keeps_detail() {
        let n = Notification::load_failed(&LoadError::http_status(503));
        assert!(n.is_error());
        assert!(n.message.starts_with("Failed to load email senders data"));
        assert!(n.message.contains("503"));
    }
}
