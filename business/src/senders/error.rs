use thiserror::Error;

use super::actions::ActionCode;
use super::model::SenderId;

/// Why a sender list load failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// A mandatory connection value was blank; no request was made.
    #[error("invalid connection config: `{0}` is required")]
    InvalidConfig(&'static str),

    /// Network failure, non-2xx status, or a body that is not the expected JSON.
    #[error("{message}")]
    TransportOrServerError {
        status: Option<u16>,
        message: String,
    },
}

impl LoadError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportOrServerError {
            status: None,
            message: message.into(),
        }
    }

    pub fn http_status(status: u16) -> Self {
        Self::TransportOrServerError {
            status: Some(status),
            message: format!("HTTP error! Status: {status}"),
        }
    }

    /// HTTP status of the failed response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::TransportOrServerError { status, .. } => *status,
            Self::InvalidConfig(_) => None,
        }
    }
}

/// Why the host could not carry out an edit or delete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionDispatchError {
    /// The host handler failed or refused.
    #[error("{0}")]
    Rejected(String),

    /// The host has no handler for this action.
    #[error("{0} is not supported by this host")]
    Unsupported(ActionCode),

    /// The grid has no row with this id.
    #[error("no sender with id `{0}`")]
    SenderNotFound(SenderId),
}

impl ActionDispatchError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_error_mentions_code() {
        let err = LoadError::http_status(500);
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = LoadError::transport("connection refused");
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn dispatch_errors_render_readably() {
        assert_eq!(
            ActionDispatchError::Unsupported(ActionCode::EditSender).to_string(),
            "EDIT_SENDER is not supported by this host"
        );
        assert_eq!(
            ActionDispatchError::SenderNotFound(SenderId::Number(9)).to_string(),
            "no sender with id `9`"
        );
    }
}
