//! Edit/delete forwarding to the host application.
//!
//! The grid never edits or deletes senders itself. It hands the row to a
//! [`SenderActionDispatcher`] supplied by the host and reports the outcome.

use std::fmt;
use std::future::Future;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use log::{error, info};
use serde::{Deserialize, Serialize};

use super::api;
use super::error::ActionDispatchError;
use super::model::{SenderId, SenderRow};
use crate::config::ConnectionConfig;

/// Action codes understood by host dispatchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionCode {
    EditSender,
    DeleteSender,
}

impl ActionCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EditSender => "EDIT_SENDER",
            Self::DeleteSender => "DELETE_SENDER",
        }
    }
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderActionParams {
    pub sender: SenderRow,
}

/// Request object for callback-style hosts:
/// `{ "actionCode": "...", "paramsObj": { "sender": { ... } } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderActionRequest {
    pub action_code: ActionCode,
    pub params_obj: SenderActionParams,
}

impl SenderActionRequest {
    pub fn new(action_code: ActionCode, sender: SenderRow) -> Self {
        Self {
            action_code,
            params_obj: SenderActionParams { sender },
        }
    }
}

/// Host-side handler for sender actions.
#[async_trait]
pub trait SenderActionDispatcher: Send + Sync {
    async fn edit_sender(&self, sender: &SenderRow) -> Result<(), ActionDispatchError>;

    async fn delete_sender(&self, sender: &SenderRow) -> Result<(), ActionDispatchError>;

    /// Called by the grid after its connection changed. Dispatchers that talk
    /// to the sender API switch to `connection`; the rest ignore it.
    fn connection_changed(&self, _connection: &ConnectionConfig) {}
}

/// Routes `code` to the matching dispatcher method.
pub async fn forward_action(
    dispatcher: &dyn SenderActionDispatcher,
    code: ActionCode,
    sender: &SenderRow,
) -> Result<(), ActionDispatchError> {
    info!("Forwarding {code} for sender {}", sender.id);
    let result = match code {
        ActionCode::EditSender => dispatcher.edit_sender(sender).await,
        ActionCode::DeleteSender => dispatcher.delete_sender(sender).await,
    };
    if let Err(err) = &result {
        error!("{code} failed for sender {}: {err}", sender.id);
    }
    result
}

/// Adapts a single host callback taking a [`SenderActionRequest`].
pub struct CallbackDispatcher<F> {
    callback: F,
}

impl<F> CallbackDispatcher<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F, Fut> SenderActionDispatcher for CallbackDispatcher<F>
where
    F: Fn(SenderActionRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionDispatchError>> + Send + 'static,
{
    async fn edit_sender(&self, sender: &SenderRow) -> Result<(), ActionDispatchError> {
        (self.callback)(SenderActionRequest::new(
            ActionCode::EditSender,
            sender.clone(),
        ))
        .await
    }

    async fn delete_sender(&self, sender: &SenderRow) -> Result<(), ActionDispatchError> {
        (self.callback)(SenderActionRequest::new(
            ActionCode::DeleteSender,
            sender.clone(),
        ))
        .await
    }
}

/// Deletes through `DELETE /api/marketing/senders?id={id}`; cannot edit.
///
/// Follows the grid's connection, so deletes go to the server rows were
/// last loaded from.
#[derive(Debug)]
pub struct HttpDeleteDispatcher {
    config: RwLock<ConnectionConfig>,
}

impl HttpDeleteDispatcher {
    pub fn new(config: ConnectionConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    pub fn connection(&self) -> ConnectionConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SenderActionDispatcher for HttpDeleteDispatcher {
    async fn edit_sender(&self, _sender: &SenderRow) -> Result<(), ActionDispatchError> {
        Err(ActionDispatchError::Unsupported(ActionCode::EditSender))
    }

    async fn delete_sender(&self, sender: &SenderRow) -> Result<(), ActionDispatchError> {
        let config = self.connection();
        api::delete_sender(&config, &sender.id).await
    }

    fn connection_changed(&self, connection: &ConnectionConfig) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = connection.clone();
    }
}

/// Progress of the most recent action, for hosts that show a spinner.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SenderActionState {
    #[default]
    Idle,

    InFlight {
        code: ActionCode,
        sender: SenderId,
    },

    Success {
        code: ActionCode,
        sender: SenderId,
    },

    Error {
        code: ActionCode,
        sender: SenderId,
        message: String,
    },
}

impl SenderActionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::senders::model::SenderRecord;
    use chrono::Utc;
    use serde_json::json;

    fn alice() -> SenderRow {
        SenderRecord::from(json!({ "id": 1, "fromName": "Alice", "fromEmail": "a@x.com" }))
            .normalize_in(&Utc)
    }

    #[test]
    fn request_serializes_to_host_shape() {
        let request = SenderActionRequest::new(ActionCode::DeleteSender, alice());
        let value = serde_json::to_value(&request).expect("request serializes");

        assert_eq!(value["actionCode"], json!("DELETE_SENDER"));
        assert_eq!(value["paramsObj"]["sender"]["id"], json!(1));
        assert_eq!(value["paramsObj"]["sender"]["fromName"], json!("Alice"));
    }

    #[tokio::test]
    async fn callback_dispatcher_receives_action_codes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&seen);
        let dispatcher = CallbackDispatcher::new(move |request: SenderActionRequest| {
            let recorder = Arc::clone(&recorder);
            async move {
                recorder
                    .lock()
                    .expect("lock")
                    .push((request.action_code, request.params_obj.sender.id));
                Ok(())
            }
        });

        let sender = alice();
        forward_action(&dispatcher, ActionCode::EditSender, &sender)
            .await
            .expect("edit forwarded");
        forward_action(&dispatcher, ActionCode::DeleteSender, &sender)
            .await
            .expect("delete forwarded");

        assert_eq!(
            *seen.lock().expect("lock"),
            vec![
                (ActionCode::EditSender, SenderId::Number(1)),
                (ActionCode::DeleteSender, SenderId::Number(1)),
            ]
        );
    }

    #[tokio::test]
    async fn callback_rejection_is_propagated() {
        let dispatcher = CallbackDispatcher::new(|_request: SenderActionRequest| async {
            Err(ActionDispatchError::rejected("form closed"))
        });

        let err = forward_action(&dispatcher, ActionCode::DeleteSender, &alice())
            .await
            .expect_err("host rejected");
        assert_eq!(err, ActionDispatchError::rejected("form closed"));
    }

    #[tokio::test]
    async fn http_dispatcher_cannot_edit() {
        let dispatcher =
            HttpDeleteDispatcher::new(ConnectionConfig::new("http://127.0.0.1:1", "token"));
        let err = dispatcher
            .edit_sender(&alice())
            .await
            .expect_err("edit is unsupported");
        assert_eq!(err, ActionDispatchError::Unsupported(ActionCode::EditSender));
    }

    #[test]
    fn http_dispatcher_follows_connection_changes() {
        let dispatcher =
            HttpDeleteDispatcher::new(ConnectionConfig::new("https://old.example.com", "old"));
        let updated = ConnectionConfig::new("https://new.example.com", "new");

        dispatcher.connection_changed(&updated);
        assert_eq!(dispatcher.connection(), updated);
    }

    #[test]
    fn action_state_defaults_to_idle() {
        assert_eq!(SenderActionState::default(), SenderActionState::Idle);
        assert!(
            SenderActionState::InFlight {
                code: ActionCode::EditSender,
                sender: SenderId::Number(1),
            }
            .is_in_flight()
        );
    }
}
