//! The sender grid controller.
//!
//! Hosts embed a [`SenderGrid`] and drive it from their event loop:
//! - `mount()` once, then `pump()` every tick (or `settle()` to wait)
//! - forward search input with `set_query()`
//! - forward edit/delete clicks with `edit()` / `delete()`
//! - show whatever `take_notifications()` returns
//!
//! Spawning uses `tokio`, so `mount()`, `reload()` and `set_connection()` must
//! be called from within a tokio runtime.

use std::sync::Arc;

use log::{info, warn};
use sender_grid_states::{HostSignalSource, SignalSubscription};
use tokio::task::{JoinError, JoinSet};

use super::actions::{ActionCode, SenderActionDispatcher, SenderActionState, forward_action};
use super::error::{ActionDispatchError, LoadError};
use super::filter::filter_rows;
use super::loader::{LoadEvent, SenderListState, SenderLoader};
use super::model::{SenderId, SenderRow, UNKNOWN};
use super::notification::Notification;
use crate::config::{ConnectionConfig, DeletePolicy, GridConfig, GridPolicy};

/// Host signal announcing that sender data changed elsewhere.
pub const SENDER_UPDATED: &str = "SENDER_UPDATED";

pub struct SenderGrid {
    connection: ConnectionConfig,
    policy: GridPolicy,
    loader: SenderLoader,
    query: String,
    dispatcher: Arc<dyn SenderActionDispatcher>,
    signals: Arc<dyn HostSignalSource>,
    subscription: Option<SignalSubscription>,
    tasks: JoinSet<()>,
    notifications: Vec<Notification>,
    action_state: SenderActionState,
}

impl SenderGrid {
    pub fn new(
        config: GridConfig,
        dispatcher: Arc<dyn SenderActionDispatcher>,
        signals: Arc<dyn HostSignalSource>,
    ) -> Self {
        let GridConfig { connection, policy } = config;
        Self {
            connection,
            policy,
            loader: SenderLoader::new(policy.on_load_failure),
            query: String::new(),
            dispatcher,
            signals,
            subscription: None,
            tasks: JoinSet::new(),
            notifications: Vec::new(),
            action_state: SenderActionState::Idle,
        }
    }

    /// Subscribes to [`SENDER_UPDATED`] and starts the first load.
    pub fn mount(&mut self) {
        if self.subscription.is_none() {
            self.subscription = Some(self.signals.subscribe(SENDER_UPDATED));
        }
        self.reload();
    }

    /// Stops reacting to host signals. Loads in flight still settle.
    pub fn unmount(&mut self) {
        self.subscription = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Starts a load with the current connection.
    pub fn reload(&mut self) {
        let load = self.loader.begin_load(self.connection.clone());
        self.tasks.spawn(load);
    }

    /// Replaces the connection, reloading when it changed and the grid is mounted.
    /// The dispatcher is told about the new connection too.
    ///
    /// Returns whether the value changed.
    pub fn set_connection(&mut self, connection: ConnectionConfig) -> bool {
        if connection == self.connection {
            return false;
        }
        info!("Sender grid connection changed to {}", connection.base_url());
        self.dispatcher.connection_changed(&connection);
        self.connection = connection;
        if self.is_mounted() {
            self.reload();
        }
        true
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    pub fn policy(&self) -> GridPolicy {
        self.policy
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query = text.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> &SenderListState {
        self.loader.state()
    }

    pub fn rows(&self) -> &[SenderRow] {
        self.loader.rows()
    }

    /// Rows matching the current query, in load order.
    pub fn visible_rows(&self) -> Vec<&SenderRow> {
        filter_rows(self.loader.rows(), &self.query)
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.loader.state().error()
    }

    pub fn action_state(&self) -> &SenderActionState {
        &self.action_state
    }

    /// Drains notifications produced since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Non-blocking tick: applies settled loads, then reloads once if any
    /// host signal arrived.
    pub fn pump(&mut self) -> Option<LoadEvent> {
        while let Some(joined) = self.tasks.try_join_next() {
            log_join_failure(joined);
        }
        let event = self.apply_settled();

        let pending = self
            .subscription
            .as_ref()
            .map_or(0, |subscription| subscription.drain().len());
        if pending > 0 {
            info!("{pending} {SENDER_UPDATED} signal(s) received, reloading senders");
            self.reload();
        }
        event
    }

    /// Waits for every load in flight, then applies the newest outcome.
    pub async fn settle(&mut self) -> Option<LoadEvent> {
        while let Some(joined) = self.tasks.join_next().await {
            log_join_failure(joined);
        }
        self.apply_settled()
    }

    fn apply_settled(&mut self) -> Option<LoadEvent> {
        let event = self.loader.sync();
        if let Some(LoadEvent::Failed(err)) = &event {
            self.notifications.push(Notification::load_failed(err));
        }
        event
    }

    /// Asks the host to open the sender for editing.
    pub async fn edit(&mut self, id: &SenderId) -> Result<(), ActionDispatchError> {
        self.run_action(ActionCode::EditSender, id).await
    }

    /// Asks the host to delete the sender.
    pub async fn delete(&mut self, id: &SenderId) -> Result<(), ActionDispatchError> {
        self.run_action(ActionCode::DeleteSender, id).await
    }

    async fn run_action(
        &mut self,
        code: ActionCode,
        id: &SenderId,
    ) -> Result<(), ActionDispatchError> {
        let Some(sender) = self.loader.rows().iter().find(|row| &row.id == id).cloned() else {
            let err = ActionDispatchError::SenderNotFound(id.clone());
            warn!("{code} requested for unknown sender {id}");
            self.fail_action(code, id.clone(), UNKNOWN, &err);
            return Err(err);
        };

        self.action_state = SenderActionState::InFlight {
            code,
            sender: sender.id.clone(),
        };

        let dispatcher = Arc::clone(&self.dispatcher);
        match forward_action(dispatcher.as_ref(), code, &sender).await {
            Ok(()) => {
                self.notifications.push(Notification::action_succeeded(
                    code,
                    sender.display_name(),
                ));
                self.action_state = SenderActionState::Success {
                    code,
                    sender: sender.id.clone(),
                };
                if code == ActionCode::DeleteSender
                    && self.policy.after_delete == DeletePolicy::Reload
                {
                    self.reload();
                }
                Ok(())
            }
            Err(err) => {
                self.fail_action(code, sender.id.clone(), sender.display_name(), &err);
                Err(err)
            }
        }
    }

    fn fail_action(
        &mut self,
        code: ActionCode,
        sender: SenderId,
        name: &str,
        err: &ActionDispatchError,
    ) {
        self.notifications
            .push(Notification::action_failed(code, name, err));
        self.action_state = SenderActionState::Error {
            code,
            sender,
            message: err.to_string(),
        };
    }
}

fn log_join_failure(joined: Result<(), JoinError>) {
    if let Err(err) = joined {
        warn!("Sender load task ended abnormally: {err}");
    }
}
