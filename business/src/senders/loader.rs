//! Stateful sender loader.
//!
//! Owns the current row set plus loading/error status. Loads run as spawned
//! futures and report back through a latest-only inbox:
//! - `begin_load()` flips `loading` on and returns the future to spawn
//! - the future always settles, even when dropped half-way
//! - `sync()` applies the outcome of the newest load; older ones are discarded

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use sender_grid_states::{LatestOnlyUpdater, TaskTracker, UpdateInbox};

use super::api;
use super::error::LoadError;
use super::model::SenderRow;
use crate::config::{ConnectionConfig, LoadFailurePolicy};

/// `None` means the load future was dropped before the request finished.
type LoadOutcome = Option<Result<Vec<SenderRow>, LoadError>>;

/// A spawned load, ready to be handed to an executor.
pub type LoadFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// What `sync()` applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    /// Rows were replaced with this many new rows.
    Loaded(usize),
    /// The newest load failed.
    Failed(LoadError),
    /// The newest load was dropped before it finished.
    Abandoned,
}

/// Observable loader state.
#[derive(Debug, Clone, Default)]
pub struct SenderListState {
    rows: Vec<SenderRow>,
    loading: bool,
    error: Option<LoadError>,
    last_loaded_at: Option<DateTime<Utc>>,
}

impl SenderListState {
    pub fn rows(&self) -> &[SenderRow] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error of the newest settled load, cleared by the next success.
    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    pub fn last_loaded_at(&self) -> Option<DateTime<Utc>> {
        self.last_loaded_at
    }
}

/// Reports the load as settled exactly once, on completion or on drop.
struct SettleGuard {
    updater: Option<LatestOnlyUpdater<LoadOutcome>>,
}

impl SettleGuard {
    fn finish(mut self, result: Result<Vec<SenderRow>, LoadError>) {
        if let Some(updater) = self.updater.take() {
            report(&updater, Some(result));
        }
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if let Some(updater) = self.updater.take() {
            debug!(
                "Sender load generation {} dropped before completion",
                updater.id().generation()
            );
            report(&updater, None);
        }
    }
}

fn report(updater: &LatestOnlyUpdater<LoadOutcome>, outcome: LoadOutcome) {
    if updater.set(outcome).is_err() {
        debug!(
            "Sender loader gone; outcome of generation {} dropped",
            updater.id().generation()
        );
    }
}

struct SenderLoads;

#[derive(Debug)]
pub struct SenderLoader {
    policy: LoadFailurePolicy,
    state: SenderListState,
    inbox: UpdateInbox<LoadOutcome>,
}

impl Default for SenderLoader {
    fn default() -> Self {
        Self::new(LoadFailurePolicy::default())
    }
}

impl SenderLoader {
    pub fn new(policy: LoadFailurePolicy) -> Self {
        Self {
            policy,
            state: SenderListState::default(),
            inbox: UpdateInbox::new(TaskTracker::new::<SenderLoads>()),
        }
    }

    pub fn state(&self) -> &SenderListState {
        &self.state
    }

    pub fn rows(&self) -> &[SenderRow] {
        self.state.rows()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn policy(&self) -> LoadFailurePolicy {
        self.policy
    }

    /// Starts a load and returns the future performing it.
    ///
    /// `loading` is set immediately. The new load supersedes any load still in
    /// flight; those keep running but their outcome will be ignored.
    pub fn begin_load(&mut self, config: ConnectionConfig) -> LoadFuture {
        let updater = self.inbox.updater();
        self.state.loading = true;
        info!(
            "Loading senders (generation {}) from {}",
            updater.id().generation(),
            config.base_url()
        );

        let guard = SettleGuard {
            updater: Some(updater),
        };
        Box::pin(async move {
            let result = api::list_senders(&config).await;
            guard.finish(result);
        })
    }

    /// Applies the outcome of the newest load if it has settled.
    pub fn sync(&mut self) -> Option<LoadEvent> {
        let settled = self.inbox.drain_latest()?;
        self.state.loading = false;

        let event = match settled.value {
            Some(Ok(rows)) => {
                let count = rows.len();
                self.state.rows = rows;
                self.state.error = None;
                self.state.last_loaded_at = Some(Utc::now());
                LoadEvent::Loaded(count)
            }
            Some(Err(err)) => {
                warn!("Sender load failed: {err}");
                if self.policy == LoadFailurePolicy::Clear {
                    self.state.rows.clear();
                }
                self.state.error = Some(err.clone());
                LoadEvent::Failed(err)
            }
            None => LoadEvent::Abandoned,
        };
        Some(event)
    }

    /// Loads and applies in one go.
    pub async fn load(&mut self, config: ConnectionConfig) -> Result<&[SenderRow], LoadError> {
        self.begin_load(config).await;
        match self.sync() {
            Some(LoadEvent::Loaded(_)) => Ok(self.state.rows()),
            Some(LoadEvent::Failed(err)) => Err(err),
            Some(LoadEvent::Abandoned) | None => {
                Err(LoadError::transport("sender load did not settle"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> ConnectionConfig {
        ConnectionConfig::new("http://127.0.0.1:1", "token")
    }

    #[test]
    fn new_loader_is_idle_and_empty() {
        let loader = SenderLoader::default();
        assert!(!loader.is_loading());
        assert!(loader.rows().is_empty());
        assert!(loader.state().error().is_none());
        assert!(loader.state().last_loaded_at().is_none());
        assert_eq!(loader.policy(), LoadFailurePolicy::KeepStale);
    }

    #[test]
    fn begin_load_sets_loading_before_anything_runs() {
        let mut loader = SenderLoader::default();
        let _pending = loader.begin_load(unreachable_config());
        assert!(loader.is_loading());
        assert!(loader.sync().is_none());
        assert!(loader.is_loading());
    }

    #[test]
    fn dropped_load_still_settles() {
        let mut loader = SenderLoader::default();
        let pending = loader.begin_load(unreachable_config());
        drop(pending);

        assert_eq!(loader.sync(), Some(LoadEvent::Abandoned));
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn invalid_config_fails_without_request() {
        let mut loader = SenderLoader::default();
        let err = loader
            .load(ConnectionConfig::new("", "token"))
            .await
            .expect_err("blank base url");
        assert_eq!(err, LoadError::InvalidConfig("base_url"));
        assert!(!loader.is_loading());
        assert_eq!(loader.state().error(), Some(&err));
    }

    #[tokio::test]
    async fn interrupted_load_clears_loading_flag() {
        let mut loader = SenderLoader::default();
        let mut pending = loader.begin_load(unreachable_config());

        // Drive the request briefly, then drop the future mid-flight.
        let _outcome = tokio::time::timeout(std::time::Duration::from_millis(1), &mut pending).await;
        drop(pending);

        // Either the request already failed or the guard reported abandonment;
        // in both cases the newest load has settled.
        let event = loader.sync().expect("load settled");
        assert!(matches!(event, LoadEvent::Abandoned | LoadEvent::Failed(_)));
        assert!(!loader.is_loading());
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let mut loader = SenderLoader::default();
        let err = loader
            .load(unreachable_config())
            .await
            .expect_err("nothing listens on port 1");
        assert!(matches!(err, LoadError::TransportOrServerError { status: None, .. }));
        assert!(!loader.is_loading());
    }
}
