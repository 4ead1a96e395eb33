//! Latest-only result delivery from spawned tasks to a single owner.
//!
//! The owner keeps an [`UpdateInbox`]. Each time it starts a task it asks the
//! inbox for a [`LatestOnlyUpdater`], which carries a fresh [`TaskId`]. The task
//! reports its outcome through the updater; the owner later calls
//! [`UpdateInbox::drain_latest`] and only ever sees the outcome of the most
//! recently started task. Outcomes of superseded tasks are dropped.

use flume::{Receiver, Sender};
use log::debug;

use crate::{Error, TaskId, TaskTracker};

/// Outcome reported by a task, tagged with the task that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled<T> {
    pub id: TaskId,
    pub value: T,
}

/// Sending half handed to exactly one task.
#[derive(Debug)]
pub struct LatestOnlyUpdater<T> {
    id: TaskId,
    tracker: TaskTracker,
    send: Sender<Settled<T>>,
}

impl<T> LatestOnlyUpdater<T> {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Whether no newer task has been started since this one.
    pub fn is_latest(&self) -> bool {
        self.tracker.is_latest(self.id)
    }

    /// Reports the task outcome.
    ///
    /// Outcomes of superseded tasks are dropped here already; the inbox checks
    /// again on drain because a newer task may start after this call.
    pub fn set(&self, value: T) -> Result<(), Error> {
        if !self.is_latest() {
            debug!(
                "Dropping outcome of superseded task generation {}",
                self.id.generation()
            );
            return Ok(());
        }
        self.send
            .send(Settled { id: self.id, value })
            .map_err(|_closed| Error::ChannelClosed)
    }
}

/// Receiving half owned by the component that started the tasks.
#[derive(Debug)]
pub struct UpdateInbox<T> {
    tracker: TaskTracker,
    send: Sender<Settled<T>>,
    recv: Receiver<Settled<T>>,
}

impl<T> UpdateInbox<T> {
    pub fn new(tracker: TaskTracker) -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            tracker,
            send,
            recv,
        }
    }

    /// Starts a new task and returns the updater it should report through.
    pub fn updater(&self) -> LatestOnlyUpdater<T> {
        LatestOnlyUpdater {
            id: self.tracker.begin(),
            tracker: self.tracker.clone(),
            send: self.send.clone(),
        }
    }

    /// Drains every pending outcome and returns the one belonging to the latest
    /// task, if it has settled.
    pub fn drain_latest(&self) -> Option<Settled<T>> {
        let mut latest = None;
        for settled in self.recv.try_iter() {
            if self.tracker.is_latest(settled.id) {
                latest = Some(settled);
            } else {
                debug!(
                    "Discarding stale outcome of task generation {} (latest is {})",
                    settled.id.generation(),
                    self.tracker.latest_generation()
                );
            }
        }
        latest
    }
}
