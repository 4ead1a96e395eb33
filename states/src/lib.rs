//! Generic state plumbing shared by the sender grid crates.
//!
//! - [`TaskTracker`] / [`TaskId`]: generation tagging for async work
//! - [`UpdateInbox`] / [`LatestOnlyUpdater`]: deliver only the newest task's outcome
//! - [`SignalHub`] / [`HostSignalSource`]: named host signals with RAII subscriptions

mod error;
mod signal;
mod task;
mod updater;

pub use error::Error;
pub use signal::{HostSignal, HostSignalSource, SignalHub, SignalSubscription};
pub use task::{TaskId, TaskTracker};
pub use updater::{LatestOnlyUpdater, Settled, UpdateInbox};
