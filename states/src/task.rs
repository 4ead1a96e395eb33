//! Task identity for "latest request wins" bookkeeping.
//!
//! Every async unit of work (a sender list load, for example) is tagged with a
//! [`TaskId`] when it starts. The [`TaskTracker`] owning that kind of work
//! remembers the most recent generation it handed out, so results coming back
//! from superseded tasks can be recognised and dropped.
//!
//! # Usage
//!
//! ```
//! use sender_grid_states::TaskTracker;
//!
//! struct LoadSenders;
//!
//! let tracker = TaskTracker::new::<LoadSenders>();
//! let first = tracker.begin();
//! let second = tracker.begin();
//!
//! assert!(!tracker.is_latest(first));
//! assert!(tracker.is_latest(second));
//! ```

use std::any::TypeId;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a spawned task.
///
/// Combines a `TypeId` (the kind of work) with a generation counter. Higher
/// generations were started later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    /// Creates a new `TaskId` with the given type and generation.
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    /// Returns the `TypeId` component of this task identifier.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the generation counter of this task identifier.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Hands out increasing generations for one kind of task.
///
/// Cloning is cheap and clones share the counter, so a tracker can be moved
/// into spawned futures that need to ask "am I still the latest?".
#[derive(Debug, Clone)]
pub struct TaskTracker {
    type_id: TypeId,
    latest: Arc<AtomicU64>,
}

impl TaskTracker {
    /// Creates a tracker for tasks of kind `T`. No task has started yet.
    pub fn new<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Starts a new task, superseding every task started before it.
    pub fn begin(&self) -> TaskId {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        TaskId::new(self.type_id, generation)
    }

    /// Returns `true` when `id` is the most recently started task of this kind.
    pub fn is_latest(&self, id: TaskId) -> bool {
        id.type_id == self.type_id && id.generation == self.latest.load(Ordering::Acquire)
    }

    /// Generation of the most recently started task, `0` when none started.
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Load;
    struct Delete;

    #[test]
    fn task_id_new_and_accessors() {
        let type_id = TypeId::of::<String>();
        let task_id = TaskId::new(type_id, 42);

        assert_eq!(task_id.type_id(), type_id);
        assert_eq!(task_id.generation(), 42);
    }

    #[test]
    fn task_id_equality() {
        let type_id = TypeId::of::<String>();

        let id1 = TaskId::new(type_id, 1);
        let id2 = TaskId::new(type_id, 1);
        let id3 = TaskId::new(type_id, 2);
        let id4 = TaskId::new(TypeId::of::<i32>(), 1);

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_ne!(id1, id4);
    }

    #[test]
    fn tracker_generations_increase() {
        let tracker = TaskTracker::new::<Load>();
        assert_eq!(tracker.latest_generation(), 0);

        let first = tracker.begin();
        let second = tracker.begin();

        assert_eq!(first.generation(), 1);
        assert_eq!(second.generation(), 2);
        assert_eq!(tracker.latest_generation(), 2);
    }

    #[test]
    fn only_newest_task_is_latest() {
        let tracker = TaskTracker::new::<Load>();
        let first = tracker.begin();
        assert!(tracker.is_latest(first));

        let second = tracker.begin();
        assert!(!tracker.is_latest(first));
        assert!(tracker.is_latest(second));
    }

    #[test]
    fn clones_share_the_counter() {
        let tracker = TaskTracker::new::<Load>();
        let clone = tracker.clone();

        let id = clone.begin();
        assert!(tracker.is_latest(id));
    }

    #[test]
    fn ids_from_other_kinds_are_never_latest() {
        let loads = TaskTracker::new::<Load>();
        let deletes = TaskTracker::new::<Delete>();

        let delete = deletes.begin();
        let _load = loads.begin();

        assert!(!loads.is_latest(delete));
    }
}
