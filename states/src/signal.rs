//! Named broadcast signals from the host application.
//!
//! A host announces "something changed elsewhere" by emitting a named
//! [`HostSignal`]. Components do not reach for a global event bus; they get a
//! [`HostSignalSource`] injected and subscribe to the names they care about.
//! Dropping a [`SignalSubscription`] unsubscribes it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use flume::{Receiver, Sender};
use log::debug;
use serde_json::Value;

use crate::Error;

/// A signal emitted by the host. `detail` is an arbitrary payload.
#[derive(Debug, Clone, PartialEq)]
pub struct HostSignal {
    pub name: String,
    pub detail: Value,
}

/// Anything a component can subscribe to for host signals.
pub trait HostSignalSource: Send + Sync {
    fn subscribe(&self, name: &str) -> SignalSubscription;
}

struct Subscriber {
    id: u64,
    name: String,
    send: Sender<HostSignal>,
}

#[derive(Default)]
struct HubInner {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl HubInner {
    fn remove(&self, id: u64) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|s| s.id != id);
    }
}

/// In-process signal hub. Clones share subscribers.
#[derive(Clone, Default)]
pub struct SignalHub {
    inner: Arc<HubInner>,
}

impl std::fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalHub")
            .field("subscribers", &self.subscriber_count(None))
            .finish()
    }
}

impl SignalHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a signal to every live subscriber of `name`.
    ///
    /// Returns how many subscribers received it.
    pub fn emit(&self, name: &str, detail: Value) -> usize {
        let subscribers = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut delivered = 0;
        for subscriber in subscribers.iter().filter(|s| s.name == name) {
            let signal = HostSignal {
                name: name.to_owned(),
                detail: detail.clone(),
            };
            if subscriber.send.send(signal).is_ok() {
                delivered += 1;
            }
        }
        debug!("Signal `{name}` delivered to {delivered} subscriber(s)");
        delivered
    }

    /// Number of live subscriptions, optionally only those for `name`.
    pub fn subscriber_count(&self, name: Option<&str>) -> usize {
        let subscribers = self
            .inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match name {
            Some(name) => subscribers.iter().filter(|s| s.name == name).count(),
            None => subscribers.len(),
        }
    }
}

impl HostSignalSource for SignalHub {
    fn subscribe(&self, name: &str) -> SignalSubscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (send, recv) = flume::unbounded();

        self.inner
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscriber {
                id,
                name: name.to_owned(),
                send,
            });

        SignalSubscription {
            id,
            name: name.to_owned(),
            recv,
            hub: Arc::downgrade(&self.inner),
        }
    }
}

/// Live subscription to one signal name. Unsubscribes on drop.
pub struct SignalSubscription {
    id: u64,
    name: String,
    recv: Receiver<HostSignal>,
    hub: Weak<HubInner>,
}

impl std::fmt::Debug for SignalSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalSubscription")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("pending", &self.recv.len())
            .finish()
    }
}

impl SignalSubscription {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Takes every pending signal without waiting.
    pub fn drain(&self) -> Vec<HostSignal> {
        self.recv.try_iter().collect()
    }

    /// Waits for the next signal.
    pub async fn recv_async(&self) -> Result<HostSignal, Error> {
        self.recv
            .recv_async()
            .await
            .map_err(|_disconnected| Error::hub_closed(&self.name))
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for SignalSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.remove(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emit_reaches_matching_subscribers_only() {
        let hub = SignalHub::new();
        let updated = hub.subscribe("SENDER_UPDATED");
        let other = hub.subscribe("SOMETHING_ELSE");

        let delivered = hub.emit("SENDER_UPDATED", json!({ "id": 7 }));

        assert_eq!(delivered, 1);
        let signals = updated.drain();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].detail, json!({ "id": 7 }));
        assert!(other.drain().is_empty());
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let hub = SignalHub::new();
        let subscription = hub.subscribe("SENDER_UPDATED");
        assert_eq!(hub.subscriber_count(Some("SENDER_UPDATED")), 1);

        subscription.unsubscribe();

        assert_eq!(hub.subscriber_count(Some("SENDER_UPDATED")), 0);
        assert_eq!(hub.emit("SENDER_UPDATED", Value::Null), 0);
    }

    #[test]
    fn clones_share_subscribers() {
        let hub = SignalHub::new();
        let clone = hub.clone();
        let subscription = hub.subscribe("SENDER_UPDATED");

        clone.emit("SENDER_UPDATED", Value::Null);

        assert_eq!(subscription.drain().len(), 1);
    }

    #[tokio::test]
    async fn recv_async_fails_once_hub_is_gone() {
        let hub = SignalHub::new();
        let subscription = hub.subscribe("SENDER_UPDATED");
        drop(hub);

        let err = subscription
            .recv_async()
            .await
            .expect_err("hub was dropped");
        assert_eq!(err, Error::hub_closed("SENDER_UPDATED"));
    }
}
