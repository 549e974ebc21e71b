//! Process-wide publish/subscribe channel.
//!
//! Lets unrelated parts of the UI react to store changes without holding a
//! reference to each other. Topics are plain strings; payloads are JSON
//! values so any serializable snapshot can travel through the same hub.
//!
//! # Delivery
//!
//! [`EventBus::emit`] runs handlers synchronously, in registration order,
//! over a snapshot of the handler list taken when the emit starts:
//!
//! - a handler registered during an emit is not called by that emit
//! - a handler unsubscribed during an emit is skipped if not yet reached
//! - every other handler in the snapshot runs exactly once
//!
//! The channel's lock is never held while a handler runs, so handlers may
//! subscribe, unsubscribe or emit again. A panicking handler unwinds into the
//! `emit` caller; the channel does not catch it.
//!
//! # Example
//!
//! ```rust
//! use boutique_client::bus::EventBus;
//!
//! let bus = EventBus::new();
//! let subscription = bus.on("message:sent", |payload| {
//!     assert_eq!(payload["text"], "Hello");
//! });
//!
//! bus.emit("message:sent", &serde_json::json!({ "text": "Hello" }));
//! subscription.unsubscribe();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use serde::Serialize;
use serde_json::Value;
use tracing::{error, trace};

use crate::lock;

/// Topics published by the client stores.
pub mod topics {
    /// Published after every cart mutation with the full line list.
    pub const CART_UPDATED: &str = "cart:updated";

    /// Published after every wishlist toggle with the full id list.
    pub const WISHLIST_UPDATED: &str = "wishlist:updated";
}

type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

#[derive(Clone)]
struct Registration {
    id: u64,
    active: Arc<AtomicBool>,
    handler: Handler,
}

#[derive(Default)]
struct BusInner {
    next_id: AtomicU64,
    topics: Mutex<HashMap<String, Vec<Registration>>>,
}

/// Publish/subscribe hub keyed by topic name.
///
/// Cheaply cloneable; clones share the same registrations.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `topic`.
    ///
    /// Dropping the returned [`Subscription`] leaves the handler registered;
    /// call [`Subscription::unsubscribe`] to remove it.
    pub fn on<F>(&self, topic: &str, handler: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));

        lock(&self.inner.topics)
            .entry(topic.to_owned())
            .or_default()
            .push(Registration {
                id,
                active: Arc::clone(&active),
                handler: Arc::new(handler),
            });
        trace!(topic, id, "Handler registered");

        Subscription {
            bus: Arc::downgrade(&self.inner),
            topic: topic.to_owned(),
            id,
            active,
        }
    }

    /// Deliver `payload` to every handler registered for `topic`.
    ///
    /// Emitting to a topic with no handlers is a no-op.
    pub fn emit(&self, topic: &str, payload: &Value) {
        let snapshot = match lock(&self.inner.topics).get(topic) {
            Some(registrations) => registrations.clone(),
            None => return,
        };

        trace!(topic, handlers = snapshot.len(), "Emitting");
        for registration in &snapshot {
            if registration.active.load(Ordering::Acquire) {
                (registration.handler)(payload);
            }
        }
    }

    /// Serialize `value` and emit it on `topic`.
    pub fn publish<T: Serialize + ?Sized>(&self, topic: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(payload) => self.emit(topic, &payload),
            Err(e) => error!(topic, error = %e, "Failed to serialize event payload"),
        }
    }

    /// Number of handlers currently registered for `topic`.
    #[must_use]
    pub fn handler_count(&self, topic: &str) -> usize {
        lock(&self.inner.topics).get(topic).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let topics = lock(&self.inner.topics);
        let mut map = f.debug_map();
        for (topic, registrations) in topics.iter() {
            map.entry(topic, &registrations.len());
        }
        map.finish()
    }
}

/// Handle for a registered handler.
#[must_use = "dropping a Subscription does not unsubscribe; keep it to call `unsubscribe`"]
pub struct Subscription {
    bus: Weak<BusInner>,
    topic: String,
    id: u64,
    active: Arc<AtomicBool>,
}

impl Subscription {
    /// Remove exactly this handler.
    ///
    /// Calling this again is a no-op; it never removes a handler registered
    /// later, even one using the same closure.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }

        let Some(bus) = self.bus.upgrade() else {
            return;
        };

        let mut topics = lock(&bus.topics);
        if let Some(registrations) = topics.get_mut(&self.topic) {
            registrations.retain(|r| r.id != self.id);
            if registrations.is_empty() {
                topics.remove(&self.topic);
            }
        }
        trace!(topic = %self.topic, id = self.id, "Handler unregistered");
    }

    /// Whether the handler is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Topic this subscription listens on.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
