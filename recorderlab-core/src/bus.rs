//! Engine-side event bus: topic-keyed listener registry.
//!
//! `publish` runs every listener for the event's topic synchronously on the
//! publishing thread. Listeners are expected to be cheap (the view's bridge
//! only enqueues).

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::event::{RecorderEvent, Topic};

pub type Listener = Arc<dyn Fn(&RecorderEvent) + Send + Sync>;

/// Handle returned by [`EventBus::register`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    listeners: RwLock<HashMap<Topic, Vec<(SubscriptionId, Listener)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&self, topic: Topic, listener: F) -> SubscriptionId
    where
        F: Fn(&RecorderEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .entry(topic)
            .or_default()
            .push((id, Arc::new(listener)));
        tracing::debug!(%topic, ?id, "listener registered");
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unregister(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        for (topic, entries) in listeners.iter_mut() {
            if let Some(pos) = entries.iter().position(|(sid, _)| *sid == id) {
                entries.remove(pos);
                tracing::debug!(%topic, ?id, "listener unregistered");
                return true;
            }
        }
        false
    }

    pub fn publish(&self, event: RecorderEvent) {
        let topic = event.topic();
        // Snapshot under the lock, call outside it so listeners may (un)register.
        let targets: Vec<Listener> = match self.listeners.read().get(&topic) {
            Some(entries) => entries.iter().map(|(_, l)| Arc::clone(l)).collect(),
            None => return,
        };
        for listener in targets {
            listener(&event);
        }
    }

    pub fn listener_count(&self, topic: Topic) -> usize {
        self.listeners.read().get(&topic).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.read();
        let counts: HashMap<Topic, usize> =
            listeners.iter().map(|(t, v)| (*t, v.len())).collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn publish_reaches_only_matching_topic() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        bus.register(Topic::LogLine, move |ev| sink.lock().push(ev.clone()));

        bus.publish(RecorderEvent::LogLine("hello".into()));
        bus.publish(RecorderEvent::StatusUpdate(Default::default()));

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], RecorderEvent::LogLine("hello".into()));
    }

    #[test]
    fn unregister_stops_delivery() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&hits);
        let id = bus.register(Topic::LogLine, move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        bus.publish(RecorderEvent::LogLine("a".into()));
        assert!(bus.unregister(id));
        assert!(!bus.unregister(id));
        bus.publish(RecorderEvent::LogLine("b".into()));

        assert_eq!(hits.load(Ordering::Relaxed), 1);
        assert_eq!(bus.listener_count(Topic::LogLine), 0);
    }

    #[test]
    fn listener_may_unregister_itself_while_publishing() {
        let bus = Arc::new(EventBus::new());
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let bus_ref = Arc::clone(&bus);
        let slot_ref = Arc::clone(&slot);
        let id = bus.register(Topic::LogLine, move |_| {
            if let Some(id) = slot_ref.lock().take() {
                bus_ref.unregister(id);
            }
        });
        *slot.lock() = Some(id);

        bus.publish(RecorderEvent::LogLine("x".into()));
        assert_eq!(bus.listener_count(Topic::LogLine), 0);
    }
}
