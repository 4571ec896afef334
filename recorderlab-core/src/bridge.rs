//! Event bridge: carries engine events onto the presentation thread.
//!
//! Bus listeners run on whatever thread publishes; all they do is push the
//! event into one unbounded, topic-tagged FIFO. The presentation thread calls
//! [`EventBridge::drain`] once per tick, which hands each queued event to the
//! handler registered for its topic, in enqueue order.
//!
//! A single FIFO keeps per-topic order for free and means a burst on one
//! topic cannot starve another: whatever was queued first is delivered first.
//! Each drain is capped at the queue depth observed when it starts, so a
//! producer that never stops cannot keep one tick running forever.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crossbeam::channel::{self, Receiver, Sender};
use thiserror::Error;

use crate::bus::{EventBus, SubscriptionId};
use crate::event::{ExceptionCapsule, RecorderEvent, Topic};

/// Errors surfaced from a drain step. Nothing here is retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// A fault captured on the engine thread, re-raised here on purpose.
    #[error("engine exception: {0}")]
    EngineException(#[from] ExceptionCapsule),

    #[error("{topic} handler failed: {message}")]
    Handler { topic: Topic, message: String },
}

/// Presentation-side callback for one topic. `S` is the view state it mutates.
pub type Handler<S> = Box<dyn FnMut(&mut S, RecorderEvent) -> Result<(), BridgeError>>;

pub struct EventBridge<S> {
    bus: Arc<EventBus>,
    tx: Sender<RecorderEvent>,
    rx: Receiver<RecorderEvent>,
    handlers: HashMap<Topic, Handler<S>>,
    subscriptions: HashMap<Topic, SubscriptionId>,
    delivered: u64,
    closed: bool,
}

impl<S> EventBridge<S> {
    pub fn new(bus: Arc<EventBus>) -> Self {
        let (tx, rx) = channel::unbounded();
        Self {
            bus,
            tx,
            rx,
            handlers: HashMap::new(),
            subscriptions: HashMap::new(),
            delivered: 0,
            closed: false,
        }
    }

    /// Register the handler for `topic`, replacing any earlier one.
    ///
    /// The first handler for a topic also registers the bus listener; events
    /// published before that are never seen by this bridge.
    pub fn subscribe<F>(&mut self, topic: Topic, handler: F)
    where
        F: FnMut(&mut S, RecorderEvent) -> Result<(), BridgeError> + 'static,
    {
        if self.closed {
            tracing::warn!(%topic, "subscribe on closed bridge ignored");
            return;
        }

        if self.handlers.insert(topic, Box::new(handler)).is_some() {
            tracing::debug!(%topic, "bridge handler replaced");
        }

        if !self.subscriptions.contains_key(&topic) {
            let tx = self.tx.clone();
            let id = self.bus.register(topic, move |event| {
                // Unbounded: never blocks the publisher.
                let _ = tx.send(event.clone());
            });
            self.subscriptions.insert(topic, id);
        }
    }

    /// Deliver everything queued at the moment of the call.
    ///
    /// Stops at the first handler error and returns it; events behind it stay
    /// queued for the next drain.
    pub fn drain(&mut self, target: &mut S) -> Result<usize, BridgeError> {
        if self.closed {
            return Ok(0);
        }

        let budget = self.rx.len();
        let mut delivered = 0;
        for _ in 0..budget {
            let Ok(event) = self.rx.try_recv() else {
                break;
            };
            let topic = event.topic();
            match self.handlers.get_mut(&topic) {
                Some(handler) => {
                    self.delivered += 1;
                    delivered += 1;
                    handler(target, event)?;
                }
                None => tracing::warn!(%topic, "event without handler dropped"),
            }
        }
        Ok(delivered)
    }

    /// Unsubscribe every topic from the bus, then discard whatever is queued.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        for (topic, id) in self.subscriptions.drain() {
            if !self.bus.unregister(id) {
                tracing::warn!(%topic, "bus listener already gone at close");
            }
        }
        let discarded = self.rx.try_iter().count();
        self.handlers.clear();
        self.closed = true;
        tracing::debug!(discarded, delivered = self.delivered, "event bridge closed");
    }

    /// Events waiting for the next drain.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Events handed to a handler since the bridge was created.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn has_handler(&self, topic: Topic) -> bool {
        self.handlers.contains_key(&topic)
    }
}

impl<S> Drop for EventBridge<S> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<S> fmt::Debug for EventBridge<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBridge")
            .field("topics", &self.handlers.keys().collect::<Vec<_>>())
            .field("pending", &self.rx.len())
            .field("delivered", &self.delivered)
            .field("closed", &self.closed)
            .finish()
    }
}
