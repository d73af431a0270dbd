//! Change bus owned by one editor state.
//!
//! Handlers run synchronously on the publishing thread, in subscription
//! order. Async consumers take a broadcast receiver instead.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use super::events::{EditorEvent, EventCategory};

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Which events a handler is called for.
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    #[default]
    All,
    /// Any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    pub fn matches(&self, event: &EditorEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

/// Bus settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventBusConfig {
    /// Events buffered per broadcast receiver before it starts lagging.
    pub channel_capacity: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventBusError {
    #[error("No active subscribers")]
    NoSubscribers,
}

struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: Box<dyn Fn(&EditorEvent) + Send + Sync>,
}

/// Publish/subscribe hub between the editor state and its views.
pub struct EventBus {
    sender: broadcast::Sender<EditorEvent>,
    subscriptions: RwLock<Vec<Subscription>>,
    next_id: AtomicU64,
    config: EventBusConfig,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            subscriptions: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            config,
        }
    }

    pub fn config(&self) -> EventBusConfig {
        self.config
    }

    /// Delivers `event` to matching handlers, then to broadcast receivers.
    ///
    /// Returns how many receivers got the event. With no handler and no
    /// receiver the event is dropped and `NoSubscribers` is returned.
    pub fn publish(&self, event: EditorEvent) -> Result<usize, EventBusError> {
        tracing::trace!(category = %event.category(), "{}", event.description());

        let subscriptions = self.subscriptions.read();
        subscriptions
            .iter()
            .filter(|s| s.filter.matches(&event))
            .for_each(|s| (s.handler)(&event));

        match self.sender.send(event) {
            Ok(receivers) => Ok(receivers),
            Err(_) if subscriptions.is_empty() => Err(EventBusError::NoSubscribers),
            Err(_) => Ok(0),
        }
    }

    /// Registers `handler` for events passing `filter`.
    ///
    /// The handler must not subscribe or unsubscribe on this bus.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&EditorEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscriptions.write().push(Subscription {
            id,
            filter,
            handler: Box::new(handler),
        });
        tracing::debug!("Subscription {} added", id);
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != id);
        let removed = subscriptions.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Receiver for polling from an async task.
    pub fn receiver(&self) -> broadcast::Receiver<EditorEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("receivers", &self.sender.receiver_count())
            .field("config", &self.config)
            .finish()
    }
}
