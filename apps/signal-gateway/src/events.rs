//! In-process event distribution.
//!
//! State changes fan out to observers through a typed event union and a
//! generic publish/subscribe bus. Delivery is fire-and-forget per observer:
//! each subscriber gets its own unbounded channel, so a slow or failed
//! observer never blocks the publisher or other observers, and subscribers
//! that unregister (or drop their receiver) during a publish are pruned.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::models::{MarketDataSnapshot, Order, Position};

/// Event categories observers can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Market data snapshot updates.
    MarketData,
    /// Order lifecycle updates.
    OrderUpdate,
    /// Position changes.
    PositionUpdate,
    /// Connection status changes.
    ConnectionStatus,
}

/// Connection status payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Whether the venue session is up.
    pub connected: bool,
    /// Failure detail when a connect attempt was the trigger.
    pub detail: Option<String>,
}

/// All events published by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// A market data snapshot was refreshed.
    MarketData(MarketDataSnapshot),
    /// An order changed state.
    OrderUpdate(Order),
    /// A position changed.
    PositionUpdate(Position),
    /// The venue connection changed state.
    ConnectionStatus(ConnectionStatus),
}

impl GatewayEvent {
    /// Category of this event.
    #[must_use]
    pub const fn category(&self) -> EventCategory {
        match self {
            Self::MarketData(_) => EventCategory::MarketData,
            Self::OrderUpdate(_) => EventCategory::OrderUpdate,
            Self::PositionUpdate(_) => EventCategory::PositionUpdate,
            Self::ConnectionStatus(_) => EventCategory::ConnectionStatus,
        }
    }
}

/// Events that can be filtered by category.
pub trait Categorized {
    /// Category used to match subscriber filters.
    fn event_category(&self) -> EventCategory;
}

impl Categorized for GatewayEvent {
    fn event_category(&self) -> EventCategory {
        self.category()
    }
}

/// Handle identifying a subscription, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber<E> {
    filter: Option<EventCategory>,
    sender: mpsc::UnboundedSender<E>,
}

/// Generic publish/subscribe bus over a cloneable event type.
pub struct EventBus<E> {
    subscribers: RwLock<HashMap<u64, Subscriber<E>>>,
    next_id: AtomicU64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Subscribe to every event.
    #[must_use]
    pub fn subscribe(&self) -> (SubscriptionId, mpsc::UnboundedReceiver<E>) {
        self.register(None)
    }

    /// Subscribe to a single event category.
    #[must_use]
    pub fn subscribe_category(
        &self,
        category: EventCategory,
    ) -> (SubscriptionId, mpsc::UnboundedReceiver<E>) {
        self.register(Some(category))
    }

    /// Remove a subscription. Unknown handles are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.remove(&id.0);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().map(|s| s.len()).unwrap_or(0)
    }

    fn register(
        &self,
        filter: Option<EventCategory>,
    ) -> (SubscriptionId, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut subscribers) = self.subscribers.write() {
            subscribers.insert(id, Subscriber { filter, sender: tx });
        }
        (SubscriptionId(id), rx)
    }
}

impl<E: Categorized + Clone> EventBus<E> {
    /// Publish an event to every matching subscriber.
    ///
    /// Subscribers whose receiver has been dropped are pruned afterwards;
    /// their failure never reaches the publisher's caller.
    pub fn publish(&self, event: &E) {
        let mut dead = Vec::new();

        {
            let Ok(subscribers) = self.subscribers.read() else {
                return;
            };
            for (id, subscriber) in subscribers.iter() {
                if let Some(filter) = subscriber.filter {
                    if filter != event.event_category() {
                        continue;
                    }
                }
                if subscriber.sender.send(event.clone()).is_err() {
                    tracing::debug!(subscription = *id, "Dropping dead event subscriber");
                    dead.push(*id);
                }
            }
        }

        if !dead.is_empty() {
            if let Ok(mut subscribers) = self.subscribers.write() {
                for id in dead {
                    subscribers.remove(&id);
                }
            }
        }
    }
}
