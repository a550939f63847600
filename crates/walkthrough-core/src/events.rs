//! Minimal publish/subscribe
//!
//! Subscribers are called in subscription order. There is no once-only or
//! cross-event ordering guarantee.

use serde_json::Value;

/// Handle returned by [`EventBus::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&Value)>;

struct Subscriber {
    id: SubscriptionId,
    event: String,
    callback: Callback,
}

/// Registry of event callbacks
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to an event
    pub fn on(&mut self, event: impl Into<String>, callback: impl FnMut(&Value) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            event: event.into(),
            callback: Box::new(callback),
        });
        id
    }

    /// Unsubscribe; returns false if the subscription was already gone
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        match self.subscribers.iter().position(|s| s.id == id) {
            Some(pos) => {
                self.subscribers.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Deliver a value to every subscriber of `event`, returning how many ran
    pub fn fire(&mut self, event: &str, value: &Value) -> usize {
        let mut delivered = 0;
        for subscriber in self.subscribers.iter_mut().filter(|s| s.event == event) {
            (subscriber.callback)(value);
            delivered += 1;
        }
        delivered
    }

    /// Returns the number of subscribers for an event.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers.iter().filter(|s| s.event == event).count()
    }

    /// Drop every subscription
    pub fn clear(&mut self) {
        self.subscribers.clear();
    }
}
