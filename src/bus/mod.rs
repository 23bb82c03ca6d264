//! Publish/subscribe event bus with colon-namespaced events.
//!
//! Events may be namespaced like `"player:track:changed"`. Publishing such
//! an event also notifies subscribers of every shorter prefix: `"player"`,
//! then `"player:track"`, then the full name, most general first. The bus
//! is a companion utility: the statechart core does not depend on it.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with the published arguments.
pub type Subscriber = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Token returned by subscription; pass it back to
/// [`EventBus::unsubscribe`].
///
/// One token covers every event named in the `subscribe` call that issued
/// it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    handler: Subscriber,
    once: bool,
}

/// A standalone publish/subscribe registry.
///
/// # Example
///
/// ```rust
/// use trellis::bus::EventBus;
/// use serde_json::json;
///
/// let mut bus = EventBus::new();
/// bus.subscribe("player:track", |args| {
///     println!("track event: {:?}", args);
/// });
///
/// // Notifies "player" and "player:track" subscribers, in that order.
/// bus.publish("player:track:changed", &[json!("side-b")]);
/// ```
#[derive(Default)]
pub struct EventBus {
    subscribers: BTreeMap<String, Vec<Subscription>>,
    next_id: u64,
}

impl EventBus {
    /// An empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a callback to one or more space-separated events.
    pub fn subscribe<F>(&mut self, events: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.register(events, Arc::new(handler), false)
    }

    /// Subscribe a callback that is removed after the first publish that
    /// reaches it.
    ///
    /// Within that publish it still fires once per matching namespace
    /// prefix; afterwards the whole subscription is gone.
    pub fn subscribe_once<F>(&mut self, events: &str, handler: F) -> SubscriptionId
    where
        F: Fn(&[Value]) + Send + Sync + 'static,
    {
        self.register(events, Arc::new(handler), true)
    }

    fn register(&mut self, events: &str, handler: Subscriber, once: bool) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        for event in events.split_whitespace() {
            self.subscribers
                .entry(event.to_string())
                .or_default()
                .push(Subscription {
                    id,
                    handler: Arc::clone(&handler),
                    once,
                });
        }
        id
    }

    /// Remove a subscription from every event it was registered under.
    ///
    /// Unknown or already-removed tokens are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> &mut Self {
        for subs in self.subscribers.values_mut() {
            subs.retain(|sub| sub.id != id);
        }
        self
    }

    /// Publish an event to all subscribers of its namespace prefixes.
    ///
    /// The subscriber list is snapshotted when the call starts; handlers
    /// run in prefix order (most general first), then in subscription
    /// order within each prefix.
    pub fn publish(&mut self, event: &str, args: &[Value]) -> &mut Self {
        let mut fired_once = Vec::new();
        for prefix in namespace_prefixes(event) {
            let batch: Vec<(SubscriptionId, Subscriber, bool)> = self
                .subscribers
                .get(prefix)
                .map(|subs| {
                    subs.iter()
                        .map(|sub| (sub.id, Arc::clone(&sub.handler), sub.once))
                        .collect()
                })
                .unwrap_or_default();

            for (id, handler, once) in batch {
                handler(args);
                if once {
                    fired_once.push(id);
                }
            }
        }
        for id in fired_once {
            self.unsubscribe(id);
        }
        self
    }

    /// Number of live subscriptions under exactly `event`.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.subscribers.get(event).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .subscribers
            .iter()
            .map(|(event, subs)| (event.as_str(), subs.len()))
            .collect();
        f.debug_struct("EventBus").field("events", &counts).finish()
    }
}

/// Expand `"a:b:c"` into `["a", "a:b", "a:b:c"]`.
fn namespace_prefixes(event: &str) -> Vec<&str> {
    let mut prefixes: Vec<&str> = event
        .char_indices()
        .filter(|(_, ch)| *ch == ':')
        .map(|(i, _)| &event[..i])
        .collect();
    prefixes.push(event);
    prefixes
}
