//! In-process notification bus.
//!
//! Topics are string keys; publishing delivers a payload to every current
//! subscriber of the topic. There is no durability: subscribers registered
//! after a publish never see it, and publishing to a topic with zero
//! subscribers is a no-op. Each subscription is a cancellable stream;
//! dropping it (or calling [`Subscription::cancel`]) immediately stops
//! delivery, and the registry entry is pruned on the next publish.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Topic names used by the gateway.
pub mod topics {
    /// Carries every newly created photo, published by `postPhoto`.
    pub const PHOTO_ADDED: &str = "photo-added";
}

type Registry<T> = HashMap<String, Vec<mpsc::UnboundedSender<T>>>;

/// Explicitly owned pub/sub channel, passed through context construction
/// rather than living in ambient global state. Cloning shares the registry.
pub struct NotificationBus<T> {
    registry: Arc<RwLock<Registry<T>>>,
}

impl<T> Clone for NotificationBus<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T> Default for NotificationBus<T> {
    fn default() -> Self {
        Self {
            registry: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T: Clone> NotificationBus<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `payload` to every live subscriber of `topic` and return the
    /// delivery count. Cancelled subscribers are pruned here, so the registry
    /// never iterates stale entries.
    pub fn publish(&self, topic: &str, payload: T) -> usize {
        let mut registry = self
            .registry
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(senders) = registry.get_mut(topic) else {
            return 0;
        };

        let mut delivered = 0;
        senders.retain(|sender| match sender.send(payload.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => false,
        });
        if senders.is_empty() {
            registry.remove(topic);
        }
        delivered
    }

    /// Register a subscriber and return its payload stream. The stream is
    /// possibly infinite and never restartable once cancelled.
    pub fn subscribe(&self, topic: &str) -> Subscription<T> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic.to_owned())
            .or_default()
            .push(sender);
        Subscription {
            inner: UnboundedReceiverStream::new(receiver),
        }
    }

    /// Number of registered (possibly already cancelled, not yet pruned)
    /// subscribers for a topic.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(topic)
            .map_or(0, Vec::len)
    }
}

/// Lazy sequence of payloads published on one topic after the subscription
/// was registered.
pub struct Subscription<T> {
    inner: UnboundedReceiverStream<T>,
}

impl<T> Subscription<T> {
    /// Stop delivery immediately. Equivalent to dropping the subscription;
    /// the registry entry is released on the next publish.
    pub fn cancel(self) {
        let mut receiver = self.inner.into_inner();
        receiver.close();
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::StreamExt;
    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn publish_without_subscribers_is_a_noop() {
        let bus = NotificationBus::new();
        assert_eq!(bus.publish(topics::PHOTO_ADDED, "payload"), 0);
    }

    #[tokio::test]
    async fn subscriber_receives_payload_exactly_once() {
        let bus = NotificationBus::new();
        let mut subscription = bus.subscribe(topics::PHOTO_ADDED);

        assert_eq!(bus.publish(topics::PHOTO_ADDED, "sunset"), 1);
        assert_eq!(subscription.next().await, Some("sunset"));

        let pending = timeout(Duration::from_millis(20), subscription.next()).await;
        assert!(pending.is_err(), "no second delivery expected");
    }

    #[tokio::test]
    async fn late_subscriber_misses_earlier_publishes() {
        let bus = NotificationBus::new();
        bus.publish(topics::PHOTO_ADDED, "early");

        let mut subscription = bus.subscribe(topics::PHOTO_ADDED);
        bus.publish(topics::PHOTO_ADDED, "late");
        assert_eq!(subscription.next().await, Some("late"));
    }

    #[tokio::test]
    async fn topics_are_isolated() {
        let bus = NotificationBus::new();
        let mut photos = bus.subscribe(topics::PHOTO_ADDED);
        let mut other = bus.subscribe("user-added");

        bus.publish(topics::PHOTO_ADDED, "photo");
        assert_eq!(photos.next().await, Some("photo"));

        let pending = timeout(Duration::from_millis(20), other.next()).await;
        assert!(pending.is_err(), "other topic must stay silent");
    }

    #[tokio::test]
    async fn cancelled_subscription_is_pruned_on_publish() {
        let bus = NotificationBus::new();
        let subscription = bus.subscribe(topics::PHOTO_ADDED);
        assert_eq!(bus.subscriber_count(topics::PHOTO_ADDED), 1);

        subscription.cancel();
        assert_eq!(bus.publish(topics::PHOTO_ADDED, "sunset"), 0);
        assert_eq!(bus.subscriber_count(topics::PHOTO_ADDED), 0);
    }

    #[tokio::test]
    async fn each_subscriber_gets_its_own_copy() {
        let bus = NotificationBus::new();
        let mut first = bus.subscribe(topics::PHOTO_ADDED);
        let mut second = bus.subscribe(topics::PHOTO_ADDED);

        assert_eq!(bus.publish(topics::PHOTO_ADDED, "sunset"), 2);
        assert_eq!(first.next().await, Some("sunset"));
        assert_eq!(second.next().await, Some("sunset"));
    }
}
