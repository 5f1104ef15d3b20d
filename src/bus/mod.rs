//! In-process event bus for the islet overlay core.
//!
//! This module provides the typed publish/subscribe channels that decouple
//! the timer engine, the media session adapter and the overlay:
//! - `Topic<T>`: a synchronous, at-most-once pub/sub channel
//! - `Subscription`: RAII handle that unsubscribes on drop
//! - `IsletBus`: the bundle of topics one running session shares
//!
//! Delivery is synchronous and in-process. There is no queueing and no
//! replay: a subscriber registered after a publish never sees it. All
//! subscribers present at publish time are invoked; the order is
//! unspecified. A panicking handler is isolated so the remaining handlers
//! still run.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};

use tracing::{error, trace};

use crate::types::{MediaCommand, MediaSnapshot, TimerCommand, TimerCompleted, TimerSnapshot};

// ============================================================================
// Topic
// ============================================================================

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct TopicInner<T> {
    next_id: u64,
    handlers: Vec<(u64, Handler<T>)>,
}

/// A typed, synchronous publish/subscribe channel.
///
/// Cloning a `Topic` yields another handle to the same channel. Payloads
/// are delivered by reference to every subscriber registered at the moment
/// of the publish call.
pub struct Topic<T> {
    inner: Arc<Mutex<TopicInner<T>>>,
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for Topic<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Topic<T> {
    /// Creates an empty topic with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(TopicInner {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Registers a handler and returns its subscription handle.
    ///
    /// The handler stays registered until the returned `Subscription` is
    /// dropped (or `unsubscribe` is called on it). Handlers run on the
    /// publisher's thread and must not block.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: 'static,
    {
        let id = {
            let mut inner = self.inner.lock().unwrap();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.handlers.push((id, Arc::new(handler)));
            id
        };

        let weak: Weak<Mutex<TopicInner<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.lock().unwrap().handlers.retain(|(hid, _)| *hid != id);
                }
            })),
        }
    }

    /// Publishes a payload to every current subscriber.
    ///
    /// Publishing with zero subscribers is a silent no-op. Each handler
    /// invocation is isolated: a panic inside one handler is logged and
    /// the remaining handlers still run.
    pub fn publish(&self, payload: &T) {
        // Snapshot the handler list so handlers may subscribe/unsubscribe
        // during dispatch without deadlocking on the topic lock.
        let handlers: Vec<Handler<T>> = {
            let inner = self.inner.lock().unwrap();
            inner.handlers.iter().map(|(_, h)| Arc::clone(h)).collect()
        };

        if handlers.is_empty() {
            trace!("publish with no subscribers, dropping payload");
            return;
        }

        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(payload))).is_err() {
                error!("bus handler panicked; continuing with remaining handlers");
            }
        }
    }

    /// Returns the number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().handlers.len()
    }
}

// ============================================================================
// Subscription
// ============================================================================

/// RAII handle for a registered bus handler.
///
/// Dropping the handle removes the handler from its topic.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Removes the handler immediately instead of waiting for drop.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

// ============================================================================
// IsletBus
// ============================================================================

/// The bundle of typed topics shared by one running session.
///
/// Constructed per session (and per test case) rather than living as a
/// process-wide global, so isolated buses never leak state between tests.
#[derive(Clone, Default)]
pub struct IsletBus {
    /// Timer snapshots, engine → overlay
    pub timer_state: Topic<TimerSnapshot>,
    /// Media snapshots, adapter → overlay
    pub media_state: Topic<MediaSnapshot>,
    /// Timer commands, overlay → engine
    pub timer_commands: Topic<TimerCommand>,
    /// Media commands, overlay → adapter
    pub media_commands: Topic<MediaCommand>,
    /// One-shot completion broadcasts, engine → any listener
    pub timer_completed: Topic<TimerCompleted>,
}

impl IsletBus {
    /// Creates a fresh bus with no subscribers on any topic.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for IsletBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsletBus")
            .field("timer_state_subscribers", &self.timer_state.subscriber_count())
            .field("media_state_subscribers", &self.media_state.subscriber_count())
            .field(
                "timer_command_subscribers",
                &self.timer_commands.subscriber_count(),
            )
            .field(
                "media_command_subscribers",
                &self.media_commands.subscriber_count(),
            )
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_publish_reaches_single_subscriber() {
        let topic: Topic<u32> = Topic::new();
        let seen = Arc::new(AtomicU32::new(0));

        let seen_clone = Arc::clone(&seen);
        let _sub = topic.subscribe(move |v| {
            seen_clone.store(*v, Ordering::SeqCst);
        });

        topic.publish(&42);
        assert_eq!(seen.load(Ordering::SeqCst), 42);
    }

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let topic: Topic<u32> = Topic::new();
        let count = Arc::new(AtomicU32::new(0));

        let c1 = Arc::clone(&count);
        let _s1 = topic.subscribe(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        });
        let c2 = Arc::clone(&count);
        let _s2 = topic.subscribe(move |_| {
            c2.fetch_add(1, Ordering::SeqCst);
        });

        topic.publish(&1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let topic: Topic<u32> = Topic::new();
        // Must not panic or block
        topic.publish(&7);
        assert_eq!(topic.subscriber_count(), 0);
    }

    #[test]
    fn test_no_replay_for_late_subscriber() {
        let topic: Topic<u32> = Topic::new();
        topic.publish(&1);

        let seen = Arc::new(AtomicU32::new(0));
        let seen_clone = Arc::clone(&seen);
        let _sub = topic.subscribe(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });

        // Only deliveries after registration count
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        topic.publish(&2);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let topic: Topic<u32> = Topic::new();
        let seen = Arc::new(AtomicU32::new(0));

        let seen_clone = Arc::clone(&seen);
        let sub = topic.subscribe(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(topic.subscriber_count(), 1);

        drop(sub);
        assert_eq!(topic.subscriber_count(), 0);

        topic.publish(&1);
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_explicit_unsubscribe() {
        let topic: Topic<u32> = Topic::new();
        let sub = topic.subscribe(|_| {});
        assert_eq!(topic.subscriber_count(), 1);

        sub.unsubscribe();
        assert_eq!(topic.subscriber_count(), 0);
    }

    #[test]
    fn test_panicking_handler_does_not_block_others() {
        let topic: Topic<u32> = Topic::new();
        let seen = Arc::new(AtomicU32::new(0));

        let _bad = topic.subscribe(|_| {
            panic!("handler blew up");
        });
        let seen_clone = Arc::clone(&seen);
        let _good = topic.subscribe(move |v| {
            seen_clone.store(*v, Ordering::SeqCst);
        });

        topic.publish(&9);
        assert_eq!(seen.load(Ordering::SeqCst), 9);
    }

    #[test]
    fn test_subscribe_during_dispatch_does_not_deadlock() {
        let topic: Topic<u32> = Topic::new();
        let topic_clone = topic.clone();
        let held = Arc::new(Mutex::new(Vec::new()));

        let held_clone = Arc::clone(&held);
        let _sub = topic.subscribe(move |_| {
            // Registering mid-dispatch must not deadlock; the new handler
            // only sees later publishes.
            let inner = topic_clone.subscribe(|_| {});
            held_clone.lock().unwrap().push(inner);
        });

        topic.publish(&1);
        assert_eq!(topic.subscriber_count(), 2);
    }

    #[test]
    fn test_cloned_topic_shares_subscribers() {
        let topic: Topic<u32> = Topic::new();
        let clone = topic.clone();
        let seen = Arc::new(AtomicU32::new(0));

        let seen_clone = Arc::clone(&seen);
        let _sub = clone.subscribe(move |v| {
            seen_clone.store(*v, Ordering::SeqCst);
        });

        topic.publish(&5);
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_bus_topics_are_independent() {
        let bus = IsletBus::new();
        let seen = Arc::new(AtomicU32::new(0));

        let seen_clone = Arc::clone(&seen);
        let _sub = bus.timer_commands.subscribe(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });

        // A media command must not reach a timer command subscriber
        bus.media_commands.publish(&MediaCommand::PlayPause);
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        bus.timer_commands.publish(&TimerCommand::Toggle);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bus_clone_shares_channels() {
        let bus = IsletBus::new();
        let bus2 = bus.clone();
        let seen = Arc::new(AtomicU32::new(0));

        let seen_clone = Arc::clone(&seen);
        let _sub = bus2.timer_state.subscribe(move |snap| {
            seen_clone.store(snap.time_left_seconds, Ordering::SeqCst);
        });

        bus.timer_state.publish(&TimerSnapshot::with_minutes(1));
        assert_eq!(seen.load(Ordering::SeqCst), 60);
    }
}
