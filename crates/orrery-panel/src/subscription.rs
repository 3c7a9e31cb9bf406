//! Notification gates and the subscriptions that keep them open.
//!
//! A gate is the host-side connection point for one signal. The host routes
//! an event to the panel only if the gate admits it, and a gate admits events
//! only while the panel holds a live [`Subscription`] for it. Dropping or
//! releasing the subscription closes the gate, so observers are detached even
//! if the panel is torn down without an explicit release.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Which signal a gate carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Intersection,
    DocumentVisibility,
    MotionPreference,
    Resize,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topic::Intersection => "intersection",
            Topic::DocumentVisibility => "document-visibility",
            Topic::MotionPreference => "motion-preference",
            Topic::Resize => "resize",
        };
        f.write_str(name)
    }
}

/// Connection point for one signal. Clones share the same connection flag.
///
/// A gate carries a single subscriber; subscribing again replaces the flag
/// owner, and releasing either subscription closes the gate.
#[derive(Debug, Clone)]
pub struct NotificationGate {
    topic: Topic,
    connected: Rc<Cell<bool>>,
}

impl NotificationGate {
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            connected: Rc::new(Cell::new(false)),
        }
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn is_connected(&self) -> bool {
        self.connected.get()
    }

    /// Open the gate and return the handle that keeps it open.
    pub fn subscribe(&self) -> Subscription {
        self.connected.set(true);
        Subscription {
            topic: self.topic,
            connected: Some(Rc::clone(&self.connected)),
        }
    }

    /// Pass `event` through if a subscriber is connected.
    pub fn deliver<T>(&self, event: T) -> Option<T> {
        self.is_connected().then_some(event)
    }
}

/// RAII handle for a gate connection.
#[derive(Debug)]
pub struct Subscription {
    topic: Topic,
    connected: Option<Rc<Cell<bool>>>,
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn is_active(&self) -> bool {
        self.connected.is_some()
    }

    /// Close the gate. Returns `false` if this subscription was already
    /// released.
    pub fn release(&mut self) -> bool {
        match self.connected.take() {
            Some(flag) => {
                flag.set(false);
                true
            }
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Subscriptions owned by one panel, released together on detach.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Number of subscriptions still holding their gate open.
    pub fn active_count(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.is_active()).count()
    }

    /// Release every subscription and empty the set. Returns how many were
    /// still active.
    pub fn release_all(&mut self) -> usize {
        self.subscriptions
            .drain(..)
            .map(|mut s| usize::from(s.release()))
            .sum()
    }
}

impl FromIterator<Subscription> for SubscriptionSet {
    fn from_iter<I: IntoIterator<Item = Subscription>>(iter: I) -> Self {
        Self {
            subscriptions: iter.into_iter().collect(),
        }
    }
}
