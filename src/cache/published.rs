//! Last-value slot shared between a producer and pull-based readers

use super::Entry;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Single-slot store for the latest published value.
///
/// The producer replaces the value wholesale; readers get a shared handle to
/// whatever is current. Once `ttl` passes without a new publish the slot
/// reads as empty, which consumers treat as "no data yet".
pub struct Published<T> {
    ttl: Duration,
    slot: RwLock<Option<Entry<Arc<T>>>>,
}

impl<T> Published<T> {
    /// Create an empty slot
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Replace the current value
    pub fn publish(&self, value: T) {
        self.publish_shared(Arc::new(value));
    }

    /// Replace the current value with an already shared one
    pub fn publish_shared(&self, value: Arc<T>) {
        *self.slot.write() = Some(Entry::new(value, self.ttl));
    }

    /// Latest value if it has not expired
    pub fn latest(&self) -> Option<Arc<T>> {
        let now = Instant::now();
        self.slot
            .read()
            .as_ref()
            .filter(|entry| entry.is_live(now))
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Time since the last publish, even if the value has expired
    pub fn age(&self) -> Option<Duration> {
        let now = Instant::now();
        self.slot.read().as_ref().map(|entry| entry.age(now))
    }

    pub fn is_fresh(&self) -> bool {
        self.latest().is_some()
    }
}
