//! # Subscription Registry
//!
//! Owned by one [`crate::EventBus`]; separate buses never share subscriptions.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;

/// Registry-scoped subscription identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Returned by `subscribe`; pass it back to `unsubscribe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    pub topic: String,
    pub channel_filter: Option<String>,
}

/// Live state of one subscription.
pub struct SubscriptionEntry {
    pub handle: SubscriptionHandle,
    active: AtomicBool,
    stop: Notify,
    /// Held shared by the delivery task from the active check until the
    /// handler returns.
    delivery: RwLock<()>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SubscriptionEntry {
    fn new(handle: SubscriptionHandle) -> Self {
        Self {
            handle,
            active: AtomicBool::new(true),
            stop: Notify::new(),
            delivery: RwLock::new(()),
            task: Mutex::new(None),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Flip the flag and wake the delivery task.
    ///
    /// Returns `false` if the entry was already deactivated.
    pub fn deactivate(&self) -> bool {
        let was_active = self.active.swap(false, Ordering::AcqRel);
        if was_active {
            self.stop.notify_one();
        }
        was_active
    }

    /// Resolves once [`Self::deactivate`] has been called.
    pub async fn stopped(&self) {
        self.stop.notified().await;
    }

    /// Guard for one delivery; take it before checking [`Self::is_active`].
    pub async fn begin_delivery(&self) -> tokio::sync::RwLockReadGuard<'_, ()> {
        self.delivery.read().await
    }

    /// Wait until no delivery that passed the active check is still running.
    pub async fn quiesce(&self) {
        drop(self.delivery.write().await);
    }

    pub fn attach_task(&self, task: JoinHandle<()>) {
        *self.task.lock() = Some(task);
    }

    pub fn take_task(&self) -> Option<JoinHandle<()>> {
        self.task.lock().take()
    }
}

/// Concurrent map of live subscriptions.
#[derive(Default)]
pub struct SubscriptionRegistry {
    entries: DashMap<SubscriptionId, Arc<SubscriptionEntry>>,
    next_id: AtomicU64,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, topic: &str, channel_filter: Option<String>) -> Arc<SubscriptionEntry> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let entry = Arc::new(SubscriptionEntry::new(SubscriptionHandle {
            id,
            topic: topic.to_string(),
            channel_filter,
        }));
        self.entries.insert(id, Arc::clone(&entry));
        entry
    }

    /// Deactivate and forget a subscription.
    ///
    /// Returns the entry only for the caller that actually removed it.
    pub fn remove(&self, id: SubscriptionId) -> Option<Arc<SubscriptionEntry>> {
        let (_, entry) = self.entries.remove(&id)?;
        entry.deactivate();
        Some(entry)
    }

    pub fn get(&self, id: SubscriptionId) -> Option<Arc<SubscriptionEntry>> {
        self.entries.get(&id).map(|e| Arc::clone(e.value()))
    }

    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of subscriptions on an exact topic string.
    pub fn count_for_topic(&self, topic: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.value().handle.topic == topic)
            .count()
    }

    pub fn ids(&self) -> Vec<SubscriptionId> {
        self.entries.iter().map(|e| *e.key()).collect()
    }
}
