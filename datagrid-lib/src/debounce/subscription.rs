//! Listener registry and subscription handles.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Callback<V> = Arc<dyn Fn(&V) + Send + Sync>;

/// Something a [`Subscription`] can detach itself from.
pub(crate) trait Unsubscribe: Send + Sync {
    fn unsubscribe(&self, id: u64);
}

/// Ordered set of callbacks waiting for settled values.
pub(crate) struct Listeners<V> {
    entries: Mutex<Vec<(u64, Callback<V>)>>,
    next_id: AtomicU64,
}

impl<V> Listeners<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    pub(crate) fn add(&self, callback: Callback<V>) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));
        id
    }

    pub(crate) fn remove(&self, id: u64) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(entry, _)| *entry != id);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Invokes every callback in registration order while `live` holds.
    ///
    /// Callbacks are cloned out first so none runs while the registry is
    /// locked; a callback may subscribe or unsubscribe freely. `live` is
    /// checked before each callback, so one that tears down the owner stops
    /// delivery to the rest.
    pub(crate) fn notify(&self, value: &V, live: &dyn Fn() -> bool) {
        let callbacks: Vec<Callback<V>> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            if !live() {
                return;
            }
            callback(value);
        }
    }
}

/// Handle for a registered listener.
///
/// Dropping the handle unregisters the listener. Call [`detach`](Self::detach)
/// to keep the listener alive for the lifetime of the debouncer instead.
#[must_use = "dropping a Subscription immediately unregisters its listener"]
pub struct Subscription {
    id: u64,
    owner: Option<Weak<dyn Unsubscribe>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, owner: Weak<dyn Unsubscribe>) -> Self {
        Self {
            id,
            owner: Some(owner),
        }
    }

    /// Leaves the listener registered after this handle is gone.
    pub fn detach(mut self) {
        self.owner = None;
    }

    /// Unregisters the listener now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(owner) = self.owner.take().and_then(|weak| weak.upgrade()) {
            owner.unsubscribe(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.owner.is_some())
            .finish()
    }
}
