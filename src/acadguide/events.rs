//! In-process broadcast channel for change events.
//!
//! Each [`DataStore`](crate::api::DataStore) instance owns its buses — there
//! is no ambient global event target, so isolated instances can coexist in
//! tests. Subscribing returns a [`Subscription`] guard; dropping it (or
//! calling [`Subscription::unsubscribe`]) deregisters the callback.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Registry<T> = Arc<Mutex<HashMap<u64, Callback<T>>>>;

pub struct EventBus<T> {
    subscribers: Registry<T>,
    next_id: AtomicU64,
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.insert(id, Arc::new(callback));
        }
        Subscription {
            id,
            registry: Arc::downgrade(&self.subscribers),
        }
    }

    /// Snapshots the subscriber list under the lock and invokes the callbacks
    /// outside it, so a callback may emit or subscribe without deadlocking.
    pub fn emit(&self, event: &T) {
        let callbacks: Vec<Callback<T>> = match self.subscribers.lock() {
            Ok(subscribers) => subscribers.values().cloned().collect(),
            Err(_) => return,
        };
        for callback in callbacks {
            callback(event);
        }
    }
}

/// Keeps a callback registered for as long as it lives.
pub struct Subscription<T> {
    id: u64,
    registry: Weak<Mutex<HashMap<u64, Callback<T>>>>,
}

impl<T> Subscription<T> {
    /// Explicit deregistration; equivalent to dropping the guard.
    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut subscribers) = registry.lock() {
                subscribers.remove(&self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn subscribers_receive_emitted_events() {
        let bus = EventBus::<u32>::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen2 = Arc::clone(&seen);
        let _sub = bus.subscribe(move |n| {
            seen2.fetch_add(*n as usize, Ordering::SeqCst);
        });

        bus.emit(&2);
        bus.emit(&3);
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn dropping_the_subscription_deregisters() {
        let bus = EventBus::<u32>::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen2 = Arc::clone(&seen);
        let sub = bus.subscribe(move |_| {
            seen2.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit(&1);
        sub.unsubscribe();
        bus.emit(&1);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscribers_may_emit_reentrantly() {
        let bus = Arc::new(EventBus::<u32>::new());
        let bus2 = Arc::clone(&bus);
        let seen = Arc::new(AtomicUsize::new(0));
        let seen2 = Arc::clone(&seen);
        let _sub = bus.subscribe(move |n| {
            seen2.fetch_add(1, Ordering::SeqCst);
            if *n == 1 {
                bus2.emit(&2);
            }
        });

        bus.emit(&1);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn independent_buses_do_not_interfere() {
        let a = EventBus::<u32>::new();
        let b = EventBus::<u32>::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen2 = Arc::clone(&seen);
        let _sub = a.subscribe(move |_| {
            seen2.fetch_add(1, Ordering::SeqCst);
        });

        b.emit(&1);
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }
}
