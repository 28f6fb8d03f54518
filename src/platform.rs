//! Host capabilities: the key-value store and the timer/event surface.
//!
//! DESIGN
//! ======
//! The engine never touches ambient globals. Every store is handed an
//! `Rc<dyn KeyValueStore>` and an `Rc<dyn Platform>` at construction time.
//! The browser adapter lives in [`crate::browser`], the deterministic fake in
//! [`crate::memory`], and [`Detached`] covers hosts with neither.
//!
//! Set-up calls return `Option` handles. `None` means the capability is
//! absent and callers must degrade to a no-op instead of failing.

use std::time::Duration;

/// Synchronous string-only store. Keys passed here are already namespaced.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// Notification that another context modified a key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageEvent {
    /// Full (prefixed) key that changed. `None` when the whole store was cleared.
    pub key: Option<String>,
    /// New raw value. `None` means the key was removed.
    pub new_value: Option<String>,
}

/// Handle for a registered interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Handle for a registered external-change listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Callback fired on each interval tick.
pub type TickFn = Box<dyn FnMut()>;

/// Callback fired on each external storage event.
pub type EventFn = Box<dyn FnMut(&StorageEvent)>;

/// Minimal timer and event capability of the host context.
pub trait Platform {
    /// Start a repeating timer. Returns `None` if the host has no timers.
    fn set_interval(&self, period: Duration, tick: TickFn) -> Option<TimerId>;
    /// Stop a timer. Unknown ids are ignored.
    fn clear_interval(&self, id: TimerId);
    /// Listen for changes made by other contexts. Returns `None` if unsupported.
    fn subscribe(&self, handler: EventFn) -> Option<SubscriptionId>;
    /// Remove a listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
    /// Milliseconds since the Unix epoch (or logical time for fakes).
    fn now_ms(&self) -> i64;
}

/// Adapter for restricted environments: no storage, no timers, no events.
#[derive(Clone, Copy, Debug, Default)]
pub struct Detached;

impl KeyValueStore for Detached {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, _key: &str, _value: &str) {}

    fn remove_item(&self, _key: &str) {}
}

impl Platform for Detached {
    fn set_interval(&self, _period: Duration, _tick: TickFn) -> Option<TimerId> {
        None
    }

    fn clear_interval(&self, _id: TimerId) {}

    fn subscribe(&self, _handler: EventFn) -> Option<SubscriptionId> {
        None
    }

    fn unsubscribe(&self, _id: SubscriptionId) {}

    fn now_ms(&self) -> i64 {
        0
    }
}
