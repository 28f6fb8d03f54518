//! Browser adapters: `localStorage` as the store, window timers and the
//! `storage` event as the platform.
//!
//! SYSTEM CONTEXT
//! ==============
//! Compiled only with the `browser` feature. The browser fires `storage`
//! events in every tab except the one that wrote, which is exactly the
//! external-notification channel [`crate::synced::SyncedValue`] expects.
//!
//! ERROR HANDLING
//! ==============
//! A missing window or disabled storage degrades to [`crate::Detached`]
//! behaviour: reads return `None`, set-up calls return `None`, and writes
//! are dropped with a warning.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Interval;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use crate::config::SyncConfig;
use crate::platform::{EventFn, KeyValueStore, Platform, StorageEvent, SubscriptionId, TickFn, TimerId};
use crate::synced::SyncEnv;

const STORAGE_EVENT: &str = "storage";

/// Environment for the current browser tab.
#[must_use]
pub fn browser_env(config: SyncConfig) -> SyncEnv {
    SyncEnv::new(Rc::new(LocalStorage::new()), Rc::new(BrowserPlatform::new()), config)
}

// =============================================================================
// STORE
// =============================================================================

/// `window.localStorage`.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    #[must_use]
    pub fn new() -> Self {
        let storage = match web_sys::window().map(|w| w.local_storage()) {
            Some(Ok(storage)) => storage,
            Some(Err(err)) => {
                warn!(error = ?err, "localStorage unavailable");
                None
            }
            None => None,
        };
        Self { storage }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.storage.as_ref()?.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = ?err, "localStorage read failed");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) {
        let Some(storage) = &self.storage else { return };
        if let Err(err) = storage.set_item(key, value) {
            warn!(key, error = ?err, "localStorage write failed");
        }
    }

    fn remove_item(&self, key: &str) {
        let Some(storage) = &self.storage else { return };
        if let Err(err) = storage.remove_item(key) {
            warn!(key, error = ?err, "localStorage remove failed");
        }
    }
}

// =============================================================================
// PLATFORM
// =============================================================================

type Listener = Closure<dyn FnMut(web_sys::StorageEvent)>;

/// Window timers and `storage` events. Dropping it cancels every timer
/// and leaves listeners registered; call `unsubscribe` first.
#[derive(Default)]
pub struct BrowserPlatform {
    next_id: Cell<u64>,
    intervals: RefCell<HashMap<u64, Interval>>,
    listeners: RefCell<HashMap<u64, Listener>>,
}

impl BrowserPlatform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        id
    }
}

impl Platform for BrowserPlatform {
    fn set_interval(&self, period: Duration, mut tick: TickFn) -> Option<TimerId> {
        web_sys::window()?;
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX).max(1);
        let id = self.next_id();
        self.intervals.borrow_mut().insert(id, Interval::new(millis, move || tick()));
        Some(TimerId(id))
    }

    fn clear_interval(&self, id: TimerId) {
        // Dropping an Interval cancels it.
        self.intervals.borrow_mut().remove(&id.0);
    }

    fn subscribe(&self, mut handler: EventFn) -> Option<SubscriptionId> {
        let window = web_sys::window()?;
        let listener: Listener = Closure::new(move |event: web_sys::StorageEvent| {
            handler(&StorageEvent { key: event.key(), new_value: event.new_value() });
        });
        if let Err(err) = window.add_event_listener_with_callback(STORAGE_EVENT, listener.as_ref().unchecked_ref()) {
            warn!(error = ?err, "storage listener registration failed");
            return None;
        }
        let id = self.next_id();
        self.listeners.borrow_mut().insert(id, listener);
        Some(SubscriptionId(id))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let Some(listener) = self.listeners.borrow_mut().remove(&id.0) else {
            return;
        };
        let Some(window) = web_sys::window() else { return };
        if let Err(err) = window.remove_event_listener_with_callback(STORAGE_EVENT, listener.as_ref().unchecked_ref()) {
            warn!(error = ?err, "storage listener removal failed");
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> i64 {
        js_sys::Date::now() as i64
    }
}
