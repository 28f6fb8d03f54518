//! Deterministic in-memory store and platform.
//!
//! DESIGN
//! ======
//! One [`MemoryStore`] plays the role of the persistent store shared by every
//! tab. Each [`MemoryContext`] plays one tab: it implements both
//! [`KeyValueStore`] and [`Platform`], owns a logical clock, and has an inbox
//! of [`StorageEvent`]s.
//!
//! A write through context A queues an event for every *other* live context,
//! never for A, mirroring how browsers fire `storage` events. Nothing is
//! delivered until the receiving context is driven with
//! [`MemoryContext::deliver_pending`] or [`MemoryContext::advance`], which is
//! the fake's "next scheduler turn".
//!
//! Timers fire synchronously inside `advance`, ordered by deadline and then by
//! registration. Callbacks are invoked with no internal borrow held, so they
//! may register or clear timers and listeners.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::platform::{EventFn, KeyValueStore, Platform, StorageEvent, SubscriptionId, TickFn, TimerId};

/// Logical epoch every fresh context starts at.
pub const FAKE_EPOCH_MS: i64 = 1_700_000_000_000;

type Inbox = RefCell<VecDeque<StorageEvent>>;

// =============================================================================
// SHARED STORE
// =============================================================================

/// The shared backing map plus the registry of context inboxes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    items: HashMap<String, String>,
    inboxes: Vec<(u64, Weak<Inbox>)>,
    next_context: u64,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new context (tab) on this store.
    #[must_use]
    pub fn context(&self) -> Rc<MemoryContext> {
        let inbox = Rc::new(RefCell::new(VecDeque::new()));
        let id = {
            let mut inner = self.inner.borrow_mut();
            inner.next_context += 1;
            let id = inner.next_context;
            inner.inboxes.push((id, Rc::downgrade(&inbox)));
            id
        };
        Rc::new(MemoryContext {
            id,
            store: self.clone(),
            inbox,
            now: Cell::new(FAKE_EPOCH_MS),
            next_handle: Cell::new(0),
            timers: RefCell::new(BTreeMap::new()),
            subscribers: RefCell::new(BTreeMap::new()),
        })
    }

    /// Read a raw (fully prefixed) key.
    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.inner.borrow().items.get(key).cloned()
    }

    /// Out-of-band write that every context observes as external.
    pub fn set_raw(&self, key: &str, value: &str) {
        self.write(None, key, Some(value));
    }

    /// Out-of-band removal that every context observes as external.
    pub fn remove_raw(&self, key: &str) {
        self.write(None, key, None);
    }

    /// Number of keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    fn write(&self, origin: Option<u64>, key: &str, value: Option<&str>) {
        let mut inner = self.inner.borrow_mut();
        let changed = match value {
            Some(v) => inner.items.insert(key.to_owned(), v.to_owned()).as_deref() != Some(v),
            None => inner.items.remove(key).is_some(),
        };
        if !changed {
            return;
        }

        let event = StorageEvent { key: Some(key.to_owned()), new_value: value.map(str::to_owned) };
        inner.inboxes.retain(|(_, inbox)| inbox.strong_count() > 0);
        for (id, inbox) in &inner.inboxes {
            if Some(*id) == origin {
                continue;
            }
            if let Some(inbox) = inbox.upgrade() {
                inbox.borrow_mut().push_back(event.clone());
            }
        }
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

struct Timer {
    period_ms: i64,
    next_due: i64,
    tick: Rc<RefCell<TickFn>>,
}

/// One simulated execution context over a [`MemoryStore`].
pub struct MemoryContext {
    id: u64,
    store: MemoryStore,
    inbox: Rc<Inbox>,
    now: Cell<i64>,
    next_handle: Cell<u64>,
    timers: RefCell<BTreeMap<u64, Timer>>,
    subscribers: RefCell<BTreeMap<u64, Rc<RefCell<EventFn>>>>,
}

impl MemoryContext {
    /// The store this context writes through.
    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Deliver every queued external event to current subscribers.
    /// Returns the number of events delivered.
    pub fn deliver_pending(&self) -> usize {
        let mut delivered = 0;
        loop {
            let Some(event) = self.inbox.borrow_mut().pop_front() else {
                break;
            };
            let handlers: Vec<(u64, Rc<RefCell<EventFn>>)> = self
                .subscribers
                .borrow()
                .iter()
                .map(|(id, h)| (*id, Rc::clone(h)))
                .collect();
            for (id, handler) in handlers {
                if !self.subscribers.borrow().contains_key(&id) {
                    continue;
                }
                (&mut *handler.borrow_mut())(&event);
            }
            delivered += 1;
        }
        delivered
    }

    /// Deliver pending events, then move the logical clock forward by
    /// `duration`, firing every interval that comes due on the way.
    pub fn advance(&self, duration: Duration) {
        self.deliver_pending();
        let target = self.now.get().saturating_add(duration_ms(duration));
        // A timer saturated at i64::MAX never fires again.
        loop {
            let due = self
                .timers
                .borrow()
                .iter()
                .filter(|(_, t)| t.next_due <= target && t.next_due < i64::MAX)
                .min_by_key(|(id, t)| (t.next_due, **id))
                .map(|(id, t)| (*id, t.next_due));
            let Some((id, due_at)) = due else {
                break;
            };
            self.now.set(due_at);
            let tick = {
                let mut timers = self.timers.borrow_mut();
                let Some(timer) = timers.get_mut(&id) else {
                    continue;
                };
                timer.next_due = timer.next_due.saturating_add(timer.period_ms);
                Rc::clone(&timer.tick)
            };
            (&mut *tick.borrow_mut())();
        }
        self.now.set(target);
    }

    /// Number of live intervals.
    #[must_use]
    pub fn active_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Number of live external-change listeners.
    #[must_use]
    pub fn active_subscriptions(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Number of events waiting for the next scheduler turn.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.inbox.borrow().len()
    }

    fn next_handle(&self) -> u64 {
        let id = self.next_handle.get() + 1;
        self.next_handle.set(id);
        id
    }
}

impl KeyValueStore for MemoryContext {
    fn get_item(&self, key: &str) -> Option<String> {
        self.store.get_raw(key)
    }

    fn set_item(&self, key: &str, value: &str) {
        self.store.write(Some(self.id), key, Some(value));
    }

    fn remove_item(&self, key: &str) {
        self.store.write(Some(self.id), key, None);
    }
}

impl Platform for MemoryContext {
    fn set_interval(&self, period: Duration, tick: TickFn) -> Option<TimerId> {
        let id = self.next_handle();
        let period_ms = duration_ms(period).max(1);
        self.timers.borrow_mut().insert(
            id,
            Timer { period_ms, next_due: self.now.get().saturating_add(period_ms), tick: Rc::new(RefCell::new(tick)) },
        );
        Some(TimerId(id))
    }

    fn clear_interval(&self, id: TimerId) {
        self.timers.borrow_mut().remove(&id.0);
    }

    fn subscribe(&self, handler: EventFn) -> Option<SubscriptionId> {
        let id = self.next_handle();
        self.subscribers
            .borrow_mut()
            .insert(id, Rc::new(RefCell::new(handler)));
        Some(SubscriptionId(id))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.borrow_mut().remove(&id.0);
    }

    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}

fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}
