//! Reactive, role-gated mirror of one storage key.
//!
//! DESIGN
//! ======
//! A [`SyncedValue`] holds an in-memory copy of one key and keeps it live
//! through two independent paths:
//!
//! 1. External notification: the platform reports changes made by *other*
//!    contexts. A matching, non-removal event triggers a re-read.
//! 2. Polling: every interval the key is re-read and compared, by encoded
//!    form, against the mirror. Same-context writes never produce
//!    notifications, so this is the only path that catches them.
//!
//! Writes update the mirror synchronously and persist immediately, so a read
//! after a write never waits on either path.
//!
//! LIFECYCLE
//! =========
//! Change detection starts at construction. There is no destructor: the
//! owning store must call [`SyncedValue::stop`], which clears the timer and
//! removes the listener. `start` and `stop` are idempotent.

#[cfg(test)]
#[path = "synced_test.rs"]
mod synced_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::channel::StorageChannel;
use crate::codec::Codec;
use crate::config::{SyncConfig, SyncOptions};
use crate::error::SyncError;
use crate::platform::{Detached, KeyValueStore, Platform, StorageEvent, SubscriptionId, TimerId};
use crate::role::RoleGate;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Everything a store needs from its host: the channel, the platform, and config.
#[derive(Clone)]
pub struct SyncEnv {
    pub channel: StorageChannel,
    pub platform: Rc<dyn Platform>,
    pub config: SyncConfig,
}

impl fmt::Debug for SyncEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEnv")
            .field("channel", &self.channel)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SyncEnv {
    #[must_use]
    pub fn new(store: Rc<dyn KeyValueStore>, platform: Rc<dyn Platform>, config: SyncConfig) -> Self {
        let channel = StorageChannel::new(store, &config.prefix);
        Self { channel, platform, config }
    }

    /// Environment for a host that is both store and platform (one tab).
    #[must_use]
    pub fn for_context<C: KeyValueStore + Platform + 'static>(context: &Rc<C>, config: SyncConfig) -> Self {
        let store: Rc<dyn KeyValueStore> = context.clone();
        let platform: Rc<dyn Platform> = context.clone();
        Self::new(store, platform, config)
    }

    /// Environment with no storage backend and no timers.
    #[must_use]
    pub fn detached(config: SyncConfig) -> Self {
        Self::new(Rc::new(Detached), Rc::new(Detached), config)
    }

    #[must_use]
    pub fn options(&self) -> SyncOptions {
        self.config.options()
    }

    #[must_use]
    pub fn now_ms(&self) -> i64 {
        self.platform.now_ms()
    }
}

// =============================================================================
// WRITE POLICY
// =============================================================================

/// Who may write a value.
#[derive(Clone, Debug)]
pub enum WritePolicy {
    /// Any context.
    Open,
    /// Only the privileged context.
    Privileged(RoleGate),
    /// Only non-privileged contexts.
    Unprivileged(RoleGate),
    /// Nobody; the value is a pure mirror.
    ReadOnly,
}

impl WritePolicy {
    /// # Errors
    ///
    /// Returns [`SyncError::Forbidden`] when the current role may not write.
    pub fn check(&self, action: &str) -> Result<(), SyncError> {
        match self {
            Self::Open => Ok(()),
            Self::Privileged(gate) => gate.require_privileged(action),
            Self::Unprivileged(gate) => gate.require_unprivileged(action),
            Self::ReadOnly => Err(SyncError::Forbidden { action: action.to_owned(), required: "no" }),
        }
    }
}

// =============================================================================
// SYNCED VALUE
// =============================================================================

/// Handle for a registered change observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    key: String,
    full_key: String,
    value: T,
    default: T,
    codec: Rc<dyn Codec<T>>,
    channel: StorageChannel,
    platform: Rc<dyn Platform>,
    policy: WritePolicy,
    options: SyncOptions,
    gate: Option<Rc<dyn Fn() -> bool>>,
    timer: Option<TimerId>,
    subscription: Option<SubscriptionId>,
    observers: Vec<(ObserverId, Observer<T>)>,
    next_observer: u64,
}

/// A typed value backed by one storage key. Clones share the same mirror.
pub struct SyncedValue<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for SyncedValue<T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<T: fmt::Debug> fmt::Debug for SyncedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SyncedValue")
            .field("key", &inner.key)
            .field("value", &inner.value)
            .finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> SyncedValue<T> {
    /// Read the initial value from storage (or `default`) and start change detection.
    pub fn new(
        env: &SyncEnv,
        key: &str,
        default: T,
        codec: impl Codec<T> + 'static,
        policy: WritePolicy,
        options: SyncOptions,
    ) -> Self {
        let codec: Rc<dyn Codec<T>> = Rc::new(codec);
        let value = load(&env.channel, key, codec.as_ref(), &default);
        let value = Self {
            inner: Rc::new(RefCell::new(Inner {
                key: key.to_owned(),
                full_key: env.channel.full_key(key),
                value,
                default,
                codec,
                channel: env.channel.clone(),
                platform: Rc::clone(&env.platform),
                policy,
                options,
                gate: None,
                timer: None,
                subscription: None,
                observers: Vec::new(),
                next_observer: 0,
            })),
        };
        value.start();
        value
    }

    /// Only apply inbound changes (notification or poll) while `gate` is true.
    #[must_use]
    pub fn with_sync_gate(self, gate: impl Fn() -> bool + 'static) -> Self {
        self.inner.borrow_mut().gate = Some(Rc::new(gate));
        self
    }

    /// Current mirrored value. No I/O.
    #[must_use]
    pub fn read(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the mirrored value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    #[must_use]
    pub fn key(&self) -> String {
        self.inner.borrow().key.clone()
    }

    /// Replace the value and persist it. Returns `false`, leaving mirror and
    /// store untouched, when the write policy denies the current role or the
    /// value cannot be encoded.
    pub fn write(&self, value: T) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            let action = format!("write {}", inner.key);
            if let Err(err) = inner.policy.check(&action) {
                warn!(key = %inner.key, code = err.error_code(), error = %err, "write rejected");
                return false;
            }
            match inner.codec.encode(&value) {
                Ok(Some(raw)) => inner.channel.set(&inner.key, &raw),
                Ok(None) => inner.channel.remove(&inner.key),
                Err(err) => {
                    warn!(key = %inner.key, code = err.error_code(), error = %err, "write not persisted");
                    return false;
                }
            }
            inner.value = value;
        }
        self.notify();
        true
    }

    /// Apply `f` to a copy of the current value and write the result.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.read();
        f(&mut next);
        self.write(next)
    }

    /// Replace the mirror without persisting. The next inbound change that
    /// passes the sync gate overwrites it.
    pub fn set_local(&self, value: T) {
        self.inner.borrow_mut().value = value;
        self.notify();
    }

    /// Whether the current role may write this value.
    #[must_use]
    pub fn is_writable(&self) -> bool {
        let inner = self.inner.borrow();
        inner.policy.check(&inner.key).is_ok()
    }

    /// Re-read the key and update the mirror if the stored value differs.
    /// This is the body of the polling channel; tests call it directly.
    /// Returns `true` if the mirror changed.
    pub fn poll_now(&self) -> bool {
        if !self.gate_open() {
            return false;
        }
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let stored = load(&inner.channel, &inner.key, inner.codec.as_ref(), &inner.default);
            if same_encoding(inner.codec.as_ref(), &stored, &inner.value) {
                false
            } else {
                debug!(key = %inner.key, "poll picked up change");
                inner.value = stored;
                true
            }
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Handle one external-notification event.
    fn on_storage_event(&self, event: &StorageEvent) {
        {
            let inner = self.inner.borrow();
            if event.key.as_deref() != Some(inner.full_key.as_str()) || event.new_value.is_none() {
                return;
            }
        }
        if !self.gate_open() {
            return;
        }
        {
            let mut inner = self.inner.borrow_mut();
            let next = load(&inner.channel, &inner.key, inner.codec.as_ref(), &inner.default);
            inner.value = next;
            debug!(key = %inner.key, "external change applied");
        }
        self.notify();
    }

    /// Start whichever change-detection channels are enabled. Idempotent.
    pub fn start(&self) {
        let (listen, poll, interval, platform) = {
            let inner = self.inner.borrow();
            (
                inner.options.listen && inner.subscription.is_none(),
                inner.options.poll && inner.timer.is_none(),
                inner.options.interval,
                Rc::clone(&inner.platform),
            )
        };

        if listen {
            let weak = Rc::downgrade(&self.inner);
            let id = platform.subscribe(Box::new(move |event: &StorageEvent| {
                if let Some(value) = upgrade(&weak) {
                    value.on_storage_event(event);
                }
            }));
            self.inner.borrow_mut().subscription = id;
        }

        if poll {
            let weak = Rc::downgrade(&self.inner);
            let id = platform.set_interval(
                interval,
                Box::new(move || {
                    if let Some(value) = upgrade(&weak) {
                        value.poll_now();
                    }
                }),
            );
            self.inner.borrow_mut().timer = id;
        }
    }

    /// Clear the polling timer and remove the listener. Idempotent.
    pub fn stop(&self) {
        let (timer, subscription, platform) = {
            let mut inner = self.inner.borrow_mut();
            (inner.timer.take(), inner.subscription.take(), Rc::clone(&inner.platform))
        };
        if let Some(id) = timer {
            platform.clear_interval(id);
        }
        if let Some(id) = subscription {
            platform.unsubscribe(id);
        }
    }

    /// Whether a timer or listener is currently registered.
    #[must_use]
    pub fn is_running(&self) -> bool {
        let inner = self.inner.borrow();
        inner.timer.is_some() || inner.subscription.is_some()
    }

    /// Register a callback fired whenever the mirror changes.
    pub fn on_change(&self, observer: impl Fn(&T) + 'static) -> ObserverId {
        let mut inner = self.inner.borrow_mut();
        inner.next_observer += 1;
        let id = ObserverId(inner.next_observer);
        inner.observers.push((id, Rc::new(observer)));
        id
    }

    pub fn remove_observer(&self, id: ObserverId) {
        self.inner.borrow_mut().observers.retain(|(oid, _)| *oid != id);
    }

    fn gate_open(&self) -> bool {
        let gate = self.inner.borrow().gate.clone();
        gate.is_none_or(|g| g())
    }

    fn notify(&self) {
        let (value, observers) = {
            let inner = self.inner.borrow();
            let observers: Vec<Observer<T>> = inner.observers.iter().map(|(_, o)| Rc::clone(o)).collect();
            (inner.value.clone(), observers)
        };
        for observer in observers {
            observer(&value);
        }
    }
}

fn upgrade<T>(weak: &Weak<RefCell<Inner<T>>>) -> Option<SyncedValue<T>> {
    weak.upgrade().map(|inner| SyncedValue { inner })
}

/// Values compare by encoded form. A value that cannot be encoded never
/// counts as a change.
fn same_encoding<T>(codec: &dyn Codec<T>, a: &T, b: &T) -> bool {
    match (codec.encode(a), codec.encode(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => true,
    }
}

/// Read and decode `key`, falling back to `default` on absence or decode failure.
fn load<T: Clone>(channel: &StorageChannel, key: &str, codec: &dyn Codec<T>, default: &T) -> T {
    let Some(raw) = channel.get(key) else {
        return default.clone();
    };
    match codec.decode(&raw) {
        Ok(value) => value,
        Err(source) => {
            let err = SyncError::Decode { key: key.to_owned(), source };
            warn!(key, code = err.error_code(), error = %err, "decode failed; using default");
            default.clone()
        }
    }
}
