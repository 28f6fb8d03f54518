//! Prefix-namespaced access to the shared key-value store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every key the engine touches goes through here, so the classroom can share
//! a physical store with unrelated applications. Global keys are
//! `<prefix><key>`; per-student keys are `<prefix>student:<id>:<suffix>`.

#[cfg(test)]
#[path = "channel_test.rs"]
mod channel_test;

use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CodecError, SyncError};
use crate::platform::{Detached, KeyValueStore};

/// Typed, namespaced view over a [`KeyValueStore`].
#[derive(Clone)]
pub struct StorageChannel {
    store: Rc<dyn KeyValueStore>,
    prefix: Rc<str>,
}

impl fmt::Debug for StorageChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageChannel").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}

impl StorageChannel {
    #[must_use]
    pub fn new(store: Rc<dyn KeyValueStore>, prefix: &str) -> Self {
        Self { store, prefix: Rc::from(prefix) }
    }

    /// A channel with no backing store: reads are absent, writes are dropped.
    #[must_use]
    pub fn detached(prefix: &str) -> Self {
        Self::new(Rc::new(Detached), prefix)
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The physical key for a logical key.
    #[must_use]
    pub fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.store.get_item(&self.full_key(key))
    }

    pub fn set(&self, key: &str, value: &str) {
        self.store.set_item(&self.full_key(key), value);
    }

    pub fn remove(&self, key: &str) {
        self.store.remove_item(&self.full_key(key));
    }

    /// Decode a JSON value, falling back on absence or malformed text.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Some(raw) = self.get(key) else {
            return fallback;
        };
        if raw.is_empty() {
            return fallback;
        }
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                let err = SyncError::Decode { key: key.to_owned(), source: CodecError::Json(e) };
                tracing::warn!(key, code = err.error_code(), error = %err, "json decode failed; using fallback");
                fallback
            }
        }
    }

    /// Encode a value as JSON and store it.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, &raw),
            Err(e) => tracing::warn!(key, error = %e, "json encode failed; value not persisted"),
        }
    }
}

/// Logical key for a per-student value, e.g. `student:s1:code`.
#[must_use]
pub fn student_key(student_id: &str, suffix: &str) -> String {
    format!("student:{student_id}:{suffix}")
}
