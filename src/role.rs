//! Local role and identity.
//!
//! DESIGN
//! ======
//! The privileged flag is local to each context: it is persisted so a reload
//! keeps its role, but it is never watched, so one tab's role change never
//! leaks into another. [`RoleGate`] is the shared handle every store consults
//! before writing privileged-only state. Reads are never gated.

#[cfg(test)]
#[path = "role_test.rs"]
mod role_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{info, warn};

use crate::channel::StorageChannel;
use crate::codec::{BoolCodec, Codec};
use crate::error::SyncError;
use crate::keys;
use crate::synced::SyncEnv;

/// Default display name for the privileged role.
pub const DEFAULT_TEACHER_NAME: &str = "교사";

// =============================================================================
// ROLE GATE
// =============================================================================

/// "This context holds the privileged role." Cheap to clone; clones share state.
#[derive(Clone, Debug, Default)]
pub struct RoleGate {
    privileged: Rc<Cell<bool>>,
}

impl RoleGate {
    #[must_use]
    pub fn new(privileged: bool) -> Self {
        Self { privileged: Rc::new(Cell::new(privileged)) }
    }

    #[must_use]
    pub fn is_privileged(&self) -> bool {
        self.privileged.get()
    }

    pub(crate) fn set_privileged(&self, value: bool) {
        self.privileged.set(value);
    }

    /// Ok if this context is privileged.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Forbidden`] otherwise.
    pub fn require_privileged(&self, action: &str) -> Result<(), SyncError> {
        if self.is_privileged() {
            Ok(())
        } else {
            Err(SyncError::Forbidden { action: action.to_owned(), required: "teacher" })
        }
    }

    /// Ok if this context is not privileged.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Forbidden`] otherwise.
    pub fn require_unprivileged(&self, action: &str) -> Result<(), SyncError> {
        if self.is_privileged() {
            Err(SyncError::Forbidden { action: action.to_owned(), required: "student" })
        } else {
            Ok(())
        }
    }
}

/// Log a rejected operation. Returns `true` if `result` was allowed.
pub(crate) fn allowed(result: Result<(), SyncError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(code = err.error_code(), error = %err, "operation rejected");
            false
        }
    }
}

// =============================================================================
// ROLE STORE
// =============================================================================

/// Role and privileged display name for this context.
pub struct RoleStore {
    gate: RoleGate,
    channel: StorageChannel,
    teacher_name: RefCell<String>,
}

impl RoleStore {
    /// Restore the role and display name persisted by a previous session.
    #[must_use]
    pub fn new(env: &SyncEnv) -> Self {
        let channel = env.channel.clone();
        let privileged = match channel.get(keys::IS_TEACHER) {
            Some(raw) => BoolCodec.decode(&raw).unwrap_or(false),
            None => false,
        };
        let teacher_name = match channel.get(keys::TEACHER_NAME) {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_TEACHER_NAME.to_owned(),
        };
        Self { gate: RoleGate::new(privileged), channel, teacher_name: RefCell::new(teacher_name) }
    }

    /// Shared gate handle for other stores.
    #[must_use]
    pub fn gate(&self) -> RoleGate {
        self.gate.clone()
    }

    #[must_use]
    pub fn is_privileged(&self) -> bool {
        self.gate.is_privileged()
    }

    /// Declare this context's role and persist it locally.
    pub fn set_role(&self, privileged: bool) {
        self.gate.set_privileged(privileged);
        if let Ok(Some(raw)) = BoolCodec.encode(&privileged) {
            self.channel.set(keys::IS_TEACHER, &raw);
        }
        info!(role = if privileged { "teacher" } else { "student" }, "role set");
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        self.teacher_name.borrow().clone()
    }

    /// Set the privileged display name. No-op unless privileged.
    pub fn set_display_name(&self, name: &str) {
        if !allowed(self.gate.require_privileged("set teacher name")) {
            return;
        }
        *self.teacher_name.borrow_mut() = name.to_owned();
        self.channel.set(keys::TEACHER_NAME, name);
    }

    /// Run `action` only when privileged; otherwise log and return `None`.
    pub fn privileged_only<T>(&self, action_name: &str, action: impl FnOnce() -> T) -> Option<T> {
        if allowed(self.gate.require_privileged(action_name)) { Some(action()) } else { None }
    }
}
