//! Student roster plus per-student code and cursor.
//!
//! The roster list is open to every role: registration happens before a
//! role is settled. Code and cursor live under derived keys
//! (`student:<id>:code`, `student:<id>:cursor`) so a student's edits never
//! rewrite the shared list. Only the student side writes them; anyone reads.

#[cfg(test)]
#[path = "roster_test.rs"]
mod roster_test;

use tracing::debug;

use crate::channel::{StorageChannel, student_key};
use crate::codec::JsonCodec;
use crate::keys;
use crate::role::{RoleGate, allowed};
use crate::synced::{SyncEnv, SyncedValue, WritePolicy};
use crate::types::{CursorPosition, Student};

pub struct RosterStore {
    gate: RoleGate,
    channel: StorageChannel,
    students: SyncedValue<Vec<Student>>,
}

impl RosterStore {
    #[must_use]
    pub fn new(env: &SyncEnv, gate: &RoleGate) -> Self {
        Self {
            gate: gate.clone(),
            channel: env.channel.clone(),
            students: SyncedValue::new(
                env,
                keys::STUDENTS,
                Vec::new(),
                JsonCodec::new(),
                WritePolicy::Open,
                env.options(),
            ),
        }
    }

    #[must_use]
    pub fn students(&self) -> Vec<Student> {
        self.students.read()
    }

    #[must_use]
    pub fn student(&self, id: &str) -> Option<Student> {
        self.students.with(|list| list.iter().find(|s| s.id == id).cloned())
    }

    /// Append a student unless one with `id` is already registered. The
    /// list is re-read first so a registration from another context that
    /// has not been polled yet is not overwritten.
    pub fn register_student(&self, id: &str, name: &str) {
        self.students.poll_now();
        if self.student(id).is_some() {
            debug!(student_id = id, "student already registered");
            return;
        }
        let student = Student { id: id.to_owned(), name: name.to_owned() };
        if self.students.update(|list| list.push(student)) {
            debug!(student_id = id, student_name = name, "student registered");
        }
    }

    pub fn save_code(&self, student_id: &str, code: &str) {
        if !allowed(self.gate.require_unprivileged("save student code")) {
            return;
        }
        self.channel.set(&student_key(student_id, keys::STUDENT_CODE_SUFFIX), code);
    }

    /// Stored code for `student_id`, or empty.
    #[must_use]
    pub fn code(&self, student_id: &str) -> String {
        self.channel
            .get(&student_key(student_id, keys::STUDENT_CODE_SUFFIX))
            .unwrap_or_default()
    }

    pub fn save_cursor(&self, student_id: &str, position: Option<CursorPosition>) {
        if !allowed(self.gate.require_unprivileged("save student cursor")) {
            return;
        }
        let key = student_key(student_id, keys::STUDENT_CURSOR_SUFFIX);
        match position {
            Some(position) => self.channel.set_json(&key, &position),
            None => self.channel.remove(&key),
        }
    }

    #[must_use]
    pub fn cursor(&self, student_id: &str) -> Option<CursorPosition> {
        self.channel
            .get_json(&student_key(student_id, keys::STUDENT_CURSOR_SUFFIX), None)
    }

    pub fn stop_polling(&self) {
        self.students.stop();
    }
}
