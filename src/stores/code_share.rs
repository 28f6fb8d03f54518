//! Teacher code sharing, the mirrored student-code triple, and the teacher cursor.
//!
//! DESIGN
//! ======
//! Every value here is teacher-writable and continuously mirrored by
//! students. [`CodeShareStore::share_student_code`] writes the id/name/code
//! triple as three sequential key writes; there is no cross-key transaction,
//! so a student polling mid-way can briefly see a mixed triple. The next
//! poll repairs it.

#[cfg(test)]
#[path = "code_share_test.rs"]
mod code_share_test;

use tracing::info;

use crate::channel::StorageChannel;
use crate::codec::{BoolCodec, OptionalJsonCodec, TextCodec};
use crate::keys;
use crate::role::{RoleGate, allowed};
use crate::synced::{SyncEnv, SyncedValue, WritePolicy};
use crate::types::CursorPosition;

pub struct CodeShareStore {
    gate: RoleGate,
    channel: StorageChannel,
    share_enabled: SyncedValue<bool>,
    shared_code: SyncedValue<String>,
    shared_student_id: SyncedValue<String>,
    shared_student_name: SyncedValue<String>,
    shared_student_code: SyncedValue<String>,
    teacher_cursor: SyncedValue<Option<CursorPosition>>,
}

impl CodeShareStore {
    #[must_use]
    pub fn new(env: &SyncEnv, gate: &RoleGate) -> Self {
        let policy = || WritePolicy::Privileged(gate.clone());
        let options = env.options();
        let text = |key: &str| SyncedValue::new(env, key, String::new(), TextCodec, policy(), options);
        Self {
            gate: gate.clone(),
            channel: env.channel.clone(),
            share_enabled: SyncedValue::new(env, keys::SHARE_CODE_EDITOR, true, BoolCodec, policy(), options),
            shared_code: text(keys::CODE_CONTENT),
            shared_student_id: text(keys::SHARED_STUDENT_ID),
            shared_student_name: text(keys::SHARED_STUDENT_NAME),
            shared_student_code: text(keys::SHARED_STUDENT_CODE),
            teacher_cursor: SyncedValue::new(
                env,
                keys::TEACHER_CURSOR,
                None,
                OptionalJsonCodec::new(),
                policy(),
                options,
            ),
        }
    }

    #[must_use]
    pub fn share_enabled(&self) -> bool {
        self.share_enabled.read()
    }

    #[must_use]
    pub fn shared_code(&self) -> String {
        self.shared_code.read()
    }

    #[must_use]
    pub fn shared_student_id(&self) -> String {
        self.shared_student_id.read()
    }

    #[must_use]
    pub fn shared_student_name(&self) -> String {
        self.shared_student_name.read()
    }

    #[must_use]
    pub fn shared_student_code(&self) -> String {
        self.shared_student_code.read()
    }

    /// Mirrored teacher cursor.
    #[must_use]
    pub fn teacher_cursor(&self) -> Option<CursorPosition> {
        self.teacher_cursor.read()
    }

    /// Teacher cursor read straight from storage, bypassing the mirror.
    #[must_use]
    pub fn teacher_cursor_from_storage(&self) -> Option<CursorPosition> {
        self.channel.get_json(keys::TEACHER_CURSOR, None)
    }

    pub fn toggle_share_code(&self) {
        self.share_enabled.write(!self.share_enabled.read());
    }

    pub fn set_share_enabled(&self, value: bool) {
        self.share_enabled.write(value);
    }

    pub fn set_shared_code(&self, code: &str) {
        self.shared_code.write(code.to_owned());
    }

    /// Mirror one student's code into the shared view.
    pub fn share_student_code(&self, student_id: &str, student_name: &str, code: &str) {
        if !allowed(self.gate.require_privileged("share student code")) {
            return;
        }
        self.shared_student_id.write(student_id.to_owned());
        self.shared_student_name.write(student_name.to_owned());
        self.shared_student_code.write(code.to_owned());
        info!(student_id, student_name, "sharing student code");
    }

    pub fn clear_shared_student_code(&self) {
        if !allowed(self.gate.require_privileged("clear shared student code")) {
            return;
        }
        self.shared_student_id.write(String::new());
        self.shared_student_name.write(String::new());
        self.shared_student_code.write(String::new());
        info!("cleared shared student code");
    }

    pub fn set_teacher_cursor(&self, position: Option<CursorPosition>) {
        self.teacher_cursor.write(position);
    }

    pub fn stop_polling(&self) {
        self.share_enabled.stop();
        self.shared_code.stop();
        self.shared_student_id.stop();
        self.shared_student_name.stop();
        self.shared_student_code.stop();
        self.teacher_cursor.stop();
    }
}
