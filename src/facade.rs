//! Single entry point over every domain store.
//!
//! DESIGN
//! ======
//! [`SyncFacade`] builds the stores in dependency order (role, focus, lesson,
//! whiteboard, then the independent ones) and hands each one the shared
//! [`RoleGate`] and, where needed, the store it reads from. It adds no state
//! of its own: reads pass through and actions delegate.
//!
//! TEARDOWN
//! ========
//! Nothing stops on drop. Hosts call [`SyncFacade::stop_polling`] when the
//! context goes away; it clears every timer and listener the stores
//! registered and is safe to call twice.

#[cfg(test)]
#[path = "facade_test.rs"]
mod facade_test;

use std::rc::Rc;

use tracing::info;

use crate::role::{RoleGate, RoleStore};
use crate::stores::{ChatStore, CodeShareStore, FocusStore, LessonCatalog, LessonStore, RosterStore, WhiteboardStore};
use crate::synced::SyncEnv;
use crate::types::{ChatMessage, CursorPosition, PathsByStep, StrokeData, Student, WhiteboardPath};

pub struct SyncFacade {
    role: RoleStore,
    focus: FocusStore,
    lesson: LessonStore,
    whiteboard: WhiteboardStore,
    code_share: CodeShareStore,
    roster: RosterStore,
    chat: ChatStore,
}

impl SyncFacade {
    /// Facade over the default lesson catalogue.
    #[must_use]
    pub fn new(env: &SyncEnv) -> Self {
        Self::with_catalog(env, LessonCatalog::default())
    }

    #[must_use]
    pub fn with_catalog(env: &SyncEnv, catalog: LessonCatalog) -> Self {
        let role = RoleStore::new(env);
        let gate = role.gate();
        let focus = FocusStore::new(env, &gate);
        let lesson = LessonStore::new(env, &gate, &focus, Rc::new(catalog));
        let whiteboard = WhiteboardStore::new(env, &gate, &lesson);
        let code_share = CodeShareStore::new(env, &gate);
        let roster = RosterStore::new(env, &gate);
        let chat = ChatStore::new(env);
        info!(prefix = %env.config.prefix, privileged = gate.is_privileged(), "sync facade ready");
        Self { role, focus, lesson, whiteboard, code_share, roster, chat }
    }

    // =========================================================================
    // STORES
    // =========================================================================

    #[must_use]
    pub fn role(&self) -> &RoleStore {
        &self.role
    }

    #[must_use]
    pub fn gate(&self) -> RoleGate {
        self.role.gate()
    }

    #[must_use]
    pub fn focus(&self) -> &FocusStore {
        &self.focus
    }

    #[must_use]
    pub fn lesson(&self) -> &LessonStore {
        &self.lesson
    }

    #[must_use]
    pub fn whiteboard(&self) -> &WhiteboardStore {
        &self.whiteboard
    }

    #[must_use]
    pub fn code_share(&self) -> &CodeShareStore {
        &self.code_share
    }

    #[must_use]
    pub fn roster(&self) -> &RosterStore {
        &self.roster
    }

    #[must_use]
    pub fn chat(&self) -> &ChatStore {
        &self.chat
    }

    // =========================================================================
    // ROLE
    // =========================================================================

    #[must_use]
    pub fn is_teacher(&self) -> bool {
        self.role.is_privileged()
    }

    pub fn set_teacher_role(&self, privileged: bool) {
        self.role.set_role(privileged);
    }

    #[must_use]
    pub fn teacher_name(&self) -> String {
        self.role.display_name()
    }

    pub fn set_teacher_name(&self, name: &str) {
        self.role.set_display_name(name);
    }

    // =========================================================================
    // FOCUS / LAYOUT
    // =========================================================================

    #[must_use]
    pub fn focus_mode(&self) -> bool {
        self.focus.focus_mode()
    }

    pub fn toggle_focus_mode(&self) {
        self.focus.toggle_focus_mode();
    }

    pub fn set_focus_mode(&self, value: bool) {
        self.focus.set_focus_mode(value);
    }

    #[must_use]
    pub fn split_percent(&self) -> f64 {
        self.focus.split_percent()
    }

    pub fn set_split_percent(&self, value: f64) {
        self.focus.set_split_percent(value);
    }

    #[must_use]
    pub fn content_scroll_position(&self) -> f64 {
        self.focus.content_scroll_position()
    }

    pub fn set_content_scroll_position(&self, value: f64) {
        self.focus.set_content_scroll_position(value);
    }

    #[must_use]
    pub fn content_pane_width(&self) -> f64 {
        self.focus.content_pane_width()
    }

    pub fn set_content_pane_width(&self, value: f64) {
        self.focus.set_content_pane_width(value);
    }

    // =========================================================================
    // CODE SHARE
    // =========================================================================

    #[must_use]
    pub fn share_code_editor(&self) -> bool {
        self.code_share.share_enabled()
    }

    pub fn toggle_share_code(&self) {
        self.code_share.toggle_share_code();
    }

    pub fn set_share_code_editor(&self, value: bool) {
        self.code_share.set_share_enabled(value);
    }

    #[must_use]
    pub fn shared_code_content(&self) -> String {
        self.code_share.shared_code()
    }

    pub fn set_shared_code_content(&self, code: &str) {
        self.code_share.set_shared_code(code);
    }

    #[must_use]
    pub fn shared_student_id(&self) -> String {
        self.code_share.shared_student_id()
    }

    #[must_use]
    pub fn shared_student_name(&self) -> String {
        self.code_share.shared_student_name()
    }

    #[must_use]
    pub fn shared_student_code(&self) -> String {
        self.code_share.shared_student_code()
    }

    /// Pull the student's latest code from the roster and share it.
    pub fn share_student_code(&self, student_id: &str, student_name: &str) {
        let code = self.roster.code(student_id);
        self.code_share.share_student_code(student_id, student_name, &code);
    }

    pub fn clear_shared_student_code(&self) {
        self.code_share.clear_shared_student_code();
    }

    #[must_use]
    pub fn teacher_cursor_position(&self) -> Option<CursorPosition> {
        self.code_share.teacher_cursor()
    }

    pub fn set_teacher_cursor_position(&self, position: Option<CursorPosition>) {
        self.code_share.set_teacher_cursor(position);
    }

    /// Teacher cursor read straight from storage.
    #[must_use]
    pub fn teacher_cursor_from_storage(&self) -> Option<CursorPosition> {
        self.code_share.teacher_cursor_from_storage()
    }

    // =========================================================================
    // LESSON
    // =========================================================================

    #[must_use]
    pub fn current_lesson_step(&self) -> i64 {
        self.lesson.current_step()
    }

    pub fn set_current_lesson_step(&self, step: i64) {
        self.lesson.set_current_step(step);
    }

    #[must_use]
    pub fn total_steps(&self) -> i64 {
        self.lesson.total_steps()
    }

    pub fn next_step(&self) {
        self.lesson.next_step();
    }

    pub fn prev_step(&self) {
        self.lesson.prev_step();
    }

    pub fn go_to_step(&self, step: i64) {
        self.lesson.go_to_step(step);
    }

    #[must_use]
    pub fn lesson_code(&self) -> String {
        self.lesson.code_content()
    }

    pub fn set_lesson_code(&self, code: &str) {
        self.lesson.set_code_content(code);
    }

    // =========================================================================
    // ROSTER
    // =========================================================================

    #[must_use]
    pub fn students(&self) -> Vec<Student> {
        self.roster.students()
    }

    pub fn register_student(&self, id: &str, name: &str) {
        self.roster.register_student(id, name);
    }

    pub fn save_student_code(&self, student_id: &str, code: &str) {
        self.roster.save_code(student_id, code);
    }

    #[must_use]
    pub fn student_code(&self, student_id: &str) -> String {
        self.roster.code(student_id)
    }

    pub fn save_student_cursor(&self, student_id: &str, position: Option<CursorPosition>) {
        self.roster.save_cursor(student_id, position);
    }

    #[must_use]
    pub fn student_cursor(&self, student_id: &str) -> Option<CursorPosition> {
        self.roster.cursor(student_id)
    }

    // =========================================================================
    // WHITEBOARD
    // =========================================================================

    /// Strokes for the current lesson step.
    #[must_use]
    pub fn whiteboard_paths(&self) -> Vec<WhiteboardPath> {
        self.whiteboard.paths()
    }

    #[must_use]
    pub fn whiteboard_paths_by_step(&self) -> PathsByStep {
        self.whiteboard.paths_by_step()
    }

    pub fn add_whiteboard_path(&self, stroke: StrokeData) -> Option<WhiteboardPath> {
        self.whiteboard.add_path(stroke)
    }

    pub fn remove_whiteboard_path(&self, path_id: &str) {
        self.whiteboard.remove_path(path_id);
    }

    pub fn clear_whiteboard_paths(&self) {
        self.whiteboard.clear_paths();
    }

    pub fn clear_all_whiteboard_paths(&self) {
        self.whiteboard.clear_all_paths();
    }

    #[must_use]
    pub fn is_whiteboard_active(&self) -> bool {
        self.whiteboard.is_active()
    }

    pub fn set_whiteboard_active(&self, active: bool) {
        self.whiteboard.set_active(active);
    }

    #[must_use]
    pub fn current_drawing_path(&self) -> Option<StrokeData> {
        self.whiteboard.current_drawing_path()
    }

    pub fn update_current_drawing_path(&self, stroke: Option<StrokeData>) {
        self.whiteboard.update_current_drawing_path(stroke);
    }

    // =========================================================================
    // CHAT
    // =========================================================================

    #[must_use]
    pub fn chat_messages(&self) -> Vec<ChatMessage> {
        self.chat.messages()
    }

    pub fn send_message(&self, sender: &str, sender_id: &str, message: &str, is_teacher: bool) -> ChatMessage {
        self.chat.send_message(sender, sender_id, message, is_teacher)
    }

    pub fn clear_messages(&self) {
        self.chat.clear_messages();
    }

    #[must_use]
    pub fn recent_messages(&self, count: usize) -> Vec<ChatMessage> {
        self.chat.recent_messages(count)
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Clear every timer and listener registered by the stores.
    pub fn stop_polling(&self) {
        self.focus.stop_polling();
        self.lesson.stop_polling();
        self.whiteboard.stop_polling();
        self.code_share.stop_polling();
        self.roster.stop_polling();
        self.chat.stop_polling();
        info!("sync facade stopped");
    }
}
