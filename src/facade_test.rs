use super::*;

use std::time::Duration;

use crate::config::SyncConfig;
use crate::memory::{MemoryContext, MemoryStore};
use crate::types::{CursorPosition, PathPoint};

const TICK: Duration = Duration::from_millis(300);

fn facade(ctx: &Rc<MemoryContext>, privileged: bool) -> SyncFacade {
    let facade = SyncFacade::new(&SyncEnv::for_context(ctx, SyncConfig::default()));
    facade.set_teacher_role(privileged);
    facade
}

fn stroke() -> StrokeData {
    StrokeData { points: vec![PathPoint { x: 1.0, y: 1.0 }], color: "#000".into(), width: 1.0, scroll_y: 0.0 }
}

#[test]
fn role_is_set_per_context() {
    let memory = MemoryStore::new();
    let teacher = facade(&memory.context(), true);
    let student = facade(&memory.context(), false);
    assert!(teacher.is_teacher());
    assert!(!student.is_teacher());
    assert!(teacher.gate().is_privileged());
}

#[test]
fn share_student_code_pulls_from_roster() {
    let memory = MemoryStore::new();
    let (tc, sc) = (memory.context(), memory.context());
    let teacher = facade(&tc, true);
    let student = facade(&sc, false);

    student.register_student("s1", "홍길동");
    student.save_student_code("s1", "int x = 3;");
    teacher.share_student_code("s1", "홍길동");

    assert_eq!(teacher.shared_student_code(), "int x = 3;");
    sc.advance(TICK);
    assert_eq!(student.shared_student_id(), "s1");
    assert_eq!(student.shared_student_name(), "홍길동");
    assert_eq!(student.shared_student_code(), "int x = 3;");

    teacher.clear_shared_student_code();
    sc.advance(TICK);
    assert!(student.shared_student_code().is_empty());
}

#[test]
fn student_actions_are_rejected_for_teacher_state() {
    let memory = MemoryStore::new();
    let (tc, sc) = (memory.context(), memory.context());
    let teacher = facade(&tc, true);
    let student = facade(&sc, false);

    student.toggle_focus_mode();
    student.set_split_percent(90.0);
    student.set_teacher_name("x");
    student.set_shared_code_content("x");
    student.set_share_code_editor(false);
    student.set_teacher_cursor_position(Some(CursorPosition { line: 1, column: 1 }));
    student.set_current_lesson_step(3);
    student.set_whiteboard_active(true);
    assert!(student.add_whiteboard_path(stroke()).is_none());

    tc.advance(TICK);
    assert!(!teacher.focus_mode());
    assert_eq!(teacher.split_percent(), 40.0);
    assert_eq!(teacher.teacher_name(), "교사");
    assert!(teacher.shared_code_content().is_empty());
    assert!(teacher.share_code_editor());
    assert!(teacher.teacher_cursor_from_storage().is_none());
    assert_eq!(teacher.current_lesson_step(), 0);
    assert!(!teacher.is_whiteboard_active());
}

#[test]
fn teacher_state_reaches_student_within_one_interval() {
    let memory = MemoryStore::new();
    let (tc, sc) = (memory.context(), memory.context());
    let teacher = facade(&tc, true);
    let student = facade(&sc, false);

    teacher.set_focus_mode(true);
    teacher.set_split_percent(60.0);
    teacher.set_content_scroll_position(200.0);
    teacher.set_content_pane_width(500.0);
    teacher.set_shared_code_content("class Main {}");
    teacher.set_teacher_cursor_position(Some(CursorPosition { line: 2, column: 3 }));
    teacher.go_to_step(2);
    teacher.set_whiteboard_active(true);
    teacher.add_whiteboard_path(stroke());
    teacher.update_current_drawing_path(Some(stroke()));
    sc.advance(TICK);

    assert!(student.focus_mode());
    assert_eq!(student.split_percent(), 60.0);
    assert_eq!(student.content_scroll_position(), 200.0);
    assert_eq!(student.content_pane_width(), 500.0);
    assert_eq!(student.shared_code_content(), "class Main {}");
    assert_eq!(student.teacher_cursor_position(), Some(CursorPosition { line: 2, column: 3 }));
    assert_eq!(student.current_lesson_step(), 2);
    assert!(student.is_whiteboard_active());
    assert_eq!(student.whiteboard_paths().len(), 1);
    assert!(student.current_drawing_path().is_some());
    assert_eq!(student.whiteboard_paths_by_step().len(), 1);
}

#[test]
fn lesson_navigation_through_facade() {
    let memory = MemoryStore::new();
    let teacher = facade(&memory.context(), true);
    assert_eq!(teacher.total_steps(), 5);
    teacher.prev_step();
    assert_eq!(teacher.current_lesson_step(), 0);
    teacher.next_step();
    teacher.next_step();
    assert_eq!(teacher.current_lesson_step(), 2);
    assert!(teacher.lesson_code().contains("age"));
    teacher.set_lesson_code("done");
    assert_eq!(teacher.lesson_code(), "done");
}

#[test]
fn roster_and_cursor_through_facade() {
    let memory = MemoryStore::new();
    let (tc, sc) = (memory.context(), memory.context());
    let teacher = facade(&tc, true);
    let student = facade(&sc, false);

    student.register_student("s1", "A");
    student.register_student("s1", "B");
    student.save_student_cursor("s1", Some(CursorPosition { line: 7, column: 2 }));
    tc.advance(TICK);

    assert_eq!(teacher.students().len(), 1);
    assert_eq!(teacher.students()[0].name, "A");
    assert_eq!(teacher.student_cursor("s1"), Some(CursorPosition { line: 7, column: 2 }));
    assert_eq!(teacher.student_code("s1"), "");
}

#[test]
fn whiteboard_clear_operations_through_facade() {
    let memory = MemoryStore::new();
    let teacher = facade(&memory.context(), true);
    let path = teacher.add_whiteboard_path(stroke()).unwrap();
    teacher.remove_whiteboard_path(&path.id);
    assert!(teacher.whiteboard_paths().is_empty());
    teacher.add_whiteboard_path(stroke());
    teacher.clear_whiteboard_paths();
    assert!(teacher.whiteboard_paths().is_empty());
    teacher.add_whiteboard_path(stroke());
    teacher.clear_all_whiteboard_paths();
    assert!(teacher.whiteboard_paths_by_step().is_empty());
}

#[test]
fn chat_through_facade() {
    let memory = MemoryStore::new();
    let (tc, sc) = (memory.context(), memory.context());
    let teacher = facade(&tc, true);
    let student = facade(&sc, false);
    teacher.send_message(&teacher.teacher_name(), "teacher", "시작합니다", true);
    sc.advance(TICK);
    assert_eq!(student.chat_messages().len(), 1);
    assert_eq!(student.recent_messages(1)[0].sender, "교사");
    student.clear_messages();
    tc.advance(TICK);
    assert!(teacher.chat_messages().is_empty());
}

#[test]
fn stop_polling_leaves_no_timers_or_listeners() {
    let ctx = MemoryStore::new().context();
    let facade = facade(&ctx, false);
    assert!(ctx.active_timers() > 0);
    facade.stop_polling();
    assert_eq!(ctx.active_timers(), 0);
    assert_eq!(ctx.active_subscriptions(), 0);
    facade.stop_polling();
    assert_eq!(ctx.active_timers(), 0);
}

#[test]
fn stopped_facade_keeps_last_values() {
    let memory = MemoryStore::new();
    let (tc, sc) = (memory.context(), memory.context());
    let teacher = facade(&tc, true);
    let student = facade(&sc, false);
    student.stop_polling();
    teacher.set_focus_mode(true);
    sc.advance(TICK * 3);
    assert!(!student.focus_mode());
}

#[test]
fn detached_facade_works_without_storage() {
    let facade = SyncFacade::new(&SyncEnv::detached(SyncConfig::default()));
    facade.set_teacher_role(true);
    facade.set_focus_mode(true);
    assert!(facade.focus_mode());
    assert!(facade.add_whiteboard_path(stroke()).is_some());
    facade.stop_polling();
}
