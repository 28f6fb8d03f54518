//! A short classroom session over the in-memory store: one teacher tab, one
//! student tab, a few lesson steps.
//!
//! Logs go to stdout through `tracing-subscriber`. Set
//! `CLASSROOM_SYNC_POLL_MS` to change the polling interval.

use std::time::Duration;

use classroom_sync::types::{PathPoint, StrokeData};
use classroom_sync::{MemoryStore, StudentSession, SyncConfig, SyncEnv, SyncFacade};

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let config = SyncConfig::from_env();
    let tick = config.poll_interval;
    let store = MemoryStore::new();

    let teacher_ctx = store.context();
    let teacher = SyncFacade::new(&SyncEnv::for_context(&teacher_ctx, config.clone()));
    teacher.set_teacher_role(true);

    let student_ctx = store.context();
    let student = SyncFacade::new(&SyncEnv::for_context(&student_ctx, config));
    student.set_teacher_role(false);

    let session = StudentSession::from_query("");
    student.register_student(&session.id, &session.name);
    println!("student joined as {} ({}), url: ?{}", session.name, session.id, session.to_query());

    teacher.set_focus_mode(true);
    let mut y = 0.0;
    for _ in 1..teacher.total_steps() {
        teacher.next_step();
        y += 10.0;
        teacher.add_whiteboard_path(StrokeData {
            points: vec![PathPoint { x: 0.0, y: 0.0 }, PathPoint { x: 40.0, y }],
            color: "#e53935".into(),
            width: 3.0,
            scroll_y: 0.0,
        });
        student_ctx.advance(tick);
        teacher_ctx.advance(tick);
        println!(
            "step {}: student sees step {} with {} stroke(s), {} student(s) on roster",
            teacher.current_lesson_step(),
            student.current_lesson_step(),
            student.whiteboard_paths().len(),
            teacher.students().len(),
        );
    }

    student.save_student_code(&session.id, "for (int i = 1; i <= 10; i++) System.out.println(i);");
    teacher.share_student_code(&session.id, &session.name);
    student.send_message(&session.name, &session.id, "다 했어요!", false);
    student_ctx.advance(tick);
    teacher_ctx.advance(tick + Duration::from_millis(1));

    println!("shared code from {}: {}", student.shared_student_name(), student.shared_student_code());
    for message in teacher.recent_messages(10) {
        println!("[chat] {}: {}", message.sender, message.message);
    }

    teacher.stop_polling();
    student.stop_polling();
    println!(
        "timers left: teacher {}, student {}",
        teacher_ctx.active_timers(),
        student_ctx.active_timers()
    );
}
