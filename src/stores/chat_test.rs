use super::*;

use std::collections::HashSet;
use std::time::Duration;

use crate::config::SyncConfig;
use crate::memory::{FAKE_EPOCH_MS, MemoryContext, MemoryStore};

const TICK: Duration = Duration::from_millis(300);

fn chat(ctx: &Rc<MemoryContext>) -> ChatStore {
    ChatStore::new(&SyncEnv::for_context(ctx, SyncConfig::default()))
}

#[test]
fn send_appends_stamped_message() {
    let store = chat(&MemoryStore::new().context());
    let msg = store.send_message("홍길동", "s1", "안녕하세요", false);
    assert!(msg.id.starts_with(&format!("msg_{FAKE_EPOCH_MS}_")));
    assert_eq!(msg.timestamp, FAKE_EPOCH_MS);
    assert!(!msg.is_teacher);
    assert_eq!(store.messages(), vec![msg]);
}

#[test]
fn messages_keep_send_order_with_distinct_ids() {
    let store = chat(&MemoryStore::new().context());
    for i in 0..10 {
        store.send_message("교사", "teacher", &format!("m{i}"), true);
    }
    let messages = store.messages();
    let bodies: Vec<&str> = messages.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(bodies, (0..10).map(|i| format!("m{i}")).collect::<Vec<_>>());
    let ids: HashSet<&str> = messages.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.len(), 10);
}

#[test]
fn recent_messages_returns_tail() {
    let store = chat(&MemoryStore::new().context());
    for i in 0..60 {
        store.send_message("a", "a", &i.to_string(), false);
    }
    let recent = store.recent_messages(3);
    assert_eq!(recent.iter().map(|m| m.message.as_str()).collect::<Vec<_>>(), vec!["57", "58", "59"]);
    assert_eq!(store.recent_messages_default().len(), DEFAULT_RECENT_COUNT);
    assert_eq!(store.recent_messages_default()[0].message, "10");
    assert_eq!(store.recent_messages(500).len(), 60);
}

#[test]
fn zero_recent_count_yields_no_messages() {
    let store = chat(&MemoryStore::new().context());
    store.send_message("a", "a", "hi", false);
    assert!(store.recent_messages(0).is_empty());
    assert_eq!(store.recent_messages(1).len(), 1);
}

#[test]
fn both_contexts_see_interleaved_messages() {
    let memory = MemoryStore::new();
    let (a, b) = (memory.context(), memory.context());
    let teacher = chat(&a);
    let student = chat(&b);

    teacher.send_message("교사", "teacher", "hello", true);
    student.send_message("홍길동", "s1", "hi", false);
    a.advance(TICK);
    b.advance(TICK);

    for side in [&teacher, &student] {
        let bodies: Vec<String> = side.messages().into_iter().map(|m| m.message).collect();
        assert_eq!(bodies, vec!["hello", "hi"]);
    }
}

#[test]
fn clear_is_open_to_any_role() {
    let memory = MemoryStore::new();
    let (a, b) = (memory.context(), memory.context());
    let first = chat(&a);
    let second = chat(&b);
    first.send_message("a", "a", "x", false);
    second.clear_messages();
    a.advance(TICK);
    assert!(first.messages().is_empty());
    assert_eq!(memory.get_raw("educode:sync:chatMessages").as_deref(), Some("[]"));
}

#[test]
fn refresh_reads_storage_without_waiting() {
    let memory = MemoryStore::new();
    let (a, b) = (memory.context(), memory.context());
    let sender = chat(&a);
    let reader = chat(&b);
    sender.send_message("a", "a", "now", false);
    assert!(reader.messages().is_empty());
    reader.refresh_messages();
    assert_eq!(reader.messages().len(), 1);
}

#[test]
fn stop_polling_clears_timer() {
    let ctx = MemoryStore::new().context();
    let store = chat(&ctx);
    store.stop_polling();
    assert_eq!(ctx.active_timers(), 0);
}
