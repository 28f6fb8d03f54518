use super::*;

use crate::memory::MemoryStore;

fn channel() -> (MemoryStore, StorageChannel) {
    let store = MemoryStore::new();
    let ctx: Rc<dyn KeyValueStore> = store.context();
    (store.clone(), StorageChannel::new(ctx, "educode:sync:"))
}

#[test]
fn keys_are_prefixed() {
    let (store, channel) = channel();
    channel.set("focusMode", "true");
    assert_eq!(store.get_raw("educode:sync:focusMode").as_deref(), Some("true"));
    assert!(store.get_raw("focusMode").is_none());
    assert_eq!(channel.full_key("x"), "educode:sync:x");
}

#[test]
fn prefixes_isolate_channels() {
    let store = MemoryStore::new();
    let ctx: Rc<dyn KeyValueStore> = store.context();
    let a = StorageChannel::new(Rc::clone(&ctx), "a:");
    let b = StorageChannel::new(ctx, "b:");
    a.set("k", "1");
    assert!(b.get("k").is_none());
}

#[test]
fn remove_clears_key() {
    let (_store, channel) = channel();
    channel.set("k", "v");
    channel.remove("k");
    assert!(channel.get("k").is_none());
}

#[test]
fn get_json_falls_back_when_absent_empty_or_malformed() {
    let (_store, channel) = channel();
    assert_eq!(channel.get_json("list", vec![9]), vec![9]);
    channel.set("list", "");
    assert_eq!(channel.get_json("list", vec![9]), vec![9]);
    channel.set("list", "[1,");
    assert_eq!(channel.get_json("list", vec![9]), vec![9]);
}

#[test]
fn set_json_round_trips_through_get_json() {
    let (store, channel) = channel();
    channel.set_json("list", &[1, 2, 3]);
    assert_eq!(store.get_raw("educode:sync:list").as_deref(), Some("[1,2,3]"));
    assert_eq!(channel.get_json::<Vec<i32>>("list", Vec::new()), vec![1, 2, 3]);
}

#[test]
fn detached_channel_reads_nothing() {
    let channel = StorageChannel::detached("p:");
    channel.set("k", "v");
    assert!(channel.get("k").is_none());
    assert_eq!(channel.prefix(), "p:");
}

#[test]
fn student_key_format() {
    assert_eq!(student_key("student_abc123", "code"), "student:student_abc123:code");
}
