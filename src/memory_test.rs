use super::*;

use std::cell::RefCell;
use std::rc::Rc;

fn recorder(ctx: &MemoryContext) -> Rc<RefCell<Vec<StorageEvent>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    ctx.subscribe(Box::new(move |event: &StorageEvent| sink.borrow_mut().push(event.clone())));
    seen
}

// =============================================================
// Store
// =============================================================

#[test]
fn contexts_share_one_map() {
    let store = MemoryStore::new();
    let a = store.context();
    let b = store.context();
    a.set_item("k", "v");
    assert_eq!(b.get_item("k").as_deref(), Some("v"));
    assert_eq!(store.get_raw("k").as_deref(), Some("v"));
    assert_eq!(store.len(), 1);
}

#[test]
fn remove_item_deletes_key() {
    let store = MemoryStore::new();
    let a = store.context();
    a.set_item("k", "v");
    a.remove_item("k");
    assert!(a.get_item("k").is_none());
    assert!(store.is_empty());
}

// =============================================================
// Events
// =============================================================

#[test]
fn write_notifies_other_contexts_only() {
    let store = MemoryStore::new();
    let a = store.context();
    let b = store.context();
    let seen_a = recorder(&a);
    let seen_b = recorder(&b);

    a.set_item("k", "v");
    assert_eq!(a.pending_events(), 0);
    assert_eq!(b.pending_events(), 1);

    assert_eq!(a.deliver_pending(), 0);
    assert_eq!(b.deliver_pending(), 1);
    assert!(seen_a.borrow().is_empty());
    assert_eq!(
        *seen_b.borrow(),
        vec![StorageEvent { key: Some("k".into()), new_value: Some("v".into()) }]
    );
}

#[test]
fn events_wait_for_next_turn() {
    let store = MemoryStore::new();
    let a = store.context();
    let b = store.context();
    let seen = recorder(&b);
    a.set_item("k", "v");
    assert!(seen.borrow().is_empty());
    b.advance(Duration::ZERO);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn unchanged_write_produces_no_event() {
    let store = MemoryStore::new();
    let a = store.context();
    let b = store.context();
    a.set_item("k", "v");
    b.deliver_pending();
    a.set_item("k", "v");
    assert_eq!(b.pending_events(), 0);
}

#[test]
fn removal_event_has_no_new_value() {
    let store = MemoryStore::new();
    let a = store.context();
    let b = store.context();
    let seen = recorder(&b);
    a.set_item("k", "v");
    a.remove_item("k");
    b.deliver_pending();
    assert_eq!(seen.borrow()[1].new_value, None);
}

#[test]
fn raw_writes_notify_every_context() {
    let store = MemoryStore::new();
    let a = store.context();
    let b = store.context();
    store.set_raw("k", "v");
    assert_eq!(a.pending_events(), 1);
    assert_eq!(b.pending_events(), 1);
}

#[test]
fn unsubscribed_handler_is_not_called() {
    let store = MemoryStore::new();
    let a = store.context();
    let b = store.context();
    let calls = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&calls);
    let id = b
        .subscribe(Box::new(move |_event: &StorageEvent| *sink.borrow_mut() += 1))
        .unwrap();
    b.unsubscribe(id);
    a.set_item("k", "v");
    b.deliver_pending();
    assert_eq!(*calls.borrow(), 0);
    assert_eq!(b.active_subscriptions(), 0);
}

// =============================================================
// Timers
// =============================================================

#[test]
fn interval_fires_once_per_period() {
    let ctx = MemoryStore::new().context();
    let ticks = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&ticks);
    ctx.set_interval(Duration::from_millis(300), Box::new(move || *sink.borrow_mut() += 1));

    ctx.advance(Duration::from_millis(299));
    assert_eq!(*ticks.borrow(), 0);
    ctx.advance(Duration::from_millis(1));
    assert_eq!(*ticks.borrow(), 1);
    ctx.advance(Duration::from_millis(900));
    assert_eq!(*ticks.borrow(), 4);
}

#[test]
fn clock_advances_with_time() {
    let ctx = MemoryStore::new().context();
    assert_eq!(ctx.now_ms(), FAKE_EPOCH_MS);
    ctx.advance(Duration::from_millis(1500));
    assert_eq!(ctx.now_ms(), FAKE_EPOCH_MS + 1500);
}

#[test]
fn clock_saturates_instead_of_overflowing() {
    let ctx = MemoryStore::new().context();
    ctx.advance(Duration::MAX);
    assert_eq!(ctx.now_ms(), i64::MAX);
    ctx.advance(Duration::from_millis(1));
    assert_eq!(ctx.now_ms(), i64::MAX);

    let ticks = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&ticks);
    ctx.set_interval(Duration::from_millis(300), Box::new(move || *sink.borrow_mut() += 1));
    ctx.advance(Duration::MAX);
    assert_eq!(*ticks.borrow(), 0);
}

#[test]
fn timers_fire_in_registration_order_on_ties() {
    let ctx = MemoryStore::new().context();
    let order = Rc::new(RefCell::new(Vec::new()));
    for label in ["first", "second", "third"] {
        let sink = Rc::clone(&order);
        ctx.set_interval(Duration::from_millis(100), Box::new(move || sink.borrow_mut().push(label)));
    }
    ctx.advance(Duration::from_millis(100));
    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn cleared_interval_stops_firing() {
    let ctx = MemoryStore::new().context();
    let ticks = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&ticks);
    let id = ctx
        .set_interval(Duration::from_millis(10), Box::new(move || *sink.borrow_mut() += 1))
        .unwrap();
    ctx.advance(Duration::from_millis(10));
    ctx.clear_interval(id);
    ctx.advance(Duration::from_millis(100));
    assert_eq!(*ticks.borrow(), 1);
    assert_eq!(ctx.active_timers(), 0);
}

#[test]
fn tick_may_clear_its_own_timer() {
    let ctx = MemoryStore::new().context();
    let handle: Rc<RefCell<Option<TimerId>>> = Rc::new(RefCell::new(None));
    let ticks = Rc::new(RefCell::new(0));
    let (weak_ctx, handle_in, sink) = (Rc::downgrade(&ctx), Rc::clone(&handle), Rc::clone(&ticks));
    let id = ctx.set_interval(
        Duration::from_millis(10),
        Box::new(move || {
            *sink.borrow_mut() += 1;
            if let (Some(ctx), Some(id)) = (weak_ctx.upgrade(), *handle_in.borrow()) {
                ctx.clear_interval(id);
            }
        }),
    );
    *handle.borrow_mut() = id;
    ctx.advance(Duration::from_millis(100));
    assert_eq!(*ticks.borrow(), 1);
}
