//! Integration tests for tracing and event monitoring.
//!
//! This test demonstrates how to use the tracing callback system to monitor
//! registry operations, which is useful for debugging and logging.
//!
//! NOTE: Tests using the process-wide callback use #[serial] because the callback slot
//! is shared by every global registry.

use live_collection::{define_collection, global, ConstView, Item, Manager, RegistryEvent};
use parking_lot::Mutex;
use serial_test::serial;
use std::sync::Arc;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&RegistryEvent) + Send + Sync + 'static) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    (events, move |event: &RegistryEvent| {
        sink.lock().push(event.to_string())
    })
}

#[test]
fn test_basic_tracing() {
    init_logging();
    define_collection!(traced1);

    let (events, callback) = recorder();
    traced1::set_trace_callback(callback);

    let item = traced1::item(42i32);
    let _ = traced1::const_view::<i32>().iter().count();
    drop(item);

    let captured = events.lock();
    assert_eq!(
        *captured,
        vec![
            "add { type_name: i32, inserted: true }",
            "iterate { type_name: i32, len: 1 }",
            "remove { type_name: i32, removed: true }",
        ]
    );
}

#[test]
fn test_trace_manual_noops() {
    init_logging();
    define_collection!(traced2);

    let (events, callback) = recorder();
    traced2::set_trace_callback(callback);

    let item = traced2::item(1u32);
    let manager = traced2::manager::<u32>();
    manager.add(item.handle());
    manager.remove(None);
    manager.remove(item.handle());
    drop(item);

    let captured = events.lock();
    assert_eq!(
        *captured,
        vec![
            "add { type_name: u32, inserted: true }",
            "add { type_name: u32, inserted: false }",
            "remove { type_name: u32, removed: false }",
            "remove { type_name: u32, removed: true }",
            "remove { type_name: u32, removed: false }",
        ]
    );
}

#[test]
fn test_clear_trace_callback() {
    define_collection!(traced3);

    let (events, callback) = recorder();
    traced3::set_trace_callback(callback);
    let _first = traced3::item(1u8);

    traced3::clear_trace_callback();
    let _second = traced3::item(2u8);

    assert_eq!(events.lock().len(), 1);
}

#[test]
fn test_callback_may_iterate_the_registry() {
    define_collection!(traced4);

    let sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = sizes.clone();
    traced4::set_trace_callback(move |event| {
        if let RegistryEvent::Add { .. } = event {
            // runs without the registry lock held
            let live: Vec<i64> = traced4::const_view::<i64>().iter().map(|v| *v).collect();
            sink.lock().push(live.len());
        }
    });

    let _a = traced4::item(1i64);
    let _b = traced4::item(2i64);

    assert_eq!(*sizes.lock(), vec![1, 2]);
    traced4::clear_trace_callback();
}

#[test]
#[serial]
fn test_global_trace_callback() {
    init_logging();
    struct GloballyTraced;

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    global::set_trace_callback(move |event| {
        // other tests may use the global table concurrently
        if event.to_string().contains("GloballyTraced") {
            sink.lock().push(event.clone());
        }
    });

    let item = Item::new(GloballyTraced);
    assert_eq!(ConstView::<GloballyTraced>::new().iter().count(), 1);
    Manager::<GloballyTraced>::new().remove(item.handle());
    drop(item);
    global::clear_trace_callback();

    let events = events.lock();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], RegistryEvent::Add { inserted: true, .. }));
    assert!(matches!(events[1], RegistryEvent::Iterate { len: 1, .. }));
    assert!(matches!(events[2], RegistryEvent::Remove { removed: true, .. }));
    assert!(matches!(events[3], RegistryEvent::Remove { removed: false, .. }));
}
