//! Integration tests for membership over the lifetime of instances.
//!
//! Covers manual membership through `Manager`, automatic membership through `Item` for every
//! storage kind (local, `Box`, `Arc`), and mutation through views.
//!
//! NOTE: Tests touching `ManagedData` or `Data` use #[serial] because they share the
//! process-wide registry of that type and compare exact counts.

use live_collection::{ConstView, Item, Manager, Shared, View};
use parking_lot::RwLock;
use serial_test::serial;
use std::sync::{Arc, LazyLock};

/// Plain type, only ever registered by hand.
#[derive(Debug, Default)]
struct Data {
    id: i32,
    value: i32,
}

/// Type living in `Item`s.
#[derive(Debug, Default, Clone)]
struct ManagedData {
    id: i32,
    value: i32,
}

/// Long-lived members present for the whole test run.
static BASELINE: LazyLock<Vec<Item<ManagedData>>> =
    LazyLock::new(|| (0..20).map(|_| Item::default()).collect());

fn baseline() -> usize {
    BASELINE.len()
}

fn managed_count() -> usize {
    LazyLock::force(&BASELINE);
    ConstView::<ManagedData>::new().iter().count()
}

fn data_count() -> usize {
    ConstView::<Data>::new().iter().count()
}

fn shared(data: Data) -> Shared<Data> {
    Arc::new(RwLock::new(data))
}

// ============================================================================
// Manual membership
// ============================================================================

#[test]
#[serial]
fn test_manual_add_and_remove() {
    let mgr = Manager::<Data>::new();
    assert_eq!(data_count(), 0);

    let first = shared(Data { id: 1, value: 10 });
    mgr.add(&first);
    assert_eq!(data_count(), 1);

    let second = shared(Data { id: 2, value: 20 });
    mgr.add(&second);
    assert_eq!(data_count(), 2);
    let ids: Vec<i32> = ConstView::<Data>::new().iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(second.read().value, 20);

    // Invalid operation
    mgr.remove(None);
    assert_eq!(data_count(), 2);

    mgr.remove(&second);
    assert_eq!(data_count(), 1);

    // Collect first, then remove, the way callers clean up everything they added
    let handles = mgr.registry().handles();
    for handle in &handles {
        mgr.remove(handle);
    }
    assert_eq!(data_count(), 0);
}

#[test]
#[serial]
fn test_manual_add_is_idempotent() {
    let mgr = Manager::<Data>::new();
    let before = data_count();

    let member = shared(Data::default());
    mgr.add(&member);
    mgr.add(&member);
    assert_eq!(data_count(), before + 1);

    mgr.remove(&member);
    mgr.remove(&member);
    assert_eq!(data_count(), before);
}

#[test]
#[serial]
fn test_remove_of_never_added_member() {
    let mgr = Manager::<Data>::new();
    let before = data_count();

    let stranger = shared(Data::default());
    mgr.remove(&stranger);
    mgr.remove(None);
    assert_eq!(data_count(), before);
}

// ============================================================================
// Automatic membership
// ============================================================================

#[test]
#[serial]
fn test_auto_add() {
    let base = baseline();

    let items: Vec<Item<ManagedData>> = (0..20).map(|_| Item::default()).collect();
    assert_eq!(managed_count(), base + 20);

    let ptr1 = Arc::new(Item::<ManagedData>::default());
    assert_eq!(managed_count(), base + 21);

    let ptr2 = Box::new(Item::<ManagedData>::default());
    assert_eq!(managed_count(), base + 22);

    let _var1 = Item::<ManagedData>::default();
    assert_eq!(managed_count(), base + 23);

    // Manual remove of automatic members
    let mgr = Manager::<ManagedData>::new();
    mgr.remove(items[0].handle());
    assert_eq!(managed_count(), base + 22);

    mgr.remove(items[1].handle());
    assert_eq!(managed_count(), base + 21);

    // Auto remove
    drop(ptr2);
    assert_eq!(managed_count(), base + 20);

    drop(ptr1);
    assert_eq!(managed_count(), base + 19);

    // Dropping the manually removed ones changes nothing further for them
    drop(items);
    assert_eq!(managed_count(), base + 1);
}

#[test]
#[serial]
fn test_auto_remove() {
    let base = baseline();
    let _items: Vec<Item<ManagedData>> = (0..20).map(|_| Item::default()).collect();

    let ptr1 = Arc::new(Item::<ManagedData>::default());
    let ptr2 = Box::new(Item::<ManagedData>::default());
    assert_eq!(managed_count(), base + 22);

    drop(ptr1);
    assert_eq!(managed_count(), base + 21);

    drop(ptr2);
    assert_eq!(managed_count(), base + 20);
}

#[test]
#[serial]
fn test_shared_item_leaves_with_last_owner() {
    let base = baseline();

    let owner = Arc::new(Item::<ManagedData>::default());
    let others: Vec<_> = (0..3).map(|_| Arc::clone(&owner)).collect();
    assert_eq!(managed_count(), base + 1);

    drop(owner);
    assert_eq!(managed_count(), base + 1);

    drop(others);
    assert_eq!(managed_count(), base);
}

#[test]
#[serial]
fn test_clone_registers_a_new_member() {
    let base = baseline();

    let original = Item::new(ManagedData { id: 7, value: 1 });
    let copy = original.clone();
    assert_eq!(managed_count(), base + 2);

    let moved = original;
    assert_eq!(managed_count(), base + 2);

    drop(moved);
    assert_eq!(managed_count(), base + 1);
    assert!(copy.is_registered());
}

#[test]
#[serial]
fn test_scenario_from_twenty_locals() {
    let base = baseline();

    let items: Vec<Item<ManagedData>> = (0..20).map(|_| Item::default()).collect();
    assert_eq!(View::<ManagedData>::new().iter().count(), base + 20);

    let shared = Arc::new(Item::<ManagedData>::default());
    assert_eq!(View::<ManagedData>::new().iter().count(), base + 21);

    drop(shared);
    assert_eq!(View::<ManagedData>::new().iter().count(), base + 20);

    Manager::<ManagedData>::new().remove(items[5].handle());
    assert_eq!(View::<ManagedData>::new().iter().count(), base + 19);
}

// ============================================================================
// Views
// ============================================================================

#[test]
#[serial]
fn test_auto_add_and_set_value() {
    let ptr1 = Arc::new(Item::new(ManagedData { id: 1, value: 10 }));
    let item1 = Item::new(ManagedData { id: 2, value: 20 });

    for mut item in View::<ManagedData>::new() {
        if item.id == 1 {
            assert_eq!(item.value, 10);
            item.value = 20;
        }

        if item.id == 2 {
            assert_eq!(item.value, 20);
            item.value = 40;
        }
    }

    for item in ConstView::<ManagedData>::new() {
        if item.id == 1 {
            assert_eq!(item.value, 20);
        }

        if item.id == 2 {
            assert_eq!(item.value, 40);
        }
    }

    assert_eq!(ptr1.read().value, 20);
    assert_eq!(item1.read().value, 40);
}

#[test]
#[serial]
fn test_no_add_for_plain_values() {
    let _items: Vec<Data> = (0..100).map(|_| Data::default()).collect();
    assert_eq!(managed_count(), baseline());
    assert_eq!(data_count(), 0);
}

#[test]
fn test_fresh_type_is_empty() {
    struct NeverInstantiated;

    assert_eq!(View::<NeverInstantiated>::new().iter().count(), 0);
    assert!(ConstView::<NeverInstantiated>::new().is_empty());
}
