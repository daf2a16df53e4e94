//! Integration tests for registry isolation.
//!
//! Registries are independent per element type, per collection, and per explicitly created
//! `Registry` instance.

use live_collection::{define_collection, ConstView, Item, Manager, Registry, Shared, View};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Endpoint {
    url: &'static str,
}

#[test]
fn test_multiple_isolated_collections() {
    define_collection!(database);
    define_collection!(cache);
    define_collection!(config);

    let _db = database::item(Endpoint {
        url: "postgresql://localhost",
    });
    let _cache = cache::item(Endpoint {
        url: "redis://localhost",
    });
    let _cfg = config::item(Endpoint {
        url: "file:///etc/app.toml",
    });

    let urls = |view: ConstView<Endpoint>| view.iter().map(|e| e.url).collect::<Vec<_>>();
    assert_eq!(urls(database::const_view()), vec!["postgresql://localhost"]);
    assert_eq!(urls(cache::const_view()), vec!["redis://localhost"]);
    assert_eq!(urls(config::const_view()), vec!["file:///etc/app.toml"]);

    // the process-wide table never saw any of them
    assert!(ConstView::<Endpoint>::new().is_empty());
}

#[test]
fn test_same_type_different_collections() {
    define_collection!(coll_a);
    define_collection!(coll_b);

    let a = coll_a::item(100i32);
    let b = coll_b::item(200i32);

    for mut value in coll_a::view::<i32>() {
        *value += 1;
    }

    assert_eq!(*a.read(), 101);
    assert_eq!(*b.read(), 200);
}

#[test]
fn test_manager_of_one_collection_cannot_remove_from_another() {
    define_collection!(isolated_a);
    define_collection!(isolated_b);

    let item = isolated_a::item(7u16);

    isolated_b::manager::<u16>().remove(item.handle());
    assert!(item.is_registered());
    assert_eq!(isolated_a::const_view::<u16>().len(), 1);

    isolated_a::manager::<u16>().remove(item.handle());
    assert!(!item.is_registered());
}

#[test]
fn test_distinct_types_in_one_collection() {
    define_collection!(multi);

    struct Left;
    struct Right;

    let _l1 = multi::item(Left);
    let _l2 = multi::item(Left);
    let _r = multi::item(Right);

    assert_eq!(multi::const_view::<Left>().len(), 2);
    assert_eq!(multi::const_view::<Right>().len(), 1);
}

#[test]
fn test_explicit_registries_are_independent() {
    let first = Arc::new(Registry::<Endpoint>::new());
    let second = Arc::new(Registry::<Endpoint>::new());

    let _one = Item::new_in(&first, Endpoint { url: "one" });
    let shared: Shared<Endpoint> = Arc::new(RwLock::new(Endpoint { url: "two" }));
    Manager::from_registry(Arc::clone(&second)).add(&shared);

    let first_view = View::from_registry(Arc::clone(&first));
    let second_view = ConstView::from_registry(Arc::clone(&second));

    assert_eq!(first_view.iter().map(|e| e.url).collect::<Vec<_>>(), ["one"]);
    assert_eq!(second_view.iter().map(|e| e.url).collect::<Vec<_>>(), ["two"]);
    assert!(!first.contains(&shared));
}
