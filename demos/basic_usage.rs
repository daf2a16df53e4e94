//! Basic usage example for live-collection.
//!
//! Demonstrates:
//! - Automatic membership with `Item` on the stack, in a `Box` and behind an `Arc`
//! - Manual membership with `Manager`
//! - Iterating with `View` (mutable) and `ConstView` (read-only)
//! - Isolated collections with `define_collection!`
//!
//! Run with: `cargo run --example basic_usage`

use live_collection::{define_collection, ConstView, Item, Manager, Shared, View};
use parking_lot::RwLock;
use std::sync::Arc;

// Create an isolated collection for this example
define_collection!(scratch);

#[derive(Debug, Clone, PartialEq)]
struct Connection {
    peer: String,
    bytes_sent: u64,
}

impl Connection {
    fn new(peer: &str) -> Self {
        Self {
            peer: peer.to_string(),
            bytes_sent: 0,
        }
    }
}

fn print_connections(title: &str) {
    println!("   {title}:");
    for conn in ConstView::<Connection>::new() {
        println!("     - {} ({} bytes)", conn.peer, conn.bytes_sent);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== live-collection: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Automatic membership
    // -------------------------------------------------------------------------
    println!("1. Creating items...");

    let local = Item::new(Connection::new("10.0.0.1"));
    let boxed = Box::new(Item::new(Connection::new("10.0.0.2")));
    let shared = Arc::new(Item::new(Connection::new("10.0.0.3")));
    let shared_again = Arc::clone(&shared);

    print_connections("live");

    // -------------------------------------------------------------------------
    // 2. Mutate through a view
    // -------------------------------------------------------------------------
    println!("\n2. Sending 512 bytes on every connection...");

    for mut conn in View::<Connection>::new() {
        conn.bytes_sent += 512;
    }
    println!("   local item now reports {} bytes", local.read().bytes_sent);

    // -------------------------------------------------------------------------
    // 3. Dropping members
    // -------------------------------------------------------------------------
    println!("\n3. Dropping the boxed item and one of two Arc owners...");

    drop(boxed);
    drop(shared);
    print_connections("live");

    drop(shared_again);
    print_connections("after last Arc owner is gone");

    // -------------------------------------------------------------------------
    // 4. Manual membership
    // -------------------------------------------------------------------------
    println!("\n4. Adding a plain value by hand...");

    let manager = Manager::<Connection>::new();
    let plain: Shared<Connection> = Arc::new(RwLock::new(Connection::new("10.0.0.9")));
    manager.add(&plain);
    print_connections("live");

    manager.remove(&plain);
    manager.remove(local.handle());
    print_connections("after manual removal");

    // -------------------------------------------------------------------------
    // 5. Isolated collections
    // -------------------------------------------------------------------------
    println!("\n5. Isolated collection...");

    let _isolated = scratch::item(Connection::new("192.168.1.1"));
    println!(
        "   scratch has {}, global has {}",
        scratch::const_view::<Connection>().len(),
        ConstView::<Connection>::new().len()
    );

    println!("\n=== Example Complete ===");
}
