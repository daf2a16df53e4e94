//! # Live Collection
//!
//! A thread-safe, per-type registry of live instances.
//!
//! Instances of a type become discoverable, iterable and removable for as long as they exist,
//! without the owning code keeping its own bookkeeping container. Each element type `T` gets
//! its own independent registry.
//!
//! ## Quick Start
//!
//! ```rust
//! use live_collection::{ConstView, Item, View};
//!
//! struct Job {
//!     id: u32,
//!     done: bool,
//! }
//!
//! let first = Item::new(Job { id: 1, done: false });
//! let second = Box::new(Item::new(Job { id: 2, done: false }));
//!
//! for mut job in View::<Job>::new() {
//!     job.done = true;
//! }
//! assert!(ConstView::<Job>::new().iter().all(|job| job.done));
//!
//! drop(second);
//! let ids: Vec<u32> = ConstView::<Job>::new().iter().map(|job| job.id).collect();
//! assert_eq!(ids, vec![1]);
//! # drop(first);
//! ```
//!
//! ## Features
//!
//! - **Automatic lifecycle**: [`Item`] joins on creation and leaves on drop, whether it lives
//!   on the stack, in a `Box`, or behind an `Arc` (leaves with the last owner)
//! - **Manual membership**: [`Manager`] adds and removes values that are not items
//! - **Two access modes**: [`View`] yields exclusive guards, [`ConstView`] shared ones
//! - **Thread-safe**: add/remove/iterate from any thread; iteration never blocks on itself
//! - **Isolated tables**: [`define_collection!`] or a [`CollectionApi`] impl, next to the
//!   process-wide [`global`] table
//! - **Tracing support**: callback hook for registry events plus `tracing` records
//!
//! ## Collaborators
//!
//! - [`process`] - spawn a program, wait for it, talk to its standard streams
//! - [`string`] - trimming, case-insensitive search and comparison, replacement

mod error;
mod item;
mod macros;
mod manager;
mod registry;
mod registry_event;
mod registry_table;
mod registry_trait;
mod view;

pub mod global;
pub mod process;
pub mod string;

// Re-export the main public API
pub use error::{ProcessError, Result};
pub use global::Global;
pub use item::Item;
pub use manager::Manager;
pub use registry::{Registry, Shared};
pub use registry_event::{RegistryEvent, TraceCallback};
pub use registry_table::RegistryTable;
pub use registry_trait::CollectionApi;
pub use view::{ConstView, Iter, IterMut, MemberMut, MemberRef, View};
