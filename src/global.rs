//! The process-wide registry table.
//!
//! [`View::new`](crate::View::new), [`ConstView::new`](crate::ConstView::new),
//! [`Manager::new`](crate::Manager::new) and [`Item::new`](crate::Item::new) all bind to the
//! registries of this table.
//!
//! # Examples
//!
//! ```
//! use live_collection::{global, Item};
//!
//! struct Session(u32);
//!
//! let _a = Item::new(Session(1));
//! let _b = Item::new(Session(2));
//! assert_eq!(global::registry::<Session>().len(), 2);
//! ```

use std::sync::{Arc, LazyLock};

use crate::{CollectionApi, Registry, RegistryEvent, RegistryTable};

/// Global registry table, lazily initialized on first use.
static GLOBAL_TABLE: LazyLock<RegistryTable> = LazyLock::new(RegistryTable::new);

/// Zero-sized handle implementing [`CollectionApi`] over the process-wide table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Global;

impl CollectionApi for Global {
    fn table() -> &'static RegistryTable {
        &GLOBAL_TABLE
    }
}

/// Returns the process-wide registry for `T`.
pub fn registry<T: Send + Sync + 'static>() -> Arc<Registry<T>> {
    GLOBAL_TABLE.registry()
}

/// Sets a tracing callback invoked on every operation of every process-wide registry.
///
/// # Example
/// ```rust
/// use live_collection::global;
///
/// global::set_trace_callback(|event| println!("[registry-trace] {event}"));
/// global::clear_trace_callback();
/// ```
pub fn set_trace_callback(callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
    GLOBAL_TABLE.set_trace_callback(callback);
}

/// Clears the tracing callback (disables registry tracing).
pub fn clear_trace_callback() {
    GLOBAL_TABLE.clear_trace_callback();
}

#[doc(hidden)]
pub fn clear() {
    GLOBAL_TABLE.clear();
}
