//! Type-keyed table of registries.
//!
//! A [`RegistryTable`] resolves an element type `T` to its [`Registry<T>`], creating it on
//! first use. Every distinct `T` gets its own registry with independent state; the table only
//! stores them type-erased behind `TypeId`.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::registry::TraceSlot;
use crate::{Registry, RegistryEvent};

/// Maps element types to their registries.
///
/// The process-wide instance lives in [`global`](crate::global); isolated ones are declared
/// with [`define_collection!`](crate::define_collection).
pub struct RegistryTable {
    registries: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    trace: Arc<TraceSlot>,
}

impl RegistryTable {
    pub fn new() -> Self {
        Self {
            registries: Mutex::new(HashMap::new()),
            trace: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the registry for `T`, creating an empty one on first use.
    pub fn registry<T: Send + Sync + 'static>(&self) -> Arc<Registry<T>> {
        let mut registries = self.registries.lock();

        if let Some(registry) = registries
            .get(&TypeId::of::<T>())
            .and_then(|erased| Arc::clone(erased).downcast::<Registry<T>>().ok())
        {
            return registry;
        }

        let registry = Arc::new(Registry::<T>::with_trace(Arc::clone(&self.trace)));
        registries.insert(TypeId::of::<T>(), registry.clone());
        drop(registries);

        tracing::debug!(type_name = type_name::<T>(), "created registry");
        registry
    }

    /// Whether a registry for `T` has been created in this table.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.registries.lock().contains_key(&TypeId::of::<T>())
    }

    /// Sets the trace callback for every registry of this table, existing and future.
    ///
    /// The callback runs without any registry lock held and may call back into the table.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        *self.trace.lock() = Some(Arc::new(callback));
    }

    pub fn clear_trace_callback(&self) {
        *self.trace.lock() = None;
    }

    /// Forgets every registry of this table.
    ///
    /// Intended for tests. Items and views created before the call keep working against the
    /// registry they were bound to; everything created afterwards starts from empty registries.
    #[doc(hidden)]
    pub fn clear(&self) {
        let callback = self.trace.lock().clone();
        if let Some(callback) = callback {
            callback(&RegistryEvent::Clear {});
        }

        let registries = std::mem::take(&mut *self.registries.lock());
        tracing::debug!(count = registries.len(), "cleared registry table");
    }
}

impl Default for RegistryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RegistryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryTable")
            .field("registries", &self.registries.lock().len())
            .finish()
    }
}
