//! Core trait defining collection behavior.
//!
//! This module provides the `CollectionApi` trait with default implementations for resolving
//! per-type registries and building views, managers and items on top of them.
//!
//! The table is type-based: each element type (`TypeId`) owns exactly one registry per table.
//! Different tables never share registries, even for the same element type.

use std::sync::Arc;

use crate::{ConstView, Item, Manager, Registry, RegistryEvent, RegistryTable, View};

/// Core trait defining collection behavior.
///
/// Provides default implementations for all operations, requiring only the `table` accessor
/// to be implemented by the implementor.
pub trait CollectionApi {
    /// Access the registry table static.
    ///
    /// This method must be implemented to provide access to the table backing this collection.
    fn table() -> &'static RegistryTable;

    // -------------------------------------------------------------------------------------------------
    // Registries
    // -------------------------------------------------------------------------------------------------

    /// The registry for `T` in this table, created empty on first use.
    fn registry<T: Send + Sync + 'static>(&self) -> Arc<Registry<T>> {
        Self::table().registry::<T>()
    }

    /// Whether a registry for `T` has been created in this table.
    fn contains<T: Send + Sync + 'static>(&self) -> bool {
        Self::table().contains::<T>()
    }

    /// Mutable view over the members of `T`.
    fn view<T: Send + Sync + 'static>(&self) -> View<T> {
        View::from_registry(self.registry())
    }

    /// Read-only view over the members of `T`.
    fn const_view<T: Send + Sync + 'static>(&self) -> ConstView<T> {
        ConstView::from_registry(self.registry())
    }

    /// Manual add/remove access to the members of `T`.
    fn manager<T: Send + Sync + 'static>(&self) -> Manager<T> {
        Manager::from_registry(self.registry())
    }

    /// Wraps `value` in an item registered with this table.
    fn item<T: Send + Sync + 'static>(&self, value: T) -> Item<T> {
        Item::new_in(&self.registry(), value)
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for every registry of this table.
    ///
    /// The callback is invoked after the registry lock has been released, so it may call
    /// back into the collection.
    fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        Self::table().set_trace_callback(callback);
    }

    /// Clear the tracing callback.
    fn clear_trace_callback(&self) {
        Self::table().clear_trace_callback();
    }

    /// Forget every registry of this table.
    ///
    /// This method is primarily intended for testing. Items already alive keep their binding
    /// to the registry they joined; views created afterwards do not see them.
    #[doc(hidden)]
    fn clear(&self) {
        Self::table().clear();
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
