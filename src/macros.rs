//! Macros for declaring isolated collections.
//!
//! This module provides a macro-based way to create a registry table that is fully separated
//! from the process-wide one.

/// Creates an isolated collection with a single macro invocation.
///
/// The macro generates a module containing:
/// - A table static (hidden)
/// - An `Api` struct that implements `CollectionApi`
/// - Free functions mirroring the trait methods
///
/// # Examples
///
/// ```rust
/// use live_collection::define_collection;
///
/// define_collection!(widgets);
///
/// struct Widget {
///     label: &'static str,
/// }
///
/// let _ok = widgets::item(Widget { label: "ok" });
/// let _cancel = widgets::item(Widget { label: "cancel" });
///
/// let labels: Vec<_> = widgets::const_view::<Widget>().iter().map(|w| w.label).collect();
/// assert_eq!(labels, vec!["ok", "cancel"]);
/// ```
///
/// # Multiple Collections
///
/// Each invocation owns its own registries, even for the same element type:
///
/// ```rust
/// use live_collection::define_collection;
///
/// define_collection!(left);
/// define_collection!(right);
///
/// let _a = left::item(1u8);
/// assert_eq!(left::registry::<u8>().len(), 1);
/// assert!(right::registry::<u8>().is_empty());
/// ```
///
/// # Trait-Based Usage
///
/// The `API` constant is available for code generic over `CollectionApi`:
///
/// ```rust
/// use live_collection::{define_collection, CollectionApi};
///
/// define_collection!(app);
///
/// let _item = app::API.item(100i32);
/// assert_eq!(app::API.const_view::<i32>().len(), 1);
/// ```
#[macro_export]
macro_rules! define_collection {
    ($name:ident) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            // Registry table for this collection (module-private)
            static TABLE: LazyLock<$crate::RegistryTable> =
                LazyLock::new($crate::RegistryTable::new);

            /// Zero-sized type that implements the collection API.
            ///
            /// All operations are provided by the `CollectionApi` trait's default
            /// implementations. This struct only provides access to the table.
            pub struct Api;

            impl $crate::CollectionApi for Api {
                fn table() -> &'static $crate::RegistryTable {
                    &TABLE
                }
            }

            /// Convenient constant for accessing the collection API.
            pub const API: Api = Api;

            /// The registry for `T` in this collection.
            pub fn registry<T: Send + Sync + 'static>() -> Arc<$crate::Registry<T>> {
                use $crate::CollectionApi;
                API.registry()
            }

            /// Mutable view over the members of `T`.
            pub fn view<T: Send + Sync + 'static>() -> $crate::View<T> {
                use $crate::CollectionApi;
                API.view()
            }

            /// Read-only view over the members of `T`.
            pub fn const_view<T: Send + Sync + 'static>() -> $crate::ConstView<T> {
                use $crate::CollectionApi;
                API.const_view()
            }

            /// Manual add/remove access to the members of `T`.
            pub fn manager<T: Send + Sync + 'static>() -> $crate::Manager<T> {
                use $crate::CollectionApi;
                API.manager()
            }

            /// Wraps `value` in an item registered with this collection.
            pub fn item<T: Send + Sync + 'static>(value: T) -> $crate::Item<T> {
                use $crate::CollectionApi;
                API.item(value)
            }

            /// Set a tracing callback for this collection.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                use $crate::CollectionApi;
                API.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                use $crate::CollectionApi;
                API.clear_trace_callback()
            }
        }
    };
}
