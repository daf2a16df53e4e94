//! Automatic registration tied to the lifetime of a value.
//!
//! Wrapping a value in an [`Item`] registers it with its registry on creation and withdraws
//! it when the item is dropped. Where the item lives does not matter:
//!
//! - a local goes away at the end of its scope;
//! - a `Box<Item<T>>` goes away when the box is dropped;
//! - an `Arc<Item<T>>` goes away when the **last** `Arc` is released, never earlier.
//!
//! The value sits in a heap cell, so moving the `Item` itself does not change its identity in
//! the registry. Cloning creates a separate member with its own identity.

use std::fmt;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{global, Registry, Shared};

/// A value of `T` that is a member of a registry for as long as it lives.
///
/// # Examples
///
/// ```
/// use live_collection::{ConstView, Item};
/// use std::sync::Arc;
///
/// struct Probe {
///     id: u32,
/// }
///
/// let local = Item::new(Probe { id: 1 });
/// let boxed = Box::new(Item::new(Probe { id: 2 }));
/// let shared = Arc::new(Item::new(Probe { id: 3 }));
/// let second_owner = Arc::clone(&shared);
///
/// let ids: Vec<u32> = ConstView::<Probe>::new().iter().map(|p| p.id).collect();
/// assert_eq!(ids, vec![1, 2, 3]);
///
/// drop(shared);
/// assert_eq!(ConstView::<Probe>::new().len(), 3);
/// drop(second_owner);
/// assert_eq!(ConstView::<Probe>::new().len(), 2);
///
/// drop(boxed);
/// drop(local);
/// assert!(ConstView::<Probe>::new().is_empty());
/// ```
pub struct Item<T: Send + Sync + 'static> {
    cell: Shared<T>,
    registry: Arc<Registry<T>>,
}

impl<T: Send + Sync + 'static> Item<T> {
    /// Wraps `value` and registers it in the process-wide registry for `T`.
    pub fn new(value: T) -> Self {
        Self::new_in(&global::registry::<T>(), value)
    }

    /// Wraps `value` and registers it in `registry`.
    pub fn new_in(registry: &Arc<Registry<T>>, value: T) -> Self {
        let cell = Arc::new(RwLock::new(value));
        registry.add(&cell);

        Self {
            cell,
            registry: Arc::clone(registry),
        }
    }

    /// Shared access to the value.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.cell.read()
    }

    /// Exclusive access to the value.
    ///
    /// Blocks while a view iteration holds this member; do not call it from the body of a
    /// loop over a view that yields this same item.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.cell.write()
    }

    /// The identity of this item, usable with [`Manager`](crate::Manager).
    pub fn handle(&self) -> &Shared<T> {
        &self.cell
    }

    /// Whether the item is still a member (it may have been removed through a `Manager`).
    pub fn is_registered(&self) -> bool {
        self.registry.contains(&self.cell)
    }

    pub fn registry(&self) -> &Arc<Registry<T>> {
        &self.registry
    }
}

impl<T: Send + Sync + 'static> Drop for Item<T> {
    fn drop(&mut self) {
        // no-op when already removed manually
        self.registry.remove(&self.cell);
    }
}

impl<T: Send + Sync + Clone + 'static> Clone for Item<T> {
    fn clone(&self) -> Self {
        let value = self.read().clone();
        Self::new_in(&self.registry, value)
    }
}

impl<T: Send + Sync + Default + 'static> Default for Item<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Send + Sync + 'static> From<T> for Item<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Send + Sync + fmt::Debug + 'static> fmt::Debug for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Item");
        match self.cell.try_read() {
            Some(value) => out.field("value", &*value),
            None => out.field("value", &format_args!("<locked>")),
        };
        out.finish()
    }
}
