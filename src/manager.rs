//! Explicit membership control.
//!
//! Types that are not wrapped in an [`Item`](crate::Item) never join a registry on their own.
//! A [`Manager`] lets the caller add and remove such values by hand; the caller then owns the
//! responsibility of removing them again.

use std::fmt;
use std::sync::Arc;

use crate::{global, Registry, Shared};

/// Named entry point onto a registry for manual add/remove.
///
/// # Examples
///
/// ```
/// use live_collection::{ConstView, Manager, Shared};
/// use parking_lot::RwLock;
/// use std::sync::Arc;
///
/// struct Plain {
///     value: i32,
/// }
///
/// let manager = Manager::<Plain>::new();
/// let plain: Shared<Plain> = Arc::new(RwLock::new(Plain { value: 10 }));
///
/// manager.add(&plain);
/// assert_eq!(ConstView::<Plain>::new().iter().map(|p| p.value).sum::<i32>(), 10);
///
/// manager.remove(&plain);
/// manager.remove(None);
/// assert!(ConstView::<Plain>::new().is_empty());
/// ```
pub struct Manager<T: Send + Sync + 'static> {
    registry: Arc<Registry<T>>,
}

impl<T: Send + Sync + 'static> Manager<T> {
    /// Binds to the process-wide registry for `T`.
    pub fn new() -> Self {
        Self::from_registry(global::registry())
    }

    pub fn from_registry(registry: Arc<Registry<T>>) -> Self {
        Self { registry }
    }

    /// See [`Registry::add`].
    pub fn add<'a>(&self, member: impl Into<Option<&'a Shared<T>>>) {
        self.registry.add(member);
    }

    /// See [`Registry::remove`].
    pub fn remove<'a>(&self, member: impl Into<Option<&'a Shared<T>>>) {
        self.registry.remove(member);
    }

    pub fn contains(&self, member: &Shared<T>) -> bool {
        self.registry.contains(member)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn registry(&self) -> &Arc<Registry<T>> {
        &self.registry
    }
}

impl<T: Send + Sync + 'static> Default for Manager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> Clone for Manager<T> {
    fn clone(&self) -> Self {
        Self::from_registry(Arc::clone(&self.registry))
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for Manager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("registry", &self.registry)
            .finish()
    }
}
