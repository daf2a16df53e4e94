//! Iterable projections over a registry.
//!
//! A [`View`] yields exclusive guards to every live member, a [`ConstView`] yields shared
//! guards. Constructing either only binds it to a registry; membership is read when iteration
//! starts, and every call to `iter` (or every `for` loop) reads it again.
//!
//! Iteration works on a snapshot of non-owning handles, so the registry lock is not held
//! while the loop body runs. Members added after the snapshot are not visited; members
//! destroyed after the snapshot are skipped when reached. Each element stays locked only for
//! as long as its guard is alive.
//!
//! # Nested views
//!
//! Views may be nested on the same thread. An element whose guard the current thread already
//! holds through a view cannot be handed out a second time without aliasing it, so the inner
//! iteration passes over it:
//!
//! - a [`View`] skips every element the thread holds through any view guard;
//! - a [`ConstView`] skips elements the thread holds through a [`MemberMut`], and shares
//!   elements it holds through a [`MemberRef`].
//!
//! Shared guards are taken recursively, so a nested [`ConstView`] never waits behind a writer
//! queued on another thread. Elements held by other threads are waited for as usual.

use std::cell::RefCell;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Weak};
use std::vec;

use parking_lot::lock_api::{ArcRwLockReadGuard, ArcRwLockWriteGuard};
use parking_lot::{RawRwLock, RwLock};

use crate::registry::identity;
use crate::{global, Registry};

// -------------------------------------------------------------------------------------------------
// Guards
// -------------------------------------------------------------------------------------------------

thread_local! {
    static HELD: RefCell<Vec<Held>> = const { RefCell::new(Vec::new()) };
}

/// An element locked by a view guard on the current thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Held {
    address: usize,
    exclusive: bool,
}

/// Marks an element as held by the current thread until dropped.
///
/// Not `Send`, so the mark is always cleared on the thread that set it.
struct HeldMark(Held, PhantomData<*const ()>);

impl HeldMark {
    fn new(address: usize, exclusive: bool) -> Self {
        let held = Held { address, exclusive };
        HELD.with_borrow_mut(|marks| marks.push(held));
        Self(held, PhantomData)
    }
}

impl Drop for HeldMark {
    fn drop(&mut self) {
        // the thread-local may already be gone during thread teardown
        let _ = HELD.try_with(|marks| {
            let mut marks = marks.borrow_mut();
            if let Some(pos) = marks.iter().rposition(|held| *held == self.0) {
                marks.swap_remove(pos);
            }
        });
    }
}

/// How the current thread holds the element at `address`, if at all.
///
/// `Some(true)` when any of its guards is exclusive.
fn held_by_current_thread(address: usize) -> Option<bool> {
    HELD.with_borrow(|marks| {
        marks
            .iter()
            .filter(|held| held.address == address)
            .map(|held| held.exclusive)
            .reduce(|a, b| a || b)
    })
}

/// Exclusive access to a member, yielded by [`View`].
pub struct MemberMut<T> {
    guard: ArcRwLockWriteGuard<RawRwLock, T>,
    _mark: HeldMark,
}

/// Shared access to a member, yielded by [`ConstView`].
pub struct MemberRef<T> {
    guard: ArcRwLockReadGuard<RawRwLock, T>,
    _mark: HeldMark,
}

impl<T> Deref for MemberMut<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for MemberMut<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Deref for MemberRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T: fmt::Debug> fmt::Debug for MemberMut<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: fmt::Debug> fmt::Debug for MemberRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

/// Mutable projection over the members of a registry.
///
/// # Examples
///
/// ```
/// use live_collection::{ConstView, Item, View};
///
/// struct Gauge {
///     level: u32,
/// }
///
/// let _a = Item::new(Gauge { level: 1 });
/// let _b = Item::new(Gauge { level: 2 });
///
/// for mut gauge in View::<Gauge>::new() {
///     gauge.level *= 10;
/// }
///
/// let levels: Vec<u32> = ConstView::<Gauge>::new().iter().map(|g| g.level).collect();
/// assert_eq!(levels, vec![10, 20]);
/// ```
///
/// Holding an [`Item::write`](crate::Item::write) or [`Item::read`](crate::Item::read) guard
/// on the iterating thread while the view reaches that same item blocks forever.
pub struct View<T: Send + Sync + 'static> {
    registry: Arc<Registry<T>>,
}

impl<T: Send + Sync + 'static> View<T> {
    /// Binds to the process-wide registry for `T`.
    pub fn new() -> Self {
        Self::from_registry(global::registry())
    }

    pub fn from_registry(registry: Arc<Registry<T>>) -> Self {
        Self { registry }
    }

    /// Iterates the members registered right now, in insertion order.
    pub fn iter(&self) -> IterMut<T> {
        IterMut {
            members: self.registry.snapshot().into_iter(),
        }
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

/// Read-only projection over the members of a registry.
///
/// Yields shared guards, so members cannot be mutated through it:
///
/// ```compile_fail
/// use live_collection::{ConstView, Item};
///
/// struct Gauge {
///     level: u32,
/// }
///
/// let _a = Item::new(Gauge { level: 1 });
/// for gauge in ConstView::<Gauge>::new() {
///     gauge.level = 5;
/// }
/// ```
pub struct ConstView<T: Send + Sync + 'static> {
    registry: Arc<Registry<T>>,
}

impl<T: Send + Sync + 'static> ConstView<T> {
    /// Binds to the process-wide registry for `T`.
    pub fn new() -> Self {
        Self::from_registry(global::registry())
    }

    pub fn from_registry(registry: Arc<Registry<T>>) -> Self {
        Self { registry }
    }

    /// Iterates the members registered right now, in insertion order.
    pub fn iter(&self) -> Iter<T> {
        Iter {
            members: self.registry.snapshot().into_iter(),
        }
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

// -------------------------------------------------------------------------------------------------
// Iterators
// -------------------------------------------------------------------------------------------------

/// Iterator returned by [`View::iter`].
pub struct IterMut<T> {
    members: vec::IntoIter<Weak<RwLock<T>>>,
}

impl<T> Iterator for IterMut<T> {
    type Item = MemberMut<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.members.find_map(|member| {
            let member = member.upgrade()?;
            let address = identity(&member);
            if held_by_current_thread(address).is_some() {
                return None;
            }
            Some(MemberMut {
                guard: member.write_arc(),
                _mark: HeldMark::new(address, true),
            })
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.members.len()))
    }
}

impl<T> FusedIterator for IterMut<T> {}

/// Iterator returned by [`ConstView::iter`].
pub struct Iter<T> {
    members: vec::IntoIter<Weak<RwLock<T>>>,
}

impl<T> Iterator for Iter<T> {
    type Item = MemberRef<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.members.find_map(|member| {
            let member = member.upgrade()?;
            let address = identity(&member);
            if held_by_current_thread(address) == Some(true) {
                return None;
            }
            Some(MemberRef {
                guard: member.read_arc_recursive(),
                _mark: HeldMark::new(address, false),
            })
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.members.len()))
    }
}

impl<T> FusedIterator for Iter<T> {}

// -------------------------------------------------------------------------------------------------
// Trait impls
// -------------------------------------------------------------------------------------------------

macro_rules! impl_view_traits {
    ($view:ident, $iter:ident, $member:ident) => {
        impl<T: Send + Sync + 'static> IntoIterator for $view<T> {
            type Item = $member<T>;
            type IntoIter = $iter<T>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<'a, T: Send + Sync + 'static> IntoIterator for &'a $view<T> {
            type Item = $member<T>;
            type IntoIter = $iter<T>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<T: Send + Sync + 'static> Default for $view<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T: Send + Sync + 'static> Clone for $view<T> {
            fn clone(&self) -> Self {
                Self::from_registry(Arc::clone(&self.registry))
            }
        }

        impl<T: Send + Sync + 'static> fmt::Debug for $view<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($view))
                    .field("registry", &self.registry)
                    .finish()
            }
        }
    };
}

impl_view_traits!(View, IterMut, MemberMut);
impl_view_traits!(ConstView, Iter, MemberRef);
