//! The per-type membership set.
//!
//! A [`Registry<T>`] observes live instances of `T` without owning them. Each member is
//! stored as a non-owning [`Weak`] handle keyed by the address of its [`Shared`] cell, so a
//! given instance appears at most once and insertion order is preserved.
//!
//! # Locking discipline
//!
//! The member map sits behind a `parking_lot::RwLock`: `add`/`remove` take it exclusively,
//! snapshots and `len` take it shared. The lock is never held while user code runs (trace
//! callbacks fire after release, iteration works on a snapshot, removed handles are dropped
//! after release), so the same thread may add or remove while it is iterating, from inside a
//! destructor, or from inside a trace callback without deadlocking.
//!
//! # Dead entries
//!
//! A manually added value that is destroyed without being removed leaves a dead entry behind.
//! Dead entries are never visited or counted. `add` sweeps them whenever the map has doubled
//! since the previous sweep, so the map stays within a constant factor of the live members;
//! [`Registry::prune`] sweeps on demand.
//!
//! # Examples
//!
//! ```
//! use live_collection::{Registry, Shared};
//! use parking_lot::RwLock;
//! use std::sync::Arc;
//!
//! let registry = Registry::<u32>::new();
//! let member: Shared<u32> = Arc::new(RwLock::new(7));
//!
//! registry.add(&member);
//! registry.add(&member); // already present, ignored
//! assert_eq!(registry.len(), 1);
//!
//! registry.remove(&member);
//! registry.remove(None); // nothing to remove, ignored
//! assert!(registry.is_empty());
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::map::Entry;
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};

use crate::{RegistryEvent, TraceCallback};

/// Storage cell of a live instance.
///
/// The address of the cell is the identity of the instance inside a registry.
pub type Shared<T> = Arc<RwLock<T>>;

/// Slot holding the optional trace callback, shared by every registry of a table.
pub(crate) type TraceSlot = Mutex<Option<Arc<TraceCallback>>>;

/// Insertion-ordered set of live `T` instances.
///
/// Usually obtained from a [`RegistryTable`](crate::RegistryTable) (the process-wide one is
/// behind [`global::registry`](crate::global::registry)), but it can also be created on its
/// own and handed to views, managers and items explicitly.
pub struct Registry<T> {
    members: RwLock<Members<T>>,
    trace: Arc<TraceSlot>,
}

/// Smallest map size at which `add` sweeps dead entries.
const SWEEP_THRESHOLD: usize = 32;

struct Members<T> {
    map: IndexMap<usize, Weak<RwLock<T>>>,
    sweep_at: usize,
}

impl<T> Members<T> {
    fn new() -> Self {
        Self {
            map: IndexMap::new(),
            sweep_at: SWEEP_THRESHOLD,
        }
    }

    /// Drops dead entries, keeping the order of the live ones.
    fn sweep(&mut self) -> usize {
        let before = self.map.len();
        self.map.retain(|_, member| member.strong_count() > 0);
        self.sweep_at = (self.map.len() * 2).max(SWEEP_THRESHOLD);
        before - self.map.len()
    }

    fn sweep_if_due(&mut self) -> usize {
        if self.map.len() < self.sweep_at {
            return 0;
        }
        self.sweep()
    }
}

pub(crate) fn identity<T>(member: &Shared<T>) -> usize {
    Arc::as_ptr(member) as usize
}

impl<T: Send + Sync + 'static> Registry<T> {
    /// Creates an empty registry with its own trace callback slot.
    pub fn new() -> Self {
        Self::with_trace(Arc::new(Mutex::new(None)))
    }

    pub(crate) fn with_trace(trace: Arc<TraceSlot>) -> Self {
        Self {
            members: RwLock::new(Members::new()),
            trace,
        }
    }

    /// Appends `member` unless it is `None` or already registered.
    pub fn add<'a>(&self, member: impl Into<Option<&'a Shared<T>>>) {
        let (inserted, swept) = match member.into() {
            Some(member) => {
                let mut members = self.members.write();
                let inserted = match members.map.entry(identity(member)) {
                    Entry::Occupied(_) => false,
                    Entry::Vacant(slot) => {
                        slot.insert(Arc::downgrade(member));
                        true
                    }
                };
                let swept = if inserted { members.sweep_if_due() } else { 0 };
                (inserted, swept)
            }
            None => (false, 0),
        };

        if swept > 0 {
            tracing::debug!(type_name = type_name::<T>(), swept, "swept dead members");
        }
        tracing::trace!(type_name = type_name::<T>(), inserted, "registry add");
        self.emit_event(&RegistryEvent::Add {
            type_name: type_name::<T>(),
            inserted,
        });
    }

    /// Withdraws `member` if registered. `None` and absent members are ignored.
    pub fn remove<'a>(&self, member: impl Into<Option<&'a Shared<T>>>) {
        let stale = member
            .into()
            .and_then(|member| self.members.write().map.shift_remove(&identity(member)));
        let removed = stale.is_some();
        drop(stale);

        tracing::trace!(type_name = type_name::<T>(), removed, "registry remove");
        self.emit_event(&RegistryEvent::Remove {
            type_name: type_name::<T>(),
            removed,
        });
    }

    /// Whether `member` is currently registered.
    pub fn contains(&self, member: &Shared<T>) -> bool {
        self.members.read().map.contains_key(&identity(member))
    }

    /// Number of registered members whose value is still alive.
    pub fn len(&self) -> usize {
        self.members
            .read()
            .map
            .values()
            .filter(|member| member.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Strong handles to every live member, in insertion order.
    ///
    /// Useful when the caller wants to act on members (for instance remove them) after
    /// iteration rather than during it.
    pub fn handles(&self) -> Vec<Shared<T>> {
        self.snapshot()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    /// Drops entries whose value was destroyed without being removed first.
    ///
    /// Only manually added members can end up in this state; items always deregister on drop.
    /// Returns the number of entries dropped.
    pub fn prune(&self) -> usize {
        let pruned = self.members.write().sweep();

        if pruned > 0 {
            tracing::debug!(type_name = type_name::<T>(), pruned, "pruned dead members");
        }
        pruned
    }

    /// Membership at this instant, as non-owning handles in insertion order.
    pub(crate) fn snapshot(&self) -> Vec<Weak<RwLock<T>>> {
        let members: Vec<_> = self.members.read().map.values().cloned().collect();

        self.emit_event(&RegistryEvent::Iterate {
            type_name: type_name::<T>(),
            len: members.len(),
        });
        members
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Sets the trace callback.
    ///
    /// A registry obtained from a table shares the slot with every other registry of that
    /// table. The callback runs without any registry lock held and may call back into it.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        *self.trace.lock() = Some(Arc::new(callback));
    }

    pub fn clear_trace_callback(&self) {
        *self.trace.lock() = None;
    }

    fn emit_event(&self, event: &RegistryEvent) {
        let callback = self.trace.lock().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }
}

impl<T: Send + Sync + 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("type_name", &type_name::<T>())
            .field("len", &self.len())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
