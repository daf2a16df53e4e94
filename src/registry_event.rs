/// Events emitted by a registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use live_collection::RegistryEvent;
///
/// let event = RegistryEvent::Add { type_name: "i32", inserted: true };
/// assert_eq!(event.to_string(), "add { type_name: i32, inserted: true }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A member was offered to the registry.
    Add {
        /// The element type of the registry (e.g., "my_app::Widget")
        type_name: &'static str,
        /// `false` when the handle was `None` or already registered
        inserted: bool,
    },

    /// A member was withdrawn from the registry.
    Remove {
        /// The element type of the registry
        type_name: &'static str,
        /// `false` when the handle was `None` or not registered
        removed: bool,
    },

    /// A view took a membership snapshot to iterate over.
    Iterate {
        /// The element type of the registry
        type_name: &'static str,
        /// Number of entries in the snapshot
        len: usize,
    },

    /// The registry table was cleared.
    Clear {},
}

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time a registry is
/// mutated or iterated. It must be thread-safe because registries are shared across threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Add {
                type_name,
                inserted,
            } => {
                write!(f, "add {{ type_name: {type_name}, inserted: {inserted} }}")
            }
            RegistryEvent::Remove { type_name, removed } => {
                write!(f, "remove {{ type_name: {type_name}, removed: {removed} }}")
            }
            RegistryEvent::Iterate { type_name, len } => {
                write!(f, "iterate {{ type_name: {type_name}, len: {len} }}")
            }
            RegistryEvent::Clear {} => write!(f, "Clearing the registry table"),
        }
    }
}
