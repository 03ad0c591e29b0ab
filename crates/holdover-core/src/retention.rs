//! Keyed store that keeps presenters alive across container recreation.
//!
//! The store is a plain data container. It does not know what a presenter is;
//! each entry holds one type-erased payload that the owning
//! [`Container`](crate::Container) downcasts on attach.
//!
//! A store is scoped to an explicit context object rather than being global:
//! both the old and the recreated container for a key receive a clone of the
//! same [`RetentionStore`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

/// Type-erased payload held by a [`RetainedEntry`].
pub type Payload = Arc<dyn Any + Send + Sync>;

/// Stable identifier correlating an old and a recreated container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RetentionKey(String);

impl RetentionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key derived from a container's concrete type.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RetentionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One slot in the store, holding at most one payload.
#[derive(Default)]
pub struct RetainedEntry {
    payload: Mutex<Option<Payload>>,
}

impl RetainedEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The payload, if present and of type `P`.
    pub fn get<P: Any + Send + Sync>(&self) -> Option<Arc<P>> {
        self.lock()
            .clone()
            .and_then(|payload| payload.downcast::<P>().ok())
    }

    /// Replace the payload.
    pub fn set<P: Any + Send + Sync>(&self, payload: Arc<P>) {
        *self.lock() = Some(payload as Payload);
    }

    /// Drop the payload. Returns `true` if there was one.
    pub fn clear(&self) -> bool {
        let previous = self.lock().take();
        previous.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Payload>> {
        self.payload.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RetainedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetainedEntry")
            .field("occupied", &!self.is_empty())
            .finish()
    }
}

#[derive(Default)]
struct StoreInner {
    entries: HashMap<RetentionKey, Arc<RetainedEntry>>,
    closed: bool,
}

/// Process-wide (per context) registry of retained entries.
///
/// Cloning is cheap and yields a handle to the same store.
#[derive(Clone, Default)]
pub struct RetentionStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl RetentionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `key`, registering an empty one if needed.
    ///
    /// Never fails. On a closed store the returned entry is detached: it works
    /// but is not registered and will not be found again.
    pub fn find_or_create(&self, key: &RetentionKey) -> Arc<RetainedEntry> {
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.get(key) {
            debug!(key = %key, "Found retained entry");
            return Arc::clone(entry);
        }

        let entry = Arc::new(RetainedEntry::new());
        if inner.closed {
            warn!(key = %key, "Retention store is closed; handing out a detached entry");
            return entry;
        }

        debug!(key = %key, "Registered new retained entry");
        inner.entries.insert(key.clone(), Arc::clone(&entry));
        entry
    }

    /// Remove the entry for `key` and drop its payload.
    ///
    /// No-op if there is no such entry or the store has been closed. Returns
    /// `true` if an entry was removed.
    pub fn remove(&self, key: &RetentionKey) -> bool {
        let removed = {
            let mut inner = self.lock();
            if inner.closed {
                debug!(key = %key, "Retention store is closed; ignoring removal");
                return false;
            }
            inner.entries.remove(key)
        };

        // Payload is dropped outside the store lock.
        match removed {
            Some(entry) => {
                entry.clear();
                debug!(key = %key, "Removed retained entry");
                true
            }
            None => false,
        }
    }

    /// Tear the store down: drop every entry and refuse new registrations.
    pub fn close(&self) {
        let entries: Vec<_> = {
            let mut inner = self.lock();
            inner.closed = true;
            inner.entries.drain().map(|(_, entry)| entry).collect()
        };

        debug!(entries = entries.len(), "Closing retention store");
        for entry in entries {
            entry.clear();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn contains(&self, key: &RetentionKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RetentionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        let mut keys: Vec<_> = inner.entries.keys().map(RetentionKey::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("RetentionStore")
            .field("keys", &keys)
            .field("closed", &inner.closed)
            .finish()
    }
}
