//! Generic container whose state is mirrored to a key-value store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};

use super::adapter::PersistenceAdapter;
use super::envelope::{StateEnvelope, STATE_VERSION};
use super::traits::KeyValueStore;

/// State of type `S` kept in memory and persisted under a fixed key.
///
/// In-memory state is the source of truth. Every mutation made through
/// [`Self::update`] or an accepted [`Self::try_update`] queues a write of the
/// whole state; the write happens in the background and its outcome never
/// affects the caller.
///
/// The lifecycle is construct, then [`Self::rehydrate`] once at startup.
/// Mutations made before rehydration completes are overwritten by the
/// stored state if one exists.
pub struct PersistedContainer<S> {
    name: String,
    version: u32,
    state: RwLock<S>,
    hydrated: AtomicBool,
    adapter: PersistenceAdapter,
}

impl<S> PersistedContainer<S>
where
    S: Serialize + DeserializeOwned + Clone + Default + Send + Sync,
{
    /// Creates a container holding `S::default()`, persisted under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            name: name.into(),
            version: STATE_VERSION,
            state: RwLock::new(S::default()),
            hydrated: AtomicBool::new(false),
            adapter: PersistenceAdapter::new(store),
        }
    }

    /// Sets the state version written to and expected from storage.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Storage key of this container.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> S {
        self.read_guard().clone()
    }

    /// Runs `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.read_guard())
    }

    /// Mutates the state and persists the result.
    pub fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut state = self.write_guard();
        let result = f(&mut state);
        // Queued while the lock is held so storage sees mutations in order.
        self.persist(&state);
        result
    }

    /// Mutates the state, persisting only when `f` returns `true`.
    pub fn try_update(&self, f: impl FnOnce(&mut S) -> bool) -> bool {
        let mut state = self.write_guard();
        let changed = f(&mut state);
        if changed {
            self.persist(&state);
        }
        changed
    }

    /// Restores state from storage, blocking until the read completes.
    ///
    /// Returns `true` if a stored state was applied. Missing, unreadable or
    /// differently versioned data leaves the current state in place. Use
    /// [`Self::rehydrate_async`] from async code.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime context.
    pub fn rehydrate(&self) -> bool {
        let stored = self.adapter.load(&self.name).blocking_recv().ok().flatten();
        self.apply_stored(stored)
    }

    /// Async variant of [`Self::rehydrate`].
    pub async fn rehydrate_async(&self) -> bool {
        let stored = self.adapter.load(&self.name).await.ok().flatten();
        self.apply_stored(stored)
    }

    /// Whether a rehydration attempt has finished.
    #[must_use]
    pub fn has_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::Acquire)
    }

    /// Deletes the stored state. In-memory state is untouched.
    pub fn clear_storage(&self) {
        self.adapter.delete(&self.name);
    }

    /// Blocks until all queued storage operations have been applied.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime context.
    pub fn flush(&self) {
        self.adapter.flush();
    }

    /// Async variant of [`Self::flush`].
    pub async fn flush_async(&self) {
        self.adapter.flush_async().await;
    }

    fn apply_stored(&self, stored: Option<String>) -> bool {
        let restored = stored.and_then(|raw| {
            match StateEnvelope::<S>::deserialize(&raw, self.version) {
                Ok(envelope) => Some(envelope.state),
                Err(err) => {
                    log::warn!("discarding stored `{}` state: {err}", self.name);
                    None
                }
            }
        });
        let applied = restored.is_some();
        if let Some(state) = restored {
            *self.write_guard() = state;
            log::debug!("rehydrated `{}`", self.name);
        }
        self.hydrated.store(true, Ordering::Release);
        applied
    }

    fn persist(&self, state: &S) {
        match StateEnvelope::new(state, self.version).serialize() {
            Ok(raw) => self.adapter.set(&self.name, raw),
            Err(err) => log::warn!("failed to serialize `{}` state: {err}", self.name),
        }
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, S> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, S> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::storage::test_support::FailingStore;
    use crate::storage::MemoryStore;

    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    fn stored(store: &MemoryStore, key: &str) -> Option<String> {
        store.get(key.to_string()).expect("get")
    }

    #[test]
    fn test_update_persists_envelope() {
        let store = Arc::new(MemoryStore::new());
        let container = PersistedContainer::<Counter>::new("counter", store.clone());
        container.update(|state| state.value = 7);
        container.flush();
        assert_eq!(
            stored(&store, "counter"),
            Some(r#"{"state":{"value":7},"version":0}"#.to_string())
        );
    }

    #[test]
    fn test_rejected_try_update_does_not_write() {
        let store = Arc::new(MemoryStore::new());
        let container = PersistedContainer::<Counter>::new("counter", store.clone());
        assert!(!container.try_update(|_| false));
        container.flush();
        assert!(store.is_empty());
    }

    #[test]
    fn test_rehydrate_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let first = PersistedContainer::<Counter>::new("counter", store.clone());
        first.update(|state| state.value = 42);
        first.flush();

        let second = PersistedContainer::<Counter>::new("counter", store);
        assert!(!second.has_hydrated());
        assert!(second.rehydrate());
        assert!(second.has_hydrated());
        assert_eq!(second.snapshot(), first.snapshot());
    }

    #[test]
    fn test_rehydrate_without_stored_state() {
        let container =
            PersistedContainer::<Counter>::new("counter", Arc::new(MemoryStore::new()));
        assert!(!container.rehydrate());
        assert!(container.has_hydrated());
        assert_eq!(container.snapshot(), Counter::default());
    }

    #[test]
    fn test_rehydrate_ignores_other_versions() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                "counter".to_string(),
                r#"{"state":{"value":5},"version":1}"#.to_string(),
            )
            .expect("set");
        let container = PersistedContainer::<Counter>::new("counter", store.clone());
        assert!(!container.rehydrate());
        assert_eq!(container.snapshot(), Counter::default());

        let versioned = PersistedContainer::<Counter>::new("counter", store).with_version(1);
        assert!(versioned.rehydrate());
        assert_eq!(versioned.read(|state| state.value), 5);
    }

    #[test]
    fn test_rehydrate_ignores_garbage() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("counter".to_string(), "{oops".to_string())
            .expect("set");
        let container = PersistedContainer::<Counter>::new("counter", store);
        assert!(!container.rehydrate());
        assert_eq!(container.snapshot(), Counter::default());
    }

    #[test]
    fn test_failing_store_keeps_memory_state() {
        let container = PersistedContainer::<Counter>::new("counter", Arc::new(FailingStore));
        container.update(|state| state.value = 3);
        container.flush();
        assert!(!container.rehydrate());
        assert_eq!(container.read(|state| state.value), 3);
    }

    #[test]
    fn test_clear_storage_keeps_memory_state() {
        let store = Arc::new(MemoryStore::new());
        let container = PersistedContainer::<Counter>::new("counter", store.clone());
        container.update(|state| state.value = 9);
        container.clear_storage();
        container.flush();
        assert_eq!(stored(&store, "counter"), None);
        assert_eq!(container.read(|state| state.value), 9);
    }

    #[tokio::test]
    #[should_panic]
    async fn test_blocking_flush_inside_runtime_panics() {
        let container =
            PersistedContainer::<Counter>::new("counter", Arc::new(MemoryStore::new()));
        container.flush();
    }

    #[tokio::test]
    async fn test_rehydrate_async() {
        let store = Arc::new(MemoryStore::new());
        let first = PersistedContainer::<Counter>::new("counter", store.clone());
        first.update(|state| state.value = 11);
        first.flush_async().await;

        let second = PersistedContainer::<Counter>::new("counter", store);
        assert!(second.rehydrate_async().await);
        assert_eq!(second.read(|state| state.value), 11);
    }
}
