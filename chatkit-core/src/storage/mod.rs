//! State persistence: the platform key-value interface, versioned envelopes,
//! the background adapter and the generic persisted container.

use std::sync::Arc;

pub mod adapter;
pub mod envelope;
pub mod error;
pub mod file;
pub mod memory;
pub mod persisted;
pub mod traits;

pub use adapter::PersistenceAdapter;
pub use envelope::{StateEnvelope, STATE_VERSION};
pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use persisted::PersistedContainer;
pub use traits::KeyValueStore;

/// Returns a new, empty in-memory store.
#[uniffi::export]
#[must_use]
pub fn new_memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

/// Opens a file-backed store rooted at `directory`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
#[uniffi::export]
pub fn new_file_store(directory: String) -> StorageResult<Arc<dyn KeyValueStore>> {
    Ok(Arc::new(FileStore::new(directory)?))
}
