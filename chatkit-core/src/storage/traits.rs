//! Platform interface for state persistence.

use super::error::StorageResult;

/// Key-value store used to persist container state.
///
/// Hosts provide one implementation backed by secure storage (keychain,
/// keystore) for authentication state and one backed by general app storage
/// for everything else. Values are opaque strings; the persistence adapter
/// writes versioned JSON envelopes.
#[uniffi::export(with_foreign)]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn get(&self, key: String) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&self, key: String, value: String) -> StorageResult<()>;

    /// Deletes the value stored under `key`.
    ///
    /// Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete(&self, key: String) -> StorageResult<()>;
}
