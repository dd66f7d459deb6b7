//! Error types for persistence backends.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by key-value storage backends.
///
/// Containers never surface these to their callers. They exist so backends
/// can report what went wrong and the persistence adapter can log it.
#[derive(Debug, Error, uniffi::Error)]
pub enum StorageError {
    /// Errors reported by a platform backend (keychain, async storage, ...).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// File system failures of the file-backed store.
    #[error("io error: {0}")]
    Io(String),

    /// Serialization/deserialization failures.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Stored envelope was written with a different state version.
    #[error("unsupported state version: {0}")]
    UnsupportedVersion(u32),

    /// The key cannot be used by this backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Unexpected `UniFFI` callback error.
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for StorageError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
