//! Versioned state envelope persisted under each container's key.
//!
//! The layout is `{"state": {...}, "version": n}`, the same shape the
//! JavaScript persistence middleware writes, so state stored by earlier app
//! builds rehydrates unchanged.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::error::{StorageError, StorageResult};

/// Version written by every container in this crate.
pub const STATE_VERSION: u32 = 0;

/// Container state wrapped with the version it was written with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEnvelope<S> {
    /// The full container state.
    pub state: S,
    /// Version of the state layout.
    pub version: u32,
}

impl<S> StateEnvelope<S> {
    /// Wraps `state` with `version`.
    pub const fn new(state: S, version: u32) -> Self {
        Self { state, version }
    }
}

impl<S: Serialize> StateEnvelope<S> {
    /// Serializes the envelope to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be represented as JSON.
    pub fn serialize(&self) -> StorageResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<S: DeserializeOwned> StateEnvelope<S> {
    /// Parses an envelope and checks it carries `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` is not a valid envelope for `S` or the
    /// version does not match.
    pub fn deserialize(raw: &str, expected_version: u32) -> StorageResult<Self> {
        let envelope: Self = serde_json::from_str(raw)?;
        if envelope.version != expected_version {
            return Err(StorageError::UnsupportedVersion(envelope.version));
        }
        Ok(envelope)
    }
}
