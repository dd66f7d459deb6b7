//! Authentication container.
//!
//! Holds the login status and the credentials of the current session,
//! validated through an injected [`CredentialVerifier`] and persisted to the
//! secure-storage backend under [`AUTH_STORE_KEY`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use chatkit_core::auth::{AuthContainer, StaticCredentialVerifier};
//! use chatkit_core::storage::MemoryStore;
//!
//! let auth = AuthContainer::new(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(StaticCredentialVerifier::mock()),
//! );
//! auth.rehydrate();
//! assert!(auth.login("test@example.com".to_string(), "password123".to_string()));
//! assert!(auth.is_logged_in());
//! ```

use std::sync::Arc;

use zeroize::Zeroizing;

use crate::storage::{KeyValueStore, PersistedContainer};

mod state;
mod verifier;

pub use state::{AuthState, Credentials};
pub use verifier::{
    mock_credential_verifier, static_credential_verifier, CredentialVerifier,
    StaticCredentialVerifier, MOCK_EMAIL, MOCK_PASSWORD,
};

/// Secure-storage key holding the authentication state.
pub const AUTH_STORE_KEY: &str = "auth-store";

/// Login status and session credentials.
#[derive(uniffi::Object)]
pub struct AuthContainer {
    inner: PersistedContainer<AuthState>,
    verifier: Arc<dyn CredentialVerifier>,
}

#[uniffi::export]
impl AuthContainer {
    /// Creates a logged-out container persisting to `secure_storage`.
    ///
    /// Call [`Self::rehydrate`] afterwards to restore a previous session.
    #[uniffi::constructor]
    pub fn new(
        secure_storage: Arc<dyn KeyValueStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Arc<Self> {
        Arc::new(Self {
            inner: PersistedContainer::new(AUTH_STORE_KEY, secure_storage),
            verifier,
        })
    }

    /// Attempts to log in.
    ///
    /// On success the submitted credentials are stored verbatim and `true` is
    /// returned. On failure the state is left as it was and `false` is
    /// returned.
    pub fn login(&self, email: String, password: String) -> bool {
        if !self.verifier.verify(email.clone(), password.clone()) {
            log::debug!("login rejected");
            return false;
        }
        self.inner.update(|state| {
            state.clear_credentials();
            state.is_logged_in = true;
            state.credentials = Some(Credentials { email, password });
        });
        log::info!("logged in");
        true
    }

    /// Ends the session and forgets the credentials.
    pub fn logout(&self) {
        self.inner.update(|state| {
            state.is_logged_in = false;
            state.clear_credentials();
        });
        log::info!("logged out");
    }

    /// Re-validates stored credentials, typically right after rehydration.
    ///
    /// Accepted credentials mark the session logged in; rejected ones are
    /// cleared and the session logged out. Without stored credentials the
    /// state is left untouched. The verifier runs without the state lock
    /// held; if the credentials change while it runs, its verdict is dropped.
    pub fn check_auth(&self) {
        let Some(credentials) = self
            .inner
            .read(|state| state.credentials.clone().map(Zeroizing::new))
        else {
            return;
        };
        let accepted = self
            .verifier
            .verify(credentials.email.clone(), credentials.password.clone());

        self.inner.try_update(|state| {
            if state.credentials.as_ref() != Some(&*credentials) {
                log::debug!("credentials changed during check_auth, keeping current state");
                return false;
            }
            if accepted {
                state.is_logged_in = true;
            } else {
                log::info!("stored credentials are no longer valid");
                state.is_logged_in = false;
                state.clear_credentials();
            }
            true
        });
    }

    /// Returns a copy of the current state.
    ///
    /// The copy includes the stored password; wiping it is up to the caller.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.snapshot()
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.inner.read(|state| state.is_logged_in)
    }

    /// Email of the stored credentials, if any.
    #[must_use]
    pub fn email(&self) -> Option<String> {
        self.inner
            .read(|state| state.credentials.as_ref().map(|c| c.email.clone()))
    }

    /// Restores the state saved by a previous run.
    ///
    /// Blocks on the storage read; call it off the UI thread. Returns `true`
    /// if a stored state was applied.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime context.
    pub fn rehydrate(&self) -> bool {
        self.inner.rehydrate()
    }

    /// Whether [`Self::rehydrate`] has completed.
    #[must_use]
    pub fn has_hydrated(&self) -> bool {
        self.inner.has_hydrated()
    }

    /// Deletes the persisted state without changing the in-memory session.
    pub fn clear_storage(&self) {
        self.inner.clear_storage();
    }

    /// Waits for pending storage writes to finish.
    ///
    /// # Panics
    ///
    /// Panics if called from within an async runtime context.
    pub fn flush(&self) {
        self.inner.flush();
    }
}

impl AuthContainer {
    /// Async variant of [`Self::rehydrate`].
    pub async fn rehydrate_async(&self) -> bool {
        self.inner.rehydrate_async().await
    }
}
