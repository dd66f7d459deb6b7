use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Credentials accepted at login.
///
/// Kept in the persisted authentication state so the session can be
/// re-validated after a cold start. The password never appears in `Debug`
/// output. The container wipes the copy it owns when credentials are
/// cleared; copies handed to callers or to the verifier are not tracked.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, uniffi::Record)]
pub struct Credentials {
    /// Login email, as submitted.
    pub email: String,
    /// Login password, as submitted.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authentication state persisted under [`super::AUTH_STORE_KEY`].
///
/// Invariant: `is_logged_in` implies `credentials` is present and was
/// accepted by the verifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// Whether a user session is active.
    pub is_logged_in: bool,
    /// Credentials of the active or last restored session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

impl AuthState {
    /// Drops the stored credentials, wiping them from memory.
    pub(crate) fn clear_credentials(&mut self) {
        if let Some(mut credentials) = self.credentials.take() {
            credentials.zeroize();
        }
    }
}
