use std::sync::Arc;

use subtle::ConstantTimeEq;

/// Email accepted by [`StaticCredentialVerifier::mock`].
pub const MOCK_EMAIL: &str = "test@example.com";
/// Password accepted by [`StaticCredentialVerifier::mock`].
pub const MOCK_PASSWORD: &str = "password123";

/// Decides whether a credential pair is valid.
///
/// Hosts can implement this to plug in a real authentication backend; the
/// containers only ever see the boolean verdict.
#[uniffi::export(with_foreign)]
pub trait CredentialVerifier: Send + Sync {
    /// Returns `true` if `email` and `password` are accepted.
    fn verify(&self, email: String, password: String) -> bool;
}

/// Verifier accepting exactly one fixed credential pair.
///
/// Comparison is exact and case-sensitive, done in constant time.
pub struct StaticCredentialVerifier {
    email: String,
    password: String,
}

impl StaticCredentialVerifier {
    /// Accepts only `email` / `password`.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Accepts only the built-in demo account.
    #[must_use]
    pub fn mock() -> Self {
        Self::new(MOCK_EMAIL, MOCK_PASSWORD)
    }
}

impl CredentialVerifier for StaticCredentialVerifier {
    fn verify(&self, email: String, password: String) -> bool {
        let email_matches = email.as_bytes().ct_eq(self.email.as_bytes());
        let password_matches = password.as_bytes().ct_eq(self.password.as_bytes());
        (email_matches & password_matches).into()
    }
}

/// Returns a verifier accepting only `email` / `password`.
#[uniffi::export]
#[must_use]
pub fn static_credential_verifier(email: String, password: String) -> Arc<dyn CredentialVerifier> {
    Arc::new(StaticCredentialVerifier::new(email, password))
}

/// Returns a verifier accepting only the built-in demo account.
#[uniffi::export]
#[must_use]
pub fn mock_credential_verifier() -> Arc<dyn CredentialVerifier> {
    Arc::new(StaticCredentialVerifier::mock())
}
