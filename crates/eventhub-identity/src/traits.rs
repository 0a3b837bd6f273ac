//! Identity provider traits

use async_trait::async_trait;
use eventhub_api::Identity;
use std::sync::Arc;
use thiserror::Error;

/// Error codes reported by identity providers.
///
/// These are the provider's vocabulary, not the application's. The session
/// store translates them before they reach any view.
pub mod codes {
    pub const EMAIL_ALREADY_IN_USE: &str = "auth/email-already-in-use";
    pub const INVALID_EMAIL: &str = "auth/invalid-email";
    pub const USER_NOT_FOUND: &str = "auth/user-not-found";
    pub const WRONG_PASSWORD: &str = "auth/wrong-password";
    pub const WEAK_PASSWORD: &str = "auth/weak-password";
    pub const TOO_MANY_REQUESTS: &str = "auth/too-many-requests";
    pub const NETWORK_REQUEST_FAILED: &str = "auth/network-request-failed";
    pub const INTERNAL_ERROR: &str = "auth/internal-error";
}

/// Error from an identity provider operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({code})")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Callback invoked with the signed-in identity (or `None`) on every session change
pub type SessionListener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

/// Handle returned by `on_session_change`.
///
/// Calling `unsubscribe()` or dropping the handle detaches the listener.
pub struct Unsubscribe {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Unsubscribe {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to release
    pub fn noop() -> Self {
        Self { release: None }
    }

    /// Detach the listener now
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Unsubscribe {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Identity provider trait - implemented by concrete providers
///
/// Successful `create_account` and `sign_in` calls leave the new identity
/// signed in and notify listeners; `sign_out` notifies with `None`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in
    async fn create_account(&self, email: &str, password: &str) -> ProviderResult<Identity>;

    /// Sign in with email and password
    async fn sign_in(&self, email: &str, password: &str) -> ProviderResult<Identity>;

    /// Sign out the current identity
    async fn sign_out(&self) -> ProviderResult<()>;

    /// Register a session-change listener.
    ///
    /// Listeners are called in emission order and must not call back into
    /// the provider.
    fn on_session_change(&self, listener: SessionListener) -> Unsubscribe;

    /// Short name for logs
    fn name(&self) -> &str {
        "identity-provider"
    }
}
