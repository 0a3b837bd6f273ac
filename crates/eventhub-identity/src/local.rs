//! In-process identity provider
//!
//! Keeps accounts in memory for the lifetime of the process. Passwords are
//! stored as salted SHA-256 digests. Repeated failed sign-ins for one email
//! are throttled.

use async_trait::async_trait;
use eventhub_api::Identity;
use eventhub_util::{is_valid_email, AttemptLimiter, UserId};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::{
    codes, IdentityProvider, ListenerSet, ProviderError, ProviderResult, SessionListener,
    Unsubscribe,
};

/// Tunables for the local provider
#[derive(Debug, Clone)]
pub struct LocalProviderSettings {
    /// Minimum password length accepted at account creation
    pub min_password_len: usize,
    /// Consecutive failed sign-ins before an email is locked
    pub max_failed_attempts: u32,
    /// How long a locked email stays locked
    pub lockout: Duration,
}

impl Default for LocalProviderSettings {
    fn default() -> Self {
        Self {
            min_password_len: 6,
            max_failed_attempts: 5,
            lockout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    email: String,
    password_digest: String,
}

impl Account {
    fn identity(&self) -> Identity {
        Identity::new(self.id.clone(), self.email.clone())
    }
}

#[derive(Debug)]
struct LocalState {
    /// Keyed by normalized email
    accounts: HashMap<String, Account>,
    current: Option<Identity>,
    limiter: AttemptLimiter,
}

/// Identity provider backed by an in-memory account table
pub struct LocalIdentityProvider {
    settings: LocalProviderSettings,
    state: Mutex<LocalState>,
    listeners: ListenerSet,
}

impl LocalIdentityProvider {
    pub fn new(settings: LocalProviderSettings) -> Self {
        let limiter = AttemptLimiter::new(settings.max_failed_attempts, settings.lockout);
        Self {
            settings,
            state: Mutex::new(LocalState {
                accounts: HashMap::new(),
                current: None,
                limiter,
            }),
            listeners: ListenerSet::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, LocalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an account without signing it in (used for configured accounts)
    pub fn seed_account(&self, email: &str, password: &str) -> ProviderResult<Identity> {
        let mut state = self.state();
        let account = self.insert_account(&mut state, email, password)?;
        debug!(email = %account.email, "Seeded local account");
        Ok(account.identity())
    }

    /// Number of known accounts
    pub fn account_count(&self) -> usize {
        self.state().accounts.len()
    }

    /// Currently signed-in identity, if any
    pub fn current_identity(&self) -> Option<Identity> {
        self.state().current.clone()
    }

    /// Drop the current session as if its token had been invalidated
    pub fn revoke_session(&self) -> bool {
        let mut state = self.state();
        match state.current.take() {
            Some(identity) => {
                info!(email = %identity.email, "Session revoked");
                self.listeners.notify(None);
                true
            }
            None => false,
        }
    }

    fn insert_account(
        &self,
        state: &mut LocalState,
        email: &str,
        password: &str,
    ) -> ProviderResult<Account> {
        let key = normalize_email(email);
        if !is_valid_email(&key) {
            return Err(ProviderError::new(
                codes::INVALID_EMAIL,
                "The email address is badly formatted",
            ));
        }
        if password.chars().count() < self.settings.min_password_len {
            return Err(ProviderError::new(
                codes::WEAK_PASSWORD,
                format!(
                    "Password should be at least {} characters",
                    self.settings.min_password_len
                ),
            ));
        }
        if state.accounts.contains_key(&key) {
            return Err(ProviderError::new(
                codes::EMAIL_ALREADY_IN_USE,
                "The email address is already in use by another account",
            ));
        }

        let id = UserId::generate();
        let account = Account {
            password_digest: digest_password(&id, password),
            id,
            email: key.clone(),
        };
        state.accounts.insert(key, account.clone());
        Ok(account)
    }

    fn set_current(&self, state: &mut LocalState, identity: Option<Identity>) {
        if state.current != identity {
            state.current = identity;
            // Emitted under the state lock so notifications keep call order
            self.listeners.notify(state.current.as_ref());
        }
    }
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new(LocalProviderSettings::default())
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> ProviderResult<Identity> {
        let mut state = self.state();
        let account = self.insert_account(&mut state, email, password)?;
        let identity = account.identity();

        info!(email = %identity.email, user_id = %identity.id, "Account created");
        self.set_current(&mut state, Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> ProviderResult<Identity> {
        let key = normalize_email(email);
        if !is_valid_email(&key) {
            return Err(ProviderError::new(
                codes::INVALID_EMAIL,
                "The email address is badly formatted",
            ));
        }

        let now = Instant::now();
        let mut state = self.state();

        if state.limiter.is_locked(&key, now) {
            warn!(email = %key, "Sign-in throttled");
            return Err(ProviderError::new(
                codes::TOO_MANY_REQUESTS,
                "Access to this account has been temporarily disabled due to many failed login attempts",
            ));
        }

        let Some(account) = state.accounts.get(&key).cloned() else {
            return Err(ProviderError::new(
                codes::USER_NOT_FOUND,
                "There is no user record corresponding to this identifier",
            ));
        };

        if digest_password(&account.id, password) != account.password_digest {
            let locked = state.limiter.record_failure(&key, now);
            warn!(email = %key, locked, "Wrong password");
            return Err(ProviderError::new(
                codes::WRONG_PASSWORD,
                "The password is invalid",
            ));
        }

        state.limiter.reset(&key);
        let identity = account.identity();
        info!(email = %identity.email, user_id = %identity.id, "Signed in");
        self.set_current(&mut state, Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> ProviderResult<()> {
        let mut state = self.state();
        if let Some(identity) = &state.current {
            info!(email = %identity.email, "Signed out");
        }
        self.set_current(&mut state, None);
        Ok(())
    }

    fn on_session_change(&self, listener: SessionListener) -> Unsubscribe {
        // Hold the state lock so no emission slips between registration and
        // the initial delivery
        let state = self.state();
        let handle = self.listeners.register(listener.clone());
        listener(state.current.clone());
        handle
    }

    fn name(&self) -> &str {
        "local"
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn digest_password(salt: &UserId, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn provider() -> LocalIdentityProvider {
        LocalIdentityProvider::new(LocalProviderSettings {
            min_password_len: 6,
            max_failed_attempts: 3,
            lockout: Duration::from_secs(60),
        })
    }

    fn record(provider: &LocalIdentityProvider) -> (Unsubscribe, Arc<Mutex<Vec<Option<String>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let handle = provider.on_session_change(Arc::new(move |identity: Option<Identity>| {
            sink.lock().unwrap().push(identity.map(|i| i.email));
        }));
        (handle, seen)
    }

    #[test]
    fn seed_rejects_malformed_email() {
        let provider = provider();
        for email in ["a@b", "a b@c.com", "a@b@c.com"] {
            let err = provider.seed_account(email, "secret1").unwrap_err();
            assert_eq!(err.code(), codes::INVALID_EMAIL);
        }
        assert_eq!(provider.account_count(), 0);
    }

    #[tokio::test]
    async fn create_account_signs_in_and_notifies() {
        let provider = provider();
        let (_handle, seen) = record(&provider);

        let identity = provider.create_account("New@Example.com", "secret1").await.unwrap();
        assert_eq!(identity.email, "new@example.com");
        assert_eq!(provider.current_identity(), Some(identity));

        // Initial delivery, then the sign-in
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("new@example.com".to_string())]
        );
    }

    #[tokio::test]
    async fn create_account_errors() {
        let provider = provider();
        provider.seed_account("a@b.com", "secret1").unwrap();

        let err = provider.create_account("a@b.com", "secret1").await.unwrap_err();
        assert_eq!(err.code(), codes::EMAIL_ALREADY_IN_USE);

        let err = provider.create_account("c@d.com", "short").await.unwrap_err();
        assert_eq!(err.code(), codes::WEAK_PASSWORD);

        let err = provider.create_account("not-an-email", "secret1").await.unwrap_err();
        assert_eq!(err.code(), codes::INVALID_EMAIL);

        assert_eq!(provider.account_count(), 1);
        assert!(provider.current_identity().is_none());
    }

    #[tokio::test]
    async fn sign_in_errors() {
        let provider = provider();
        provider.seed_account("a@b.com", "secret1").unwrap();

        let err = provider.sign_in("x@y.com", "secret1").await.unwrap_err();
        assert_eq!(err.code(), codes::USER_NOT_FOUND);

        let err = provider.sign_in("a@b.com", "wrong-one").await.unwrap_err();
        assert_eq!(err.code(), codes::WRONG_PASSWORD);

        let identity = provider.sign_in(" A@B.com ", "secret1").await.unwrap();
        assert_eq!(identity.email, "a@b.com");
    }

    #[tokio::test]
    async fn repeated_failures_are_throttled() {
        let provider = provider();
        provider.seed_account("a@b.com", "secret1").unwrap();

        for _ in 0..3 {
            let err = provider.sign_in("a@b.com", "nope-nope").await.unwrap_err();
            assert_eq!(err.code(), codes::WRONG_PASSWORD);
        }

        // Locked, even with the right password
        let err = provider.sign_in("a@b.com", "secret1").await.unwrap_err();
        assert_eq!(err.code(), codes::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn sign_out_notifies_only_on_change() {
        let provider = provider();
        provider.seed_account("a@b.com", "secret1").unwrap();
        let (_handle, seen) = record(&provider);

        provider.sign_out().await.unwrap();
        provider.sign_in("a@b.com", "secret1").await.unwrap();
        provider.sign_out().await.unwrap();
        provider.sign_out().await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("a@b.com".to_string()), None]
        );
    }

    #[tokio::test]
    async fn revoke_session_notifies() {
        let provider = provider();
        provider.seed_account("a@b.com", "secret1").unwrap();
        provider.sign_in("a@b.com", "secret1").await.unwrap();
        let (_handle, seen) = record(&provider);

        assert!(provider.revoke_session());
        assert!(!provider.revoke_session());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Some("a@b.com".to_string()), None]
        );
    }

    #[test]
    fn digests_are_salted() {
        let a = digest_password(&UserId::new("u1"), "secret1");
        let b = digest_password(&UserId::new("u2"), "secret1");
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}
