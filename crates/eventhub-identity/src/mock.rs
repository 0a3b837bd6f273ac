//! Mock identity provider for testing

use async_trait::async_trait;
use eventhub_api::Identity;
use eventhub_util::UserId;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    IdentityProvider, ListenerSet, ProviderError, ProviderResult, SessionListener, Unsubscribe,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock identity provider for unit/integration testing.
///
/// Any email/password pair succeeds unless a failure code is configured.
pub struct MockIdentityProvider {
    listeners: ListenerSet,
    current: Mutex<Option<Identity>>,
    next_id: AtomicU64,
    defer_initial: AtomicBool,

    /// Configure `create_account` to fail with this provider code
    pub fail_create: Arc<Mutex<Option<String>>>,

    /// Configure `sign_in` to fail with this provider code
    pub fail_sign_in: Arc<Mutex<Option<String>>>,

    /// Configure `sign_out` to fail with this provider code
    pub fail_sign_out: Arc<Mutex<Option<String>>>,

    create_calls: AtomicUsize,
    sign_in_calls: AtomicUsize,
    sign_out_calls: AtomicUsize,
    subscribe_calls: AtomicUsize,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self {
            listeners: ListenerSet::new(),
            current: Mutex::new(None),
            next_id: AtomicU64::new(1),
            defer_initial: AtomicBool::new(false),
            fail_create: Arc::new(Mutex::new(None)),
            fail_sign_in: Arc::new(Mutex::new(None)),
            fail_sign_out: Arc::new(Mutex::new(None)),
            create_calls: AtomicUsize::new(0),
            sign_in_calls: AtomicUsize::new(0),
            sign_out_calls: AtomicUsize::new(0),
            subscribe_calls: AtomicUsize::new(0),
        }
    }

    /// Do not deliver the current state when a listener registers;
    /// the first notification then comes from `emit_current` or an operation.
    pub fn with_deferred_initial(self) -> Self {
        self.defer_initial.store(true, Ordering::SeqCst);
        self
    }

    /// Start out signed in as `email`
    pub fn with_signed_in(self, email: &str) -> Self {
        let identity = self.make_identity(email);
        *lock(&self.current) = Some(identity);
        self
    }

    pub fn set_fail_create(&self, code: Option<&str>) {
        *lock(&self.fail_create) = code.map(str::to_string);
    }

    pub fn set_fail_sign_in(&self, code: Option<&str>) {
        *lock(&self.fail_sign_in) = code.map(str::to_string);
    }

    pub fn set_fail_sign_out(&self, code: Option<&str>) {
        *lock(&self.fail_sign_out) = code.map(str::to_string);
    }

    /// Deliver the current state to all listeners
    pub fn emit_current(&self) {
        let current = lock(&self.current);
        self.listeners.notify(current.as_ref());
    }

    /// Replace the current state and notify, as an external change would
    pub fn emit(&self, identity: Option<Identity>) {
        let mut current = lock(&self.current);
        *current = identity;
        self.listeners.notify(current.as_ref());
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::SeqCst)
    }

    fn make_identity(&self, email: &str) -> Identity {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        Identity::new(UserId::new(format!("mock-{}", n)), email)
    }

    fn configured_failure(slot: &Mutex<Option<String>>) -> ProviderResult<()> {
        match lock(slot).as_deref() {
            Some(code) => Err(ProviderError::new(code, "Mock provider failure")),
            None => Ok(()),
        }
    }
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn create_account(&self, email: &str, _password: &str) -> ProviderResult<Identity> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Self::configured_failure(&self.fail_create)?;

        let identity = self.make_identity(email);
        self.emit(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, _password: &str) -> ProviderResult<Identity> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        Self::configured_failure(&self.fail_sign_in)?;

        let identity = self.make_identity(email);
        self.emit(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> ProviderResult<()> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        Self::configured_failure(&self.fail_sign_out)?;

        self.emit(None);
        Ok(())
    }

    fn on_session_change(&self, listener: SessionListener) -> Unsubscribe {
        self.subscribe_calls.fetch_add(1, Ordering::SeqCst);

        let current = lock(&self.current);
        let handle = self.listeners.register(listener.clone());
        if !self.defer_initial.load(Ordering::SeqCst) {
            listener(current.clone());
        }
        handle
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;

    #[tokio::test]
    async fn mock_sign_in_and_out() {
        let provider = MockIdentityProvider::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _handle = provider.on_session_change(Arc::new(move |identity: Option<Identity>| {
            sink.lock().unwrap().push(identity.is_some());
        }));

        provider.sign_in("a@b.com", "whatever").await.unwrap();
        provider.sign_out().await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![false, true, false]);
        assert_eq!(provider.sign_in_calls(), 1);
        assert_eq!(provider.sign_out_calls(), 1);
    }

    #[tokio::test]
    async fn mock_configured_failure() {
        let provider = MockIdentityProvider::new();
        provider.set_fail_sign_in(Some(codes::WEAK_PASSWORD));

        let err = provider.sign_in("a@b.com", "short").await.unwrap_err();
        assert_eq!(err.code(), codes::WEAK_PASSWORD);
        assert_eq!(provider.sign_in_calls(), 1);
    }

    #[test]
    fn mock_deferred_initial() {
        let provider = MockIdentityProvider::new().with_deferred_initial();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let _handle = provider.on_session_change(Arc::new(move |_: Option<Identity>| {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(count.load(Ordering::SeqCst), 0);
        provider.emit_current();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
