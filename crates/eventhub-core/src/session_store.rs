//! Process-wide session store
//!
//! The store owns the only writable copy of [`Session`]. It subscribes once to
//! the identity provider and republishes each notification through a `watch`
//! channel. `login`, `signup` and `logout` only call the provider; the state
//! change arrives through the subscription like any other notification.

use eventhub_api::{Identity, Session};
use eventhub_identity::{IdentityProvider, ProviderError, ProviderResult, Unsubscribe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::AuthError;

/// Holds the current session and mediates every provider call
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    sender: Arc<watch::Sender<Session>>,
    subscription: Mutex<Option<Unsubscribe>>,
    initialized: AtomicBool,
    closed: Arc<AtomicBool>,
}

impl SessionStore {
    /// Create a store in the `Uninitialized` state. Nothing is subscribed until `initialize`.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (sender, _) = watch::channel(Session::Uninitialized);
        Self {
            provider,
            sender: Arc::new(sender),
            subscription: Mutex::new(None),
            initialized: AtomicBool::new(false),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to the provider's session notifications.
    ///
    /// Only the first call subscribes; later calls do nothing.
    pub fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!(provider = self.provider.name(), "Session store already initialized");
            return;
        }

        let sender = self.sender.clone();
        let closed = self.closed.clone();
        let handle = self
            .provider
            .on_session_change(Arc::new(move |identity: Option<Identity>| {
                if closed.load(Ordering::SeqCst) {
                    return;
                }
                apply_notification(&sender, identity);
            }));

        *self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        info!(provider = self.provider.name(), "Session store initialized");
    }

    /// Sign in through the provider
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let result = self.provider.sign_in(email, password).await;
        translate("sign_in", result.map(|identity| log_identity("Signed in", &identity)))
    }

    /// Create an account through the provider. The provider signs it in.
    pub async fn signup(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let result = self.provider.create_account(email, password).await;
        translate(
            "create_account",
            result.map(|identity| log_identity("Account created", &identity)),
        )
    }

    /// Sign out through the provider
    pub async fn logout(&self) -> Result<(), AuthError> {
        let result = self.provider.sign_out().await;
        if result.is_ok() {
            info!("Signed out");
        }
        translate("sign_out", result)
    }

    /// Latest known session
    pub fn current_session(&self) -> Session {
        self.sender.borrow().clone()
    }

    /// Receiver that observes every session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.sender.subscribe()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Release the provider subscription. Notifications after this are ignored.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);

        let handle = self
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(handle) = handle {
            handle.unsubscribe();
            info!(provider = self.provider.name(), "Session store shut down");
        }
    }
}

impl Drop for SessionStore {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn apply_notification(sender: &watch::Sender<Session>, identity: Option<Identity>) {
    let next = Session::from_notification(identity);
    let previous = sender.send_replace(next.clone());

    if previous.status() != next.status() {
        info!(
            from = ?previous.status(),
            to = ?next.status(),
            email = next.identity().map(|i| i.email.as_str()).unwrap_or(""),
            "Session changed"
        );
    } else {
        debug!(status = ?next.status(), "Session notification");
    }
}

fn log_identity(action: &str, identity: &Identity) {
    info!(user_id = %identity.id, email = %identity.email, "{}", action);
}

fn translate(operation: &str, result: ProviderResult<()>) -> Result<(), AuthError> {
    result.map_err(|err: ProviderError| {
        let auth = AuthError::from(&err);
        warn!(operation, code = %err.code(), error = %auth, "Provider rejected request");
        auth
    })
}
