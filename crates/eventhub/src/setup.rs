//! Wiring from validated settings to runtime components

use eventhub_config::{ProviderSettings, Settings};
use eventhub_core::{CountdownEngine, StaticEventSource};
use eventhub_identity::{LocalIdentityProvider, LocalProviderSettings, ProviderResult};
use tracing::info;

/// Local provider with the configured accounts already created
pub fn local_provider(settings: &ProviderSettings) -> ProviderResult<LocalIdentityProvider> {
    let provider = LocalIdentityProvider::new(LocalProviderSettings {
        min_password_len: settings.min_password_len,
        max_failed_attempts: settings.max_failed_attempts,
        lockout: settings.lockout,
    });

    for account in &settings.accounts {
        provider.seed_account(&account.email, &account.password)?;
    }

    info!(
        accounts = provider.account_count(),
        max_failed_attempts = settings.max_failed_attempts,
        lockout_secs = settings.lockout.as_secs(),
        "Local identity provider ready"
    );
    Ok(provider)
}

pub fn event_source(settings: &Settings) -> StaticEventSource {
    StaticEventSource::new(settings.events.clone())
}

/// Engine on the system clock using the configured tick
pub fn countdown_engine(settings: &Settings) -> CountdownEngine {
    CountdownEngine::system().with_tick_interval(settings.app.tick)
}
