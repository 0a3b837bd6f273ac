//! Shell application state
//!
//! `App` is what a browser page tree would be: it remembers the requested
//! route, asks the router what to show for the current session, and keeps
//! exactly the countdowns the visible view needs.

use eventhub_api::{Event, GuardPolicy, Route, Session};
use eventhub_core::{
    settle, AuthError, CatalogError, CountdownBoard, CountdownEngine, CredentialForm,
    EventSource, FormMode, Navigation, SessionStore,
};
use eventhub_util::EventId;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What is currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Session not resolved yet
    Loading,
    Landing,
    Auth,
    Events(Vec<Event>),
    EventDetails(Event),
    EventNotFound(EventId),
    /// The event source failed
    Unavailable(String),
}

pub struct App {
    store: Arc<SessionStore>,
    catalog: Arc<dyn EventSource>,
    board: CountdownBoard,
    policy: GuardPolicy,
    requested: Route,
    screen: Screen,
    auth_mode: FormMode,
    auth_error: Option<String>,
}

impl App {
    pub fn new(
        store: Arc<SessionStore>,
        catalog: Arc<dyn EventSource>,
        engine: CountdownEngine,
        policy: GuardPolicy,
    ) -> Self {
        Self {
            store,
            catalog,
            board: CountdownBoard::new(engine),
            policy,
            requested: Route::Landing,
            screen: Screen::Loading,
            auth_mode: FormMode::default(),
            auth_error: None,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The route being shown, or waited for
    pub fn route(&self) -> &Route {
        &self.requested
    }

    pub fn session(&self) -> Session {
        self.store.current_session()
    }

    pub fn board(&self) -> &CountdownBoard {
        &self.board
    }

    pub fn auth_mode(&self) -> FormMode {
        self.auth_mode
    }

    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    /// Go to `route`, subject to the guard
    pub async fn navigate(&mut self, route: Route) {
        if route != self.requested {
            debug!(from = %self.requested, to = %route, "Navigate");
        }
        if route == Route::Auth && self.requested != Route::Auth {
            self.auth_error = None;
        }
        self.requested = route;
        self.refresh().await;
    }

    /// Re-run the guard for the requested route, e.g. after a session change
    pub async fn refresh(&mut self) {
        let session = self.store.current_session();
        let screen = match settle(&self.requested, &session, self.policy) {
            Navigation::Render(route) => {
                if route != self.requested {
                    info!(requested = %self.requested, shown = %route, "Redirected");
                    self.requested = route;
                }
                self.load(&self.requested.clone()).await
            }
            Navigation::Wait => Screen::Loading,
            // settle only returns Render or Wait
            Navigation::Redirect(route) => {
                self.requested = route;
                Screen::Loading
            }
        };

        self.sync_countdowns(&screen);
        self.screen = screen;
    }

    async fn load(&self, route: &Route) -> Screen {
        match route {
            Route::Landing | Route::NotFound { .. } => Screen::Landing,
            Route::Auth => Screen::Auth,
            Route::Events => match self.catalog.fetch_events().await {
                Ok(events) => Screen::Events(events),
                Err(e) => unavailable(e),
            },
            Route::EventDetails { id } => match self.catalog.find(id).await {
                Ok(event) => Screen::EventDetails(event),
                Err(CatalogError::NotFound(id)) => Screen::EventNotFound(id),
                Err(e) => unavailable(e),
            },
        }
    }

    /// Keep one countdown per event on screen and none for anything else
    fn sync_countdowns(&mut self, screen: &Screen) {
        let visible: Vec<&Event> = match screen {
            Screen::Events(events) => events.iter().collect(),
            Screen::EventDetails(event) => vec![event],
            _ => Vec::new(),
        };

        if visible.is_empty() {
            self.board.clear();
            return;
        }

        let keep: HashSet<&EventId> = visible.iter().map(|e| &e.id).collect();
        let stale: Vec<EventId> = self
            .board_ids()
            .into_iter()
            .filter(|id| !keep.contains(id))
            .collect();
        for id in stale {
            self.board.unmount(&id);
        }

        for event in visible {
            self.board.mount(event.id.clone(), event.start);
        }
    }

    fn board_ids(&self) -> Vec<EventId> {
        self.board.ids().cloned().collect()
    }

    /// Switch between sign-in and sign-up, dropping any shown error
    pub fn toggle_auth_mode(&mut self) {
        self.auth_mode = self.auth_mode.toggled();
        self.auth_error = None;
    }

    /// Submit the auth form. On success the events list is shown.
    pub async fn submit(&mut self, form: CredentialForm) -> Result<(), String> {
        self.auth_mode = form.mode;

        if let Err(e) = form.validate() {
            return Err(self.fail_auth(e.to_string()));
        }

        let result = match form.mode {
            FormMode::SignIn => self.store.login(&form.email, &form.password).await,
            FormMode::SignUp => self.store.signup(&form.email, &form.password).await,
        };

        match result {
            Ok(()) => {
                self.auth_error = None;
                self.navigate(Route::Events).await;
                Ok(())
            }
            Err(e) => Err(self.fail_auth(e.to_string())),
        }
    }

    fn fail_auth(&mut self, message: String) -> String {
        self.auth_error = Some(message.clone());
        message
    }

    /// Sign out and go back to the landing view
    pub async fn logout(&mut self) -> Result<(), AuthError> {
        match self.store.logout().await {
            Ok(()) => {
                self.navigate(Route::Landing).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to log out");
                Err(e)
            }
        }
    }

    /// Stop every countdown; used on shutdown
    pub fn close(&mut self) {
        self.board.clear();
    }
}

fn unavailable(err: CatalogError) -> Screen {
    warn!(error = %err, "Event source failed");
    Screen::Unavailable(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};
    use eventhub_core::{ManualClock, StaticEventSource};
    use eventhub_identity::{codes, MockIdentityProvider};

    fn t0() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    fn event(id: &str, days_ahead: i64) -> Event {
        Event {
            id: EventId::new(id),
            title: format!("Event {}", id),
            start: t0() + chrono::Duration::days(days_ahead),
            location: "Downtown Event Space".into(),
            description: String::new(),
            address: None,
            details: None,
            organizer: None,
            capacity: None,
            category: None,
        }
    }

    fn app_with(provider: Arc<MockIdentityProvider>) -> App {
        let store = Arc::new(SessionStore::new(provider));
        store.initialize();
        let catalog = Arc::new(StaticEventSource::new(vec![event("1", 3), event("2", 10)]));
        let engine = CountdownEngine::new(Arc::new(ManualClock::new(t0())));
        App::new(store, catalog, engine, GuardPolicy::FailClosed)
    }

    #[tokio::test(start_paused = true)]
    async fn events_redirect_to_auth_when_signed_out() {
        let mut app = app_with(Arc::new(MockIdentityProvider::new()));

        app.navigate(Route::Events).await;

        assert_eq!(app.route(), &Route::Auth);
        assert_eq!(app.screen(), &Screen::Auth);
        assert!(app.board().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn events_mount_one_countdown_each() {
        let mut app = app_with(Arc::new(MockIdentityProvider::new().with_signed_in("a@b.com")));

        app.navigate(Route::Events).await;
        assert!(matches!(app.screen(), Screen::Events(events) if events.len() == 2));
        assert_eq!(app.board().active_count(), 2);

        app.navigate(Route::event_details("2")).await;
        assert!(matches!(app.screen(), Screen::EventDetails(e) if e.id.as_str() == "2"));
        assert_eq!(app.board().len(), 1);

        app.navigate(Route::Auth).await;
        assert!(app.board().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_event_shows_not_found() {
        let mut app = app_with(Arc::new(MockIdentityProvider::new().with_signed_in("a@b.com")));

        app.navigate(Route::event_details("99")).await;
        assert_eq!(app.screen(), &Screen::EventNotFound(EventId::new("99")));
        assert!(app.board().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn submit_validates_before_calling_provider() {
        let provider = Arc::new(MockIdentityProvider::new());
        let mut app = app_with(provider.clone());
        app.navigate(Route::Auth).await;

        let err = app
            .submit(CredentialForm::sign_in("a@b.com", "short"))
            .await
            .unwrap_err();

        assert_eq!(err, "Password must be at least 6 characters long");
        assert_eq!(app.auth_error(), Some(err.as_str()));
        assert_eq!(provider.sign_in_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_shows_provider_error() {
        let provider = Arc::new(MockIdentityProvider::new());
        provider.set_fail_sign_in(Some(codes::USER_NOT_FOUND));
        let mut app = app_with(provider);
        app.navigate(Route::Auth).await;

        let err = app
            .submit(CredentialForm::sign_in("a@b.com", "secret1"))
            .await
            .unwrap_err();

        assert_eq!(err, "No account found with this email");
        assert_eq!(app.screen(), &Screen::Auth);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_switches_form_and_clears_error() {
        let mut app = app_with(Arc::new(MockIdentityProvider::new()));
        app.navigate(Route::Auth).await;
        app.submit(CredentialForm::sign_in("a@b", "secret1"))
            .await
            .unwrap_err();
        assert!(app.auth_error().is_some());

        app.toggle_auth_mode();
        assert_eq!(app.auth_mode(), FormMode::SignUp);
        assert_eq!(app.auth_error(), None);
        assert!(crate::render::render(&app).contains("Create Account"));

        app.toggle_auth_mode();
        assert_eq!(app.auth_mode(), FormMode::SignIn);
    }

    #[tokio::test(start_paused = true)]
    async fn login_then_logout_round_trip() {
        let mut app = app_with(Arc::new(MockIdentityProvider::new()));
        app.navigate(Route::Auth).await;

        app.submit(CredentialForm::sign_in("a@b.com", "secret1"))
            .await
            .unwrap();
        assert_eq!(app.route(), &Route::Events);

        app.logout().await.unwrap();
        assert_eq!(app.route(), &Route::Landing);
        assert!(app.board().is_empty());

        app.navigate(Route::Events).await;
        assert_eq!(app.route(), &Route::Auth);
    }

    #[tokio::test(start_paused = true)]
    async fn session_loss_redirects_on_refresh() {
        let provider = Arc::new(MockIdentityProvider::new().with_signed_in("a@b.com"));
        let mut app = app_with(provider.clone());
        app.navigate(Route::Events).await;
        assert_eq!(app.board().len(), 2);

        provider.emit(None);
        app.refresh().await;

        assert_eq!(app.route(), &Route::Auth);
        assert!(app.board().is_empty());
    }
}
