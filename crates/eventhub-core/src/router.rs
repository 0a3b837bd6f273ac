//! Navigation resolution

use eventhub_api::{GuardPolicy, Route, Session};
use tracing::debug;

use crate::{authorize_with, GuardDecision};

/// What the shell should do with a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
    /// Show nothing until the session resolves
    Wait,
}

/// Resolve a navigation request against the current session.
///
/// Protected routes go through the guard. The landing view sends signed-in
/// users to the events list, and unknown paths behave like the landing view.
pub fn resolve(route: &Route, session: &Session, policy: GuardPolicy) -> Navigation {
    let navigation = match route {
        Route::Events | Route::EventDetails { .. } => match authorize_with(session, policy) {
            GuardDecision::Allow => Navigation::Render(route.clone()),
            GuardDecision::RedirectTo(target) => Navigation::Redirect(target),
            GuardDecision::Pending => Navigation::Wait,
        },
        Route::Landing if session.is_authenticated() => Navigation::Redirect(Route::Events),
        Route::Landing | Route::Auth => Navigation::Render(route.clone()),
        Route::NotFound { .. } => match resolve(&Route::Landing, session, policy) {
            Navigation::Render(target) => Navigation::Redirect(target),
            other => other,
        },
    };

    debug!(route = %route, ?navigation, "Resolved navigation");
    navigation
}

/// Follow redirects until a route renders or the session is still loading.
///
/// Redirect chains are at most two hops (unknown -> landing -> events).
pub fn settle(route: &Route, session: &Session, policy: GuardPolicy) -> Navigation {
    let mut current = route.clone();
    for _ in 0..MAX_REDIRECTS {
        match resolve(&current, session, policy) {
            Navigation::Redirect(next) => current = next,
            other => return other,
        }
    }
    Navigation::Render(Route::Landing)
}

const MAX_REDIRECTS: usize = 4;
