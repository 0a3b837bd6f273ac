//! Logical routes of the application

use eventhub_util::EventId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A destination the user can navigate to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    /// `/` - public landing view
    Landing,
    /// `/auth` - sign in / sign up, the unauthenticated entry view
    Auth,
    /// `/events` - protected area root
    Events,
    /// `/events/:id` - protected event details
    EventDetails { id: EventId },
    /// Any path that does not match
    NotFound { path: String },
}

impl Route {
    /// Parse a path such as `/events/3`. Trailing slashes are ignored.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Landing,
            ["auth"] => Route::Auth,
            ["events"] => Route::Events,
            ["events", id] => Route::EventDetails {
                id: EventId::new(*id),
            },
            _ => Route::NotFound {
                path: trimmed.to_string(),
            },
        }
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".into(),
            Route::Auth => "/auth".into(),
            Route::Events => "/events".into(),
            Route::EventDetails { id } => format!("/events/{}", id),
            Route::NotFound { path } => path.clone(),
        }
    }

    /// Whether rendering this route requires an authenticated session
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Events | Route::EventDetails { .. })
    }

    pub fn event_details(id: impl Into<EventId>) -> Self {
        Route::EventDetails { id: id.into() }
    }
}

/// How protected routes treat a session that has not been resolved yet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardPolicy {
    /// `Uninitialized` counts as signed out and is redirected
    #[default]
    FailClosed,
    /// `Uninitialized` defers rendering until the first notification
    DeferWhileLoading,
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_paths() {
        assert_eq!(Route::parse("/"), Route::Landing);
        assert_eq!(Route::parse(""), Route::Landing);
        assert_eq!(Route::parse("/auth"), Route::Auth);
        assert_eq!(Route::parse("/events"), Route::Events);
        assert_eq!(Route::parse("/events/"), Route::Events);
        assert_eq!(Route::parse("/events/3"), Route::event_details("3"));
    }

    #[test]
    fn parse_unknown_paths() {
        assert!(matches!(Route::parse("/settings"), Route::NotFound { .. }));
        assert!(matches!(Route::parse("/events/3/edit"), Route::NotFound { .. }));
    }

    #[test]
    fn path_round_trips_for_known_routes() {
        for route in [
            Route::Landing,
            Route::Auth,
            Route::Events,
            Route::event_details("42"),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn only_event_routes_are_protected() {
        assert!(!Route::Landing.is_protected());
        assert!(!Route::Auth.is_protected());
        assert!(Route::Events.is_protected());
        assert!(Route::event_details("1").is_protected());
        assert!(!Route::parse("/nope").is_protected());
    }
}
