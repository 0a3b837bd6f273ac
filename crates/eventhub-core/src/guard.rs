//! Route guard for protected views

use eventhub_api::{GuardPolicy, Route, Session};
use tracing::debug;

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the protected view
    Allow,
    /// Send the user somewhere else instead
    RedirectTo(Route),
    /// Session not resolved yet; render nothing and ask again on the next change
    Pending,
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Decide whether a protected view may render.
///
/// `Allow` iff the session is authenticated. Anything else, including a
/// session that has not been resolved yet, redirects to the auth view.
pub fn authorize(session: &Session) -> GuardDecision {
    authorize_with(session, GuardPolicy::FailClosed)
}

/// Same as [`authorize`] with an explicit policy for the unresolved session
pub fn authorize_with(session: &Session, policy: GuardPolicy) -> GuardDecision {
    let decision = match (session, policy) {
        (Session::Authenticated { .. }, _) => GuardDecision::Allow,
        (Session::Uninitialized, GuardPolicy::DeferWhileLoading) => GuardDecision::Pending,
        _ => GuardDecision::RedirectTo(Route::Auth),
    };

    debug!(status = ?session.status(), ?policy, ?decision, "Guard decision");
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_api::Identity;
    use eventhub_util::UserId;

    fn signed_in() -> Session {
        Session::Authenticated {
            identity: Identity::new(UserId::new("u1"), "a@b.com"),
        }
    }

    #[test]
    fn allow_iff_authenticated() {
        assert_eq!(authorize(&signed_in()), GuardDecision::Allow);
        assert_eq!(
            authorize(&Session::Unauthenticated),
            GuardDecision::RedirectTo(Route::Auth)
        );
        assert_eq!(
            authorize(&Session::Uninitialized),
            GuardDecision::RedirectTo(Route::Auth)
        );
    }

    #[test]
    fn defer_policy_waits_only_while_loading() {
        let policy = GuardPolicy::DeferWhileLoading;
        assert_eq!(
            authorize_with(&Session::Uninitialized, policy),
            GuardDecision::Pending
        );
        assert_eq!(
            authorize_with(&Session::Unauthenticated, policy),
            GuardDecision::RedirectTo(Route::Auth)
        );
        assert!(authorize_with(&signed_in(), policy).is_allowed());
    }

    #[test]
    fn decisions_track_the_session_each_time() {
        let mut session = signed_in();
        assert!(authorize(&session).is_allowed());

        session = Session::Unauthenticated;
        assert!(!authorize(&session).is_allowed());

        session = signed_in();
        assert!(authorize(&session).is_allowed());
    }
}
