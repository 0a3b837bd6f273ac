//! Session and identity types

use eventhub_util::UserId;
use serde::{Deserialize, Serialize};

/// An authenticated account as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: String,
}

impl Identity {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
        }
    }
}

/// Authentication status tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No provider notification received yet
    Uninitialized,
    Authenticated,
    Unauthenticated,
}

/// The application's belief about who is signed in.
///
/// The identity only exists in the `Authenticated` variant, so status and
/// identity cannot disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Session {
    #[default]
    Uninitialized,
    Authenticated {
        identity: Identity,
    },
    Unauthenticated,
}

impl Session {
    /// Session implied by a provider notification
    pub fn from_notification(identity: Option<Identity>) -> Self {
        match identity {
            Some(identity) => Session::Authenticated { identity },
            None => Session::Unauthenticated,
        }
    }

    pub fn status(&self) -> SessionStatus {
        match self {
            Session::Uninitialized => SessionStatus::Uninitialized,
            Session::Authenticated { .. } => SessionStatus::Authenticated,
            Session::Unauthenticated => SessionStatus::Unauthenticated,
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated { identity } => Some(identity),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }
}
