//! Core state machines for EventHub
//!
//! This crate contains:
//! - Session store (Uninitialized -> Authenticated <-> Unauthenticated)
//! - Auth error translation from provider codes
//! - Route guard and navigation resolution
//! - Countdown engine, clocks and the per-view countdown board
//! - Credential form checks
//! - Event catalog

mod auth;
mod board;
mod catalog;
mod countdown;
mod credentials;
mod guard;
mod router;
mod session_store;

pub use auth::*;
pub use board::*;
pub use catalog::*;
pub use countdown::*;
pub use credentials::*;
pub use guard::*;
pub use router::*;
pub use session_store::*;
