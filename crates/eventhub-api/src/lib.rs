//! Shared types for EventHub
//!
//! This crate defines the values passed between the core and its readers:
//! - Session and identity
//! - Countdown breakdowns and states
//! - Event records
//! - Logical routes

mod countdown;
mod event;
mod route;
mod session;

pub use countdown::*;
pub use event::*;
pub use route::*;
pub use session::*;
