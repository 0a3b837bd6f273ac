//! Shared utilities for EventHub
//!
//! This crate provides:
//! - ID types (UserId, EventId, CountdownId)
//! - Time utilities (mock-aware wall clock, countdown formatting)
//! - Attempt throttling for sign-in
//! - Default paths for configuration
//! - Email address shape check

mod email;
mod ids;
mod paths;
mod rate_limit;
mod time;

pub use email::*;
pub use ids::*;
pub use paths::*;
pub use rate_limit::*;
pub use time::*;
