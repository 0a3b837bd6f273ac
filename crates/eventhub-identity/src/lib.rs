//! Identity provider capability for EventHub
//!
//! This crate defines the interface between the session store and whatever
//! performs credential checks. The core only depends on the trait; two
//! implementations ship here:
//! - `LocalIdentityProvider`: in-process accounts, used by the shell
//! - `MockIdentityProvider`: scriptable, used by tests

mod listeners;
mod local;
mod mock;
mod traits;

pub use listeners::*;
pub use local::*;
pub use mock::*;
pub use traits::*;
