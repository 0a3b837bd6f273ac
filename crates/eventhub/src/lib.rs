//! EventHub terminal shell
//!
//! The shell stands in for the browser pages:
//! - `app`: navigation state, guard checks and the countdowns on screen
//! - `command`: parsing of typed commands
//! - `render`: plain-text views
//! - `setup`: building runtime components from configuration

pub mod app;
pub mod command;
pub mod render;
pub mod setup;

pub use app::{App, Screen};
pub use command::{Command, CommandError, HELP};
