//! devswipe: swipe through developer profiles from the terminal.
//!
//! The binary wires these modules together; they are exposed as a library so
//! integration tests can drive the REST client and the match subscription
//! against fake servers.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod realtime;
pub mod session;
pub mod swipe;
pub mod tasks;
pub mod ui;
