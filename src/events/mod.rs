//! Event handling for the application.
//!
//! This module handles keyboard input, terminal resizes and the periodic tick.

mod handler;
mod keys;

use crossterm::event::KeyEvent;

pub use handler::EventHandler;
pub use keys::{get_context_hints, KeyBindings, KeyContext, SwipeKey};

/// Terminal-side events fed into `App::update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// Nothing happened within the tick rate.
    Tick,
    /// The application should exit.
    Quit,
}
