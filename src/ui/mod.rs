//! User interface components and views.
//!
//! Everything here draws state owned by `App`; nothing in this module talks
//! to the network.

pub mod components;
pub mod theme;
mod views;

pub use components::{render_context_help, MatchDialog, Spinner, TextInput, Toasts};
pub use theme::Theme;
pub use views::{
    clip_bio, Card, LoginAction, LoginView, SwipeContent, SwipeView, BIO_LINES, EMPTY_MESSAGE,
};
