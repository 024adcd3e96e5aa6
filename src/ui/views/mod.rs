//! Application views (screens).

mod login;
mod swipe;

pub use login::{LoginAction, LoginView};
pub use swipe::{clip_bio, Card, SwipeContent, SwipeView, BIO_LINES, EMPTY_MESSAGE};
