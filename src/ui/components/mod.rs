//! Reusable UI components.

mod help_bar;
mod input;
mod match_dialog;
mod spinner;
mod toast;

pub use help_bar::render_context_help;
pub use input::TextInput;
pub use match_dialog::MatchDialog;
pub use spinner::Spinner;
pub use toast::{Toast, ToastLevel, Toasts};
