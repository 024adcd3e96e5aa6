//! Key binding definitions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Where keyboard focus currently is, for help hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// The sign-in form.
    Login,
    /// The card stack with at least one card.
    Swipe,
    /// The card stack with nothing left.
    SwipeEmpty,
    /// The match dialog is open.
    MatchDialog,
}

/// Get the help bar hints for a context.
pub fn get_context_hints(context: KeyContext) -> &'static str {
    match context {
        KeyContext::Login => "[Enter] sign in  [Esc] quit",
        KeyContext::Swipe => {
            "[←/h] dislike  [→/l] like  [o] avatar  [r] reload  [L] logout  [q] quit"
        }
        KeyContext::SwipeEmpty => "[r] reload  [L] logout  [q] quit",
        KeyContext::MatchDialog => "[Enter/Esc] close",
    }
}

/// Actions available on the swipe screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeKey {
    /// Like the front card.
    Like,
    /// Dislike the front card.
    Dislike,
    /// Open the front card's avatar in a browser.
    OpenAvatar,
    /// Fetch the queue again.
    Reload,
    /// Clear the session and return to sign-in.
    Logout,
    /// Leave the application.
    Quit,
}

/// Key binding configuration.
#[derive(Debug, Clone, Copy)]
pub struct KeyBindings {
    /// Whether vim-style bindings are enabled.
    pub vim_mode: bool,
}

impl KeyBindings {
    /// Create new key bindings.
    pub fn new(vim_mode: bool) -> Self {
        Self { vim_mode }
    }

    /// Map a key press on the swipe screen to an action.
    pub fn swipe_key(&self, key: KeyEvent) -> Option<SwipeKey> {
        if key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT)
        {
            return None;
        }

        match key.code {
            KeyCode::Right | KeyCode::Char('+') => Some(SwipeKey::Like),
            KeyCode::Left | KeyCode::Char('-') => Some(SwipeKey::Dislike),
            KeyCode::Char('l') if self.vim_mode => Some(SwipeKey::Like),
            KeyCode::Char('h') if self.vim_mode => Some(SwipeKey::Dislike),
            KeyCode::Char('o') => Some(SwipeKey::OpenAvatar),
            KeyCode::Char('r') => Some(SwipeKey::Reload),
            KeyCode::Char('L') => Some(SwipeKey::Logout),
            KeyCode::Char('q') => Some(SwipeKey::Quit),
            _ => None,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new(true)
    }
}
