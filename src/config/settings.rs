//! Application settings configuration.

use serde::{Deserialize, Serialize};

/// Upper bound for `stack_depth`; deeper cards would not be visible anyway.
pub const MAX_STACK_DEPTH: usize = 10;

/// Application-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Whether `h`/`l` also dislike/like.
    pub vim_mode: bool,
    /// Event loop tick rate in milliseconds.
    pub tick_rate_ms: u64,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// How many cards of the stack are drawn, front card included.
    pub stack_depth: usize,
    /// Longest wait between match channel reconnects, in seconds.
    pub max_reconnect_delay_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vim_mode: true,
            tick_rate_ms: 100,
            request_timeout_secs: 30,
            stack_depth: 3,
            max_reconnect_delay_secs: 30,
        }
    }
}
