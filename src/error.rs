//! Application-level error type.
//!
//! Wraps the module errors and turns them into short messages for toasts
//! and the startup error printed before the terminal is taken over.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::realtime::RealtimeError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("{0}")]
    Realtime(#[from] RealtimeError),

    /// Session store I/O.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// A message fit for a toast: no status codes or transport jargon.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find a configuration directory.".to_string()
                }
                ConfigError::CreateDirError(_) | ConfigError::WriteError(_) => {
                    "Could not save configuration. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => "Could not read the configuration file.".to_string(),
                ConfigError::ParseError(_) => "The configuration file is not valid TOML.".to_string(),
                ConfigError::SerializeError(_) => "Could not save configuration.".to_string(),
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Api(e) => match e {
                ApiError::BadRequest(msg) => format!("The server rejected the request: {}", msg),
                ApiError::Unauthorized => "The server did not accept this user.".to_string(),
                ApiError::NotFound(what) => format!("'{}' was not found.", what),
                ApiError::RateLimited => "Too many requests. Try again in a moment.".to_string(),
                ApiError::ServerError(_) => "The server had a problem. Try again later.".to_string(),
                ApiError::Network(_) => "Could not reach the server.".to_string(),
                ApiError::InvalidUrl(_) => "The API URL in the configuration is invalid.".to_string(),
                ApiError::InvalidResponse(_) => "Unexpected response from the server.".to_string(),
            },
            AppError::Realtime(e) => match e {
                RealtimeError::InvalidUrl(_) => {
                    "The realtime URL in the configuration is invalid.".to_string()
                }
                RealtimeError::ConnectTimeout | RealtimeError::Client(_) => {
                    "Lost the match notification channel.".to_string()
                }
            },
            AppError::Io(_) => "A file operation failed. Check file permissions.".to_string(),
        }
    }

    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_) | ConfigError::ValidationError(_)) => {
                Some("Fix config.toml or remove it to use the defaults.")
            }
            AppError::Api(ApiError::RateLimited | ApiError::ServerError(_)) => {
                Some("Press 'r' to reload.")
            }
            AppError::Api(ApiError::Network(_)) | AppError::Realtime(_) => {
                Some("Check that the server is running and DEVSWIPE_API_URL is correct.")
            }
            AppError::Api(ApiError::Unauthorized) => Some("Press 'L' to sign in again."),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
