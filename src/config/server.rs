//! Matching service endpoint configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// Default address of the matching service.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3333";

/// Where the REST API and the real-time channel live.
///
/// Both usually point at the same host; they are separate so the socket can be
/// routed through a different proxy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the REST API (e.g., "http://localhost:3333").
    pub api_url: String,

    /// Base URL of the Socket.IO server. `http`/`https` are mapped to
    /// `ws`/`wss` when connecting.
    pub realtime_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_SERVER_URL.to_string(),
            realtime_url: DEFAULT_SERVER_URL.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a server configuration.
    pub fn new(api_url: impl Into<String>, realtime_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            realtime_url: realtime_url.into(),
        }
    }

    /// Validate both URLs.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        validate_url("api_url", &self.api_url)?;
        validate_url("realtime_url", &self.realtime_url)
    }
}

fn validate_url(field: &str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{} cannot be empty",
            field
        )));
    }

    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(ConfigError::ValidationError(format!(
            "{} '{}' must start with http:// or https://",
            field, url
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_localhost() {
        let server = ServerConfig::default();
        assert_eq!(server.api_url, "http://localhost:3333");
        assert_eq!(server.realtime_url, "http://localhost:3333");
        assert!(server.validate().is_ok());
    }

    #[test]
    fn test_empty_api_url_rejected() {
        let server = ServerConfig::new("", "http://localhost:3333");
        let err = server.validate().unwrap_err();
        assert!(err.to_string().contains("api_url cannot be empty"));
    }

    #[test]
    fn test_invalid_realtime_scheme_rejected() {
        let server = ServerConfig::new("http://localhost:3333", "ws://localhost:3333");
        let err = server.validate().unwrap_err();
        assert!(err.to_string().contains("realtime_url"));
        assert!(err.to_string().contains("must start with http"));
    }

    #[test]
    fn test_https_accepted() {
        let server = ServerConfig::new("https://api.example.com", "https://ws.example.com");
        assert!(server.validate().is_ok());
    }

    #[test]
    fn test_server_serialization() {
        let server = ServerConfig::new("https://api.example.com", "https://ws.example.com");
        let toml_str = toml::to_string(&server).unwrap();
        let parsed: ServerConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, server);
    }
}
