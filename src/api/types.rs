//! Matching service request and response types.
//!
//! These types model the JSON documents exchanged with the `/devs` endpoints
//! and carried by real-time `match` events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A developer profile as returned by the matching service.
///
/// Returned by `GET /devs` (as an array), `POST /devs` and pushed as the
/// payload of a `match` event. Match payloads may omit everything except the
/// id and name, so the remaining fields are optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dev {
    /// The backend identifier (`_id`).
    #[serde(rename = "_id")]
    pub id: String,
    /// The display name.
    #[serde(default)]
    pub name: String,
    /// The GitHub handle, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Short biography.
    #[serde(default)]
    pub bio: Option<String>,
    /// Avatar image URI.
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Dev {
    /// Create a profile with only an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            user: None,
            bio: None,
            avatar: None,
        }
    }

    /// Set the biography.
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    /// Set the avatar URI.
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// The biography, or an empty string when the backend sent none.
    pub fn bio_text(&self) -> &str {
        self.bio.as_deref().unwrap_or("")
    }

    /// The name to show on a card, falling back to the GitHub handle.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.user.as_deref().unwrap_or(&self.id)
        } else {
            &self.name
        }
    }
}

impl fmt::Display for Dev {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.id)
    }
}

/// Request body for `POST /devs`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// The GitHub username to sign in as.
    pub username: String,
}

/// The two decisions a user can record about a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Positive decision (`POST /devs/{id}/likes`).
    Like,
    /// Negative decision (`POST /devs/{id}/dislikes`).
    Dislike,
}

impl Decision {
    /// The path segment the decision is posted to.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Decision::Like => "likes",
            Decision::Dislike => "dislikes",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Like => write!(f, "like"),
            Decision::Dislike => write!(f, "dislike"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_deserialize_full() {
        let json = r#"{"_id":"a","name":"A","bio":"x","avatar":"url","user":"alice","likes":[]}"#;
        let dev: Dev = serde_json::from_str(json).unwrap();
        assert_eq!(dev.id, "a");
        assert_eq!(dev.name, "A");
        assert_eq!(dev.bio.as_deref(), Some("x"));
        assert_eq!(dev.avatar.as_deref(), Some("url"));
        assert_eq!(dev.user.as_deref(), Some("alice"));
    }

    #[test]
    fn test_dev_deserialize_match_payload() {
        let dev: Dev = serde_json::from_str(r#"{"_id":"b","name":"B"}"#).unwrap();
        assert_eq!(dev, Dev::new("b", "B"));
        assert_eq!(dev.bio_text(), "");
    }

    #[test]
    fn test_dev_deserialize_null_bio() {
        let dev: Dev = serde_json::from_str(r#"{"_id":"c","name":"C","bio":null}"#).unwrap();
        assert!(dev.bio.is_none());
    }

    #[test]
    fn test_dev_serializes_id_as_underscore_id() {
        let json = serde_json::to_value(Dev::new("a", "A")).unwrap();
        assert_eq!(json["_id"], "a");
        assert!(json.get("user").is_none());
    }

    #[test]
    fn test_display_name_fallback() {
        let mut dev = Dev::new("id1", "");
        assert_eq!(dev.display_name(), "id1");
        dev.user = Some("octocat".to_string());
        assert_eq!(dev.display_name(), "octocat");
    }

    #[test]
    fn test_decision_path_segment() {
        assert_eq!(Decision::Like.path_segment(), "likes");
        assert_eq!(Decision::Dislike.path_segment(), "dislikes");
    }
}
