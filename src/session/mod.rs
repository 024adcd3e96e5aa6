//! Persisted session storage.
//!
//! A small key-value store that survives restarts. Each key is stored as its
//! own JSON file under the user's local data directory:
//! - Linux: `~/.local/share/devswipe/session/`
//! - macOS: `~/Library/Application Support/devswipe/session/`
//!
//! Logging out clears the whole store; there is no selective teardown.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Key under which the signed-in user's id is stored.
pub const SESSION_USER_KEY: &str = "user";

/// File extension for stored entries.
const ENTRY_EXTENSION: &str = "json";

/// A stored value with the time it was written.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionEntry {
    /// The stored value.
    value: String,
    /// When the entry was written (Unix timestamp).
    stored_at: u64,
}

/// Disk-backed session key-value store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    /// Directory holding one file per key.
    base_dir: PathBuf,
}

impl SessionStore {
    /// Open the store in the default location.
    pub fn open() -> io::Result<Self> {
        let base_dir = dirs::data_local_dir()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "No local data directory available")
            })?
            .join("devswipe")
            .join("session");

        Ok(Self { base_dir })
    }

    /// Open a store rooted at a specific directory.
    pub fn at(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The directory the store writes to.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the file path for a key.
    fn entry_path(&self, key: &str) -> PathBuf {
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.base_dir
            .join(format!("{}.{}", safe_key, ENTRY_EXTENSION))
    }

    /// Read a value.
    ///
    /// Returns `None` if the key is absent or its file is unreadable.
    pub fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    debug!("Failed to read session entry {:?}: {}", path, e);
                }
                return None;
            }
        };

        match serde_json::from_str::<SessionEntry>(&content) {
            Ok(entry) => {
                trace!(key, "Session hit");
                Some(entry.value)
            }
            Err(e) => {
                warn!("Corrupt session entry {:?}: {}", path, e);
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    /// Write a value, replacing any previous one.
    pub fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.base_dir)?;

        let entry = SessionEntry {
            value: value.to_string(),
            stored_at: unix_now(),
        };
        let content = serde_json::to_string(&entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(self.entry_path(key), content)?;
        debug!(key, "Session entry stored");
        Ok(())
    }

    /// Remove a single key.
    pub fn remove(&self, key: &str) -> io::Result<()> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!(key, "Session entry removed");
        }
        Ok(())
    }

    /// List all stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        if !self.base_dir.exists() {
            return Vec::new();
        }

        let mut keys: Vec<String> = walkdir::WalkDir::new(&self.base_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .is_some_and(|ext| ext == ENTRY_EXTENSION)
            })
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .collect();
        keys.sort();
        keys
    }

    /// Check whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Remove every stored key.
    pub fn clear(&self) -> io::Result<()> {
        if self.base_dir.exists() {
            fs::remove_dir_all(&self.base_dir)?;
            debug!("Cleared session store");
        }
        Ok(())
    }

    /// The signed-in user's id, if any.
    pub fn user(&self) -> Option<String> {
        self.get(SESSION_USER_KEY).filter(|u| !u.is_empty())
    }
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("session"));
        (dir, store)
    }

    #[test]
    fn test_get_missing_key() {
        let (_dir, store) = create_test_store();
        assert!(store.get("user").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let (_dir, store) = create_test_store();
        store.set("user", "u1").unwrap();
        assert_eq!(store.get("user").as_deref(), Some("u1"));
        assert_eq!(store.user().as_deref(), Some("u1"));
    }

    #[test]
    fn test_set_overwrites() {
        let (_dir, store) = create_test_store();
        store.set("user", "u1").unwrap();
        store.set("user", "u2").unwrap();
        assert_eq!(store.get("user").as_deref(), Some("u2"));
    }

    #[test]
    fn test_keys_sorted() {
        let (_dir, store) = create_test_store();
        store.set("user", "u1").unwrap();
        store.set("theme", "dark").unwrap();
        assert_eq!(store.keys(), vec!["theme".to_string(), "user".to_string()]);
    }

    #[test]
    fn test_remove_single_key() {
        let (_dir, store) = create_test_store();
        store.set("user", "u1").unwrap();
        store.set("theme", "dark").unwrap();
        store.remove("theme").unwrap();
        assert_eq!(store.keys(), vec!["user".to_string()]);
    }

    #[test]
    fn test_clear_removes_everything() {
        let (_dir, store) = create_test_store();
        store.set("user", "u1").unwrap();
        store.set("theme", "dark").unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_clear_on_missing_dir_is_ok() {
        let (_dir, store) = create_test_store();
        assert!(store.clear().is_ok());
    }

    #[test]
    fn test_corrupt_entry_is_dropped() {
        let (_dir, store) = create_test_store();
        fs::create_dir_all(store.base_dir()).unwrap();
        fs::write(store.base_dir().join("user.json"), "not json").unwrap();
        assert!(store.get("user").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_special_characters_in_key() {
        let (_dir, store) = create_test_store();
        store.set("a/b:c", "v").unwrap();
        assert_eq!(store.get("a/b:c").as_deref(), Some("v"));
    }

    #[test]
    fn test_empty_user_is_none() {
        let (_dir, store) = create_test_store();
        store.set(SESSION_USER_KEY, "").unwrap();
        assert!(store.user().is_none());
    }
}
