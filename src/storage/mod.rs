//! Durable bearer-token persistence
//!
//! The session token is the only state that outlives the process. It lives
//! under a single fixed key in one of three backends:
//!
//! - [`keyring_store::KeyringTokenStore`] -- OS native credential store.
//! - [`file_store::FileTokenStore`] -- JSON file in the user data directory.
//! - [`MemoryTokenStore`] -- process-local map, for tests and dry runs.
//!
//! The backend is picked from [`StorageConfig`] by [`open_token_store`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{StorageConfig, TokenBackend};
use crate::error::Result;

pub mod file_store;
pub mod keyring_store;

pub use file_store::FileTokenStore;
pub use keyring_store::KeyringTokenStore;

/// Key under which the bearer token is stored by default.
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// A single durable key-value entry holding the bearer token.
pub trait TokenStore: Send + Sync {
    /// Read the token. `Ok(None)` means nothing is stored.
    fn load(&self) -> Result<Option<String>>;

    /// Store `token`, replacing any previous value.
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the token. Removing an absent token is not an error.
    fn clear(&self) -> Result<()>;
}

/// Build the token store selected by the configuration.
///
/// # Errors
///
/// Returns [`crate::error::ArtdeskError::Storage`] if the file backend is
/// selected and no data directory can be determined.
pub fn open_token_store(config: &StorageConfig) -> Result<Box<dyn TokenStore>> {
    match config.backend {
        TokenBackend::Keyring => {
            tracing::debug!("Using keyring token store (key: {})", config.key);
            Ok(Box::new(KeyringTokenStore::new(&config.key)))
        }
        TokenBackend::File => {
            let store = match &config.path {
                Some(path) => FileTokenStore::new(path, &config.key),
                None => FileTokenStore::in_data_dir(&config.key)?,
            };
            tracing::debug!("Using file token store at {}", store.path().display());
            Ok(Box::new(store))
        }
        TokenBackend::Memory => {
            tracing::debug!("Using in-memory token store");
            Ok(Box::new(MemoryTokenStore::with_key(&config.key)))
        }
    }
}

/// In-memory [`TokenStore`]
///
/// Clones share the same map, so a test can observe what the code under
/// test persisted.
#[derive(Debug, Clone)]
pub struct MemoryTokenStore {
    key: String,
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::with_key(DEFAULT_TOKEN_KEY)
    }
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: &str) -> Self {
        Self {
            key: key.to_string(),
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.entries().get(&self.key).cloned())
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entries().insert(self.key.clone(), token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries().remove(&self.key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save("abc").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));

        store.save("def").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("def"));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store_clones_share_entries() {
        let store = MemoryTokenStore::new();
        let observer = store.clone();
        store.save("shared").unwrap();
        assert_eq!(observer.load().unwrap().as_deref(), Some("shared"));
    }

    #[test]
    fn test_open_memory_backend() {
        let config = StorageConfig {
            backend: TokenBackend::Memory,
            key: "token".to_string(),
            path: None,
        };
        let store = open_token_store(&config).unwrap();
        store.save("x").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_open_file_backend_with_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = StorageConfig {
            backend: TokenBackend::File,
            key: "token".to_string(),
            path: Some(dir.path().join("session.json")),
        };
        let store = open_token_store(&config).unwrap();
        store.save("persisted").unwrap();
        assert!(dir.path().join("session.json").exists());
    }
}
