//! Bearer token persistence via OS keyring
//!
//! Stores the token in the operating system's native credential store
//! (Keychain on macOS, Secret Service on Linux, Windows Credential Manager on
//! Windows). The keyring is stateless; [`KeyringTokenStore`] only carries the
//! service and entry names.

use crate::error::{ArtdeskError, Result};
use crate::storage::TokenStore;

/// Keyring service name shared by every entry this crate writes.
const SERVICE_NAME: &str = "artdesk";

/// [`super::TokenStore`] backed by the OS keyring
///
/// # Examples
///
/// ```no_run
/// use artdesk::storage::{KeyringTokenStore, TokenStore};
///
/// let store = KeyringTokenStore::new("token");
/// store.save("jwt-value").unwrap();
/// assert_eq!(store.load().unwrap().as_deref(), Some("jwt-value"));
/// store.clear().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
    key: String,
}

impl KeyringTokenStore {
    pub fn new(key: &str) -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
            key: key.to_string(),
        }
    }

    fn entry(&self) -> Result<::keyring::Entry> {
        ::keyring::Entry::new(&self.service, &self.key)
            .map_err(|e| ArtdeskError::Keyring(e).into())
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(::keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ArtdeskError::Keyring(e).into()),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .map_err(ArtdeskError::Keyring)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) => Ok(()),
            Err(::keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ArtdeskError::Keyring(e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_name_is_fixed() {
        let store = KeyringTokenStore::new("token");
        assert_eq!(store.service, "artdesk");
        assert_eq!(store.key, "token");
    }

    // -----------------------------------------------------------------------
    // Keyring integration tests  (require system keyring; skipped in CI)
    // -----------------------------------------------------------------------

    #[test]
    #[ignore = "requires system keyring"]
    fn test_save_load_clear_via_keyring() {
        let store = KeyringTokenStore::new("artdesk_integration_token");
        store.save("integration_jwt").expect("save");
        assert_eq!(
            store.load().expect("load").as_deref(),
            Some("integration_jwt")
        );
        store.clear().expect("clear");
        assert!(store.load().expect("load after clear").is_none());
    }

    #[test]
    #[ignore = "requires system keyring"]
    fn test_clear_is_idempotent() {
        let store = KeyringTokenStore::new("artdesk_idempotent_clear");
        store.clear().expect("first clear");
        store.clear().expect("second clear is no-op");
    }
}
