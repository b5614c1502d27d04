//! Bearer token persistence in a JSON file
//!
//! The file holds a flat JSON object of string entries, e.g.
//! `{"token": "eyJ..."}`; the store only touches its own key and leaves any
//! other entry in place. The default location is the platform data
//! directory resolved by `directories::ProjectDirs`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;

use crate::error::{ArtdeskError, Result};
use crate::storage::TokenStore;

/// File name used inside the data directory.
const SESSION_FILE: &str = "session.json";

/// [`super::TokenStore`] backed by a JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    /// Store entries in the file at `path`.
    pub fn new<P: Into<PathBuf>>(path: P, key: &str) -> Self {
        Self {
            path: path.into(),
            key: key.to_string(),
        }
    }

    /// Store entries in `session.json` under the user's data directory.
    ///
    /// # Errors
    ///
    /// Returns [`ArtdeskError::Storage`] when no home directory can be
    /// determined.
    pub fn in_data_dir(key: &str) -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "artdesk", "artdesk")
            .ok_or_else(|| ArtdeskError::Storage("Could not determine data directory".into()))?;
        Ok(Self::new(proj_dirs.data_dir().join(SESSION_FILE), key))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))
            .map_err(|e| ArtdeskError::Storage(format!("{:#}", e)))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            ArtdeskError::Storage(format!(
                "Malformed session file {}: {}",
                self.path.display(),
                e
            ))
            .into()
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create data directory")
                .map_err(|e| ArtdeskError::Storage(format!("{:#}", e)))?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
            .map_err(|e| ArtdeskError::Storage(format!("{:#}", e)))?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(&self.key))
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), token.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(&self.key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
