//! File-backed store holding a single API key.

use anyhow::{Context, Result};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored key. A missing, empty or unreadable file counts as "no key".
    pub fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let key = contents.trim();
                (!key.is_empty()).then(|| key.to_string())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "credential file unreadable");
                None
            }
        }
    }

    /// Replaces the stored key (truncate + write).
    pub fn save(&self, key: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create credential directory: {}", parent.display())
            })?;
        }

        fs::write(&self.path, key)
            .with_context(|| format!("Failed to write credential file: {}", self.path.display()))
    }

    pub fn clear(&self) -> Result<()> {
        self.save("")
    }
}
