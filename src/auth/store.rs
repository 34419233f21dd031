//! Durable persistence for the session credential record.
//!
//! At most one record exists at a time, stored as JSON under a single
//! well-known file name in the app data directory. A missing file and
//! corrupt contents both read back as absence, never as errors.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

use super::session::Credentials;

/// Credential file name in the data directory
const SESSION_FILE: &str = "session.json";

pub struct TokenStore {
    data_dir: PathBuf,
}

impl TokenStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Write the record, overwriting any prior value.
    /// Callers treat a failure as "not saved", not as fatal.
    pub async fn save(&self, record: &Credentials) -> Result<()> {
        let path = self.store_path();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create data directory")?;
        }
        let contents = serde_json::to_string_pretty(record)?;
        tokio::fs::write(&path, contents)
            .await
            .context("Failed to write session file")?;
        Ok(())
    }

    /// Read the stored record, if any.
    pub async fn load(&self) -> Option<Credentials> {
        let path = self.store_path();
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read session file");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "Corrupt session file, treating as absent");
                None
            }
        }
    }

    /// Delete the stored record. Clearing an empty store is a no-op.
    pub async fn clear(&self) -> Result<()> {
        let path = self.store_path();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove session file"),
        }
    }

    fn store_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}
