//! Shell-side session capabilities
//!
//! Outside a browser the CLI is the session owner: the bearer token lives in a
//! small JSON file, signing out deletes it, and a re-authentication "redirect"
//! becomes an instruction printed for the operator.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use storefront_api_client::{Redirector, SessionError, SessionHandle};
use tracing::debug;

/// Persisted session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub created_at: DateTime<Utc>,
}

/// File-backed session store
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/storefront/session.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("storefront").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session, if any
    pub fn load(&self) -> Result<Option<StoredSession>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };
        let session = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt session file {}", self.path.display()))?;
        Ok(Some(session))
    }

    /// Store a new session, replacing any existing one
    pub fn save(&self, access_token: impl Into<String>) -> Result<StoredSession> {
        let session = StoredSession {
            access_token: access_token.into(),
            created_at: Utc::now(),
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(&session)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(session)
    }

    /// Remove the stored session; returns whether one existed
    ///
    /// Missing files are not an error, so repeated sign-outs are harmless.
    pub fn clear(&self) -> io::Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl SessionHandle for SessionStore {
    async fn sign_out(&self) -> Result<(), SessionError> {
        let removed = self.clear()?;
        debug!(path = %self.path.display(), removed, "Session cleared");
        if removed {
            eprintln!(
                "{} stored session removed, run `storefront login` to sign in again",
                "Signed out:".yellow().bold()
            );
        }
        Ok(())
    }
}

/// Prints where to re-authenticate
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRedirector;

#[async_trait]
impl Redirector for ShellRedirector {
    async fn redirect(&self, url: &Url, _replace: bool) -> Result<(), SessionError> {
        eprintln!(
            "{} open {} to sign in again",
            "Re-authentication required:".yellow().bold(),
            url
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().unwrap().is_none());

        store.save("tok-1").unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "tok-1");

        assert!(store.clear().unwrap());
        assert!(!store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(SessionStore::new(path).load().is_err());
    }

    #[test]
    fn test_sign_out_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save("tok").unwrap();

        tokio_test::block_on(async {
            assert!(store.sign_out().await.is_ok());
            assert!(store.sign_out().await.is_ok());
        });
        assert!(!store.path().exists());
    }
}
