//! Credential Store
//!
//! Persists the `{token, owner, repo}` triple as one JSON object under a
//! fixed key. The key is materialised as a file in the user config
//! directory; nothing else lives in it and it carries no schema version.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Fixed storage key for the credential object
pub const STORAGE_KEY: &str = "fitness_tracker_gh_config";

/// Personal access token plus the repository used as the database
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GithubCredentials {
    pub token: String,
    pub owner: String,
    pub repo: String,
}

impl GithubCredentials {
    pub fn new(
        token: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// `owner/repo`
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for GithubCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubCredentials")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish()
    }
}

/// File-backed credential storage
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/gitfit/fitness_tracker_gh_config.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("gitfit"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(format!("{}.json", STORAGE_KEY))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored credentials, `None` if nothing has been stored
    pub fn load(&self) -> Result<Option<GithubCredentials>, CredentialError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let credentials = serde_json::from_str(&content)?;
        Ok(Some(credentials))
    }

    /// Read the stored credentials, failing when absent
    pub fn require(&self) -> Result<GithubCredentials, CredentialError> {
        self.load()?.ok_or(CredentialError::NotConfigured)
    }

    /// Overwrite the stored credentials
    pub fn save(&self, credentials: &GithubCredentials) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(credentials)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!("Stored credentials for {} at {:?}", credentials.slug(), self.path);
        Ok(())
    }

    /// Forget the stored credentials. Clearing twice is not an error.
    pub fn clear(&self) -> Result<(), CredentialError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

/// Credential storage errors
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid credential file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No GitHub credentials stored; run `gitfit setup` first")]
    NotConfigured,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("nested").join("creds.json"));
        let creds = GithubCredentials::new("ghp_secret", "ada", "fitness-data");

        store.save(&creds).unwrap();
        assert_eq!(store.load().unwrap(), Some(creds));
    }

    #[test]
    fn test_stored_shape_is_flat_object() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("creds.json"));
        store
            .save(&GithubCredentials::new("t", "o", "r"))
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!({ "token": "t", "owner": "o", "repo": "r" })
        );
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
        assert!(matches!(store.require(), Err(CredentialError::NotConfigured)));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("creds.json"));
        store.save(&GithubCredentials::new("t", "o", "r")).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = CredentialStore::new(path);
        assert!(matches!(store.load(), Err(CredentialError::Json(_))));
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = GithubCredentials::new("ghp_secret", "ada", "fit");
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("ghp_secret"));
        assert!(printed.contains("ada"));
    }

    #[test]
    fn test_default_path_uses_storage_key() {
        let path = CredentialStore::default_path();
        assert!(path.to_string_lossy().ends_with("fitness_tracker_gh_config.json"));
    }
}
