use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::credentials::ClientCredentials;
use super::error::AuthError;
use super::token::Token;
use crate::util::fs::{atomic_write, read_optional};

pub const CREDENTIALS_FILE: &str = "instagram_credentials.json";
pub const TOKENS_FILE: &str = "instagram_tokens.json";

/// Storage abstraction for the app credentials and the access token.
pub trait AuthStore: Send + Sync {
    fn load_credentials(&self) -> Result<Option<ClientCredentials>, AuthError>;
    fn save_credentials(&self, credentials: &ClientCredentials) -> Result<(), AuthError>;
    fn load_token(&self) -> Result<Option<Token>, AuthError>;
    fn save_token(&self, token: &Token) -> Result<(), AuthError>;
}

/// File-backed store writing plain JSON files into one directory.
///
/// # Example
/// ```no_run
/// use instacrew::auth::{AuthStore, ClientCredentials, FileAuthStore};
///
/// let store = FileAuthStore::new("credentials");
/// store.save_credentials(&ClientCredentials::new("id", "secret", "https://localhost/cb"))?;
/// # Ok::<(), instacrew::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileAuthStore {
    dir: PathBuf,
}

impl FileAuthStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE)
    }

    pub fn token_path(&self) -> PathBuf {
        self.dir.join(TOKENS_FILE)
    }

    fn read<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AuthError> {
        match read_optional(path)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(path: &Path, value: &T) -> Result<(), AuthError> {
        let serialized = serde_json::to_vec_pretty(value)?;
        atomic_write(path, &serialized)?;
        tracing::debug!(path = %path.display(), "wrote auth file");
        Ok(())
    }
}

impl AuthStore for FileAuthStore {
    fn load_credentials(&self) -> Result<Option<ClientCredentials>, AuthError> {
        Self::read(&self.credentials_path())
    }

    fn save_credentials(&self, credentials: &ClientCredentials) -> Result<(), AuthError> {
        Self::write(&self.credentials_path(), credentials)
    }

    fn load_token(&self) -> Result<Option<Token>, AuthError> {
        Self::read(&self.token_path())
    }

    fn save_token(&self, token: &Token) -> Result<(), AuthError> {
        Self::write(&self.token_path(), token)
    }
}
