//! Configuration system (layered: code > env > defaults).

pub mod preferences;

pub use preferences::UserPreferences;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::auth::{AuthStore, ClientCredentials, FileAuthStore, InstagramAuth};

const DEFAULT_API_BASE_URL: &str = "https://api.instagram.com";
const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.instagram.com";

pub const SCHEDULED_POSTS_FILE: &str = "scheduled_posts.json";
pub const SUBSCRIPTIONS_FILE: &str = "subscriptions.json";
pub const KICKOFF_LOG_FILE: &str = "latest_kickoff_task_outputs.json";

/// Runtime configuration: where state lives, which Instagram hosts to talk
/// to, and the app credentials used for the OAuth flow.
///
/// Paths are relative to the working directory unless made absolute.
#[derive(Debug, Clone)]
pub struct CrewConfig {
    pub credentials_dir: PathBuf,
    pub data_dir: PathBuf,
    pub preferences_path: PathBuf,
    /// Crew definition overriding the built-in one.
    pub crew_file: Option<PathBuf>,
    pub api_base_url: String,
    pub graph_base_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub auth_code: Option<String>,
}

impl Default for CrewConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CrewConfig {
    pub fn new() -> Self {
        Self {
            credentials_dir: PathBuf::from("credentials"),
            data_dir: PathBuf::from("data"),
            preferences_path: PathBuf::from("knowledge/user_preference.txt"),
            crew_file: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            client_id: None,
            client_secret: None,
            redirect_uri: None,
            auth_code: None,
        }
    }

    /// Load from environment variables (`INSTAGRAM_CLIENT_ID`, `INSTACREW_DATA_DIR`, ...).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::new();

        if let Some(dir) = get("INSTACREW_CREDENTIALS_DIR") {
            config.credentials_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("INSTACREW_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(path) = get("INSTACREW_PREFERENCES") {
            config.preferences_path = PathBuf::from(path);
        }
        config.crew_file = get("INSTACREW_CREW_FILE").map(PathBuf::from);

        if let Some(url) = get("INSTAGRAM_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Some(url) = get("INSTAGRAM_GRAPH_BASE_URL") {
            config.graph_base_url = url;
        }

        config.client_id = get("INSTAGRAM_CLIENT_ID");
        config.client_secret = get("INSTAGRAM_CLIENT_SECRET");
        config.redirect_uri = get("INSTAGRAM_REDIRECT_URI");
        config.auth_code = get("INSTAGRAM_AUTH_CODE");
        config
    }

    /// Root every state path under `dir`, mirroring the default layout.
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        self.credentials_dir = dir.join("credentials");
        self.data_dir = dir.join("data");
        self.preferences_path = dir.join("knowledge").join("user_preference.txt");
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_graph_base_url(mut self, url: impl Into<String>) -> Self {
        self.graph_base_url = url.into();
        self
    }

    pub fn with_crew_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.crew_file = Some(path.into());
        self
    }

    pub fn with_client(mut self, credentials: ClientCredentials) -> Self {
        self.client_id = Some(credentials.client_id);
        self.client_secret = Some(credentials.client_secret);
        self.redirect_uri = Some(credentials.redirect_uri);
        self.auth_code = credentials.code;
        self
    }

    /// App credentials, when id, secret and redirect URI are all known.
    pub fn client_credentials(&self) -> Option<ClientCredentials> {
        let mut credentials = ClientCredentials::new(
            self.client_id.clone()?,
            self.client_secret.clone()?,
            self.redirect_uri.clone()?,
        );
        credentials.code = self.auth_code.clone();
        Some(credentials)
    }

    pub fn auth_store(&self) -> Arc<dyn AuthStore> {
        Arc::new(FileAuthStore::new(self.credentials_dir.clone()))
    }

    /// OAuth client pointed at the configured hosts.
    pub fn instagram_auth(&self) -> InstagramAuth {
        let api = self.api_base_url.trim_end_matches('/');
        let graph = self.graph_base_url.trim_end_matches('/');
        InstagramAuth::new(self.auth_store())
            .with_authorize_url(format!("{api}/oauth/authorize"))
            .with_access_token_url(format!("{api}/oauth/access_token"))
            .with_long_lived_token_url(format!("{graph}/access_token"))
            .with_refresh_token_url(format!("{graph}/refresh_access_token"))
    }

    pub fn scheduled_posts_path(&self) -> PathBuf {
        self.data_dir.join(SCHEDULED_POSTS_FILE)
    }

    pub fn subscriptions_path(&self) -> PathBuf {
        self.data_dir.join(SUBSCRIPTIONS_FILE)
    }

    pub fn kickoff_log_path(&self) -> PathBuf {
        self.data_dir.join(KICKOFF_LOG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_working_directory_layout() {
        let config = CrewConfig::new();
        assert_eq!(config.credentials_dir, PathBuf::from("credentials"));
        assert_eq!(config.scheduled_posts_path(), PathBuf::from("data/scheduled_posts.json"));
        assert_eq!(
            config.preferences_path,
            PathBuf::from("knowledge/user_preference.txt")
        );
        assert!(config.client_credentials().is_none());
    }

    #[test]
    fn lookup_overrides_paths_and_client() {
        let config = CrewConfig::from_lookup(lookup(&[
            ("INSTACREW_DATA_DIR", "/tmp/crew-data"),
            ("INSTAGRAM_CLIENT_ID", "123"),
            ("INSTAGRAM_CLIENT_SECRET", "shh"),
            ("INSTAGRAM_REDIRECT_URI", "https://localhost/cb"),
            ("INSTAGRAM_AUTH_CODE", ""),
        ]));
        assert_eq!(config.kickoff_log_path(), PathBuf::from("/tmp/crew-data/latest_kickoff_task_outputs.json"));
        let creds = config.client_credentials().unwrap();
        assert_eq!(creds.client_id, "123");
        assert_eq!(creds.code, None);
    }

    #[test]
    fn partial_client_is_not_usable() {
        let config = CrewConfig::from_lookup(lookup(&[("INSTAGRAM_CLIENT_ID", "123")]));
        assert!(config.client_credentials().is_none());
    }

    #[test]
    fn base_dir_roots_every_path() {
        let dir = TempDir::new().unwrap();
        let config = CrewConfig::new().with_base_dir(dir.path());
        assert!(config.credentials_dir.starts_with(dir.path()));
        assert!(config.subscriptions_path().starts_with(dir.path()));
        assert!(config.preferences_path.starts_with(dir.path()));
    }
}
