//! Tests for configuration and preference loading.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use instacrew::config::{CrewConfig, UserPreferences};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_ENV_VARS: [&str; 10] = [
    "INSTAGRAM_CLIENT_ID",
    "INSTAGRAM_CLIENT_SECRET",
    "INSTAGRAM_REDIRECT_URI",
    "INSTAGRAM_AUTH_CODE",
    "INSTAGRAM_API_BASE_URL",
    "INSTAGRAM_GRAPH_BASE_URL",
    "INSTACREW_CREDENTIALS_DIR",
    "INSTACREW_DATA_DIR",
    "INSTACREW_PREFERENCES",
    "INSTACREW_CREW_FILE",
];

struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    fn capture(keys: &[&str]) -> Self {
        let saved = keys
            .iter()
            .map(|key| ((*key).to_string(), std::env::var(key).ok()))
            .collect();
        Self { saved }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(v) => std::env::set_var(key, v),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn env_lock_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn clear_env() -> EnvGuard {
    let guard = EnvGuard::capture(&CONFIG_ENV_VARS);
    for key in CONFIG_ENV_VARS {
        std::env::remove_var(key);
    }
    guard
}

#[test]
fn from_env_reads_client_and_paths() {
    let _lock = env_lock_guard();
    let _env = clear_env();
    std::env::set_var("INSTAGRAM_CLIENT_ID", "app-id");
    std::env::set_var("INSTAGRAM_CLIENT_SECRET", "app-secret");
    std::env::set_var("INSTAGRAM_REDIRECT_URI", "https://localhost:8000/callback");
    std::env::set_var("INSTAGRAM_AUTH_CODE", "  ");
    std::env::set_var("INSTACREW_DATA_DIR", "/var/lib/instacrew");

    let config = CrewConfig::from_env();
    let credentials = config.client_credentials().expect("client credentials");
    assert_eq!(credentials.client_id, "app-id");
    assert_eq!(credentials.code, None);
    assert_eq!(
        config.kickoff_log_path(),
        PathBuf::from("/var/lib/instacrew/latest_kickoff_task_outputs.json")
    );
    assert_eq!(config.credentials_dir, PathBuf::from("credentials"));
}

#[test]
fn missing_secret_means_no_client_credentials() {
    let _lock = env_lock_guard();
    let _env = clear_env();
    std::env::set_var("INSTAGRAM_CLIENT_ID", "app-id");

    let config = CrewConfig::from_env();
    assert!(config.client_credentials().is_none());
}

#[test]
fn crew_file_from_env_is_loaded() {
    let _lock = env_lock_guard();
    let _env = clear_env();
    let dir = TempDir::new().expect("temp dir");
    let crew_file = dir.path().join("crew.toml");
    std::fs::write(
        &crew_file,
        r#"
            name = "captions only"

            [[agents]]
            name = "writer"
            role = "Caption Writer"
            tools = ["instagram_caption"]

            [[tasks]]
            name = "caption"
            agent = "writer"
            tool = "instagram_caption"
            description = "Caption about {topic}"
            [tasks.arguments]
            topic = "{topic}"
        "#,
    )
    .expect("write crew file");
    std::env::set_var("INSTACREW_CREW_FILE", &crew_file);

    let config = CrewConfig::from_env();
    let crew = instacrew::crew::Crew::from_config(&config).expect("crew");
    assert_eq!(crew.name(), "captions only");
    assert_eq!(crew.tasks().len(), 1);
}

#[test]
fn preference_file_drives_inputs() {
    let dir = TempDir::new().expect("temp dir");
    let config = CrewConfig::new().with_base_dir(dir.path());
    std::fs::create_dir_all(config.preferences_path.parent().expect("parent")).expect("mkdir");
    std::fs::write(
        &config.preferences_path,
        "## Content Preferences\n\
         Content Topics: Photography, Travel\n\
         Tone: casual\n\
         \n\
         ## Monitoring Preferences\n\
         Hashtags to Monitor: #photo, #travel\n\
         Accounts to Monitor: @natgeo\n",
    )
    .expect("write preferences");

    let inputs = UserPreferences::load(&config.preferences_path)
        .expect("load")
        .to_inputs(2026);
    assert_eq!(inputs["topic"], "Photography");
    assert_eq!(inputs["tone"], "casual");
    assert_eq!(inputs["hashtags_count"], "5");
    assert_eq!(inputs["hashtags_to_monitor"], "#photo, #travel");
    assert_eq!(inputs["accounts_to_monitor"], "@natgeo");
}

#[test]
fn missing_preference_file_uses_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let prefs = UserPreferences::load(&dir.path().join("nope.txt")).expect("load");
    assert!(prefs.is_empty());
    let inputs = prefs.to_inputs(2026);
    assert_eq!(inputs["topic"], "AI");
    assert_eq!(inputs["tone"], "engaging");
    assert_eq!(inputs["hashtags_to_monitor"], "");
}
