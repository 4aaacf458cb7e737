//! User preference file (`knowledge/user_preference.txt`).
//!
//! ```text
//! # comments and blank lines are ignored
//! ## Content Preferences
//! Content Topics: AI, photography
//! Tone: casual
//!
//! ## Monitoring Preferences
//! Hashtags To Monitor: #ai, #ml
//! ```
//!
//! Section and key names are lowercased with spaces turned into `_`, so the
//! example above yields `content_preferences.content_topics`.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;
use crate::util::fs::read_optional;

pub const CONTENT_SECTION: &str = "content_preferences";
pub const MONITORING_SECTION: &str = "monitoring_preferences";
const DEFAULT_TOPICS: &str = "AI, tech";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPreferences {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl UserPreferences {
    /// Read and parse the file; a missing file logs a warning and yields
    /// empty preferences.
    pub fn load(path: &Path) -> Result<Self> {
        match read_optional(path)? {
            Some(raw) => Ok(Self::parse(&raw)),
            None => {
                tracing::warn!(path = %path.display(), "preference file not found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn parse(raw: &str) -> Self {
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for line in raw.lines().map(str::trim) {
            if line.is_empty() {
                continue;
            }
            if line.starts_with("##") {
                let name = normalize(line.trim_matches(|c| c == '#' || c == ' '));
                sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }
            if line.starts_with('#') {
                continue;
            }
            let (Some(section), Some((key, value))) = (current.as_ref(), line.split_once(':')) else {
                continue;
            };
            sections
                .entry(section.clone())
                .or_default()
                .insert(normalize(key), value.trim().to_string());
        }

        Self { sections }
    }

    pub fn section(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.sections.get(name)
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// First comma-separated content topic, defaulting to `AI`.
    pub fn primary_topic(&self) -> String {
        let topics = self
            .get(CONTENT_SECTION, "content_topics")
            .unwrap_or(DEFAULT_TOPICS);
        topics
            .split(',')
            .map(str::trim)
            .find(|topic| !topic.is_empty())
            .unwrap_or("AI")
            .to_string()
    }

    /// Crew inputs derived from the preferences.
    ///
    /// Every content preference is passed through under its own key; the
    /// derived keys (`topic`, `current_year`, ...) take precedence.
    pub fn to_inputs(&self, current_year: i32) -> BTreeMap<String, String> {
        let mut inputs: BTreeMap<String, String> = self
            .section(CONTENT_SECTION)
            .cloned()
            .unwrap_or_default();

        inputs.insert("topic".into(), self.primary_topic());
        inputs.insert("current_year".into(), current_year.to_string());
        inputs.insert(
            "hashtags_to_monitor".into(),
            self.get(MONITORING_SECTION, "hashtags_to_monitor")
                .unwrap_or_default()
                .to_string(),
        );
        inputs.insert(
            "accounts_to_monitor".into(),
            self.get(MONITORING_SECTION, "accounts_to_monitor")
                .unwrap_or_default()
                .to_string(),
        );
        inputs
            .entry("tone".into())
            .or_insert_with(|| "engaging".to_string());
        inputs
            .entry("hashtags_count".into())
            .or_insert_with(|| "5".to_string());
        inputs
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}
