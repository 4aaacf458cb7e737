//! Hashtags and accounts to monitor, kept in `subscriptions.json`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContentError;
use crate::util::fs::{atomic_write, read_optional};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriptions {
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Subscriptions {
    /// Merge new entries, skipping blanks and ones already present.
    /// Returns how many hashtags and users were added.
    pub fn merge<'a>(
        &mut self,
        hashtags: impl IntoIterator<Item = &'a str>,
        users: impl IntoIterator<Item = &'a str>,
    ) -> (usize, usize) {
        let added_tags = push_unique(&mut self.hashtags, hashtags.into_iter().map(normalize_hashtag));
        let added_users = push_unique(&mut self.users, users.into_iter().map(normalize_user));
        (added_tags, added_users)
    }
}

/// `#Travel ` → `travel`.
pub fn normalize_hashtag(raw: &str) -> String {
    raw.trim().trim_start_matches('#').trim().to_lowercase()
}

/// `@NatGeo` → `NatGeo`. Instagram usernames are case-insensitive but we
/// keep the spelling the user gave.
pub fn normalize_user(raw: &str) -> String {
    raw.trim().trim_start_matches('@').trim().to_string()
}

fn push_unique(target: &mut Vec<String>, items: impl Iterator<Item = String>) -> usize {
    let mut added = 0;
    for item in items {
        if item.is_empty()
            || target
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(&item))
        {
            continue;
        }
        target.push(item);
        added += 1;
    }
    added
}

#[derive(Debug, Clone)]
pub struct SubscriptionStore {
    path: PathBuf,
}

impl SubscriptionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Subscriptions, ContentError> {
        match read_optional(&self.path)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Subscriptions::default()),
        }
    }

    /// Add hashtags and users to the monitored set and persist it.
    pub fn subscribe(&self, hashtags: &[String], users: &[String]) -> Result<Subscriptions, ContentError> {
        let requested = hashtags
            .iter()
            .chain(users)
            .any(|entry| !entry.trim().trim_start_matches(['#', '@']).trim().is_empty());
        if !requested {
            return Err(ContentError::NothingToMonitor);
        }

        let mut subscriptions = self.load()?;
        let (tags, accounts) = subscriptions.merge(
            hashtags.iter().map(String::as_str),
            users.iter().map(String::as_str),
        );
        subscriptions.updated_at = Some(Utc::now());
        atomic_write(&self.path, &serde_json::to_vec_pretty(&subscriptions)?)?;
        tracing::info!(new_hashtags = tags, new_accounts = accounts, "updated monitoring subscriptions");
        Ok(subscriptions)
    }
}
