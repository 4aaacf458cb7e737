//! Post scheduling, recorded in a local JSON list.
//!
//! Nothing is published: a scheduled post is an entry appended to
//! `scheduled_posts.json`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::ContentError;
use crate::util::fs::{atomic_write, read_optional};

/// Local hours considered good for engagement, in ascending order.
pub const OPTIMAL_HOURS: [u32; 4] = [8, 12, 17, 20];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PostStatus {
    Scheduled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub caption: String,
    pub image_path: String,
    pub scheduled_time: NaiveDateTime,
    pub status: PostStatus,
    pub created_at: NaiveDateTime,
}

/// Next optimal posting slot after `now`: the first of [`OPTIMAL_HOURS`]
/// later than the current hour, else the first one; pushed to the next day
/// when already past.
pub fn next_optimal_time(now: NaiveDateTime) -> NaiveDateTime {
    let hour = OPTIMAL_HOURS
        .iter()
        .copied()
        .find(|hour| *hour > now.hour())
        .unwrap_or(OPTIMAL_HOURS[0]);
    let slot = NaiveTime::from_hms_opt(hour, 0, 0)
        .map(|time| now.date().and_time(time))
        .unwrap_or(now);
    if slot < now {
        slot + Duration::days(1)
    } else {
        slot
    }
}

/// Parse a user-supplied schedule time, interpreted as local time unless it
/// carries an offset.
pub fn parse_scheduled_time(value: &str) -> Result<NaiveDateTime, ContentError> {
    let value = value.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Ok(time.with_timezone(&Local).naive_local());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| ContentError::InvalidTime(value.to_string()))
}

/// Appends scheduled posts to a JSON file.
#[derive(Debug, Clone)]
pub struct PostScheduler {
    path: PathBuf,
}

impl PostScheduler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Posts recorded so far. A missing or unreadable list is empty.
    pub fn load(&self) -> Result<Vec<ScheduledPost>, ContentError> {
        let Some(raw) = read_optional(&self.path)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(posts) => Ok(posts),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable scheduled posts file");
                Ok(Vec::new())
            }
        }
    }

    /// Validate the image, resolve the slot and append the post.
    pub fn schedule(
        &self,
        caption: &str,
        image_path: &str,
        scheduled_time: Option<&str>,
    ) -> Result<ScheduledPost, ContentError> {
        self.schedule_at(caption, image_path, scheduled_time, Local::now().naive_local())
    }

    pub fn schedule_at(
        &self,
        caption: &str,
        image_path: &str,
        scheduled_time: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<ScheduledPost, ContentError> {
        if !Path::new(image_path).exists() {
            return Err(ContentError::ImageNotFound(PathBuf::from(image_path)));
        }

        let scheduled_time = match scheduled_time.map(str::trim).filter(|t| !t.is_empty()) {
            Some(value) => parse_scheduled_time(value)?,
            None => next_optimal_time(now),
        };

        let post = ScheduledPost {
            caption: caption.to_string(),
            image_path: image_path.to_string(),
            scheduled_time,
            status: PostStatus::Scheduled,
            created_at: now,
        };

        let mut posts = self.load()?;
        posts.push(post.clone());
        atomic_write(&self.path, &serde_json::to_vec_pretty(&posts)?)?;
        tracing::info!(
            scheduled_time = %post.scheduled_time,
            total = posts.len(),
            "recorded scheduled post"
        );
        Ok(post)
    }
}
