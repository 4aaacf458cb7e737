//! Content helpers: captions, hashtags, scheduled posts and monitoring
//! subscriptions.

pub mod caption;
pub mod hashtags;
pub mod schedule;
pub mod subscription;

pub use caption::{generate_caption, CaptionRequest, Tone};
pub use schedule::{PostScheduler, PostStatus, ScheduledPost};
pub use subscription::{SubscriptionStore, Subscriptions};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Image file not found at {}", .0.display())]
    ImageNotFound(PathBuf),
    #[error("Invalid scheduled time '{0}': expected ISO 8601, e.g. 2025-10-15T14:30:00")]
    InvalidTime(String),
    #[error("Nothing to monitor: provide at least one hashtag or account")]
    NothingToMonitor,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
