//! instacrew: an Instagram automation crew.
//!
//! Agents with Instagram tools run an ordered list of tasks: authenticate
//! the account (OAuth code, then a long-lived token), keep the token fresh,
//! subscribe to hashtags and accounts, write a caption and schedule the post
//! at an optimal time.
//!
//! # Quick Start
//!
//! ```no_run
//! use instacrew::prelude::*;
//!
//! # async fn example() -> instacrew::error::Result<()> {
//! let config = CrewConfig::from_env();
//! let crew = Crew::from_config(&config)?;
//! let preferences = UserPreferences::load(&config.preferences_path)?;
//! let output = crew.kickoff(&preferences.to_inputs(2026)).await?;
//! for task in &output.tasks {
//!     println!("{}: {}", task.task, task.raw);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod auth;
pub mod config;
pub mod content;
pub mod crew;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod tools;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
