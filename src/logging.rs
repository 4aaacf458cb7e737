//! Logging setup for the `instacrew` binary and embedding applications.
//!
//! The filter comes from `INSTACREW_LOG`, then `RUST_LOG`, then the
//! configured level. Output always goes to stderr so task results on stdout
//! stay pipeable.
//!
//! ```no_run
//! use instacrew::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new(LogFormat::Json, "info", false).init();
//! ```

use strum::{Display, EnumString};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "INSTACREW_LOG";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Plain text without target names.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
    /// Multi-line, colored output for development.
    Pretty,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
    /// Raises the fallback level to `debug`.
    pub verbose: bool,
}

impl LoggingConfig {
    pub fn new(format: LogFormat, level: impl Into<String>, verbose: bool) -> Self {
        Self {
            format,
            level: level.into(),
            verbose,
        }
    }

    /// Directive used when neither `INSTACREW_LOG` nor `RUST_LOG` is set.
    pub fn fallback_directive(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.level
        }
    }

    fn filter(&self) -> EnvFilter {
        std::env::var(LOG_ENV)
            .ok()
            .and_then(|directive| EnvFilter::try_new(directive).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new(self.fallback_directive()))
    }

    /// Install the global subscriber. Returns `false` when one is already set.
    pub fn init(&self) -> bool {
        let filter = self.filter();
        let result = match self.format {
            LogFormat::Json => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .flatten_event(true)
                .with_current_span(true)
                .with_target(true)
                .try_init(),
            LogFormat::Pretty => tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true)
                .try_init(),
            LogFormat::Text => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .try_init(),
        };
        result.is_ok()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(LogFormat::Text, "info", false)
    }
}
