//! Convenience re-exports for common use.

pub use crate::agent::Agent;
pub use crate::auth::{AuthStore, ClientCredentials, FileAuthStore, InstagramAuth, Token};
pub use crate::config::{CrewConfig, UserPreferences};
pub use crate::content::{CaptionRequest, PostScheduler, ScheduledPost, SubscriptionStore, Tone};
pub use crate::crew::{Crew, CrewDefinition, CrewInputs, CrewOutput, TaskOutput, TaskStatus};
pub use crate::error::{CrewError, Result};
pub use crate::tools::{FnTool, Tool, ToolArguments, ToolParameters, ToolReport};
