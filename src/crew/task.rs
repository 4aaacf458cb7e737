//! Tasks and their outputs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use super::template::{interpolate, interpolate_lenient, sole_placeholder};
use crate::error::Result;
use crate::tools::{ToolArguments, ToolStatus};

/// One step of the crew: which agent runs which tool with which arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub agent: String,
    pub tool: String,
    pub description: String,
    #[serde(default)]
    pub expected_output: String,
    /// Argument templates; string values may contain `{placeholders}`.
    #[serde(default)]
    pub arguments: serde_json::Map<String, serde_json::Value>,
}

impl Task {
    pub fn render_description(&self, vars: &BTreeMap<String, String>) -> String {
        interpolate_lenient(&self.description, vars)
    }

    /// Interpolate the argument templates.
    ///
    /// A string that is exactly one unknown placeholder is dropped (the
    /// argument is optional from the crew's point of view); any other unknown
    /// placeholder fails with [`crate::error::CrewError::MissingInput`].
    pub fn render_arguments(&self, vars: &BTreeMap<String, String>) -> Result<ToolArguments> {
        let mut rendered = serde_json::Map::new();
        for (key, value) in &self.arguments {
            if let Some(value) = render_value(value, vars)? {
                rendered.insert(key.clone(), value);
            }
        }
        Ok(ToolArguments::new(serde_json::Value::Object(rendered)))
    }
}

fn render_value(
    value: &serde_json::Value,
    vars: &BTreeMap<String, String>,
) -> Result<Option<serde_json::Value>> {
    match value {
        serde_json::Value::String(template) => {
            if let Some(name) = sole_placeholder(template) {
                if !vars.contains_key(name) {
                    return Ok(None);
                }
            }
            Ok(Some(serde_json::Value::String(interpolate(template, vars)?)))
        }
        serde_json::Value::Array(items) => {
            let mut rendered = Vec::with_capacity(items.len());
            for item in items {
                if let Some(item) = render_value(item, vars)? {
                    rendered.push(item);
                }
            }
            Ok(Some(serde_json::Value::Array(rendered)))
        }
        other => Ok(Some(other.clone())),
    }
}

/// Outcome of running a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    Completed,
    ActionRequired,
    Failed,
    /// The tool rejected its arguments or could not run at all.
    Errored,
}

impl TaskStatus {
    /// Score on a 0–10 scale used by training and testing.
    pub fn score(self) -> f64 {
        match self {
            Self::Completed => 10.0,
            Self::ActionRequired => 6.0,
            Self::Failed => 1.0,
            Self::Errored => 0.0,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Completed
    }
}

impl From<ToolStatus> for TaskStatus {
    fn from(status: ToolStatus) -> Self {
        match status {
            ToolStatus::Ok => Self::Completed,
            ToolStatus::ActionRequired => Self::ActionRequired,
            ToolStatus::Error => Self::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub task_id: Uuid,
    pub task: String,
    /// Role of the agent that ran the task.
    pub agent: String,
    pub description: String,
    pub raw: String,
    pub status: TaskStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}
