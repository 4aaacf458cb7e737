//! Crew definitions loaded from TOML.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::task::Task;
use crate::error::{CrewError, Result};

const BUILTIN_DEFINITION: &str = include_str!("../../config/crew.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDefinition {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub backstory: String,
    #[serde(default)]
    pub tools: Vec<String>,
}

/// Agents plus the ordered list of tasks they run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewDefinition {
    pub name: String,
    #[serde(default)]
    pub agents: Vec<AgentDefinition>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl CrewDefinition {
    /// The definition shipped with the crate (`config/crew.toml`).
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_DEFINITION)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CrewError::Definition(format!("Cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let definition: Self = toml::from_str(raw)?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn agent(&self, name: &str) -> Option<&AgentDefinition> {
        self.agents.iter().find(|agent| agent.name == name)
    }

    /// Check names are unique and every task's agent and tool exist.
    pub fn validate(&self) -> Result<()> {
        if self.tasks.is_empty() {
            return Err(CrewError::Definition(format!("Crew '{}' has no tasks", self.name)));
        }

        let mut agents = HashSet::new();
        for agent in &self.agents {
            if !agents.insert(agent.name.as_str()) {
                return Err(CrewError::Definition(format!("Duplicate agent '{}'", agent.name)));
            }
        }

        let mut tasks = HashSet::new();
        for task in &self.tasks {
            if !tasks.insert(task.name.as_str()) {
                return Err(CrewError::Definition(format!("Duplicate task '{}'", task.name)));
            }
            let agent = self.agent(&task.agent).ok_or_else(|| {
                CrewError::Definition(format!(
                    "Task '{}' refers to unknown agent '{}'",
                    task.name, task.agent
                ))
            })?;
            if !agent.tools.iter().any(|tool| tool == &task.tool) {
                return Err(CrewError::Definition(format!(
                    "Task '{}' uses tool '{}' which agent '{}' does not have",
                    task.name, task.tool, agent.name
                )));
            }
        }
        Ok(())
    }
}
