//! Agent: a role with a goal and the tools it may use.

use std::sync::Arc;

use crate::crew::task::TaskStatus;
use crate::error::{CrewError, Result};
use crate::tools::{Tool, ToolArguments, ToolReport};

/// A crew member that carries out tasks through its tools.
pub struct Agent {
    name: String,
    role: String,
    goal: String,
    backstory: String,
    tools: Vec<Arc<dyn Tool>>,
}

impl Agent {
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            goal: String::new(),
            backstory: String::new(),
            tools: Vec::new(),
        }
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    pub fn with_backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    /// Add a tool.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn backstory(&self) -> &str {
        &self.backstory
    }

    pub fn tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Run one of this agent's tools and classify the result.
    ///
    /// Arguments the tool's schema rejects and tool errors are captured in the
    /// returned status and message; only a tool the agent does not have is an
    /// error.
    pub async fn perform(&self, tool_name: &str, args: &ToolArguments) -> Result<(TaskStatus, String)> {
        let tool = self.tool(tool_name).ok_or_else(|| {
            CrewError::Configuration(format!(
                "Agent '{}' has no tool named '{tool_name}'",
                self.name
            ))
        })?;

        tracing::debug!(agent = %self.role, tool = tool_name, args = %args.raw(), "calling tool");
        match tool.call(args).await {
            Ok(value) => {
                let report = ToolReport::from_value(&value);
                Ok((report.status.into(), report.message))
            }
            Err(e) => {
                tracing::warn!(agent = %self.role, tool = tool_name, error = %e, "tool call failed");
                Ok((TaskStatus::Errored, format!("{tool_name} failed: {e}")))
            }
        }
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("tools", &self.tool_names())
            .finish()
    }
}
