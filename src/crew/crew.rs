//! Sequential crew: runs every task in order, each through its agent's tool.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::definition::CrewDefinition;
use super::storage::{KickoffLog, KickoffStore};
use super::task::{Task, TaskOutput, TaskStatus};
use crate::agent::Agent;
use crate::config::CrewConfig;
use crate::error::{CrewError, Result};
use crate::tools::instagram::all_tools;
use crate::tools::Tool;

/// Named string inputs available to task templates.
pub type CrewInputs = BTreeMap<String, String>;

/// Task outputs of one kickoff (or replay), in execution order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewOutput {
    pub kickoff_id: Uuid,
    pub tasks: Vec<TaskOutput>,
}

impl CrewOutput {
    /// Output of the last task.
    pub fn raw(&self) -> &str {
        self.tasks.last().map(|t| t.raw.as_str()).unwrap_or_default()
    }

    pub fn task(&self, name: &str) -> Option<&TaskOutput> {
        self.tasks.iter().find(|t| t.task == name)
    }
}

pub struct Crew {
    name: String,
    agents: Vec<Agent>,
    tasks: Vec<Task>,
    storage: KickoffStore,
}

impl Crew {
    /// Wire a definition to concrete tools. Every tool an agent lists must be
    /// among `tools`.
    pub fn new(
        definition: CrewDefinition,
        tools: Vec<Arc<dyn Tool>>,
        storage: KickoffStore,
    ) -> Result<Self> {
        definition.validate()?;
        let by_name: HashMap<&str, &Arc<dyn Tool>> =
            tools.iter().map(|tool| (tool.name(), tool)).collect();

        let mut agents = Vec::with_capacity(definition.agents.len());
        for spec in &definition.agents {
            let mut agent = Agent::new(&spec.name, &spec.role)
                .with_goal(&spec.goal)
                .with_backstory(spec.backstory.trim());
            for tool_name in &spec.tools {
                let tool = by_name.get(tool_name.as_str()).ok_or_else(|| {
                    CrewError::Configuration(format!(
                        "Agent '{}' lists unknown tool '{tool_name}'",
                        spec.name
                    ))
                })?;
                agent = agent.with_tool(Arc::clone(tool));
            }
            agents.push(agent);
        }

        Ok(Self {
            name: definition.name,
            agents,
            tasks: definition.tasks,
            storage,
        })
    }

    /// The configured crew file (or the built-in definition) with the
    /// Instagram tools and kickoff log from `config`.
    pub fn from_config(config: &CrewConfig) -> Result<Self> {
        let definition = match &config.crew_file {
            Some(path) => CrewDefinition::load(path)?,
            None => CrewDefinition::builtin()?,
        };
        Self::new(
            definition,
            all_tools(config),
            KickoffStore::new(config.kickoff_log_path()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn storage(&self) -> &KickoffStore {
        &self.storage
    }

    fn has_task(&self, name: &str) -> bool {
        self.tasks.iter().any(|task| task.name == name)
    }

    fn agent(&self, name: &str) -> Result<&Agent> {
        self.agents
            .iter()
            .find(|agent| agent.name() == name)
            .ok_or_else(|| CrewError::Configuration(format!("Unknown agent '{name}'")))
    }

    /// Run every task in order. The kickoff log is rewritten after each task
    /// so a later [`Crew::replay`] can resume from any of them.
    pub async fn kickoff(&self, inputs: &CrewInputs) -> Result<CrewOutput> {
        let mut log = KickoffLog::new(inputs.clone());
        tracing::info!(crew = %self.name, kickoff_id = %log.kickoff_id, "crew kickoff");
        self.run_from(0, &mut log, &HashMap::new()).await
    }

    /// Re-run the task with `task_id` (or that name) from the latest kickoff,
    /// and every task after it, using the logged inputs and earlier outputs.
    pub async fn replay(&self, task_id: &str) -> Result<CrewOutput> {
        let mut log = self.storage.load()?.ok_or_else(|| {
            CrewError::InvalidState("No previous kickoff found. Run the crew first.".into())
        })?;
        let index = log.position(task_id).ok_or_else(|| {
            CrewError::InvalidArgument(format!("Task '{task_id}' not found in the latest kickoff"))
        })?;
        let task_name = log.outputs[index].task.clone();
        let start = self
            .tasks
            .iter()
            .position(|task| task.name == task_name)
            .ok_or_else(|| {
                CrewError::InvalidState(format!("Task '{task_name}' is no longer part of this crew"))
            })?;

        // replayed tasks keep their ids so they can be replayed again
        let ids: HashMap<String, Uuid> = log.outputs[index..]
            .iter()
            .map(|output| (output.task.clone(), output.task_id))
            .collect();
        log.outputs.truncate(index);

        tracing::info!(crew = %self.name, task = %task_name, "replaying from task");
        self.run_from(start, &mut log, &ids).await
    }

    async fn run_from(
        &self,
        start: usize,
        log: &mut KickoffLog,
        ids: &HashMap<String, Uuid>,
    ) -> Result<CrewOutput> {
        let mut vars = log.context_before(log.outputs.len());
        for task in &self.tasks[start..] {
            let task_id = ids.get(&task.name).copied().unwrap_or_else(Uuid::new_v4);
            let output = self.execute_task(task, task_id, &vars).await?;
            if output.status.is_success() {
                vars.insert(task.name.clone(), output.raw.clone());
            }
            log.outputs.push(output);
            self.storage.save(log)?;
        }
        Ok(CrewOutput {
            kickoff_id: log.kickoff_id,
            tasks: log.outputs.clone(),
        })
    }

    async fn execute_task(
        &self,
        task: &Task,
        task_id: Uuid,
        vars: &CrewInputs,
    ) -> Result<TaskOutput> {
        let agent = self.agent(&task.agent)?;
        let description = task.render_description(vars);
        let started_at = Utc::now();

        let (status, raw) = match task.render_arguments(vars) {
            Ok(arguments) => {
                tracing::info!(task = %task.name, agent = %agent.role(), "starting task");
                agent.perform(&task.tool, &arguments).await?
            }
            // an earlier task's output is missing only when that task did not complete
            Err(CrewError::MissingInput(name)) if self.has_task(&name) => {
                tracing::warn!(task = %task.name, depends_on = %name, "skipping task");
                (
                    TaskStatus::Errored,
                    format!("Skipped: task '{name}' did not complete"),
                )
            }
            Err(e) => return Err(e),
        };
        tracing::info!(task = %task.name, %status, "finished task");

        Ok(TaskOutput {
            task_id,
            task: task.name.clone(),
            agent: agent.role().to_string(),
            description,
            raw,
            status,
            started_at,
            completed_at: Utc::now(),
        })
    }
}

impl std::fmt::Debug for Crew {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Crew")
            .field("name", &self.name)
            .field("agents", &self.agents)
            .field(
                "tasks",
                &self.tasks.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
