//! Crew orchestration: agents running an ordered list of tasks.
//!
//! A [`Crew`] is built from a [`CrewDefinition`] (TOML) and a set of tools.
//! Tasks run one after another; each task's output becomes a template
//! variable for the tasks that follow.
//!
//! # Example
//!
//! ```no_run
//! use instacrew::config::CrewConfig;
//! use instacrew::crew::{Crew, CrewInputs};
//!
//! # async fn example() -> instacrew::error::Result<()> {
//! let crew = Crew::from_config(&CrewConfig::from_env())?;
//! let mut inputs = CrewInputs::new();
//! inputs.insert("topic".into(), "AI".into());
//! let output = crew.kickoff(&inputs).await?;
//! println!("{}", output.raw());
//! # Ok(())
//! # }
//! ```

pub mod crew;
pub mod definition;
pub mod evaluation;
pub mod storage;
pub mod task;
pub mod template;
pub mod training;

pub use crew::{Crew, CrewInputs, CrewOutput};
pub use definition::{AgentDefinition, CrewDefinition};
pub use evaluation::{TaskScores, TestReport};
pub use storage::{KickoffLog, KickoffStore};
pub use task::{Task, TaskOutput, TaskStatus};
pub use training::{AgentTrainingSummary, TrainingData, TrainingIteration};
