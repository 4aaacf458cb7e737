//! Crew testing: repeated kickoffs with per-task scores.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::crew::{Crew, CrewInputs};
use super::training::average;
use crate::error::{CrewError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskScores {
    pub task: String,
    pub agent: String,
    /// One score per iteration.
    pub scores: Vec<f64>,
}

impl TaskScores {
    pub fn average(&self) -> f64 {
        average(self.scores.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    /// Label of the evaluator the scores are attributed to.
    pub evaluator: String,
    pub iterations: usize,
    pub tasks: Vec<TaskScores>,
    /// Average over all tasks, per iteration.
    pub crew_scores: Vec<f64>,
}

impl TestReport {
    pub fn crew_average(&self) -> f64 {
        average(self.crew_scores.iter().copied())
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .tasks
            .iter()
            .map(|t| t.task.len())
            .max()
            .unwrap_or(0)
            .max("Crew".len());

        writeln!(f, "Tasks Scores (evaluator: {})", self.evaluator)?;
        write!(f, "{:<width$}", "Task")?;
        for run in 1..=self.iterations {
            write!(f, " | Run {run:<2}")?;
        }
        writeln!(f, " | Avg. Total | Agent")?;

        for task in &self.tasks {
            write!(f, "{:<width$}", task.task)?;
            for score in &task.scores {
                write!(f, " | {score:>6.1}")?;
            }
            writeln!(f, " | {:>10.1} | {}", task.average(), task.agent)?;
        }

        write!(f, "{:<width$}", "Crew")?;
        for score in &self.crew_scores {
            write!(f, " | {score:>6.1}")?;
        }
        write!(f, " | {:>10.1} |", self.crew_average())
    }
}

impl Crew {
    /// Kick off `n_iterations` times and score every task's outcome.
    pub async fn test(
        &self,
        n_iterations: usize,
        evaluator: &str,
        inputs: &CrewInputs,
    ) -> Result<TestReport> {
        if n_iterations == 0 {
            return Err(CrewError::InvalidArgument(
                "n_iterations must be greater than zero".into(),
            ));
        }

        let mut tasks: Vec<TaskScores> = self
            .tasks()
            .iter()
            .map(|task| TaskScores {
                task: task.name.clone(),
                agent: String::new(),
                scores: Vec::with_capacity(n_iterations),
            })
            .collect();
        let mut crew_scores = Vec::with_capacity(n_iterations);

        for iteration in 1..=n_iterations {
            tracing::info!(iteration, n_iterations, evaluator, "test iteration");
            let output = self.kickoff(inputs).await?;
            for (scores, task_output) in tasks.iter_mut().zip(&output.tasks) {
                scores.agent = task_output.agent.clone();
                scores.scores.push(task_output.status.score());
            }
            crew_scores.push(average(output.tasks.iter().map(|t| t.status.score())));
        }

        Ok(TestReport {
            evaluator: evaluator.to_string(),
            iterations: n_iterations,
            tasks,
            crew_scores,
        })
    }
}
