//! Training: repeated kickoffs whose scored outputs are saved for review.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::crew::{Crew, CrewInputs};
use super::task::TaskOutput;
use crate::error::{CrewError, Result};
use crate::util::fs::atomic_write;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingIteration {
    pub iteration: usize,
    pub outputs: Vec<TaskOutput>,
    pub average_score: f64,
}

/// Per-agent summary across all iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTrainingSummary {
    pub agent: String,
    pub runs: usize,
    pub average_score: f64,
    /// Distinct messages from runs that did not complete.
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    pub crew: String,
    pub created_at: DateTime<Utc>,
    pub inputs: CrewInputs,
    pub iterations: Vec<TrainingIteration>,
    pub agents: Vec<AgentTrainingSummary>,
}

impl TrainingData {
    /// Load training data written by an earlier [`Crew::train`].
    pub fn load(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }
}

pub(crate) fn average(scores: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = scores
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), score| (sum + score, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn summarize_agents(iterations: &[TrainingIteration]) -> Vec<AgentTrainingSummary> {
    let mut summaries: Vec<AgentTrainingSummary> = Vec::new();
    let mut scores: Vec<Vec<f64>> = Vec::new();

    for output in iterations.iter().flat_map(|it| &it.outputs) {
        let index = match summaries.iter().position(|s| s.agent == output.agent) {
            Some(index) => index,
            None => {
                summaries.push(AgentTrainingSummary {
                    agent: output.agent.clone(),
                    runs: 0,
                    average_score: 0.0,
                    issues: Vec::new(),
                });
                scores.push(Vec::new());
                summaries.len() - 1
            }
        };
        let summary = &mut summaries[index];
        summary.runs += 1;
        scores[index].push(output.status.score());
        if !output.status.is_success() && !summary.issues.contains(&output.raw) {
            summary.issues.push(output.raw.clone());
        }
    }

    for (summary, scores) in summaries.iter_mut().zip(scores) {
        summary.average_score = average(scores);
    }
    summaries
}

impl Crew {
    /// Kick off `n_iterations` times with `inputs` and write the scored
    /// outputs to `filename` (which must end in `.json`).
    pub async fn train(
        &self,
        n_iterations: usize,
        filename: &Path,
        inputs: &CrewInputs,
    ) -> Result<TrainingData> {
        if n_iterations == 0 {
            return Err(CrewError::InvalidArgument(
                "n_iterations must be greater than zero".into(),
            ));
        }
        if filename.extension().and_then(|ext| ext.to_str()) != Some("json") {
            return Err(CrewError::InvalidArgument(format!(
                "Training file '{}' must end in .json",
                filename.display()
            )));
        }

        let mut iterations = Vec::with_capacity(n_iterations);
        for iteration in 1..=n_iterations {
            tracing::info!(iteration, n_iterations, "training iteration");
            let output = self.kickoff(inputs).await?;
            iterations.push(TrainingIteration {
                iteration,
                average_score: average(output.tasks.iter().map(|t| t.status.score())),
                outputs: output.tasks,
            });
        }

        let data = TrainingData {
            crew: self.name().to_string(),
            created_at: Utc::now(),
            inputs: inputs.clone(),
            agents: summarize_agents(&iterations),
            iterations,
        };
        atomic_write(filename, &serde_json::to_vec_pretty(&data)?)?;
        tracing::info!(path = %filename.display(), "saved training data");
        Ok(data)
    }
}
