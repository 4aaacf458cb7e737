//! Persisted task outputs of the latest kickoff, used by replay.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::TaskOutput;
use crate::error::Result;
use crate::util::fs::{atomic_write, read_optional};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KickoffLog {
    pub kickoff_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub inputs: BTreeMap<String, String>,
    pub outputs: Vec<TaskOutput>,
}

impl KickoffLog {
    pub fn new(inputs: BTreeMap<String, String>) -> Self {
        Self {
            kickoff_id: Uuid::new_v4(),
            started_at: Utc::now(),
            inputs,
            outputs: Vec::new(),
        }
    }

    /// Locate a task output by id, or by task name as a convenience.
    pub fn position(&self, task_id: &str) -> Option<usize> {
        let task_id = task_id.trim();
        let by_id = Uuid::parse_str(task_id)
            .ok()
            .and_then(|id| self.outputs.iter().position(|o| o.task_id == id));
        by_id.or_else(|| self.outputs.iter().position(|o| o.task == task_id))
    }

    /// Inputs plus the raw outputs of the first `count` tasks, keyed by task
    /// name. Tasks that did not complete contribute nothing.
    pub fn context_before(&self, count: usize) -> BTreeMap<String, String> {
        let mut vars = self.inputs.clone();
        for output in self.outputs.iter().take(count) {
            if output.status.is_success() {
                vars.insert(output.task.clone(), output.raw.clone());
            }
        }
        vars
    }
}

#[derive(Debug, Clone)]
pub struct KickoffStore {
    path: PathBuf,
}

impl KickoffStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<KickoffLog>> {
        match read_optional(&self.path)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn save(&self, log: &KickoffLog) -> Result<()> {
        atomic_write(&self.path, &serde_json::to_vec_pretty(log)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crew::task::TaskStatus;
    use tempfile::TempDir;

    fn output(task: &str, raw: &str) -> TaskOutput {
        TaskOutput {
            task_id: Uuid::new_v4(),
            task: task.into(),
            agent: "Agent".into(),
            description: String::new(),
            raw: raw.into(),
            status: TaskStatus::Completed,
            started_at: Utc::now(),
            completed_at: Utc::now(),
        }
    }

    fn log() -> KickoffLog {
        let mut log = KickoffLog::new(BTreeMap::from([("topic".to_string(), "AI".to_string())]));
        log.outputs.push(output("first", "one"));
        log.outputs.push(output("second", "two"));
        log
    }

    #[test]
    fn finds_tasks_by_id_or_name() {
        let log = log();
        let id = log.outputs[1].task_id.to_string();
        assert_eq!(log.position(&id), Some(1));
        assert_eq!(log.position("first"), Some(0));
        assert_eq!(log.position(&Uuid::new_v4().to_string()), None);
    }

    #[test]
    fn context_includes_earlier_outputs_only() {
        let vars = log().context_before(1);
        assert_eq!(vars.get("topic").map(String::as_str), Some("AI"));
        assert_eq!(vars.get("first").map(String::as_str), Some("one"));
        assert!(!vars.contains_key("second"));
    }

    #[test]
    fn context_leaves_out_unfinished_tasks() {
        let mut log = log();
        log.outputs[0].status = TaskStatus::Errored;
        log.outputs[1].status = TaskStatus::ActionRequired;
        let vars = log.context_before(2);
        assert!(!vars.contains_key("first"));
        assert!(!vars.contains_key("second"));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = KickoffStore::new(dir.path().join("data/latest.json"));
        assert!(store.load().unwrap().is_none());
        let log = log();
        store.save(&log).unwrap();
        assert_eq!(store.load().unwrap(), Some(log));
    }
}
