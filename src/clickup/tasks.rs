//! Per-task endpoints: full detail, display name, tracked time

use super::model::{Task, TaskName, TimeTracking};
use super::{ClickUpClient, segment};
use crate::error::Result;

/// Name used when a task's display name cannot be fetched
pub const UNKNOWN_TASK_NAME: &str = "N/A";

impl ClickUpClient {
    /// Full task record
    pub async fn task(&self, task_id: &str) -> Result<Task> {
        self.get(&format!("task/{}", segment(task_id)), &Vec::new())
            .await
    }

    /// Tracked time intervals of a task, grouped by user
    pub async fn time_entries(&self, task_id: &str) -> Result<TimeTracking> {
        self.get(&format!("task/{}/time", segment(task_id)), &Vec::new())
            .await
    }

    /// Display name of a task, or [`UNKNOWN_TASK_NAME`] when it cannot be fetched
    ///
    /// Failures are logged and never propagated.
    pub async fn task_name(&self, task_id: &str) -> String {
        let lookup: Result<TaskName> = self
            .get(&format!("task/{}", segment(task_id)), &Vec::new())
            .await;
        match lookup {
            Ok(TaskName { name: Some(name) }) => name,
            Ok(TaskName { name: None }) => UNKNOWN_TASK_NAME.to_string(),
            Err(e) => {
                tracing::error!(task_id, error = %e, "failed to fetch task name");
                UNKNOWN_TASK_NAME.to_string()
            }
        }
    }
}
