//! Time entry rows: one per tracked interval

use super::{Flattened, Flattener};
use crate::clickup::model::TimeTracking;
use crate::types::Table;
use crate::utils::display_value;
use chrono_tz::Tz;
use serde_json::Value;

/// Time entry table columns
pub const TIME_ENTRY_COLUMNS: [&str; 8] = [
    "task_id",
    "task_name",
    "user_id",
    "username",
    "interval_id",
    "start",
    "end",
    "time_spent_ms",
];

/// Project a task's tracked time into rows, users in response order, then intervals
pub fn interval_rows(task_id: &str, task_name: &str, tracking: &TimeTracking, tz: Tz) -> Vec<Vec<Value>> {
    tracking
        .data
        .iter()
        .flat_map(|entry| {
            entry.intervals.iter().map(move |interval| {
                vec![
                    Value::String(task_id.to_string()),
                    Value::String(task_name.to_string()),
                    entry.user.id.clone(),
                    entry
                        .user
                        .username
                        .clone()
                        .map_or(Value::Null, Value::String),
                    Value::String(interval.id.clone()),
                    display_value(&interval.start, tz),
                    display_value(&interval.end, tz),
                    Value::from(interval.time),
                ]
            })
        })
        .collect()
}

impl Flattener<'_> {
    /// Fetch tracked time for every task and flatten it into interval rows
    ///
    /// Tasks without entries contribute nothing and are logged as a warning.
    /// The task name is only looked up for tasks that have entries.
    pub async fn time_rows(&self, task_ids: &[String]) -> Flattened {
        let mut table = Table::new(TIME_ENTRY_COLUMNS);
        let mut skipped = 0;

        for (index, task_id) in task_ids.iter().enumerate() {
            tracing::debug!(task_id = %task_id, position = index + 1, total = task_ids.len(), "fetching time entries");
            let tracking = match self.client.time_entries(task_id).await {
                Ok(tracking) => tracking,
                Err(e) => {
                    skipped += 1;
                    tracing::error!(task_id = %task_id, error = %e, "failed to fetch time entries, skipping");
                    continue;
                }
            };

            if tracking.data.is_empty() {
                tracing::warn!(task_id = %task_id, "no time entries found for task");
                continue;
            }

            let task_name = self.client.task_name(task_id).await;
            for row in interval_rows(task_id, &task_name, &tracking, self.tz) {
                table.push_row(row);
            }
        }

        tracing::info!(
            tasks = task_ids.len(),
            rows = table.len(),
            skipped,
            "time entries flattened"
        );
        Flattened { table, skipped }
    }
}
