//! Core types for clickup-sheets-sync

use crate::error::Result;
use crate::utils::date_time_to_ms;
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scope of a single run, passed by value through the whole pipeline
///
/// Bounds are millisecond epochs. `None` means "no bound" and is sent to
/// ClickUp as an empty query parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFilter {
    /// Only tasks created strictly after this instant
    pub created_after: Option<i64>,
    /// Only tasks due strictly before this instant
    pub due_before: Option<i64>,
    /// Walk archived spaces/folders/lists/tasks instead of active ones
    pub archived: bool,
}

impl ScopeFilter {
    /// Create a filter from already-converted epoch bounds
    pub fn new(created_after: Option<i64>, due_before: Option<i64>, archived: bool) -> Self {
        Self {
            created_after,
            due_before,
            archived,
        }
    }

    /// Build a filter from calendar input interpreted in `tz`
    pub fn from_local(
        start: (NaiveDate, NaiveTime),
        due: (NaiveDate, NaiveTime),
        archived: bool,
        tz: Tz,
    ) -> Result<Self> {
        Ok(Self {
            created_after: Some(date_time_to_ms(start.0, start.1, tz)?),
            due_before: Some(date_time_to_ms(due.0, due.1, tz)?),
            archived,
        })
    }

    /// Value of the `archived` query parameter
    pub fn archived_param(&self) -> &'static str {
        if self.archived { "true" } else { "false" }
    }
}

/// Rectangular, column-labelled dataset handed to an export sink
///
/// Cells are JSON values so custom fields keep whatever shape ClickUp gave them;
/// stringification happens once, at export time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with a fixed column set
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, null-padding or truncating it to the column count
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Column labels in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in insertion order
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of data rows (header excluded)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by label
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `row` under column `name`
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.rows.get(row)?.get(col)
    }

    /// Iterate the values of one column
    pub fn column<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Value> + 'a {
        let col = self.column_index(name);
        self.rows
            .iter()
            .filter_map(move |row| col.and_then(|c| row.get(c)))
    }

    /// Header plus rows with every cell stringified (see [`cell_to_string`])
    pub fn to_string_grid(&self) -> Vec<Vec<String>> {
        std::iter::once(self.columns.clone())
            .chain(
                self.rows
                    .iter()
                    .map(|row| row.iter().map(cell_to_string).collect()),
            )
            .collect()
    }
}

/// Stringify a cell for export
///
/// Null becomes `""`, strings are kept verbatim, arrays are joined with `", "`,
/// and other values use their JSON text.
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(cell_to_string)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Outcome of one sync run
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Tab written in both destinations
    pub tab: String,
    /// Task ids enumerated (duplicates included)
    pub task_ids: usize,
    /// Rows in the task detail dataset
    pub detail_rows: usize,
    /// Rows in the time entry dataset
    pub time_rows: usize,
    /// Tasks whose detail fetch failed and were skipped
    pub skipped_details: usize,
    /// Tasks whose time entry fetch failed and were skipped
    pub skipped_time_entries: usize,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn archived_param_is_lowercase_bool() {
        assert_eq!(ScopeFilter::new(None, None, true).archived_param(), "true");
        assert_eq!(ScopeFilter::default().archived_param(), "false");
    }

    #[test]
    fn from_local_converts_both_bounds() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let scope = ScopeFilter::from_local(
            (day, NaiveTime::from_hms_opt(0, 0, 0).unwrap()),
            (day, NaiveTime::from_hms_opt(23, 59, 0).unwrap()),
            false,
            Tz::UTC,
        )
        .unwrap();
        assert_eq!(scope.created_after, Some(1_735_689_600_000));
        assert_eq!(scope.due_before, Some(1_735_689_600_000 + (23 * 60 + 59) * 60_000));
        assert!(!scope.archived);
    }

    #[test]
    fn cell_stringification() {
        assert_eq!(cell_to_string(&Value::Null), "");
        assert_eq!(cell_to_string(&json!("Alta")), "Alta");
        assert_eq!(cell_to_string(&json!(true)), "true");
        assert_eq!(cell_to_string(&json!(3600000)), "3600000");
        assert_eq!(cell_to_string(&json!(["bug", "urgent"])), "bug, urgent");
        assert_eq!(cell_to_string(&json!([])), "");
        assert_eq!(cell_to_string(&json!({"current": 5})), r#"{"current":5}"#);
    }

    #[test]
    fn string_grid_has_header_first() {
        let mut table = Table::new(["task_id", "tags"]);
        table.push_row(vec![json!("1"), json!(["a"])]);
        table.push_row(vec![json!("2"), Value::Null]);

        assert_eq!(
            table.to_string_grid(),
            vec![
                vec!["task_id".to_string(), "tags".to_string()],
                vec!["1".to_string(), "a".to_string()],
                vec!["2".to_string(), String::new()],
            ]
        );
    }

    #[test]
    fn column_lookup() {
        let mut table = Table::new(["a", "b"]);
        table.push_row(vec![json!(1), json!(2)]);
        table.push_row(vec![json!(3), json!(4)]);

        assert_eq!(table.get(1, "b"), Some(&json!(4)));
        assert_eq!(table.get(0, "missing"), None);
        assert_eq!(table.column("a").cloned().collect::<Vec<_>>(), vec![json!(1), json!(3)]);
        assert_eq!(table.column("missing").count(), 0);
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
    }
}
