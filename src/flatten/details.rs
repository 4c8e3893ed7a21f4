//! Task detail rows
//!
//! One row per assignee. A task without assignees produces no rows unless
//! `keep_unassigned_tasks` is set, in which case it gets one row with empty
//! assignee columns.

use super::custom_fields::CustomFieldRule;
use super::{Flattened, Flattener};
use crate::clickup::model::{Container, Task, User};
use crate::types::Table;
use crate::utils::display_value;
use chrono_tz::Tz;
use serde_json::Value;

/// Columns before the custom field block
pub const LEADING_COLUMNS: [&str; 17] = [
    "task_id",
    "task_name",
    "task_status",
    "task_status_type",
    "task_date_created",
    "task_date_updated",
    "task_date_closed",
    "task_date_done",
    "archived",
    "assignee_id",
    "assignee_username",
    "parent",
    "due_date",
    "start_date",
    "tags",
    "time_estimate",
    "time_spent",
];

/// Columns after the custom field block
pub const TRAILING_COLUMNS: [&str; 11] = [
    "creator",
    "creator_id",
    "url",
    "id_list",
    "list",
    "id_folder",
    "folder",
    "id_project",
    "project",
    "space",
    "watchers",
];

const ASSIGNEE_ID: usize = 9;
const ASSIGNEE_USERNAME: usize = 10;

/// Full column set for a rule table
pub fn detail_columns(rules: &[CustomFieldRule]) -> Vec<String> {
    LEADING_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(rules.iter().map(|r| r.column.clone()))
        .chain(TRAILING_COLUMNS.iter().map(|c| c.to_string()))
        .collect()
}

/// Project one task into its detail rows
pub fn task_rows(
    task: &Task,
    rules: &[CustomFieldRule],
    tz: Tz,
    keep_unassigned: bool,
) -> Vec<Vec<Value>> {
    if task.assignees.is_empty() && !keep_unassigned {
        return Vec::new();
    }

    let template = row_template(task, rules, tz);
    if task.assignees.is_empty() {
        return vec![template];
    }

    task.assignees
        .iter()
        .map(|assignee| {
            let mut row = template.clone();
            row[ASSIGNEE_ID] = assignee.id.clone();
            row[ASSIGNEE_USERNAME] = text(assignee.username.as_deref());
            row
        })
        .collect()
}

/// Row with every column filled except the assignee pair
fn row_template(task: &Task, rules: &[CustomFieldRule], tz: Tz) -> Vec<Value> {
    let status = task.status.clone().unwrap_or_default();
    let creator = task.creator.clone().unwrap_or_default();
    let (id_list, list) = container(task.list.as_ref());
    let (id_folder, folder) = container(task.folder.as_ref());
    let (id_project, project) = container(task.project.as_ref());
    let (space, _) = container(task.space.as_ref());

    let mut row = Vec::with_capacity(LEADING_COLUMNS.len() + rules.len() + TRAILING_COLUMNS.len());
    row.extend([
        Value::String(task.id.clone()),
        text(task.name.as_deref()),
        text(status.status.as_deref()),
        text(status.kind.as_deref()),
        display_value(&task.date_created, tz),
        display_value(&task.date_updated, tz),
        display_value(&task.date_closed, tz),
        display_value(&task.date_done, tz),
        Value::Bool(task.archived.unwrap_or(false)),
        Value::Null,
        Value::Null,
        text(task.parent.as_deref()),
        display_value(&task.due_date, tz),
        display_value(&task.start_date, tz),
        Value::Array(
            task.tags
                .iter()
                .map(|tag| Value::String(tag.name.clone().unwrap_or_default()))
                .collect(),
        ),
        task.time_estimate.clone(),
        task.time_spent.clone(),
    ]);
    row.extend(rules.iter().map(|rule| rule.extract(&task.custom_fields, tz)));
    row.extend([
        text(creator.username.as_deref()),
        creator.id,
        text(task.url.as_deref()),
        id_list,
        list,
        id_folder,
        folder,
        id_project,
        project,
        space,
        usernames(&task.watchers),
    ]);
    row
}

fn text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |s| Value::String(s.to_string()))
}

fn container(container: Option<&Container>) -> (Value, Value) {
    container.map_or((Value::Null, Value::Null), |c| {
        (c.id.clone(), text(c.name.as_deref()))
    })
}

fn usernames(users: &[User]) -> Value {
    Value::Array(users.iter().map(|u| text(u.username.as_deref())).collect())
}

impl Flattener<'_> {
    /// Fetch every task and flatten it into detail rows
    ///
    /// The column set depends only on the configured rules, never on which
    /// custom fields the fetched tasks carry.
    pub async fn detail_rows(&self, task_ids: &[String]) -> Flattened {
        let rules = &self.options.custom_fields;
        let mut table = Table::new(detail_columns(rules));
        let mut skipped = 0;

        for (index, task_id) in task_ids.iter().enumerate() {
            tracing::debug!(task_id = %task_id, position = index + 1, total = task_ids.len(), "fetching task details");
            match self.client.task(task_id).await {
                Ok(task) => {
                    for row in task_rows(&task, rules, self.tz, self.options.keep_unassigned_tasks) {
                        table.push_row(row);
                    }
                }
                Err(e) => {
                    skipped += 1;
                    tracing::error!(task_id = %task_id, error = %e, "failed to fetch task details, skipping");
                }
            }
        }

        tracing::info!(
            tasks = task_ids.len(),
            rows = table.len(),
            skipped,
            "task details flattened"
        );
        Flattened { table, skipped }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clickup::tests::test_client;
    use crate::config::FlattenConfig;
    use crate::flatten::custom_fields::default_rules;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn full_task() -> Task {
        serde_json::from_value(json!({
            "id": "3",
            "name": "Relatório mensal",
            "status": {"status": "em andamento", "type": "custom"},
            "date_created": "1735689600000",
            "date_updated": "1735693200000",
            "date_closed": null,
            "date_done": null,
            "archived": false,
            "assignees": [
                {"id": 11, "username": "ana"},
                {"id": 12, "username": "bruno"}
            ],
            "parent": null,
            "due_date": "1736294400000",
            "start_date": null,
            "tags": [{"name": "cliente"}, {"name": "urgente"}],
            "time_estimate": 3600000,
            "time_spent": 1800000,
            "custom_fields": [
                {"id": "ef1", "name": "Eficiência", "value": "Alta"},
                {"id": "pg1", "name": "Progresso", "value": {"current": "40"}}
            ],
            "creator": {"id": 10, "username": "carla"},
            "url": "https://app.clickup.com/t/3",
            "list": {"id": "l1", "name": "Sprint"},
            "folder": {"id": "f1", "name": "Projetos"},
            "project": {"id": "f1", "name": "Projetos"},
            "space": {"id": "s1"},
            "watchers": [{"id": 10, "username": "carla"}, {"id": 11, "username": "ana"}]
        }))
        .unwrap()
    }

    fn cell<'a>(columns: &[String], row: &'a [Value], name: &str) -> &'a Value {
        let idx = columns.iter().position(|c| c == name).unwrap();
        &row[idx]
    }

    #[test]
    fn assignee_columns_sit_at_expected_positions() {
        assert_eq!(LEADING_COLUMNS[ASSIGNEE_ID], "assignee_id");
        assert_eq!(LEADING_COLUMNS[ASSIGNEE_USERNAME], "assignee_username");
    }

    #[test]
    fn columns_place_custom_fields_between_fixed_blocks() {
        let columns = detail_columns(&default_rules());
        assert_eq!(columns.len(), 17 + 6 + 11);
        assert_eq!(columns[16], "time_spent");
        assert_eq!(columns[17], "custom_fields_Eficiência");
        assert_eq!(columns[23], "creator");
        assert_eq!(columns.last().unwrap(), "watchers");
    }

    #[test]
    fn one_row_per_assignee_differing_only_in_assignee() {
        let rules = default_rules();
        let columns = detail_columns(&rules);
        let rows = task_rows(&full_task(), &rules, Tz::UTC, false);

        assert_eq!(rows.len(), 2);
        assert_eq!(cell(&columns, &rows[0], "assignee_id"), &json!(11));
        assert_eq!(cell(&columns, &rows[1], "assignee_username"), &json!("bruno"));

        for (i, (a, b)) in rows[0].iter().zip(&rows[1]).enumerate() {
            if i != ASSIGNEE_ID && i != ASSIGNEE_USERNAME {
                assert_eq!(a, b, "column {} differs", columns[i]);
            }
        }
        for row in &rows {
            assert_eq!(cell(&columns, row, "custom_fields_Eficiência"), &json!("Alta"));
        }
    }

    #[test]
    fn field_mapping() {
        let rules = default_rules();
        let columns = detail_columns(&rules);
        let row = &task_rows(&full_task(), &rules, Tz::UTC, false)[0];

        assert_eq!(cell(&columns, row, "task_id"), &json!("3"));
        assert_eq!(cell(&columns, row, "task_status"), &json!("em andamento"));
        assert_eq!(cell(&columns, row, "task_status_type"), &json!("custom"));
        assert_eq!(cell(&columns, row, "task_date_created"), &json!("01/01/2025 00:00:00"));
        assert_eq!(cell(&columns, row, "task_date_updated"), &json!("01/01/2025 01:00:00"));
        assert_eq!(cell(&columns, row, "task_date_closed"), &Value::Null);
        assert_eq!(cell(&columns, row, "due_date"), &json!("08/01/2025 00:00:00"));
        assert_eq!(cell(&columns, row, "archived"), &json!(false));
        assert_eq!(cell(&columns, row, "tags"), &json!(["cliente", "urgente"]));
        assert_eq!(cell(&columns, row, "time_estimate"), &json!(3600000));
        assert_eq!(cell(&columns, row, "custom_fields_Progresso"), &json!("40"));
        assert_eq!(cell(&columns, row, "custom_fields_Tipo de Tarefa"), &Value::Null);
        assert_eq!(cell(&columns, row, "creator"), &json!("carla"));
        assert_eq!(cell(&columns, row, "creator_id"), &json!(10));
        assert_eq!(cell(&columns, row, "id_list"), &json!("l1"));
        assert_eq!(cell(&columns, row, "folder"), &json!("Projetos"));
        assert_eq!(cell(&columns, row, "space"), &json!("s1"));
        assert_eq!(cell(&columns, row, "watchers"), &json!(["carla", "ana"]));
    }

    #[test]
    fn unassigned_task_yields_no_rows_by_default() {
        let mut task = full_task();
        task.assignees.clear();
        assert!(task_rows(&task, &default_rules(), Tz::UTC, false).is_empty());
    }

    #[test]
    fn unassigned_task_kept_with_null_assignee_when_enabled() {
        let rules = default_rules();
        let columns = detail_columns(&rules);
        let mut task = full_task();
        task.assignees.clear();

        let rows = task_rows(&task, &rules, Tz::UTC, true);
        assert_eq!(rows.len(), 1);
        assert_eq!(cell(&columns, &rows[0], "assignee_id"), &Value::Null);
        assert_eq!(cell(&columns, &rows[0], "task_name"), &json!("Relatório mensal"));
    }

    #[test]
    fn row_width_matches_columns() {
        let rules = default_rules();
        for row in task_rows(&full_task(), &rules, Tz::UTC, false) {
            assert_eq!(row.len(), detail_columns(&rules).len());
        }
    }

    #[test]
    fn sparse_task_fills_nulls() {
        let task: Task =
            serde_json::from_value(json!({"id": "9", "assignees": [{"id": 1}]})).unwrap();
        let rules = default_rules();
        let columns = detail_columns(&rules);
        let rows = task_rows(&task, &rules, Tz::UTC, false);

        assert_eq!(rows.len(), 1);
        assert_eq!(cell(&columns, &rows[0], "task_status"), &Value::Null);
        assert_eq!(cell(&columns, &rows[0], "archived"), &json!(false));
        assert_eq!(cell(&columns, &rows[0], "tags"), &json!([]));
        assert_eq!(cell(&columns, &rows[0], "list"), &Value::Null);
    }

    #[tokio::test]
    async fn failed_task_is_skipped_and_batch_continues() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/task/1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/task/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "2",
                "name": "ok",
                "assignees": [{"id": 1, "username": "ana"}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let options = FlattenConfig::default();
        let flattener = Flattener::new(&client, &options, Tz::UTC);
        let out = flattener.detail_rows(&["1".into(), "2".into()]).await;

        assert_eq!(out.skipped, 1);
        assert_eq!(out.table.len(), 1);
        assert_eq!(out.table.get(0, "task_id"), Some(&json!("2")));
    }

    #[tokio::test]
    async fn empty_input_keeps_column_set() {
        let server = MockServer::start().await;
        let client = test_client(&server);
        let options = FlattenConfig::default();
        let out = Flattener::new(&client, &options, Tz::UTC).detail_rows(&[]).await;

        assert!(out.table.is_empty());
        assert_eq!(out.table.columns().len(), 34);
    }
}
