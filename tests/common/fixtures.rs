//! ClickUp payload fixtures and mock mounting helpers

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::TEAM_ID;

/// 2025-01-01T00:00:00Z in ms
pub const JAN_1_2025: i64 = 1_735_689_600_000;

/// Mount a 200 JSON response for `GET route`
pub async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a bare status response for `GET route`
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Mount team → one space → one folder → one list (`list-1`) returning `task_ids`
pub async fn mount_hierarchy(server: &MockServer, task_ids: &[&str]) {
    mount_get(
        server,
        &format!("/team/{TEAM_ID}/space"),
        json!({"spaces": [{"id": "space-1"}]}),
    )
    .await;
    mount_get(server, "/space/space-1/folder", json!({"folders": [{"id": "folder-1"}]})).await;
    mount_get(server, "/folder/folder-1/list", json!({"lists": [{"id": "list-1"}]})).await;

    let tasks: Vec<_> = task_ids.iter().map(|id| json!({"id": id})).collect();
    mount_get(server, "/list/list-1/task", json!({"tasks": tasks})).await;
}

/// Task detail payload with the given assignees and custom fields
pub fn task_payload(id: &str, name: &str, assignees: &[(i64, &str)], custom_fields: Value) -> Value {
    let assignees: Vec<_> = assignees
        .iter()
        .map(|(uid, username)| json!({"id": uid, "username": username}))
        .collect();
    json!({
        "id": id,
        "name": name,
        "status": {"status": "to do", "type": "open"},
        "date_created": JAN_1_2025.to_string(),
        "date_updated": null,
        "archived": false,
        "assignees": assignees,
        "tags": [],
        "time_estimate": null,
        "time_spent": 0,
        "custom_fields": custom_fields,
        "creator": {"id": 99, "username": "owner"},
        "url": format!("https://app.clickup.com/t/{id}"),
        "list": {"id": "list-1", "name": "Backlog"},
        "folder": {"id": "folder-1", "name": "Operações"},
        "project": {"id": "folder-1", "name": "Operações"},
        "space": {"id": "space-1"},
        "watchers": []
    })
}

/// Time tracking payload with one user and the given `(interval_id, duration_ms)` pairs
pub fn time_payload(user_id: i64, username: &str, intervals: &[(&str, i64)]) -> Value {
    let intervals: Vec<_> = intervals
        .iter()
        .map(|(id, ms)| {
            json!({
                "id": id,
                "start": JAN_1_2025.to_string(),
                "end": (JAN_1_2025 + ms).to_string(),
                "time": ms.to_string()
            })
        })
        .collect();
    json!({"data": [{"user": {"id": user_id, "username": username}, "intervals": intervals}]})
}
