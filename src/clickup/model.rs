//! ClickUp v2 response shapes
//!
//! Only the fields the pipeline reads are modelled. Fields ClickUp may send as
//! `null` are either `Option` or use [`null_as_default`]; timestamps and ids
//! whose JSON type varies between endpoints stay as raw [`Value`]s.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize `null` (or a missing field, together with `#[serde(default)]`) as `T::default()`
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize an id that may arrive as a string or a number
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Deserialize an integer amount sent as a number or numeric string
fn int_amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| serde::de::Error::custom(format!("{n} is not an integer"))),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("{s:?} is not an integer"))),
        other => Err(serde::de::Error::custom(format!(
            "expected integer amount, got {other}"
        ))),
    }
}

/// Any listed resource; only its id is used
#[derive(Clone, Debug, Deserialize)]
pub struct Resource {
    /// Resource id
    #[serde(deserialize_with = "id_string")]
    pub id: String,
}

/// `GET /team/{id}/space`
#[derive(Debug, Deserialize)]
pub struct SpacesResponse {
    /// Spaces of the team
    #[serde(default, deserialize_with = "null_as_default")]
    pub spaces: Vec<Resource>,
}

/// `GET /space/{id}/folder`
#[derive(Debug, Deserialize)]
pub struct FoldersResponse {
    /// Folders of the space
    #[serde(default, deserialize_with = "null_as_default")]
    pub folders: Vec<Resource>,
}

/// `GET /folder/{id}/list` and `GET /space/{id}/list`
#[derive(Debug, Deserialize)]
pub struct ListsResponse {
    /// Lists of the folder or space
    #[serde(default, deserialize_with = "null_as_default")]
    pub lists: Vec<Resource>,
}

/// `GET /list/{id}/task`
#[derive(Debug, Deserialize)]
pub struct TasksResponse {
    /// One page of tasks
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<Resource>,
    /// Present on paginated responses; `Some(false)` means another page follows
    #[serde(default)]
    pub last_page: Option<bool>,
}

/// A user reference (assignee, watcher, creator, time tracker)
#[derive(Clone, Debug, Default, Deserialize)]
pub struct User {
    /// Numeric user id, kept as sent
    #[serde(default)]
    pub id: Value,
    /// Display username
    #[serde(default)]
    pub username: Option<String>,
}

/// Task status
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Status {
    /// Status label (e.g. "in progress")
    #[serde(default)]
    pub status: Option<String>,
    /// Status category (e.g. "open", "custom", "closed")
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Task tag
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Tag {
    /// Tag label
    #[serde(default)]
    pub name: Option<String>,
}

/// List, folder, project or space a task belongs to
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Container {
    /// Container id
    #[serde(default)]
    pub id: Value,
    /// Container name (absent for spaces)
    #[serde(default)]
    pub name: Option<String>,
}

/// Custom field attached to a task
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CustomField {
    /// Stable field id
    #[serde(default)]
    pub id: Option<String>,
    /// Mutable display name
    #[serde(default)]
    pub name: Option<String>,
    /// Field value; its shape depends on the field type
    #[serde(default)]
    pub value: Value,
}

/// `GET /task/{id}`
#[derive(Clone, Debug, Deserialize)]
pub struct Task {
    /// Task id
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Task name
    #[serde(default)]
    pub name: Option<String>,
    /// Current status
    #[serde(default)]
    pub status: Option<Status>,
    /// Creation timestamp (ms epoch)
    #[serde(default)]
    pub date_created: Value,
    /// Last update timestamp (ms epoch)
    #[serde(default)]
    pub date_updated: Value,
    /// Close timestamp (ms epoch)
    #[serde(default)]
    pub date_closed: Value,
    /// Done timestamp (ms epoch)
    #[serde(default)]
    pub date_done: Value,
    /// Archive flag
    #[serde(default)]
    pub archived: Option<bool>,
    /// Assigned users
    #[serde(default, deserialize_with = "null_as_default")]
    pub assignees: Vec<User>,
    /// Parent task id for subtasks
    #[serde(default)]
    pub parent: Option<String>,
    /// Due timestamp (ms epoch)
    #[serde(default)]
    pub due_date: Value,
    /// Start timestamp (ms epoch)
    #[serde(default)]
    pub start_date: Value,
    /// Tags
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    /// Estimate in ms
    #[serde(default)]
    pub time_estimate: Value,
    /// Tracked time in ms
    #[serde(default)]
    pub time_spent: Value,
    /// Custom fields
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomField>,
    /// Creator
    #[serde(default)]
    pub creator: Option<User>,
    /// Web URL
    #[serde(default)]
    pub url: Option<String>,
    /// Owning list
    #[serde(default)]
    pub list: Option<Container>,
    /// Owning folder
    #[serde(default)]
    pub folder: Option<Container>,
    /// Owning project (legacy alias of folder)
    #[serde(default)]
    pub project: Option<Container>,
    /// Owning space
    #[serde(default)]
    pub space: Option<Container>,
    /// Watchers
    #[serde(default, deserialize_with = "null_as_default")]
    pub watchers: Vec<User>,
}

/// Name-only view of `GET /task/{id}`
#[derive(Debug, Deserialize)]
pub struct TaskName {
    /// Task name
    #[serde(default)]
    pub name: Option<String>,
}

/// One tracked interval
#[derive(Clone, Debug, Deserialize)]
pub struct Interval {
    /// Interval id
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Start timestamp (ms epoch)
    #[serde(default)]
    pub start: Value,
    /// End timestamp (ms epoch)
    #[serde(default)]
    pub end: Value,
    /// Duration in ms
    #[serde(deserialize_with = "int_amount")]
    pub time: i64,
}

/// Time tracked on a task by one user
#[derive(Clone, Debug, Deserialize)]
pub struct UserTime {
    /// The tracking user
    pub user: User,
    /// Tracked intervals
    #[serde(default, deserialize_with = "null_as_default")]
    pub intervals: Vec<Interval>,
}

/// `GET /task/{id}/time`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TimeTracking {
    /// Per-user tracked time
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<UserTime>,
}
