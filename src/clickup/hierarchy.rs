//! Resource hierarchy walk: team → spaces → folders → lists → task ids
//!
//! Every operation fetches one listing per parent id and concatenates the child
//! ids in parent order, then response order. Nothing is de-duplicated here, and
//! any failed request aborts the whole walk: a silently missing container would
//! truncate the export scope.

use super::model::{FoldersResponse, ListsResponse, SpacesResponse, TasksResponse};
use super::{ClickUpClient, Query, segment};
use crate::error::Result;
use crate::types::ScopeFilter;

impl ClickUpClient {
    /// Space ids of a team
    pub async fn list_spaces(&self, team_id: &str, archived: bool) -> Result<Vec<String>> {
        let response: SpacesResponse = self
            .get(&format!("team/{}/space", segment(team_id)), &archived_query(archived))
            .await?;
        let spaces: Vec<_> = response.spaces.into_iter().map(|s| s.id).collect();
        tracing::info!(team_id, count = spaces.len(), "fetched spaces");
        Ok(spaces)
    }

    /// Folder ids of every space, in space order
    pub async fn list_folders(&self, space_ids: &[String], archived: bool) -> Result<Vec<String>> {
        let mut folders = Vec::new();
        for space_id in space_ids {
            let response: FoldersResponse = self
                .get(&format!("space/{}/folder", segment(space_id)), &archived_query(archived))
                .await?;
            folders.extend(response.folders.into_iter().map(|f| f.id));
        }
        tracing::info!(spaces = space_ids.len(), count = folders.len(), "fetched folders");
        Ok(folders)
    }

    /// List ids of every folder, in folder order
    pub async fn list_lists(&self, folder_ids: &[String], archived: bool) -> Result<Vec<String>> {
        let mut lists = Vec::new();
        for folder_id in folder_ids {
            let response: ListsResponse = self
                .get(&format!("folder/{}/list", segment(folder_id)), &archived_query(archived))
                .await?;
            lists.extend(response.lists.into_iter().map(|l| l.id));
        }
        tracing::info!(folders = folder_ids.len(), count = lists.len(), "fetched lists");
        Ok(lists)
    }

    /// Ids of lists that sit directly under each space, outside any folder
    pub async fn list_folderless_lists(
        &self,
        space_ids: &[String],
        archived: bool,
    ) -> Result<Vec<String>> {
        let mut lists = Vec::new();
        for space_id in space_ids {
            let response: ListsResponse = self
                .get(&format!("space/{}/list", segment(space_id)), &archived_query(archived))
                .await?;
            lists.extend(response.lists.into_iter().map(|l| l.id));
        }
        tracing::info!(spaces = space_ids.len(), count = lists.len(), "fetched folderless lists");
        Ok(lists)
    }

    /// Task ids of every list within the scope, in list order
    ///
    /// Subtasks and closed tasks are included. Unset bounds are sent as empty
    /// strings, which ClickUp treats as "no bound". Pages are followed while the
    /// response reports `last_page: false`.
    pub async fn list_tasks(&self, list_ids: &[String], scope: &ScopeFilter) -> Result<Vec<String>> {
        let mut tasks = Vec::new();
        for list_id in list_ids {
            let path = format!("list/{}/task", segment(list_id));
            let mut page = 0u32;
            loop {
                let response: TasksResponse = self.get(&path, &task_query(scope, page)).await?;
                let fetched = response.tasks.len();
                tasks.extend(response.tasks.into_iter().map(|t| t.id));

                if fetched == 0 || response.last_page != Some(false) {
                    break;
                }
                page += 1;
            }
            tracing::debug!(list_id = %list_id, pages = page + 1, "enumerated list");
        }
        tracing::info!(lists = list_ids.len(), count = tasks.len(), "fetched task ids");
        Ok(tasks)
    }
}

fn archived_query(archived: bool) -> Query {
    vec![("archived", archived.to_string())]
}

fn task_query(scope: &ScopeFilter, page: u32) -> Query {
    let bound = |ms: Option<i64>| ms.map(|ms| ms.to_string()).unwrap_or_default();
    vec![
        ("archived", scope.archived_param().to_string()),
        ("subtasks", "true".into()),
        ("include_closed", "true".into()),
        ("include_stats", "true".into()),
        ("date_created_gt", bound(scope.created_after)),
        ("due_date_lt", bound(scope.due_before)),
        ("page", page.to_string()),
    ]
}

/// Drop repeated ids, keeping the first occurrence
pub fn dedupe_ids(ids: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
