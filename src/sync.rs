//! One sync run: walk → enumerate → flatten → export
//!
//! The walk and the enumeration are all-or-nothing: any error aborts the run
//! before anything is exported. Flattening isolates failures per task. Both
//! datasets are fully assembled before the first export call, so an aborted run
//! never leaves a partially written destination.

use crate::clickup::ClickUpClient;
use crate::clickup::hierarchy::dedupe_ids;
use crate::config::Config;
use crate::error::Result;
use crate::export::TabularSink;
use crate::flatten::Flattener;
use crate::types::{ScopeFilter, SyncReport};
use crate::utils::tab_name;

/// Runs the ClickUp → spreadsheet pipeline
#[derive(Debug)]
pub struct Syncer {
    config: Config,
    client: ClickUpClient,
}

impl Syncer {
    /// Validate the configuration and build the ClickUp client
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = ClickUpClient::new(&config.clickup, config.retry.clone())?;
        Ok(Self { config, client })
    }

    /// The ClickUp client used by this syncer
    pub fn client(&self) -> &ClickUpClient {
        &self.client
    }

    /// The configuration this syncer was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve every task id in scope (team → spaces → folders → lists → tasks)
    pub async fn collect_task_ids(&self, scope: &ScopeFilter) -> Result<Vec<String>> {
        let archived = scope.archived;
        let spaces = self
            .client
            .list_spaces(&self.config.clickup.team_id, archived)
            .await?;
        let folders = self.client.list_folders(&spaces, archived).await?;
        let mut lists = self.client.list_lists(&folders, archived).await?;

        if self.config.walk.include_folderless_lists {
            lists.extend(self.client.list_folderless_lists(&spaces, archived).await?);
        }
        if self.config.walk.dedupe_list_ids {
            let before = lists.len();
            lists = dedupe_ids(lists);
            tracing::debug!(before, after = lists.len(), "deduplicated list ids");
        }

        self.client.list_tasks(&lists, scope).await
    }

    /// Run the whole pipeline and export both datasets through `sink`
    ///
    /// The tab is the `MM-YYYY` of the scope start in the display zone, or of
    /// the current time when the scope has no start bound. Empty datasets are
    /// not exported.
    pub async fn run(&self, scope: ScopeFilter, sink: &dyn TabularSink) -> Result<SyncReport> {
        let tz = self.config.display_time_zone;
        let tab = tab_name(
            scope
                .created_after
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis()),
            tz,
        )?;
        tracing::info!(?scope, tab = %tab, "starting sync run");

        let task_ids = self.collect_task_ids(&scope).await?;
        tracing::info!(count = task_ids.len(), "tasks found");

        let flattener = Flattener::new(&self.client, &self.config.flatten, tz);
        let details = flattener.detail_rows(&task_ids).await;
        let time_entries = flattener.time_rows(&task_ids).await;

        let export = &self.config.export;
        for (destination, table) in [
            (&export.task_spreadsheet_id, &details.table),
            (&export.time_spreadsheet_id, &time_entries.table),
        ] {
            if table.is_empty() {
                tracing::info!(destination = %destination, "dataset is empty, nothing exported");
                continue;
            }
            sink.upsert(destination, &tab, table).await?;
        }

        let report = SyncReport {
            tab,
            task_ids: task_ids.len(),
            detail_rows: details.table.len(),
            time_rows: time_entries.table.len(),
            skipped_details: details.skipped,
            skipped_time_entries: time_entries.skipped,
        };
        tracing::info!(?report, "sync run finished");
        Ok(report)
    }
}
