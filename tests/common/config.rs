//! Test configuration pointing the pipeline at a wiremock server

use clickup_sheets_sync::{Config, RetryConfig, Syncer};
use std::time::Duration;
use wiremock::MockServer;

/// Team id used by every fixture hierarchy
pub const TEAM_ID: &str = "team-1";

/// Configuration with fast retries against `server`
pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.clickup.api_token = "pk_test".into();
    config.clickup.base_url = server.uri();
    config.clickup.team_id = TEAM_ID.into();
    config.clickup.request_timeout = Duration::from_secs(5);
    config.retry = RetryConfig {
        max_attempts: 3,
        initial_delay: Duration::from_millis(5),
        backoff_multiplier: 2.0,
    };
    config.export.task_spreadsheet_id = "task-sheet".into();
    config.export.time_spreadsheet_id = "time-sheet".into();
    config
}

/// Syncer built from [`test_config`]
pub fn test_syncer(server: &MockServer) -> Syncer {
    Syncer::new(test_config(server)).expect("test config is valid")
}
