//! # clickup-sheets-sync
//!
//! Batch export of ClickUp task details and time entries into Google Sheets tabs.
//!
//! ## Pipeline
//!
//! A run is driven by a [`ScopeFilter`] (creation/due window plus archive flag):
//!
//! 1. **Walk** the team's spaces, folders and lists ([`clickup::hierarchy`])
//! 2. **Enumerate** task ids per list within the scope
//! 3. **Flatten** each task into detail rows (one per assignee) and each tracked
//!    interval into a time entry row ([`flatten`])
//! 4. **Export** both tables into a `MM-YYYY` tab of their spreadsheets ([`export`])
//!
//! Every ClickUp request goes through [`retry::with_backoff`]: HTTP 429 backs off
//! exponentially, transport failures retry immediately, other statuses fail.
//! Walk and enumeration failures abort the run; per-task failures are logged and
//! skipped.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clickup_sheets_sync::{Config, ScopeFilter, Syncer};
//! use clickup_sheets_sync::export::SheetsSink;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let sink = SheetsSink::new(&config.export)?;
//!     let syncer = Syncer::new(config)?;
//!
//!     let scope = ScopeFilter::new(Some(1_735_689_600_000), Some(1_738_367_940_000), false);
//!     let report = syncer.run(scope, &sink).await?;
//!     println!("{} detail rows, {} time rows", report.detail_rows, report.time_rows);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// ClickUp API client, hierarchy walk and wire models
pub mod clickup;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Tabular export sinks
pub mod export;
/// Task and time entry flattening
pub mod flatten;
/// Retry logic with exponential backoff
pub mod retry;
/// Sync run orchestration
pub mod sync;
/// Core types
pub mod types;
/// Timestamp and naming helpers
pub mod utils;

// Re-export commonly used types
pub use clickup::ClickUpClient;
pub use config::{Config, RetryConfig};
pub use error::{Error, Result};
pub use export::{MemorySink, SheetsSink, TabularSink};
pub use flatten::custom_fields::{CustomFieldRule, FieldMatch, ValueExtractor};
pub use flatten::{Flattened, Flattener};
pub use sync::Syncer;
pub use types::{ScopeFilter, SyncReport, Table};
