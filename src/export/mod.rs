//! Tabular export sinks
//!
//! A sink receives a finished [`Table`] together with a destination (a
//! spreadsheet id) and a tab name, and replaces that tab's content with the
//! table: header row first, nulls as empty strings, every cell stringified,
//! written from the top-left cell. Writing the same table twice leaves the
//! same content.

pub mod sheets;

pub use sheets::SheetsSink;

use crate::error::Result;
use crate::types::Table;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Destination for flattened datasets
#[async_trait]
pub trait TabularSink: Send + Sync {
    /// Create `tab` in `destination` if absent, otherwise clear it, then write `table` at A1
    async fn upsert(&self, destination: &str, tab: &str, table: &Table) -> Result<()>;
}

/// Sink keeping exported grids in memory, used for dry runs
#[derive(Debug, Default)]
pub struct MemorySink {
    tabs: Mutex<HashMap<(String, String), Vec<Vec<String>>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Grid last written to `destination`/`tab`, header row included
    pub fn tab(&self, destination: &str, tab: &str) -> Option<Vec<Vec<String>>> {
        self.lock()
            .get(&(destination.to_string(), tab.to_string()))
            .cloned()
    }

    /// Number of tabs written so far
    pub fn tab_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), Vec<Vec<String>>>> {
        // a poisoned map still holds whole grids; keep using it
        self.tabs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl TabularSink for MemorySink {
    async fn upsert(&self, destination: &str, tab: &str, table: &Table) -> Result<()> {
        let grid = table.to_string_grid();
        tracing::info!(destination, tab, rows = table.len(), "stored table in memory");
        self.lock()
            .insert((destination.to_string(), tab.to_string()), grid);
        Ok(())
    }
}
