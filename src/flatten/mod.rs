//! Flattening of ClickUp task payloads into export tables
//!
//! Both flatteners walk the task id list sequentially and isolate failures per
//! task: a task whose fetch fails is logged, counted in [`Flattened::skipped`]
//! and left out, and the batch continues.

pub mod custom_fields;
pub mod details;
pub mod time_entries;

use crate::clickup::ClickUpClient;
use crate::config::FlattenConfig;
use crate::types::Table;
use chrono_tz::Tz;

/// A flattened dataset and the number of tasks that could not be fetched
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Flattened {
    /// Rows produced
    pub table: Table,
    /// Tasks skipped because their fetch failed
    pub skipped: usize,
}

/// Fetches task payloads and projects them into rows
#[derive(Clone, Copy, Debug)]
pub struct Flattener<'a> {
    client: &'a ClickUpClient,
    options: &'a FlattenConfig,
    tz: Tz,
}

impl<'a> Flattener<'a> {
    /// Create a flattener rendering timestamps in `tz`
    pub fn new(client: &'a ClickUpClient, options: &'a FlattenConfig, tz: Tz) -> Self {
        Self {
            client,
            options,
            tz,
        }
    }
}
