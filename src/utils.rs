//! Timestamp conversion and naming helpers
//!
//! ClickUp returns timestamps as millisecond epoch values, sometimes as JSON
//! numbers and sometimes as numeric strings. Rows carry them as
//! `dd/mm/yyyy HH:MM:SS` strings rendered in the configured display zone.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde_json::Value;

/// Display format for every timestamp column
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Tab naming format (month-year of the scope start)
pub const TAB_FORMAT: &str = "%m-%Y";

/// Read a millisecond epoch out of a JSON value
///
/// Accepts integers, floats and numeric strings. Null, empty strings, zero
/// and anything non-numeric yield `None`.
pub fn timestamp_ms(value: &Value) -> Option<i64> {
    let ms = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    (ms != 0).then_some(ms)
}

/// Render a millisecond epoch as `dd/mm/yyyy HH:MM:SS` in `tz`
///
/// `None` and zero render as `None`, never as the epoch date.
pub fn to_display(ms: Option<i64>, tz: Tz) -> Option<String> {
    let ms = ms.filter(|ms| *ms != 0)?;
    let utc = DateTime::from_timestamp_millis(ms)?;
    Some(utc.with_timezone(&tz).format(DISPLAY_FORMAT).to_string())
}

/// Render a JSON timestamp value, see [`timestamp_ms`] and [`to_display`]
pub fn display_value(value: &Value, tz: Tz) -> Value {
    to_display(timestamp_ms(value), tz).map_or(Value::Null, Value::String)
}

/// Parse a `dd/mm/yyyy HH:MM:SS` string in `tz` back to a millisecond epoch
pub fn parse_display(text: &str, tz: Tz) -> Result<i64> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), DISPLAY_FORMAT)
        .map_err(|e| Error::InvalidInput(format!("{text:?} is not dd/mm/yyyy HH:MM:SS: {e}")))?;
    local_to_ms(naive, tz)
}

/// Combine a calendar date and wall-clock time in `tz` into a millisecond epoch
pub fn date_time_to_ms(date: NaiveDate, time: NaiveTime, tz: Tz) -> Result<i64> {
    local_to_ms(date.and_time(time), tz)
}

fn local_to_ms(naive: NaiveDateTime, tz: Tz) -> Result<i64> {
    // Ambiguous wall-clock times (DST fall-back) resolve to the earlier instant
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| Error::InvalidInput(format!("{naive} does not exist in {tz}")))
}

/// Tab name for a scope starting at `ms`: the `MM-YYYY` of that instant in `tz`
pub fn tab_name(ms: i64, tz: Tz) -> Result<String> {
    let utc = DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| Error::InvalidInput(format!("timestamp {ms} is out of range")))?;
    Ok(utc.with_timezone(&tz).format(TAB_FORMAT).to_string())
}
