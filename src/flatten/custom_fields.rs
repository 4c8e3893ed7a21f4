//! Declarative custom-field extraction
//!
//! Each [`CustomFieldRule`] names an output column, how to find the field on a
//! task (by display name or by stable id) and how to turn the field value into
//! a cell. Rules are evaluated in order; the first matching field wins. A rule
//! with no matching field yields `null`.

use crate::clickup::model::CustomField;
use crate::utils::display_value;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a rule locates its field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum FieldMatch {
    /// Exact display-name match
    Name(String),
    /// Exact id match, for fields whose name changes
    Id(String),
}

impl FieldMatch {
    fn matches(&self, field: &CustomField) -> bool {
        match self {
            FieldMatch::Name(name) => field.name.as_deref() == Some(name.as_str()),
            FieldMatch::Id(id) => field.id.as_deref() == Some(id.as_str()),
        }
    }
}

/// How a matched field's value becomes a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueExtractor {
    /// The value as sent
    #[default]
    Raw,
    /// The `current` member of an object value (progress fields)
    Current,
    /// A millisecond epoch rendered as `dd/mm/yyyy HH:MM:SS`
    Timestamp,
}

impl ValueExtractor {
    fn extract(self, value: &Value, tz: Tz) -> Value {
        match self {
            ValueExtractor::Raw => value.clone(),
            ValueExtractor::Current => value.get("current").cloned().unwrap_or(Value::Null),
            ValueExtractor::Timestamp => display_value(value, tz),
        }
    }
}

/// One output column fed from a custom field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldRule {
    /// Output column label
    pub column: String,
    /// Field lookup
    pub matcher: FieldMatch,
    /// Value projection (default: raw)
    #[serde(default)]
    pub extractor: ValueExtractor,
}

impl CustomFieldRule {
    /// Rule matching a field by display name
    pub fn by_name(column: impl Into<String>, name: impl Into<String>, extractor: ValueExtractor) -> Self {
        Self {
            column: column.into(),
            matcher: FieldMatch::Name(name.into()),
            extractor,
        }
    }

    /// Rule matching a field by id
    pub fn by_id(column: impl Into<String>, id: impl Into<String>, extractor: ValueExtractor) -> Self {
        Self {
            column: column.into(),
            matcher: FieldMatch::Id(id.into()),
            extractor,
        }
    }

    /// Cell value for this rule on a task's custom fields
    pub fn extract(&self, fields: &[CustomField], tz: Tz) -> Value {
        fields
            .iter()
            .find(|field| self.matcher.matches(field))
            .map_or(Value::Null, |field| self.extractor.extract(&field.value, tz))
    }
}

/// Rules used when the configuration does not override them
pub fn default_rules() -> Vec<CustomFieldRule> {
    use ValueExtractor::{Current, Raw, Timestamp};
    vec![
        CustomFieldRule::by_name("custom_fields_Eficiência", "Eficiência", Raw),
        CustomFieldRule::by_id(
            "custom_fields_Tipo de Tarefa",
            "be41cb2a-63fd-4607-abb1-680685d0a581",
            Raw,
        ),
        CustomFieldRule::by_name("custom_fields_Data realizada", "Data realizada", Timestamp),
        CustomFieldRule::by_name("custom_fields_Progresso", "Progresso", Current),
        CustomFieldRule::by_id(
            "custom_fields_Reuniao",
            "6ddf4f21-a59d-4ac1-bcba-f7d9769da471",
            Raw,
        ),
        CustomFieldRule::by_name("custom_fields_Relação com o RC", "Relação com o RC", Raw),
    ]
}
