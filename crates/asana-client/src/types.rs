//! Asana API data transfer objects
//!
//! Only the fields the status sync reads are modelled; everything else in
//! the API responses is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// A task as returned by `GET /tasks/{task_gid}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Global task id
    pub gid: String,

    /// Task title
    #[serde(default)]
    pub name: String,

    /// Custom field values set on the task
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl Task {
    /// Find a custom field by its display name
    pub fn custom_field_named(&self, name: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|field| field.name == name)
    }
}

/// A custom field attached to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    /// Global custom field id
    pub gid: String,

    /// Field name as shown in Asana (e.g. "Status")
    pub name: String,

    /// Human readable rendering of the current value
    #[serde(default)]
    pub display_value: Option<String>,

    /// Selected option for enum fields
    #[serde(default)]
    pub enum_value: Option<EnumOption>,

    /// Legal options for enum fields; null for other field types
    #[serde(default, deserialize_with = "null_as_empty")]
    pub enum_options: Vec<EnumOption>,
}

/// One option of an enum custom field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    /// Global option id
    pub gid: String,

    /// Option label (e.g. "📖 In Code Review")
    pub name: String,

    /// Disabled options can not be selected anymore
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<EnumOption>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<EnumOption>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope every Asana response is wrapped in
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// Error body returned by Asana on non-2xx responses
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    pub message: String,
}

impl ErrorEnvelope {
    pub fn joined_messages(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}
