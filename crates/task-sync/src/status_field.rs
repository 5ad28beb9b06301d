//! Status field view
//!
//! The part of a tracker task the decision engine looks at: one named enum
//! custom field, its legal options and its current value.

use asana_client::{CustomField, Task};

/// One legal value of the status field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOption {
    pub name: String,
    pub gid: String,
}

/// The status field of a single task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusField {
    pub name: String,
    pub gid: String,
    pub options: Vec<StatusOption>,
    /// Current display value, None when unset
    pub current: Option<String>,
}

impl StatusField {
    /// Locate the field called `field_name` on a task
    pub fn from_task(task: &Task, field_name: &str) -> Option<Self> {
        task.custom_field_named(field_name).map(Self::from)
    }

    /// Find an enabled option by exact name
    pub fn find_option(&self, name: &str) -> Option<&StatusOption> {
        self.options.iter().find(|option| option.name == name)
    }

    /// Whether the current value is one of `values`
    pub fn current_is_any_of(&self, values: &[String]) -> bool {
        self.current
            .as_deref()
            .is_some_and(|current| values.iter().any(|value| value == current))
    }
}

impl From<&CustomField> for StatusField {
    fn from(field: &CustomField) -> Self {
        let current = field
            .display_value
            .clone()
            .or_else(|| field.enum_value.as_ref().map(|value| value.name.clone()));

        Self {
            name: field.name.clone(),
            gid: field.gid.clone(),
            options: field
                .enum_options
                .iter()
                .filter(|option| option.enabled)
                .map(|option| StatusOption {
                    name: option.name.clone(),
                    gid: option.gid.clone(),
                })
                .collect(),
            current,
        }
    }
}
