//! Task data structure and related functionality.
//!
//! This module defines the `Task` record that is persisted under the `tasks`
//! key, and the `TaskDraft` that backs the "add task" form before a task
//! exists.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::Priority;

/// A single to-do item.
///
/// Field names on disk are camelCase (`dueDate`, `createdAt`) so that files
/// written by earlier versions of the tool load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a task from a draft. The caller owns id allocation.
    pub fn from_draft(id: u64, draft: &TaskDraft, now: DateTime<Utc>) -> Self {
        Task {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            due_date: draft.due_date,
            priority: draft.priority,
            completed: false,
            created_at: now,
        }
    }
}

/// The in-progress "new task" form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

impl TaskDraft {
    /// Draft with only a title; everything else at defaults.
    pub fn titled(title: &str) -> Self {
        TaskDraft {
            title: title.to_string(),
            ..TaskDraft::default()
        }
    }

    /// A draft is submittable once its title has visible characters.
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// `dueDate` is a plain `YYYY-MM-DD` string on disk, with `""` for "no date".
/// `null` and a missing field also read as no date.
mod due_date_format {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, FORMAT)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid dueDate `{s}`: {e}"))),
        }
    }
}
