//! Single-slot edit session.
//!
//! At most one task is edited at a time. `begin` copies the task into a
//! buffer; `update` changes only the buffer; `save` hands the buffer to
//! [`TaskStore::replace`]; `cancel` drops it. Calls made in the wrong state
//! are ignored and report so through their return value.

use chrono::NaiveDate;
use tracing::debug;

use crate::fields::Priority;
use crate::store::TaskStore;
use crate::task::Task;

/// A change to one editable field of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditField {
    Title(String),
    Description(String),
    DueDate(Option<NaiveDate>),
    Priority(Priority),
}

/// Edit state: idle, or editing a private copy of one task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing(Task),
}

impl EditSession {
    /// Start editing a copy of `task`. Rejected while another edit is open.
    pub fn begin(&mut self, task: &Task) -> bool {
        match self {
            EditSession::Idle => {
                debug!(id = task.id, "edit started");
                *self = EditSession::Editing(task.clone());
                true
            }
            EditSession::Editing(current) => {
                debug!(id = task.id, editing = current.id, "edit already in progress");
                false
            }
        }
    }

    /// Apply `field` to the buffer. The store is not touched.
    pub fn update(&mut self, field: EditField) -> bool {
        let EditSession::Editing(buffer) = self else {
            return false;
        };
        match field {
            EditField::Title(title) => buffer.title = title,
            EditField::Description(description) => buffer.description = description,
            EditField::DueDate(due_date) => buffer.due_date = due_date,
            EditField::Priority(priority) => buffer.priority = priority,
        }
        true
    }

    /// Write the buffer over the stored task and return to idle.
    ///
    /// The title is not re-checked here; a blank title saved through an edit
    /// is stored as-is.
    pub fn save(&mut self, store: &mut TaskStore) -> Option<u64> {
        let EditSession::Editing(buffer) = std::mem::take(self) else {
            return None;
        };
        let id = buffer.id;
        store.replace(buffer);
        debug!(id, "edit saved");
        Some(id)
    }

    /// Drop the buffer and return to idle.
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(self) {
            EditSession::Idle => false,
            EditSession::Editing(buffer) => {
                debug!(id = buffer.id, "edit cancelled");
                true
            }
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditSession::Editing(_))
    }

    /// Id of the task being edited.
    pub fn editing_id(&self) -> Option<u64> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing(buffer) => Some(buffer.id),
        }
    }

    pub fn buffer(&self) -> Option<&Task> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing(buffer) => Some(buffer),
        }
    }
}
