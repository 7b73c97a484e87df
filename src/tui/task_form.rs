//! Task form handling for the terminal user interface.
//!
//! `TaskForm` backs both the "Add New Task" panel and the edit popup. It
//! holds raw text; conversion to a draft or to edit changes happens on submit
//! so a half-typed due date never reaches the store.

use chrono::NaiveDate;

use crate::{
    dates::{format_due_field, parse_due_field},
    edit::EditField,
    fields::{cycle_index, Priority},
    task::{Task, TaskDraft},
    tui::input::InputField,
};

/// Field order in the form.
pub const TITLE_ORDER: usize = 0;
pub const DESCRIPTION_ORDER: usize = 1;
pub const DUE_ORDER: usize = 2;
pub const PRIORITY_ORDER: usize = 3;
const FIELD_COUNT: usize = 4;

/// Task form for adding or editing.
#[derive(Clone, Debug)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    pub priority: usize,
    pub current_field: usize,
}

impl TaskForm {
    /// Empty form with the default priority selected.
    pub fn new() -> Self {
        Self {
            title: InputField::new(),
            description: InputField::new(),
            due: InputField::new(),
            priority: priority_index(Priority::default()),
            current_field: TITLE_ORDER,
        }
    }

    /// Create a task form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: InputField::with_value(&task.title),
            description: InputField::with_value(&task.description),
            due: InputField::with_value(&format_due_field(task.due_date)),
            priority: priority_index(task.priority),
            current_field: TITLE_ORDER,
        }
    }

    pub fn selected_priority(&self) -> Priority {
        Priority::ALL[self.priority % Priority::ALL.len()]
    }

    /// Build a draft; fails only on an unreadable due date.
    pub fn to_draft(&self, today: NaiveDate) -> Result<TaskDraft, String> {
        Ok(TaskDraft {
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            due_date: parse_due_field(&self.due.value, today)?,
            priority: self.selected_priority(),
        })
    }

    /// The form contents as edit-buffer changes.
    pub fn to_edit_fields(&self, today: NaiveDate) -> Result<Vec<EditField>, String> {
        Ok(vec![
            EditField::Title(self.title.value.clone()),
            EditField::Description(self.description.value.clone()),
            EditField::DueDate(parse_due_field(&self.due.value, today)?),
            EditField::Priority(self.selected_priority()),
        ])
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = cycle_index(self.current_field, FIELD_COUNT, true);
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = cycle_index(self.current_field, FIELD_COUNT, false);
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_ORDER => Some(&mut self.title),
            DESCRIPTION_ORDER => Some(&mut self.description),
            DUE_ORDER => Some(&mut self.due),
            _ => None,
        }
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    /// Handle backspace input for the currently active field.
    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    pub fn handle_home(&mut self) {
        if let Some(field) = self.active_input() {
            field.move_home();
        }
    }

    pub fn handle_end(&mut self) {
        if let Some(field) = self.active_input() {
            field.move_end();
        }
    }

    /// Handle left/right arrow keys for cursor movement or priority changes.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == PRIORITY_ORDER {
            self.priority = cycle_index(self.priority, Priority::ALL.len(), right);
        } else if let Some(field) = self.active_input() {
            if right {
                field.move_cursor_right();
            } else {
                field.move_cursor_left();
            }
        }
    }

    /// Cursor column in the active text field, if one is active.
    pub fn cursor(&self) -> Option<usize> {
        match self.current_field {
            TITLE_ORDER => Some(self.title.cursor),
            DESCRIPTION_ORDER => Some(self.description.cursor),
            DUE_ORDER => Some(self.due.cursor),
            _ => None,
        }
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

fn priority_index(p: Priority) -> usize {
    Priority::ALL.iter().position(|&x| x == p).unwrap_or(1)
}
