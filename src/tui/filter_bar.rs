//! Search box and the two filter selectors.

use crate::{
    fields::{cycle_index, PriorityFilter, StatusFilter},
    tui::input::InputField,
    view::TaskQuery,
};

pub const SEARCH_ORDER: usize = 0;
pub const PRIORITY_FILTER_ORDER: usize = 1;
pub const STATUS_FILTER_ORDER: usize = 2;
const FIELD_COUNT: usize = 3;

#[derive(Clone, Debug, Default)]
pub struct FilterBar {
    pub search: InputField,
    pub priority: usize,
    pub status: usize,
    pub current_field: usize,
}

impl FilterBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// The query the task list is rendered with.
    pub fn query(&self) -> TaskQuery {
        TaskQuery {
            search: self.search.value.clone(),
            priority: PriorityFilter::ALL[self.priority % PriorityFilter::ALL.len()],
            status: StatusFilter::ALL[self.status % StatusFilter::ALL.len()],
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = cycle_index(self.current_field, FIELD_COUNT, true);
    }

    pub fn prev_field(&mut self) {
        self.current_field = cycle_index(self.current_field, FIELD_COUNT, false);
    }

    /// Left/Right: move the search cursor or cycle the focused selector.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            SEARCH_ORDER if right => self.search.move_cursor_right(),
            SEARCH_ORDER => self.search.move_cursor_left(),
            PRIORITY_FILTER_ORDER => {
                self.priority = cycle_index(self.priority, PriorityFilter::ALL.len(), right)
            }
            _ => self.status = cycle_index(self.status, StatusFilter::ALL.len(), right),
        }
    }

    /// Typing always lands in the search box.
    pub fn handle_char(&mut self, c: char) {
        self.current_field = SEARCH_ORDER;
        self.search.handle_char(c);
    }

    pub fn handle_backspace(&mut self) {
        if self.current_field == SEARCH_ORDER {
            self.search.handle_backspace();
        }
    }

    /// Drop the search text and reset both selectors.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
