//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    Main,
    EditTask,
    Help,
    Confirm,
}

/// Which panel of the main screen receives keys.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Focus {
    AddForm,
    FilterBar,
    TaskList,
}

impl Focus {
    const ORDER: [Focus; 3] = [Focus::AddForm, Focus::FilterBar, Focus::TaskList];

    /// Next panel in Tab order; `forward = false` for BackTab.
    pub fn cycle(self, forward: bool) -> Focus {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[crate::fields::cycle_index(idx, Self::ORDER.len(), forward)]
    }
}
