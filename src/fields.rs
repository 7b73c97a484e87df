//! Enumerations and field types for task management.
//!
//! This module defines the structured values used to categorise tasks and to
//! narrow the task list: priorities, the priority and status filters offered
//! by both front ends, and the due-date sections of the main view.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for task importance.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All priorities in selector order.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Lowercase wire name, as persisted.
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// Priority selector of the filter bar.
#[derive(Debug, Default, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PriorityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl PriorityFilter {
    /// Selector order, used for cycling in the TUI.
    pub const ALL: [PriorityFilter; 4] = [
        PriorityFilter::All,
        PriorityFilter::Low,
        PriorityFilter::Medium,
        PriorityFilter::High,
    ];

    /// Whether a task of priority `p` passes this filter.
    pub fn admits(self, p: Priority) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Low => p == Priority::Low,
            PriorityFilter::Medium => p == Priority::Medium,
            PriorityFilter::High => p == Priority::High,
        }
    }
}

/// Completion-status selector of the filter bar.
#[derive(Debug, Default, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    /// Selector order, used for cycling in the TUI.
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Active, StatusFilter::Completed];

    /// Whether a task with the given completion flag passes this filter.
    pub fn admits(self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !completed,
            StatusFilter::Completed => completed,
        }
    }
}

/// The three sections of the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Upcoming,
    Overdue,
    Completed,
}

impl Section {
    /// Display order of sections.
    pub const ALL: [Section; 3] = [Section::Upcoming, Section::Overdue, Section::Completed];
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

/// Format a priority selector for display.
pub fn format_priority_filter(f: PriorityFilter) -> &'static str {
    match f {
        PriorityFilter::All => "All Priorities",
        PriorityFilter::Low => "Low Priority",
        PriorityFilter::Medium => "Medium Priority",
        PriorityFilter::High => "High Priority",
    }
}

/// Format a status selector for display.
pub fn format_status_filter(f: StatusFilter) -> &'static str {
    match f {
        StatusFilter::All => "All Status",
        StatusFilter::Active => "Active",
        StatusFilter::Completed => "Completed",
    }
}

/// Format a section heading for display.
pub fn format_section(s: Section) -> &'static str {
    match s {
        Section::Upcoming => "Upcoming",
        Section::Overdue => "Overdue",
        Section::Completed => "Completed",
    }
}

/// Step a selector index forwards or backwards, wrapping at both ends.
pub fn cycle_index(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}
