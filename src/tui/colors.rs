//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Section};

/// Focused field borders and the status bar
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Low priority and the success notice
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
/// High priority, overdue tasks and the delete confirmation
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);

/// Foreground color for a priority label.
pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::Red,
    }
}

/// Header background for a task section.
pub fn section_color(s: Section) -> Color {
    match s {
        Section::Upcoming => Color::Blue,
        Section::Overdue => DARK_RED,
        Section::Completed => DARK_GREEN,
    }
}
