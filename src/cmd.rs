//! Command implementations for the CLI interface.
//!
//! Each subcommand maps onto one store or query operation. Mutating commands
//! fail with a non-zero exit only when the change could not be saved; a blank
//! title or an unknown id is reported and otherwise ignored.

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{Local, NaiveDate, Utc};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::dates::{format_due_relative, parse_due_field};
use crate::edit::{EditField, EditSession};
use crate::fields::*;
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft};
use crate::tui::run::run_tui;
use crate::view::{Sections, TaskQuery};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (the default).
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "fri", "in Nd".
        #[arg(long)]
        due: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
    },

    /// List tasks in upcoming / overdue / completed sections.
    List {
        /// Case-insensitive text to look for in title or description.
        #[arg(long)]
        search: Option<String>,
        /// Priority filter: all | low | medium | high.
        #[arg(long, value_enum, default_value_t = PriorityFilter::All)]
        priority: PriorityFilter,
        /// Status filter: all | active | completed.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
    },

    /// Flip a task between open and completed.
    Toggle {
        /// Task ID.
        id: u64,
    },

    /// Delete a task by ID.
    Delete {
        /// Task ID.
        id: u64,
    },

    /// Edit fields on a task.
    Edit {
        /// Task ID.
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(store: TaskStore, notice_ttl: Duration) -> anyhow::Result<()> {
    run_tui(store, notice_ttl)
}

/// Add a new task. A blank title adds nothing.
pub fn cmd_add(
    store: &mut TaskStore,
    title: String,
    desc: Option<String>,
    due: Option<String>,
    priority: Priority,
) -> anyhow::Result<()> {
    let today = Local::now().date_naive();
    let due_date = parse_due(due.as_deref(), today)?;
    let draft = TaskDraft {
        title,
        description: desc.unwrap_or_default(),
        due_date,
        priority,
    };
    let added = store.add(&draft, Utc::now());
    check_saved(store)?;
    if let Some(id) = added {
        println!("Added task {}", id);
    }
    Ok(())
}

/// Print the filtered tasks by section.
pub fn cmd_list(
    store: &TaskStore,
    search: Option<String>,
    priority: PriorityFilter,
    status: StatusFilter,
) {
    let query = TaskQuery {
        search: search.unwrap_or_default(),
        priority,
        status,
    };
    let now = Utc::now();
    let sections = query.sections(store.tasks(), now);
    print!("{}", render_sections(&sections, now.with_timezone(&Local).date_naive()));
}

/// Flip completion of a task.
pub fn cmd_toggle(store: &mut TaskStore, id: u64) -> anyhow::Result<()> {
    let result = store.toggle_completed(id);
    check_saved(store)?;
    match result {
        Some(true) => println!("Completed {}", id),
        Some(false) => println!("Reopened {}", id),
        None => println!("No task with id {}", id),
    }
    Ok(())
}

/// Delete a task.
pub fn cmd_delete(store: &mut TaskStore, id: u64) -> anyhow::Result<()> {
    let removed = store.remove(id);
    check_saved(store)?;
    if removed {
        println!("Deleted {}", id);
    } else {
        println!("No task with id {}", id);
    }
    Ok(())
}

/// Edit a task through a begin / update / save session.
pub fn cmd_edit(
    store: &mut TaskStore,
    id: u64,
    title: Option<String>,
    desc: Option<String>,
    due: Option<String>,
    clear_due: bool,
    priority: Option<Priority>,
) -> anyhow::Result<()> {
    let Some(task) = store.get(id) else {
        println!("No task with id {}", id);
        return Ok(());
    };

    let today = Local::now().date_naive();
    let mut changes = Vec::new();
    if let Some(title) = title {
        changes.push(EditField::Title(title));
    }
    if let Some(desc) = desc {
        changes.push(EditField::Description(desc));
    }
    if clear_due {
        changes.push(EditField::DueDate(None));
    } else if due.is_some() {
        changes.push(EditField::DueDate(parse_due(due.as_deref(), today)?));
    }
    if let Some(priority) = priority {
        changes.push(EditField::Priority(priority));
    }
    if changes.is_empty() {
        println!("Nothing to change.");
        return Ok(());
    }

    let mut session = EditSession::default();
    session.begin(task);
    for change in changes {
        session.update(change);
    }
    session.save(store);
    check_saved(store)?;
    println!("Updated {}", id);
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

fn parse_due(due: Option<&str>, today: NaiveDate) -> anyhow::Result<Option<NaiveDate>> {
    match due {
        None => Ok(None),
        Some(text) => parse_due_field(text, today).map_err(|e| anyhow!(e)),
    }
}

fn check_saved(store: &mut TaskStore) -> anyhow::Result<()> {
    match store.take_persist_error() {
        Some(err) => Err(anyhow!("failed to save tasks: {err}")),
        None => Ok(()),
    }
}

/// Render sections as plain-text tables.
pub fn render_sections(sections: &Sections<'_>, today: NaiveDate) -> String {
    let mut out = String::new();
    for (section, tasks) in sections.iter() {
        let _ = writeln!(out, "{} Tasks ({})", format_section(section), tasks.len());
        if tasks.is_empty() {
            let _ = writeln!(out, "  No tasks found");
        } else {
            let _ = writeln!(out, "  {:<6} {:<7} {:<11} {:<10} {}", "ID", "Pri", "Due", "When", "Title");
            for task in tasks {
                let _ = writeln!(out, "{}", format_row(task, today));
            }
        }
        out.push('\n');
    }
    out
}

fn format_row(task: &Task, today: NaiveDate) -> String {
    let due = task
        .due_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".into());
    let mut line = format!(
        "  {:<6} {:<7} {:<11} {:<10} {}",
        task.id,
        format_priority(task.priority),
        due,
        format_due_relative(task.due_date, today),
        truncate(&task.title, 48),
    );
    if !task.description.is_empty() {
        line.push_str(&format!(" - {}", truncate(&task.description, 40)));
    }
    line
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, TASKS_KEY};
    use chrono::TimeZone;

    fn store() -> (TaskStore, MemoryStore) {
        let backing = MemoryStore::new();
        (TaskStore::load(Box::new(backing.clone())), backing)
    }

    #[test]
    fn test_add_blank_title_adds_nothing() {
        let (mut store, _) = store();
        cmd_add(&mut store, "   ".into(), None, None, Priority::Medium).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_rejects_bad_due() {
        let (mut store, _) = store();
        assert!(cmd_add(&mut store, "x".into(), None, Some("whenever".into()), Priority::Low).is_err());
        assert!(store.is_empty());
        assert!(cmd_add(&mut store, "x".into(), None, Some("in 99999999999d".into()), Priority::Low).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_then_edit() {
        let (mut store, _) = store();
        cmd_add(&mut store, "Buy milk".into(), Some("2l".into()), Some("2030-01-02".into()), Priority::Low).unwrap();
        let id = store.tasks()[0].id;
        let created = store.tasks()[0].created_at;

        cmd_edit(&mut store, id, Some("Buy oat milk".into()), None, None, true, Some(Priority::High)).unwrap();
        let task = store.get(id).unwrap();
        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.description, "2l");
        assert_eq!(task.due_date, None);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.created_at, created);
    }

    #[test]
    fn test_unknown_ids_are_not_errors() {
        let (mut store, _) = store();
        cmd_toggle(&mut store, 9).unwrap();
        cmd_delete(&mut store, 9).unwrap();
        cmd_edit(&mut store, 9, Some("x".into()), None, None, false, None).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_save_is_an_error() {
        let (mut store, backing) = store();
        cmd_add(&mut store, "kept".into(), None, None, Priority::Medium).unwrap();
        backing.fail_writes(true);
        let id = store.tasks()[0].id;
        assert!(cmd_toggle(&mut store, id).is_err());
        assert!(store.get(id).unwrap().completed);
        assert!(!backing.raw(TASKS_KEY).unwrap().contains("\"completed\": true"));
    }

    #[test]
    fn test_render_sections() {
        let mk = |id, title: &str, due: Option<NaiveDate>, completed| Task {
            id,
            title: title.into(),
            description: String::new(),
            due_date: due,
            priority: Priority::Medium,
            completed,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let tasks = vec![
            mk(1, "Pay rent", NaiveDate::from_ymd_opt(2024, 5, 12), false),
            mk(2, "Call mum", None, true),
        ];
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        let text = render_sections(&TaskQuery::default().sections(&tasks, now), today);
        assert!(text.contains("Upcoming Tasks (1)"));
        assert!(text.contains("Overdue Tasks (0)\n  No tasks found"));
        assert!(text.contains("Completed Tasks (1)"));
        assert!(text.contains("Pay rent"));
        assert!(text.contains("in 2d"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
