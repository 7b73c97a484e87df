//! Derived views over the task list: filtering and due-date sections.
//!
//! Everything here is a pure function of the task slice, the query and the
//! instant `now`. Results borrow from the slice and keep its order.

use chrono::{DateTime, Utc};

use crate::dates::due_instant;
use crate::fields::{PriorityFilter, Section, StatusFilter};
use crate::task::Task;

/// Search text plus the two selectors of the filter bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub search: String,
    pub priority: PriorityFilter,
    pub status: StatusFilter,
}

impl TaskQuery {
    /// Whether `task` passes search, priority and status filters.
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task)
            && self.priority.admits(task.priority)
            && self.status.admits(task.completed)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }

    /// Tasks passing the filter, in store order.
    pub fn filter<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }

    /// The filtered tasks split into sections at instant `now`.
    pub fn sections<'a>(&self, tasks: &'a [Task], now: DateTime<Utc>) -> Sections<'a> {
        let mut out = Sections::default();
        for task in tasks.iter().filter(|t| self.matches(t)) {
            if let Some(section) = section_of(task, now) {
                out.bucket_mut(section).push(task);
            }
        }
        out
    }
}

/// Which section `task` belongs to at `now`, if any.
///
/// Open tasks without a due date, or due exactly at `now`, belong to none.
pub fn section_of(task: &Task, now: DateTime<Utc>) -> Option<Section> {
    if task.completed {
        return Some(Section::Completed);
    }
    let due = due_instant(task.due_date?);
    if due > now {
        Some(Section::Upcoming)
    } else if due < now {
        Some(Section::Overdue)
    } else {
        None
    }
}

/// Filtered tasks grouped by section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Sections<'a> {
    pub upcoming: Vec<&'a Task>,
    pub overdue: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl<'a> Sections<'a> {
    pub fn get(&self, section: Section) -> &[&'a Task] {
        match section {
            Section::Upcoming => &self.upcoming,
            Section::Overdue => &self.overdue,
            Section::Completed => &self.completed,
        }
    }

    fn bucket_mut(&mut self, section: Section) -> &mut Vec<&'a Task> {
        match section {
            Section::Upcoming => &mut self.upcoming,
            Section::Overdue => &mut self.overdue,
            Section::Completed => &mut self.completed,
        }
    }

    /// Sections in display order with their tasks.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &[&'a Task])> + '_ {
        Section::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Task ids in display order, section by section.
    pub fn ids(&self) -> Vec<u64> {
        self.iter().flat_map(|(_, tasks)| tasks.iter().map(|t| t.id)).collect()
    }

    pub fn total(&self) -> usize {
        self.upcoming.len() + self.overdue.len() + self.completed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn task(id: u64, title: &str, priority: Priority, completed: bool) -> Task {
        Task {
            id,
            title: title.into(),
            description: String::new(),
            due_date: None,
            priority,
            completed,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn due(mut t: Task, date: NaiveDate) -> Task {
        t.due_date = Some(date);
        t
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    fn alpha_beta() -> Vec<Task> {
        vec![
            task(1, "Alpha", Priority::Low, false),
            task(2, "Beta", Priority::High, true),
        ]
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let tasks = alpha_beta();
        let q = TaskQuery {
            search: "alp".into(),
            ..TaskQuery::default()
        };
        assert_eq!(titles(&q.filter(&tasks)), ["Alpha"]);
        let q = TaskQuery {
            search: "BET".into(),
            ..TaskQuery::default()
        };
        assert_eq!(titles(&q.filter(&tasks)), ["Beta"]);
    }

    #[test]
    fn test_search_covers_description() {
        let mut tasks = alpha_beta();
        tasks[1].description = "Pick up the Groceries".into();
        let q = TaskQuery {
            search: "groceries".into(),
            ..TaskQuery::default()
        };
        assert_eq!(titles(&q.filter(&tasks)), ["Beta"]);
    }

    #[test]
    fn test_status_and_priority_filters() {
        let tasks = alpha_beta();
        let q = TaskQuery {
            status: StatusFilter::Completed,
            ..TaskQuery::default()
        };
        assert_eq!(titles(&q.filter(&tasks)), ["Beta"]);
        let q = TaskQuery {
            status: StatusFilter::Active,
            ..TaskQuery::default()
        };
        assert_eq!(titles(&q.filter(&tasks)), ["Alpha"]);
        let q = TaskQuery {
            priority: PriorityFilter::High,
            ..TaskQuery::default()
        };
        assert_eq!(titles(&q.filter(&tasks)), ["Beta"]);
        assert_eq!(TaskQuery::default().filter(&tasks).len(), 2);
    }

    #[test]
    fn test_filters_combine() {
        let tasks = alpha_beta();
        let q = TaskQuery {
            search: "a".into(),
            priority: PriorityFilter::Low,
            status: StatusFilter::Completed,
        };
        assert!(q.filter(&tasks).is_empty());
    }

    #[test]
    fn test_sections_one_day_either_side() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 15, 30, 0).unwrap();
        let yesterday = (now - Duration::days(1)).date_naive();
        let tomorrow = (now + Duration::days(1)).date_naive();
        let tasks = vec![
            due(task(1, "late", Priority::Medium, false), yesterday),
            due(task(2, "soon", Priority::Medium, false), tomorrow),
            due(task(3, "done-late", Priority::Medium, true), yesterday),
            due(task(4, "done-soon", Priority::Medium, true), tomorrow),
        ];
        let s = TaskQuery::default().sections(&tasks, now);
        assert_eq!(titles(&s.overdue), ["late"]);
        assert_eq!(titles(&s.upcoming), ["soon"]);
        assert_eq!(titles(&s.completed), ["done-late", "done-soon"]);
    }

    #[test]
    fn test_due_exactly_now_is_in_no_section() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        let tasks = vec![due(task(1, "edge", Priority::Medium, false), now.date_naive())];
        let s = TaskQuery::default().sections(&tasks, now);
        assert_eq!(s.total(), 0);
        assert_eq!(section_of(&tasks[0], now), None);
        assert_eq!(section_of(&tasks[0], now + Duration::milliseconds(1)), Some(Section::Overdue));
        assert_eq!(section_of(&tasks[0], now - Duration::milliseconds(1)), Some(Section::Upcoming));
    }

    #[test]
    fn test_due_today_is_overdue_after_midnight_utc() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        let t = due(task(1, "today", Priority::Medium, false), now.date_naive());
        assert_eq!(section_of(&t, now), Some(Section::Overdue));
    }

    #[test]
    fn test_open_task_without_due_date_is_in_no_section() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        let tasks = vec![task(1, "someday", Priority::Medium, false)];
        assert_eq!(TaskQuery::default().sections(&tasks, now).total(), 0);
    }

    #[test]
    fn test_sections_keep_store_order_and_apply_filter() {
        let now = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let tasks = vec![
            due(task(3, "c", Priority::High, false), later),
            due(task(1, "a", Priority::Low, false), later),
            due(task(2, "b", Priority::High, false), later),
        ];
        let s = TaskQuery::default().sections(&tasks, now);
        assert_eq!(s.ids(), vec![3, 1, 2]);

        let q = TaskQuery {
            priority: PriorityFilter::High,
            ..TaskQuery::default()
        };
        assert_eq!(q.sections(&tasks, now).ids(), vec![3, 2]);
    }
}
