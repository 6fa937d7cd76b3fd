//! Checklist rules.
//!
//! A task's checklist drives its status: the server recomputes status and
//! start date after every toggle, and a task that has any completed item can
//! no longer be deleted.

use chrono::NaiveDateTime;

use crate::types::{ChecklistItem, ChecklistItemId, Task, TaskStatus};

/// Business-rule violations on tasks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskRuleError {
    /// Work has been recorded against the task.
    #[error("Cannot delete task with completed checklist items.")]
    CompletedChecklistItems,
}

/// Reject deletion of a task with any completed checklist item.
///
/// # Errors
///
/// Returns [`TaskRuleError::CompletedChecklistItems`] if any item is completed.
pub fn ensure_deletable(task: &Task) -> Result<(), TaskRuleError> {
    if task.has_completed_items() {
        return Err(TaskRuleError::CompletedChecklistItems);
    }
    Ok(())
}

/// Set one item's completion flag in place.
///
/// Returns `false` if no item has that ID. Setting the flag to its current
/// value is a no-op that still returns `true`.
pub fn set_item_completed(
    items: &mut [ChecklistItem],
    item_id: ChecklistItemId,
    completed: bool,
) -> bool {
    match items.iter_mut().find(|item| item.id == item_id) {
        Some(item) => {
            item.completed = completed;
            true
        }
        None => false,
    }
}

/// Status implied by a checklist.
///
/// All completed is `Completed`, some completed is `InProgress`, none is
/// `Pending`. An empty checklist counts as completed.
#[must_use]
pub fn derived_status(items: &[ChecklistItem]) -> TaskStatus {
    let done = items.iter().filter(|item| item.completed).count();
    if done == items.len() {
        TaskStatus::Completed
    } else if done > 0 {
        TaskStatus::InProgress
    } else {
        TaskStatus::Pending
    }
}

/// Recompute a task's status and start date from its checklist.
///
/// The start date is stamped with `now` the first time the task moves into
/// progress and cleared when every item is unchecked again.
pub fn reconcile_progress(task: &mut Task, now: NaiveDateTime) {
    let status = derived_status(&task.checklist_items);
    match status {
        TaskStatus::InProgress => {
            task.start_date.get_or_insert(now);
        }
        TaskStatus::Pending => task.start_date = None,
        TaskStatus::Completed | TaskStatus::Cancelled => {}
    }
    task.status = status;
}

/// Status filter for task lists ("All" plus one tab per status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Status(TaskStatus),
}

impl TaskFilter {
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => task.status == status,
        }
    }

    /// Tasks passing the filter, in input order.
    #[must_use]
    pub fn apply(self, tasks: &[Task]) -> Vec<&Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

impl std::str::FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Status)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::{TaskId, TaskPriority};

    fn item(id: i64, completed: bool) -> ChecklistItem {
        ChecklistItem {
            id: ChecklistItemId::new(id),
            text: format!("step {id}"),
            completed,
        }
    }

    fn task(items: Vec<ChecklistItem>) -> Task {
        Task {
            id: TaskId::new(1),
            title: "Quarterly review".to_owned(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            start_date: None,
            created_at: None,
            updated_at: None,
            assigned_users: Vec::new(),
            checklist_items: items,
        }
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_delete_guard() {
        assert!(ensure_deletable(&task(vec![item(1, false), item(2, false)])).is_ok());
        assert!(ensure_deletable(&task(Vec::new())).is_ok());
        assert_eq!(
            ensure_deletable(&task(vec![item(1, false), item(2, true)])),
            Err(TaskRuleError::CompletedChecklistItems)
        );
    }

    #[test]
    fn test_set_item_completed_touches_only_target() {
        let mut items = vec![item(1, false), item(2, false), item(3, true)];
        assert!(set_item_completed(&mut items, ChecklistItemId::new(2), true));
        assert_eq!(
            items.iter().map(|i| i.completed).collect::<Vec<_>>(),
            vec![false, true, true]
        );

        // idempotent
        assert!(set_item_completed(&mut items, ChecklistItemId::new(2), true));
        assert!(items[1].completed);

        assert!(!set_item_completed(&mut items, ChecklistItemId::new(99), true));
    }

    #[test]
    fn test_derived_status() {
        assert_eq!(derived_status(&[item(1, false)]), TaskStatus::Pending);
        assert_eq!(
            derived_status(&[item(1, true), item(2, false)]),
            TaskStatus::InProgress
        );
        assert_eq!(
            derived_status(&[item(1, true), item(2, true)]),
            TaskStatus::Completed
        );
    }

    #[test]
    fn test_reconcile_progress_stamps_start_once() {
        let mut t = task(vec![item(1, true), item(2, false)]);
        reconcile_progress(&mut t, at(9));
        assert_eq!(t.status, TaskStatus::InProgress);
        assert_eq!(t.start_date, Some(at(9)));

        reconcile_progress(&mut t, at(11));
        assert_eq!(t.start_date, Some(at(9)));

        t.checklist_items[1].completed = true;
        reconcile_progress(&mut t, at(12));
        assert_eq!(t.status, TaskStatus::Completed);
        assert_eq!(t.start_date, Some(at(9)));
    }

    #[test]
    fn test_reconcile_progress_clears_start_when_unchecked() {
        let mut t = task(vec![item(1, true)]);
        t.start_date = Some(at(8));
        t.checklist_items[0].completed = false;
        reconcile_progress(&mut t, at(10));
        assert_eq!(t.status, TaskStatus::Pending);
        assert!(t.start_date.is_none());
    }

    #[test]
    fn test_task_filter() {
        let mut done = task(Vec::new());
        done.status = TaskStatus::Completed;
        let tasks = vec![task(Vec::new()), done];

        assert_eq!(TaskFilter::All.apply(&tasks).len(), 2);
        let completed = TaskFilter::Status(TaskStatus::Completed).apply(&tasks);
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].status, TaskStatus::Completed);

        assert_eq!("all".parse::<TaskFilter>().unwrap(), TaskFilter::All);
        assert_eq!(
            "pending".parse::<TaskFilter>().unwrap(),
            TaskFilter::Status(TaskStatus::Pending)
        );
    }
}
