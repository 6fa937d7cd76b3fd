//! Dashboard statistics.
//!
//! Pure aggregation over lists already fetched from the backend: stat cards,
//! chart series, the recent-tasks table and the team member name filter.

use serde::Serialize;

use crate::types::{Employee, EmployeeStatus, Task, TaskPriority, TaskStatus, User};

/// Task counts per status, plus the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TaskStats {
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    #[serde(rename = "total")]
    pub total: usize,
}

impl TaskStats {
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(
            Self {
                total: tasks.len(),
                ..Self::default()
            },
            |mut stats, task| {
                *stats.slot(task.status) += 1;
                stats
            },
        )
    }

    #[must_use]
    pub const fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
            TaskStatus::Cancelled => self.cancelled,
        }
    }

    fn slot(&mut self, status: TaskStatus) -> &mut usize {
        match status {
            TaskStatus::Pending => &mut self.pending,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Completed => &mut self.completed,
            TaskStatus::Cancelled => &mut self.cancelled,
        }
    }

    /// Pie chart of open and finished work. Cancelled tasks are not charted.
    #[must_use]
    pub fn distribution_chart(&self) -> ChartSeries {
        let statuses = [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ];
        ChartSeries {
            labels: statuses.iter().map(|s| s.as_str()).collect(),
            values: statuses.iter().map(|s| self.count(*s)).collect(),
            colors: statuses.iter().map(|s| status_color(*s)).collect(),
        }
    }
}

/// Task counts per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl PriorityCounts {
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match task.priority {
                TaskPriority::Low => counts.low += 1,
                TaskPriority::Medium => counts.medium += 1,
                TaskPriority::High => counts.high += 1,
            }
        }
        counts
    }

    #[must_use]
    pub const fn count(&self, priority: TaskPriority) -> usize {
        match priority {
            TaskPriority::Low => self.low,
            TaskPriority::Medium => self.medium,
            TaskPriority::High => self.high,
        }
    }

    /// Bar chart of tasks per priority.
    #[must_use]
    pub fn priority_chart(&self) -> ChartSeries {
        ChartSeries {
            labels: TaskPriority::ALL.iter().map(|p| p.label()).collect(),
            values: TaskPriority::ALL.iter().map(|p| self.count(*p)).collect(),
            colors: TaskPriority::ALL.iter().map(|p| priority_color(*p)).collect(),
        }
    }
}

/// Legacy employee counts per status, plus the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct EmployeeStats {
    pub active: usize,
    pub inactive: usize,
    pub terminated: usize,
    #[serde(rename = "total")]
    pub total: usize,
}

impl EmployeeStats {
    #[must_use]
    pub fn from_employees(employees: &[Employee]) -> Self {
        let mut stats = Self {
            total: employees.len(),
            ..Self::default()
        };
        for employee in employees {
            match employee.status {
                EmployeeStatus::Active => stats.active += 1,
                EmployeeStatus::Inactive => stats.inactive += 1,
                EmployeeStatus::Terminated => stats.terminated += 1,
            }
        }
        stats
    }
}

/// Data for one chart: parallel label, value and colour columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<&'static str>,
    pub values: Vec<usize>,
    pub colors: Vec<&'static str>,
}

impl ChartSeries {
    /// `(label, value)` pairs in chart order.
    pub fn points(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        self.labels.iter().copied().zip(self.values.iter().copied())
    }
}

const fn status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "#2563EB",
        TaskStatus::InProgress => "#A78BFA",
        TaskStatus::Completed => "#10B981",
        TaskStatus::Cancelled => "#6B7280",
    }
}

const fn priority_color(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::Low => "#10B981",
        TaskPriority::Medium => "#F59E0B",
        TaskPriority::High => "#EF4444",
    }
}

/// The `limit` newest tasks by creation time. Tasks without a creation time
/// sort last.
#[must_use]
pub fn recent_tasks(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

/// Case-insensitive substring match on full names.
#[must_use]
pub fn filter_members_by_name<'a>(users: &'a [User], needle: &str) -> Vec<&'a User> {
    let needle = needle.to_lowercase();
    users
        .iter()
        .filter(|user| user.full_name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::{EmployeeId, Role, TaskId, UserId};

    fn task(id: i64, status: TaskStatus, priority: TaskPriority, created_day: Option<u32>) -> Task {
        Task {
            id: TaskId::new(id),
            title: format!("task {id}"),
            description: None,
            status,
            priority,
            due_date: None,
            start_date: None,
            created_at: created_day.map(|d| {
                NaiveDate::from_ymd_opt(2026, 10, d)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            }),
            updated_at: None,
            assigned_users: Vec::new(),
            checklist_items: Vec::new(),
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, TaskStatus::Pending, TaskPriority::High, Some(1)),
            task(2, TaskStatus::Pending, TaskPriority::Low, Some(5)),
            task(3, TaskStatus::InProgress, TaskPriority::High, None),
            task(4, TaskStatus::Cancelled, TaskPriority::Medium, Some(3)),
        ]
    }

    #[test]
    fn test_task_stats() {
        let stats = TaskStats::from_tasks(&sample());
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 0);
        assert_eq!(stats.cancelled, 1);
        assert_eq!(stats.total, 4);

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["IN_PROGRESS"], 1);
        assert_eq!(json["total"], 4);
    }

    #[test]
    fn test_distribution_chart_skips_cancelled() {
        let chart = TaskStats::from_tasks(&sample()).distribution_chart();
        assert_eq!(chart.labels, vec!["PENDING", "IN_PROGRESS", "COMPLETED"]);
        assert_eq!(chart.values, vec![2, 1, 0]);
        assert_eq!(chart.colors[0], "#2563EB");
    }

    #[test]
    fn test_priority_counts() {
        let counts = PriorityCounts::from_tasks(&sample());
        assert_eq!((counts.low, counts.medium, counts.high), (1, 1, 2));
        let chart = counts.priority_chart();
        assert_eq!(
            chart.points().collect::<Vec<_>>(),
            vec![("Low", 1), ("Medium", 1), ("High", 2)]
        );
    }

    #[test]
    fn test_employee_stats() {
        let employee = |id, status| Employee {
            id: EmployeeId::new(id),
            name: format!("emp {id}"),
            email: format!("emp{id}@taskdesk.dev"),
            department: None,
            position: None,
            phone_number: None,
            status,
            created_at: None,
            updated_at: None,
        };
        let stats = EmployeeStats::from_employees(&[
            employee(1, EmployeeStatus::Active),
            employee(2, EmployeeStatus::Active),
            employee(3, EmployeeStatus::Terminated),
        ]);
        assert_eq!((stats.active, stats.inactive, stats.terminated), (2, 0, 1));
        assert_eq!(stats.total, 3);
    }

    #[test]
    fn test_recent_tasks_newest_first() {
        let tasks = sample();
        let recent = recent_tasks(&tasks, 2);
        assert_eq!(
            recent.iter().map(|t| t.id.as_i64()).collect::<Vec<_>>(),
            vec![2, 4]
        );
        assert_eq!(recent_tasks(&tasks, 10).last().unwrap().id, TaskId::new(3));
    }

    #[test]
    fn test_filter_members_by_name() {
        let user = |id, name: &str| User {
            id: UserId::new(id),
            full_name: name.to_owned(),
            email: format!("u{id}@taskdesk.dev"),
            role: Role::Member,
        };
        let users = vec![user(1, "Alice Smith"), user(2, "Bob Stone"), user(3, "Carla Smithers")];
        let found = filter_members_by_name(&users, "SMITH");
        assert_eq!(found.len(), 2);
        assert_eq!(filter_members_by_name(&users, "").len(), 3);
    }
}
