//! Admin views: dashboard, task management and the team member directory.
//!
//! # Usage
//!
//! ```bash
//! taskdesk tasks list --status in-progress
//! taskdesk tasks create -t "Quarterly report" -d "Numbers for Q3" --due 2026-11-01 \
//!     --assign 2 --assign 3 --item "Collect data" --item "Draft"
//! taskdesk tasks edit 12 --priority high --assign 4
//! taskdesk tasks delete 12
//! taskdesk members --search ada
//! ```

use clap::Args;

use taskdesk_client::{AppState, Route};
use taskdesk_core::{
    PriorityCounts, Strictness, TaskDraft, TaskFilter, TaskId, TaskPriority, TaskStats,
    TaskStatus, UserId, filter_members_by_name, recent_tasks,
};

use super::{CliError, enter, today};
use crate::view;

/// Number of tasks in the dashboard's recent-tasks table.
const RECENT_TASKS: usize = 10;

/// Task form fields. On edit, omitted fields keep their current value.
#[derive(Debug, Args)]
pub struct TaskArgs {
    /// Task title (at least 3 characters)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Task description (at most 1000 characters)
    #[arg(short, long)]
    pub description: Option<String>,

    /// PENDING, IN_PROGRESS, COMPLETED or CANCELLED
    #[arg(short, long)]
    pub status: Option<TaskStatus>,

    /// LOW, MEDIUM or HIGH
    #[arg(short, long)]
    pub priority: Option<TaskPriority>,

    /// Due date, YYYY-MM-DD (today or later)
    #[arg(long = "due")]
    pub due_date: Option<String>,

    /// Toggle assignment of a team member (repeatable)
    #[arg(long = "assign")]
    pub assign: Vec<UserId>,

    /// Checklist item text (repeatable; create only)
    #[arg(long = "item")]
    pub items: Vec<String>,
}

impl TaskArgs {
    /// Apply the given fields on top of `draft`.
    fn apply(self, mut draft: TaskDraft) -> TaskDraft {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if self.status.is_some() {
            draft.status = self.status;
        }
        if self.priority.is_some() {
            draft.priority = self.priority;
        }
        if let Some(due_date) = self.due_date {
            draft.due_date = due_date;
        }
        for user in self.assign {
            draft.toggle_assignee(user);
        }
        if !self.items.is_empty() {
            draft.checklist = self.items;
        }
        draft
    }
}

pub async fn dashboard(state: &AppState) -> Result<(), CliError> {
    enter(state, &Route::AdminDashboard)?;
    let tasks = state.tasks().list().await?;

    view::heading("Admin Dashboard");
    let stats = TaskStats::from_tasks(&tasks);
    view::task_stats(&stats);
    view::chart("Task distribution", &stats.distribution_chart());
    view::priority_chart(&PriorityCounts::from_tasks(&tasks));

    view::heading("Recent tasks");
    view::task_table(&recent_tasks(&tasks, RECENT_TASKS));
    Ok(())
}

pub async fn list_tasks(state: &AppState, filter: TaskFilter) -> Result<(), CliError> {
    enter(state, &Route::AdminTasks)?;
    let tasks = state.tasks().list().await?;

    view::heading("Tasks");
    view::task_table(&filter.apply(&tasks));
    Ok(())
}

pub async fn show_task(state: &AppState, id: TaskId) -> Result<(), CliError> {
    enter(state, &Route::AdminTaskEdit(id))?;
    let task = state.tasks().get(id).await?;
    view::task_detail(&task);
    Ok(())
}

pub async fn create_task(state: &AppState, args: TaskArgs) -> Result<(), CliError> {
    enter(state, &Route::AdminTaskCreate)?;

    let draft = args.apply(TaskDraft::default());
    let task = state
        .tasks()
        .create(&draft, Strictness::Strict, today())
        .await?;

    view::note(&format!("Task created successfully (#{})", task.id));
    view::task_detail(&task);
    Ok(())
}

pub async fn edit_task(state: &AppState, id: TaskId, args: TaskArgs) -> Result<(), CliError> {
    enter(state, &Route::AdminTaskEdit(id))?;
    if !args.items.is_empty() {
        return Err(CliError::InvalidArgument(
            "Checklist items can only be set when creating a task".to_owned(),
        ));
    }

    let current = state.tasks().get(id).await?;
    let draft = args.apply(TaskDraft::from_task(&current));
    let task = state
        .tasks()
        .update(id, &draft, Strictness::Strict, today())
        .await?;

    view::note("Task updated successfully");
    view::task_detail(&task);
    Ok(())
}

pub async fn delete_task(state: &AppState, id: TaskId) -> Result<(), CliError> {
    enter(state, &Route::AdminTasks)?;

    let task = state.tasks().get(id).await?;
    state.tasks().delete_checked(&task).await?;

    view::note(&format!("Deleted task #{id}"));
    Ok(())
}

pub async fn members(state: &AppState, search: Option<&str>) -> Result<(), CliError> {
    enter(state, &Route::AdminMembers)?;
    let users = state.members().list().await?;

    view::heading("Team members");
    view::members(&filter_members_by_name(&users, search.unwrap_or_default()));
    Ok(())
}
