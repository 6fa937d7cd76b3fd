//! Member views: dashboard, "My Tasks" and the task detail checklist.
//!
//! # Usage
//!
//! ```bash
//! taskdesk my-tasks --status pending
//! taskdesk task 12
//! taskdesk check 12 31
//! taskdesk uncheck 12 31
//! taskdesk toggle 12 31
//! ```

use taskdesk_client::{AppState, ChecklistView, Route};
use taskdesk_core::{ChecklistItemId, TaskFilter, TaskId, TaskStats, recent_tasks};

use super::{CliError, enter};
use crate::view;

/// Number of tasks on the member dashboard.
const DASHBOARD_TASKS: usize = 5;

/// What to do with a checklist item.
#[derive(Debug, Clone, Copy)]
pub enum ItemAction {
    Check,
    Uncheck,
    Toggle,
}

pub async fn dashboard(state: &AppState) -> Result<(), CliError> {
    let user = enter(state, &Route::MemberDashboard)?;
    let tasks = state.tasks().my_tasks(user.require_id()?).await?;

    view::heading(&format!("Welcome back, {}", user.full_name));
    view::task_stats(&TaskStats::from_tasks(&tasks));

    view::heading("Latest assignments");
    view::task_table(&recent_tasks(&tasks, DASHBOARD_TASKS));
    Ok(())
}

pub async fn my_tasks(state: &AppState, filter: TaskFilter) -> Result<(), CliError> {
    let user = enter(state, &Route::MemberTasks)?;
    let tasks = state.tasks().my_tasks(user.require_id()?).await?;

    view::heading("My Tasks");
    view::task_table(&filter.apply(&tasks));
    Ok(())
}

pub async fn show_task(state: &AppState, id: TaskId) -> Result<(), CliError> {
    let user = enter(state, &Route::MemberTaskDetail(id))?;
    let checklist = ChecklistView::open(state.tasks().clone(), user.require_id()?, id).await?;
    view::task_detail(&checklist.task());
    checklist.close();
    Ok(())
}

pub async fn update_item(
    state: &AppState,
    task: TaskId,
    item: ChecklistItemId,
    action: ItemAction,
) -> Result<(), CliError> {
    let user = enter(state, &Route::MemberTaskDetail(task))?;
    let checklist = ChecklistView::open(state.tasks().clone(), user.require_id()?, task).await?;

    if !checklist
        .task()
        .checklist_items
        .iter()
        .any(|i| i.id == item)
    {
        checklist.close();
        return Err(CliError::InvalidArgument(format!(
            "Task #{task} has no checklist item {item}"
        )));
    }

    let result = match action {
        ItemAction::Check => checklist.set_completed(item, true).await,
        ItemAction::Uncheck => checklist.set_completed(item, false).await,
        ItemAction::Toggle => checklist.toggle(item).await,
    };
    let updated = checklist.task();
    checklist.close();

    view::task_detail(&updated);
    result?;
    Ok(())
}
