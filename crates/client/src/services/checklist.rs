//! Checklist view with optimistic toggles.
//!
//! A member's task detail view. Toggling an item flips it locally right
//! away, then the server's copy of the task replaces local state whether the
//! toggle succeeded or not. Local state is never merged with the server's.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, instrument, warn};

use taskdesk_core::{ChecklistItemId, Task, TaskId, UserId, set_item_completed};

use super::TaskService;
use crate::api::ApiError;

#[derive(Debug)]
struct ViewState {
    task: Task,
    attached: bool,
}

/// A task detail view owned by one member.
///
/// Cheaply cloneable; clones share the same state. Results that arrive after
/// [`ChecklistView::close`] are dropped.
#[derive(Debug, Clone)]
pub struct ChecklistView {
    tasks: TaskService,
    user: UserId,
    task_id: TaskId,
    state: Arc<Mutex<ViewState>>,
}

impl ChecklistView {
    /// Load the task and open a view on it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the task cannot be fetched.
    pub async fn open(tasks: TaskService, user: UserId, task_id: TaskId) -> Result<Self, ApiError> {
        let task = tasks.my_task(user, task_id).await?;
        Ok(Self {
            tasks,
            user,
            task_id,
            state: Arc::new(Mutex::new(ViewState {
                task,
                attached: true,
            })),
        })
    }

    /// Current local copy of the task.
    #[must_use]
    pub fn task(&self) -> Task {
        self.state.lock().task.clone()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state.lock().attached
    }

    /// Detach the view. Later server responses no longer touch local state.
    pub fn close(&self) {
        self.state.lock().attached = false;
    }

    /// Replace local state with the server's copy of the task.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the task cannot be fetched; local state is kept.
    pub async fn reload(&self) -> Result<Task, ApiError> {
        let task = self.tasks.my_task(self.user, self.task_id).await?;
        Ok(self.replace(task))
    }

    /// Flip one item relative to its local state.
    ///
    /// Unknown item IDs are a no-op.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_completed`].
    pub async fn toggle(&self, item: ChecklistItemId) -> Result<Task, ApiError> {
        let current = self
            .state
            .lock()
            .task
            .checklist_items
            .iter()
            .find(|i| i.id == item)
            .map(|i| i.completed);
        match current {
            Some(completed) => self.set_completed(item, !completed).await,
            None => Ok(self.task()),
        }
    }

    /// Set one item's completion flag.
    ///
    /// The item flips locally first. After the server call the task is
    /// fetched again and replaces local state. If the server call fails the
    /// task is still reloaded, and the error is returned. Only when both
    /// calls fail is the single item rolled back locally.
    ///
    /// Unknown item IDs are a no-op. Setting the current value is harmless;
    /// the server treats it as a no-op too.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` from the toggle request, or from the follow-up
    /// fetch if only that failed.
    #[instrument(skip(self), fields(task_id = %self.task_id))]
    pub async fn set_completed(
        &self,
        item: ChecklistItemId,
        completed: bool,
    ) -> Result<Task, ApiError> {
        let previous = {
            let mut state = self.state.lock();
            let previous = state
                .task
                .checklist_items
                .iter()
                .find(|i| i.id == item)
                .map(|i| i.completed);
            if previous.is_none() {
                debug!("Ignoring toggle of unknown checklist item");
                return Ok(state.task.clone());
            }
            set_item_completed(&mut state.task.checklist_items, item, completed);
            previous
        };

        let update = self
            .tasks
            .set_checklist_item(self.task_id, item, completed)
            .await;
        let reload = self.tasks.my_task(self.user, self.task_id).await;

        match (update, reload) {
            (Ok(_), Ok(task)) => Ok(self.replace(task)),
            (Err(e), Ok(task)) => {
                warn!(error = %e, "Checklist update failed; reloaded task");
                self.replace(task);
                Err(e)
            }
            (Ok(_), Err(e)) => {
                // The server took the change, so the optimistic flip stands.
                warn!(error = %e, "Failed to reload task after checklist update");
                Err(e)
            }
            (Err(e), Err(reload_err)) => {
                warn!(error = %reload_err, "Failed to reload task; rolling back item");
                if let Some(previous) = previous {
                    self.rollback(item, previous);
                }
                Err(e)
            }
        }
    }

    fn replace(&self, task: Task) -> Task {
        let mut state = self.state.lock();
        if state.attached {
            state.task = task;
        } else {
            debug!("View closed; dropping server response");
        }
        state.task.clone()
    }

    fn rollback(&self, item: ChecklistItemId, completed: bool) {
        let mut state = self.state.lock();
        if state.attached {
            set_item_completed(&mut state.task.checklist_items, item, completed);
        }
    }
}
