//! Task endpoints.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument};

use taskdesk_core::{
    ChecklistItem, ChecklistItemId, Strictness, Task, TaskDraft, TaskId, UserId, ensure_deletable,
};

use super::ServiceError;
use crate::api::{ApiClient, ApiError};

#[derive(Serialize)]
struct ChecklistUpdate {
    completed: bool,
}

/// Task service.
#[derive(Debug, Clone)]
pub struct TaskService {
    api: ApiClient,
}

impl TaskService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch every task.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        self.api.get("/tasks", "Failed to fetch tasks").await
    }

    /// Fetch one task.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get(&self, id: TaskId) -> Result<Task, ApiError> {
        self.api
            .get(&format!("/tasks/{id}"), "Failed to fetch task")
            .await
    }

    /// Validate a task form and create the task.
    ///
    /// Only non-blank checklist rows are submitted, all uncompleted.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` without sending anything if the form
    /// is invalid, or `ServiceError::Api` if the request fails.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(
        &self,
        draft: &TaskDraft,
        strictness: Strictness,
        today: NaiveDate,
    ) -> Result<Task, ServiceError> {
        let request = draft.to_create_request(strictness, today)?;
        let task: Task = self
            .api
            .post("/tasks", &request, "Failed to create task")
            .await?;
        info!(task_id = %task.id, "Created task");
        Ok(task)
    }

    /// Validate a task form and update the task. The checklist is untouched.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` without sending anything if the form
    /// is invalid, or `ServiceError::Api` if the request fails.
    #[instrument(skip(self, draft))]
    pub async fn update(
        &self,
        id: TaskId,
        draft: &TaskDraft,
        strictness: Strictness,
        today: NaiveDate,
    ) -> Result<Task, ServiceError> {
        let request = draft.to_update_request(strictness, today)?;
        let task = self
            .api
            .put(&format!("/tasks/{id}"), &request, "Failed to update task")
            .await?;
        info!("Updated task");
        Ok(task)
    }

    /// Delete a task by ID, without the local checklist check.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn delete(&self, id: TaskId) -> Result<(), ApiError> {
        self.api
            .delete(&format!("/tasks/{id}"), "Failed to delete task")
            .await
    }

    /// Delete a task unless work has been recorded against it.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Rule` without sending anything if any checklist
    /// item is completed, or `ServiceError::Api` if the request fails.
    #[instrument(skip(self, task), fields(task_id = %task.id))]
    pub async fn delete_checked(&self, task: &Task) -> Result<(), ServiceError> {
        ensure_deletable(task)?;
        self.delete(task.id).await?;
        info!("Deleted task");
        Ok(())
    }

    /// Tasks assigned to `user`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn my_tasks(&self, user: UserId) -> Result<Vec<Task>, ApiError> {
        self.api
            .get(&format!("/tasks/my-tasks/{user}"), "Failed to fetch my tasks")
            .await
    }

    /// One task assigned to `user`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the task is not assigned
    /// to the user.
    pub async fn my_task(&self, user: UserId, task: TaskId) -> Result<Task, ApiError> {
        self.api
            .get(
                &format!("/tasks/my-tasks/{user}/{task}"),
                "Failed to fetch task details",
            )
            .await
    }

    /// Set one checklist item's completion flag. The server recomputes the
    /// task's status and start date.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn set_checklist_item(
        &self,
        task: TaskId,
        item: ChecklistItemId,
        completed: bool,
    ) -> Result<ChecklistItem, ApiError> {
        self.api
            .put(
                &format!("/tasks/{task}/checklist/{item}"),
                &ChecklistUpdate { completed },
                "Failed to update checklist item",
            )
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use url::Url;

    use taskdesk_core::{TaskPriority, TaskRuleError, TaskStatus};

    use super::*;
    use crate::session::SessionStore;

    fn service() -> TaskService {
        // Nothing listens on port 9; tests here must fail before the network.
        let api = ApiClient::with_timeout(
            Url::parse("http://127.0.0.1:9/api").unwrap(),
            Duration::from_secs(1),
            SessionStore::in_memory(),
        )
        .unwrap();
        TaskService::new(api)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[tokio::test]
    async fn test_create_validates_before_request() {
        let draft = TaskDraft {
            title: "ab".to_owned(),
            description: "Short".to_owned(),
            due_date: "2026-10-15".to_owned(),
            ..TaskDraft::default()
        };
        let err = service()
            .create(&draft, Strictness::Strict, today())
            .await
            .unwrap_err();

        let errors = err.validation_errors().unwrap();
        assert_eq!(errors.get("title"), Some("Title must be at least 3 characters"));
        assert_eq!(errors.get("dueDate"), Some("Due date must be in the future"));
    }

    #[tokio::test]
    async fn test_delete_checked_refuses_started_task() {
        let task = Task {
            id: TaskId::new(5),
            title: "Ship release".to_owned(),
            description: None,
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: None,
            start_date: None,
            created_at: None,
            updated_at: None,
            assigned_users: Vec::new(),
            checklist_items: vec![ChecklistItem {
                id: ChecklistItemId::new(1),
                text: "Tag".to_owned(),
                completed: true,
            }],
        };

        let err = service().delete_checked(&task).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Rule(TaskRuleError::CompletedChecklistItems)
        ));
        assert_eq!(
            err.to_string(),
            "Cannot delete task with completed checklist items."
        );
    }
}
