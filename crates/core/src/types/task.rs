//! Tasks and their checklist items.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{ChecklistItemId, TaskId, TaskPriority, TaskStatus, User, UserId};

/// A checklist item. Owned by its task; it has no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// A task as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Stamped by the server when the first checklist item is completed.
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub assigned_users: Vec<User>,
    #[serde(default)]
    pub checklist_items: Vec<ChecklistItem>,
}

impl Task {
    /// Description text, empty when the backend sent none.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Whether at least one checklist item is completed.
    #[must_use]
    pub fn has_completed_items(&self) -> bool {
        self.checklist_items.iter().any(|item| item.completed)
    }

    /// `(completed, total)` checklist counts.
    #[must_use]
    pub fn checklist_progress(&self) -> (usize, usize) {
        let done = self
            .checklist_items
            .iter()
            .filter(|item| item.completed)
            .count();
        (done, self.checklist_items.len())
    }

    #[must_use]
    pub fn is_assigned_to(&self, user: UserId) -> bool {
        self.assigned_users.iter().any(|u| u.id == user)
    }

    /// IDs of the assigned users, in response order.
    #[must_use]
    pub fn assignee_ids(&self) -> Vec<UserId> {
        self.assigned_users.iter().map(|u| u.id).collect()
    }
}
