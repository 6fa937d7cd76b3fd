//! Task form validation.
//!
//! Runs before any request is built. A draft that fails validation never
//! reaches the network layer; its errors are shown next to the form fields.
//!
//! Two strictness levels exist. The admin task form ([`Strictness::Strict`])
//! requires a description and a due date. The legacy task form
//! ([`Strictness::Lenient`]) makes both optional but keeps the same bounds.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{Task, TaskPriority, TaskStatus, UserId};

/// Minimum number of characters in a task title.
pub const TITLE_MIN_CHARS: usize = 3;

/// Maximum number of characters in a task description.
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// How strictly optional-looking fields are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Description and due date are required (admin task form).
    #[default]
    Strict,
    /// Description and due date may be left empty (legacy task form).
    Lenient,
}

/// Fields of the task form that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskField {
    Title,
    Description,
    Status,
    Priority,
    DueDate,
}

impl TaskField {
    /// Field name as used in request bodies and server `validationErrors`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::DueDate => "dueDate",
        }
    }
}

/// Field-level validation messages, keyed by request field name.
///
/// Built locally by [`TaskDraft::validate`] or from a server response's
/// `validationErrors` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("{}", summarize(.0))]
pub struct ValidationErrors(BTreeMap<String, String>);

fn summarize(fields: &BTreeMap<String, String>) -> String {
    fields
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field, replacing any earlier one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Message for a form field, if it failed.
    #[must_use]
    pub fn field(&self, field: TaskField) -> Option<&str> {
        self.get(field.as_str())
    }

    /// Message for a raw field name, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Clear the message for a field (the user started editing it).
    pub fn clear(&mut self, field: TaskField) {
        self.0.remove(field.as_str());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A checklist item as submitted on task creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChecklistItem {
    pub text: String,
    pub completed: bool,
}

/// Request body for creating or updating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub user_ids: Vec<UserId>,
    /// Present on create only. Updates never touch the checklist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist_items: Option<Vec<NewChecklistItem>>,
}

/// The editable state of a task form.
///
/// Text fields hold exactly what the user typed; nothing is parsed until
/// [`TaskDraft::validate`] runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// `YYYY-MM-DD`, or empty.
    pub due_date: String,
    pub user_ids: Vec<UserId>,
    /// Checklist rows as typed, blanks included.
    pub checklist: Vec<String>,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: Some(TaskStatus::default()),
            priority: Some(TaskPriority::default()),
            due_date: String::new(),
            user_ids: Vec::new(),
            checklist: vec![String::new()],
        }
    }
}

impl TaskDraft {
    /// Prefill an update form from an existing task.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description().to_owned(),
            status: Some(task.status),
            priority: Some(task.priority),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            user_ids: task.assignee_ids(),
            checklist: Vec::new(),
        }
    }

    /// Select the user if unselected, deselect otherwise.
    pub fn toggle_assignee(&mut self, user: UserId) {
        if let Some(pos) = self.user_ids.iter().position(|id| *id == user) {
            self.user_ids.remove(pos);
        } else {
            self.user_ids.push(user);
        }
    }

    /// Checklist entries that will actually be submitted.
    ///
    /// Blank rows are dropped and every item starts uncompleted.
    #[must_use]
    pub fn checklist_items(&self) -> Vec<NewChecklistItem> {
        self.checklist
            .iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .map(|text| NewChecklistItem {
                text: text.to_owned(),
                completed: false,
            })
            .collect()
    }

    /// Check every field against the form rules.
    ///
    /// `today` is the caller's current date; due dates on `today` pass.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message.
    pub fn validate(&self, strictness: Strictness, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.title.trim().is_empty() {
            errors.insert(TaskField::Title.as_str(), "Title is required");
        } else if self.title.chars().count() < TITLE_MIN_CHARS {
            errors.insert(
                TaskField::Title.as_str(),
                format!("Title must be at least {TITLE_MIN_CHARS} characters"),
            );
        }

        if self.description.trim().is_empty() {
            if strictness == Strictness::Strict {
                errors.insert(TaskField::Description.as_str(), "Description is required");
            }
        } else if self.description.chars().count() > DESCRIPTION_MAX_CHARS {
            errors.insert(
                TaskField::Description.as_str(),
                format!("Description must not exceed {DESCRIPTION_MAX_CHARS} characters"),
            );
        }

        if self.status.is_none() {
            errors.insert(TaskField::Status.as_str(), "Status is required");
        }
        if self.priority.is_none() {
            errors.insert(TaskField::Priority.as_str(), "Priority is required");
        }

        match parse_due_date(&self.due_date) {
            DueDate::Missing if strictness == Strictness::Strict => {
                errors.insert(TaskField::DueDate.as_str(), "Due date is required");
            }
            DueDate::Missing => {}
            DueDate::Invalid => {
                errors.insert(
                    TaskField::DueDate.as_str(),
                    "Due date must be a valid date (YYYY-MM-DD)",
                );
            }
            DueDate::Date(date) if date < today => {
                errors.insert(TaskField::DueDate.as_str(), "Due date must be in the future");
            }
            DueDate::Date(_) => {}
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validate and build the request body for creating a task.
    ///
    /// # Errors
    ///
    /// Returns the validation errors if any field fails.
    pub fn to_create_request(
        &self,
        strictness: Strictness,
        today: NaiveDate,
    ) -> Result<TaskRequest, ValidationErrors> {
        let mut request = self.to_update_request(strictness, today)?;
        request.checklist_items = Some(self.checklist_items());
        Ok(request)
    }

    /// Validate and build the request body for updating a task.
    ///
    /// # Errors
    ///
    /// Returns the validation errors if any field fails.
    pub fn to_update_request(
        &self,
        strictness: Strictness,
        today: NaiveDate,
    ) -> Result<TaskRequest, ValidationErrors> {
        self.validate(strictness, today)?;

        let (Some(status), Some(priority)) = (self.status, self.priority) else {
            // validate() already rejects a missing status or priority
            return Err(ValidationErrors::new());
        };
        let due_date = match parse_due_date(&self.due_date) {
            DueDate::Date(date) => Some(date),
            DueDate::Missing | DueDate::Invalid => None,
        };
        let description = (!self.description.trim().is_empty()).then(|| self.description.clone());

        Ok(TaskRequest {
            title: self.title.clone(),
            description,
            status,
            priority,
            due_date,
            user_ids: self.user_ids.clone(),
            checklist_items: None,
        })
    }
}

enum DueDate {
    Missing,
    Invalid,
    Date(NaiveDate),
}

fn parse_due_date(raw: &str) -> DueDate {
    let raw = raw.trim();
    if raw.is_empty() {
        return DueDate::Missing;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_or(DueDate::Invalid, DueDate::Date)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn valid_draft() -> TaskDraft {
        TaskDraft {
            title: "Write release notes".to_owned(),
            description: "Summarise the sprint".to_owned(),
            due_date: "2026-10-20".to_owned(),
            ..TaskDraft::default()
        }
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(valid_draft().validate(Strictness::Strict, today()).is_ok());
    }

    #[test]
    fn test_two_char_title_fails_three_char_title_passes() {
        let mut draft = valid_draft();
        draft.title = "ab".to_owned();
        let errors = draft.validate(Strictness::Strict, today()).unwrap_err();
        assert_eq!(
            errors.field(TaskField::Title),
            Some("Title must be at least 3 characters")
        );

        draft.title = "abc".to_owned();
        assert!(draft.validate(Strictness::Strict, today()).is_ok());
    }

    #[test]
    fn test_blank_title_is_required() {
        let mut draft = valid_draft();
        draft.title = "   ".to_owned();
        let errors = draft.validate(Strictness::Lenient, today()).unwrap_err();
        assert_eq!(errors.field(TaskField::Title), Some("Title is required"));
    }

    #[test]
    fn test_due_date_today_passes_yesterday_fails() {
        let mut draft = valid_draft();
        draft.due_date = "2026-10-16".to_owned();
        assert!(draft.validate(Strictness::Strict, today()).is_ok());

        draft.due_date = "2026-10-15".to_owned();
        let errors = draft.validate(Strictness::Strict, today()).unwrap_err();
        assert_eq!(
            errors.field(TaskField::DueDate),
            Some("Due date must be in the future")
        );
    }

    #[test]
    fn test_malformed_due_date_is_rejected() {
        let mut draft = valid_draft();
        draft.due_date = "next friday".to_owned();
        let errors = draft.validate(Strictness::Lenient, today()).unwrap_err();
        assert!(errors.field(TaskField::DueDate).is_some());
    }

    #[test]
    fn test_strict_requires_description_and_due_date() {
        let mut draft = valid_draft();
        draft.description = "  ".to_owned();
        draft.due_date = String::new();

        let errors = draft.validate(Strictness::Strict, today()).unwrap_err();
        assert_eq!(errors.field(TaskField::Description), Some("Description is required"));
        assert_eq!(errors.field(TaskField::DueDate), Some("Due date is required"));

        assert!(draft.validate(Strictness::Lenient, today()).is_ok());
    }

    #[test]
    fn test_description_upper_bound_applies_to_both_strictness_levels() {
        let mut draft = valid_draft();
        draft.description = "x".repeat(DESCRIPTION_MAX_CHARS);
        assert!(draft.validate(Strictness::Strict, today()).is_ok());

        draft.description.push('x');
        for strictness in [Strictness::Strict, Strictness::Lenient] {
            let errors = draft.validate(strictness, today()).unwrap_err();
            assert_eq!(
                errors.field(TaskField::Description),
                Some("Description must not exceed 1000 characters")
            );
        }
    }

    #[test]
    fn test_missing_status_and_priority() {
        let mut draft = valid_draft();
        draft.status = None;
        draft.priority = None;
        let errors = draft.validate(Strictness::Strict, today()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.field(TaskField::Status), Some("Status is required"));
        assert_eq!(errors.field(TaskField::Priority), Some("Priority is required"));
    }

    #[test]
    fn test_create_request_drops_blank_checklist_rows() {
        let mut draft = valid_draft();
        draft.checklist = vec![
            "Draft outline".to_owned(),
            "   ".to_owned(),
            String::new(),
            " Review ".to_owned(),
        ];

        let request = draft.to_create_request(Strictness::Strict, today()).unwrap();
        let items = request.checklist_items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text, "Draft outline");
        assert_eq!(items[1].text, "Review");
        assert!(items.iter().all(|item| !item.completed));
    }

    #[test]
    fn test_update_request_has_no_checklist() {
        let request = valid_draft()
            .to_update_request(Strictness::Strict, today())
            .unwrap();
        assert!(request.checklist_items.is_none());

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("checklistItems").is_none());
        assert_eq!(json["dueDate"], "2026-10-20");
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["userIds"], serde_json::json!([]));
    }

    #[test]
    fn test_invalid_draft_builds_no_request() {
        let draft = TaskDraft::default();
        assert!(draft.to_create_request(Strictness::Strict, today()).is_err());
    }

    #[test]
    fn test_toggle_assignee() {
        let mut draft = TaskDraft::default();
        draft.toggle_assignee(UserId::new(4));
        draft.toggle_assignee(UserId::new(5));
        draft.toggle_assignee(UserId::new(4));
        assert_eq!(draft.user_ids, vec![UserId::new(5)]);
    }

    #[test]
    fn test_validation_errors_display() {
        let errors: ValidationErrors =
            [("title", "Title is required"), ("dueDate", "Due date is required")]
                .into_iter()
                .collect();
        assert_eq!(
            errors.to_string(),
            "dueDate: Due date is required; title: Title is required"
        );
    }
}
