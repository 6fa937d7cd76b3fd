//! Task rules shared by every front end.
//!
//! - [`validation`] - Client-side gate for the create/update task forms
//! - [`checklist`] - Delete guard, optimistic toggles, status recomputation
//! - [`stats`] - Dashboard counts, chart series, and list helpers

pub mod checklist;
pub mod stats;
pub mod validation;

pub use checklist::{
    TaskFilter, TaskRuleError, derived_status, ensure_deletable, reconcile_progress,
    set_item_completed,
};
pub use stats::{
    ChartSeries, EmployeeStats, PriorityCounts, TaskStats, filter_members_by_name, recent_tasks,
};
pub use validation::{
    DESCRIPTION_MAX_CHARS, NewChecklistItem, Strictness, TITLE_MIN_CHARS, TaskDraft, TaskField,
    TaskRequest, ValidationErrors,
};
