//! Integration tests for admin task management.
//!
//! Run with: cargo test -p taskdesk-integration-tests

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use reqwest::StatusCode;

use taskdesk_client::{Credentials, ServiceError};
use taskdesk_core::{
    Strictness, TaskDraft, TaskPriority, TaskRuleError, TaskStatus, TaskStats,
    filter_members_by_name,
};
use taskdesk_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, MEMBER_EMAIL, MEMBER_PASSWORD, TestContext, task_fixture,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

async fn as_admin() -> TestContext {
    let ctx = TestContext::new().await.expect("Failed to start test context");
    ctx.app.auth().initialize();
    ctx.app
        .auth()
        .login(&Credentials::new(ADMIN_EMAIL, ADMIN_PASSWORD))
        .await
        .expect("Admin login should succeed");
    ctx
}

fn draft(ctx: &TestContext) -> TaskDraft {
    TaskDraft {
        title: "Quarterly report".to_owned(),
        description: "Collect the numbers and write it up".to_owned(),
        status: Some(TaskStatus::Pending),
        priority: Some(TaskPriority::High),
        due_date: "2026-04-15".to_owned(),
        user_ids: vec![ctx.member.id],
        checklist: vec!["Gather data".to_owned(), "  ".to_owned(), " Draft ".to_owned()],
    }
}

#[tokio::test]
async fn test_task_create() {
    let ctx = as_admin().await;

    let task = ctx
        .app
        .tasks()
        .create(&draft(&ctx), Strictness::Strict, today())
        .await
        .expect("Valid task should be created");

    assert_eq!(task.title, "Quarterly report");
    assert_eq!(task.priority, TaskPriority::High);
    assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 4, 15));
    assert!(task.is_assigned_to(ctx.member.id));

    let texts: Vec<&str> = task.checklist_items.iter().map(|i| i.text.as_str()).collect();
    assert_eq!(texts, vec!["Gather data", "Draft"]);
    assert!(task.checklist_items.iter().all(|i| !i.completed));
    assert_eq!(ctx.server.state().task_count(), 1);
}

#[tokio::test]
async fn test_task_create_invalid_sends_nothing() {
    let ctx = as_admin().await;
    let mut draft = draft(&ctx);
    draft.title = "Hi".to_owned();
    draft.due_date = "2026-02-01".to_owned();
    let requests_before = ctx.server.state().bearer_log().len();

    let err = ctx
        .app
        .tasks()
        .create(&draft, Strictness::Strict, today())
        .await
        .expect_err("Invalid task must be rejected");

    let errors = err.validation_errors().expect("Field errors expected");
    assert!(errors.get("title").is_some());
    assert_eq!(errors.get("dueDate"), Some("Due date must be in the future"));
    assert_eq!(ctx.server.state().task_count(), 0);
    assert_eq!(ctx.server.state().bearer_log().len(), requests_before);
}

#[tokio::test]
async fn test_task_create_lenient_allows_missing_due_date() {
    let ctx = as_admin().await;
    let mut draft = draft(&ctx);
    draft.description.clear();
    draft.due_date.clear();

    let task = ctx
        .app
        .tasks()
        .create(&draft, Strictness::Lenient, today())
        .await
        .expect("Lenient form accepts empty description and due date");

    assert!(task.due_date.is_none());
    assert!(task.description.is_none());
}

#[tokio::test]
async fn test_task_update_keeps_checklist() {
    let ctx = as_admin().await;
    let created = ctx
        .app
        .tasks()
        .create(&draft(&ctx), Strictness::Strict, today())
        .await
        .unwrap();

    let mut edit = TaskDraft::from_task(&created);
    edit.title = "Quarterly report (final)".to_owned();
    edit.status = Some(TaskStatus::Cancelled);
    edit.toggle_assignee(ctx.member.id);

    let updated = ctx
        .app
        .tasks()
        .update(created.id, &edit, Strictness::Strict, today())
        .await
        .expect("Update should succeed");

    assert_eq!(updated.title, "Quarterly report (final)");
    assert_eq!(updated.status, TaskStatus::Cancelled);
    assert!(updated.assigned_users.is_empty());
    assert_eq!(updated.checklist_items, created.checklist_items);
}

#[tokio::test]
async fn test_task_delete() {
    let ctx = as_admin().await;
    let task = ctx
        .server
        .state()
        .add_task(task_fixture("Throwaway", &[&ctx.member], &["Only step"]));

    ctx.app
        .tasks()
        .delete_checked(&task)
        .await
        .expect("Untouched task can be deleted");

    assert_eq!(ctx.server.state().task_count(), 0);
    let err = ctx.app.tasks().get(task.id).await.expect_err("Task is gone");
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.message(), format!("Task not found with id: {}", task.id));
}

#[tokio::test]
async fn test_task_delete_with_completed_items_refused_locally() {
    let ctx = as_admin().await;
    let mut fixture = task_fixture("Started", &[&ctx.member], &["Step one", "Step two"]);
    fixture.checklist_items.first_mut().unwrap().completed = true;
    let task = ctx.server.state().add_task(fixture);
    let requests_before = ctx.server.state().bearer_log().len();

    let err = ctx
        .app
        .tasks()
        .delete_checked(&task)
        .await
        .expect_err("Task with completed items must not be deleted");

    assert!(matches!(
        err,
        ServiceError::Rule(TaskRuleError::CompletedChecklistItems)
    ));
    assert_eq!(ctx.server.state().bearer_log().len(), requests_before);
    assert_eq!(ctx.server.state().task_count(), 1);
}

#[tokio::test]
async fn test_task_delete_with_completed_items_refused_by_server() {
    let ctx = as_admin().await;
    let mut fixture = task_fixture("Started", &[&ctx.member], &["Step one"]);
    fixture.checklist_items.first_mut().unwrap().completed = true;
    let task = ctx.server.state().add_task(fixture);

    let err = ctx
        .app
        .tasks()
        .delete(task.id)
        .await
        .expect_err("Server must refuse the delete");

    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    assert_eq!(
        err.message(),
        "Cannot delete task with completed checklist items."
    );
    assert_eq!(ctx.server.state().task_count(), 1);
}

#[tokio::test]
async fn test_admin_dashboard_stats() {
    let ctx = as_admin().await;
    let state = ctx.server.state();
    state.add_task(task_fixture("One", &[&ctx.member], &[]));
    let mut started = task_fixture("Two", &[&ctx.member], &[]);
    started.status = TaskStatus::InProgress;
    state.add_task(started);
    let mut done = task_fixture("Three", &[], &[]);
    done.status = TaskStatus::Completed;
    state.add_task(done);

    let tasks = ctx.app.tasks().list().await.unwrap();
    let stats = TaskStats::from_tasks(&tasks);

    assert_eq!(stats.total, 3);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.in_progress, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.cancelled, 0);
}

#[tokio::test]
async fn test_team_members() {
    let ctx = as_admin().await;
    ctx.server.state().add_account(
        "Linus Member",
        "linus@taskdesk.dev",
        "secret-pass",
        taskdesk_core::Role::Member,
    );

    let members = ctx.app.members().list().await.expect("Admin can list members");

    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|m| m.id != ctx.admin.id));

    let found = filter_members_by_name(&members, "GRACE");
    assert_eq!(found.len(), 1);
    assert_eq!(found.first().map(|m| m.id), Some(ctx.member.id));
}

#[tokio::test]
async fn test_member_cannot_manage_tasks() {
    let ctx = TestContext::new().await.unwrap();
    ctx.app.auth().initialize();
    ctx.app
        .auth()
        .login(&Credentials::new(MEMBER_EMAIL, MEMBER_PASSWORD))
        .await
        .unwrap();

    let err = ctx.app.tasks().list().await.expect_err("Members cannot list all tasks");

    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(err.message(), "Access denied");
}
