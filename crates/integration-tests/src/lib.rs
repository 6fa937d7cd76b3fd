//! Integration tests for Taskdesk.
//!
//! The tests drive the real client stack (`taskdesk-client`) against an
//! in-process mock of the REST API (see [`mock`]), so no backend or database
//! is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p taskdesk-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth` - Login, registration and session restore
//! - `guards` - Route protection over a live session
//! - `tasks` - Admin task management
//! - `checklist` - Member checklist workflow
//! - `employees` - Legacy employee directory

pub mod mock;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use taskdesk_client::{AppState, ClientConfig, MemoryStorage, SessionStorage};
use taskdesk_core::{ChecklistItem, ChecklistItemId, Role, Task, TaskId, TaskPriority, TaskStatus, User};

use mock::MockServer;

pub const ADMIN_EMAIL: &str = "ada@taskdesk.dev";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const MEMBER_EMAIL: &str = "grace@taskdesk.dev";
pub const MEMBER_PASSWORD: &str = "member-pass";

/// A mock server with one admin and one member, plus a client pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub app: AppState,
    pub admin: User,
    pub member: User,
}

impl TestContext {
    /// Start a server, seed the two accounts and build an uninitialized
    /// client over fresh in-memory storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot bind or the client cannot be
    /// built.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let server = MockServer::start().await?;
        let admin = server
            .state()
            .add_account("Ada Admin", ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin);
        let member = server
            .state()
            .add_account("Grace Hopper", MEMBER_EMAIL, MEMBER_PASSWORD, Role::Member);

        let storage = Arc::new(MemoryStorage::new());
        let app = client_over(&server, storage.clone())?;

        Ok(Self {
            server,
            storage,
            app,
            admin,
            member,
        })
    }

    /// A second client sharing this context's storage, as after a restart.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn restart(&self) -> Result<AppState, Box<dyn std::error::Error>> {
        client_over(&self.server, self.storage.clone())
    }
}

/// Build a client over `storage`, pointed at `server`.
///
/// # Errors
///
/// Returns an error if the URL is rejected or the HTTP client cannot be built.
pub fn client_over(
    server: &MockServer,
    storage: Arc<MemoryStorage>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let config = ClientConfig::for_api_url(&server.api_url(), PathBuf::from("unused-session.json"))?;
    let storage: Arc<dyn SessionStorage> = storage;
    Ok(AppState::with_storage(config, storage)?)
}

/// A pending task assigned to `assignees`, with one unchecked item per text.
///
/// IDs are placeholders; [`mock::MockState::add_task`] assigns the task's own.
#[must_use]
pub fn task_fixture(title: &str, assignees: &[&User], items: &[&str]) -> Task {
    Task {
        id: TaskId::new(0),
        title: title.to_owned(),
        description: None,
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        due_date: NaiveDate::from_ymd_opt(2030, 1, 1),
        start_date: None,
        created_at: None,
        updated_at: None,
        assigned_users: assignees.iter().map(|u| (*u).clone()).collect(),
        checklist_items: items
            .iter()
            .zip(1_i64..)
            .map(|(text, n)| ChecklistItem {
                id: ChecklistItemId::new(1000 + n),
                text: (*text).to_owned(),
                completed: false,
            })
            .collect(),
    }
}
