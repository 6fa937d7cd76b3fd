//! In-memory backend state.

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use taskdesk_core::{Employee, EmployeeId, Role, Task, TaskId, User, UserId};

/// A registered account.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub password: String,
}

#[derive(Debug)]
pub(crate) struct Db {
    pub accounts: Vec<Account>,
    pub tasks: BTreeMap<TaskId, Task>,
    pub employees: BTreeMap<EmployeeId, Employee>,
    pub next_id: i64,
    pub token_ttl: Duration,
    pub fail_checklist_updates: usize,
    pub fail_task_fetches: usize,
    pub checklist_gate: Option<Arc<Semaphore>>,
    pub omit_login_id: bool,
    pub bearer_log: Vec<Option<String>>,
}

impl Db {
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|a| a.user.email.eq_ignore_ascii_case(email))
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.accounts.iter().map(|a| &a.user).find(|u| u.id == id)
    }
}

/// Shared handle to the mock backend's data.
///
/// Tests use it to seed data, inspect what the server saw, and inject
/// failures.
#[derive(Debug, Clone)]
pub struct MockState {
    db: Arc<Mutex<Db>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            db: Arc::new(Mutex::new(Db {
                accounts: Vec::new(),
                tasks: BTreeMap::new(),
                employees: BTreeMap::new(),
                next_id: 0,
                token_ttl: Duration::hours(1),
                fail_checklist_updates: 0,
                fail_task_fetches: 0,
                checklist_gate: None,
                omit_login_id: false,
                bearer_log: Vec::new(),
            })),
        }
    }

    pub(crate) fn db(&self) -> parking_lot::MutexGuard<'_, Db> {
        self.db.lock()
    }

    /// Register an account directly.
    pub fn add_account(&self, full_name: &str, email: &str, password: &str, role: Role) -> User {
        let mut db = self.db();
        let user = User {
            id: UserId::new(db.next_id()),
            full_name: full_name.to_owned(),
            email: email.to_owned(),
            role,
        };
        db.accounts.push(Account {
            user: user.clone(),
            password: password.to_owned(),
        });
        user
    }

    /// Insert a task as is, assigning it a fresh ID.
    pub fn add_task(&self, mut task: Task) -> Task {
        let mut db = self.db();
        task.id = TaskId::new(db.next_id());
        db.tasks.insert(task.id, task.clone());
        task
    }

    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.db().tasks.get(&id).cloned()
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.db().tasks.len()
    }

    /// Lifetime of tokens issued from now on. Negative values issue
    /// already-expired tokens.
    pub fn set_token_ttl(&self, ttl: Duration) {
        self.db().token_ttl = ttl;
    }

    /// Make the next `count` checklist updates fail with a server error.
    pub fn fail_checklist_updates(&self, count: usize) {
        self.db().fail_checklist_updates = count;
    }

    /// Make the next `count` single-task fetches fail with a server error.
    pub fn fail_task_fetches(&self, count: usize) {
        self.db().fail_task_fetches = count;
    }

    /// Hold checklist updates until the returned gate gets a permit. Each
    /// permit lets one update through.
    #[must_use]
    pub fn hold_checklist_updates(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.db().checklist_gate = Some(Arc::clone(&gate));
        gate
    }

    /// Answer logins without the `id` field, like older backends do.
    pub fn omit_login_id(&self) {
        self.db().omit_login_id = true;
    }

    /// `Authorization` headers seen on authenticated endpoints, in order.
    #[must_use]
    pub fn bearer_log(&self) -> Vec<Option<String>> {
        self.db().bearer_log.clone()
    }

    /// A JWT-shaped token for `user`. The signature is not real.
    pub(crate) fn issue_token(&self, user: &User) -> String {
        let exp = (Utc::now() + self.db().token_ttl).timestamp();
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = serde_json::json!({
            "sub": user.email,
            "role": user.role.as_str(),
            "exp": exp,
        });
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.mock-signature")
    }
}
