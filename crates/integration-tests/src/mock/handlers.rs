//! Endpoint handlers.
//!
//! The rules the real backend enforces are mirrored here: bearer
//! authentication with expiring tokens, admin-only task management, the
//! checklist-driven status recomputation and the delete guard.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{FromRequestParts, Path, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use taskdesk_client::EmployeeRequest;
use taskdesk_client::token::decode_claims;
use taskdesk_core::{
    ChecklistItem, ChecklistItemId, Employee, EmployeeId, RegisteredProfile, Role, Task, TaskId,
    TaskRequest, User, UserId, reconcile_progress,
};

use super::error::MockError;
use super::state::{Account, Db, MockState};

type ApiResult<T> = Result<T, MockError>;

// =============================================================================
// Authentication
// =============================================================================

/// The authenticated caller, from a valid bearer token.
pub struct Caller(pub User);

impl Caller {
    fn require_admin(&self) -> ApiResult<()> {
        match self.0.role {
            Role::Admin => Ok(()),
            _ => Err(MockError::forbidden()),
        }
    }
}

impl FromRequestParts<MockState> for Caller {
    type Rejection = MockError;

    async fn from_request_parts(parts: &mut Parts, state: &MockState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let mut db = state.db();
        db.bearer_log.push(header.clone());

        let token = header
            .as_deref()
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(MockError::unauthorized)?;
        let claims = decode_claims(token).map_err(|_| MockError::unauthorized())?;
        if !claims.is_valid_at(Utc::now()) {
            debug!("Rejected expired token");
            return Err(MockError::unauthorized());
        }
        let email = claims.sub.ok_or_else(MockError::unauthorized)?;
        let account = db
            .account_by_email(&email)
            .ok_or_else(MockError::unauthorized)?;

        Ok(Self(account.user.clone()))
    }
}

#[derive(Deserialize)]
pub struct LoginBody {
    email: String,
    password: String,
}

/// POST /api/auth/login
pub async fn login(State(state): State<MockState>, Json(body): Json<LoginBody>) -> ApiResult<Json<Value>> {
    let (user, ttl, omit_id) = {
        let db = state.db();
        let account = db
            .account_by_email(&body.email)
            .filter(|a| a.password == body.password)
            .ok_or_else(|| MockError::new(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;
        (account.user.clone(), db.token_ttl, db.omit_login_id)
    };

    let token = state.issue_token(&user);
    let mut body = json!({
        "token": token,
        "type": "Bearer",
        "fullName": user.full_name,
        "email": user.email,
        "role": user.role,
        "expiresAt": (Utc::now() + ttl).naive_utc(),
    });
    if !omit_id {
        body["id"] = json!(user.id);
    }
    Ok(Json(body))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    full_name: String,
    email: String,
    password: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<MockState>,
    Json(body): Json<RegisterBody>,
) -> ApiResult<(StatusCode, Json<RegisteredProfile>)> {
    let mut errors = BTreeMap::new();
    if body.full_name.trim().is_empty() {
        errors.insert("fullName".to_owned(), "Full name is required".to_owned());
    }
    if body.password.len() < 6 {
        errors.insert(
            "password".to_owned(),
            "Password must be at least 6 characters".to_owned(),
        );
    }
    if !errors.is_empty() {
        return Err(MockError::validation(errors));
    }

    let mut db = state.db();
    if db.account_by_email(&body.email).is_some() {
        return Err(MockError::new(
            StatusCode::BAD_REQUEST,
            "Email is already registered",
        ));
    }

    let user = User {
        id: UserId::new(db.next_id()),
        full_name: body.full_name,
        email: body.email,
        role: Role::Member,
    };
    db.accounts.push(Account {
        user: user.clone(),
        password: body.password,
    });

    Ok((
        StatusCode::CREATED,
        Json(RegisteredProfile {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            created_at: Some(Utc::now().naive_utc()),
        }),
    ))
}

// =============================================================================
// Tasks
// =============================================================================

fn validate_task(request: &TaskRequest) -> ApiResult<()> {
    let mut errors = BTreeMap::new();
    if request.title.trim().chars().count() < 3 {
        errors.insert(
            "title".to_owned(),
            "Title must be between 3 and 100 characters".to_owned(),
        );
    }
    if request
        .description
        .as_deref()
        .is_some_and(|d| d.chars().count() > 1000)
    {
        errors.insert(
            "description".to_owned(),
            "Description must not exceed 1000 characters".to_owned(),
        );
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(MockError::validation(errors))
    }
}

fn assignees(db: &Db, ids: &[UserId]) -> ApiResult<Vec<User>> {
    ids.iter()
        .map(|id| db.user(*id).cloned().ok_or_else(|| MockError::not_found("User", id)))
        .collect()
}

fn task_mut(db: &mut Db, id: TaskId) -> ApiResult<&mut Task> {
    db.tasks
        .get_mut(&id)
        .ok_or_else(|| MockError::not_found("Task", id))
}

/// GET /api/tasks
pub async fn list_tasks(State(state): State<MockState>, caller: Caller) -> ApiResult<Json<Vec<Task>>> {
    caller.require_admin()?;
    Ok(Json(state.db().tasks.values().cloned().collect()))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<MockState>,
    caller: Caller,
    Json(request): Json<TaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    caller.require_admin()?;
    validate_task(&request)?;

    let mut db = state.db();
    let assigned_users = assignees(&db, &request.user_ids)?;
    let id = TaskId::new(db.next_id());
    let checklist_items = request
        .checklist_items
        .unwrap_or_default()
        .into_iter()
        .filter(|item| !item.text.trim().is_empty())
        .map(|item| ChecklistItem {
            id: ChecklistItemId::new(db.next_id()),
            text: item.text,
            completed: item.completed,
        })
        .collect();

    let now = Utc::now().naive_utc();
    let task = Task {
        id,
        title: request.title,
        description: request.description,
        status: request.status,
        priority: request.priority,
        due_date: request.due_date,
        start_date: None,
        created_at: Some(now),
        updated_at: Some(now),
        assigned_users,
        checklist_items,
    };
    db.tasks.insert(id, task.clone());
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<MockState>,
    caller: Caller,
    Path(id): Path<TaskId>,
) -> ApiResult<Json<Task>> {
    caller.require_admin()?;
    let mut db = state.db();
    Ok(Json(task_mut(&mut db, id)?.clone()))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<MockState>,
    caller: Caller,
    Path(id): Path<TaskId>,
    Json(request): Json<TaskRequest>,
) -> ApiResult<Json<Task>> {
    caller.require_admin()?;
    validate_task(&request)?;

    let mut db = state.db();
    let assigned_users = assignees(&db, &request.user_ids)?;
    let task = task_mut(&mut db, id)?;
    task.title = request.title;
    task.description = request.description;
    task.status = request.status;
    task.priority = request.priority;
    task.due_date = request.due_date;
    task.assigned_users = assigned_users;
    task.updated_at = Some(Utc::now().naive_utc());
    Ok(Json(task.clone()))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<MockState>,
    caller: Caller,
    Path(id): Path<TaskId>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;
    let mut db = state.db();
    if task_mut(&mut db, id)?.has_completed_items() {
        return Err(MockError::new(
            StatusCode::CONFLICT,
            "Cannot delete task with completed checklist items.",
        ));
    }
    db.tasks.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

fn require_self_or_admin(caller: &Caller, user: UserId) -> ApiResult<()> {
    if caller.0.id == user || caller.0.role == Role::Admin {
        Ok(())
    } else {
        Err(MockError::forbidden())
    }
}

/// GET /api/tasks/my-tasks/{user_id}
pub async fn my_tasks(
    State(state): State<MockState>,
    caller: Caller,
    Path(user): Path<UserId>,
) -> ApiResult<Json<Vec<Task>>> {
    require_self_or_admin(&caller, user)?;
    let db = state.db();
    Ok(Json(
        db.tasks
            .values()
            .filter(|t| t.is_assigned_to(user))
            .cloned()
            .collect(),
    ))
}

/// GET /api/tasks/my-tasks/{user_id}/{task_id}
pub async fn my_task(
    State(state): State<MockState>,
    caller: Caller,
    Path((user, id)): Path<(UserId, TaskId)>,
) -> ApiResult<Json<Task>> {
    require_self_or_admin(&caller, user)?;
    let mut db = state.db();
    if db.fail_task_fetches > 0 {
        db.fail_task_fetches -= 1;
        return Err(MockError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred",
        ));
    }
    db.tasks
        .get(&id)
        .filter(|t| t.is_assigned_to(user))
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            MockError::new(
                StatusCode::NOT_FOUND,
                format!("Task not found or not assigned to user: {id}"),
            )
        })
}

#[derive(Deserialize)]
pub struct ChecklistBody {
    completed: bool,
}

/// PUT /api/tasks/{id}/checklist/{item_id}
pub async fn update_checklist_item(
    State(state): State<MockState>,
    caller: Caller,
    Path((id, item_id)): Path<(TaskId, ChecklistItemId)>,
    Json(body): Json<ChecklistBody>,
) -> ApiResult<Json<ChecklistItem>> {
    let gate = state.db().checklist_gate.clone();
    if let Some(gate) = gate {
        gate.acquire()
            .await
            .map_err(|_| MockError::new(StatusCode::SERVICE_UNAVAILABLE, "Server shutting down"))?
            .forget();
    }

    let mut db = state.db();
    if db.fail_checklist_updates > 0 {
        db.fail_checklist_updates -= 1;
        return Err(MockError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred",
        ));
    }

    let task = task_mut(&mut db, id)?;
    if !task.is_assigned_to(caller.0.id) && caller.0.role != Role::Admin {
        return Err(MockError::forbidden());
    }
    let item = task
        .checklist_items
        .iter_mut()
        .find(|i| i.id == item_id)
        .ok_or_else(|| MockError::not_found("Checklist item", item_id))?;
    item.completed = body.completed;
    let item = item.clone();

    let now = Utc::now().naive_utc();
    reconcile_progress(task, now);
    task.updated_at = Some(now);
    Ok(Json(item))
}

/// GET /api/admin/team-members
pub async fn team_members(State(state): State<MockState>, caller: Caller) -> ApiResult<Json<Vec<User>>> {
    caller.require_admin()?;
    let db = state.db();
    Ok(Json(
        db.accounts
            .iter()
            .map(|a| &a.user)
            .filter(|u| u.role.is_member_like())
            .cloned()
            .collect(),
    ))
}

// =============================================================================
// Employees
// =============================================================================

fn employee_mut(db: &mut Db, id: EmployeeId) -> ApiResult<&mut Employee> {
    db.employees
        .get_mut(&id)
        .ok_or_else(|| MockError::not_found("Employee", id))
}

/// GET /api/employees
pub async fn list_employees(
    State(state): State<MockState>,
    _caller: Caller,
) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.db().employees.values().cloned().collect()))
}

/// POST /api/employees
pub async fn create_employee(
    State(state): State<MockState>,
    _caller: Caller,
    Json(request): Json<EmployeeRequest>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let mut db = state.db();
    if db
        .employees
        .values()
        .any(|e| e.email.eq_ignore_ascii_case(&request.email))
    {
        return Err(MockError::new(
            StatusCode::BAD_REQUEST,
            format!("Employee already exists with email: {}", request.email),
        ));
    }

    let now = Utc::now().naive_utc();
    let employee = Employee {
        id: EmployeeId::new(db.next_id()),
        name: request.name,
        email: request.email,
        department: request.department,
        position: request.position,
        phone_number: request.phone_number,
        status: request.status,
        created_at: Some(now),
        updated_at: Some(now),
    };
    db.employees.insert(employee.id, employee.clone());
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /api/employees/{id}
pub async fn get_employee(
    State(state): State<MockState>,
    _caller: Caller,
    Path(id): Path<EmployeeId>,
) -> ApiResult<Json<Employee>> {
    let mut db = state.db();
    Ok(Json(employee_mut(&mut db, id)?.clone()))
}

/// PUT /api/employees/{id}
pub async fn update_employee(
    State(state): State<MockState>,
    _caller: Caller,
    Path(id): Path<EmployeeId>,
    Json(request): Json<EmployeeRequest>,
) -> ApiResult<Json<Employee>> {
    let mut db = state.db();
    let employee = employee_mut(&mut db, id)?;
    employee.name = request.name;
    employee.email = request.email;
    employee.department = request.department;
    employee.position = request.position;
    employee.phone_number = request.phone_number;
    employee.status = request.status;
    employee.updated_at = Some(Utc::now().naive_utc());
    Ok(Json(employee.clone()))
}

/// DELETE /api/employees/{id}
pub async fn delete_employee(
    State(state): State<MockState>,
    _caller: Caller,
    Path(id): Path<EmployeeId>,
) -> ApiResult<StatusCode> {
    let mut db = state.db();
    employee_mut(&mut db, id)?;
    db.employees.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}
