//! In-process mock of the Taskdesk REST API.
//!
//! Serves the same endpoints, envelopes and status codes as the real backend
//! from an in-memory store, so the client can be exercised end to end without
//! a database.

mod error;
mod handlers;
mod state;

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

pub use error::MockError;
pub use handlers::Caller;
pub use state::{Account, MockState};

/// Build the API router over `state`.
pub fn router(state: MockState) -> Router {
    use handlers::{
        create_employee, create_task, delete_employee, delete_task, get_employee, get_task,
        list_employees, list_tasks, login, my_task, my_tasks, register, team_members,
        update_checklist_item, update_employee, update_task,
    };

    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/my-tasks/{user_id}", get(my_tasks))
        .route("/tasks/my-tasks/{user_id}/{task_id}", get(my_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/checklist/{item_id}", put(update_checklist_item))
        .route("/admin/team-members", get(team_members))
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        );

    Router::new().nest("/api", api).with_state(state)
}

/// A running mock server bound to an ephemeral local port.
///
/// The server task is aborted when this value is dropped.
pub struct MockServer {
    addr: SocketAddr,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Start a server over an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with(MockState::new()).await
    }

    /// Start a server over `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn start_with(state: MockState) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(state.clone());

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Mock server stopped");
            }
        });
        info!(%addr, "Mock API listening");

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// Base URL of the API, including the `/api` prefix.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    #[must_use]
    pub const fn state(&self) -> &MockState {
        &self.state
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
