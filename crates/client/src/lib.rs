//! Taskdesk client library.
//!
//! Everything a front end needs between the user and the REST API:
//!
//! - [`session`] / [`storage`] / [`token`] - The persisted session and its expiry
//! - [`auth`] - Login, registration, and the shared [`AuthContext`]
//! - [`guard`] - Route table and role-based route guards
//! - [`services`] - Task, member, and employee endpoints
//! - [`state`] - The application root built at startup
//!
//! # Example
//!
//! ```rust,ignore
//! let state = AppState::new(ClientConfig::from_env()?)?;
//! let snapshot = state.auth().initialize();
//!
//! match guard(&Route::AdminTasks, &snapshot) {
//!     GuardOutcome::Render => {
//!         for task in state.tasks().list().await? {
//!             println!("{} {}", task.id, task.title);
//!         }
//!     }
//!     other => println!("{other:?}"),
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
pub mod token;

pub use api::{ApiClient, ApiError, ApiErrorBody};
pub use auth::{
    AuthContext, AuthError, AuthPhase, AuthService, AuthSnapshot, Credentials, LoginFailure,
    Registration,
};
pub use config::{ClientConfig, ConfigError, LogFormat};
pub use guard::{Access, GuardOutcome, RequiredRole, Route, dashboard_for, guard, protect, public_only};
pub use services::{
    ChecklistView, EmployeeRequest, EmployeeService, MemberService, ServiceError, TaskService,
};
pub use session::{Session, SessionError, SessionStore};
pub use state::{AppState, StateError};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
