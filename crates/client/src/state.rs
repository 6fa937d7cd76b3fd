//! Application root shared by every view.
//!
//! Built once at startup from [`ClientConfig`]; owns the single
//! [`AuthContext`] and hands out the domain services.

use std::sync::Arc;

use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::auth::{AuthContext, AuthService};
use crate::config::ClientConfig;
use crate::services::{EmployeeService, MemberService, TaskService};
use crate::session::SessionStore;
use crate::storage::{FileStorage, SessionStorage};

/// Errors building the application root.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Application state shared across all views.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: ClientConfig,
    auth: AuthContext,
    tasks: TaskService,
    members: MemberService,
    employees: EmployeeService,
}

impl AppState {
    /// Build the root with the session kept in `config.session_file`.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, StateError> {
        let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::new(&config.session_file));
        Self::with_storage(config, storage)
    }

    /// Build the root over an explicit storage backend.
    ///
    /// # Errors
    ///
    /// Returns `StateError` if the HTTP client cannot be built.
    pub fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn SessionStorage>,
    ) -> Result<Self, StateError> {
        let api = ApiClient::new(&config, SessionStore::new(storage))?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                auth: AuthContext::new(AuthService::new(api.clone())),
                tasks: TaskService::new(api.clone()),
                members: MemberService::new(api.clone()),
                employees: EmployeeService::new(api),
                config,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn auth(&self) -> &AuthContext {
        &self.inner.auth
    }

    #[must_use]
    pub fn tasks(&self) -> &TaskService {
        &self.inner.tasks
    }

    #[must_use]
    pub fn members(&self) -> &MemberService {
        &self.inner.members
    }

    #[must_use]
    pub fn employees(&self) -> &EmployeeService {
        &self.inner.employees
    }
}
