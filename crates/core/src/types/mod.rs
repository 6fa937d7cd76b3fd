//! Core types for Taskdesk.
//!
//! This module provides type-safe wrappers for the task-management domain.

pub mod email;
pub mod id;
pub mod role;
pub mod status;
pub mod task;
pub mod user;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::Role;
pub use status::*;
pub use task::{ChecklistItem, Task};
pub use user::{AuthUser, Employee, MissingUserId, RegisteredProfile, User};
