//! Taskdesk Core - Shared types and task rules.
//!
//! This crate provides the domain model used across all Taskdesk components:
//! - `client` - Session lifecycle, route guards, and REST API services
//! - `cli` - Command-line front end for admins and team members
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no storage
//! access, no HTTP clients. Anything that needs the current date takes it as
//! an argument so the rules stay deterministic.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, roles, statuses, tasks and users
//! - [`rules`] - Task form validation, checklist rules, and dashboard statistics

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod rules;
pub mod types;

pub use rules::*;
pub use types::*;
