//! Legacy employee directory views.
//!
//! # Usage
//!
//! ```bash
//! taskdesk employees list
//! taskdesk employees create -n "Grace Hopper" -e grace@taskdesk.dev --department Engineering
//! taskdesk employees update 4 --status inactive
//! taskdesk employees delete 4
//! ```

use clap::Args;

use taskdesk_client::{AppState, EmployeeRequest, Route};
use taskdesk_core::{EmployeeId, EmployeeStats, EmployeeStatus};

use super::{CliError, enter};
use crate::view;

/// Employee form fields. On update, omitted fields keep their current value.
#[derive(Debug, Args)]
pub struct EmployeeArgs {
    /// Full name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Email address
    #[arg(short, long)]
    pub email: Option<String>,

    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub position: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// ACTIVE, INACTIVE or TERMINATED
    #[arg(short, long)]
    pub status: Option<EmployeeStatus>,
}

impl EmployeeArgs {
    fn apply(self, mut request: EmployeeRequest) -> EmployeeRequest {
        if let Some(name) = self.name {
            request.name = name;
        }
        if let Some(email) = self.email {
            request.email = email;
        }
        if self.department.is_some() {
            request.department = self.department;
        }
        if self.position.is_some() {
            request.position = self.position;
        }
        if self.phone.is_some() {
            request.phone_number = self.phone;
        }
        if let Some(status) = self.status {
            request.status = status;
        }
        request
    }
}

pub async fn list(state: &AppState) -> Result<(), CliError> {
    enter(state, &Route::Employees)?;
    let employees = state.employees().list().await?;

    view::heading("Employees");
    view::employee_stats(&EmployeeStats::from_employees(&employees));
    view::employees(&employees);
    Ok(())
}

pub async fn create(state: &AppState, args: EmployeeArgs) -> Result<(), CliError> {
    enter(state, &Route::EmployeeCreate)?;

    let request = args.apply(EmployeeRequest {
        name: String::new(),
        email: String::new(),
        department: None,
        position: None,
        phone_number: None,
        status: EmployeeStatus::default(),
    });
    let employee = state.employees().create(&request).await?;

    view::note(&format!("Employee created successfully (#{})", employee.id));
    Ok(())
}

pub async fn update(state: &AppState, id: EmployeeId, args: EmployeeArgs) -> Result<(), CliError> {
    enter(state, &Route::Employees)?;

    let current = state.employees().get(id).await?;
    let request = args.apply(EmployeeRequest::from_employee(&current));
    state.employees().update(id, &request).await?;

    view::note("Employee updated successfully");
    Ok(())
}

pub async fn delete(state: &AppState, id: EmployeeId) -> Result<(), CliError> {
    enter(state, &Route::Employees)?;
    state.employees().delete(id).await?;

    view::note(&format!("Deleted employee #{id}"));
    Ok(())
}
