//! Legacy employee directory endpoints.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use taskdesk_core::{Email, Employee, EmployeeId, EmployeeStatus, ValidationErrors};

use super::ServiceError;
use crate::api::{ApiClient, ApiError};

/// Create/update body for an employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub status: EmployeeStatus,
}

impl EmployeeRequest {
    /// Prefill an update form from an existing record.
    #[must_use]
    pub fn from_employee(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            email: employee.email.clone(),
            department: employee.department.clone(),
            position: employee.position.clone(),
            phone_number: employee.phone_number.clone(),
            status: employee.status,
        }
    }

    /// Check required fields and normalize optional ones.
    ///
    /// Blank optional fields are dropped; the email is trimmed.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message.
    pub fn validated(&self) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert("name", "Name is required");
        }
        let email = match Email::parse(&self.email) {
            Ok(email) => email.into_inner(),
            Err(e) => {
                errors.insert("email", e.to_string());
                String::new()
            }
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        let optional = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };
        Ok(Self {
            name: name.to_owned(),
            email,
            department: optional(&self.department),
            position: optional(&self.position),
            phone_number: optional(&self.phone_number),
            status: self.status,
        })
    }
}

/// Employee service.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    api: ApiClient,
}

impl EmployeeService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch every employee.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn list(&self) -> Result<Vec<Employee>, ApiError> {
        self.api.get("/employees", "Failed to fetch employees").await
    }

    /// Fetch one employee.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn get(&self, id: EmployeeId) -> Result<Employee, ApiError> {
        self.api
            .get(&format!("/employees/{id}"), "Failed to fetch employee")
            .await
    }

    /// Validate and create an employee.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` without sending anything if the
    /// form is invalid, or `ServiceError::Api` if the request fails.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create(&self, request: &EmployeeRequest) -> Result<Employee, ServiceError> {
        let request = request.validated()?;
        let employee: Employee = self
            .api
            .post("/employees", &request, "Failed to create employee")
            .await?;
        info!(employee_id = %employee.id, "Created employee");
        Ok(employee)
    }

    /// Validate and update an employee.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` without sending anything if the
    /// form is invalid, or `ServiceError::Api` if the request fails.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: EmployeeId,
        request: &EmployeeRequest,
    ) -> Result<Employee, ServiceError> {
        let request = request.validated()?;
        let employee = self
            .api
            .put(&format!("/employees/{id}"), &request, "Failed to update employee")
            .await?;
        info!("Updated employee");
        Ok(employee)
    }

    /// Delete an employee.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn delete(&self, id: EmployeeId) -> Result<(), ApiError> {
        self.api
            .delete(&format!("/employees/{id}"), "Failed to delete employee")
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request() -> EmployeeRequest {
        EmployeeRequest {
            name: "  Grace Hopper ".to_owned(),
            email: " grace@taskdesk.dev".to_owned(),
            department: Some("Engineering".to_owned()),
            position: Some("   ".to_owned()),
            phone_number: None,
            status: EmployeeStatus::Active,
        }
    }

    #[test]
    fn test_validated_normalizes_fields() {
        let valid = request().validated().unwrap();
        assert_eq!(valid.name, "Grace Hopper");
        assert_eq!(valid.email, "grace@taskdesk.dev");
        assert_eq!(valid.department.as_deref(), Some("Engineering"));
        assert_eq!(valid.position, None);
    }

    #[test]
    fn test_validated_reports_every_field() {
        let invalid = EmployeeRequest {
            name: String::new(),
            email: "nope".to_owned(),
            ..request()
        };
        let errors = invalid.validated().unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Please enter a valid email address"));
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let json = serde_json::to_value(EmployeeRequest {
            phone_number: Some("555-0100".to_owned()),
            ..request()
        })
        .unwrap();
        assert_eq!(json["phoneNumber"], "555-0100");
        assert_eq!(json["status"], "ACTIVE");
        assert!(json.get("position").is_some());
    }
}
