//! Team member directory.

use taskdesk_core::User;

use crate::api::{ApiClient, ApiError};

/// Admin-only listing of team members, used for task assignment.
#[derive(Debug, Clone)]
pub struct MemberService {
    api: ApiClient,
}

impl MemberService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch every team member.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.api
            .get("/admin/team-members", "Failed to fetch users")
            .await
    }
}
