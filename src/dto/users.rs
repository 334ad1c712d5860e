use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{
    roles::{self, RoleTag},
    session::AuthSession,
};

/// Caller identity returned by `/auth/me`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    /// Authenticated user id.
    pub user_id: Uuid,
    /// Email on the session snapshot.
    pub email: String,
    /// Role tags held by the session.
    pub roles: Vec<RoleTag>,
    /// Highest-priority role, used for default routing.
    pub primary_role: RoleTag,
    /// Dashboard path for the primary role.
    pub dashboard_path: String,
    /// Effective super-admin standing.
    pub super_admin: bool,
    /// Resolved permission tokens, sorted for stable output.
    pub permissions: Vec<String>,
}

impl From<AuthSession> for MeResponse {
    fn from(session: AuthSession) -> Self {
        let primary_role = session.primary_role();
        let super_admin = session.is_effective_superadmin();
        let mut permissions: Vec<String> =
            session.permissions.iter().map(|p| p.to_string()).collect();
        permissions.sort();
        Self {
            user_id: session.user_id,
            email: session.email,
            roles: session.roles,
            primary_role,
            dashboard_path: roles::dashboard_path(primary_role).to_string(),
            super_admin,
            permissions,
        }
    }
}

/// Acknowledgement returned by `/auth/logout`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    /// Whether a session was actually revoked.
    pub revoked: bool,
}
