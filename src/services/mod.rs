//! Business operations behind the HTTP routes.

pub mod audit;
pub mod documentation;
pub mod export_service;
pub mod health_service;
pub mod match_service;
pub mod poll_service;
pub mod stats_service;
pub mod timesheet_service;

use crate::{auth::permissions, auth::session::AuthSession, error::ServiceError, state::SharedState};

/// Permission gate that forwards denials to the audit sink.
///
/// The returned error stays generic; the requirement that failed is only
/// recorded server-side.
pub(crate) fn authorize(
    state: &SharedState,
    session: Option<&AuthSession>,
    permission: &'static str,
    action: &'static str,
) -> Result<(), ServiceError> {
    permissions::require_permission(session, permission).inspect_err(|_| {
        state
            .audit()
            .denial(session.map(|s| s.user_id), action, permission);
    })
}
