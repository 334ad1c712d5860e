//! Flat `resource:action` permission tokens, the role grant table, and the
//! require-style gates used by the service layer.

use std::collections::HashSet;

use crate::{
    auth::{roles::RoleTag, session::AuthSession},
    error::ServiceError,
};

/// Read match listings and details.
pub const MATCHES_READ: &str = "matches:read";
/// Create and edit matches, including status transitions.
pub const MATCHES_WRITE: &str = "matches:write";
/// Soft-delete matches.
pub const MATCHES_DELETE: &str = "matches:delete";
/// Record and void in-match events.
pub const EVENTS_WRITE: &str = "events:write";
/// Record match results.
pub const RESULTS_WRITE: &str = "results:write";
/// Approve recorded results and post-final corrections.
pub const RESULTS_APPROVE: &str = "results:approve";
/// Edit lineups before kickoff.
pub const LINEUPS_WRITE: &str = "lineups:write";
/// Create, edit, and submit own timesheets.
pub const TIMESHEETS_WRITE: &str = "timesheets:write";
/// Review, approve, and reject submitted timesheets.
pub const TIMESHEETS_REVIEW: &str = "timesheets:review";
/// Mark approved timesheets as paid.
pub const TIMESHEETS_PAY: &str = "timesheets:pay";
/// Archive settled timesheets.
pub const TIMESHEETS_ARCHIVE: &str = "timesheets:archive";

/// Permissions granted by a single role tag.
///
/// Every role carries `matches:read`; the rest follows what the role does in
/// a club. The superadmin short-circuit lives on the session, not here.
pub fn grants_for(role: RoleTag) -> &'static [&'static str] {
    match role {
        RoleTag::SuperAdmin => &[
            MATCHES_READ,
            MATCHES_WRITE,
            MATCHES_DELETE,
            EVENTS_WRITE,
            RESULTS_WRITE,
            RESULTS_APPROVE,
            LINEUPS_WRITE,
            TIMESHEETS_WRITE,
            TIMESHEETS_REVIEW,
            TIMESHEETS_PAY,
            TIMESHEETS_ARCHIVE,
        ],
        RoleTag::LeagueAdmin => &[
            MATCHES_READ,
            MATCHES_WRITE,
            MATCHES_DELETE,
            RESULTS_APPROVE,
            TIMESHEETS_ARCHIVE,
        ],
        RoleTag::ClubOwner => &[
            MATCHES_READ,
            MATCHES_WRITE,
            MATCHES_DELETE,
            EVENTS_WRITE,
            RESULTS_WRITE,
            RESULTS_APPROVE,
            LINEUPS_WRITE,
            TIMESHEETS_REVIEW,
            TIMESHEETS_PAY,
            TIMESHEETS_ARCHIVE,
        ],
        RoleTag::ClubManager => &[
            MATCHES_READ,
            MATCHES_WRITE,
            EVENTS_WRITE,
            RESULTS_WRITE,
            LINEUPS_WRITE,
            TIMESHEETS_REVIEW,
        ],
        RoleTag::Coach => &[MATCHES_READ, EVENTS_WRITE, LINEUPS_WRITE, TIMESHEETS_WRITE],
        RoleTag::Referee => &[MATCHES_READ, EVENTS_WRITE, RESULTS_WRITE],
        RoleTag::Treasurer => &[MATCHES_READ, TIMESHEETS_PAY],
        RoleTag::PlayerPro
        | RoleTag::Player
        | RoleTag::Parent
        | RoleTag::Scout
        | RoleTag::Analyst => &[MATCHES_READ],
    }
}

/// Resolve the effective permission set for a role collection.
///
/// Called exactly once when a session is materialized; the result is cached
/// on the session for its lifetime and never recomputed per check.
pub fn resolve_permissions(roles: &[RoleTag]) -> HashSet<&'static str> {
    roles
        .iter()
        .flat_map(|role| grants_for(*role).iter().copied())
        .collect()
}

/// Gate on a permission token.
///
/// `None` means no authenticated caller: the failure is *unauthenticated*,
/// distinct from the *forbidden* returned for an authenticated caller who
/// lacks the permission. Neither error names what was missing.
pub fn require_permission(
    session: Option<&AuthSession>,
    permission: &str,
) -> Result<(), ServiceError> {
    let session = session.ok_or(ServiceError::Unauthenticated)?;
    if session.has_permission(permission) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Gate on holding a single role.
pub fn require_role(session: Option<&AuthSession>, tag: RoleTag) -> Result<(), ServiceError> {
    require_any_role(session, &[tag])
}

/// Gate on holding at least one of `tags`.
pub fn require_any_role(
    session: Option<&AuthSession>,
    tags: &[RoleTag],
) -> Result<(), ServiceError> {
    let session = session.ok_or(ServiceError::Unauthenticated)?;
    if session.is_effective_superadmin()
        || tags.iter().any(|tag| session.roles.contains(tag))
    {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

/// Gate on holding every one of `tags`.
pub fn require_all_roles(
    session: Option<&AuthSession>,
    tags: &[RoleTag],
) -> Result<(), ServiceError> {
    let session = session.ok_or(ServiceError::Unauthenticated)?;
    if session.is_effective_superadmin()
        || tags.iter().all(|tag| session.roles.contains(tag))
    {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}
