use std::collections::HashSet;

use dashmap::DashMap;
use rand::{Rng, distr::Alphanumeric};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    auth::{
        permissions::resolve_permissions,
        roles::{self, RoleTag},
    },
    dao::models::UserRecord,
};

/// Length of the opaque bearer tokens handed to clients.
const TOKEN_LENGTH: usize = 32;

/// Caller identity snapshot taken when the session was materialized.
///
/// Roles and the resolved permission set are frozen for the session's
/// lifetime; a role change requires explicit revocation and a fresh session,
/// never a silent mid-session refresh.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Opaque bearer token identifying this session.
    pub token: String,
    /// The authenticated user.
    pub user_id: Uuid,
    /// Email as known at materialization time.
    pub email: String,
    /// Role tags held at materialization time.
    pub roles: Vec<RoleTag>,
    /// Explicit super-admin flag from the user record.
    pub is_super_admin: bool,
    /// Permission set resolved once at materialization.
    pub permissions: HashSet<&'static str>,
    /// When the session was issued.
    pub issued_at: OffsetDateTime,
    /// When the session stops resolving.
    pub expires_at: OffsetDateTime,
}

impl AuthSession {
    /// Effective super-admin standing.
    ///
    /// Two independent signals: the explicit flag on the user record, or a
    /// literal SUPERADMIN role tag. Either one is sufficient; nothing else
    /// is ever inferred.
    pub fn is_effective_superadmin(&self) -> bool {
        self.is_super_admin || self.roles.contains(&RoleTag::SuperAdmin)
    }

    /// Whether the caller holds `permission`.
    ///
    /// Checks the cached set only; superadmins short-circuit every check.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_effective_superadmin() || self.permissions.contains(permission)
    }

    /// Highest-priority role for routing and display.
    pub fn primary_role(&self) -> RoleTag {
        roles::primary_role(&self.roles)
    }
}

/// In-memory session registry keyed by opaque bearer token.
///
/// Token issuance is driven by the identity collaborator (credential and
/// OAuth verification are out of scope); this registry owns resolution,
/// expiry, and revocation.
pub struct SessionService {
    sessions: DashMap<String, AuthSession>,
    ttl: Duration,
}

impl SessionService {
    /// Create a registry whose sessions live for `ttl_secs` seconds.
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Materialize a session for `user`, resolving its permission set once.
    pub fn issue(&self, user: &UserRecord) -> AuthSession {
        let issued_at = OffsetDateTime::now_utc();
        let session = AuthSession {
            token: generate_token(),
            user_id: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
            is_super_admin: user.is_super_admin,
            permissions: resolve_permissions(&user.roles),
            issued_at,
            expires_at: issued_at + self.ttl,
        };
        self.sessions
            .insert(session.token.clone(), session.clone());
        session
    }

    /// Install a session under a caller-chosen token.
    ///
    /// Used by the composition root when the configuration provisions static
    /// tokens for trusted callers.
    pub fn install(&self, token: String, user: &UserRecord) -> AuthSession {
        let mut session = self.issue(user);
        self.sessions.remove(&session.token);
        session.token = token.clone();
        self.sessions.insert(token, session.clone());
        session
    }

    /// Resolve a bearer token to its session, dropping it if expired.
    pub fn resolve(&self, token: &str) -> Option<AuthSession> {
        let session = self.sessions.get(token)?.clone();
        if session.expires_at <= OffsetDateTime::now_utc() {
            drop(self.sessions.remove(token));
            return None;
        }
        Some(session)
    }

    /// Revoke a single session. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Revoke every session for `user_id`.
    ///
    /// Called on role change so the next authentication re-derives the
    /// snapshot. Returns the number of sessions dropped.
    pub fn revoke_user(&self, user_id: Uuid) -> usize {
        let stale: Vec<String> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| entry.key().clone())
            .collect();
        let count = stale.len();
        for token in stale {
            self.sessions.remove(&token);
        }
        count
    }

    /// Drop every expired session. Returns the number pruned.
    pub fn prune_expired(&self) -> usize {
        let now = OffsetDateTime::now_utc();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.expires_at > now);
        before - self.sessions.len()
    }

    /// Number of live sessions currently registered.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::permissions::{MATCHES_WRITE, TIMESHEETS_WRITE};

    fn coach_user() -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            email: "coach@example.test".into(),
            display_name: "Coach".into(),
            roles: vec![RoleTag::Coach],
            is_super_admin: false,
            club_id: None,
            team_id: None,
        }
    }

    #[test]
    fn issue_then_resolve_round_trips() {
        let service = SessionService::new(3600);
        let user = coach_user();
        let issued = service.issue(&user);

        let resolved = service.resolve(&issued.token).unwrap();
        assert_eq!(resolved.user_id, user.id);
        assert_eq!(resolved.roles, vec![RoleTag::Coach]);
        assert!(resolved.has_permission(TIMESHEETS_WRITE));
        assert!(!resolved.has_permission(MATCHES_WRITE));
    }

    #[test]
    fn unknown_token_does_not_resolve() {
        let service = SessionService::new(3600);
        assert!(service.resolve("nope").is_none());
    }

    #[test]
    fn expired_session_stops_resolving() {
        let service = SessionService::new(0);
        let issued = service.issue(&coach_user());
        assert!(service.resolve(&issued.token).is_none());
        // The expired entry is dropped on resolution.
        assert!(service.is_empty());
    }

    #[test]
    fn revoke_user_drops_all_their_sessions() {
        let service = SessionService::new(3600);
        let user = coach_user();
        let first = service.issue(&user);
        let second = service.issue(&user);
        let other = service.issue(&coach_user());

        assert_eq!(service.revoke_user(user.id), 2);
        assert!(service.resolve(&first.token).is_none());
        assert!(service.resolve(&second.token).is_none());
        assert!(service.resolve(&other.token).is_some());
    }

    #[test]
    fn superadmin_flag_and_tag_are_independent_signals() {
        let mut user = coach_user();
        let service = SessionService::new(3600);

        user.is_super_admin = true;
        let by_flag = service.issue(&user);
        assert!(by_flag.is_effective_superadmin());
        assert!(by_flag.has_permission(MATCHES_WRITE));

        user.is_super_admin = false;
        user.roles = vec![RoleTag::SuperAdmin];
        let by_tag = service.issue(&user);
        assert!(by_tag.is_effective_superadmin());

        user.roles = vec![RoleTag::Coach];
        let neither = service.issue(&user);
        assert!(!neither.is_effective_superadmin());
    }

    #[test]
    fn prune_drops_only_expired() {
        let service = SessionService::new(3600);
        let live = service.issue(&coach_user());

        let expired_service = SessionService::new(0);
        expired_service.issue(&coach_user());
        assert_eq!(expired_service.prune_expired(), 1);

        assert_eq!(service.prune_expired(), 0);
        assert!(service.resolve(&live.token).is_some());
    }
}
