//! Structured audit sink for authorization denials and state transitions.
//!
//! Owned by the composition root and injected through
//! [`crate::state::AppState`]. Entries go to the `audit` tracing target so
//! operators can route them to a dedicated collector.

use tracing::info;
use uuid::Uuid;

/// Outcome tag attached to every audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// The operation was performed.
    Applied,
    /// The caller was turned away.
    Denied,
}

impl AuditOutcome {
    fn as_str(self) -> &'static str {
        match self {
            AuditOutcome::Applied => "applied",
            AuditOutcome::Denied => "denied",
        }
    }
}

/// Audit sink handle. Cheap to share by reference.
pub struct AuditLog {
    _private: (),
}

impl AuditLog {
    /// Create the sink. Called once by the composition root.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Record an authorization denial.
    ///
    /// The HTTP response stays generic; the missing requirement is only ever
    /// named here.
    pub fn denial(&self, actor: Option<Uuid>, action: &'static str, requirement: &str) {
        info!(
            target: "audit",
            audit_id = %Uuid::new_v4(),
            user_id = ?actor,
            action,
            requirement,
            outcome = AuditOutcome::Denied.as_str(),
        );
    }

    /// Record an applied state transition or mutation.
    pub fn applied(&self, actor: Uuid, action: &'static str, subject: Uuid, detail: &str) {
        info!(
            target: "audit",
            audit_id = %Uuid::new_v4(),
            user_id = %actor,
            action,
            subject = %subject,
            detail,
            outcome = AuditOutcome::Applied.as_str(),
        );
    }

    /// Flush marker emitted on graceful shutdown.
    pub fn shutdown(&self) {
        info!(target: "audit", "audit sink shutting down");
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Redact an email down to its first character and domain.
///
/// Audit entries must never carry full addresses; tokens and passwords are
/// never logged at all.
pub fn redact_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head = local.chars().next().map(String::from).unwrap_or_default();
            format!("{head}***@{domain}")
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_redaction_keeps_domain_only() {
        assert_eq!(redact_email("coach@example.test"), "c***@example.test");
        assert_eq!(redact_email("@example.test"), "***@example.test");
        assert_eq!(redact_email("not-an-email"), "***");
    }
}
