use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle states of a coach timesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimesheetStatus {
    /// Being written by the owning coach; freely editable.
    Draft,
    /// Submitted and awaiting a reviewer.
    Pending,
    /// A reviewer has picked it up.
    UnderReview,
    /// Approved for payment.
    Approved,
    /// Sent back with a reason; editable again.
    Rejected,
    /// Payment has gone out.
    Paid,
    /// Flagged by either party after approval or payment.
    Disputed,
    /// Administratively closed; irreversible.
    Archived,
}

impl TimesheetStatus {
    /// Whether hours, rate, and description may still be edited.
    ///
    /// A rejected timesheet re-enters draft semantics for edit purposes.
    pub fn is_editable(self) -> bool {
        matches!(self, TimesheetStatus::Draft | TimesheetStatus::Rejected)
    }

    /// Apply a workflow action, returning the resulting status.
    ///
    /// Guard conditions that depend on the record contents (owner identity,
    /// non-empty reasons, positive hours) live in the service layer; this
    /// function decides graph legality only.
    pub fn apply(self, action: TimesheetAction) -> Result<TimesheetStatus, WorkflowViolation> {
        use TimesheetAction::*;
        use TimesheetStatus::*;

        let next = match (self, action) {
            (Draft, Submit) => Pending,
            // Resubmission after rejection goes straight back into the queue.
            (Rejected, Submit) => Pending,
            (Pending, BeginReview) => UnderReview,
            (Pending | UnderReview, Approve) => Approved,
            (Pending | UnderReview, Reject) => Rejected,
            (Approved, MarkPaid) => Paid,
            (Approved | Paid, Dispute) => Disputed,
            (Paid | Disputed, Archive) => Archived,
            (current, action) => return Err(WorkflowViolation { current, action }),
        };

        Ok(next)
    }
}

/// Actions that drive the timesheet workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimesheetAction {
    /// Owner submits the draft (or resubmits after rejection).
    Submit,
    /// Reviewer marks the entry as being looked at.
    BeginReview,
    /// Reviewer approves for payment.
    Approve,
    /// Reviewer sends it back with a reason.
    Reject,
    /// Payment processing confirms the payout.
    MarkPaid,
    /// Either party contests an approved or paid entry.
    Dispute,
    /// Administrative housekeeping once the entry is settled.
    Archive,
}

/// Error returned when a workflow action is not reachable from the current
/// status; names both so the caller can see what was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("workflow violation: {action:?} cannot be applied while in {current:?}")]
pub struct WorkflowViolation {
    /// Status the timesheet was in when the action was attempted.
    pub current: TimesheetStatus,
    /// The attempted action.
    pub action: TimesheetAction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use TimesheetAction::*;
    use TimesheetStatus::*;

    #[test]
    fn happy_path_to_paid() {
        let mut status = Draft;
        for (action, expected) in [
            (Submit, Pending),
            (BeginReview, UnderReview),
            (Approve, Approved),
            (MarkPaid, Paid),
            (Archive, Archived),
        ] {
            status = status.apply(action).unwrap();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn review_step_is_optional() {
        assert_eq!(Pending.apply(Approve), Ok(Approved));
        assert_eq!(Pending.apply(Reject), Ok(Rejected));
    }

    #[test]
    fn reject_then_resubmit() {
        let status = Draft.apply(Submit).unwrap();
        let status = status.apply(Reject).unwrap();
        assert_eq!(status, Rejected);
        assert!(status.is_editable());
        assert_eq!(status.apply(Submit), Ok(Pending));
    }

    #[test]
    fn draft_cannot_jump_to_paid() {
        let err = Draft.apply(MarkPaid).unwrap_err();
        assert_eq!(err.current, Draft);
        assert_eq!(err.action, MarkPaid);
    }

    #[test]
    fn dispute_only_after_approval() {
        assert!(Draft.apply(Dispute).is_err());
        assert!(Pending.apply(Dispute).is_err());
        assert_eq!(Approved.apply(Dispute), Ok(Disputed));
        assert_eq!(Paid.apply(Dispute), Ok(Disputed));
    }

    #[test]
    fn archive_is_terminal() {
        let archived = Paid.apply(Archive).unwrap();
        for action in [Submit, BeginReview, Approve, Reject, MarkPaid, Dispute, Archive] {
            assert!(archived.apply(action).is_err());
        }
    }

    #[test]
    fn editability_tracks_status() {
        assert!(Draft.is_editable());
        assert!(Rejected.is_editable());
        for status in [Pending, UnderReview, Approved, Paid, Disputed, Archived] {
            assert!(!status.is_editable());
        }
    }
}
