use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::TimesheetRecord,
    dto::validation::validate_not_blank,
    state::timesheet_machine::TimesheetStatus,
};

/// Payload creating a new draft timesheet.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTimesheetRequest {
    /// Hours worked, fractional hours allowed, at most one week.
    #[validate(range(min = 0.01, max = 168.0))]
    pub total_hours: f64,
    /// Hourly rate in cents.
    #[validate(range(min = 0))]
    pub hourly_rate_cents: i64,
    /// Coaching session this timesheet covers, when linked.
    #[serde(default)]
    pub linked_session_id: Option<Uuid>,
    /// Manual description when no session is linked.
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Opaque attachment references.
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Partial edit of a draft or rejected timesheet.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateTimesheetRequest {
    /// New hours figure, when changing.
    #[serde(default)]
    #[validate(range(min = 0.01, max = 168.0))]
    pub total_hours: Option<f64>,
    /// New hourly rate in cents, when changing.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub hourly_rate_cents: Option<i64>,
    /// New description, when changing.
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Reviewer's rejection, reason required.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RejectRequest {
    /// Why the timesheet is sent back.
    #[validate(custom(function = validate_not_blank), length(max = 500))]
    pub reason: String,
}

/// Dispute raised by either party, reason required.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct DisputeRequest {
    /// What is being contested.
    #[validate(custom(function = validate_not_blank), length(max = 500))]
    pub reason: String,
}

/// Timesheet projection returned to clients.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TimesheetView {
    /// Timesheet identifier.
    pub id: Uuid,
    /// Owning coach.
    pub coach_id: Uuid,
    /// Workflow status.
    pub status: TimesheetStatus,
    /// Hours worked as a decimal.
    pub total_hours: f64,
    /// Hourly rate in cents.
    pub hourly_rate_cents: i64,
    /// Derived amount in cents.
    pub total_amount_cents: i64,
    /// Linked coaching session, when any.
    pub linked_session_id: Option<Uuid>,
    /// Manual description, when any.
    pub description: Option<String>,
    /// Opaque attachment references.
    pub attachments: Vec<String>,
    /// Reviewer who approved.
    pub approved_by: Option<Uuid>,
    /// When it was approved.
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    /// When payment went out.
    #[serde(with = "time::serde::rfc3339::option")]
    pub paid_at: Option<OffsetDateTime>,
    /// Reviewer's reason, present while rejected.
    pub rejection_reason: Option<String>,
    /// Reason given when disputed.
    pub dispute_reason: Option<String>,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last mutation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<TimesheetRecord> for TimesheetView {
    fn from(record: TimesheetRecord) -> Self {
        let total_hours = record.total_hours();
        Self {
            id: record.id,
            coach_id: record.coach_id,
            status: record.status,
            total_hours,
            hourly_rate_cents: record.hourly_rate_cents,
            total_amount_cents: record.total_amount_cents,
            linked_session_id: record.linked_session_id,
            description: record.description,
            attachments: record.attachments,
            approved_by: record.approved_by,
            approved_at: record.approved_at,
            paid_at: record.paid_at,
            rejection_reason: record.rejection_reason,
            dispute_reason: record.dispute_reason,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
