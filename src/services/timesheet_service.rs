use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        permissions::{TIMESHEETS_ARCHIVE, TIMESHEETS_PAY, TIMESHEETS_REVIEW, TIMESHEETS_WRITE},
        session::AuthSession,
    },
    dao::models::TimesheetRecord,
    dto::timesheets::{
        CreateTimesheetRequest, DisputeRequest, RejectRequest, TimesheetView,
        UpdateTimesheetRequest,
    },
    error::ServiceError,
    services::authorize,
    state::{SharedState, timesheet_machine::{TimesheetAction, TimesheetStatus}},
};

/// Create a new draft for the calling coach.
pub async fn create(
    state: &SharedState,
    session: &AuthSession,
    request: CreateTimesheetRequest,
) -> Result<TimesheetView, ServiceError> {
    authorize(state, Some(session), TIMESHEETS_WRITE, "timesheets.create")?;

    let now = OffsetDateTime::now_utc();
    let mut record = TimesheetRecord {
        id: Uuid::new_v4(),
        coach_id: session.user_id,
        status: TimesheetStatus::Draft,
        total_minutes: hours_to_minutes(request.total_hours),
        hourly_rate_cents: request.hourly_rate_cents,
        total_amount_cents: 0,
        linked_session_id: request.linked_session_id,
        description: request.description,
        attachments: request.attachments,
        approved_by: None,
        approved_at: None,
        paid_at: None,
        rejection_reason: None,
        dispute_reason: None,
        created_at: now,
        updated_at: now,
    };
    record.recompute_amount();

    state.store().save_timesheet(record.clone()).await?;
    Ok(record.into())
}

/// Edit hours, rate, or description. Only the owner, and only while the
/// status keeps the record editable; the amount is recomputed on the spot.
pub async fn update(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
    request: UpdateTimesheetRequest,
) -> Result<TimesheetView, ServiceError> {
    authorize(state, Some(session), TIMESHEETS_WRITE, "timesheets.update")?;

    let mut record = fetch_owned(state, session, id, "timesheets.update").await?;
    if !record.status.is_editable() {
        return Err(ServiceError::InvalidState(format!(
            "workflow violation: a timesheet in {:?} is no longer editable",
            record.status
        )));
    }

    if let Some(hours) = request.total_hours {
        record.total_minutes = hours_to_minutes(hours);
    }
    if let Some(rate) = request.hourly_rate_cents {
        record.hourly_rate_cents = rate;
    }
    if let Some(description) = request.description {
        record.description = Some(description);
    }
    record.recompute_amount();
    record.updated_at = OffsetDateTime::now_utc();

    state.store().save_timesheet(record.clone()).await?;
    Ok(record.into())
}

/// Submit a draft, or resubmit after rejection (clearing the reason).
pub async fn submit(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
) -> Result<TimesheetView, ServiceError> {
    authorize(state, Some(session), TIMESHEETS_WRITE, "timesheets.submit")?;

    let mut record = fetch_owned(state, session, id, "timesheets.submit").await?;
    if record.total_minutes == 0 {
        return Err(ServiceError::InvalidInput(
            "cannot submit a timesheet with no hours".into(),
        ));
    }
    let described = record.linked_session_id.is_some()
        || record
            .description
            .as_deref()
            .is_some_and(|text| !text.trim().is_empty());
    if !described {
        return Err(ServiceError::InvalidInput(
            "a timesheet needs a linked session or a description".into(),
        ));
    }

    record.status = record.status.apply(TimesheetAction::Submit)?;
    record.rejection_reason = None;
    record.updated_at = OffsetDateTime::now_utc();

    state.store().save_timesheet(record.clone()).await?;
    state
        .audit()
        .applied(session.user_id, "timesheets.submit", id, "submitted");
    Ok(record.into())
}

/// Reviewer takes the entry under review. Optional step.
pub async fn begin_review(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
) -> Result<TimesheetView, ServiceError> {
    authorize(state, Some(session), TIMESHEETS_REVIEW, "timesheets.review")?;

    let mut record = fetch(state, id).await?;
    record.status = record.status.apply(TimesheetAction::BeginReview)?;
    record.updated_at = OffsetDateTime::now_utc();

    state.store().save_timesheet(record.clone()).await?;
    Ok(record.into())
}

/// Approve for payment, stamping the approver.
pub async fn approve(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
) -> Result<TimesheetView, ServiceError> {
    authorize(state, Some(session), TIMESHEETS_REVIEW, "timesheets.approve")?;

    let mut record = fetch(state, id).await?;
    record.status = record.status.apply(TimesheetAction::Approve)?;
    let now = OffsetDateTime::now_utc();
    record.approved_by = Some(session.user_id);
    record.approved_at = Some(now);
    record.updated_at = now;

    state.store().save_timesheet(record.clone()).await?;
    state
        .audit()
        .applied(session.user_id, "timesheets.approve", id, "approved");
    Ok(record.into())
}

/// Send the entry back with a reason; it becomes editable again.
pub async fn reject(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
    request: RejectRequest,
) -> Result<TimesheetView, ServiceError> {
    authorize(state, Some(session), TIMESHEETS_REVIEW, "timesheets.reject")?;

    let mut record = fetch(state, id).await?;
    record.status = record.status.apply(TimesheetAction::Reject)?;
    record.rejection_reason = Some(request.reason);
    record.updated_at = OffsetDateTime::now_utc();

    state.store().save_timesheet(record.clone()).await?;
    state
        .audit()
        .applied(session.user_id, "timesheets.reject", id, "rejected");
    Ok(record.into())
}

/// Payment processing confirms the payout.
pub async fn mark_paid(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
) -> Result<TimesheetView, ServiceError> {
    authorize(state, Some(session), TIMESHEETS_PAY, "timesheets.pay")?;

    let mut record = fetch(state, id).await?;
    record.status = record.status.apply(TimesheetAction::MarkPaid)?;
    let now = OffsetDateTime::now_utc();
    record.paid_at = Some(now);
    record.updated_at = now;

    state.store().save_timesheet(record.clone()).await?;
    state
        .audit()
        .applied(session.user_id, "timesheets.pay", id, "paid");
    Ok(record.into())
}

/// Either party contests an approved or paid entry.
pub async fn dispute(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
    request: DisputeRequest,
) -> Result<TimesheetView, ServiceError> {
    let mut record = fetch(state, id).await?;

    let is_owner = record.coach_id == session.user_id;
    if !is_owner && !session.has_permission(TIMESHEETS_REVIEW) {
        state
            .audit()
            .denial(Some(session.user_id), "timesheets.dispute", "owner-or-reviewer");
        return Err(ServiceError::Forbidden);
    }

    record.status = record.status.apply(TimesheetAction::Dispute)?;
    record.dispute_reason = Some(request.reason);
    record.updated_at = OffsetDateTime::now_utc();

    state.store().save_timesheet(record.clone()).await?;
    state
        .audit()
        .applied(session.user_id, "timesheets.dispute", id, "disputed");
    Ok(record.into())
}

/// Administrative housekeeping once the entry is settled.
pub async fn archive(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
) -> Result<TimesheetView, ServiceError> {
    authorize(state, Some(session), TIMESHEETS_ARCHIVE, "timesheets.archive")?;

    let mut record = fetch(state, id).await?;
    record.status = record.status.apply(TimesheetAction::Archive)?;
    record.updated_at = OffsetDateTime::now_utc();

    state.store().save_timesheet(record.clone()).await?;
    Ok(record.into())
}

/// One timesheet, visible to its owner and to reviewing staff.
pub async fn get(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
) -> Result<TimesheetView, ServiceError> {
    let record = fetch(state, id).await?;
    if record.coach_id != session.user_id && !can_see_all(session) {
        state
            .audit()
            .denial(Some(session.user_id), "timesheets.get", "owner-or-staff");
        return Err(ServiceError::Forbidden);
    }
    Ok(record.into())
}

/// Timesheets visible to the caller: all of them for reviewing staff, own
/// entries otherwise.
pub async fn list(
    state: &SharedState,
    session: &AuthSession,
) -> Result<Vec<TimesheetView>, ServiceError> {
    let sheets = state.store().list_timesheets().await?;
    let visible = sheets
        .into_iter()
        .filter(|record| can_see_all(session) || record.coach_id == session.user_id)
        .map(Into::into)
        .collect();
    Ok(visible)
}

fn can_see_all(session: &AuthSession) -> bool {
    session.has_permission(TIMESHEETS_REVIEW)
        || session.has_permission(TIMESHEETS_PAY)
        || session.has_permission(TIMESHEETS_ARCHIVE)
}

/// Whole hours arrive as decimals; storage is whole minutes.
fn hours_to_minutes(hours: f64) -> u32 {
    (hours * 60.0).round() as u32
}

async fn fetch(state: &SharedState, id: Uuid) -> Result<TimesheetRecord, ServiceError> {
    state
        .store()
        .find_timesheet(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("timesheet `{id}` not found")))
}

/// Fetch and enforce ownership for owner-only actions.
async fn fetch_owned(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
    action: &'static str,
) -> Result<TimesheetRecord, ServiceError> {
    let record = fetch(state, id).await?;
    if record.coach_id != session.user_id && !session.is_effective_superadmin() {
        state.audit().denial(Some(session.user_id), action, "owner");
        return Err(ServiceError::Forbidden);
    }
    Ok(record)
}
