use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    dto::timesheets::{
        CreateTimesheetRequest, DisputeRequest, RejectRequest, TimesheetView,
        UpdateTimesheetRequest,
    },
    error::AppError,
    services::{export_service, timesheet_service},
    state::SharedState,
};

/// Routes driving the coach timesheet workflow.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/timesheets", post(create_timesheet).get(list_timesheets))
        .route("/timesheets/export", get(export_timesheets))
        .route(
            "/timesheets/{id}",
            get(get_timesheet).patch(update_timesheet),
        )
        .route("/timesheets/{id}/submit", post(submit_timesheet))
        .route("/timesheets/{id}/review", post(review_timesheet))
        .route("/timesheets/{id}/approve", post(approve_timesheet))
        .route("/timesheets/{id}/reject", post(reject_timesheet))
        .route("/timesheets/{id}/pay", post(pay_timesheet))
        .route("/timesheets/{id}/dispute", post(dispute_timesheet))
        .route("/timesheets/{id}/archive", post(archive_timesheet))
}

#[utoipa::path(
    post,
    path = "/timesheets",
    tag = "timesheets",
    request_body = CreateTimesheetRequest,
    responses((status = 200, description = "Draft created", body = TimesheetView))
)]
/// Create a new draft for the calling coach.
pub async fn create_timesheet(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Valid(Json(payload)): Valid<Json<CreateTimesheetRequest>>,
) -> Result<Json<TimesheetView>, AppError> {
    let sheet = timesheet_service::create(&state, &session, payload).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    get,
    path = "/timesheets",
    tag = "timesheets",
    responses((status = 200, description = "Timesheets visible to the caller", body = [TimesheetView]))
)]
/// List timesheets visible to the caller.
pub async fn list_timesheets(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<Vec<TimesheetView>>, AppError> {
    let sheets = timesheet_service::list(&state, &session).await?;
    Ok(Json(sheets))
}

#[utoipa::path(
    get,
    path = "/timesheets/export",
    tag = "timesheets",
    responses((status = 200, description = "CSV export of the caller-visible listing", content_type = "text/csv", body = String))
)]
/// Export the caller-visible listing as CSV. Read-only.
pub async fn export_timesheets(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
) -> Result<impl IntoResponse, AppError> {
    let sheets = timesheet_service::list(&state, &session).await?;
    let csv = export_service::timesheets_to_csv(&sheets);
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv))
}

#[utoipa::path(
    get,
    path = "/timesheets/{id}",
    tag = "timesheets",
    params(("id" = Uuid, Path, description = "Timesheet identifier")),
    responses(
        (status = 200, description = "Timesheet detail", body = TimesheetView),
        (status = 403, description = "Not the owner and not reviewing staff")
    )
)]
/// One timesheet.
pub async fn get_timesheet(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TimesheetView>, AppError> {
    let sheet = timesheet_service::get(&state, &session, id).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    patch,
    path = "/timesheets/{id}",
    tag = "timesheets",
    params(("id" = Uuid, Path, description = "Timesheet identifier")),
    request_body = UpdateTimesheetRequest,
    responses(
        (status = 200, description = "Draft updated, amount recomputed", body = TimesheetView),
        (status = 409, description = "No longer editable")
    )
)]
/// Edit hours, rate, or description while editable.
pub async fn update_timesheet(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<UpdateTimesheetRequest>>,
) -> Result<Json<TimesheetView>, AppError> {
    let sheet = timesheet_service::update(&state, &session, id, payload).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    post,
    path = "/timesheets/{id}/submit",
    tag = "timesheets",
    params(("id" = Uuid, Path, description = "Timesheet identifier")),
    responses(
        (status = 200, description = "Submitted for review", body = TimesheetView),
        (status = 409, description = "Not submittable from the current status")
    )
)]
/// Submit a draft, or resubmit after rejection.
pub async fn submit_timesheet(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TimesheetView>, AppError> {
    let sheet = timesheet_service::submit(&state, &session, id).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    post,
    path = "/timesheets/{id}/review",
    tag = "timesheets",
    params(("id" = Uuid, Path, description = "Timesheet identifier")),
    responses((status = 200, description = "Marked under review", body = TimesheetView))
)]
/// Reviewer takes the entry under review.
pub async fn review_timesheet(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TimesheetView>, AppError> {
    let sheet = timesheet_service::begin_review(&state, &session, id).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    post,
    path = "/timesheets/{id}/approve",
    tag = "timesheets",
    params(("id" = Uuid, Path, description = "Timesheet identifier")),
    responses((status = 200, description = "Approved for payment", body = TimesheetView))
)]
/// Approve for payment.
pub async fn approve_timesheet(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TimesheetView>, AppError> {
    let sheet = timesheet_service::approve(&state, &session, id).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    post,
    path = "/timesheets/{id}/reject",
    tag = "timesheets",
    params(("id" = Uuid, Path, description = "Timesheet identifier")),
    request_body = RejectRequest,
    responses((status = 200, description = "Sent back to the coach", body = TimesheetView))
)]
/// Reject with a reason; the entry becomes editable again.
pub async fn reject_timesheet(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<RejectRequest>>,
) -> Result<Json<TimesheetView>, AppError> {
    let sheet = timesheet_service::reject(&state, &session, id, payload).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    post,
    path = "/timesheets/{id}/pay",
    tag = "timesheets",
    params(("id" = Uuid, Path, description = "Timesheet identifier")),
    responses((status = 200, description = "Payout confirmed", body = TimesheetView))
)]
/// Mark an approved entry as paid.
pub async fn pay_timesheet(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TimesheetView>, AppError> {
    let sheet = timesheet_service::mark_paid(&state, &session, id).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    post,
    path = "/timesheets/{id}/dispute",
    tag = "timesheets",
    params(("id" = Uuid, Path, description = "Timesheet identifier")),
    request_body = DisputeRequest,
    responses((status = 200, description = "Entry flagged", body = TimesheetView))
)]
/// Either party contests an approved or paid entry.
pub async fn dispute_timesheet(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<DisputeRequest>>,
) -> Result<Json<TimesheetView>, AppError> {
    let sheet = timesheet_service::dispute(&state, &session, id, payload).await?;
    Ok(Json(sheet))
}

#[utoipa::path(
    post,
    path = "/timesheets/{id}/archive",
    tag = "timesheets",
    params(("id" = Uuid, Path, description = "Timesheet identifier")),
    responses((status = 200, description = "Entry archived", body = TimesheetView))
)]
/// Archive a settled entry.
pub async fn archive_timesheet(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TimesheetView>, AppError> {
    let sheet = timesheet_service::archive(&state, &session, id).await?;
    Ok(Json(sheet))
}
