use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for PitchConnect Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::auth::me,
        crate::routes::auth::logout,
        crate::routes::matches::create_match,
        crate::routes::matches::list_matches,
        crate::routes::matches::get_match,
        crate::routes::matches::live_snapshot,
        crate::routes::matches::transition_status,
        crate::routes::matches::record_event,
        crate::routes::matches::void_event,
        crate::routes::matches::record_result,
        crate::routes::matches::approve_result,
        crate::routes::matches::delete_match,
        crate::routes::matches::get_lineup,
        crate::routes::matches::put_lineup,
        crate::routes::matches::match_stats,
        crate::routes::matches::player_stats,
        crate::routes::timesheets::create_timesheet,
        crate::routes::timesheets::list_timesheets,
        crate::routes::timesheets::get_timesheet,
        crate::routes::timesheets::update_timesheet,
        crate::routes::timesheets::submit_timesheet,
        crate::routes::timesheets::review_timesheet,
        crate::routes::timesheets::approve_timesheet,
        crate::routes::timesheets::reject_timesheet,
        crate::routes::timesheets::pay_timesheet,
        crate::routes::timesheets::dispute_timesheet,
        crate::routes::timesheets::archive_timesheet,
        crate::routes::timesheets::export_timesheets,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::users::MeResponse,
            crate::dto::users::LogoutResponse,
            crate::dto::matches::CreateMatchRequest,
            crate::dto::matches::StatusTransitionRequest,
            crate::dto::matches::RecordEventRequest,
            crate::dto::matches::VoidEventRequest,
            crate::dto::matches::RecordResultRequest,
            crate::dto::matches::LineupRequest,
            crate::dto::matches::LineupSlotInput,
            crate::dto::matches::LineupSlotView,
            crate::dto::matches::MatchSummary,
            crate::dto::matches::MatchEventView,
            crate::dto::matches::LiveMatchSnapshot,
            crate::dto::matches::LineupView,
            crate::dto::stats::PlayerStats,
            crate::dto::stats::MatchStats,
            crate::dto::timesheets::CreateTimesheetRequest,
            crate::dto::timesheets::UpdateTimesheetRequest,
            crate::dto::timesheets::RejectRequest,
            crate::dto::timesheets::DisputeRequest,
            crate::dto::timesheets::TimesheetView,
            crate::state::match_machine::MatchStatus,
            crate::state::timesheet_machine::TimesheetStatus,
            crate::auth::roles::RoleTag,
            crate::dao::models::Sport,
            crate::dao::models::TeamSide,
            crate::dao::models::MatchEventKind,
            crate::dao::models::ResultApproval,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Session resolution"),
        (name = "matches", description = "Match lifecycle, events, and live snapshots"),
        (name = "timesheets", description = "Coach timesheet approval workflow"),
    )
)]
pub struct ApiDoc;
