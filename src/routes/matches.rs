use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    auth::CurrentUser,
    dao::models::TeamSide,
    dto::{
        matches::{
            CreateMatchRequest, LineupRequest, LineupView, LiveMatchSnapshot, MatchEventView,
            MatchSummary, RecordEventRequest, RecordResultRequest, StatusTransitionRequest,
            VoidEventRequest,
        },
        stats::{MatchStats, PlayerStats},
    },
    error::AppError,
    services::{match_service, stats_service},
    state::SharedState,
};

/// Routes handling the match lifecycle, events, lineups, and statistics.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/matches", post(create_match).get(list_matches))
        .route("/matches/{id}", get(get_match).delete(delete_match))
        .route("/matches/{id}/live", get(live_snapshot))
        .route("/matches/{id}/status", post(transition_status))
        .route("/matches/{id}/events", post(record_event))
        .route("/matches/{id}/events/{event_id}/void", post(void_event))
        .route("/matches/{id}/result", post(record_result))
        .route("/matches/{id}/result/approve", post(approve_result))
        .route("/matches/{id}/lineups/{side}", get(get_lineup).put(put_lineup))
        .route("/matches/{id}/stats", get(match_stats))
        .route("/players/{id}/stats", get(player_stats))
}

#[utoipa::path(
    post,
    path = "/matches",
    tag = "matches",
    request_body = CreateMatchRequest,
    responses(
        (status = 200, description = "Match scheduled", body = MatchSummary),
        (status = 403, description = "Caller may not schedule matches")
    )
)]
/// Schedule a new match.
pub async fn create_match(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Valid(Json(payload)): Valid<Json<CreateMatchRequest>>,
) -> Result<Json<MatchSummary>, AppError> {
    let summary = match_service::create_match(&state, &session, payload).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/matches",
    tag = "matches",
    responses((status = 200, description = "Matches ordered by kickoff", body = [MatchSummary]))
)]
/// List matches. Soft-deleted fixtures are hidden.
pub async fn list_matches(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    let matches = match_service::list_matches(&state).await?;
    Ok(Json(matches))
}

#[utoipa::path(
    get,
    path = "/matches/{id}",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses(
        (status = 200, description = "Match detail", body = MatchSummary),
        (status = 404, description = "Unknown or deleted match")
    )
)]
/// Detail view of one match.
pub async fn get_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchSummary>, AppError> {
    let summary = match_service::get_match(&state, id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/matches/{id}/live",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses(
        (status = 200, description = "Full live snapshot", body = LiveMatchSnapshot),
        (status = 404, description = "Unknown or deleted match")
    )
)]
/// Full live snapshot: the poll target for live views.
pub async fn live_snapshot(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LiveMatchSnapshot>, AppError> {
    let snapshot = match_service::live_snapshot(&state, id).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    post,
    path = "/matches/{id}/status",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    request_body = StatusTransitionRequest,
    responses(
        (status = 200, description = "Status moved", body = MatchSummary),
        (status = 409, description = "Transition not legal from the current status")
    )
)]
/// Move a match along its lifecycle.
pub async fn transition_status(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusTransitionRequest>,
) -> Result<Json<MatchSummary>, AppError> {
    let summary =
        match_service::transition_status(&state, &session, id, payload.status).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/matches/{id}/events",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    request_body = RecordEventRequest,
    responses(
        (status = 200, description = "Event recorded", body = MatchEventView),
        (status = 409, description = "Match is not in progress")
    )
)]
/// Record an in-match event.
pub async fn record_event(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<RecordEventRequest>>,
) -> Result<Json<MatchEventView>, AppError> {
    let event = match_service::record_event(&state, &session, id, payload).await?;
    Ok(Json(event))
}

#[utoipa::path(
    post,
    path = "/matches/{id}/events/{event_id}/void",
    tag = "matches",
    params(
        ("id" = Uuid, Path, description = "Match identifier"),
        ("event_id" = Uuid, Path, description = "Event identifier")
    ),
    request_body = VoidEventRequest,
    responses(
        (status = 200, description = "Event struck from the record", body = MatchEventView),
        (status = 404, description = "Unknown event")
    )
)]
/// Soft-void a recorded event.
pub async fn void_event(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path((id, event_id)): Path<(Uuid, Uuid)>,
    Valid(Json(payload)): Valid<Json<VoidEventRequest>>,
) -> Result<Json<MatchEventView>, AppError> {
    let event = match_service::void_event(&state, &session, id, event_id, payload).await?;
    Ok(Json(event))
}

#[utoipa::path(
    post,
    path = "/matches/{id}/result",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    request_body = RecordResultRequest,
    responses(
        (status = 200, description = "Result recorded, approval pending", body = MatchSummary),
        (status = 409, description = "Match has not reached a scoring phase")
    )
)]
/// Record a final or corrected result.
pub async fn record_result(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordResultRequest>,
) -> Result<Json<MatchSummary>, AppError> {
    let summary = match_service::record_result(&state, &session, id, payload).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/matches/{id}/result/approve",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses(
        (status = 200, description = "Result approved", body = MatchSummary),
        (status = 409, description = "No pending result")
    )
)]
/// Sign off a recorded result.
pub async fn approve_result(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchSummary>, AppError> {
    let summary = match_service::approve_result(&state, &session, id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    delete,
    path = "/matches/{id}",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses(
        (status = 204, description = "Match soft-deleted"),
        (status = 404, description = "Unknown or already deleted match")
    )
)]
/// Soft-delete a match.
pub async fn delete_match(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<axum::http::StatusCode, AppError> {
    match_service::delete_match(&state, &session, id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/matches/{id}/lineups/{side}",
    tag = "matches",
    params(
        ("id" = Uuid, Path, description = "Match identifier"),
        ("side" = TeamSide, Path, description = "home or away")
    ),
    responses(
        (status = 200, description = "Lineup for the side", body = LineupView),
        (status = 404, description = "No lineup submitted yet")
    )
)]
/// Lineup for one side of a match.
pub async fn get_lineup(
    State(state): State<SharedState>,
    Path((id, side)): Path<(Uuid, TeamSide)>,
) -> Result<Json<LineupView>, AppError> {
    let lineup = match_service::get_lineup(&state, id, side).await?;
    Ok(Json(lineup))
}

#[utoipa::path(
    put,
    path = "/matches/{id}/lineups/{side}",
    tag = "matches",
    params(
        ("id" = Uuid, Path, description = "Match identifier"),
        ("side" = TeamSide, Path, description = "home or away")
    ),
    request_body = LineupRequest,
    responses(
        (status = 200, description = "Lineup replaced", body = LineupView),
        (status = 409, description = "Lineups freeze once the match is under way")
    )
)]
/// Replace the lineup for one side.
pub async fn put_lineup(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
    Path((id, side)): Path<(Uuid, TeamSide)>,
    Valid(Json(payload)): Valid<Json<LineupRequest>>,
) -> Result<Json<LineupView>, AppError> {
    let lineup = match_service::put_lineup(&state, &session, id, side, payload).await?;
    Ok(Json(lineup))
}

#[utoipa::path(
    get,
    path = "/matches/{id}/stats",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Match identifier")),
    responses((status = 200, description = "Per-player lines for the match", body = MatchStats))
)]
/// Per-player statistics for one match.
pub async fn match_stats(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchStats>, AppError> {
    let stats = stats_service::match_stats(&state, id).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/players/{id}/stats",
    tag = "matches",
    params(("id" = Uuid, Path, description = "Player identifier")),
    responses((status = 200, description = "Career line for the player", body = PlayerStats))
)]
/// Career statistics for one player.
pub async fn player_stats(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlayerStats>, AppError> {
    let stats = stats_service::player_stats(&state, id).await?;
    Ok(Json(stats))
}
