use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::{
        permissions::{EVENTS_WRITE, LINEUPS_WRITE, MATCHES_DELETE, MATCHES_WRITE, RESULTS_APPROVE, RESULTS_WRITE},
        session::AuthSession,
    },
    dao::models::{
        LineupRecord, LineupSlot, MatchEventKind, MatchEventRecord, MatchRecord, ResultApproval,
        TeamSide,
    },
    dto::matches::{
        CreateMatchRequest, LineupRequest, LineupView, LiveMatchSnapshot, MatchEventView,
        MatchSummary, RecordEventRequest, RecordResultRequest, VoidEventRequest,
    },
    error::ServiceError,
    services::authorize,
    state::{SharedState, clock, match_machine::MatchStatus},
};

/// Schedule a new match.
pub async fn create_match(
    state: &SharedState,
    session: &AuthSession,
    request: CreateMatchRequest,
) -> Result<MatchSummary, ServiceError> {
    authorize(state, Some(session), MATCHES_WRITE, "matches.create")?;

    let now = OffsetDateTime::now_utc();
    let record = MatchRecord {
        id: Uuid::new_v4(),
        sport: request.sport,
        status: MatchStatus::Scheduled,
        kickoff: request.kickoff,
        home_team_id: request.home_team_id,
        away_team_id: request.away_team_id,
        home_score: None,
        away_score: None,
        halftime_home: None,
        halftime_away: None,
        venue: request.venue,
        broadcast: request.broadcast,
        broadcast_url: request.broadcast_url,
        competition_id: request.competition_id,
        friendly: request.friendly,
        result_approval: ResultApproval::NotSubmitted,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };

    state.store().save_match(record.clone()).await?;
    state
        .audit()
        .applied(session.user_id, "matches.create", record.id, "scheduled");

    Ok(record.into())
}

/// All matches visible in listings (soft-deleted hidden), ordered by kickoff.
pub async fn list_matches(state: &SharedState) -> Result<Vec<MatchSummary>, ServiceError> {
    let matches = state.store().list_matches().await?;
    Ok(matches
        .into_iter()
        .filter(|record| record.deleted_at.is_none())
        .map(Into::into)
        .collect())
}

/// Detail view of one match.
pub async fn get_match(state: &SharedState, id: Uuid) -> Result<MatchSummary, ServiceError> {
    Ok(fetch_match(state, id).await?.into())
}

/// Full live snapshot: status, scores, derived minute, and the event log.
///
/// This is the authoritative poll target; every response carries the whole
/// state so clients replace rather than merge.
pub async fn live_snapshot(
    state: &SharedState,
    id: Uuid,
) -> Result<LiveMatchSnapshot, ServiceError> {
    let record = fetch_match(state, id).await?;
    let events = state.store().list_events(id).await?;
    Ok(LiveMatchSnapshot::project(
        record,
        events,
        OffsetDateTime::now_utc(),
    ))
}

/// Move a match along its lifecycle.
pub async fn transition_status(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
    to: MatchStatus,
) -> Result<MatchSummary, ServiceError> {
    authorize(state, Some(session), MATCHES_WRITE, "matches.transition")?;

    let mut record = fetch_match(state, id).await?;
    let from = record.status;
    record.status = from.transition(to)?;

    // Scores materialize at 0-0 the first time the match goes in progress.
    if record.status.is_live() && record.home_score.is_none() {
        record.home_score = Some(0);
        record.away_score = Some(0);
    }

    record.updated_at = OffsetDateTime::now_utc();
    state.store().save_match(record.clone()).await?;
    state.audit().applied(
        session.user_id,
        "matches.transition",
        id,
        &format!("{from:?} -> {to:?}"),
    );

    Ok(record.into())
}

/// Record an in-match event. Only while the match is in progress, and only
/// with a minute inside the clock envelope of the current status.
pub async fn record_event(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
    request: RecordEventRequest,
) -> Result<MatchEventView, ServiceError> {
    authorize(state, Some(session), EVENTS_WRITE, "events.record")?;

    let mut record = fetch_match(state, id).await?;
    if !record.status.is_live() {
        return Err(ServiceError::InvalidState(format!(
            "events can only be recorded while the match is in progress (status {:?})",
            record.status
        )));
    }

    if let Some((low, high)) = clock::envelope(record.status) {
        if request.minute < low || request.minute > high {
            return Err(ServiceError::InvalidInput(format!(
                "minute {} is outside the {:?} envelope {}..={}",
                request.minute, record.status, low, high
            )));
        }
    }

    let event = MatchEventRecord {
        id: Uuid::new_v4(),
        match_id: id,
        kind: request.kind,
        minute: request.minute,
        injury_minute: request.injury_minute,
        side: request.side,
        player_id: request.player_id,
        related_player_id: request.related_player_id,
        note: request.note,
        voided: false,
        recorded_at: OffsetDateTime::now_utc(),
    };
    state.store().append_event(event.clone()).await?;

    if is_scoring(event.kind) {
        let events = state.store().list_events(id).await?;
        apply_derived_scores(&mut record, &events);
        record.updated_at = OffsetDateTime::now_utc();
        state.store().save_match(record).await?;
    }

    state
        .audit()
        .applied(session.user_id, "events.record", id, "event appended");

    Ok(event.into())
}

/// Strike an event from the record without deleting it.
///
/// While the match is in progress this is part of normal event keeping; once
/// finished it is a correction and additionally requires result-approval
/// standing.
pub async fn void_event(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
    event_id: Uuid,
    request: VoidEventRequest,
) -> Result<MatchEventView, ServiceError> {
    authorize(state, Some(session), EVENTS_WRITE, "events.void")?;

    let mut record = fetch_match(state, id).await?;
    if record.status.is_finished() {
        authorize(state, Some(session), RESULTS_APPROVE, "events.void")?;
    } else if !record.status.is_live() {
        return Err(ServiceError::InvalidState(format!(
            "events cannot be voided while the match is {:?}",
            record.status
        )));
    }

    let events = state.store().list_events(id).await?;
    let mut event = events
        .iter()
        .find(|event| event.id == event_id)
        .cloned()
        .ok_or_else(|| ServiceError::NotFound(format!("event `{event_id}` not found")))?;
    if event.voided {
        return Err(ServiceError::InvalidState(format!(
            "event `{event_id}` is already voided"
        )));
    }

    event.voided = true;
    event.note = Some(match event.note.take() {
        Some(existing) => format!("{existing}; voided: {}", request.note),
        None => format!("voided: {}", request.note),
    });
    state.store().update_event(event.clone()).await?;

    // Live scores are derived from the event log, so they follow the void.
    // A finished match keeps its recorded result; corrections go through the
    // result-approval path.
    if record.status.is_live() && is_scoring(event.kind) {
        let events = state.store().list_events(id).await?;
        apply_derived_scores(&mut record, &events);
        record.updated_at = OffsetDateTime::now_utc();
        state.store().save_match(record).await?;
    }

    state
        .audit()
        .applied(session.user_id, "events.void", id, "event voided");

    Ok(event.into())
}

/// Record the result. Puts the result-approval state at PENDING.
pub async fn record_result(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
    request: RecordResultRequest,
) -> Result<MatchSummary, ServiceError> {
    authorize(state, Some(session), RESULTS_WRITE, "results.record")?;

    let mut record = fetch_match(state, id).await?;
    if !record.status.is_live() && !record.status.is_finished() {
        return Err(ServiceError::InvalidState(format!(
            "a result can only be recorded during or after the match (status {:?})",
            record.status
        )));
    }

    record.home_score = Some(request.home_score);
    record.away_score = Some(request.away_score);
    record.halftime_home = request.halftime_home;
    record.halftime_away = request.halftime_away;
    record.result_approval = ResultApproval::Pending;
    record.updated_at = OffsetDateTime::now_utc();
    state.store().save_match(record.clone()).await?;
    state.audit().applied(
        session.user_id,
        "results.record",
        id,
        &format!("{}-{}", request.home_score, request.away_score),
    );

    Ok(record.into())
}

/// Sign off a recorded result.
pub async fn approve_result(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
) -> Result<MatchSummary, ServiceError> {
    authorize(state, Some(session), RESULTS_APPROVE, "results.approve")?;

    let mut record = fetch_match(state, id).await?;
    if record.result_approval != ResultApproval::Pending {
        return Err(ServiceError::InvalidState(format!(
            "no pending result to approve (approval state {:?})",
            record.result_approval
        )));
    }

    record.result_approval = ResultApproval::Approved;
    record.updated_at = OffsetDateTime::now_utc();
    state.store().save_match(record.clone()).await?;
    state
        .audit()
        .applied(session.user_id, "results.approve", id, "result approved");

    Ok(record.into())
}

/// Soft-delete a match. The record stays in the store, hidden from listings.
pub async fn delete_match(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
) -> Result<(), ServiceError> {
    authorize(state, Some(session), MATCHES_DELETE, "matches.delete")?;

    let mut record = fetch_match(state, id).await?;
    let now = OffsetDateTime::now_utc();
    record.deleted_at = Some(now);
    record.updated_at = now;
    state.store().save_match(record).await?;
    state
        .audit()
        .applied(session.user_id, "matches.delete", id, "soft-deleted");

    Ok(())
}

/// Lineup for one side of a match.
pub async fn get_lineup(
    state: &SharedState,
    id: Uuid,
    side: TeamSide,
) -> Result<LineupView, ServiceError> {
    fetch_match(state, id).await?;
    let lineup = state
        .store()
        .find_lineup(id, side)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("no {side:?} lineup for match `{id}`")))?;
    Ok(lineup.into())
}

/// Replace the lineup for one side. Lineups freeze at kickoff.
pub async fn put_lineup(
    state: &SharedState,
    session: &AuthSession,
    id: Uuid,
    side: TeamSide,
    request: LineupRequest,
) -> Result<LineupView, ServiceError> {
    authorize(state, Some(session), LINEUPS_WRITE, "lineups.put")?;

    let record = fetch_match(state, id).await?;
    if !record.status.is_pending() {
        return Err(ServiceError::InvalidState(format!(
            "lineups freeze once the match is under way (status {:?})",
            record.status
        )));
    }

    let mut slots = indexmap::IndexMap::with_capacity(request.slots.len());
    let mut shirts = std::collections::HashSet::with_capacity(request.slots.len());
    for input in request.slots {
        if !shirts.insert(input.shirt_number) {
            return Err(ServiceError::InvalidInput(format!(
                "shirt number {} used twice",
                input.shirt_number
            )));
        }
        let replaced = slots.insert(
            input.player_id,
            LineupSlot {
                shirt_number: input.shirt_number,
                position: input.position,
                starting: input.starting,
            },
        );
        if replaced.is_some() {
            return Err(ServiceError::InvalidInput(format!(
                "player `{}` listed twice",
                input.player_id
            )));
        }
    }

    let lineup = LineupRecord {
        match_id: id,
        side,
        slots,
    };
    state.store().save_lineup(lineup.clone()).await?;
    state
        .audit()
        .applied(session.user_id, "lineups.put", id, "lineup replaced");

    Ok(lineup.into())
}

/// Look up a match, treating soft-deleted ones as absent.
async fn fetch_match(state: &SharedState, id: Uuid) -> Result<MatchRecord, ServiceError> {
    state
        .store()
        .find_match(id)
        .await?
        .filter(|record| record.deleted_at.is_none())
        .ok_or_else(|| ServiceError::NotFound(format!("match `{id}` not found")))
}

fn is_scoring(kind: MatchEventKind) -> bool {
    matches!(
        kind,
        MatchEventKind::Goal | MatchEventKind::OwnGoal | MatchEventKind::PenaltyGoal
    )
}

/// Re-derive the live scoreline from the non-voided event log.
fn apply_derived_scores(record: &mut MatchRecord, events: &[MatchEventRecord]) {
    let mut home = 0u16;
    let mut away = 0u16;
    for event in events.iter().filter(|event| !event.voided) {
        let scoring_side = match event.kind {
            MatchEventKind::Goal | MatchEventKind::PenaltyGoal => event.side,
            // An own goal counts for the opposition.
            MatchEventKind::OwnGoal => match event.side {
                TeamSide::Home => TeamSide::Away,
                TeamSide::Away => TeamSide::Home,
            },
            _ => continue,
        };
        match scoring_side {
            TeamSide::Home => home += 1,
            TeamSide::Away => away += 1,
        }
    }
    record.home_score = Some(home);
    record.away_score = Some(away);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: MatchEventKind, side: TeamSide, voided: bool) -> MatchEventRecord {
        MatchEventRecord {
            id: Uuid::new_v4(),
            match_id: Uuid::new_v4(),
            kind,
            minute: 10,
            injury_minute: None,
            side,
            player_id: Uuid::new_v4(),
            related_player_id: None,
            note: None,
            voided,
            recorded_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn blank_match() -> MatchRecord {
        MatchRecord {
            id: Uuid::new_v4(),
            sport: crate::dao::models::Sport::Football,
            status: MatchStatus::Live,
            kickoff: OffsetDateTime::UNIX_EPOCH,
            home_team_id: Uuid::new_v4(),
            away_team_id: Uuid::new_v4(),
            home_score: None,
            away_score: None,
            halftime_home: None,
            halftime_away: None,
            venue: None,
            broadcast: false,
            broadcast_url: None,
            competition_id: None,
            friendly: true,
            result_approval: ResultApproval::NotSubmitted,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
            deleted_at: None,
        }
    }

    #[test]
    fn derived_scores_skip_voided_and_flip_own_goals() {
        let mut record = blank_match();
        let events = vec![
            event(MatchEventKind::Goal, TeamSide::Home, false),
            event(MatchEventKind::PenaltyGoal, TeamSide::Away, false),
            event(MatchEventKind::OwnGoal, TeamSide::Away, false),
            event(MatchEventKind::Goal, TeamSide::Away, true),
            event(MatchEventKind::YellowCard, TeamSide::Home, false),
        ];

        apply_derived_scores(&mut record, &events);
        assert_eq!(record.home_score, Some(2));
        assert_eq!(record.away_score, Some(1));
    }
}
