use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    dao::models::{
        LineupRecord, MatchEventKind, MatchEventRecord, MatchRecord, ResultApproval, Sport,
        TeamSide,
    },
    dto::validation::validate_not_blank,
    state::{clock, match_machine::MatchStatus},
};

/// Payload used to schedule a new match.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[validate(schema(function = validate_competition_scope))]
pub struct CreateMatchRequest {
    /// Sport the fixture belongs to.
    pub sport: Sport,
    /// Official kickoff time.
    #[serde(with = "time::serde::rfc3339")]
    pub kickoff: OffsetDateTime,
    /// Hosting team.
    pub home_team_id: Uuid,
    /// Visiting team.
    pub away_team_id: Uuid,
    /// Where the match is played.
    #[serde(default)]
    #[validate(length(max = 120))]
    pub venue: Option<String>,
    /// Whether the match is broadcast.
    #[serde(default)]
    pub broadcast: bool,
    /// Stream or channel URL when broadcast.
    #[serde(default)]
    #[validate(url)]
    pub broadcast_url: Option<String>,
    /// Competition the fixture belongs to.
    #[serde(default)]
    pub competition_id: Option<Uuid>,
    /// Standalone friendly outside any competition.
    #[serde(default)]
    pub friendly: bool,
}

/// Exactly one of competition id or the friendly flag must apply.
fn validate_competition_scope(request: &CreateMatchRequest) -> Result<(), ValidationError> {
    if request.competition_id.is_some() == request.friendly {
        let mut err = ValidationError::new("competition_scope");
        err.message =
            Some("a match belongs to a competition or is a friendly, never both or neither".into());
        return Err(err);
    }
    Ok(())
}

/// Requested status transition for a match.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusTransitionRequest {
    /// Status the match should move to.
    pub status: MatchStatus,
}

/// Payload recording an in-match event.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RecordEventRequest {
    /// What happened.
    pub kind: MatchEventKind,
    /// Base minute of the event.
    pub minute: u8,
    /// Added minute at a period boundary.
    #[serde(default)]
    pub injury_minute: Option<u8>,
    /// Side the event is attributed to.
    pub side: TeamSide,
    /// Principal player.
    pub player_id: Uuid,
    /// Assist provider or player coming off.
    #[serde(default)]
    pub related_player_id: Option<Uuid>,
    /// Free-text annotation.
    #[serde(default)]
    #[validate(length(max = 280))]
    pub note: Option<String>,
}

/// Payload soft-voiding a recorded event.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct VoidEventRequest {
    /// Why the event is struck; kept on the record.
    #[validate(custom(function = validate_not_blank), length(max = 280))]
    pub note: String,
}

/// Payload recording a final (or corrected) result.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordResultRequest {
    /// Full-time home score.
    pub home_score: u16,
    /// Full-time away score.
    pub away_score: u16,
    /// Home score at the break.
    #[serde(default)]
    pub halftime_home: Option<u16>,
    /// Away score at the break.
    #[serde(default)]
    pub halftime_away: Option<u16>,
}

/// One slot of a submitted lineup.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct LineupSlotInput {
    /// Player filling the slot.
    pub player_id: Uuid,
    /// Shirt number worn in this match.
    #[validate(range(min = 1, max = 99))]
    pub shirt_number: u8,
    /// Position label, sport-dependent.
    #[validate(custom(function = validate_not_blank), length(max = 32))]
    pub position: String,
    /// Whether the player starts.
    #[serde(default)]
    pub starting: bool,
}

/// Full lineup submission for one side.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LineupRequest {
    /// Slots in display order.
    #[validate(nested, length(min = 1, max = 30))]
    pub slots: Vec<LineupSlotInput>,
}

/// Match projection returned by listing and detail endpoints.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MatchSummary {
    /// Match identifier.
    pub id: Uuid,
    /// Sport the fixture belongs to.
    pub sport: Sport,
    /// Current lifecycle status.
    pub status: MatchStatus,
    /// Official kickoff time.
    #[serde(with = "time::serde::rfc3339")]
    pub kickoff: OffsetDateTime,
    /// Hosting team.
    pub home_team_id: Uuid,
    /// Visiting team.
    pub away_team_id: Uuid,
    /// Current home score, when the match has one.
    pub home_score: Option<u16>,
    /// Current away score, when the match has one.
    pub away_score: Option<u16>,
    /// Home score at the break.
    pub halftime_home: Option<u16>,
    /// Away score at the break.
    pub halftime_away: Option<u16>,
    /// Where the match is played.
    pub venue: Option<String>,
    /// Whether the match is broadcast.
    pub broadcast: bool,
    /// Stream or channel URL when broadcast.
    pub broadcast_url: Option<String>,
    /// Competition the fixture belongs to.
    pub competition_id: Option<Uuid>,
    /// Standalone friendly outside any competition.
    pub friendly: bool,
    /// Approval state of the recorded result.
    pub result_approval: ResultApproval,
}

impl From<MatchRecord> for MatchSummary {
    fn from(record: MatchRecord) -> Self {
        Self {
            id: record.id,
            sport: record.sport,
            status: record.status,
            kickoff: record.kickoff,
            home_team_id: record.home_team_id,
            away_team_id: record.away_team_id,
            home_score: record.home_score,
            away_score: record.away_score,
            halftime_home: record.halftime_home,
            halftime_away: record.halftime_away,
            venue: record.venue,
            broadcast: record.broadcast,
            broadcast_url: record.broadcast_url,
            competition_id: record.competition_id,
            friendly: record.friendly,
            result_approval: record.result_approval,
        }
    }
}

/// Public projection of a recorded event.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MatchEventView {
    /// Event identifier.
    pub id: Uuid,
    /// What happened.
    pub kind: MatchEventKind,
    /// Base minute of the event.
    pub minute: u8,
    /// Added minute at a period boundary.
    pub injury_minute: Option<u8>,
    /// Side the event is attributed to.
    pub side: TeamSide,
    /// Principal player.
    pub player_id: Uuid,
    /// Assist provider or player coming off.
    pub related_player_id: Option<Uuid>,
    /// Free-text annotation.
    pub note: Option<String>,
    /// Whether the event has been struck from the record.
    pub voided: bool,
}

impl From<MatchEventRecord> for MatchEventView {
    fn from(record: MatchEventRecord) -> Self {
        Self {
            id: record.id,
            kind: record.kind,
            minute: record.minute,
            injury_minute: record.injury_minute,
            side: record.side,
            player_id: record.player_id,
            related_player_id: record.related_player_id,
            note: record.note,
            voided: record.voided,
        }
    }
}

/// Full live snapshot of a match, the unit of polling synchronization.
///
/// Each poll response carries the whole state; clients replace their previous
/// snapshot rather than merging deltas.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LiveMatchSnapshot {
    /// Match identifier.
    pub match_id: Uuid,
    /// Current lifecycle status.
    pub status: MatchStatus,
    /// Official kickoff time.
    #[serde(with = "time::serde::rfc3339")]
    pub kickoff: OffsetDateTime,
    /// Current home score, when the match has one.
    pub home_score: Option<u16>,
    /// Current away score, when the match has one.
    pub away_score: Option<u16>,
    /// Derived display minute; absent outside the LIVE family.
    pub minute: Option<u8>,
    /// All events recorded so far, voided included.
    pub events: Vec<MatchEventView>,
}

impl LiveMatchSnapshot {
    /// Project a record and its events into a snapshot taken at `now`.
    pub fn project(record: MatchRecord, events: Vec<MatchEventRecord>, now: OffsetDateTime) -> Self {
        Self {
            match_id: record.id,
            status: record.status,
            kickoff: record.kickoff,
            home_score: record.home_score,
            away_score: record.away_score,
            minute: clock::display_minute(now, record.kickoff, record.status),
            events: events.into_iter().map(Into::into).collect(),
        }
    }
}

/// One slot of a lineup as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LineupSlotView {
    /// Player filling the slot.
    pub player_id: Uuid,
    /// Shirt number worn in this match.
    pub shirt_number: u8,
    /// Position label.
    pub position: String,
    /// Whether the player starts.
    pub starting: bool,
}

/// Lineup for one side of a match.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LineupView {
    /// Match the lineup belongs to.
    pub match_id: Uuid,
    /// Side it applies to.
    pub side: TeamSide,
    /// Slots in submission order.
    pub slots: Vec<LineupSlotView>,
}

impl From<LineupRecord> for LineupView {
    fn from(record: LineupRecord) -> Self {
        Self {
            match_id: record.match_id,
            side: record.side,
            slots: record
                .slots
                .into_iter()
                .map(|(player_id, slot)| LineupSlotView {
                    player_id,
                    shirt_number: slot.shirt_number,
                    position: slot.position,
                    starting: slot.starting,
                })
                .collect(),
        }
    }
}
