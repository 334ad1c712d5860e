use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::roles::RoleTag,
    state::{match_machine::MatchStatus, timesheet_machine::TimesheetStatus},
};

/// Sports the platform schedules matches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sport {
    /// Association football.
    Football,
    /// Indoor five-a-side.
    Futsal,
    /// Field hockey.
    FieldHockey,
    /// Rugby union.
    Rugby,
    /// Basketball.
    Basketball,
    /// Handball.
    Handball,
}

/// Which side of the fixture a team, event, or lineup belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    /// The hosting team.
    Home,
    /// The visiting team.
    Away,
}

/// Discrete in-match occurrences that can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchEventKind {
    /// Goal from open play.
    Goal,
    /// Goal credited to the opposing side.
    OwnGoal,
    /// Converted penalty.
    PenaltyGoal,
    /// Caution.
    YellowCard,
    /// Sending off.
    RedCard,
    /// Player swap.
    Substitution,
    /// Stoppage for an injured player.
    Injury,
}

/// Approval state of a recorded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultApproval {
    /// No result recorded yet.
    NotSubmitted,
    /// Result recorded, awaiting approval.
    Pending,
    /// Result signed off.
    Approved,
}

/// A scheduled or in-progress contest as persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Primary key.
    pub id: Uuid,
    /// Sport this fixture belongs to.
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
    /// Null until the match first enters the LIVE family.
    pub home_score: Option<u16>,
    /// Null until the match first enters the LIVE family.
    pub away_score: Option<u16>,
    /// Score at the break, recorded with the result.
    pub halftime_home: Option<u16>,
    /// Score at the break, recorded with the result.
    pub halftime_away: Option<u16>,
    /// Where the match is played.
    pub venue: Option<String>,
    /// Whether the match is broadcast.
    pub broadcast: bool,
    /// Stream or channel URL when broadcast.
    pub broadcast_url: Option<String>,
    /// Competition the fixture belongs to; mutually exclusive with `friendly`.
    pub competition_id: Option<Uuid>,
    /// Standalone friendly outside any competition.
    pub friendly: bool,
    /// Approval state of the recorded result.
    pub result_approval: ResultApproval,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last mutation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Soft-delete marker; hidden from listings when set.
    #[serde(with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

/// An in-match occurrence. Append-only while live, soft-voided, never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEventRecord {
    /// Primary key.
    pub id: Uuid,
    /// Match the event belongs to.
    pub match_id: Uuid,
    /// What happened.
    pub kind: MatchEventKind,
    /// Base minute, within the clock envelope of the status at recording time.
    pub minute: u8,
    /// Added minute at a period boundary (45+3 is minute 45, injury 3).
    pub injury_minute: Option<u8>,
    /// Side the event is attributed to.
    pub side: TeamSide,
    /// Principal player.
    pub player_id: Uuid,
    /// Assist provider, player coming off, or other related player.
    pub related_player_id: Option<Uuid>,
    /// Free-text annotation; also carries the voiding note.
    pub note: Option<String>,
    /// Soft-void flag; voided events are excluded from scores and stats.
    pub voided: bool,
    /// When the event was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

/// One player's slot in a lineup. The player id is the map key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LineupSlot {
    /// Shirt number worn in this match.
    pub shirt_number: u8,
    /// Free-form position label ("GK", "pivot", ...), sport-dependent.
    pub position: String,
    /// Whether the player starts or sits on the bench.
    pub starting: bool,
}

/// Named lineup for one side of a match, ordered as entered by staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupRecord {
    /// Match the lineup belongs to.
    pub match_id: Uuid,
    /// Side it applies to.
    pub side: TeamSide,
    /// Slots keyed by player id, preserving submission order.
    pub slots: IndexMap<Uuid, LineupSlot>,
}

/// A coach's record of hours worked, flowing through the approval workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimesheetRecord {
    /// Primary key.
    pub id: Uuid,
    /// Owning coach.
    pub coach_id: Uuid,
    /// Workflow status.
    pub status: TimesheetStatus,
    /// Hours worked, stored as whole minutes so amounts stay exact.
    pub total_minutes: u32,
    /// Hourly rate in cents.
    pub hourly_rate_cents: i64,
    /// Derived `minutes x rate / 60`; recomputed on every edit, never set
    /// directly.
    pub total_amount_cents: i64,
    /// Coaching session this timesheet covers, when linked.
    pub linked_session_id: Option<Uuid>,
    /// Manual description when no session is linked.
    pub description: Option<String>,
    /// Opaque attachment references (receipts, session plans).
    pub attachments: Vec<String>,
    /// Reviewer who approved.
    pub approved_by: Option<Uuid>,
    /// When it was approved.
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    /// When payment went out.
    #[serde(with = "time::serde::rfc3339::option")]
    pub paid_at: Option<OffsetDateTime>,
    /// Reviewer's reason; cleared on resubmission.
    pub rejection_reason: Option<String>,
    /// Reason given when either party disputed.
    pub dispute_reason: Option<String>,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last mutation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TimesheetRecord {
    /// Recompute the derived amount from minutes and rate.
    ///
    /// Invariant: called on every hours or rate edit; the amount field is
    /// never writable on its own.
    pub fn recompute_amount(&mut self) {
        self.total_amount_cents = i64::from(self.total_minutes) * self.hourly_rate_cents / 60;
    }

    /// Hours worked as a decimal, for display and export.
    pub fn total_hours(&self) -> f64 {
        f64::from(self.total_minutes) / 60.0
    }
}

/// A platform account with its role tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Primary key.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Name shown across the platform.
    pub display_name: String,
    /// Role tags; an empty set behaves as plain PLAYER.
    pub roles: Vec<RoleTag>,
    /// Explicit super-admin override, independent of role tags.
    pub is_super_admin: bool,
    /// Club the account is scoped to, when any.
    pub club_id: Option<Uuid>,
    /// Team the account is scoped to, when any.
    pub team_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_recomputation_is_exact_for_quarter_hours() {
        let mut sheet = TimesheetRecord {
            id: Uuid::new_v4(),
            coach_id: Uuid::new_v4(),
            status: TimesheetStatus::Draft,
            total_minutes: 150,
            hourly_rate_cents: 2500,
            total_amount_cents: 0,
            linked_session_id: None,
            description: None,
            attachments: Vec::new(),
            approved_by: None,
            approved_at: None,
            paid_at: None,
            rejection_reason: None,
            dispute_reason: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };

        // 2.5 hours at 25.00 => 62.50.
        sheet.recompute_amount();
        assert_eq!(sheet.total_amount_cents, 6250);
        assert_eq!(sheet.total_hours(), 2.5);
    }
}
