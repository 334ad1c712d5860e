use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Aggregated statistics for one player.
///
/// Derived purely from non-voided events; there is no stored counter to
/// drift out of sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlayerStats {
    /// Player the line belongs to.
    pub player_id: Uuid,
    /// Goals scored, penalties included.
    pub goals: u32,
    /// Own goals conceded.
    pub own_goals: u32,
    /// Assists provided.
    pub assists: u32,
    /// Cautions received.
    pub yellow_cards: u32,
    /// Sendings off received.
    pub red_cards: u32,
}

impl PlayerStats {
    /// Empty line for a player.
    pub fn new(player_id: Uuid) -> Self {
        Self {
            player_id,
            ..Self::default()
        }
    }
}

/// Per-player statistics for one match.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchStats {
    /// Match the lines are aggregated over.
    pub match_id: Uuid,
    /// One line per player that features in the event log.
    pub players: Vec<PlayerStats>,
}
