use indexmap::IndexMap;
use uuid::Uuid;

use crate::{
    dao::models::{MatchEventKind, MatchEventRecord},
    dto::stats::{MatchStats, PlayerStats},
    error::ServiceError,
    state::SharedState,
};

/// Career statistics for one player, aggregated over every non-voided event.
pub async fn player_stats(
    state: &SharedState,
    player_id: Uuid,
) -> Result<PlayerStats, ServiceError> {
    let events = state.store().list_events_by_player(player_id).await?;
    let mut stats = PlayerStats::new(player_id);
    for event in events.iter().filter(|event| !event.voided) {
        tally(&mut stats, event);
    }
    Ok(stats)
}

/// Per-player statistics for one match, ordered by first appearance in the
/// event log.
pub async fn match_stats(state: &SharedState, match_id: Uuid) -> Result<MatchStats, ServiceError> {
    let record = state
        .store()
        .find_match(match_id)
        .await?
        .filter(|record| record.deleted_at.is_none())
        .ok_or_else(|| ServiceError::NotFound(format!("match `{match_id}` not found")))?;

    let events = state.store().list_events(record.id).await?;
    let mut lines: IndexMap<Uuid, PlayerStats> = IndexMap::new();
    for event in events.iter().filter(|event| !event.voided) {
        for player_id in [Some(event.player_id), event.related_player_id]
            .into_iter()
            .flatten()
        {
            let line = lines
                .entry(player_id)
                .or_insert_with(|| PlayerStats::new(player_id));
            tally_for(line, player_id, event);
        }
    }

    Ok(MatchStats {
        match_id: record.id,
        players: lines.into_values().collect(),
    })
}

fn tally(stats: &mut PlayerStats, event: &MatchEventRecord) {
    let player_id = stats.player_id;
    tally_for(stats, player_id, event);
}

/// Attribute one event to one player's line.
///
/// The principal scores or receives the card; the related player takes the
/// assist on goals.
fn tally_for(stats: &mut PlayerStats, player_id: Uuid, event: &MatchEventRecord) {
    let principal = event.player_id == player_id;
    let related = event.related_player_id == Some(player_id);

    match event.kind {
        MatchEventKind::Goal | MatchEventKind::PenaltyGoal => {
            if principal {
                stats.goals += 1;
            }
            if related {
                stats.assists += 1;
            }
        }
        MatchEventKind::OwnGoal => {
            if principal {
                stats.own_goals += 1;
            }
        }
        MatchEventKind::YellowCard => {
            if principal {
                stats.yellow_cards += 1;
            }
        }
        MatchEventKind::RedCard => {
            if principal {
                stats.red_cards += 1;
            }
        }
        MatchEventKind::Substitution | MatchEventKind::Injury => {}
    }
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::dao::models::TeamSide;

    fn event(
        kind: MatchEventKind,
        player_id: Uuid,
        related: Option<Uuid>,
        voided: bool,
    ) -> MatchEventRecord {
        MatchEventRecord {
            id: Uuid::new_v4(),
            match_id: Uuid::new_v4(),
            kind,
            minute: 30,
            injury_minute: None,
            side: TeamSide::Home,
            player_id,
            related_player_id: related,
            note: None,
            voided,
            recorded_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn scorer_and_assist_are_attributed_separately() {
        let scorer = Uuid::new_v4();
        let provider = Uuid::new_v4();
        let goal = event(MatchEventKind::Goal, scorer, Some(provider), false);

        let mut scorer_line = PlayerStats::new(scorer);
        tally(&mut scorer_line, &goal);
        assert_eq!(scorer_line.goals, 1);
        assert_eq!(scorer_line.assists, 0);

        let mut provider_line = PlayerStats::new(provider);
        tally(&mut provider_line, &goal);
        assert_eq!(provider_line.goals, 0);
        assert_eq!(provider_line.assists, 1);
    }

    #[test]
    fn cards_count_for_the_principal_only() {
        let player = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mut line = PlayerStats::new(player);

        tally(&mut line, &event(MatchEventKind::YellowCard, player, None, false));
        tally(&mut line, &event(MatchEventKind::RedCard, player, None, false));
        tally(&mut line, &event(MatchEventKind::YellowCard, other, None, false));
        assert_eq!(line.yellow_cards, 1);
        assert_eq!(line.red_cards, 1);
    }

    #[test]
    fn substitutions_do_not_move_any_counter() {
        let player = Uuid::new_v4();
        let mut line = PlayerStats::new(player);
        tally(&mut line, &event(MatchEventKind::Substitution, player, None, false));
        assert_eq!(line, PlayerStats::new(player));
    }
}
