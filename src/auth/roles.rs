use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of role tags a user can hold.
///
/// Wire representation matches the tokens stored in the user directory
/// (`SUPERADMIN`, `CLUB_OWNER`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleTag {
    /// Platform operator; outranks everything.
    #[serde(rename = "SUPERADMIN")]
    SuperAdmin,
    /// Administers a league across clubs.
    LeagueAdmin,
    /// Owns a club.
    ClubOwner,
    /// Runs a club day to day.
    ClubManager,
    /// Coaches a team and files timesheets.
    Coach,
    /// Professional player.
    PlayerPro,
    /// Default role for every account.
    Player,
    /// Parent or guardian of a youth player.
    Parent,
    /// Match official.
    Referee,
    /// Handles club finances and payouts.
    Treasurer,
    /// Scouts players across clubs.
    Scout,
    /// Works with match and player statistics.
    Analyst,
}

/// Fixed total priority order over all role tags, highest first.
///
/// The order is the single reconciled list; routing and display always go
/// through it rather than any ad-hoc comparison.
pub const ROLE_PRIORITY: [RoleTag; 12] = [
    RoleTag::SuperAdmin,
    RoleTag::LeagueAdmin,
    RoleTag::ClubOwner,
    RoleTag::ClubManager,
    RoleTag::Coach,
    RoleTag::PlayerPro,
    RoleTag::Player,
    RoleTag::Parent,
    RoleTag::Referee,
    RoleTag::Treasurer,
    RoleTag::Scout,
    RoleTag::Analyst,
];

/// The single highest-priority role present in `roles`.
///
/// Defaults to [`RoleTag::Player`] for an empty set, matching the rule that
/// every account holds at least player standing.
pub fn primary_role(roles: &[RoleTag]) -> RoleTag {
    ROLE_PRIORITY
        .into_iter()
        .find(|tag| roles.contains(tag))
        .unwrap_or(RoleTag::Player)
}

/// Whether `roles` contains `tag`.
///
/// An absent collection means "no roles": every check is false, never an
/// error.
pub fn has_role(roles: Option<&[RoleTag]>, tag: RoleTag) -> bool {
    roles.is_some_and(|roles| roles.contains(&tag))
}

/// Whether `roles` contains at least one of `tags`.
pub fn has_any_role(roles: Option<&[RoleTag]>, tags: &[RoleTag]) -> bool {
    roles.is_some_and(|roles| tags.iter().any(|tag| roles.contains(tag)))
}

/// Whether `roles` contains every one of `tags`.
pub fn has_all_roles(roles: Option<&[RoleTag]>, tags: &[RoleTag]) -> bool {
    roles.is_some_and(|roles| tags.iter().all(|tag| roles.contains(tag)))
}

/// Default dashboard path for a primary role.
pub fn dashboard_path(role: RoleTag) -> &'static str {
    match role {
        RoleTag::SuperAdmin => "/admin",
        RoleTag::LeagueAdmin => "/league",
        RoleTag::ClubOwner | RoleTag::ClubManager => "/club",
        RoleTag::Coach => "/coach",
        RoleTag::PlayerPro | RoleTag::Player => "/player",
        RoleTag::Parent => "/family",
        RoleTag::Referee => "/matches/assigned",
        RoleTag::Treasurer => "/finance",
        RoleTag::Scout => "/scouting",
        RoleTag::Analyst => "/analytics",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_role_defaults_to_player() {
        assert_eq!(primary_role(&[]), RoleTag::Player);
    }

    #[test]
    fn primary_role_picks_highest_priority() {
        assert_eq!(
            primary_role(&[RoleTag::Player, RoleTag::Coach]),
            RoleTag::Coach
        );
        assert_eq!(
            primary_role(&[RoleTag::Analyst, RoleTag::ClubOwner, RoleTag::Coach]),
            RoleTag::ClubOwner
        );
        assert_eq!(
            primary_role(&[RoleTag::Scout, RoleTag::SuperAdmin]),
            RoleTag::SuperAdmin
        );
    }

    #[test]
    fn has_role_matches_membership() {
        let roles = [RoleTag::Coach, RoleTag::Player];
        assert!(has_role(Some(&roles), RoleTag::Coach));
        assert!(!has_role(Some(&roles), RoleTag::Referee));
    }

    #[test]
    fn absent_collection_means_no_roles() {
        assert!(!has_role(None, RoleTag::Player));
        assert!(!has_any_role(None, &[RoleTag::Player, RoleTag::Coach]));
        assert!(!has_all_roles(None, &[]));
    }

    #[test]
    fn any_and_all_predicates() {
        let roles = [RoleTag::Coach, RoleTag::Treasurer];
        assert!(has_any_role(Some(&roles), &[RoleTag::Referee, RoleTag::Coach]));
        assert!(!has_any_role(Some(&roles), &[RoleTag::Referee, RoleTag::Scout]));
        assert!(has_all_roles(Some(&roles), &[RoleTag::Coach, RoleTag::Treasurer]));
        assert!(!has_all_roles(Some(&roles), &[RoleTag::Coach, RoleTag::Scout]));
    }

    #[test]
    fn priority_list_covers_every_tag_once() {
        let mut seen = std::collections::HashSet::new();
        for tag in ROLE_PRIORITY {
            assert!(seen.insert(tag), "{tag:?} listed twice");
        }
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn role_tokens_round_trip() {
        let json = serde_json::to_string(&RoleTag::SuperAdmin).unwrap();
        assert_eq!(json, "\"SUPERADMIN\"");
        let json = serde_json::to_string(&RoleTag::PlayerPro).unwrap();
        assert_eq!(json, "\"PLAYER_PRO\"");
        let back: RoleTag = serde_json::from_str("\"CLUB_OWNER\"").unwrap();
        assert_eq!(back, RoleTag::ClubOwner);
    }
}
