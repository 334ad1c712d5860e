use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Canonical lifecycle states of a match.
///
/// The wire representation is the screaming-snake token used across the API
/// and persisted records (`SECOND_HALF`, `REPLAY_SCHEDULED`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Fixture exists but the contest has not started.
    Scheduled,
    /// Teams are on the pitch warming up; the match is considered in progress.
    Warmup,
    /// First half under way.
    Live,
    /// Half-time break; the clock pins to 45.
    Halftime,
    /// Second half under way.
    SecondHalf,
    /// First period of extra time.
    ExtraTimeFirst,
    /// Second period of extra time.
    ExtraTimeSecond,
    /// Penalty shoot-out.
    Penalties,
    /// Contest complete with a recorded score.
    Finished,
    /// Called off before completion; no score stands.
    Cancelled,
    /// Pushed back to a later, not yet fixed, date.
    Postponed,
    /// Started but could not be completed.
    Abandoned,
    /// A replay fixture has been scheduled for a postponed match.
    ReplayScheduled,
    /// Result struck from the record.
    Voided,
    /// Kickoff delayed on the day.
    Delayed,
    /// Halted indefinitely mid-contest.
    Suspended,
}

impl MatchStatus {
    /// Whether the match is currently in progress.
    ///
    /// Gates event recording, score mutation, and the live clock/poll loop.
    pub fn is_live(self) -> bool {
        matches!(
            self,
            MatchStatus::Warmup
                | MatchStatus::Live
                | MatchStatus::Halftime
                | MatchStatus::SecondHalf
                | MatchStatus::ExtraTimeFirst
                | MatchStatus::ExtraTimeSecond
                | MatchStatus::Penalties
        )
    }

    /// Whether the match completed with a standing score.
    pub fn is_finished(self) -> bool {
        matches!(self, MatchStatus::Finished)
    }

    /// Whether the match has not started yet (staff edits are unrestricted).
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            MatchStatus::Scheduled
                | MatchStatus::Postponed
                | MatchStatus::Delayed
                | MatchStatus::ReplayScheduled
        )
    }

    /// Whether the match ended without a standing score.
    ///
    /// Once entered, no LIVE-family transition is permitted.
    pub fn is_terminal_non_scoring(self) -> bool {
        matches!(
            self,
            MatchStatus::Cancelled
                | MatchStatus::Abandoned
                | MatchStatus::Voided
                | MatchStatus::Suspended
        )
    }

    /// Whether no further status transition is permitted at all.
    pub fn is_terminal(self) -> bool {
        self.is_finished() || self.is_terminal_non_scoring()
    }

    /// Position along the natural progression chain, if this status is on it.
    ///
    /// SCHEDULED -> WARMUP -> LIVE -> HALFTIME -> SECOND_HALF ->
    /// EXTRA_TIME_FIRST -> EXTRA_TIME_SECOND -> PENALTIES -> FINISHED.
    fn chain_position(self) -> Option<u8> {
        match self {
            MatchStatus::Scheduled => Some(0),
            MatchStatus::Warmup => Some(1),
            MatchStatus::Live => Some(2),
            MatchStatus::Halftime => Some(3),
            MatchStatus::SecondHalf => Some(4),
            MatchStatus::ExtraTimeFirst => Some(5),
            MatchStatus::ExtraTimeSecond => Some(6),
            MatchStatus::Penalties => Some(7),
            MatchStatus::Finished => Some(8),
            _ => None,
        }
    }

    /// Validate a transition from `self` to `to`, returning the new status.
    ///
    /// Legal moves are forward hops along the progression chain (skipping
    /// optional stages is allowed, e.g. SECOND_HALF -> FINISHED), a jump from
    /// any non-terminal status into a terminal non-scoring status, and the
    /// pending-family reschedule moves. Everything else, including any
    /// regression such as FINISHED -> LIVE and same-state "transitions",
    /// fails with [`InvalidTransition`].
    pub fn transition(self, to: MatchStatus) -> Result<MatchStatus, InvalidTransition> {
        let legal = if self == to {
            false
        } else if to.is_terminal_non_scoring() {
            !self.is_terminal()
        } else {
            match (self.chain_position(), to.chain_position()) {
                (Some(from_pos), Some(to_pos)) => to_pos > from_pos,
                _ => matches!(
                    (self, to),
                    (MatchStatus::Scheduled, MatchStatus::Postponed)
                        | (MatchStatus::Scheduled, MatchStatus::Delayed)
                        | (MatchStatus::Postponed, MatchStatus::ReplayScheduled)
                        | (MatchStatus::ReplayScheduled, MatchStatus::Warmup)
                        | (MatchStatus::ReplayScheduled, MatchStatus::Live)
                        | (MatchStatus::Delayed, MatchStatus::Warmup)
                        | (MatchStatus::Delayed, MatchStatus::Live)
                ),
            }
        };

        if legal {
            Ok(to)
        } else {
            Err(InvalidTransition { from: self, to })
        }
    }
}

/// Error returned when attempting to apply an invalid status transition.
///
/// Names both states so the caller can see what was attempted; it is never
/// applied silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: {from:?} cannot move to {to:?}")]
pub struct InvalidTransition {
    /// Status the match was in when the transition was requested.
    pub from: MatchStatus,
    /// Status the caller attempted to move to.
    pub to: MatchStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [MatchStatus; 16] = [
        MatchStatus::Scheduled,
        MatchStatus::Warmup,
        MatchStatus::Live,
        MatchStatus::Halftime,
        MatchStatus::SecondHalf,
        MatchStatus::ExtraTimeFirst,
        MatchStatus::ExtraTimeSecond,
        MatchStatus::Penalties,
        MatchStatus::Finished,
        MatchStatus::Cancelled,
        MatchStatus::Postponed,
        MatchStatus::Abandoned,
        MatchStatus::ReplayScheduled,
        MatchStatus::Voided,
        MatchStatus::Delayed,
        MatchStatus::Suspended,
    ];

    #[test]
    fn live_family_facets() {
        for status in [
            MatchStatus::Warmup,
            MatchStatus::Live,
            MatchStatus::Halftime,
            MatchStatus::SecondHalf,
            MatchStatus::ExtraTimeFirst,
            MatchStatus::ExtraTimeSecond,
            MatchStatus::Penalties,
        ] {
            assert!(status.is_live(), "{status:?} should be live");
            assert!(!status.is_finished());
            assert!(!status.is_pending());
        }
    }

    #[test]
    fn finished_and_cancelled_facets() {
        assert!(MatchStatus::Finished.is_finished());
        assert!(!MatchStatus::Finished.is_live());

        assert!(!MatchStatus::Cancelled.is_live());
        assert!(!MatchStatus::Cancelled.is_finished());
        assert!(MatchStatus::Cancelled.is_terminal_non_scoring());
    }

    #[test]
    fn natural_progression_is_legal() {
        let chain = [
            MatchStatus::Scheduled,
            MatchStatus::Warmup,
            MatchStatus::Live,
            MatchStatus::Halftime,
            MatchStatus::SecondHalf,
            MatchStatus::ExtraTimeFirst,
            MatchStatus::ExtraTimeSecond,
            MatchStatus::Penalties,
            MatchStatus::Finished,
        ];
        for pair in chain.windows(2) {
            assert_eq!(pair[0].transition(pair[1]), Ok(pair[1]));
        }
    }

    #[test]
    fn forward_skips_are_legal() {
        assert!(MatchStatus::Scheduled.transition(MatchStatus::Live).is_ok());
        assert!(
            MatchStatus::SecondHalf
                .transition(MatchStatus::Finished)
                .is_ok()
        );
        assert!(
            MatchStatus::ExtraTimeSecond
                .transition(MatchStatus::Finished)
                .is_ok()
        );
    }

    #[test]
    fn regressions_are_rejected() {
        let err = MatchStatus::Finished
            .transition(MatchStatus::Live)
            .unwrap_err();
        assert_eq!(err.from, MatchStatus::Finished);
        assert_eq!(err.to, MatchStatus::Live);

        assert!(MatchStatus::Live.transition(MatchStatus::Warmup).is_err());
        assert!(
            MatchStatus::SecondHalf
                .transition(MatchStatus::Halftime)
                .is_err()
        );
    }

    #[test]
    fn same_state_is_not_a_transition() {
        for status in ALL {
            assert!(status.transition(status).is_err());
        }
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for terminal in [
            MatchStatus::Finished,
            MatchStatus::Cancelled,
            MatchStatus::Abandoned,
            MatchStatus::Voided,
            MatchStatus::Suspended,
        ] {
            for target in ALL {
                assert!(
                    terminal.transition(target).is_err(),
                    "{terminal:?} -> {target:?} should be rejected"
                );
            }
        }
    }

    #[test]
    fn any_non_terminal_can_be_called_off() {
        for status in ALL.into_iter().filter(|s| !s.is_terminal()) {
            assert!(status.transition(MatchStatus::Cancelled).is_ok());
            assert!(status.transition(MatchStatus::Abandoned).is_ok());
        }
    }

    #[test]
    fn reschedule_moves() {
        assert!(
            MatchStatus::Scheduled
                .transition(MatchStatus::Postponed)
                .is_ok()
        );
        assert!(
            MatchStatus::Postponed
                .transition(MatchStatus::ReplayScheduled)
                .is_ok()
        );
        assert!(
            MatchStatus::ReplayScheduled
                .transition(MatchStatus::Live)
                .is_ok()
        );
        assert!(
            MatchStatus::Delayed
                .transition(MatchStatus::Warmup)
                .is_ok()
        );
        // A postponed match cannot kick off without a replay fixture.
        assert!(MatchStatus::Postponed.transition(MatchStatus::Live).is_err());
    }
}
