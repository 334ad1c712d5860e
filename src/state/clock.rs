//! Derivation of the displayed match minute from wall-clock time and status.
//!
//! The minute is a pure function of `(now, kickoff, status)`; there is no
//! counter state, and recomputation on every tick or poll yields the same
//! result.

use time::OffsetDateTime;

use crate::state::match_machine::MatchStatus;

/// Inclusive minute envelope a status clamps the clock to.
///
/// `None` for every status outside the LIVE family: those render no timer.
pub fn envelope(status: MatchStatus) -> Option<(u8, u8)> {
    match status {
        MatchStatus::Warmup | MatchStatus::Live => Some((0, 45)),
        MatchStatus::Halftime => Some((45, 45)),
        MatchStatus::SecondHalf => Some((45, 90)),
        MatchStatus::ExtraTimeFirst => Some((90, 105)),
        MatchStatus::ExtraTimeSecond => Some((105, 120)),
        // A shoot-out has no running clock; the display pins to full time.
        MatchStatus::Penalties => Some((120, 120)),
        _ => None,
    }
}

/// Minute to display for a match given the current time.
///
/// Whole minutes elapsed since kickoff, clamped to the envelope of the
/// current status. Negative elapsed time (clock skew, warmup before the
/// official kickoff) clamps to the envelope floor.
pub fn display_minute(
    now: OffsetDateTime,
    kickoff: OffsetDateTime,
    status: MatchStatus,
) -> Option<u8> {
    let (low, high) = envelope(status)?;

    let elapsed = (now - kickoff).whole_minutes();
    let minute = elapsed.clamp(i64::from(low), i64::from(high));

    // The clamp bounds fit in u8 by construction.
    Some(minute as u8)
}
