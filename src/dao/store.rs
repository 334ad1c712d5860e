use std::error::Error;

use futures::future::BoxFuture;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::{
    LineupRecord, MatchEventRecord, MatchRecord, TeamSide, TimesheetRecord, UserRecord,
};

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by store backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend could not be reached or failed internally.
    #[error("store unavailable: {message}")]
    Unavailable {
        /// Human-readable context for the failure.
        message: String,
        /// Underlying backend error.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The record changed or disappeared underneath the write.
    ///
    /// Retryable: callers re-fetch and reapply, distinct from a validation
    /// failure.
    #[error("conflicting write: {message}")]
    Conflict {
        /// What the write collided with.
        message: String,
    },
}

impl StoreError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StoreError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict {
            message: message.into(),
        }
    }
}

/// Abstraction over the persistence layer for the club management core.
///
/// The authoritative relational store is an external collaborator; this seam
/// keeps the core testable against the bundled in-memory implementation.
/// Writes are last-write-wins whole-record saves; cross-writer serialization
/// is the backing store's concern.
pub trait ClubStore: Send + Sync {
    /// Insert or replace a user.
    fn save_user(&self, user: UserRecord) -> BoxFuture<'static, StoreResult<()>>;
    /// Look up a user by id.
    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StoreResult<Option<UserRecord>>>;
    /// Look up a user by email.
    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StoreResult<Option<UserRecord>>>;

    /// Insert or replace a match.
    fn save_match(&self, record: MatchRecord) -> BoxFuture<'static, StoreResult<()>>;
    /// Look up a match by id, soft-deleted included.
    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StoreResult<Option<MatchRecord>>>;
    /// All matches ordered by kickoff, soft-deleted included; listing-level
    /// filtering happens in the service layer.
    fn list_matches(&self) -> BoxFuture<'static, StoreResult<Vec<MatchRecord>>>;

    /// Append a new event to a match.
    fn append_event(&self, event: MatchEventRecord) -> BoxFuture<'static, StoreResult<()>>;
    /// Replace an existing event (soft-void); conflicts if it disappeared.
    fn update_event(&self, event: MatchEventRecord) -> BoxFuture<'static, StoreResult<()>>;
    /// Events of one match in recording order.
    fn list_events(&self, match_id: Uuid)
    -> BoxFuture<'static, StoreResult<Vec<MatchEventRecord>>>;
    /// Events across all matches involving a player, as principal or related.
    fn list_events_by_player(
        &self,
        player_id: Uuid,
    ) -> BoxFuture<'static, StoreResult<Vec<MatchEventRecord>>>;

    /// Insert or replace a lineup for one side of a match.
    fn save_lineup(&self, lineup: LineupRecord) -> BoxFuture<'static, StoreResult<()>>;
    /// Look up the lineup for one side of a match.
    fn find_lineup(
        &self,
        match_id: Uuid,
        side: TeamSide,
    ) -> BoxFuture<'static, StoreResult<Option<LineupRecord>>>;

    /// Insert or replace a timesheet.
    fn save_timesheet(&self, record: TimesheetRecord) -> BoxFuture<'static, StoreResult<()>>;
    /// Look up a timesheet by id.
    fn find_timesheet(&self, id: Uuid)
    -> BoxFuture<'static, StoreResult<Option<TimesheetRecord>>>;
    /// All timesheets ordered by creation time.
    fn list_timesheets(&self) -> BoxFuture<'static, StoreResult<Vec<TimesheetRecord>>>;

    /// Cheap reachability probe for the health endpoint.
    fn health_check(&self) -> BoxFuture<'static, StoreResult<()>>;
}
