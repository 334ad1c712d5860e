//! In-memory reference implementation of [`ClubStore`].
//!
//! Backs tests and single-node deployments; the production relational store
//! is an external collaborator plugged in behind the same trait.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{LineupRecord, MatchEventRecord, MatchRecord, TeamSide, TimesheetRecord, UserRecord},
    store::{ClubStore, StoreError, StoreResult},
};

#[derive(Default)]
struct Inner {
    users: DashMap<Uuid, UserRecord>,
    matches: DashMap<Uuid, MatchRecord>,
    // Events keyed by match, kept in recording order.
    events: DashMap<Uuid, Vec<MatchEventRecord>>,
    lineups: DashMap<(Uuid, TeamSide), LineupRecord>,
    timesheets: DashMap<Uuid, TimesheetRecord>,
}

/// Concurrent map-backed store. Cloning shares the underlying data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClubStore for MemoryStore {
    fn save_user(&self, user: UserRecord) -> BoxFuture<'static, StoreResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.users.insert(user.id, user);
            Ok(())
        })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StoreResult<Option<UserRecord>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.users.get(&id).map(|entry| entry.value().clone())) })
    }

    fn find_user_by_email(
        &self,
        email: String,
    ) -> BoxFuture<'static, StoreResult<Option<UserRecord>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .users
                .iter()
                .find(|entry| entry.value().email == email)
                .map(|entry| entry.value().clone()))
        })
    }

    fn save_match(&self, record: MatchRecord) -> BoxFuture<'static, StoreResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.matches.insert(record.id, record);
            Ok(())
        })
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StoreResult<Option<MatchRecord>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.matches.get(&id).map(|entry| entry.value().clone())) })
    }

    fn list_matches(&self) -> BoxFuture<'static, StoreResult<Vec<MatchRecord>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut matches: Vec<MatchRecord> = inner
                .matches
                .iter()
                .map(|entry| entry.value().clone())
                .collect();
            matches.sort_by_key(|record| record.kickoff);
            Ok(matches)
        })
    }

    fn append_event(&self, event: MatchEventRecord) -> BoxFuture<'static, StoreResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.events.entry(event.match_id).or_default().push(event);
            Ok(())
        })
    }

    fn update_event(&self, event: MatchEventRecord) -> BoxFuture<'static, StoreResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut events = inner.events.entry(event.match_id).or_default();
            match events.iter_mut().find(|existing| existing.id == event.id) {
                Some(existing) => {
                    *existing = event;
                    Ok(())
                }
                None => Err(StoreError::conflict(format!(
                    "event `{}` no longer exists on match `{}`",
                    event.id, event.match_id
                ))),
            }
        })
    }

    fn list_events(
        &self,
        match_id: Uuid,
    ) -> BoxFuture<'static, StoreResult<Vec<MatchEventRecord>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .events
                .get(&match_id)
                .map(|entry| entry.value().clone())
                .unwrap_or_default())
        })
    }

    fn list_events_by_player(
        &self,
        player_id: Uuid,
    ) -> BoxFuture<'static, StoreResult<Vec<MatchEventRecord>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut hits = Vec::new();
            for entry in inner.events.iter() {
                hits.extend(
                    entry
                        .value()
                        .iter()
                        .filter(|event| {
                            event.player_id == player_id
                                || event.related_player_id == Some(player_id)
                        })
                        .cloned(),
                );
            }
            hits.sort_by_key(|event| event.recorded_at);
            Ok(hits)
        })
    }

    fn save_lineup(&self, lineup: LineupRecord) -> BoxFuture<'static, StoreResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner
                .lineups
                .insert((lineup.match_id, lineup.side), lineup);
            Ok(())
        })
    }

    fn find_lineup(
        &self,
        match_id: Uuid,
        side: TeamSide,
    ) -> BoxFuture<'static, StoreResult<Option<LineupRecord>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .lineups
                .get(&(match_id, side))
                .map(|entry| entry.value().clone()))
        })
    }

    fn save_timesheet(&self, record: TimesheetRecord) -> BoxFuture<'static, StoreResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.timesheets.insert(record.id, record);
            Ok(())
        })
    }

    fn find_timesheet(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StoreResult<Option<TimesheetRecord>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.timesheets.get(&id).map(|entry| entry.value().clone())) })
    }

    fn list_timesheets(&self) -> BoxFuture<'static, StoreResult<Vec<TimesheetRecord>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut sheets: Vec<TimesheetRecord> = inner
                .timesheets
                .iter()
                .map(|entry| entry.value().clone())
                .collect();
            sheets.sort_by_key(|record| record.created_at);
            Ok(sheets)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StoreResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
