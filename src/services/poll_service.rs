//! Fixed-interval polling of the live match snapshot.
//!
//! There is no push channel: consumers (dashboards, the mobile companion)
//! keep a [`MatchPoller`] that re-fetches the full snapshot on a constant
//! interval while the match is in progress. Every successful fetch replaces
//! the previous snapshot wholesale, so delayed or reordered completions
//! cannot corrupt the view. The interval never backs off; a failed poll
//! keeps the last good snapshot and bumps a failure counter instead.

use std::{sync::Arc, time::Duration};

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::warn;
use uuid::Uuid;

use crate::{config::AppConfig, dto::matches::LiveMatchSnapshot};

/// Error raised while fetching a snapshot.
#[derive(Debug, Clone, Error)]
pub enum SnapshotFetchError {
    /// The request never produced a usable response.
    #[error("snapshot request failed: {0}")]
    Transport(String),
    /// The response arrived but could not be decoded.
    #[error("malformed snapshot payload: {0}")]
    Malformed(String),
}

/// Source of live snapshots; the HTTP implementation talks to the
/// match-summary endpoint, tests script their own.
pub trait SnapshotSource: Send + Sync {
    /// Fetch the current full snapshot.
    fn fetch(&self) -> BoxFuture<'static, Result<LiveMatchSnapshot, SnapshotFetchError>>;
}

/// [`SnapshotSource`] backed by the `GET /matches/{id}/live` endpoint.
pub struct HttpSnapshotSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSnapshotSource {
    /// Build a source for one match against `base_url`, with a fixed
    /// per-request timeout.
    pub fn new(
        base_url: &str,
        match_id: Uuid,
        timeout: Duration,
    ) -> Result<Self, SnapshotFetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SnapshotFetchError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            url: format!("{}/matches/{match_id}/live", base_url.trim_end_matches('/')),
        })
    }
}

impl SnapshotSource for HttpSnapshotSource {
    fn fetch(&self) -> BoxFuture<'static, Result<LiveMatchSnapshot, SnapshotFetchError>> {
        let client = self.client.clone();
        let url = self.url.clone();
        Box::pin(async move {
            let response = client
                .get(&url)
                .send()
                .await
                .and_then(|response| response.error_for_status())
                .map_err(|err| SnapshotFetchError::Transport(err.to_string()))?;
            response
                .json::<LiveMatchSnapshot>()
                .await
                .map_err(|err| SnapshotFetchError::Malformed(err.to_string()))
        })
    }
}

/// Start a poller for `match_id` against a deployment at `base_url`, using
/// the configured cadence and per-request timeout.
pub async fn start_http_poller(
    config: &AppConfig,
    base_url: &str,
    match_id: Uuid,
) -> Result<MatchPoller, SnapshotFetchError> {
    let source = Arc::new(HttpSnapshotSource::new(
        base_url,
        match_id,
        config.poll_timeout,
    )?);
    MatchPoller::start(source, config.poll_interval).await
}

/// What consumers observe: the last good snapshot plus the failure streak.
///
/// A non-zero streak is the non-fatal "retrying" banner; the snapshot
/// underneath is still the last one that arrived intact.
#[derive(Debug, Clone)]
pub struct PollView {
    /// Last successfully fetched snapshot.
    pub snapshot: LiveMatchSnapshot,
    /// Polls failed in a row since the last success.
    pub consecutive_failures: u32,
}

/// Handle to a running poll loop.
///
/// Dropping the handle (or calling [`MatchPoller::disable`]) cancels the
/// loop deterministically: no update lands after cancellation, even if a
/// fetch was in flight.
pub struct MatchPoller {
    view_rx: watch::Receiver<PollView>,
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MatchPoller {
    /// Fetch the initial snapshot and start polling.
    ///
    /// The initial fetch failing is fatal (there is nothing to display);
    /// later failures are absorbed into the failure counter. If the initial
    /// snapshot is already outside the LIVE family the loop exits straight
    /// away and the snapshot simply stays as fetched.
    pub async fn start(
        source: Arc<dyn SnapshotSource>,
        interval: Duration,
    ) -> Result<MatchPoller, SnapshotFetchError> {
        let initial = source.fetch().await?;
        let (view_tx, view_rx) = watch::channel(PollView {
            snapshot: initial,
            consecutive_failures: 0,
        });
        let (cancel_tx, mut cancel_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; consume it so the loop
            // waits a full interval before the first re-fetch.
            ticker.tick().await;

            loop {
                if !view_tx.borrow().snapshot.status.is_live() {
                    break;
                }

                tokio::select! {
                    changed = cancel_rx.changed() => {
                        if changed.is_err() || *cancel_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        match source.fetch().await {
                            Ok(snapshot) => {
                                view_tx.send_modify(|view| {
                                    view.snapshot = snapshot;
                                    view.consecutive_failures = 0;
                                });
                            }
                            Err(err) => {
                                warn!(error = %err, "live poll failed; keeping last snapshot");
                                view_tx.send_modify(|view| {
                                    view.consecutive_failures += 1;
                                });
                            }
                        }
                    }
                }
            }
        });

        Ok(MatchPoller {
            view_rx,
            cancel_tx,
            task,
        })
    }

    /// Last observed view.
    pub fn latest(&self) -> PollView {
        self.view_rx.borrow().clone()
    }

    /// Subscribe for change notifications.
    pub fn subscribe(&self) -> watch::Receiver<PollView> {
        self.view_rx.clone()
    }

    /// Turn auto-refresh off. The loop stops before its next update.
    pub fn disable(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Whether the loop has exited (cancelled or left the LIVE family).
    pub fn is_stopped(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for MatchPoller {
    fn drop(&mut self) {
        let _ = self.cancel_tx.send(true);
        self.task.abort();
    }
}
