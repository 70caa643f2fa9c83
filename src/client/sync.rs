use std::{
    future::Future,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use futures::{StreamExt, future::BoxFuture, stream::FuturesUnordered};
use tokio::{
    sync::Mutex,
    time::{MissedTickBehavior, interval},
};
use tracing::debug;
use uuid::Uuid;

use crate::claims::ClaimantCode;

use super::{
    ClaimMatrix,
    error::ClientResult,
    view::{BoardView, Reconciliation, TileSurface},
};

/// Interval between two background polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Where claims are read from and toggles are sent to.
pub trait ClaimSource: Send + Sync {
    /// Current claim matrix of `board_id`.
    fn fetch_claims(&self, board_id: Uuid) -> BoxFuture<'static, ClientResult<ClaimMatrix>>;

    fn toggle(
        &self,
        board_id: Uuid,
        x: u32,
        y: u32,
        code: ClaimantCode,
    ) -> BoxFuture<'static, ClientResult<()>>;
}

/// What happened to a completed poll.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The response was folded into the view.
    Applied(Reconciliation),
    /// A poll issued later was applied first; this response was dropped.
    Stale,
}

struct Synced<T> {
    view: BoardView,
    surface: T,
    applied: u64,
}

/// Keeps one [`BoardView`] in step with a [`ClaimSource`].
///
/// Every poll is numbered when it is issued; a response is applied only if no later-issued
/// poll has been applied already.
pub struct ClaimSyncClient<S, T> {
    source: S,
    code: ClaimantCode,
    poll_interval: Duration,
    issued: AtomicU64,
    synced: Mutex<Synced<T>>,
}

impl<S: ClaimSource, T: TileSurface> ClaimSyncClient<S, T> {
    /// Client acting as `code`, drawing `view` on `surface`.
    pub fn new(source: S, view: BoardView, surface: T, code: ClaimantCode) -> Self {
        Self {
            source,
            code,
            poll_interval: DEFAULT_POLL_INTERVAL,
            issued: AtomicU64::new(0),
            synced: Mutex::new(Synced {
                view,
                surface,
                applied: 0,
            }),
        }
    }

    /// Replace [`DEFAULT_POLL_INTERVAL`].
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Claimant code this client toggles with.
    pub fn code(&self) -> ClaimantCode {
        self.code
    }

    /// Copy of the view as currently shown.
    pub async fn view(&self) -> BoardView {
        self.synced.lock().await.view.clone()
    }

    /// Fetch the claim matrix once and fold it into the view.
    ///
    /// A board that is gone or whose claims cannot be decoded hides the view. Other
    /// failures leave the view as is and are returned.
    pub async fn poll_once(&self) -> ClientResult<PollOutcome> {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let board_id = self.synced.lock().await.view.board_id();

        let fetched = match self.source.fetch_claims(board_id).await {
            Ok(matrix) => Ok(matrix),
            Err(err) if err.board_unavailable() => Err(err.to_string()),
            Err(err) => return Err(err),
        };

        let mut synced = self.synced.lock().await;
        if sequence <= synced.applied {
            debug!(board_id = %board_id, sequence, applied = synced.applied, "dropping stale claim poll");
            return Ok(PollOutcome::Stale);
        }
        synced.applied = sequence;

        let Synced { view, surface, .. } = &mut *synced;
        let reconciliation = match fetched {
            Ok(matrix) => view.reconcile(&matrix),
            Err(reason) => view.hide(reason),
        };
        match &reconciliation {
            Reconciliation::Updated { repaints, .. } => {
                debug!(board_id = %board_id, sequence, repaints = repaints.len(), "claims reconciled");
            }
            Reconciliation::Hidden { reason } => {
                debug!(board_id = %board_id, sequence, reason = %reason, "board unavailable; hiding it");
            }
        }
        reconciliation.paint(surface);

        Ok(PollOutcome::Applied(reconciliation))
    }

    /// Toggle this client's claim on `(x, y)` and poll right away.
    ///
    /// A failed toggle is returned as is and not retried.
    pub async fn toggle(&self, x: u32, y: u32) -> ClientResult<PollOutcome> {
        let board_id = self.synced.lock().await.view.board_id();
        self.source.toggle(board_id, x, y, self.code).await?;
        self.poll_once().await
    }

    /// Poll immediately, then every poll interval until `shutdown` completes.
    ///
    /// Polls run concurrently so a slow response never delays the next tick; failed polls
    /// are logged and retried on the next tick. Polls still in flight at shutdown are
    /// dropped.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);
        let mut in_flight = FuturesUnordered::new();

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => in_flight.push(self.poll_once()),
                Some(result) = in_flight.next(), if !in_flight.is_empty() => {
                    if let Err(err) = result {
                        debug!(error = %err, "claim poll failed; retrying on next tick");
                    }
                }
            }
        }
    }
}
