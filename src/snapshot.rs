//! # Published Leaderboard Snapshot
//!
//! Every refresh fetches a whole dataset and derives a fresh [`Leaderboard`]
//! from it; nothing is carried over from the previous snapshot. Refreshes may
//! overlap (the background timer and a manual refresh), so each one takes a
//! sequence token when it starts. A result is published only if its token is
//! newer than the published one: a slow fetch never overwrites a newer result,
//! and a failed newer fetch leaves an older successful one in place.

use crate::dataset::Dataset;
use crate::leaderboard::Leaderboard;
use crate::reference::ReferenceTable;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Maps, aggregates and scores one dataset.
pub fn build(dataset: Dataset, reference: &ReferenceTable) -> Result<Leaderboard> {
    let submissions = dataset.submissions().context("Malformed dataset")?;
    let mut board = Leaderboard::aggregate(submissions).context("Malformed dataset")?;
    board.apply_scores(reference);
    Ok(board)
}

/// A leaderboard together with when it was fetched.
#[derive(Debug)]
pub struct Snapshot {
    pub token: u64,
    pub fetched_at: DateTime<Utc>,
    pub leaderboard: Leaderboard,
}

/// Holds the most recent snapshot.
#[derive(Debug, Default)]
pub struct Board {
    issued: AtomicU64,
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// The published snapshot, if any refresh has completed.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Starts a refresh and returns its token.
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Token of the published snapshot, `0` before the first one.
    pub fn published_token(&self) -> u64 {
        self.current().map_or(0, |s| s.token)
    }

    /// Publishes `leaderboard` unless a snapshot from a newer refresh is already published.
    pub fn publish(&self, token: u64, leaderboard: Leaderboard) -> Option<Arc<Snapshot>> {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if current.as_ref().is_some_and(|s| s.token >= token) {
            debug!(token, "discarding superseded snapshot");
            return None;
        }
        let snapshot = Arc::new(Snapshot {
            token,
            fetched_at: Utc::now(),
            leaderboard,
        });
        *current = Some(snapshot.clone());
        Some(snapshot)
    }

    /// Awaits `fetch`, builds the leaderboard and publishes it.
    ///
    /// Returns `Ok(None)` if a newer refresh finished first.
    /// Errors leave the previous snapshot in place.
    pub async fn refresh<Fut>(
        &self,
        fetch: Fut,
        reference: &ReferenceTable,
    ) -> Result<Option<Arc<Snapshot>>>
    where
        Fut: Future<Output = Result<Dataset>>,
    {
        let token = self.begin();
        let started = std::time::Instant::now();
        let dataset = match fetch.await {
            Ok(d) => d,
            Err(e) => {
                warn!(token, "fetch failed: {:#}", e);
                return Err(e);
            }
        };
        let rows = dataset.len();
        let leaderboard = build(dataset, reference)?;
        let published = self.publish(token, leaderboard);
        if let Some(s) = &published {
            info!(
                token,
                rows,
                total = s.leaderboard.total,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "published leaderboard"
            );
        }
        Ok(published)
    }

    /// The published snapshot, refreshing with `fetch` first if there is none yet.
    ///
    /// Concurrent first loads each run their own fetch; whichever finishes
    /// later sees the other's snapshot if its own was superseded.
    pub async fn current_or_refresh<Fut>(
        &self,
        fetch: Fut,
        reference: &ReferenceTable,
    ) -> Result<Arc<Snapshot>>
    where
        Fut: Future<Output = Result<Dataset>>,
    {
        if let Some(s) = self.current() {
            return Ok(s);
        }
        match self.refresh(fetch, reference).await? {
            Some(s) => Ok(s),
            None => self
                .current()
                .context("superseded snapshot was not replaced"),
        }
    }
}
