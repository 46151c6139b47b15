//! Timer-driven refresh of one data category
//!
//! A poller is `idle` until its first successful fetch and `ready` from then
//! on. Failed refreshes keep the previous snapshot; the error is logged,
//! counted and returned to the caller of [`Poller::refresh`].

use crate::api::{ApiClient, Category};
use crate::error::Result;
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval};

/// Whether the poller holds data yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollerState {
    Idle,
    Ready,
}

/// Counters and last outcome of a poller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollerStatus {
    pub category: Category,
    pub state: PollerState,
    pub interval_seconds: u64,
    pub total_polls: u64,
    pub failed_polls: u64,
    pub consecutive_failures: u32,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Fetch-and-hold unit for one category
pub struct Poller {
    category: Category,
    interval: Duration,
    client: Arc<dyn ApiClient>,
    snapshot_tx: watch::Sender<Option<Arc<Snapshot>>>,
    status_tx: watch::Sender<PollerStatus>,
    logger: StructuredLogger,
}

impl Poller {
    pub fn new(category: Category, interval: Duration, client: Arc<dyn ApiClient>) -> Self {
        let logger = get_logger_with_context(
            LogContext::new("poller")
                .with_serial(client.serial())
                .with_category(category.as_str()),
        );
        let (snapshot_tx, _) = watch::channel(None);
        let (status_tx, _) = watch::channel(PollerStatus {
            category,
            state: PollerState::Idle,
            interval_seconds: interval.as_secs(),
            total_polls: 0,
            failed_polls: 0,
            consecutive_failures: 0,
            last_success: None,
            last_error: None,
        });
        Self {
            category,
            interval,
            client,
            snapshot_tx,
            status_tx,
            logger,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Current snapshot, `None` while idle
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot_tx.borrow().clone()
    }

    pub fn state(&self) -> PollerState {
        self.status_tx.borrow().state
    }

    pub fn status(&self) -> PollerStatus {
        self.status_tx.borrow().clone()
    }

    /// Receiver notified on every snapshot replacement
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.snapshot_tx.subscribe()
    }

    /// Fetch once and replace the snapshot on success
    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        match self.client.fetch(self.category).await {
            Ok(raw) => {
                let snapshot = Arc::new(Snapshot::new(self.category, raw));
                self.snapshot_tx.send_replace(Some(Arc::clone(&snapshot)));
                self.status_tx.send_modify(|status| {
                    status.state = PollerState::Ready;
                    status.total_polls += 1;
                    status.consecutive_failures = 0;
                    status.last_success = Some(snapshot.fetched_at());
                    status.last_error = None;
                });
                self.logger.debug(&format!(
                    "Refreshed {} readings",
                    snapshot.readings().len()
                ));
                Ok(snapshot)
            }
            Err(e) => {
                let message = e.to_string();
                self.status_tx.send_modify(|status| {
                    status.total_polls += 1;
                    status.failed_polls += 1;
                    status.consecutive_failures = status.consecutive_failures.saturating_add(1);
                    status.last_error = Some(message.clone());
                });
                if self.snapshot_tx.borrow().is_some() {
                    self.logger
                        .warn(&format!("Refresh failed, keeping previous snapshot: {}", message));
                } else {
                    self.logger.warn(&format!("Refresh failed: {}", message));
                }
                Err(e.into())
            }
        }
    }

    /// Refresh on every tick until `shutdown` flips to `true` or its sender
    /// is dropped. The first tick fires immediately unless a snapshot is
    /// already held.
    ///
    /// Refreshes run inline. A tick that comes due while a fetch is still
    /// outstanding is dropped, and the next refresh waits for the following
    /// slot of the interval grid.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let primed = self.snapshot_tx.borrow().is_some();
        if primed {
            ticker.tick().await;
        }
        self.logger.info(&format!(
            "Polling every {}s",
            self.interval.as_secs()
        ));

        loop {
            let stopping = *shutdown.borrow_and_update();
            if stopping {
                break;
            }
            tokio::select! {
                scheduled = ticker.tick() => {
                    tokio::select! {
                        // Errors are already logged and counted
                        _ = self.refresh() => {}
                        _ = shutdown.changed() => break,
                    }
                    let now = Instant::now();
                    if now > scheduled + self.interval {
                        self.logger.debug("Refresh overran its interval, skipping missed ticks");
                        ticker.reset_at(next_slot(scheduled, now, self.interval));
                    }
                }
                _ = shutdown.changed() => break,
            }
        }
        self.logger.info("Poller stopped");
    }
}

/// First slot of the `scheduled + k * period` grid strictly after `now`
fn next_slot(scheduled: Instant, now: Instant, period: Duration) -> Instant {
    let elapsed = now.saturating_duration_since(scheduled).as_nanos();
    let periods = elapsed / period.as_nanos().max(1) + 1;
    u32::try_from(periods)
        .ok()
        .and_then(|n| period.checked_mul(n))
        .and_then(|offset| scheduled.checked_add(offset))
        .unwrap_or(now + period)
}
