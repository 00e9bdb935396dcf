//! Timer that drives the feed.
//!
//! Each tick takes the feed's write lock for its whole duration, so ticks
//! never overlap each other or a reader. The returned handle owns the task:
//! `stop` shuts it down and waits for it, dropping the handle aborts it.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::simulator::FeedSimulator;

/// Feed shared between the runner and whoever reads match snapshots.
pub type SharedFeed<R = StdRng> = Arc<RwLock<FeedSimulator<R>>>;

/// Owner of a running feed task.
pub struct FeedHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<u64>>,
}

impl FeedHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Signal shutdown and wait for the task. Returns how many ticks it ran.
    pub async fn stop(mut self) -> Result<u64> {
        if let Some(tx) = self.shutdown.take() {
            // The task may already be gone; that's fine.
            let _ = tx.send(());
        }
        match self.task.take() {
            Some(task) => task.await.context("Feed task failed"),
            None => Ok(0),
        }
    }
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Start ticking `feed` every `period`. The first tick fires one full period
/// after the call.
pub fn spawn_feed<R>(feed: SharedFeed<R>, period: Duration) -> FeedHandle
where
    R: Rng + Send + Sync + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first interval tick completes immediately.
        interval.tick().await;

        info!(period_ms = period.as_millis() as u64, "Feed runner started");
        let mut ticks = 0u64;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let report = feed.write().await.tick();
                    ticks += 1;
                    if !report.suspended.is_empty() || !report.resumed.is_empty() {
                        info!(
                            tick = report.tick,
                            suspended = ?report.suspended,
                            resumed = ?report.resumed,
                            "Match status changed"
                        );
                    } else {
                        debug!(tick = report.tick, repriced = report.repriced, "Odds updated");
                    }
                }
                _ = &mut shutdown_rx => {
                    break;
                }
            }
        }

        info!(ticks, "Feed runner stopped");
        ticks
    });

    FeedHandle {
        shutdown: Some(shutdown_tx),
        task: Some(task),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
