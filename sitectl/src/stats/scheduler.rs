//! Background daemon that recomputes worker statistics on a fixed interval.
//!
//! Only one replica should recompute at a time, so the scheduler is started when this replica
//! gains leadership and stopped when it loses it (see `leader_election`). With leader election
//! disabled it simply runs for the lifetime of the process.

use crate::stats::aggregator::StatsAggregator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct StatsScheduler {
    aggregator: StatsAggregator,
    interval: Duration,
    running: Arc<Mutex<Option<(JoinHandle<()>, CancellationToken)>>>,
}

impl StatsScheduler {
    pub fn new(aggregator: StatsAggregator, interval: Duration) -> Self {
        Self {
            aggregator,
            interval,
            running: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the recompute loop. The first run happens immediately.
    ///
    /// Returns false if the loop was already running. The loop exits when `shutdown` is
    /// cancelled or [`stop`](Self::stop) is called.
    pub async fn start(&self, shutdown: CancellationToken) -> bool {
        let mut running = self.running.lock().await;
        if running.as_ref().is_some_and(|(handle, _)| !handle.is_finished()) {
            return false;
        }

        let token = shutdown.child_token();
        let aggregator = self.aggregator.clone();
        let period = self.interval;
        let loop_token = token.clone();

        let handle = tokio::spawn(async move {
            tracing::info!("Starting worker statistics scheduler (every {:?})", period);

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => break,
                    _ = interval.tick() => {
                        match aggregator.run().await {
                            Ok(report) if report.is_complete() => {
                                tracing::debug!("Scheduled recompute updated {} workers", report.updated.len());
                            }
                            Ok(report) => {
                                tracing::warn!(
                                    "Scheduled recompute finished with {} of {} worker writes failing",
                                    report.failed.len(),
                                    report.processed
                                );
                            }
                            Err(e) => {
                                tracing::error!("Scheduled recompute failed: {:#}", anyhow::Error::from(e));
                            }
                        }
                    }
                }
            }

            tracing::info!("Worker statistics scheduler has stopped");
        });

        *running = Some((handle, token));
        true
    }

    /// Stop the recompute loop and wait for it to exit. An in-flight run is abandoned at its
    /// next await point.
    pub async fn stop(&self) {
        let Some((handle, token)) = self.running.lock().await.take() else {
            return;
        };
        token.cancel();
        handle.abort();
        let _ = handle.await;
    }

    pub async fn is_running(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(|(handle, _)| !handle.is_finished())
    }
}
