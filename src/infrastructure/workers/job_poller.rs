use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::services::JobTracker;
use crate::domain::entities::ImportJob;
use crate::domain::ports::import_backend::ImportBackend;

/// Background task that polls the backend for the tracked job until it
/// reaches a terminal status. Runs for the lifetime of the process and
/// picks up every newly started job.
pub struct JobPoller {
    tracker: JobTracker,
    backend: Arc<dyn ImportBackend>,
    interval: Duration,
    cancel_token: CancellationToken,
}

impl JobPoller {
    pub fn new(tracker: JobTracker, backend: Arc<dyn ImportBackend>, interval: Duration) -> Self {
        Self {
            tracker,
            backend,
            interval,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn start(&self) -> tokio::task::JoinHandle<()> {
        let tracker = self.tracker.clone();
        let backend = self.backend.clone();
        let interval = self.interval;
        let token = self.cancel_token.clone();

        tokio::spawn(async move {
            info!("Job poller started (every {:?})", interval);
            let mut rx = tracker.subscribe();

            loop {
                let active_job = active_job_id(&rx.borrow_and_update());

                match active_job {
                    Some(job_id) => {
                        Self::poll_until_settled(
                            &tracker, &backend, interval, &token, &mut rx, &job_id,
                        )
                        .await;
                        if token.is_cancelled() {
                            break;
                        }
                    }
                    None => {
                        tokio::select! {
                            _ = token.cancelled() => break,
                            changed = rx.changed() => {
                                if changed.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                }
            }

            info!("Job poller stopped");
        })
    }

    async fn poll_until_settled(
        tracker: &JobTracker,
        backend: &Arc<dyn ImportBackend>,
        interval: Duration,
        token: &CancellationToken,
        rx: &mut watch::Receiver<Option<ImportJob>>,
        job_id: &str,
    ) {
        debug!("Polling import job {}", job_id);

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = token.cancelled() => return,
                changed = rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    let tracking = active_job_id(&rx.borrow_and_update()).as_deref() == Some(job_id);
                    if !tracking {
                        debug!("Stopped polling import job {}", job_id);
                        return;
                    }
                }
                _ = ticker.tick() => {
                    metrics::counter!("syncar_job_polls_total").increment(1);

                    let result = tokio::select! {
                        _ = token.cancelled() => return,
                        result = backend.job_status(job_id) => result,
                    };

                    match result {
                        Ok(report) => {
                            let terminal = report.status.is_terminal();
                            tracker.apply_report(job_id, &report).await;
                            if terminal {
                                return;
                            }
                        }
                        Err(e) => {
                            metrics::counter!("syncar_job_poll_failures_total").increment(1);
                            warn!("Failed to poll import job {}: {}", job_id, e);
                        }
                    }
                }
            }
        }
    }

    pub fn stop(&self) {
        self.cancel_token.cancel();
    }
}

fn active_job_id(job: &Option<ImportJob>) -> Option<String> {
    job.as_ref()
        .filter(|job| job.status.is_active())
        .map(|job| job.job_id.clone())
}
