use crate::domain::entities::{ImportJob, JobStatus, JobStatusReport, JobType, JobUpdate};
use crate::domain::errors::UpstreamError;
use crate::domain::ports::import_backend::ImportBackend;
use crate::domain::ports::key_value_store::KeyValueStore;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

pub const CURRENT_JOB_KEY: &str = "currentImportJob";

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("No import job is being tracked")]
    NoJob,
    #[error("Import job {job_id} already finished as {status}")]
    NotActive { job_id: String, status: JobStatus },
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Owner of the single tracked import job.
///
/// The current value lives in a watch channel so the poller and the HTTP
/// layer can observe it; every mutation is written through to durable
/// storage under `currentImportJob`.
#[derive(Clone)]
pub struct JobTracker {
    current: Arc<watch::Sender<Option<ImportJob>>>,
    // serializes mutate-then-persist so storage sees writes in order
    write_lock: Arc<Mutex<()>>,
    storage: Arc<dyn KeyValueStore>,
    backend: Arc<dyn ImportBackend>,
}

impl JobTracker {
    pub fn new(storage: Arc<dyn KeyValueStore>, backend: Arc<dyn ImportBackend>) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            current: Arc::new(tx),
            write_lock: Arc::new(Mutex::new(())),
            storage,
            backend,
        }
    }

    /// Restores a stored job if it was still pending or running; anything
    /// else left in storage is discarded.
    pub async fn hydrate(&self) {
        let _guard = self.write_lock.lock().await;

        let raw = match self.storage.get(CURRENT_JOB_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Failed to read stored import job: {}", e);
                return;
            }
        };

        match serde_json::from_str::<ImportJob>(&raw) {
            Ok(job) if job.status.is_active() => {
                tracing::info!(
                    "Resuming import job {} ({}, {}%)",
                    job.job_id,
                    job.status,
                    job.progress
                );
                self.current.send_replace(Some(job));
            }
            Ok(job) => {
                tracing::debug!("Discarding finished import job {} ({})", job.job_id, job.status);
                self.remove_stored().await;
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable stored import job: {}", e);
                self.remove_stored().await;
            }
        }
    }

    /// Starts tracking a job, replacing whatever was tracked before.
    pub async fn start_job(&self, job_id: impl Into<String>, job_type: JobType) -> ImportJob {
        let job = ImportJob::new(job_id.into(), job_type, Utc::now());

        let _guard = self.write_lock.lock().await;
        if let Some(previous) = self.current.send_replace(Some(job.clone())) {
            if previous.job_id != job.job_id {
                tracing::info!("Import job {} replaced by {}", previous.job_id, job.job_id);
            }
        }
        tracing::info!("Tracking {} import job {}", job.job_type.title(), job.job_id);
        self.persist(Some(&job)).await;

        job
    }

    /// Merges a partial update; does nothing without a tracked job.
    pub async fn update_job(&self, update: JobUpdate) -> Option<ImportJob> {
        let _guard = self.write_lock.lock().await;

        let mut updated = None;
        self.current.send_if_modified(|current| match current {
            Some(job) => {
                job.apply(update);
                updated = Some(job.clone());
                true
            }
            None => false,
        });

        if let Some(job) = &updated {
            self.persist(Some(job)).await;
        }
        updated
    }

    /// Folds a poll response into the tracked job. Returns false when the
    /// response is stale: the job was closed, replaced or already settled.
    pub async fn apply_report(&self, job_id: &str, report: &JobStatusReport) -> bool {
        let _guard = self.write_lock.lock().await;

        let mut updated = None;
        self.current.send_if_modified(|current| match current {
            Some(job) if job.job_id == job_id && job.status.is_active() => {
                job.apply(JobUpdate::from(report));
                updated = Some(job.clone());
                true
            }
            _ => false,
        });

        match &updated {
            Some(job) => {
                if job.status.is_terminal() {
                    tracing::info!("Import job {} finished as {}", job.job_id, job.status);
                }
                self.persist(Some(job)).await;
                true
            }
            None => {
                tracing::debug!("Ignoring stale status report for job {}", job_id);
                false
            }
        }
    }

    /// Flips the minimized flag. Polling is unaffected.
    pub async fn toggle_minimize(&self) -> Option<ImportJob> {
        let minimized = self.current.borrow().as_ref().map(|job| !job.is_minimized)?;
        self.update_job(JobUpdate {
            is_minimized: Some(minimized),
            ..Default::default()
        })
        .await
    }

    /// Asks the backend to stop an active job, then marks it cancelled
    /// whatever the response body says. On failure the job is left untouched.
    pub async fn cancel_job(&self) -> Result<ImportJob, JobError> {
        let (job_id, status) = self
            .current
            .borrow()
            .as_ref()
            .map(|job| (job.job_id.clone(), job.status))
            .ok_or(JobError::NoJob)?;
        if status.is_terminal() {
            return Err(JobError::NotActive { job_id, status });
        }

        if let Err(e) = self.backend.cancel_job(&job_id).await {
            tracing::error!("Failed to cancel import job {}: {}", job_id, e);
            return Err(e.into());
        }

        let _guard = self.write_lock.lock().await;
        let mut cancelled = None;
        self.current.send_if_modified(|current| match current {
            Some(job) if job.job_id == job_id && job.status.is_active() => {
                job.apply(JobUpdate::cancelled());
                cancelled = Some(job.clone());
                true
            }
            _ => false,
        });

        match cancelled {
            Some(job) => {
                tracing::info!("Import job {} cancelled", job.job_id);
                self.persist(Some(&job)).await;
                Ok(job)
            }
            // closed, replaced or settled while the request was in flight
            None => Err(JobError::NoJob),
        }
    }

    /// Stops tracking the job, whatever its status.
    pub async fn close_job(&self) -> Option<ImportJob> {
        let _guard = self.write_lock.lock().await;
        let closed = self.current.send_replace(None);
        self.remove_stored().await;
        if let Some(job) = &closed {
            tracing::debug!("Closed import job {}", job.job_id);
        }
        closed
    }

    pub fn current(&self) -> Option<ImportJob> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ImportJob>> {
        self.current.subscribe()
    }

    async fn persist(&self, job: Option<&ImportJob>) {
        let job = match job {
            Some(job) => job,
            None => return self.remove_stored().await,
        };

        match serde_json::to_string(job) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(CURRENT_JOB_KEY, &raw).await {
                    tracing::warn!("Failed to persist import job {}: {}", job.job_id, e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize import job {}: {}", job.job_id, e),
        }
    }

    async fn remove_stored(&self) {
        if let Err(e) = self.storage.remove(CURRENT_JOB_KEY).await {
            tracing::warn!("Failed to remove stored import job: {}", e);
        }
    }
}
