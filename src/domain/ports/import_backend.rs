use crate::domain::entities::JobStatusReport;
use crate::domain::errors::UpstreamResult;
use async_trait::async_trait;

/// Job endpoints of the backend that the tracker and poller depend on.
#[async_trait]
pub trait ImportBackend: Send + Sync {
    /// Current status of a backend job
    async fn job_status(&self, job_id: &str) -> UpstreamResult<JobStatusReport>;

    /// Ask the backend to stop a job; the response body is not inspected
    async fn cancel_job(&self, job_id: &str) -> UpstreamResult<()>;
}
