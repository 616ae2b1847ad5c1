use crate::{
    domain::entities::ImportJob,
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

/// Tracked job as shown by the progress modal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(flatten)]
    pub job: ImportJob,
    pub title: &'static str,
    pub phase: u8,
    pub elapsed: String,
}

impl From<ImportJob> for JobView {
    fn from(job: ImportJob) -> Self {
        Self {
            title: job.job_type.title(),
            phase: job.phase().number(),
            elapsed: job.elapsed_display(Utc::now()),
            job,
        }
    }
}

pub async fn get_job(State(state): State<AppState>) -> Json<Option<JobView>> {
    Json(state.jobs.current().map(JobView::from))
}

pub async fn toggle_minimize(State(state): State<AppState>) -> ApiResult<Json<JobView>> {
    state
        .jobs
        .toggle_minimize()
        .await
        .map(|job| Json(JobView::from(job)))
        .ok_or_else(|| ApiError::NotFound("No import job is being tracked".to_string()))
}

pub async fn cancel_job(State(state): State<AppState>) -> ApiResult<Json<JobView>> {
    match state.jobs.cancel_job().await {
        Ok(job) => {
            state.notifications.success("Import cancelled").await;
            Ok(Json(JobView::from(job)))
        }
        Err(e) => {
            let err = ApiError::from(e);
            if !matches!(err, ApiError::NotFound(_) | ApiError::Conflict(_)) {
                state.notifications.error("Could not cancel the import").await;
            }
            Err(err)
        }
    }
}

pub async fn close_job(State(state): State<AppState>) -> StatusCode {
    state.jobs.close_job().await;
    StatusCode::NO_CONTENT
}
