use crate::{
    domain::entities::Toast,
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

pub async fn list_toasts(State(state): State<AppState>) -> Json<Vec<Toast>> {
    Json(state.notifications.toasts().await)
}

pub async fn dismiss_toast(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if state.notifications.remove_toast(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Toast {} not found", id)))
    }
}
