use crate::{
    application::services::{AccessDecision, PermissionService},
    domain::entities::Page,
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

/// Route guard for a console page: 200 when the page may render, otherwise
/// the error carries where to go instead.
pub async fn check_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> ApiResult<Json<Value>> {
    let page: Page = page.parse().map_err(ApiError::NotFound)?;
    let snapshot = state.session.snapshot().await;

    match PermissionService::check_access(&snapshot, page) {
        AccessDecision::Pending => Err(ApiError::Loading),
        AccessDecision::Login => Err(ApiError::Unauthorized),
        AccessDecision::Denied => Err(ApiError::Forbidden(format!(
            "You do not have access to {}",
            page.label()
        ))),
        AccessDecision::Granted => Ok(Json(json!({
            "page": page,
            "label": page.label(),
            "path": page.path(),
        }))),
    }
}
