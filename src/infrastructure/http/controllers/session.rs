use crate::{
    application::services::SessionSnapshot,
    domain::entities::{LoginRequest, User},
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};
use axum::{extract::State, http::StatusCode, Json};

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<User>> {
    let username = request.username.trim();
    if username.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let user = state.session.login(username, &request.password).await?;
    Ok(Json(user))
}

pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.session.logout().await;
    StatusCode::NO_CONTENT
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot().await)
}
