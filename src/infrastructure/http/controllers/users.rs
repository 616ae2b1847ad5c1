use crate::{
    domain::entities::{CreateUserRequest, UpdateUserRequest, User},
    infrastructure::http::middleware::{ApiResult, AppState, AuthenticatedUser},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<User>>> {
    let users = state.api.list_users(&auth_user.token).await?;
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(mut request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    request.validate()?;

    let user = state.api.create_user(&auth_user.token, &request).await?;
    tracing::info!("User {} created by {}", user.username, auth_user.user.username);
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(mut request): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    request.validate()?;

    let user = state.api.update_user(&auth_user.token, id, &request).await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.api.delete_user(&auth_user.token, id).await?;
    tracing::info!("User {} deleted by {}", id, auth_user.user.username);
    Ok(StatusCode::NO_CONTENT)
}
