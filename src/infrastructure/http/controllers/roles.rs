use crate::{
    domain::entities::{CreateRoleRequest, Permission, PermissionGrant, Role},
    infrastructure::http::middleware::{ApiError, ApiResult, AppState, AuthenticatedUser},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

pub async fn list_roles(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Vec<Role>>> {
    let roles = state.api.list_roles(&auth_user.token).await?;
    Ok(Json(roles))
}

pub async fn create_role(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<Role>)> {
    request.validate()?;

    let role = state.api.create_role(&auth_user.token, &request).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

#[derive(Debug, Deserialize)]
pub struct SetPermissionRequest {
    pub can_access: bool,
}

/// Sets access to one page for a role: updates the existing record for the
/// page, or creates one when the role has none.
pub async fn set_permission(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path((role_id, page_name)): Path<(i64, String)>,
    Json(request): Json<SetPermissionRequest>,
) -> ApiResult<Json<Permission>> {
    if page_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Page name is required".to_string()));
    }

    let roles = state.api.list_roles(&auth_user.token).await?;
    let role = roles
        .iter()
        .find(|role| role.id == role_id)
        .ok_or_else(|| ApiError::NotFound(format!("Role {} not found", role_id)))?;

    let grant = PermissionGrant {
        page_name: page_name.clone(),
        can_access: request.can_access,
    };

    let permission = match role.permission_for(&page_name) {
        Some(existing) => {
            state
                .api
                .update_permission(&auth_user.token, role_id, existing.id, &grant)
                .await?
        }
        None => {
            state
                .api
                .create_permission(&auth_user.token, role_id, &grant)
                .await?
        }
    };

    tracing::info!(
        "Role {} access to {} set to {} by {}",
        role.name,
        page_name,
        request.can_access,
        auth_user.user.username
    );
    Ok(Json(permission))
}
