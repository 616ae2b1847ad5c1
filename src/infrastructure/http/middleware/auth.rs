use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::application::services::{
    JobTracker, NotificationService, PermissionService, SessionStore,
};
use crate::domain::entities::{Page, User};
use crate::infrastructure::http::middleware::error::ApiError;
use crate::infrastructure::providers::SyncarApiClient;

#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    pub jobs: JobTracker,
    pub notifications: NotificationService,
    pub api: Arc<SyncarApiClient>,
}

/// Inserted into request extensions by `require_auth`.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

/// Requires a live session. A 401 coming back from the handler means the backend
/// rejected the token, so that session is wiped on the way out.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let snapshot = state.session.snapshot().await;
    if snapshot.loading {
        return Err(ApiError::Loading);
    }

    let (user, token) = match (snapshot.user, state.session.token().await) {
        (Some(user), Some(token)) => (user, token),
        _ => return Err(ApiError::Unauthorized),
    };

    req.extensions_mut().insert(AuthenticatedUser {
        user,
        token: token.clone(),
    });

    let response = next.run(req).await;
    if response.status() == StatusCode::UNAUTHORIZED {
        state.session.expire_token(&token).await;
    }

    Ok(response)
}

/// Requires the authenticated user's role to grant `page`. Layer it inside
/// `require_auth`.
pub async fn require_page(
    State(page): State<Page>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = req
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or(ApiError::Unauthorized)?;

    if !PermissionService::has_page(Some(&auth_user.user), page) {
        tracing::warn!(
            "Permission denied: user {} lacks page {}",
            auth_user.user.username,
            page
        );
        return Err(ApiError::Forbidden(format!(
            "You do not have access to {}",
            page.label()
        )));
    }

    Ok(next.run(req).await)
}
