use crate::{
    application::services::PermissionService,
    domain::entities::Page,
    infrastructure::http::middleware::AuthenticatedUser,
};
use axum::{Extension, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct NavigationItem {
    pub page: Page,
    pub label: &'static str,
    pub path: &'static str,
}

/// Menu entries for the signed-in user, in menu order.
pub async fn list_navigation(
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Json<Vec<NavigationItem>> {
    let items = PermissionService::visible_pages(Some(&auth_user.user))
        .into_iter()
        .map(|page| NavigationItem {
            page,
            label: page.label(),
            path: page.path(),
        })
        .collect();
    Json(items)
}
