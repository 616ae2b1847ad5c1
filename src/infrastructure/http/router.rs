use crate::domain::entities::Page;
use crate::infrastructure::http::controllers as api;
use crate::infrastructure::http::middleware::{require_auth, require_page, AppState};
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    // Settings page: users, roles and importer configuration
    let configuracion = Router::new()
        .route("/api/users", get(api::users::list_users))
        .route("/api/users", post(api::users::create_user))
        .route("/api/users/:id", put(api::users::update_user))
        .route("/api/users/:id", delete(api::users::delete_user))
        .route("/api/roles", get(api::roles::list_roles))
        .route("/api/roles", post(api::roles::create_role))
        .route(
            "/api/roles/:id/permissions/:page",
            put(api::roles::set_permission),
        )
        .route("/api/importers/configs", get(api::importers::get_configs))
        .route("/api/importers/configs", post(api::importers::save_configs))
        .layer(from_fn_with_state(Page::Configuracion, require_page))
        .layer(from_fn_with_state(state.clone(), require_auth));

    let catalogo = Router::new()
        .route("/api/catalog/products", get(api::catalog::list_products))
        .route("/api/catalog/categories", get(api::catalog::list_categories))
        .layer(from_fn_with_state(Page::Catalogo, require_page))
        .layer(from_fn_with_state(state.clone(), require_auth));

    let importers = Router::new()
        .route(
            "/api/importers/:importer/categories",
            get(api::importers::list_categories),
        )
        .route(
            "/api/importers/:importer/categories/import",
            post(api::importers::import_categories),
        )
        .route(
            "/api/importers/:importer/categories/selection",
            post(api::importers::save_category_selection),
        )
        .route(
            "/api/importers/:importer/categories/delete",
            post(api::importers::delete_categories),
        )
        .route(
            "/api/importers/:importer/products/import",
            post(api::importers::import_products),
        )
        .layer(from_fn_with_state(Page::Importers, require_page))
        .layer(from_fn_with_state(state.clone(), require_auth));

    // Signed in, no page permission needed
    let protected = Router::new()
        .route("/api/navigation", get(api::navigation::list_navigation))
        .route("/api/job", get(api::jobs::get_job))
        .route("/api/job", delete(api::jobs::close_job))
        .route("/api/job/minimize", post(api::jobs::toggle_minimize))
        .route("/api/job/cancel", post(api::jobs::cancel_job))
        .route("/api/toasts", get(api::toasts::list_toasts))
        .route("/api/toasts/:id", delete(api::toasts::dismiss_toast))
        .layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/session", get(api::session::get_session))
        .route("/api/session/login", post(api::session::login))
        .route("/api/session/logout", post(api::session::logout))
        .route("/api/pages/:page", get(api::pages::check_page))
        .merge(configuracion)
        .merge(catalogo)
        .merge(importers)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}
