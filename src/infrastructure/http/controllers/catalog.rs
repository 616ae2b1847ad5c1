use crate::{
    domain::entities::{CategoryList, ProductFilter, ProductList},
    infrastructure::http::middleware::{ApiResult, AppState},
};
use axum::{
    extract::{Query, State},
    Json,
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> ApiResult<Json<ProductList>> {
    let products = state.api.list_products(&filter).await?;
    Ok(Json(products))
}

pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<CategoryList>> {
    let categories = state.api.list_categories().await?;
    Ok(Json(categories))
}
