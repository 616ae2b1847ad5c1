use crate::{
    domain::entities::{
        CategoriesDeleted, CategoryDeletion, CategoryList, CategorySelection,
        DeleteCategoriesRequest, ImportStarted, Importer, ImporterConfigs, JobType,
        ProductImportRequest,
    },
    infrastructure::http::middleware::{ApiError, ApiResult, AppState},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

fn parse_importer(importer: &str) -> ApiResult<Importer> {
    importer.parse().map_err(ApiError::NotFound)
}

pub async fn get_configs(State(state): State<AppState>) -> ApiResult<Json<ImporterConfigs>> {
    let configs = state.api.importer_configs().await?;
    Ok(Json(configs))
}

pub async fn save_configs(
    State(state): State<AppState>,
    Json(configs): Json<ImporterConfigs>,
) -> ApiResult<StatusCode> {
    for config in &configs.configs {
        config.validate()?;
    }

    state.api.save_importer_configs(&configs).await?;
    state
        .notifications
        .success("Importer settings saved")
        .await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_categories(
    State(state): State<AppState>,
    Path(importer): Path<String>,
) -> ApiResult<Json<CategoryList>> {
    let importer = parse_importer(&importer)?;
    let categories = state.api.importer_categories(importer).await?;
    Ok(Json(categories))
}

/// Starts a categories import. Background imports hand back a job id that
/// becomes the tracked job; an inline import answers with the saved count.
pub async fn import_categories(
    State(state): State<AppState>,
    Path(importer): Path<String>,
) -> ApiResult<(StatusCode, Json<ImportStarted>)> {
    let importer = parse_importer(&importer)?;
    let started = state.api.import_categories(importer).await?;

    if let Some(job_id) = started.job_id.as_deref() {
        state.jobs.start_job(job_id, JobType::Categories).await;
        return Ok((StatusCode::ACCEPTED, Json(started)));
    }

    if started.success {
        let count = started.saved.or(started.total).unwrap_or(0);
        let mut message = format!(
            "Import complete!\n\nSaved {} categories to the database",
            count
        );
        if let Some(detail) = started.message.as_deref().filter(|m| !m.is_empty()) {
            message.push_str("\n\n");
            message.push_str(detail);
        }
        state.notifications.success(message).await;
    }

    Ok((StatusCode::OK, Json(started)))
}

pub async fn save_category_selection(
    State(state): State<AppState>,
    Path(importer): Path<String>,
    Json(selection): Json<CategorySelection>,
) -> ApiResult<StatusCode> {
    let importer = parse_importer(&importer)?;
    state
        .api
        .save_category_selection(importer, &selection)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Deletes the selected categories, and their products, for one importer.
pub async fn delete_categories(
    State(state): State<AppState>,
    Path(importer): Path<String>,
    Json(deletion): Json<CategoryDeletion>,
) -> ApiResult<Json<CategoriesDeleted>> {
    let importer = parse_importer(&importer)?;
    if deletion.category_ids.is_empty() {
        return Err(ApiError::BadRequest(
            "No categories selected for deletion".to_string(),
        ));
    }

    let result = async {
        let importers = state.api.list_importers().await?;
        let record = importers
            .iter()
            .find(|record| record.is(importer))
            .ok_or_else(|| {
                ApiError::NotFound(format!("Importer {} not found", importer.display_name()))
            })?;

        let request = DeleteCategoriesRequest {
            category_ids: deletion.category_ids.clone(),
            importer_id: record.id,
        };
        Ok::<_, ApiError>(state.api.delete_categories(&request).await?)
    }
    .await;

    match result {
        Ok(deleted) => {
            tracing::info!(
                "Deleted {} {} categories ({} products)",
                deleted.deleted_count,
                importer,
                deleted.products_deleted
            );
            state
                .notifications
                .success(format!(
                    "{} categories deleted successfully",
                    deleted.deleted_count
                ))
                .await;
            Ok(Json(deleted))
        }
        Err(err) => {
            state.notifications.error(err.to_string()).await;
            Err(err)
        }
    }
}

pub async fn import_products(
    State(state): State<AppState>,
    Path(importer): Path<String>,
    Json(request): Json<ProductImportRequest>,
) -> ApiResult<(StatusCode, Json<ImportStarted>)> {
    let importer = parse_importer(&importer)?;
    if request.selected_categories.is_empty() {
        return Err(ApiError::BadRequest(
            "Select at least one category to import".to_string(),
        ));
    }

    let started = state.api.import_products(importer, &request).await?;
    match started.job_id.as_deref() {
        Some(job_id) => {
            state.jobs.start_job(job_id, JobType::Products).await;
            Ok((StatusCode::ACCEPTED, Json(started)))
        }
        None => Err(ApiError::BadGateway(
            "The backend did not return a job id".to_string(),
        )),
    }
}
