use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::ApiMode;
use crate::domain::entities::{
    CategoriesDeleted, CategoryList, CategorySelection, CreateRoleRequest, CreateUserRequest,
    DeleteCategoriesRequest, ImportStarted, Importer, ImporterConfigs, ImporterRecord,
    JobStatusReport, LoginResponse, Permission, PermissionGrant,
    ProductFilter, ProductImportRequest, ProductList, Role, UpdateUserRequest, User,
};
use crate::domain::errors::{UpstreamError, UpstreamResult};
use crate::domain::ports::auth_gateway::AuthGateway;
use crate::domain::ports::import_backend::ImportBackend;

/// HTTP client for the SYNCAR backend API (`.../api/v1`).
#[derive(Clone)]
pub struct SyncarApiClient {
    base_url: String,
    mode: ApiMode,
    http_client: Client,
}

impl SyncarApiClient {
    pub fn new(base_url: &str, mode: ApiMode, timeout: Duration) -> UpstreamResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            mode,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn mode(&self) -> ApiMode {
        self.mode
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Prefix for the import and status endpoints; development mode runs
    /// imports inline with a visible browser.
    fn import_prefix(&self) -> &'static str {
        match self.mode {
            ApiMode::Production => "/importers",
            ApiMode::Development => "/dev",
        }
    }

    fn job_status_url(&self, job_id: &str) -> String {
        self.url(&format!("{}/status/{}", self.import_prefix(), job_id))
    }

    // Users

    /// GET /users
    pub async fn list_users(&self, token: &str) -> UpstreamResult<Vec<User>> {
        let request = self.http_client.get(self.url("/users")).bearer_auth(token);
        decode(send(request).await?).await
    }

    /// POST /users
    pub async fn create_user(&self, token: &str, user: &CreateUserRequest) -> UpstreamResult<User> {
        let request = self
            .http_client
            .post(self.url("/users"))
            .bearer_auth(token)
            .json(user);
        decode(send(request).await?).await
    }

    /// PUT /users/{id}
    pub async fn update_user(
        &self,
        token: &str,
        user_id: i64,
        update: &UpdateUserRequest,
    ) -> UpstreamResult<User> {
        let request = self
            .http_client
            .put(self.url(&format!("/users/{}", user_id)))
            .bearer_auth(token)
            .json(update);
        decode(send(request).await?).await
    }

    /// DELETE /users/{id}
    pub async fn delete_user(&self, token: &str, user_id: i64) -> UpstreamResult<()> {
        let request = self
            .http_client
            .delete(self.url(&format!("/users/{}", user_id)))
            .bearer_auth(token);
        send(request).await?;
        Ok(())
    }

    // Roles and permissions

    /// GET /roles, each role with its permission records
    pub async fn list_roles(&self, token: &str) -> UpstreamResult<Vec<Role>> {
        let request = self.http_client.get(self.url("/roles")).bearer_auth(token);
        decode(send(request).await?).await
    }

    /// POST /roles
    pub async fn create_role(&self, token: &str, role: &CreateRoleRequest) -> UpstreamResult<Role> {
        let request = self
            .http_client
            .post(self.url("/roles"))
            .bearer_auth(token)
            .json(role);
        decode(send(request).await?).await
    }

    /// POST /roles/{id}/permissions
    pub async fn create_permission(
        &self,
        token: &str,
        role_id: i64,
        grant: &PermissionGrant,
    ) -> UpstreamResult<Permission> {
        let request = self
            .http_client
            .post(self.url(&format!("/roles/{}/permissions", role_id)))
            .bearer_auth(token)
            .json(grant);
        decode(send(request).await?).await
    }

    /// PUT /roles/{id}/permissions/{permission_id}
    pub async fn update_permission(
        &self,
        token: &str,
        role_id: i64,
        permission_id: i64,
        grant: &PermissionGrant,
    ) -> UpstreamResult<Permission> {
        let request = self
            .http_client
            .put(self.url(&format!(
                "/roles/{}/permissions/{}",
                role_id, permission_id
            )))
            .bearer_auth(token)
            .json(grant);
        decode(send(request).await?).await
    }

    // Catalog

    /// GET /products?importer=&category=
    pub async fn list_products(&self, filter: &ProductFilter) -> UpstreamResult<ProductList> {
        let request = self
            .http_client
            .get(self.url("/products"))
            .query(&filter.query_pairs());
        let mut list: ProductList = decode(send(request).await?).await?;

        if let Some(term) = filter.search.as_deref() {
            list.products.retain(|p| p.matches_search(term));
            list.total = list.products.len();
        }

        Ok(list)
    }

    /// GET /categories
    pub async fn list_categories(&self) -> UpstreamResult<CategoryList> {
        let request = self.http_client.get(self.url("/categories"));
        decode(send(request).await?).await
    }

    /// POST /categories/delete-multiple; products under those categories
    /// go with them.
    pub async fn delete_categories(
        &self,
        request_body: &DeleteCategoriesRequest,
    ) -> UpstreamResult<CategoriesDeleted> {
        let request = self
            .http_client
            .post(self.url("/categories/delete-multiple"))
            .json(request_body);
        decode(send(request).await?).await
    }

    // Importers

    /// GET /importers
    pub async fn list_importers(&self) -> UpstreamResult<Vec<ImporterRecord>> {
        let request = self.http_client.get(self.url("/importers"));
        decode(send(request).await?).await
    }

    /// GET /importers/configs
    pub async fn importer_configs(&self) -> UpstreamResult<ImporterConfigs> {
        let request = self.http_client.get(self.url("/importers/configs"));
        decode(send(request).await?).await
    }

    /// POST /importers/configs
    pub async fn save_importer_configs(&self, configs: &ImporterConfigs) -> UpstreamResult<()> {
        let request = self
            .http_client
            .post(self.url("/importers/configs"))
            .json(configs);
        send(request).await?;
        Ok(())
    }

    /// GET /importers/categories?importer=
    pub async fn importer_categories(&self, importer: Importer) -> UpstreamResult<CategoryList> {
        let request = self
            .http_client
            .get(self.url("/importers/categories"))
            .query(&[("importer", importer.as_str())]);
        decode(send(request).await?).await
    }

    /// POST {prefix}/{importer}/import-categories
    pub async fn import_categories(&self, importer: Importer) -> UpstreamResult<ImportStarted> {
        let url = self.url(&format!(
            "{}/{}/import-categories",
            self.import_prefix(),
            importer.as_str()
        ));
        decode(send(self.http_client.post(url)).await?).await
    }

    /// POST /importers/{importer}/categories/selection
    pub async fn save_category_selection(
        &self,
        importer: Importer,
        selection: &CategorySelection,
    ) -> UpstreamResult<()> {
        let request = self
            .http_client
            .post(self.url(&format!(
                "/importers/{}/categories/selection",
                importer.as_str()
            )))
            .json(selection);
        send(request).await?;
        Ok(())
    }

    /// POST {prefix}/{importer}/import-products
    pub async fn import_products(
        &self,
        importer: Importer,
        request_body: &ProductImportRequest,
    ) -> UpstreamResult<ImportStarted> {
        let url = self.url(&format!(
            "{}/{}/import-products",
            self.import_prefix(),
            importer.as_str()
        ));
        decode(send(self.http_client.post(url).json(request_body)).await?).await
    }
}

#[async_trait]
impl AuthGateway for SyncarApiClient {
    async fn login(&self, username: &str, password: &str) -> UpstreamResult<LoginResponse> {
        let request = self
            .http_client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "username": username, "password": password }));
        decode(send(request).await?).await
    }
}

#[async_trait]
impl ImportBackend for SyncarApiClient {
    async fn job_status(&self, job_id: &str) -> UpstreamResult<JobStatusReport> {
        decode(send(self.http_client.get(self.job_status_url(job_id))).await?).await
    }

    async fn cancel_job(&self, job_id: &str) -> UpstreamResult<()> {
        // only the development backend exposes cancellation
        let url = self.url(&format!("/dev/cancel/{}", job_id));
        send(self.http_client.post(url)).await?;
        Ok(())
    }
}

/// Sends the request and turns non-2xx answers into `UpstreamError`s.
async fn send(request: RequestBuilder) -> UpstreamResult<Response> {
    let resp = request
        .send()
        .await
        .map_err(|e| UpstreamError::Transport(e.to_string()))?;

    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let detail = error_detail(&body, status);
    if status == StatusCode::UNAUTHORIZED {
        return Err(UpstreamError::Unauthorized { detail });
    }

    Err(UpstreamError::Rejected {
        status: status.as_u16(),
        detail,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> UpstreamResult<T> {
    resp.json()
        .await
        .map_err(|e| UpstreamError::Decode(e.to_string()))
}

/// FastAPI puts the message in `detail`, either a string or a validation
/// error list.
fn error_detail(body: &str, status: StatusCode) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    match detail {
        Some(serde_json::Value::String(message)) => message,
        Some(serde_json::Value::Null) | None => {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        }
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(mode: ApiMode) -> SyncarApiClient {
        SyncarApiClient::new("http://localhost:8000/api/v1/", mode, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_removed() {
        assert_eq!(
            client(ApiMode::Production).base_url(),
            "http://localhost:8000/api/v1"
        );
    }

    #[test]
    fn test_status_url_follows_mode() {
        assert_eq!(
            client(ApiMode::Production).job_status_url("j1"),
            "http://localhost:8000/api/v1/importers/status/j1"
        );
        assert_eq!(
            client(ApiMode::Development).job_status_url("j1"),
            "http://localhost:8000/api/v1/dev/status/j1"
        );
    }

    #[test]
    fn test_error_detail_string() {
        let detail = error_detail(
            r#"{"detail":"Incorrect username or password"}"#,
            StatusCode::BAD_REQUEST,
        );
        assert_eq!(detail, "Incorrect username or password");
    }

    #[test]
    fn test_error_detail_structured() {
        let detail = error_detail(
            r#"{"detail":[{"loc":["body","username"],"msg":"field required"}]}"#,
            StatusCode::UNPROCESSABLE_ENTITY,
        );
        assert!(detail.contains("field required"));
    }

    #[test]
    fn test_error_detail_fallbacks() {
        assert_eq!(error_detail("", StatusCode::NOT_FOUND), "Not Found");
        assert_eq!(
            error_detail("gateway down", StatusCode::BAD_GATEWAY),
            "gateway down"
        );
    }
}
