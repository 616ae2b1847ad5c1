use serde_json::json;
use std::time::Duration;
use syncar::config::ApiMode;
use syncar::domain::entities::{Importer, JobStatus, ProductFilter};
use syncar::domain::errors::UpstreamError;
use syncar::domain::ports::auth_gateway::AuthGateway;
use syncar::domain::ports::import_backend::ImportBackend;
use syncar::infrastructure::providers::SyncarApiClient;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer, mode: ApiMode) -> SyncarApiClient {
    SyncarApiClient::new(&server.uri(), mode, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_login_sends_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "username": "ana", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-abc",
            "token_type": "bearer",
            "user": { "id": 7, "username": "ana", "email": "ana@syncar.cl" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, ApiMode::Production)
        .login("ana", "secret1")
        .await
        .unwrap();

    assert_eq!(response.access_token, "token-abc");
    assert_eq!(response.user.username, "ana");
}

#[tokio::test]
async fn test_rejection_carries_fastapi_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "detail": "Incorrect username or password" })),
        )
        .mount(&server)
        .await;

    let err = client(&server, ApiMode::Production)
        .login("ana", "wrong")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        UpstreamError::Rejected {
            status: 400,
            detail: "Incorrect username or password".to_string(),
        }
    );
}

#[tokio::test]
async fn test_unauthorized_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer good-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "username": "admin", "email": "admin@syncar.cl", "is_superuser": true }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("authorization", "Bearer stale-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Could not validate credentials"
        })))
        .mount(&server)
        .await;

    let api = client(&server, ApiMode::Production);

    let users = api.list_users("good-token").await.unwrap();
    assert_eq!(users.len(), 1);
    assert!(users[0].is_superuser);

    assert_eq!(
        api.list_users("stale-token").await.unwrap_err(),
        UpstreamError::Unauthorized {
            detail: "Could not validate credentials".to_string(),
        }
    );
}

#[tokio::test]
async fn test_products_filter_upstream_and_search_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("importer", "noriega"))
        .and(query_param("category", "frenos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [
                { "id": 1, "sku": "NOR-1", "name": "Pastilla de freno" },
                { "id": 2, "sku": "NOR-2", "name": "Disco ventilado" },
                { "id": 3, "sku": "FRE-9", "name": "Liquido DOT4" }
            ],
            "total": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = ProductFilter {
        importer: Some(Importer::Noriega),
        category: Some("frenos".to_string()),
        search: Some("fre".to_string()),
    };
    let list = client(&server, ApiMode::Production)
        .list_products(&filter)
        .await
        .unwrap();

    let skus: Vec<&str> = list.products.iter().map(|p| p.sku.as_str()).collect();
    assert_eq!(skus, vec!["NOR-1", "FRE-9"]);
    assert_eq!(list.total, 2);
}

#[tokio::test]
async fn test_job_status_path_follows_mode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/importers/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "job-1",
            "status": "RUNNING",
            "progress": 42.5,
            "total_items": 0,
            "current_item": 0,
            "result": {}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dev/status/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "progress": 100,
            "processed_items": 80
        })))
        .expect(1)
        .mount(&server)
        .await;

    let production = client(&server, ApiMode::Production)
        .job_status("job-1")
        .await
        .unwrap();
    assert_eq!(production.status, JobStatus::Running);
    assert_eq!(production.progress, 42);
    assert_eq!(production.detail(), "Importing product 31/100");

    let development = client(&server, ApiMode::Development)
        .job_status("job-1")
        .await
        .unwrap();
    assert_eq!(development.status, JobStatus::Completed);
    assert_eq!(development.detail(), "Import finished: 80 products");
}

#[tokio::test]
async fn test_cancel_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dev/cancel/job-2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, ApiMode::Production)
        .cancel_job("job-2")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_import_endpoints_follow_mode() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/importers/refax/import-products"))
        .and(body_json(json!({ "selected_categories": ["12", "15"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Product import started",
            "job_id": "job-3",
            "task_id": "celery-1"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/dev/refax/import-categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "saved": 14,
            "total": 14
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = syncar::domain::entities::ProductImportRequest {
        selected_categories: vec!["12".to_string(), "15".to_string()],
    };
    let started = client(&server, ApiMode::Production)
        .import_products(Importer::Refax, &request)
        .await
        .unwrap();
    assert_eq!(started.job_id.as_deref(), Some("job-3"));

    let inline = client(&server, ApiMode::Development)
        .import_categories(Importer::Refax)
        .await
        .unwrap();
    assert!(inline.success);
    assert_eq!(inline.job_id, None);
    assert_eq!(inline.saved, Some(14));
}

#[tokio::test]
async fn test_bulk_category_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/importers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 2, "name": "Alsacia", "created_at": "2025-01-10T12:00:00" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/categories/delete-multiple"))
        .and(body_json(json!({ "category_ids": [11, 12], "importer_id": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "deleted_count": 2,
            "products_deleted": 0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, ApiMode::Production);
    let importers = api.list_importers().await.unwrap();
    assert!(importers[0].is(Importer::Alsacia));

    let deleted = api
        .delete_categories(&syncar::domain::entities::DeleteCategoriesRequest {
            category_ids: vec![11, 12],
            importer_id: importers[0].id,
        })
        .await
        .unwrap();
    assert!(deleted.success);
    assert_eq!(deleted.deleted_count, 2);
    assert_eq!(deleted.message, None);
}

#[tokio::test]
async fn test_decode_and_transport_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server, ApiMode::Production)
        .list_categories()
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Decode(_)));

    let unreachable =
        SyncarApiClient::new("http://127.0.0.1:1", ApiMode::Production, Duration::from_secs(2))
            .unwrap();
    let err = unreachable.list_categories().await.unwrap_err();
    assert!(matches!(err, UpstreamError::Transport(_)));
}
