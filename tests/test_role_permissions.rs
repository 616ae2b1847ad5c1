mod helpers;

use axum::http::{Method, StatusCode};
use helpers::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_roles(console: &TestConsole) {
    Mock::given(method("GET"))
        .and(path("/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            role_json(1, "Admin", &[("dashboard", true), ("configuracion", true)]),
            role_json(2, "Viewer", &[("dashboard", true), ("catalogo", false)]),
        ])))
        .mount(&console.server)
        .await;
}

#[tokio::test]
async fn test_existing_permission_is_updated() {
    let console = spawn_console().await;
    console.login_as(admin_json()).await;
    mount_roles(&console).await;

    Mock::given(method("PUT"))
        .and(path("/roles/2/permissions/22"))
        .and(body_json(json!({ "page_name": "catalogo", "can_access": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 22,
            "role_id": 2,
            "page_name": "catalogo",
            "can_access": true,
            "created_at": "2025-01-10T12:00:00"
        })))
        .expect(1)
        .mount(&console.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/roles/2/permissions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&console.server)
        .await;

    let (status, body) = console
        .send(
            Method::PUT,
            "/api/roles/2/permissions/catalogo",
            Some(json!({ "can_access": true })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 22);
    assert_eq!(body["can_access"], true);
}

#[tokio::test]
async fn test_missing_permission_is_created() {
    let console = spawn_console().await;
    console.login_as(admin_json()).await;
    mount_roles(&console).await;

    Mock::given(method("POST"))
        .and(path("/roles/2/permissions"))
        .and(body_json(json!({ "page_name": "importers", "can_access": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 31,
            "role_id": 2,
            "page_name": "importers",
            "can_access": true
        })))
        .expect(1)
        .mount(&console.server)
        .await;

    let (status, body) = console
        .send(
            Method::PUT,
            "/api/roles/2/permissions/importers",
            Some(json!({ "can_access": true })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page_name"], "importers");
}

#[tokio::test]
async fn test_unknown_role_is_not_found() {
    let console = spawn_console().await;
    console.login_as(admin_json()).await;
    mount_roles(&console).await;

    let (status, body) = console
        .send(
            Method::PUT,
            "/api/roles/9/permissions/catalogo",
            Some(json!({ "can_access": false })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Role 9 not found");
}

#[tokio::test]
async fn test_create_role_validates_before_calling_backend() {
    let console = spawn_console().await;
    console.login_as(admin_json()).await;

    Mock::given(method("POST"))
        .and(path("/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(role_json(5, "Bodega", &[])))
        .expect(1)
        .mount(&console.server)
        .await;

    let (status, _) = console
        .send(Method::POST, "/api/roles", Some(json!({ "name": "   " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = console
        .send(
            Method::POST,
            "/api/roles",
            Some(json!({
                "name": "Bodega",
                "permissions": [{ "page_name": "catalogo", "can_access": true }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Bodega");
}

#[tokio::test]
async fn test_backend_rejection_keeps_its_status() {
    let console = spawn_console().await;
    console.login_as(admin_json()).await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Username already registered" })),
        )
        .mount(&console.server)
        .await;

    let (status, body) = console
        .send(
            Method::POST,
            "/api/users",
            Some(json!({
                "username": "ana",
                "email": "ana@syncar.cl",
                "password": "secret1",
                "role_id": 2
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username already registered");

    // only a 401 ends the session
    let (_, session) = console.get("/api/session").await;
    assert_eq!(session["authenticated"], true);
}
