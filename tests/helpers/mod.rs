#![allow(dead_code)]
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::path::Path;
use syncar::bootstrap::{build_app_state, Application};
use syncar::config::Config;
use syncar::infrastructure::http::build_router;
use syncar::infrastructure::http::middleware::AppState;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMESTAMP: &str = "2025-01-10T12:00:00";

/// A console wired to a mock backend and a throwaway storage directory.
pub struct TestConsole {
    pub server: MockServer,
    pub storage: TempDir,
    pub app: Application,
    pub router: Router,
}

impl TestConsole {
    pub fn state(&self) -> &AppState {
        &self.app.state
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.storage.path().join(key)).ok()
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        send(&self.router, method, uri, body).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    /// Signs in through the console API as the given backend user.
    pub async fn login_as(&self, user: Value) -> (StatusCode, Value) {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(login_response(user)))
            .mount(&self.server)
            .await;

        self.send(
            Method::POST,
            "/api/session/login",
            Some(json!({ "username": "ana", "password": "secret1" })),
        )
        .await
    }
}

pub fn test_config(server: &MockServer, storage: &Path, vars: &[(&str, &str)]) -> Config {
    let uri = server.uri();
    let storage = storage.display().to_string();
    let mut all: Vec<(String, String)> = vec![
        ("SYNCAR_API_URL".to_string(), uri),
        ("SYNCAR_STORAGE_PATH".to_string(), storage),
        ("SYNCAR_HTTP_TIMEOUT_SECS".to_string(), "5".to_string()),
    ];
    all.extend(vars.iter().map(|(k, v)| (k.to_string(), v.to_string())));

    Config::from_vars(|name| {
        all.iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    })
    .expect("test config")
}

pub async fn spawn_console() -> TestConsole {
    spawn_console_with(&[]).await
}

pub async fn spawn_console_with(vars: &[(&str, &str)]) -> TestConsole {
    let server = MockServer::start().await;
    let storage = tempfile::tempdir().expect("tempdir");
    console_from(server, storage, vars).await
}

/// Boots a console over an existing storage directory, as after a restart.
pub async fn console_from(server: MockServer, storage: TempDir, vars: &[(&str, &str)]) -> TestConsole {
    let config = test_config(&server, storage.path(), vars);
    let app = build_app_state(&config).await.expect("app state");
    let router = build_router(app.state.clone());

    TestConsole {
        server,
        storage,
        app,
        router,
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, value)
}

pub fn role_json(id: i64, name: &str, grants: &[(&str, bool)]) -> Value {
    let permissions: Vec<Value> = grants
        .iter()
        .enumerate()
        .map(|(i, (page, can_access))| {
            json!({
                "id": id * 10 + i as i64 + 1,
                "role_id": id,
                "page_name": page,
                "can_access": can_access,
                "created_at": TIMESTAMP
            })
        })
        .collect();

    json!({
        "id": id,
        "name": name,
        "description": null,
        "is_active": true,
        "permissions": permissions,
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP
    })
}

pub fn user_json(username: &str, is_superuser: bool, grants: &[(&str, bool)]) -> Value {
    json!({
        "id": 7,
        "username": username,
        "email": format!("{}@syncar.cl", username),
        "full_name": null,
        "is_active": true,
        "is_superuser": is_superuser,
        "role_id": 2,
        "role": role_json(2, "Viewer", grants),
        "created_at": TIMESTAMP,
        "updated_at": TIMESTAMP
    })
}

pub fn admin_json() -> Value {
    user_json("admin", true, &[])
}

pub fn login_response(user: Value) -> Value {
    json!({
        "access_token": "token-abc",
        "token_type": "bearer",
        "user": user
    })
}

pub fn stored_job(job_id: &str, status: &str, progress: u8) -> String {
    json!({
        "jobId": job_id,
        "jobType": "products",
        "status": status,
        "progress": progress,
        "currentStep": "STEP 3: EXTRACTION",
        "detailedStatus": "Importing product 10/40",
        "startedAt": "2025-01-10T12:00:00Z",
        "isMinimized": true
    })
    .to_string()
}
