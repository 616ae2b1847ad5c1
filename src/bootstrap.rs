use crate::application::services::{JobTracker, NotificationService, SessionStore};
use crate::config::Config;
use crate::domain::ports::auth_gateway::AuthGateway;
use crate::domain::ports::import_backend::ImportBackend;
use crate::domain::ports::key_value_store::KeyValueStore;
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::providers::SyncarApiClient;
use crate::infrastructure::storage::LocalKeyValueStore;
use crate::infrastructure::workers::JobPoller;
use std::sync::Arc;

/// Everything `main` needs: the router state and the poller to start.
pub struct Application {
    pub state: AppState,
    pub poller: JobPoller,
}

/// Wires the services and restores the previous session and job from
/// storage. Returns only after hydration, so no request ever sees a
/// half-loaded session.
pub async fn build_app_state(
    config: &Config,
) -> Result<Application, Box<dyn std::error::Error + Send + Sync>> {
    let storage: Arc<dyn KeyValueStore> =
        Arc::new(LocalKeyValueStore::new(config.storage_path.clone()));
    tracing::info!("Console state stored in {}", config.storage_path.display());

    let api = Arc::new(SyncarApiClient::new(
        &config.api_base_url,
        config.api_mode,
        config.http_timeout,
    )?);
    tracing::info!(
        "Backend API at {} ({:?} mode)",
        api.base_url(),
        api.mode()
    );

    let session = SessionStore::new(storage.clone(), api.clone() as Arc<dyn AuthGateway>);
    let backend = api.clone() as Arc<dyn ImportBackend>;
    let jobs = JobTracker::new(storage, backend.clone());
    let notifications = NotificationService::new(config.toast_duration);

    session.hydrate().await;
    jobs.hydrate().await;

    let poller = JobPoller::new(jobs.clone(), backend, config.poll_interval);

    Ok(Application {
        state: AppState {
            session,
            jobs,
            notifications,
            api,
        },
        poller,
    })
}
