use crate::application::services::permission_service::PermissionService;
use crate::domain::entities::User;
use crate::domain::errors::UpstreamError;
use crate::domain::ports::auth_gateway::AuthGateway;
use crate::domain::ports::key_value_store::KeyValueStore;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// The backend refused the credentials; carries its `detail` message.
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Upstream(UpstreamError),
}

/// Read-only view of the session handed to route guards and handlers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub authenticated: bool,
    pub user: Option<User>,
}

#[derive(Debug)]
struct SessionState {
    loading: bool,
    token: Option<String>,
    user: Option<User>,
}

/// Owner of the console's single authenticated session.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    storage: Arc<dyn KeyValueStore>,
    auth: Arc<dyn AuthGateway>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, auth: Arc<dyn AuthGateway>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                loading: true,
                token: None,
                user: None,
            })),
            storage,
            auth,
        }
    }

    /// Restores token and user from durable storage. Reports `loading`
    /// until it has run once.
    pub async fn hydrate(&self) {
        let token = match self.storage.get(TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read stored token: {}", e);
                None
            }
        };

        let user = match self.storage.get(USER_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Ignoring corrupt stored user: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read stored user: {}", e);
                None
            }
        };

        let mut state = self.state.write().await;
        state.loading = false;
        if token.is_some() && user.is_some() {
            if let Some(user) = &user {
                tracing::info!("Restored session for {}", user.username);
            }
            state.token = token;
            state.user = user;
        } else {
            state.token = None;
            state.user = None;
        }
    }

    /// Exchanges credentials for a token. On failure nothing is persisted
    /// and the previous state is kept.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, LoginError> {
        let response = match self.auth.login(username, password).await {
            Ok(response) => response,
            // bad credentials come back as 401 with a `detail`
            Err(UpstreamError::Rejected { detail, .. })
            | Err(UpstreamError::Unauthorized { detail }) => {
                tracing::info!("Login rejected for {}: {}", username, detail);
                let detail = if detail.trim().is_empty() {
                    "Login failed".to_string()
                } else {
                    detail
                };
                return Err(LoginError::Rejected(detail));
            }
            Err(e) => {
                tracing::error!("Login request failed: {}", e);
                return Err(LoginError::Upstream(e));
            }
        };

        if let Err(e) = self.storage.set(TOKEN_KEY, &response.access_token).await {
            tracing::warn!("Failed to persist token: {}", e);
        }
        match serde_json::to_string(&response.user) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(USER_KEY, &raw).await {
                    tracing::warn!("Failed to persist user: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize user: {}", e),
        }

        let mut state = self.state.write().await;
        state.loading = false;
        state.token = Some(response.access_token);
        state.user = Some(response.user.clone());

        metrics::counter!("syncar_logins_total").increment(1);
        tracing::info!("User {} logged in", response.user.username);

        Ok(response.user)
    }

    /// Clears the session everywhere. Tokens are not revoked upstream.
    pub async fn logout(&self) {
        self.clear().await;
        tracing::info!("Session closed");
    }

    /// Expires the session only if it still holds `token`. A request that
    /// started under an older session must not log out a newer one.
    pub async fn expire_token(&self, token: &str) -> bool {
        let mut state = self.state.write().await;
        if state.token.as_deref() != Some(token) {
            tracing::debug!("Ignoring 401 for a session that is no longer current");
            return false;
        }

        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                tracing::warn!("Failed to remove {}: {}", key, e);
            }
        }
        let username = state.user.take().map(|u| u.username);
        state.token = None;
        state.loading = false;
        tracing::warn!(
            "Backend rejected the session token, logged out {}",
            username.as_deref().unwrap_or("<anonymous>")
        );
        true
    }

    async fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key).await {
                tracing::warn!("Failed to remove {}: {}", key, e);
            }
        }

        let mut state = self.state.write().await;
        state.loading = false;
        state.token = None;
        state.user = None;
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            loading: state.loading,
            authenticated: state.token.is_some() && state.user.is_some(),
            user: state.user.clone(),
        }
    }

    pub async fn token(&self) -> Option<String> {
        let state = self.state.read().await;
        match (&state.token, &state.user) {
            (Some(token), Some(_)) => Some(token.clone()),
            _ => None,
        }
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        let state = self.state.read().await;
        state.token.is_some() && state.user.is_some()
    }

    pub async fn has_permission(&self, page_name: &str) -> bool {
        let state = self.state.read().await;
        PermissionService::has_permission(state.user.as_ref(), page_name)
    }
}
