use crate::domain::entities::LoginResponse;
use crate::domain::errors::UpstreamResult;
use async_trait::async_trait;

/// Token issuance lives in the backend; the console only exchanges
/// credentials for a token and an identity snapshot.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> UpstreamResult<LoginResponse>;
}
