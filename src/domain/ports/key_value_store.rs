use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// Durable string key/value storage that survives a console restart.
///
/// Plays the part browser local storage played for the web dashboard: a
/// cache for reload continuity, never the source of truth.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written or was removed
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> DomainResult<()>;

    /// Remove a key; removing a missing key is not an error
    async fn remove(&self, key: &str) -> DomainResult<()>;
}
