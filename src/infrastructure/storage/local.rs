use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::key_value_store::KeyValueStore;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

/// One file per key under `base_path`.
#[derive(Clone)]
pub struct LocalKeyValueStore {
    base_path: PathBuf,
}

impl LocalKeyValueStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Keys map straight to file names, so only a safe alphabet is allowed
    fn resolve_path(&self, key: &str) -> DomainResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DomainError::ValidationError(format!(
                "Invalid storage key: {:?}",
                key
            )));
        }

        Ok(self.base_path.join(key))
    }
}

#[async_trait]
impl KeyValueStore for LocalKeyValueStore {
    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let file_path = self.resolve_path(key)?;
        match fs::read_to_string(&file_path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Internal(format!(
                "Failed to read {}: {}",
                key, e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        let file_path = self.resolve_path(key)?;

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| DomainError::Internal(format!("Failed to create directory: {}", e)))?;

        // write-then-rename so a crash never leaves a half-written value
        let tmp_path = file_path.with_extension("tmp");
        fs::write(&tmp_path, value)
            .await
            .map_err(|e| DomainError::Internal(format!("Failed to write {}: {}", key, e)))?;
        fs::rename(&tmp_path, &file_path)
            .await
            .map_err(|e| DomainError::Internal(format!("Failed to write {}: {}", key, e)))
    }

    async fn remove(&self, key: &str) -> DomainResult<()> {
        let file_path = self.resolve_path(key)?;
        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Internal(format!(
                "Failed to delete {}: {}",
                key, e
            ))),
        }
    }
}
