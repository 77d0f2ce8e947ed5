use super::Storage;
use crate::error::{AppError, AppResult};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Storage rooted in a local directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    /// Create the storage, making sure the root directory exists
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        tracing::info!("Local file storage at {}", root.display());
        Ok(Self { root })
    }

    /// Resolve a key below the root. Absolute keys and `..` are rejected.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key);
        let confined = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !confined {
            return Err(AppError::storage(format!("Invalid storage key: {}", key)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait::async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, key: &str, data: &[u8]) -> AppResult<String> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write {}: {}", key, e)))?;

        tracing::info!("Stored file {} ({} bytes)", key, data.len());
        Ok(key.to_string())
    }

    async fn download(&self, key: &str) -> AppResult<Vec<u8>> {
        let path = self.resolve(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::not_found("File")),
            Err(e) => Err(AppError::storage(format!("Failed to read {}: {}", key, e))),
        }
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Deleted file {}", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!("Failed to delete {}: {}", key, e))),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.resolve(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root).await.is_ok_and(|m| m.is_dir()))
    }
}
