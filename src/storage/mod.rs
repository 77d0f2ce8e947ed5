pub mod local;
pub mod upload;

pub use local::LocalStorage;
pub use upload::UploadedFile;

use crate::error::AppResult;

/// Blob storage for uploaded files
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Store the data under `key`, returning the storage path
    async fn upload(&self, key: &str, data: &[u8]) -> AppResult<String>;

    async fn download(&self, key: &str) -> AppResult<Vec<u8>>;

    async fn delete(&self, key: &str) -> AppResult<()>;

    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Whether the backing store is reachable
    async fn health_check(&self) -> AppResult<bool>;
}
