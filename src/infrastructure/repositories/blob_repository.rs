use async_trait::async_trait;

/// Read access to the object store holding finished narrations
#[async_trait]
pub trait BlobRepository: Send + Sync {
    /// Fetch the full object body
    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String>;
}
