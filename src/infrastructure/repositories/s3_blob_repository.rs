use super::blob_repository::BlobRepository;
use async_trait::async_trait;
use aws_sdk_s3::{error::DisplayErrorContext, Client as S3Client};
use std::sync::Arc;

/// AWS S3 implementation of the blob repository
pub struct S3BlobRepository {
    s3_client: Arc<S3Client>,
}

impl S3BlobRepository {
    pub fn new(s3_client: Arc<S3Client>) -> Self {
        Self { s3_client }
    }
}

#[async_trait]
impl BlobRepository for S3BlobRepository {
    async fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();

        let result = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    bucket = bucket,
                    key = key,
                    "AWS S3 get_object failed"
                );
                format!("AWS S3 error: {}", DisplayErrorContext(&e))
            })?;

        let body = result.body.collect().await.map_err(|e| {
            tracing::error!(error = %e, key = key, "Failed to collect object body from S3");
            format!("Failed to read object body: {}", e)
        })?;

        let bytes = body.into_bytes().to_vec();

        tracing::debug!(
            bucket = bucket,
            key = key,
            size_bytes = bytes.len(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Object downloaded from S3"
        );

        Ok(bytes)
    }
}
