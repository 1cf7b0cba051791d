use super::error::RetrievalError;
use crate::domain::shared::{retry_with_backoff, Clock, RetryPolicy};
use crate::infrastructure::repositories::BlobRepository;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Copies finished narrations from blob storage to the local filesystem
pub struct ArtifactRetriever {
    blob_repo: Arc<dyn BlobRepository>,
    clock: Arc<dyn Clock>,
    retry_policy: RetryPolicy,
}

impl ArtifactRetriever {
    pub fn new(
        blob_repo: Arc<dyn BlobRepository>,
        clock: Arc<dyn Clock>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            blob_repo,
            clock,
            retry_policy,
        }
    }

    /// Download `bucket/remote_key` into `local_path`.
    ///
    /// The parent directory of `local_path` must already exist; it is never
    /// created here.
    pub async fn retrieve(
        &self,
        bucket: &str,
        remote_key: &str,
        local_path: &Path,
    ) -> Result<(), RetrievalError> {
        let bytes = retry_with_backoff(
            &self.retry_policy,
            self.clock.as_ref(),
            "download_artifact",
            || self.blob_repo.download(bucket, remote_key),
        )
        .await
        .map_err(|message| RetrievalError::Download {
            bucket: bucket.to_string(),
            key: remote_key.to_string(),
            message,
        })?;

        let size_bytes = bytes.len();
        let target = local_path.to_path_buf();
        tokio::task::spawn_blocking(move || write_atomically(&target, &bytes))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
            .and_then(|written| written)
            .map_err(|source| RetrievalError::Write {
                path: local_path.display().to_string(),
                source,
            })?;

        tracing::info!(
            key = remote_key,
            path = %local_path.display(),
            size_bytes,
            "Downloaded audio"
        );

        Ok(())
    }
}

/// Stage the bytes in a temporary file next to `path` and rename it into place,
/// so `path` only ever holds a complete download.
fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;

    Ok(())
}
