use crate::domain::synthesis::{JobSnapshot, SynthesisRequest};
use async_trait::async_trait;

/// Repository for asynchronous speech synthesis jobs.
/// Abstracts the underlying provider (AWS Polly long-running tasks).
///
/// The provider writes the finished audio into blob storage itself; this
/// repository only creates jobs and reports their status.
#[async_trait]
pub trait SynthesisRepository: Send + Sync {
    /// Create a synthesis job and return its identifier immediately
    ///
    /// # Errors
    /// Returns error if the provider rejects the request or is unreachable
    async fn submit(&self, request: &SynthesisRequest) -> Result<String, String>;

    /// Fetch the current status of a job
    ///
    /// Provider statuses outside completed/failed are reported as in-progress.
    async fn poll(&self, job_id: &str) -> Result<JobSnapshot, String>;
}
