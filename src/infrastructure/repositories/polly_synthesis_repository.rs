use super::synthesis_repository::SynthesisRepository;
use crate::domain::synthesis::{JobSnapshot, JobStatus, SynthesisRequest};
use async_trait::async_trait;
use aws_sdk_polly::{
    error::DisplayErrorContext,
    types::{Engine, OutputFormat, TaskStatus, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly implementation of the synthesis repository, using
/// long-running speech synthesis tasks that write into S3
pub struct PollySynthesisRepository {
    polly_client: Arc<PollyClient>,
}

impl PollySynthesisRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    /// Map a Polly task status onto the pipeline's vocabulary.
    /// Scheduled and any status this SDK does not know keep the job polling.
    fn map_status(status: Option<&TaskStatus>) -> JobStatus {
        match status {
            Some(TaskStatus::Completed) => JobStatus::Completed,
            Some(TaskStatus::Failed) => JobStatus::Failed,
            _ => JobStatus::InProgress,
        }
    }
}

#[async_trait]
impl SynthesisRepository for PollySynthesisRepository {
    async fn submit(&self, request: &SynthesisRequest) -> Result<String, String> {
        let voice_id = VoiceId::from(request.voice_id.as_str());
        let engine = Engine::from(request.engine.as_str());
        let output_format = OutputFormat::from(request.output_format.as_str());

        tracing::info!(
            voice_id = ?voice_id,
            engine = ?engine,
            output_format = ?output_format,
            bucket = %request.output_bucket,
            key_prefix = %request.output_key_prefix,
            text_length = request.text.len(),
            text_preview = %request.text.chars().take(80).collect::<String>(),
            "Calling AWS Polly start_speech_synthesis_task"
        );

        let result = self
            .polly_client
            .start_speech_synthesis_task()
            .text(&request.text)
            .voice_id(voice_id)
            .engine(engine)
            .output_format(output_format)
            .output_s3_bucket_name(&request.output_bucket)
            .output_s3_key_prefix(&request.output_key_prefix)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    key_prefix = %request.output_key_prefix,
                    "AWS Polly start_speech_synthesis_task failed"
                );
                format!("AWS Polly error: {}", DisplayErrorContext(&e))
            })?;

        let task_id = result
            .synthesis_task()
            .and_then(|task| task.task_id())
            .ok_or_else(|| "AWS Polly returned no task id".to_string())?;

        tracing::debug!(task_id = task_id, "AWS Polly synthesis task created");

        Ok(task_id.to_string())
    }

    async fn poll(&self, job_id: &str) -> Result<JobSnapshot, String> {
        let result = self
            .polly_client
            .get_speech_synthesis_task()
            .task_id(job_id)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    task_id = job_id,
                    "AWS Polly get_speech_synthesis_task failed"
                );
                format!("AWS Polly error: {}", DisplayErrorContext(&e))
            })?;

        let task = result
            .synthesis_task()
            .ok_or_else(|| format!("AWS Polly returned no task for {}", job_id))?;

        let snapshot = JobSnapshot {
            status: Self::map_status(task.task_status()),
            output_uri: task.output_uri().map(str::to_string),
            status_reason: task.task_status_reason().map(str::to_string),
        };

        tracing::debug!(
            task_id = job_id,
            raw_status = ?task.task_status(),
            status = %snapshot.status,
            "AWS Polly task status fetched"
        );

        Ok(snapshot)
    }
}
