use super::error::SynthesisError;
use super::job::{JobState, RemoteArtifact, SynthesisRequest};
use crate::domain::chapter::sanitize_title;
use crate::domain::shared::{retry_with_backoff, Clock, RetryPolicy};
use crate::infrastructure::repositories::SynthesisRepository;
use std::sync::Arc;
use std::time::Duration;

/// Fixed voice and destination for every chapter of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisSettings {
    pub voice_id: String,
    pub engine: String,
    pub output_format: String,
    pub output_bucket: String,
}

impl SynthesisSettings {
    /// File extension for local copies of audio in `output_format`
    pub fn file_extension(&self) -> &'static str {
        match self.output_format.as_str() {
            "ogg_vorbis" => "ogg",
            "pcm" => "pcm",
            "json" => "json",
            _ => "mp3",
        }
    }
}

/// How the driver waits on a submitted job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before each status poll
    pub interval: Duration,
    /// Wait after completion so the object is readable in the store
    pub settle_delay: Duration,
    /// Give up after this long without a terminal status. `None` polls forever.
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            settle_delay: Duration::from_secs(10),
            timeout: None,
        }
    }
}

/// Drives one synthesis job per chapter from submission to a terminal state
pub struct SynthesisDriver {
    repository: Arc<dyn SynthesisRepository>,
    clock: Arc<dyn Clock>,
    settings: SynthesisSettings,
    poll_policy: PollPolicy,
    retry_policy: RetryPolicy,
}

impl SynthesisDriver {
    pub fn new(
        repository: Arc<dyn SynthesisRepository>,
        clock: Arc<dyn Clock>,
        settings: SynthesisSettings,
        poll_policy: PollPolicy,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            repository,
            clock,
            settings,
            poll_policy,
            retry_policy,
        }
    }

    pub fn settings(&self) -> &SynthesisSettings {
        &self.settings
    }

    /// Narrate one chapter and return where the audio landed.
    ///
    /// Submits the job, polls it until it completes or fails, then waits the
    /// settle delay before handing back the artifact location. Transport
    /// errors on submit and poll are retried per the retry policy; a job
    /// that reports `failed` is not.
    pub async fn synthesize(
        &self,
        chapter_text: &str,
        chapter_title: &str,
    ) -> Result<RemoteArtifact, SynthesisError> {
        let key_prefix = sanitize_title(chapter_title);
        let request = SynthesisRequest {
            text: chapter_text.to_string(),
            voice_id: self.settings.voice_id.clone(),
            engine: self.settings.engine.clone(),
            output_format: self.settings.output_format.clone(),
            output_bucket: self.settings.output_bucket.clone(),
            output_key_prefix: format!("{}/", key_prefix),
        };

        let job_id = retry_with_backoff(
            &self.retry_policy,
            self.clock.as_ref(),
            "submit_synthesis",
            || self.repository.submit(&request),
        )
        .await
        .map_err(SynthesisError::Submission)?;

        tracing::info!(
            job_id = %job_id,
            key_prefix = %key_prefix,
            text_length = chapter_text.len(),
            "Synthesis job submitted"
        );

        let state = self.wait_for_terminal(JobState::Submitted { job_id }).await?;

        match state {
            JobState::Completed { job_id, output_uri } => {
                let output_uri =
                    output_uri.ok_or_else(|| SynthesisError::MissingOutputUri(job_id.clone()))?;

                self.clock.sleep(self.poll_policy.settle_delay).await;

                let artifact = RemoteArtifact::from_output_uri(
                    &self.settings.output_bucket,
                    &key_prefix,
                    &output_uri,
                )?;

                tracing::info!(
                    job_id = %job_id,
                    output_uri = %artifact.uri,
                    key = %artifact.key,
                    "Synthesis job completed"
                );

                Ok(artifact)
            }
            JobState::Failed { job_id, reason } => {
                tracing::warn!(job_id = %job_id, reason = %reason, "Synthesis job failed");
                Err(SynthesisError::Failed { job_id, reason })
            }
            JobState::TimedOut { job_id, waited } => {
                tracing::warn!(
                    job_id = %job_id,
                    waited_secs = waited.as_secs(),
                    "Synthesis job timed out"
                );
                Err(SynthesisError::TimedOut { job_id, waited })
            }
            JobState::Submitted { job_id } | JobState::Polling { job_id, .. } => {
                // wait_for_terminal only returns terminal states
                Err(SynthesisError::Poll {
                    job_id,
                    message: "polling stopped before a terminal status".to_string(),
                })
            }
        }
    }

    async fn wait_for_terminal(&self, mut state: JobState) -> Result<JobState, SynthesisError> {
        let started = self.clock.elapsed();
        let job_id = state.job_id().to_string();

        loop {
            self.clock.sleep(self.poll_policy.interval).await;

            let snapshot = retry_with_backoff(
                &self.retry_policy,
                self.clock.as_ref(),
                "poll_synthesis",
                || self.repository.poll(&job_id),
            )
            .await
            .map_err(|message| SynthesisError::Poll {
                job_id: job_id.clone(),
                message,
            })?;

            tracing::debug!(job_id = %job_id, status = %snapshot.status, "Synthesis job polled");

            state = state.observe(snapshot);
            if state.is_terminal() {
                return Ok(state);
            }

            if let Some(timeout) = self.poll_policy.timeout {
                let waited = self.clock.elapsed().saturating_sub(started);
                if waited >= timeout {
                    return Ok(state.time_out(waited));
                }
            }
        }
    }
}
