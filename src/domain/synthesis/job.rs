use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::SynthesisError;

/// Everything the synthesis service needs to narrate one chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub engine: String,
    pub output_format: String,
    pub output_bucket: String,
    /// Destination key prefix, always ending in `/`
    pub output_key_prefix: String,
}

/// Source-neutral job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::InProgress => "in-progress",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What one status poll reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub status: JobStatus,
    /// Present once the job completed
    pub output_uri: Option<String>,
    /// Service-provided explanation, usually only set on failure
    pub status_reason: Option<String>,
}

impl JobSnapshot {
    pub fn in_progress() -> Self {
        Self {
            status: JobStatus::InProgress,
            output_uri: None,
            status_reason: None,
        }
    }

    pub fn completed(output_uri: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            output_uri: Some(output_uri.into()),
            status_reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            output_uri: None,
            status_reason: Some(reason.into()),
        }
    }
}

/// Location of a finished narration in blob storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteArtifact {
    pub bucket: String,
    pub key: String,
    /// URI exactly as reported by the synthesis service
    pub uri: String,
}

impl RemoteArtifact {
    /// Build the artifact location from the service's output URI.
    ///
    /// The object key is the sanitized title prefix joined with the URI's
    /// last path segment.
    pub fn from_output_uri(
        bucket: &str,
        key_prefix: &str,
        output_uri: &str,
    ) -> Result<Self, SynthesisError> {
        let file_name = output_uri
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| SynthesisError::InvalidOutputUri(output_uri.to_string()))?;

        Ok(Self {
            bucket: bucket.to_string(),
            key: format!("{}/{}", key_prefix.trim_end_matches('/'), file_name),
            uri: output_uri.to_string(),
        })
    }
}

/// Lifecycle of one synthesis job as seen by the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Submitted { job_id: String },
    Polling { job_id: String, polls: u32 },
    Completed { job_id: String, output_uri: Option<String> },
    Failed { job_id: String, reason: String },
    TimedOut { job_id: String, waited: Duration },
}

impl JobState {
    /// Apply a poll result. Terminal states never change.
    pub fn observe(self, snapshot: JobSnapshot) -> JobState {
        let (job_id, polls) = match self {
            JobState::Submitted { job_id } => (job_id, 1),
            JobState::Polling { job_id, polls } => (job_id, polls + 1),
            terminal => return terminal,
        };

        match snapshot.status {
            JobStatus::InProgress => JobState::Polling { job_id, polls },
            JobStatus::Completed => JobState::Completed {
                job_id,
                output_uri: snapshot.output_uri,
            },
            JobStatus::Failed => JobState::Failed {
                job_id,
                reason: snapshot
                    .status_reason
                    .unwrap_or_else(|| JobStatus::Failed.to_string()),
            },
        }
    }

    /// Give up waiting on a job that has not reached a terminal state
    pub fn time_out(self, waited: Duration) -> JobState {
        match self {
            JobState::Submitted { job_id } | JobState::Polling { job_id, .. } => {
                JobState::TimedOut { job_id, waited }
            }
            terminal => terminal,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Completed { .. } | JobState::Failed { .. } | JobState::TimedOut { .. }
        )
    }

    pub fn job_id(&self) -> &str {
        match self {
            JobState::Submitted { job_id }
            | JobState::Polling { job_id, .. }
            | JobState::Completed { job_id, .. }
            | JobState::Failed { job_id, .. }
            | JobState::TimedOut { job_id, .. } => job_id,
        }
    }
}
