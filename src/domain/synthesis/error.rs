use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("could not submit synthesis job: {0}")]
    Submission(String),
    #[error("could not poll synthesis job {job_id}: {message}")]
    Poll { job_id: String, message: String },
    #[error("synthesis job {job_id} failed: {reason}")]
    Failed { job_id: String, reason: String },
    #[error("synthesis job {job_id} still running after {waited:?}")]
    TimedOut { job_id: String, waited: Duration },
    #[error("synthesis job {0} completed without an output URI")]
    MissingOutputUri(String),
    #[error("unusable output URI: {0}")]
    InvalidOutputUri(String),
}
