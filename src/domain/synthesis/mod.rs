pub mod driver;
pub mod error;
pub mod job;

pub use driver::{PollPolicy, SynthesisDriver, SynthesisSettings};
pub use error::SynthesisError;
pub use job::{JobSnapshot, JobState, JobStatus, RemoteArtifact, SynthesisRequest};
