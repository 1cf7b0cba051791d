pub mod error;
pub mod report;
pub mod service;

pub use error::PipelineServiceError;
pub use report::{ChapterOutcome, ChapterReport, FailureStage, PipelineReport};
pub use service::{PipelineService, PipelineServiceApi};
