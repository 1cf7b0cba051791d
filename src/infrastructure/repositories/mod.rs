pub mod blob_repository;
pub mod polly_synthesis_repository;
pub mod s3_blob_repository;
pub mod synthesis_repository;

pub use blob_repository::BlobRepository;
pub use polly_synthesis_repository::PollySynthesisRepository;
pub use s3_blob_repository::S3BlobRepository;
pub use synthesis_repository::SynthesisRepository;
