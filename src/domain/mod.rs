pub mod chapter;
pub mod pipeline;
pub mod retrieval;
pub mod shared;
pub mod synthesis;
