pub mod clock;
pub mod retry;

pub use clock::{Clock, TokioClock};
pub use retry::{retry_with_backoff, RetryPolicy};
