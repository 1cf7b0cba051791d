use async_trait::async_trait;
use std::time::Duration;

/// Time source for every wait in the pipeline.
///
/// Polling intervals, settle delays and retry backoff all go through this
/// trait so tests can run the pipeline against simulated time.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Monotonic time elapsed since the clock was created
    fn elapsed(&self) -> Duration;

    /// Suspend the current task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer
pub struct TokioClock {
    started_at: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            started_at: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for TokioClock {
    fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
