//! Resilience primitives for external data sources.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::{sleep, Duration};

/// Request throttle for the tariff API.
///
/// A single-permit [`Semaphore`] serialises callers; each holder keeps
/// the slot for a fixed interval, bounding throughput to one request per
/// interval regardless of how many fetches run concurrently.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    interval: Duration,
}

impl RateLimiter {
    /// Allow at most `requests_per_second` requests per second.
    #[must_use]
    pub fn per_second(requests_per_second: u32) -> Self {
        Self::with_interval(Duration::from_millis(
            1000 / u64::from(requests_per_second.max(1)),
        ))
    }

    /// Allow one request per `interval`.
    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
            interval,
        }
    }

    /// Wait for a request slot, holding it for the configured interval.
    pub async fn acquire(&self) {
        // The semaphore is never closed, so acquire cannot fail.
        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("throttle semaphore unexpectedly closed");
        sleep(self.interval).await;
    }
}
