//! Start-rate limiter.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Spaces request starts at least `min_interval` apart.
///
/// Waiters queue on a fair mutex, so they are admitted in the order they
/// called [`RateLimiter::acquire`].
#[derive(Debug)]
pub struct RateLimiter {
    last_start: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self { last_start: Mutex::new(None), min_interval }
    }

    /// At most `per_second` starts in any one-second span.
    pub fn per_second(per_second: u32) -> Self {
        Self::new(Duration::from_secs(1) / per_second.max(1))
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a new request may start, then record the start.
    pub async fn acquire(&self) {
        let mut last = self.last_start.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
