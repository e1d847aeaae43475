//! Minimum-spacing rate limiter for market data providers.
//!
//! Each rate-limited adapter owns one [`RateLimiter`]. Every outbound request
//! waits until at least `min_interval` has passed since the previous one.
//! There is no burst allowance: the first request of a batch is spaced
//! relative to whatever request came before it.

use std::time::Duration;

use log::debug;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Default spacing between requests to a throttled vendor.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(200);

/// Rate limiting configuration advertised by a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimit {
    /// Minimum delay between two outbound requests.
    pub min_interval: Duration,
}

impl Default for RateLimit {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

/// Per-instance throttle tracking the time of the last outbound request.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the next request may be sent, then record it.
    ///
    /// The lock is held across the sleep so concurrent callers on the same
    /// instance queue up behind each other instead of firing together.
    pub async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;

        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("Rate limiter: waiting {:?} before next request", wait);
                tokio::time::sleep(wait).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
