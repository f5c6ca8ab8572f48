/*!
 * Batch-anchored rate limiting for translation calls.
 *
 * The limiter guarantees a minimum wall-clock interval between successive
 * outbound translation requests. The clock is anchored to the start of the
 * batch of work preceding a call rather than to the call itself, so local
 * processing performed inside the interval counts toward it and a
 * long-running batch never drifts by more than one interval.
 */

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Paces outbound translation requests.
///
/// `start_batch` is called once per resource file; `acquire` once per
/// request (retries included, on the same clock).
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum spacing between requests
    interval: Duration,

    /// Start of the work period the next request's delay is measured against
    anchor: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter with the given minimum interval
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            anchor: Mutex::new(None),
        }
    }

    /// Create a limiter from a whole number of seconds
    pub fn from_secs(interval_secs: u64) -> Self {
        Self::new(Duration::from_secs(interval_secs))
    }

    /// Configured minimum spacing
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Anchor the clock at the start of a batch. Work done between this call
    /// and the first `acquire` is credited against the first delay.
    pub async fn start_batch(&self) {
        let mut anchor = self.anchor.lock().await;
        *anchor = Some(Instant::now());
    }

    /// Suspend until the interval since the current anchor has elapsed, then
    /// re-anchor. A batch that already exceeded the interval, or a zero
    /// interval, returns immediately; never an error.
    pub async fn acquire(&self) {
        let mut anchor = self.anchor.lock().await;
        let start = anchor.get_or_insert_with(Instant::now);

        let elapsed = start.elapsed();
        if elapsed < self.interval {
            sleep(self.interval - elapsed).await;
        }

        *anchor = Some(Instant::now());
    }
}
