/*!
 * Bounded retry policy for the unreliable translation boundary.
 *
 * Retry is a policy object rather than nested control flow so it can be
 * unit-tested without the network. The delay between attempts is the rate
 * limiter's, reapplied on the same batch clock as first attempts.
 */

use std::fmt::Display;
use std::future::Future;

use crate::rate_limiter::RateLimiter;

/// All attempts failed; carries the attempt count and the last error.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    /// Attempts made, first try included
    pub attempts: u32,
    /// The error from the final attempt
    pub last_error: E,
}

/// Bounded-attempt policy around a rate-limited operation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// Policy with the given attempt bound; at least one attempt always runs
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Configured attempt bound
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds or the attempt bound is hit, acquiring the
    /// rate limiter before every attempt.
    pub async fn run<T, E, F, Fut>(
        &self,
        limiter: &RateLimiter,
        mut op: F,
    ) -> Result<T, RetryExhausted<E>>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            limiter.acquire().await;

            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.max_attempts {
                        return Err(RetryExhausted {
                            attempts: attempt,
                            last_error: error,
                        });
                    }
                    log::warn!(
                        "Attempt {}/{} failed: {}",
                        attempt,
                        self.max_attempts,
                        error
                    );
                }
            }
        }
    }
}
