//! Retry and backoff policy.
//!
//! A [`RetryPolicy`] bounds how often the transport retries a failed
//! request and how long it waits in between. Delays grow geometrically from
//! `min_delay` by `factor` per attempt, are clamped at `max_delay`, and are
//! jittered over the upper half of the band above the floor.

use std::time::Duration;

use rand::Rng;

use crate::error::ConfigError;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default backoff floor.
pub const DEFAULT_BACKOFF_MIN_DELAY: Duration = Duration::from_secs(4);

/// Default backoff ceiling.
pub const DEFAULT_BACKOFF_MAX_DELAY: Duration = Duration::from_secs(60);

/// Default backoff growth factor.
pub const DEFAULT_BACKOFF_DELAY_FACTOR: f64 = 3.0;

/// Bounded retry policy with jittered exponential backoff.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use nd_client::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_retries(), 2);
///
/// let delay = policy.delay(0);
/// assert!(delay >= Duration::from_secs(4) && delay <= Duration::from_secs(60));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    min_delay: Duration,
    max_delay: Duration,
    factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            min_delay: DEFAULT_BACKOFF_MIN_DELAY,
            max_delay: DEFAULT_BACKOFF_MAX_DELAY,
            factor: DEFAULT_BACKOFF_DELAY_FACTOR,
        }
    }
}

impl RetryPolicy {
    /// Creates a validated retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRetryPolicy`] if `max_delay < min_delay`
    /// or `factor` is not a finite number `>= 1.0`.
    pub fn new(
        max_retries: u32,
        min_delay: Duration,
        max_delay: Duration,
        factor: f64,
    ) -> Result<Self, ConfigError> {
        if max_delay < min_delay {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: format!(
                    "max_delay ({max_delay:?}) cannot be less than min_delay ({min_delay:?})"
                ),
            });
        }
        if !factor.is_finite() || factor < 1.0 {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: format!("delay factor must be a finite number >= 1.0, got {factor}"),
            });
        }

        Ok(Self {
            max_retries,
            min_delay,
            max_delay,
            factor,
        })
    }

    /// A policy that never retries.
    #[must_use]
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Returns the maximum number of retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the backoff floor.
    #[must_use]
    pub const fn min_delay(&self) -> Duration {
        self.min_delay
    }

    /// Returns the backoff ceiling.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Returns the backoff growth factor.
    #[must_use]
    pub const fn factor(&self) -> f64 {
        self.factor
    }

    /// Returns `true` if another attempt is allowed after the 0-indexed `attempt` failed.
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Computes a jittered delay for the 0-indexed `attempt`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let jitter = rand::thread_rng().gen_range(0.5..1.0);
        self.delay_with_jitter(attempt, jitter)
    }

    /// Computes the delay for `attempt` with an explicit jitter multiplier.
    ///
    /// `jitter` is clamped to `[0.0, 1.0]` and scales only the portion of the
    /// backoff above `min_delay`, so the result stays within
    /// `[min_delay, max_delay]`.
    #[must_use]
    pub fn delay_with_jitter(&self, attempt: u32, jitter: f64) -> Duration {
        let min = self.min_delay.as_secs_f64();
        let max = self.max_delay.as_secs_f64();
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);

        let backoff = (min * self.factor.powi(exponent)).min(max);
        let jittered = jitter.clamp(0.0, 1.0).mul_add(backoff - min, min);

        Duration::from_secs_f64(jittered.clamp(min, max))
    }
}
