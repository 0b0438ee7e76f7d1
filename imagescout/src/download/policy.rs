//! Retry policy for download attempts.
//!
//! One parametrized policy applied uniformly by the downloader, instead
//! of per-call ad hoc sleep loops.

use std::time::Duration;

/// Default number of attempts per candidate (including the first).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay for linear backoff.
pub const DEFAULT_BASE_DELAY_SECS: u64 = 1;

/// How a download attempt handles transient failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RetryPolicy {
    /// No retries; fail on the first error.
    None,

    /// Fixed number of attempts with a constant delay between them.
    Fixed {
        /// Maximum number of attempts (including the initial attempt).
        max_attempts: u32,
        /// Delay between attempts.
        delay: Duration,
    },

    /// Linear backoff: the delay after attempt `n` is `base_delay * n`.
    Linear {
        /// Maximum number of attempts (including the initial attempt).
        max_attempts: u32,
        /// Base delay multiplied by the attempt number.
        base_delay: Duration,
    },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::linear(DEFAULT_MAX_ATTEMPTS)
    }
}

impl RetryPolicy {
    /// Creates a linear backoff policy with the default 1s base delay.
    pub fn linear(max_attempts: u32) -> Self {
        Self::Linear {
            max_attempts,
            base_delay: Duration::from_secs(DEFAULT_BASE_DELAY_SECS),
        }
    }

    /// Creates a fixed-delay retry policy.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self::Fixed {
            max_attempts,
            delay,
        }
    }

    /// Delay to wait after the given (1-based) failed attempt, or `None`
    /// when the policy allows no further attempts.
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::Fixed {
                max_attempts,
                delay,
            } => (attempt < *max_attempts).then_some(*delay),
            Self::Linear {
                max_attempts,
                base_delay,
            } => (attempt < *max_attempts).then(|| *base_delay * attempt),
        }
    }

    /// Maximum number of attempts for this policy.
    pub fn max_attempts(&self) -> u32 {
        match self {
            Self::None => 1,
            Self::Fixed { max_attempts, .. } => *max_attempts,
            Self::Linear { max_attempts, .. } => *max_attempts,
        }
    }
}
