use std::time::Duration;

use crate::ApiError;

/// Exponential backoff schedule for one logical request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    max_retries: usize,
    base_delay_ms: u64,
    multiplier: f64,
}

/// One concrete try within a request's retry sequence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Attempt {
    /// 0 for the initial try, up to `max_retries` inclusive.
    pub index: usize,
    /// Wait inserted before this attempt runs.
    pub delay: Duration,
}

/// What the retry loop does with a failed attempt.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryDecision {
    /// Run `next` after waiting `next.delay`.
    Retry(Attempt),
    /// Non-retryable failure: surface it now.
    Stop,
    /// Retryable failure with no attempts left: surface it now.
    Exhausted,
}

impl RetryPolicy {
    pub fn new(max_retries: usize, base_delay_ms: u64, multiplier: f64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            multiplier,
        }
    }

    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Total attempts this policy allows, initial try included.
    pub fn max_attempts(&self) -> usize {
        self.max_retries.saturating_add(1)
    }

    pub fn first_attempt(&self) -> Attempt {
        Attempt {
            index: 0,
            delay: Duration::ZERO,
        }
    }

    /// Wait before attempt `index`: zero for the first, otherwise
    /// `base_delay * multiplier^(index - 1)`.
    pub fn delay_before(&self, index: usize) -> Duration {
        if index == 0 {
            return Duration::ZERO;
        }
        let exp = i32::try_from(index - 1).unwrap_or(i32::MAX);
        let delay_ms = self.base_delay_ms as f64 * self.multiplier.powi(exp);
        if !delay_ms.is_finite() || delay_ms >= u64::MAX as f64 {
            return Duration::from_millis(u64::MAX);
        }
        Duration::from_millis(delay_ms.max(0.0).round() as u64)
    }

    /// Decides the transition after `attempt` failed with `error`.
    pub fn decide(&self, attempt: Attempt, error: &ApiError) -> RetryDecision {
        if !error.is_retryable() {
            return RetryDecision::Stop;
        }
        if attempt.index >= self.max_retries {
            return RetryDecision::Exhausted;
        }
        let index = attempt.index + 1;
        RetryDecision::Retry(Attempt {
            index,
            delay: self.delay_before(index),
        })
    }
}
