//! Backoff utilities for readiness probing
//!
//! Provides a configurable exponential backoff with jitter, used by the
//! lifecycle controller to pace TCP connection probes against a starting
//! application. Jitter keeps concurrent test scenarios from probing in
//! lockstep.

use std::time::Duration;

/// Jitter strategy for probe delays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JitterStrategy {
    /// Random delay between 0 and the calculated delay
    FullJitter,
    /// Half the calculated delay plus a random half
    #[default]
    EqualJitter,
}

/// Configuration for backoff behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Base delay for exponential backoff
    pub base_delay: Duration,
    /// Maximum delay cap
    pub max_delay: Duration,
    /// Jitter strategy to apply
    pub jitter: JitterStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(1),
            jitter: JitterStrategy::default(),
        }
    }
}

impl RetryConfig {
    pub fn new(base_delay: Duration, max_delay: Duration, jitter: JitterStrategy) -> Self {
        Self {
            base_delay,
            max_delay,
            jitter,
        }
    }

    /// Calculate the delay for a given attempt number (0-based)
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        // Exponential backoff: base_delay * 2^attempt, capped at max_delay.
        // The exponent is clamped so the u128 multiply cannot overflow.
        let exponent = attempt.min(32);
        let exponential_delay = self
            .base_delay
            .as_millis()
            .saturating_mul(2_u128.pow(exponent));

        let capped_delay = exponential_delay.min(self.max_delay.as_millis());
        self.apply_jitter(Duration::from_millis(capped_delay as u64))
    }

    fn apply_jitter(&self, delay: Duration) -> Duration {
        let delay_ms = delay.as_millis() as u64;
        match self.jitter {
            JitterStrategy::FullJitter => Duration::from_millis(fastrand::u64(0..=delay_ms)),
            JitterStrategy::EqualJitter => {
                let half = delay_ms / 2;
                Duration::from_millis(half + fastrand::u64(0..=half))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig::new(
            Duration::from_millis(100),
            Duration::from_millis(500),
            JitterStrategy::EqualJitter,
        );
        for attempt in 0..40 {
            assert!(config.calculate_delay(attempt) <= Duration::from_millis(500));
        }
    }

    #[test]
    fn test_equal_jitter_preserves_half_delay() {
        let config = RetryConfig::new(
            Duration::from_millis(200),
            Duration::from_secs(1),
            JitterStrategy::EqualJitter,
        );
        // attempt 0: calculated delay is 200ms; equal jitter stays in [100, 200]
        for _ in 0..50 {
            let delay = config.calculate_delay(0);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(200));
        }
    }

    #[test]
    fn test_full_jitter_bounds() {
        let config = RetryConfig::new(
            Duration::from_millis(100),
            Duration::from_secs(1),
            JitterStrategy::FullJitter,
        );
        for _ in 0..50 {
            assert!(config.calculate_delay(0) <= Duration::from_millis(100));
        }
    }

    #[test]
    fn test_default_config() {
        let config = RetryConfig::default();
        assert_eq!(config.base_delay, Duration::from_millis(50));
        assert_eq!(config.max_delay, Duration::from_secs(1));
        assert_eq!(config.jitter, JitterStrategy::EqualJitter);
    }
}
