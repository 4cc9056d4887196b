//! Randomized per-request pacing
//!
//! Each task sleeps a uniformly random delay before its request. This is
//! jitter, not a global limiter: concurrency stays bounded by the worker pool.

use rand::Rng;
use std::time::Duration;

use crate::config::CrawlConfig;

/// Uniform delay in `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pacer {
    min: Duration,
    max: Duration,
}

impl Pacer {
    /// Create a pacer; swapped bounds are reordered
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Pacer from the crawl settings
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(
            Duration::from_secs_f64(config.delay_min_secs.max(0.0)),
            Duration::from_secs_f64(config.delay_max_secs.max(0.0)),
        )
    }

    /// No delay at all
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Next delay to wait before a request
    pub fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    /// Sleep for [`Pacer::next_delay`]
    pub async fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_delay() {
        let pacer = Pacer::new(Duration::from_millis(250), Duration::from_millis(250));
        assert_eq!(pacer.next_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_swapped_bounds() {
        let pacer = Pacer::new(Duration::from_secs(5), Duration::from_secs(2));
        assert_eq!(pacer.bounds(), (Duration::from_secs(2), Duration::from_secs(5)));
    }

    #[test]
    fn test_from_config() {
        let config = CrawlConfig {
            max_pages: 1,
            concurrency: 1,
            delay_min_secs: 2.0,
            delay_max_secs: 5.0,
        };
        let pacer = Pacer::from_config(&config);
        assert_eq!(pacer.bounds(), (Duration::from_secs(2), Duration::from_secs(5)));
    }

    #[test]
    fn test_disabled_does_not_sleep() {
        let start = std::time::Instant::now();
        tokio_test::block_on(Pacer::disabled().wait());
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    proptest! {
        #[test]
        fn prop_delay_within_bounds(min_ms in 0u64..10_000, span_ms in 0u64..10_000) {
            let min = Duration::from_millis(min_ms);
            let max = Duration::from_millis(min_ms + span_ms);
            let pacer = Pacer::new(min, max);
            let delay = pacer.next_delay();
            // float round-trip can land a nanosecond outside
            prop_assert!(delay + Duration::from_nanos(1) >= min);
            prop_assert!(delay <= max + Duration::from_nanos(1));
        }
    }
}
