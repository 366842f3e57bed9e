use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use std::num::NonZeroU32;

/// Per-field limiter for incoming text snapshots.
///
/// Each focused field gets its own token bucket, so a host flooding one
/// field with programmatic updates does not starve the others.
pub struct FieldRateLimiter {
    limiter: RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>,
    enabled: bool,
}

impl FieldRateLimiter {
    /// Zero rates are raised to one.
    pub fn new(changes_per_second: u32, burst_capacity: u32, enabled: bool) -> Self {
        let quota = Quota::per_second(non_zero(changes_per_second))
            .allow_burst(non_zero(burst_capacity));

        Self {
            limiter: RateLimiter::keyed(quota),
            enabled,
        }
    }

    /// Immediate check; returns false when `field` is over its budget.
    pub fn check(&self, field: &str) -> bool {
        if !self.enabled {
            return true;
        }

        self.limiter.check_key(&field.to_string()).is_ok()
    }

    /// Drops buckets that have fully refilled. A blurred field keeps its
    /// bucket until it refills, so a quick refocus stays limited.
    pub fn prune(&self) {
        self.limiter.retain_recent();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

fn non_zero(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap_or(NonZeroU32::MIN)
}
