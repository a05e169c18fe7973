use crate::upstream::UpstreamId;
use std::collections::HashMap;

const MIN_SUCCESS_RATE: f64 = 0.8;
const MAX_AVG_LATENCY_MS: f64 = 500.0;
const MAX_LOAD_FRACTION: f64 = 0.9;

/// Pure health predicate applied to one upstream's current statistics.
pub fn is_healthy(success_rate: f64, avg_latency_ms: f64, outstanding: i64, capacity: u32) -> bool {
    success_rate >= MIN_SUCCESS_RATE
        && avg_latency_ms <= MAX_AVG_LATENCY_MS
        && (outstanding as f64) < MAX_LOAD_FRACTION * capacity as f64
}

/// The shared map the health monitor refreshes on its schedule and
/// selection reads from. A read-write lock, not per-entry locks, since the
/// whole map is replaced each evaluation pass.
pub type HealthMap = HashMap<UpstreamId, bool>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_when_all_thresholds_met() {
        assert!(is_healthy(0.95, 100.0, 5, 100));
    }

    #[test]
    fn unhealthy_on_low_success_rate() {
        assert!(!is_healthy(0.5, 100.0, 5, 100));
    }

    #[test]
    fn unhealthy_on_high_latency() {
        assert!(!is_healthy(0.95, 600.0, 5, 100));
    }

    #[test]
    fn unhealthy_when_near_capacity() {
        assert!(!is_healthy(0.95, 100.0, 95, 100));
    }
}
