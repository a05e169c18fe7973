use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Mutex;

/// Stable identifier for an upstream, used to index flat per-upstream state
/// instead of the cyclic back-pointers the original source used between
/// its load balancer, health monitor, breaker, and timeout manager.
pub type UpstreamId = usize;

/// Static, config-derived description of one upstream server.
#[derive(Clone, Debug)]
pub struct UpstreamSpec {
    pub id: UpstreamId,
    pub name: String,
    pub address: SocketAddr,
    pub protocol: String,
    pub weight: f64,
    pub location: Option<(f64, f64)>,
    pub specialisations: HashSet<u16>,
    pub capacity: u32,
}

/// Rolling, concurrently-updated statistics for one upstream.
#[derive(Debug, Default)]
pub struct Counters {
    pub total_queries: AtomicU64,
    pub successful_queries: AtomicU64,
    pub failed_queries: AtomicU64,
    pub outstanding: AtomicI64,
    avg_latency_ms: Mutex<f64>,
}

impl Counters {
    pub fn success_rate(&self) -> f64 {
        let total = self.total_queries.load(Ordering::Relaxed);
        if total == 0 {
            return 1.0;
        }
        self.successful_queries.load(Ordering::Relaxed) as f64 / total as f64
    }

    pub fn avg_latency_ms(&self) -> f64 {
        *self.avg_latency_ms.lock().expect("latency lock poisoned")
    }

    /// Records the outcome of one upstream attempt. Both successful and
    /// failed attempts contribute a latency sample to the moving average.
    pub fn record_attempt(&self, success: bool, latency_ms: f64) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_queries.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_queries.fetch_add(1, Ordering::Relaxed);
        }

        let mut avg = self.avg_latency_ms.lock().expect("latency lock poisoned");
        *avg = (*avg + latency_ms) / 2.0;
    }

    pub fn begin_outstanding(&self) {
        self.outstanding.fetch_add(1, Ordering::Relaxed);
    }

    pub fn end_outstanding(&self) {
        self.outstanding.fetch_sub(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_rate_defaults_to_full_confidence_with_no_data() {
        let counters = Counters::default();
        assert_eq!(counters.success_rate(), 1.0);
    }

    #[test]
    fn latency_average_is_exponential_with_half_weight() {
        let counters = Counters::default();
        counters.record_attempt(true, 100.0);
        assert_eq!(counters.avg_latency_ms(), 50.0);
        counters.record_attempt(true, 100.0);
        assert_eq!(counters.avg_latency_ms(), 75.0);
    }

    #[test]
    fn success_rate_reflects_failures() {
        let counters = Counters::default();
        counters.record_attempt(true, 10.0);
        counters.record_attempt(false, 10.0);
        assert_eq!(counters.success_rate(), 0.5);
    }
}
