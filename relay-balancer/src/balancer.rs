use crate::breaker::{Breaker, Timestamp};
use crate::context::QueryContext;
use crate::health::{is_healthy, HealthMap};
use crate::strategy::{rank, weighted_roulette_pick, SelectionStrategy, UpstreamSnapshot};
use crate::timeout::AdaptiveTimeout;
use crate::transport::Transport;
use crate::upstream::{Counters, UpstreamId, UpstreamSpec};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug)]
pub enum BalancerError {
    AllUpstreamsFailed,
    NoUpstreamsConfigured,
}

impl std::fmt::Display for BalancerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllUpstreamsFailed => write!(f, "every upstream rejected or failed the query"),
            Self::NoUpstreamsConfigured => write!(f, "no upstreams configured"),
        }
    }
}

impl std::error::Error for BalancerError {}

/// Ties one upstream's static spec to its live counters, breaker, and
/// adaptive timeout. Flat `Vec`s indexed by `UpstreamId` rather than a
/// graph of back-pointers, so no part of this needs interior reference
/// cycles.
pub struct LoadBalancer {
    specs: Vec<UpstreamSpec>,
    counters: Vec<Counters>,
    breakers: Vec<Breaker>,
    timeouts: Vec<AdaptiveTimeout>,
    health: RwLock<HealthMap>,
    strategy: SelectionStrategy,
    max_retries: usize,
    transport: Box<dyn Transport>,
}

impl LoadBalancer {
    pub fn new(specs: Vec<UpstreamSpec>, strategy: SelectionStrategy, max_retries: usize, transport: Box<dyn Transport>) -> Self {
        let len = specs.len();
        let health = specs.iter().map(|spec| (spec.id, true)).collect();
        Self {
            specs,
            counters: (0..len).map(|_| Counters::default()).collect(),
            breakers: (0..len).map(|_| Breaker::new()).collect(),
            timeouts: (0..len).map(|_| AdaptiveTimeout::new()).collect(),
            health: RwLock::new(health),
            strategy,
            max_retries,
            transport,
        }
    }

    fn snapshot(&self, id: UpstreamId) -> UpstreamSnapshot {
        let spec = &self.specs[id];
        let counters = &self.counters[id];
        UpstreamSnapshot {
            id,
            weight: spec.weight,
            avg_latency_ms: counters.avg_latency_ms(),
            success_rate: counters.success_rate(),
            outstanding: counters.outstanding.load(std::sync::atomic::Ordering::Relaxed),
            capacity: spec.capacity,
            location: spec.location,
            specialisations: spec.specialisations.clone(),
        }
    }

    /// Recomputes the health map from live counters. Called periodically by
    /// whoever owns the balancer (the server loop, on a timer), not on every
    /// query, so `select` reads a cheap point-in-time classification.
    pub async fn refresh_health(&self) {
        let mut health = self.health.write().await;
        for spec in &self.specs {
            let snap = self.snapshot(spec.id);
            let healthy = is_healthy(snap.success_rate, snap.avg_latency_ms, snap.outstanding, snap.capacity);
            health.insert(spec.id, healthy);
        }
    }

    /// Health-filter, then strategy-rank, then skip any upstream whose
    /// breaker currently rejects traffic, falling through to the next-best
    /// candidate. `exclude` lets `execute` avoid retrying an upstream that
    /// already failed this query.
    pub async fn select(&self, ctx: &QueryContext, now: Timestamp, exclude: &[UpstreamId]) -> Option<UpstreamId> {
        let health = self.health.read().await;
        let candidates: Vec<UpstreamSnapshot> = self
            .specs
            .iter()
            .filter(|spec| !exclude.contains(&spec.id))
            .filter(|spec| *health.get(&spec.id).unwrap_or(&true))
            .map(|spec| self.snapshot(spec.id))
            .collect();
        drop(health);

        if candidates.is_empty() {
            return None;
        }

        let ordered = if self.strategy == SelectionStrategy::WeightedRoundRobin {
            weighted_roulette_pick(&candidates).into_iter().collect()
        } else {
            rank(self.strategy, ctx, &candidates)
        };

        ordered.into_iter().find(|id| self.breakers[*id].allow(now))
    }

    /// Sends `query` to upstreams in priority order, retrying on failure up
    /// to `min(max_retries, upstream_count)` times, each attempt excluding
    /// every upstream already tried for this query.
    pub async fn execute(&self, ctx: &QueryContext, query: &[u8], now: Timestamp) -> Result<Vec<u8>, BalancerError> {
        if self.specs.is_empty() {
            return Err(BalancerError::NoUpstreamsConfigured);
        }

        let attempts = self.max_retries.min(self.specs.len()).max(1);
        let mut tried = Vec::with_capacity(attempts);

        for _ in 0..attempts {
            let Some(id) = self.select(ctx, now, &tried).await else {
                break;
            };
            tried.push(id);

            let spec = &self.specs[id];
            let timeout = Duration::from_millis(self.timeouts[id].current_ms());
            let started = Instant::now();
            self.counters[id].begin_outstanding();
            let outcome = self.transport.send_query(spec.address, query, timeout).await;
            self.counters[id].end_outstanding();
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(response) => {
                    self.counters[id].record_attempt(true, elapsed_ms as f64);
                    self.breakers[id].record_success(now);
                    self.timeouts[id].record(true, elapsed_ms);
                    return Ok(response);
                }
                Err(_) => {
                    self.counters[id].record_attempt(false, elapsed_ms as f64);
                    self.breakers[id].record_failure(now);
                    self.timeouts[id].record(false, elapsed_ms);
                }
            }
        }

        Err(BalancerError::AllUpstreamsFailed)
    }

    pub fn upstream_count(&self) -> usize {
        self.specs.len()
    }
}
