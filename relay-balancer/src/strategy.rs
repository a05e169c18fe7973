use crate::context::QueryContext;
use crate::geo::geo_score;
use crate::upstream::UpstreamId;
use rand::Rng;
use std::collections::HashSet;

/// A point-in-time read of one upstream's selection-relevant state.
/// Snapshotting decouples scoring (a pure function) from the atomics/locks
/// that back the live counters.
#[derive(Clone, Debug)]
pub struct UpstreamSnapshot {
    pub id: UpstreamId,
    pub weight: f64,
    pub avg_latency_ms: f64,
    pub success_rate: f64,
    pub outstanding: i64,
    pub capacity: u32,
    pub location: Option<(f64, f64)>,
    pub specialisations: HashSet<u16>,
}

/// The selection strategies the load balancer supports, all implemented.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum SelectionStrategy {
    #[default]
    Intelligent,
    WeightedRoundRobin,
    LeastLatency,
    Geographic,
    Adaptive,
}

fn latency_score(avg_latency_ms: f64) -> f64 {
    1.0 - (avg_latency_ms / 1_000.0).clamp(0.0, 1.0)
}

fn load_score(outstanding: i64, capacity: u32) -> f64 {
    1.0 - (outstanding as f64 / capacity.max(1) as f64)
}

fn specialisation_score(ctx: &QueryContext, snap: &UpstreamSnapshot) -> f64 {
    if snap.specialisations.contains(&ctx.qtype) {
        1.0
    } else {
        0.5
    }
}

/// The weighted scoring formula shared by the `intelligent` and `adaptive`
/// strategies (the latter reserves the same formula for a future
/// machine-learned replacement).
pub fn intelligent_score(ctx: &QueryContext, snap: &UpstreamSnapshot) -> f64 {
    const TIME_SCORE: f64 = 1.0;

    0.25 * latency_score(snap.avg_latency_ms)
        + 0.25 * snap.success_rate
        + 0.20 * load_score(snap.outstanding, snap.capacity)
        + 0.15 * geo_score(ctx.client_location, snap.location)
        + 0.10 * specialisation_score(ctx, snap)
        + 0.05 * TIME_SCORE
}

fn dynamic_weight(snap: &UpstreamSnapshot) -> f64 {
    snap.weight * snap.success_rate * (1.0 / (1.0 + snap.avg_latency_ms))
}

/// Orders candidates best-first for the given strategy. Ties keep their
/// original (insertion) order since the sort is stable and candidates are
/// presented in insertion order.
pub fn rank(
    strategy: SelectionStrategy,
    ctx: &QueryContext,
    candidates: &[UpstreamSnapshot],
) -> Vec<UpstreamId> {
    let mut scored: Vec<(UpstreamId, f64)> = match strategy {
        SelectionStrategy::Intelligent | SelectionStrategy::Adaptive => candidates
            .iter()
            .map(|snap| (snap.id, intelligent_score(ctx, snap)))
            .collect(),
        SelectionStrategy::WeightedRoundRobin => candidates
            .iter()
            .map(|snap| (snap.id, dynamic_weight(snap)))
            .collect(),
        SelectionStrategy::LeastLatency => candidates
            .iter()
            .map(|snap| (snap.id, -snap.avg_latency_ms))
            .collect(),
        SelectionStrategy::Geographic => candidates
            .iter()
            .map(|snap| (snap.id, geo_score(ctx.client_location, snap.location)))
            .collect(),
    };

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.into_iter().map(|(id, _)| id).collect()
}

/// Cumulative-weight roulette pick used by `weighted_round_robin`. Kept
/// separate from `rank` (which is a deterministic total order) because
/// roulette selection is randomised by design.
pub fn weighted_roulette_pick(candidates: &[UpstreamSnapshot]) -> Option<UpstreamId> {
    if candidates.is_empty() {
        return None;
    }
    let weights: Vec<f64> = candidates.iter().map(dynamic_weight).collect();
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Some(candidates[0].id);
    }

    let mut roll = rand::thread_rng().gen_range(0.0..total);
    for (snap, weight) in candidates.iter().zip(weights.iter()) {
        if roll < *weight {
            return Some(snap.id);
        }
        roll -= weight;
    }
    candidates.last().map(|snap| snap.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(id: UpstreamId, latency: f64, success_rate: f64) -> UpstreamSnapshot {
        UpstreamSnapshot {
            id,
            weight: 1.0,
            avg_latency_ms: latency,
            success_rate,
            outstanding: 0,
            capacity: 100,
            location: None,
            specialisations: HashSet::new(),
        }
    }

    #[test]
    fn intelligent_scoring_is_a_pure_function_of_stats() {
        let ctx = QueryContext::new(1);
        let a = snap(0, 50.0, 0.99);
        assert_eq!(intelligent_score(&ctx, &a), intelligent_score(&ctx, &a));
    }

    #[test]
    fn least_latency_ranks_fastest_first() {
        let ctx = QueryContext::new(1);
        let candidates = vec![snap(0, 300.0, 1.0), snap(1, 50.0, 1.0), snap(2, 150.0, 1.0)];
        let ranked = rank(SelectionStrategy::LeastLatency, &ctx, &candidates);
        assert_eq!(ranked, vec![1, 2, 0]);
    }

    #[test]
    fn intelligent_prefers_higher_success_rate_at_equal_latency() {
        let ctx = QueryContext::new(1);
        let candidates = vec![snap(0, 100.0, 0.5), snap(1, 100.0, 0.99)];
        let ranked = rank(SelectionStrategy::Intelligent, &ctx, &candidates);
        assert_eq!(ranked[0], 1);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let ctx = QueryContext::new(1);
        let candidates = vec![snap(0, 100.0, 1.0), snap(1, 100.0, 1.0)];
        let ranked = rank(SelectionStrategy::Intelligent, &ctx, &candidates);
        assert_eq!(ranked, vec![0, 1]);
    }

    #[test]
    fn geographic_prefers_nearer_upstream() {
        let ctx = QueryContext {
            client_location: Some((48.8566, 2.3522)),
            ..QueryContext::new(1)
        };
        let mut near = snap(0, 100.0, 1.0);
        near.location = Some((51.5074, -0.1278));
        let mut far = snap(1, 100.0, 1.0);
        far.location = Some((35.6762, 139.6503));

        let ranked = rank(SelectionStrategy::Geographic, &ctx, &[near, far]);
        assert_eq!(ranked[0], 0);
    }
}
