pub mod entry;
pub mod frequency;

pub use entry::{CacheEntry, Fingerprint, Timestamp};
pub use frequency::{Frequency, FrequencyTracker};

use moka::future::Cache;

/// Which tier an entry should be written into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tier {
    Hot,
    Warm,
    Cold,
}

/// Configured capacities for the three tiers, expressed as a share of a
/// nominal total capacity: L1 "hot" ~10%, L2 "warm" ~50%, L3 "cold" 100%.
#[derive(Clone, Copy, Debug)]
pub struct CacheConfig {
    pub l1_capacity: u64,
    pub l2_capacity: u64,
    pub l3_capacity: u64,
}

impl CacheConfig {
    pub fn from_total(total: u64) -> Self {
        Self {
            l1_capacity: (total / 10).max(1),
            l2_capacity: (total / 2).max(1),
            l3_capacity: total.max(1),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::from_total(1_000)
    }
}

/// A predictor for which tier a fresh entry should land in. The default
/// stub always predicts "warm"; anything richer must keep its state
/// bounded (see [`FrequencyTracker`]) rather than growing unboundedly with
/// the name space observed.
pub trait TierPredictor: Send + Sync {
    fn predict(&self, fingerprint: &Fingerprint) -> Tier;
}

#[derive(Debug, Default)]
pub struct StubPredictor;

impl TierPredictor for StubPredictor {
    fn predict(&self, _fingerprint: &Fingerprint) -> Tier {
        Tier::Warm
    }
}

/// The three-tier cache: hot (L1), warm (L2), cold (L3). Each tier is an
/// independently-capacitated `moka` cache, giving bounded, approximate-LRU
/// storage for free; freshness is decided purely from the caller's `now`
/// rather than `moka`'s own wall-clock TTL, which is what keeps the
/// promotion/expiry properties testable without sleeping.
pub struct TieredCache {
    l1: Cache<Fingerprint, CacheEntry>,
    l2: Cache<Fingerprint, CacheEntry>,
    l3: Cache<Fingerprint, CacheEntry>,
    frequency: FrequencyTracker,
    predictor: Box<dyn TierPredictor>,
}

impl TieredCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_predictor(config, Box::new(StubPredictor))
    }

    pub fn with_predictor(config: CacheConfig, predictor: Box<dyn TierPredictor>) -> Self {
        Self {
            l1: Cache::new(config.l1_capacity),
            l2: Cache::new(config.l2_capacity),
            l3: Cache::new(config.l3_capacity),
            frequency: FrequencyTracker::default(),
            predictor,
        }
    }

    /// Looks up `fingerprint`, searching L1 then L2 then L3. An expired hit
    /// is removed from the tier it was found in before the search
    /// continues; the first non-expired hit wins, is promoted towards L1,
    /// and has its access counters bumped.
    pub async fn get(&self, fingerprint: &Fingerprint, now: Timestamp) -> Option<CacheEntry> {
        self.frequency.record(fingerprint);

        if let Some(found) = self.l1.get(fingerprint) {
            if found.is_expired(now) {
                self.l1.invalidate(fingerprint).await;
            } else {
                let touched = entry::touch(&found, now);
                self.l1.insert(fingerprint.clone(), touched.clone()).await;
                return Some(touched);
            }
        }

        if let Some(found) = self.l2.get(fingerprint) {
            if found.is_expired(now) {
                self.l2.invalidate(fingerprint).await;
            } else {
                let touched = entry::touch(&found, now);
                self.l2.insert(fingerprint.clone(), touched.clone()).await;
                self.l1.insert(fingerprint.clone(), touched.clone()).await;
                return Some(touched);
            }
        }

        if let Some(found) = self.l3.get(fingerprint) {
            if found.is_expired(now) {
                self.l3.invalidate(fingerprint).await;
            } else {
                let touched = entry::touch(&found, now);
                self.l3.insert(fingerprint.clone(), touched.clone()).await;
                self.l2.insert(fingerprint.clone(), touched.clone()).await;
                return Some(touched);
            }
        }

        None
    }

    /// Inserts `entry` under `fingerprint` into the tier the predictor
    /// selects (falling back to warm/L2). `moka`'s own capacity-bound
    /// sampled eviction handles "insertion into a full tier evicts by
    /// approximate-LRU" without any extra bookkeeping here.
    pub async fn put(&self, fingerprint: Fingerprint, entry: CacheEntry, _now: Timestamp) {
        match self.predictor.predict(&fingerprint) {
            Tier::Hot => self.l1.insert(fingerprint, entry).await,
            Tier::Warm => self.l2.insert(fingerprint, entry).await,
            Tier::Cold => self.l3.insert(fingerprint, entry).await,
        }
    }

    /// Scales `base_ttl` by how often `fingerprint` has been queried.
    pub fn adjust_ttl(&self, fingerprint: &Fingerprint, base_ttl: u32) -> u32 {
        match self.frequency.frequency_of(fingerprint) {
            Frequency::VeryHigh => (base_ttl.saturating_mul(2)).min(86_400),
            Frequency::High => (base_ttl.saturating_add(1_800)).min(43_200),
            Frequency::Normal => base_ttl,
            Frequency::Low => (base_ttl / 2).max(300),
            Frequency::VeryLow => (base_ttl / 4).max(60),
        }
    }
}
