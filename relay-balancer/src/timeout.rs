use std::sync::Mutex;

const INITIAL_MS: u64 = 5_000;
const MIN_MS: u64 = 1_000;
const MAX_MS: u64 = 30_000;
const DECAY_FACTOR: f64 = 0.95;
const GROWTH_FACTOR: f64 = 1.2;

/// The per-upstream I/O deadline: grows on failure, decays on success,
/// always clamped to `[1000, 30000]` ms.
#[derive(Debug)]
pub struct AdaptiveTimeout {
    current_ms: Mutex<u64>,
}

impl Default for AdaptiveTimeout {
    fn default() -> Self {
        Self {
            current_ms: Mutex::new(INITIAL_MS),
        }
    }
}

impl AdaptiveTimeout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_ms(&self) -> u64 {
        *self.current_ms.lock().expect("timeout lock poisoned")
    }

    /// Updates the timeout from one completed attempt's outcome.
    /// A fast success decays it; a failure slow enough to have plausibly
    /// hit the deadline grows it; anything else leaves it unchanged.
    pub fn record(&self, success: bool, duration_ms: u64) {
        let mut current = self.current_ms.lock().expect("timeout lock poisoned");
        if success && duration_ms < *current / 2 {
            *current = ((*current as f64) * DECAY_FACTOR).round() as u64;
            *current = (*current).max(MIN_MS);
        } else if !success && duration_ms >= *current {
            *current = ((*current as f64) * GROWTH_FACTOR).round() as u64;
            *current = (*current).min(MAX_MS);
        }
    }
}
