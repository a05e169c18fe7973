use std::sync::Mutex;

pub type Timestamp = u64;

const FAILURE_THRESHOLD: u32 = 5;
const SUCCESS_THRESHOLD: u32 = 3;
const OPEN_COOLDOWN_SECS: Timestamp = 30;

/// Circuit-breaker state machine shielding a failing upstream from further
/// load.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct Inner {
    state: BreakerState,
    failure_count: u32,
    success_count: u32,
    last_failure_time: Option<Timestamp>,
    last_success_time: Option<Timestamp>,
    open_since: Option<Timestamp>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            state: BreakerState::Closed,
            failure_count: 0,
            success_count: 0,
            last_failure_time: None,
            last_success_time: None,
            open_since: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Breaker {
    inner: Mutex<Inner>,
}

impl Breaker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the time-gated open→half_open transition, then reports
    /// whether a request may currently be sent.
    pub fn allow(&self, now: Timestamp) -> bool {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        if inner.state == BreakerState::Open {
            if let Some(open_since) = inner.open_since {
                if now.saturating_sub(open_since) >= OPEN_COOLDOWN_SECS {
                    inner.state = BreakerState::HalfOpen;
                    inner.success_count = 0;
                }
            }
        }
        inner.state != BreakerState::Open
    }

    pub fn state(&self, now: Timestamp) -> BreakerState {
        let allowed = self.allow(now);
        let inner = self.inner.lock().expect("breaker lock poisoned");
        if !allowed {
            BreakerState::Open
        } else {
            inner.state
        }
    }

    pub fn record_success(&self, now: Timestamp) {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        inner.last_success_time = Some(now);
        match inner.state {
            BreakerState::Closed => {
                inner.failure_count = 0;
            }
            BreakerState::HalfOpen => {
                inner.success_count += 1;
                if inner.success_count >= SUCCESS_THRESHOLD {
                    inner.state = BreakerState::Closed;
                    inner.failure_count = 0;
                    inner.success_count = 0;
                }
            }
            BreakerState::Open => {}
        }
    }

    pub fn record_failure(&self, now: Timestamp) {
        let mut inner = self.inner.lock().expect("breaker lock poisoned");
        inner.last_failure_time = Some(now);
        match inner.state {
            BreakerState::Closed => {
                inner.failure_count += 1;
                if inner.failure_count >= FAILURE_THRESHOLD {
                    inner.state = BreakerState::Open;
                    inner.open_since = Some(now);
                }
            }
            BreakerState::HalfOpen => {
                inner.state = BreakerState::Open;
                inner.open_since = Some(now);
                inner.success_count = 0;
            }
            BreakerState::Open => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_after_five_consecutive_failures() {
        let breaker = Breaker::new();
        for t in 0..4 {
            breaker.record_failure(t);
            assert_eq!(breaker.state(t), BreakerState::Closed);
        }
        breaker.record_failure(4);
        assert_eq!(breaker.state(4), BreakerState::Open);
        assert!(!breaker.allow(4));
    }

    #[test]
    fn half_opens_thirty_seconds_after_opening() {
        let breaker = Breaker::new();
        for t in 0..5 {
            breaker.record_failure(t);
        }
        assert_eq!(breaker.state(4), BreakerState::Open);
        assert!(!breaker.allow(33));
        assert!(breaker.allow(34));
        assert_eq!(breaker.state(34), BreakerState::HalfOpen);
    }

    #[test]
    fn closes_after_three_consecutive_successes_in_half_open() {
        let breaker = Breaker::new();
        for t in 0..5 {
            breaker.record_failure(t);
        }
        breaker.allow(34);
        breaker.record_success(34);
        breaker.record_success(35);
        assert_eq!(breaker.state(35), BreakerState::HalfOpen);
        breaker.record_success(36);
        assert_eq!(breaker.state(36), BreakerState::Closed);
    }

    #[test]
    fn half_open_reopens_on_a_single_failure() {
        let breaker = Breaker::new();
        for t in 0..5 {
            breaker.record_failure(t);
        }
        breaker.allow(34);
        breaker.record_success(34);
        breaker.record_failure(35);
        assert_eq!(breaker.state(35), BreakerState::Open);
    }

    #[test]
    fn a_success_while_closed_resets_failure_count() {
        let breaker = Breaker::new();
        breaker.record_failure(0);
        breaker.record_failure(1);
        breaker.record_success(2);
        for t in 3..7 {
            breaker.record_failure(t);
        }
        assert_eq!(breaker.state(6), BreakerState::Closed);
        breaker.record_failure(7);
        assert_eq!(breaker.state(7), BreakerState::Open);
    }
}
