mod balancer;
mod breaker;
mod context;
mod geo;
mod health;
mod strategy;
mod timeout;
mod transport;
mod upstream;

pub use balancer::{BalancerError, LoadBalancer};
pub use breaker::{Breaker, BreakerState, Timestamp};
pub use context::QueryContext;
pub use geo::{geo_score, haversine_km};
pub use health::{is_healthy, HealthMap};
pub use strategy::{intelligent_score, rank, weighted_roulette_pick, SelectionStrategy, UpstreamSnapshot};
pub use timeout::AdaptiveTimeout;
pub use transport::{Transport, UdpTransport};
#[cfg(any(test, feature = "mock"))]
pub use transport::mock::MockTransport;
pub use upstream::{Counters, UpstreamId, UpstreamSpec};
