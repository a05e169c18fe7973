use std::fmt::Display;

#[derive(Debug)]
pub enum HandleError {
    Parse(relay_proto::ParseError),
    Upstream(relay_balancer::BalancerError),
}

impl Display for HandleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(error) => write!(f, "unable to parse query: {error}"),
            Self::Upstream(error) => write!(f, "upstream query failed: {error}"),
        }
    }
}

impl std::error::Error for HandleError {}

impl From<relay_proto::ParseError> for HandleError {
    fn from(value: relay_proto::ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<relay_balancer::BalancerError> for HandleError {
    fn from(value: relay_balancer::BalancerError) -> Self {
        Self::Upstream(value)
    }
}
