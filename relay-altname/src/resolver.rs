use crate::scheme::NamingScheme;
use std::net::Ipv4Addr;

/// The result of a successful alt-naming resolution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolution {
    pub addresses: Vec<Ipv4Addr>,
    pub ttl: u32,
    pub kind: NamingScheme,
}

/// A resolver for one alt-naming scheme. The core only depends on this
/// capability — it never knows or cares how ENS/UNS/ZNS/CNS actually
/// resolve a name.
#[async_trait::async_trait]
pub trait NamingResolver: std::fmt::Debug + Send + Sync {
    fn scheme(&self) -> NamingScheme;

    async fn resolve(&self, qname: &str) -> Option<Resolution>;
}
