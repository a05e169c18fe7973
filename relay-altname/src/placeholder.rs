use crate::resolver::{NamingResolver, Resolution};
use crate::scheme::NamingScheme;
use std::net::Ipv4Addr;

/// A fixed-address stand-in for a real blockchain-naming resolver.
///
/// The underlying ENS/UNS/ZNS/CNS resolution mechanism is out of scope —
/// the core only specifies the dispatch interface and caches whatever a
/// `NamingResolver` returns. This implementation always answers with the
/// same documented placeholder address so the dispatch path is exercisable
/// end-to-end before a real resolver is plugged in.
#[derive(Debug)]
pub struct PlaceholderResolver {
    scheme: NamingScheme,
    address: Ipv4Addr,
    ttl: u32,
}

impl PlaceholderResolver {
    pub fn new(scheme: NamingScheme, address: Ipv4Addr, ttl: u32) -> Self {
        Self {
            scheme,
            address,
            ttl,
        }
    }
}

#[async_trait::async_trait]
impl NamingResolver for PlaceholderResolver {
    fn scheme(&self) -> NamingScheme {
        self.scheme
    }

    async fn resolve(&self, _qname: &str) -> Option<Resolution> {
        Some(Resolution {
            addresses: vec![self.address],
            ttl: self.ttl,
            kind: self.scheme,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_answers_with_its_placeholder_address() {
        let resolver =
            PlaceholderResolver::new(NamingScheme::Ens, Ipv4Addr::new(10, 0, 0, 1), 300);
        let result = resolver.resolve("anything.eth").await.unwrap();
        assert_eq!(result.addresses, vec![Ipv4Addr::new(10, 0, 0, 1)]);
        assert_eq!(result.ttl, 300);
    }
}
