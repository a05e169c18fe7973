use crate::resolver::{NamingResolver, Resolution};
use crate::scheme::NamingScheme;
use std::collections::HashMap;
use std::net::Ipv4Addr;

/// A resolver double for tests: answers exactly the qnames it was told
/// about, misses on everything else.
#[derive(Debug, Default)]
pub struct MockResolver {
    scheme: Option<NamingScheme>,
    answers: HashMap<String, (Vec<Ipv4Addr>, u32)>,
}

impl MockResolver {
    pub fn new(scheme: NamingScheme) -> Self {
        Self {
            scheme: Some(scheme),
            answers: HashMap::new(),
        }
    }

    pub fn with_answer(mut self, qname: &str, addresses: Vec<Ipv4Addr>, ttl: u32) -> Self {
        self.answers.insert(qname.to_string(), (addresses, ttl));
        self
    }
}

#[async_trait::async_trait]
impl NamingResolver for MockResolver {
    fn scheme(&self) -> NamingScheme {
        self.scheme.expect("mock resolver scheme not set")
    }

    async fn resolve(&self, qname: &str) -> Option<Resolution> {
        let (addresses, ttl) = self.answers.get(qname)?;
        Some(Resolution {
            addresses: addresses.clone(),
            ttl: *ttl,
            kind: self.scheme(),
        })
    }
}
