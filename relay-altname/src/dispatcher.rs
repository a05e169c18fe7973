use crate::resolver::{NamingResolver, Resolution};
use crate::scheme::{classify, NamingScheme};
use std::collections::HashMap;

/// Routes a qname to the resolver registered for its TLD's naming scheme,
/// if any.
#[derive(Debug, Default)]
pub struct Dispatcher {
    resolvers: HashMap<NamingScheme, Box<dyn NamingResolver>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, resolver: Box<dyn NamingResolver>) {
        self.resolvers.insert(resolver.scheme(), resolver);
    }

    pub fn with_resolver(mut self, resolver: Box<dyn NamingResolver>) -> Self {
        self.register(resolver);
        self
    }

    /// Classifies `qname` and, if it matches a registered scheme, resolves
    /// it. Returns `None` both when the TLD doesn't match any scheme and
    /// when the matching resolver has no answer — the caller treats both
    /// the same way (fall through to the conventional path).
    pub async fn dispatch(&self, qname: &str) -> Option<Resolution> {
        let scheme = classify(qname)?;
        let resolver = self.resolvers.get(&scheme)?;
        resolver.resolve(qname).await
    }
}
