use std::collections::{HashMap, HashSet};

/// A prefix trie over DNS labels, used to test a query name against a set
/// of blocked domains.
///
/// The trie is built from labels in *reverse* order (TLD first) so that
/// walking it from the root checks progressively more specific labels —
/// the natural direction for suffix matching. It is immutable after
/// construction; lookups never mutate it.
#[derive(Debug, Default)]
pub struct BlocklistTrie {
    exact: HashSet<String>,
    root: TrieNode,
}

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<String, TrieNode>,
    terminal: bool,
}

impl BlocklistTrie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a blocked pattern, e.g. `ads.example.com`.
    pub fn insert(&mut self, pattern: &str) {
        let pattern = pattern.to_lowercase();
        self.exact.insert(pattern.clone());

        let mut node = &mut self.root;
        for label in pattern.rsplit('.') {
            node = node
                .children
                .entry(label.to_string())
                .or_default();
        }
        node.terminal = true;
    }

    /// True iff `qname` is exactly equal to a pattern that was inserted.
    /// Kept for compatibility with blocklist sources that expect whole-name
    /// matching and nothing else.
    pub fn contains_exact(&self, qname: &str) -> bool {
        self.exact.contains(&qname.to_lowercase())
    }

    /// True iff `qname` is, or is a subdomain of, a pattern that was
    /// inserted (i.e. the match lands on a label boundary). This is the
    /// default policy real-world blocklists (StevenBlack, AdGuard) expect:
    /// blocking `example.com` also blocks `ads.example.com`.
    pub fn contains_suffix(&self, qname: &str) -> bool {
        let qname = qname.to_lowercase();
        let mut node = &self.root;
        for label in qname.rsplit('.') {
            node = match node.children.get(label) {
                Some(next) => next,
                None => return false,
            };
            if node.terminal {
                return true;
            }
        }
        node.terminal
    }

    /// Default matching policy: suffix/label-boundary match.
    pub fn contains(&self, qname: &str) -> bool {
        self.contains_suffix(qname)
    }
}
